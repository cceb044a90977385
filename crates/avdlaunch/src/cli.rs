//! Command-line interface for avdlaunch

use argh::FromArgs;

/// Pick locally configured Android emulator AVDs and open each one in its
/// own terminal window.
#[derive(FromArgs, Debug)]
pub struct Args {
    /// list the available AVDs and exit
    #[argh(switch, short = 'l')]
    pub list: bool,

    /// use the minimal built-in selector instead of the rich prompts
    #[argh(switch)]
    pub plain: bool,

    /// log level (error, warn, info, debug, trace)
    #[argh(option, default = "String::from(\"warn\")")]
    pub log_level: String,

    /// show version information
    #[argh(switch, short = 'V')]
    pub version: bool,
}
