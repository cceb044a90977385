//! Interactive prompts behind one trait.
//!
//! Two implementations satisfy the same contract: `PromptUi` (rich,
//! `dialoguer`, compiled in via the default `rich-ui` feature) and `RawUi`
//! (minimal raw-keyboard menu plus line prompts). `new_ui` picks one at
//! startup; no other code branches on the active variant.

use thiserror::Error;

use crate::scheduler::LaunchStrategy;

#[cfg(feature = "rich-ui")]
pub mod prompt;
pub mod raw;

#[derive(Debug, Error)]
pub enum UiError {
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("interrupted")]
    Interrupted,
}

pub trait Ui {
    /// Let the user pick a non-empty subset of `inventory`, preserving
    /// inventory order. Implementations re-prompt rather than return an
    /// empty selection.
    fn select_devices(&self, inventory: &[String]) -> Result<Vec<String>, UiError>;

    /// Ask which launch strategy to use. Only called for selections of two
    /// or more devices.
    fn choose_strategy(&self) -> Result<LaunchStrategy, UiError>;

    /// Final gate before anything is spawned. Defaults to yes.
    fn confirm_launch(&self, count: usize) -> Result<bool, UiError>;

    /// Block until the user acknowledges the next sequential launch.
    fn acknowledge(&self, device: &str);

    /// Ask whether to run the whole pipeline again.
    fn launch_more(&self) -> Result<bool, UiError>;
}

/// Pick the UI variant once, at startup.
pub fn new_ui(plain: bool) -> Box<dyn Ui> {
    #[cfg(feature = "rich-ui")]
    {
        if !plain {
            return Box::new(prompt::PromptUi::new());
        }
    }
    #[cfg(not(feature = "rich-ui"))]
    {
        if !plain {
            log::debug!("rich prompts not compiled in; using the built-in selector");
        }
    }
    Box::new(raw::RawUi)
}
