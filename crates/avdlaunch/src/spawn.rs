//! Terminal window spawning.
//!
//! Each selected AVD is started with `<emulator> -avd <name>` inside a new
//! terminal window. The invocation is always built as an argument vector,
//! never as a concatenated shell string, and device names are validated
//! against the AVD charset before any use.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

/// How long to wait for the terminal launcher to exit before treating the
/// window as handed off. Launchers like `gnome-terminal` and `osascript`
/// detach and exit immediately; `xterm -e` stays in the foreground for the
/// lifetime of the window.
const LAUNCHER_GRACE: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("device name '{0}' contains characters that cannot be passed to a terminal")]
    UnsafeName(String),
    #[error("no terminal emulator found on PATH (tried: {0})")]
    NoTerminal(String),
    #[error("failed to start terminal for '{device}': {source}")]
    Spawn {
        device: String,
        #[source]
        source: std::io::Error,
    },
    #[error("terminal launcher for '{device}' exited with {status}")]
    LauncherFailed {
        device: String,
        status: std::process::ExitStatus,
    },
}

/// Capability to open a terminal window running the launch command for one
/// device.
///
/// Resolves when the spawn itself has settled; the launched device's boot
/// and lifetime are never observed.
#[async_trait]
pub trait TerminalSpawner: Send + Sync {
    async fn spawn_terminal(&self, device: &str) -> Result<(), SpawnError>;
}

/// Production spawner: builds a platform-appropriate terminal invocation
/// around `<emulator> -avd <name>` and runs it detached.
pub struct EmulatorSpawner {
    emulator: String,
}

impl EmulatorSpawner {
    pub fn new(emulator: impl Into<String>) -> Self {
        Self {
            emulator: emulator.into(),
        }
    }
}

#[async_trait]
impl TerminalSpawner for EmulatorSpawner {
    async fn spawn_terminal(&self, device: &str) -> Result<(), SpawnError> {
        if !is_safe_name(device) {
            return Err(SpawnError::UnsafeName(device.to_string()));
        }

        let argv = terminal_invocation(&self.emulator, device)?;
        log::info!("[{}] starting: {}", device, argv.join(" "));

        let mut child = Command::new(&argv[0])
            .args(&argv[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| SpawnError::Spawn {
                device: device.to_string(),
                source: e,
            })?;

        // A launcher still alive after the grace window owns the window
        // itself; the spawn has settled either way.
        match tokio::time::timeout(LAUNCHER_GRACE, child.wait()).await {
            Ok(Ok(status)) if status.success() => Ok(()),
            Ok(Ok(status)) => Err(SpawnError::LauncherFailed {
                device: device.to_string(),
                status,
            }),
            Ok(Err(e)) => Err(SpawnError::Spawn {
                device: device.to_string(),
                source: e,
            }),
            Err(_elapsed) => Ok(()),
        }
    }
}

/// AVD names are restricted to ASCII letters, digits, dots, underscores and
/// dashes. Anything else is rejected before it can reach a terminal.
fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

#[cfg(all(unix, not(target_os = "macos")))]
const KNOWN_TERMINALS: [&str; 5] = [
    "x-terminal-emulator",
    "gnome-terminal",
    "konsole",
    "xfce4-terminal",
    "xterm",
];

#[cfg(all(unix, not(target_os = "macos")))]
fn terminal_invocation(emulator: &str, device: &str) -> Result<Vec<String>, SpawnError> {
    let terminal = KNOWN_TERMINALS
        .iter()
        .copied()
        .find(|t| on_path(t))
        .ok_or_else(|| SpawnError::NoTerminal(KNOWN_TERMINALS.join(", ")))?;
    Ok(exec_args(terminal, emulator, device))
}

#[cfg(all(unix, not(target_os = "macos")))]
fn exec_args(terminal: &str, emulator: &str, device: &str) -> Vec<String> {
    // gnome-terminal wants the command after `--`; xfce4-terminal's `-e`
    // takes a single string, so use `-x` there; everything else understands
    // `-e cmd args...`.
    let mut argv: Vec<String> = match terminal {
        "gnome-terminal" => vec![terminal.to_string(), "--".to_string()],
        "xfce4-terminal" => vec![terminal.to_string(), "-x".to_string()],
        _ => vec![terminal.to_string(), "-e".to_string()],
    };
    argv.extend([
        emulator.to_string(),
        "-avd".to_string(),
        device.to_string(),
    ]);
    argv
}

#[cfg(all(unix, not(target_os = "macos")))]
fn on_path(bin: &str) -> bool {
    let Some(paths) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&paths).any(|dir| dir.join(bin).is_file())
}

#[cfg(target_os = "macos")]
fn terminal_invocation(emulator: &str, device: &str) -> Result<Vec<String>, SpawnError> {
    // The device name is already validated; the emulator path is embedded in
    // the AppleScript body and must not be able to break out of it.
    if emulator.contains('"') || emulator.contains('\\') {
        return Err(SpawnError::UnsafeName(emulator.to_string()));
    }
    let script = format!(
        "tell application \"Terminal\" to do script \"{} -avd {}\"",
        emulator, device
    );
    Ok(vec!["osascript".to_string(), "-e".to_string(), script])
}

#[cfg(target_os = "windows")]
fn terminal_invocation(emulator: &str, device: &str) -> Result<Vec<String>, SpawnError> {
    // `start` treats its first quoted argument as the window title, so pass
    // an empty title before the command.
    Ok(vec![
        "cmd".to_string(),
        "/C".to_string(),
        "start".to_string(),
        String::new(),
        emulator.to_string(),
        "-avd".to_string(),
        device.to_string(),
    ])
}
