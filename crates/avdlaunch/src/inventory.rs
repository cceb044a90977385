//! AVD discovery via `emulator -list-avds`.
//!
//! Produces a fresh, ordered inventory of device names on every call. The
//! inventory is never cached; each pipeline round re-runs discovery so that
//! devices created or deleted between rounds show up.

use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("failed to run '{command} -list-avds': {source} (is the Android SDK emulator on your PATH?)")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("'{command} -list-avds' exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("no AVDs found; create one with Android Studio's Device Manager or 'avdmanager create avd' first")]
    NoDevices,
}

pub type Result<T> = std::result::Result<T, DiscoveryError>;

/// Run the discovery command and return the ordered list of AVD names.
pub async fn fetch(emulator: &str) -> Result<Vec<String>> {
    log::debug!("discovering AVDs via '{} -list-avds'", emulator);

    let output = Command::new(emulator)
        .arg("-list-avds")
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| DiscoveryError::Spawn {
            command: emulator.to_string(),
            source: e,
        })?;

    if !output.status.success() {
        return Err(DiscoveryError::CommandFailed {
            command: emulator.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let devices = parse_avd_list(&String::from_utf8_lossy(&output.stdout));
    if devices.is_empty() {
        return Err(DiscoveryError::NoDevices);
    }

    log::debug!("found {} AVD(s)", devices.len());
    Ok(devices)
}

/// Split discovery output into device names: one per line, trimmed, blank
/// lines dropped, order preserved.
pub fn parse_avd_list(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Write an executable stand-in for the emulator binary into `dir`.
#[cfg(all(test, unix))]
pub(crate) fn fake_emulator(dir: &std::path::Path, body: &str) -> String {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("emulator");
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path.to_string_lossy().into_owned()
}
