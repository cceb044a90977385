//! Interactive pipeline: discover, select, confirm, launch, repeat.
//!
//! One explicit outer loop instead of re-entering the pipeline recursively;
//! each round fetches a fresh inventory.

use thiserror::Error;

use crate::inventory::{self, DiscoveryError};
use crate::scheduler::{self, LaunchOutcome, LaunchStrategy};
use crate::spawn::TerminalSpawner;
use crate::ui::{Ui, UiError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    #[error(transparent)]
    Ui(#[from] UiError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

pub async fn run(ui: &dyn Ui, spawner: &dyn TerminalSpawner, emulator: &str) -> Result<()> {
    loop {
        let inventory = inventory::fetch(emulator).await?;
        let selection = ui.select_devices(&inventory)?;
        debug_assert!(!selection.is_empty());

        // A single device leaves nothing to schedule differently.
        let strategy = if selection.len() == 1 {
            LaunchStrategy::Parallel
        } else {
            ui.choose_strategy()?
        };

        if ui.confirm_launch(selection.len())? {
            println!("Launching {} AVD(s) ({})...", selection.len(), strategy);
            let outcomes =
                scheduler::execute(spawner, &selection, strategy, |device| ui.acknowledge(device))
                    .await;
            report(&outcomes);
        } else {
            println!("Launch cancelled.");
        }

        if !ui.launch_more()? {
            break;
        }
    }
    Ok(())
}

fn report(outcomes: &[LaunchOutcome]) {
    let launched = outcomes.iter().filter(|o| o.succeeded()).count();
    let failed = outcomes.len() - launched;
    println!();
    println!("Done: {} launched | {} failed", launched, failed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::spawn::SpawnError;

    #[derive(Default)]
    struct RecordingSpawner {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TerminalSpawner for RecordingSpawner {
        async fn spawn_terminal(&self, device: &str) -> std::result::Result<(), SpawnError> {
            self.calls.lock().unwrap().push(device.to_string());
            Ok(())
        }
    }

    /// Scripted stand-in for both UI variants.
    struct ScriptedUi {
        selection: Vec<String>,
        strategy: Option<LaunchStrategy>,
        confirm: bool,
    }

    impl Ui for ScriptedUi {
        fn select_devices(&self, _inventory: &[String]) -> std::result::Result<Vec<String>, UiError> {
            Ok(self.selection.clone())
        }

        fn choose_strategy(&self) -> std::result::Result<LaunchStrategy, UiError> {
            match self.strategy {
                Some(strategy) => Ok(strategy),
                None => panic!("choose_strategy must not be asked for a single selection"),
            }
        }

        fn confirm_launch(&self, _count: usize) -> std::result::Result<bool, UiError> {
            Ok(self.confirm)
        }

        fn acknowledge(&self, _device: &str) {}

        fn launch_more(&self) -> std::result::Result<bool, UiError> {
            Ok(false)
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn single_selection_skips_strategy_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let emulator = crate::inventory::fake_emulator(dir.path(), "printf 'Pixel_5\\n'");
        let ui = ScriptedUi {
            selection: vec!["Pixel_5".to_string()],
            strategy: None,
            confirm: true,
        };
        let spawner = RecordingSpawner::default();

        run(&ui, &spawner, &emulator).await.unwrap();
        assert_eq!(*spawner.calls.lock().unwrap(), vec!["Pixel_5"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn declined_confirmation_spawns_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let emulator =
            crate::inventory::fake_emulator(dir.path(), "printf 'Pixel_5\\nPixel_7\\n'");
        let ui = ScriptedUi {
            selection: vec!["Pixel_5".to_string(), "Pixel_7".to_string()],
            strategy: Some(LaunchStrategy::Parallel),
            confirm: false,
        };
        let spawner = RecordingSpawner::default();

        run(&ui, &spawner, &emulator).await.unwrap();
        assert!(spawner.calls.lock().unwrap().is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn multi_selection_launches_every_device() {
        let dir = tempfile::tempdir().unwrap();
        let emulator =
            crate::inventory::fake_emulator(dir.path(), "printf 'Pixel_5\\nPixel_7\\n'");
        let ui = ScriptedUi {
            selection: vec!["Pixel_5".to_string(), "Pixel_7".to_string()],
            strategy: Some(LaunchStrategy::Parallel),
            confirm: true,
        };
        let spawner = RecordingSpawner::default();

        run(&ui, &spawner, &emulator).await.unwrap();
        assert_eq!(*spawner.calls.lock().unwrap(), vec!["Pixel_5", "Pixel_7"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn discovery_failure_surfaces_as_pipeline_error() {
        let dir = tempfile::tempdir().unwrap();
        let emulator = crate::inventory::fake_emulator(dir.path(), "exit 1");
        let ui = ScriptedUi {
            selection: vec![],
            strategy: None,
            confirm: false,
        };
        let spawner = RecordingSpawner::default();

        let err = run(&ui, &spawner, &emulator).await.unwrap_err();
        assert!(matches!(err, PipelineError::Discovery(_)));
    }
}
