//! Rich prompt UI built on `dialoguer`.

use std::io;

use dialoguer::{console::Term, theme::ColorfulTheme, Confirm, MultiSelect, Select};

use super::{Ui, UiError};
use crate::scheduler::LaunchStrategy;

pub struct PromptUi {
    theme: ColorfulTheme,
}

impl PromptUi {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for PromptUi {
    fn default() -> Self {
        Self::new()
    }
}

impl Ui for PromptUi {
    fn select_devices(&self, inventory: &[String]) -> Result<Vec<String>, UiError> {
        loop {
            let picks = MultiSelect::with_theme(&self.theme)
                .with_prompt("Select AVDs to launch (space to toggle)")
                .items(inventory)
                .interact()
                .map_err(prompt_error)?;
            if !picks.is_empty() {
                return Ok(picks.into_iter().map(|i| inventory[i].clone()).collect());
            }
            eprintln!("Select at least one AVD.");
        }
    }

    fn choose_strategy(&self) -> Result<LaunchStrategy, UiError> {
        let labels: Vec<&str> = LaunchStrategy::ALL.iter().map(|s| s.label()).collect();
        let index = Select::with_theme(&self.theme)
            .with_prompt("How should the AVDs be launched?")
            .items(&labels)
            .default(0)
            .interact()
            .map_err(prompt_error)?;
        Ok(LaunchStrategy::ALL[index])
    }

    fn confirm_launch(&self, count: usize) -> Result<bool, UiError> {
        Confirm::with_theme(&self.theme)
            .with_prompt(format!("Launch {} AVD(s)?", count))
            .default(true)
            .interact()
            .map_err(prompt_error)
    }

    fn acknowledge(&self, device: &str) {
        println!("Press any key to launch {}...", device);
        match Term::stdout().read_key() {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                println!("\nGoodbye!");
                std::process::exit(0);
            }
            Err(e) => log::debug!("acknowledgment read failed, continuing: {}", e),
        }
    }

    fn launch_more(&self) -> Result<bool, UiError> {
        Confirm::with_theme(&self.theme)
            .with_prompt("Launch more AVDs?")
            .default(false)
            .interact()
            .map_err(prompt_error)
    }
}

/// Ctrl-C inside a prompt surfaces as an interrupted read; everything else
/// is a real terminal failure.
fn prompt_error(e: dialoguer::Error) -> UiError {
    match e {
        dialoguer::Error::IO(io) if io.kind() == io::ErrorKind::Interrupted => UiError::Interrupted,
        dialoguer::Error::IO(io) => UiError::Io(io),
    }
}
