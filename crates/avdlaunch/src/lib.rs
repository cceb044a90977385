//! avdlaunch - interactive launcher for Android emulator AVDs
//!
//! Discovers the locally configured AVDs with `emulator -list-avds`, lets
//! the user check off a subset, and opens each selected AVD in its own
//! terminal window using one of three launch strategies:
//!
//! - parallel: every launch is issued at once
//! - delayed: launches are issued in order with a fixed pause in between
//! - sequential: each launch waits for an explicit keypress
//!
//! The selector comes in two flavors behind one trait: a rich prompt UI
//! (`dialoguer`, compiled in by default via the `rich-ui` feature) and a
//! minimal raw-keyboard checkbox menu (`crossterm`). The variant is picked
//! once at startup; nothing else branches on it.

pub mod cli;
pub mod config;
pub mod inventory;
pub mod pipeline;
pub mod scheduler;
pub mod spawn;
pub mod ui;

pub use cli::Args;
pub use inventory::DiscoveryError;
pub use pipeline::PipelineError;
pub use scheduler::{LaunchOutcome, LaunchStrategy, LAUNCH_STAGGER};
pub use spawn::{EmulatorSpawner, SpawnError, TerminalSpawner};
pub use ui::{new_ui, Ui, UiError};
