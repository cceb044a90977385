//! Minimal raw-keyboard selection UI.
//!
//! Used when the `rich-ui` feature is compiled out or the user passes
//! `--plain`. The terminal is in raw mode only while the checkbox menu is
//! on screen; every other prompt is ordinary line input.

use std::io::{self, BufRead, Write};

use crossterm::{
    cursor::MoveTo,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    style::Print,
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType},
};

use super::{Ui, UiError};
use crate::scheduler::LaunchStrategy;

/// Restores cooked mode on every exit path, including unwinds.
struct RawModeGuard;

impl RawModeGuard {
    fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Cursor and checked state for the checkbox menu.
#[derive(Debug)]
pub(crate) struct Checklist {
    cursor: usize,
    checked: Vec<bool>,
}

impl Checklist {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            cursor: 0,
            checked: vec![false; len],
        }
    }

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn is_checked(&self, index: usize) -> bool {
        self.checked[index]
    }

    pub(crate) fn up(&mut self) {
        self.cursor = if self.cursor == 0 {
            self.checked.len() - 1
        } else {
            self.cursor - 1
        };
    }

    pub(crate) fn down(&mut self) {
        self.cursor = (self.cursor + 1) % self.checked.len();
    }

    pub(crate) fn toggle(&mut self) {
        self.checked[self.cursor] = !self.checked[self.cursor];
    }

    /// Checked indices in menu order, or `None` while nothing is checked.
    pub(crate) fn confirmed(&self) -> Option<Vec<usize>> {
        let picks: Vec<usize> = self
            .checked
            .iter()
            .enumerate()
            .filter(|(_, &checked)| checked)
            .map(|(index, _)| index)
            .collect();
        if picks.is_empty() {
            None
        } else {
            Some(picks)
        }
    }
}

pub struct RawUi;

impl Ui for RawUi {
    fn select_devices(&self, inventory: &[String]) -> Result<Vec<String>, UiError> {
        debug_assert!(!inventory.is_empty());

        let mut list = Checklist::new(inventory.len());
        let mut hint: Option<&str> = None;
        let guard = RawModeGuard::new()?;

        loop {
            draw_menu(inventory, &list, hint)?;
            hint = None;

            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match key.code {
                KeyCode::Up | KeyCode::Char('k') => list.up(),
                KeyCode::Down | KeyCode::Char('j') => list.down(),
                KeyCode::Char(' ') => list.toggle(),
                KeyCode::Enter => match list.confirmed() {
                    Some(picks) => {
                        drop(guard);
                        println!();
                        return Ok(picks.into_iter().map(|i| inventory[i].clone()).collect());
                    }
                    None => hint = Some("Nothing is checked. Toggle at least one AVD with space."),
                },
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => quit(guard),
                KeyCode::Char('q') | KeyCode::Esc => quit(guard),
                _ => {}
            }
        }
    }

    fn choose_strategy(&self) -> Result<LaunchStrategy, UiError> {
        println!("Launch strategies:");
        for (index, strategy) in LaunchStrategy::ALL.iter().enumerate() {
            println!("  {}. {}", index + 1, strategy.label());
        }

        let line = read_line("Strategy [1-3]: ")?;
        Ok(match parse_strategy_entry(&line) {
            Some(strategy) => strategy,
            None => {
                println!("Unrecognized choice '{}', launching in parallel.", line.trim());
                LaunchStrategy::Parallel
            }
        })
    }

    fn confirm_launch(&self, count: usize) -> Result<bool, UiError> {
        let line = read_line(&format!("Launch {} AVD(s)? [Y/n]: ", count))?;
        Ok(is_affirmative(&line, true))
    }

    fn acknowledge(&self, device: &str) {
        print!("Press enter to launch {}...", device);
        let _ = io::stdout().flush();
        let mut line = String::new();
        if let Err(e) = io::stdin().lock().read_line(&mut line) {
            log::debug!("acknowledgment read failed, continuing: {}", e);
        }
    }

    fn launch_more(&self) -> Result<bool, UiError> {
        let line = read_line("Launch more AVDs? [y/N]: ")?;
        Ok(is_affirmative(&line, false))
    }
}

/// Leave raw mode, say goodbye, and terminate the whole process.
fn quit(guard: RawModeGuard) -> ! {
    drop(guard);
    println!("\nGoodbye!");
    std::process::exit(0);
}

fn draw_menu(inventory: &[String], list: &Checklist, hint: Option<&str>) -> io::Result<()> {
    let mut out = io::stdout();
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;

    let mut screen = String::new();
    screen.push_str("Select AVDs to launch\r\n");
    screen.push_str("  arrows move, space toggles, enter confirms, q quits\r\n\r\n");
    for (index, name) in inventory.iter().enumerate() {
        let pointer = if index == list.cursor() { '>' } else { ' ' };
        let mark = if list.is_checked(index) { 'x' } else { ' ' };
        screen.push_str(&format!("{} [{}] {}\r\n", pointer, mark, name));
    }
    if let Some(hint) = hint {
        screen.push_str(&format!("\r\n{}\r\n", hint));
    }

    execute!(out, Print(screen))?;
    out.flush()
}

fn read_line(prompt: &str) -> io::Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

pub(crate) fn parse_strategy_entry(line: &str) -> Option<LaunchStrategy> {
    match line.trim().to_ascii_lowercase().as_str() {
        "1" | "parallel" => Some(LaunchStrategy::Parallel),
        "2" | "delayed" => Some(LaunchStrategy::Delayed),
        "3" | "sequential" => Some(LaunchStrategy::Sequential),
        _ => None,
    }
}

pub(crate) fn is_affirmative(line: &str, default_yes: bool) -> bool {
    let entry = line.trim().to_ascii_lowercase();
    if entry.is_empty() {
        return default_yes;
    }
    matches!(entry.as_str(), "y" | "yes")
}
