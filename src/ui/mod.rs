//! Terminal UI for filling a biodata offline.

pub mod form_field;
pub mod picker;
pub mod wizard_screen;

use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use uuid::Uuid;

use crate::config::Config;
use crate::profile::ProfileRegistry;
use crate::wizard::FieldValue;
use wizard_screen::{ScreenEvent, WizardScreen};

/// Result of an interactive wizard session.
#[derive(Debug)]
pub enum WizardOutcome {
    /// Profile saved to the local store
    Saved { id: Uuid, path: PathBuf },
    Cancelled,
}

/// Restores the terminal on drop, whatever way the wizard exits.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("enabling raw mode")?;
        crossterm::execute!(io::stdout(), EnterAlternateScreen)
            .context("entering alternate screen")?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = crossterm::execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Run the biodata wizard and persist the result into the profile store.
pub fn run_wizard(config: &Config) -> Result<WizardOutcome> {
    let _guard = TerminalGuard::enter()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal: Terminal<CrosstermBackend<Stdout>> =
        Terminal::new(backend).context("creating terminal")?;

    let mut screen = WizardScreen::new();

    loop {
        terminal.draw(|frame| screen.render(frame))?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        match screen.handle_key(key) {
            ScreenEvent::Continue => {}
            ScreenEvent::Cancelled => return Ok(WizardOutcome::Cancelled),
            ScreenEvent::Finished => break,
        }
    }

    drop(terminal);
    save_finished_wizard(config, screen)
}

/// Write the finished wizard session into the local profile store.
fn save_finished_wizard(config: &Config, screen: WizardScreen) -> Result<WizardOutcome> {
    let controller = screen.into_controller();
    let owner = controller
        .field("email")
        .and_then(FieldValue::as_text)
        .unwrap_or("local@bondhon.app")
        .to_string();

    let profiles_dir = config.profiles_path();
    let mut registry = ProfileRegistry::new();
    registry.load_all(&profiles_dir)?;

    let id = registry.create(owner).id;
    let profile = registry
        .get_mut(&id)
        .context("freshly created profile missing from registry")?;
    profile.fields = controller.form_data().clone();
    profile.completed_steps = controller.completed_steps().clone();
    profile.current_step = controller.current_step();
    registry.save(&profiles_dir, &id)?;

    let path = profiles_dir.join(format!("{id}.json"));
    tracing::info!("Biodata saved to {}", path.display());
    Ok(WizardOutcome::Saved { id, path })
}
