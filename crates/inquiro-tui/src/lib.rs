//! Session controller and full-screen TUI for Inquiro.
//!
//! The controller is an Elm-style loop: `update` mutates `AppState` and
//! returns effects, `SessionRuntime` executes them against a `Transport`.
//! `run_interactive_chat` wraps it in a ratatui front end.

mod app;
pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stdout};

use anyhow::{Result, bail};
pub use app::{App, ExitReason, Focus, ViewState};
pub use features::{history, input, search, transcript};
use inquiro_core::config::Config;
use inquiro_core::credentials::SESSION_EXPIRED_HINT;
use inquiro_core::transport::Transport;
pub use runtime::SessionRuntime;
pub use state::{AppState, SessionSettings, SessionSnapshot};

use crate::terminal::TerminalGuard;

/// Runs the interactive chat UI until the user quits.
///
/// # Errors
/// Returns an error if stdout is not a terminal, the terminal cannot be set
/// up, or the backend reports the session as expired.
pub async fn run_interactive_chat<T: Transport>(config: &Config, transport: T) -> Result<()> {
    if !stdout().is_terminal() {
        bail!(
            "Chat mode requires a terminal.\n\
             Use `inquiro send -m '...'` for non-interactive use."
        );
    }

    let mut runtime = SessionRuntime::new(transport, SessionSettings::from_config(config));
    runtime.refresh();
    let mut app = App::new(runtime);

    let exit = {
        let mut guard = TerminalGuard::enter()?;
        app.run(&mut guard.terminal)?
    };

    tracing::info!(?exit, "chat session ended");
    match exit {
        ExitReason::Quit => Ok(()),
        ExitReason::SessionExpired => bail!(SESSION_EXPIRED_HINT),
    }
}
