//! Raw-mode terminal session and the hooks that undo it on failure.

use std::io::{Stdout, stdout};

use color_eyre::eyre::Result;
use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend};

/// The dashboard's hold on the terminal. The alternate screen and raw
/// mode last exactly as long as this value.
pub struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    /// Enter raw mode on the alternate screen with the cursor hidden.
    pub fn start() -> Result<Self> {
        // Built first so a failure halfway through still restores on drop.
        let mut session = Self {
            terminal: Terminal::new(CrosstermBackend::new(stdout()))?,
        };
        terminal::enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, cursor::Hide)?;
        session.terminal.clear()?;
        Ok(session)
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }

    /// Current size as (cols, rows).
    pub fn size(&self) -> Result<(u16, u16)> {
        let size = self.terminal.size()?;
        Ok((size.width, size.height))
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore();
    }
}

/// Put the terminal back. Each step is attempted even if another fails.
fn restore() {
    let _ = execute!(stdout(), cursor::Show, LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

/// Install color-eyre's report and panic hooks, wrapping the panic hook
/// so the terminal is restored before anything is printed.
///
/// Call before [`TerminalSession::start`].
pub fn install_hooks() -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .display_env_section(false)
        .into_hooks();
    eyre_hook.install()?;

    let panic_hook = panic_hook.into_panic_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore();
        panic_hook(info);
    }));
    Ok(())
}
