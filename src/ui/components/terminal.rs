use crossterm::{cursor, execute, terminal};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::error::Result;

type Backend = CrosstermBackend<std::io::Stdout>;

/// RAII wrapper that keeps raw mode and the alternate screen scoped to the dashboard.
pub struct TerminalGuard {
    terminal: Terminal<Backend>,
    restored: bool,
}

impl TerminalGuard {
    /// Enter raw + alternate screen modes. The cursor stays under the control of
    /// each frame so the symbol field can show it.
    pub fn new() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        if let Err(err) = execute!(stdout, terminal::EnterAlternateScreen) {
            let _ = terminal::disable_raw_mode();
            return Err(err.into());
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self {
            terminal,
            restored: false,
        })
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<Backend> {
        &mut self.terminal
    }

    /// Restore the terminal once, regardless of how many times it is called.
    pub fn restore(&mut self) -> Result<()> {
        if !self.restored {
            self.restored = true;
            execute!(
                self.terminal.backend_mut(),
                cursor::Show,
                terminal::LeaveAlternateScreen
            )?;
            terminal::disable_raw_mode()?;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}
