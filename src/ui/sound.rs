use std::io::{self, Write};

/// Audible feedback is just the terminal bell; the emulator decides whether
/// that means a beep, a flash, or nothing.
pub struct Sound {
    pub enabled: bool,
}

impl Sound {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Ring the bell for a wrong answer. Write errors are ignored; a missed
    /// beep is not worth interrupting the session.
    pub fn wrong_answer(&self) {
        if !self.enabled {
            return;
        }
        let mut stdout = io::stdout();
        let _ = stdout.write_all(b"\x07");
        let _ = stdout.flush();
    }
}
