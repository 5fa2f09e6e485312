//! Terminal confirmation prompts
//!
//! Implements the engines' [`Confirmation`] capability over stderr/stdin.
//! Prompts are the only suspension point in any engine operation; anything
//! other than an explicit yes declines.

use std::io::{self, BufRead, Write};

use shelf_core::{ConfirmRequest, Confirmation, Severity};

/// Interactive prompt with optional auto-accept
///
/// `assume_yes` accepts informational confirmations only; `force` accepts
/// everything including warning and elevated severities. Data-discarding
/// steps stay deliberate in scripts unless explicitly forced.
pub struct TerminalPrompt {
    pub assume_yes: bool,
    pub force: bool,
}

impl TerminalPrompt {
    fn ask(&self, request: &ConfirmRequest) -> bool {
        let tag = match request.severity {
            Severity::Info => "confirm",
            Severity::Warning => "WARNING",
            Severity::Elevated => "DANGER",
        };
        eprint!("[{tag}] {} [y/N] ", request.message);
        let _ = io::stderr().flush();

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

impl Confirmation for TerminalPrompt {
    fn confirm(&self, request: &ConfirmRequest) -> bool {
        if self.force {
            return true;
        }
        if self.assume_yes && request.severity == Severity::Info {
            return true;
        }
        self.ask(request)
    }
}
