//! User-facing message sink.

/// Receives verbose command echoes, confirmations and best-effort warnings.
pub trait Console: Send + Sync {
    fn log(&self, message: &str);
    fn warn(&self, message: &str);
}

/// Writes every message to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn log(&self, message: &str) {
        println!("{message}");
    }

    fn warn(&self, message: &str) {
        println!("{message}");
    }
}
