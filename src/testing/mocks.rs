use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::infra::git::{CommandOutput, CommandRunner, Console};

#[derive(Default)]
struct MockState {
    responses: HashMap<Vec<String>, CommandOutput>,
    calls: Vec<Vec<String>>,
}

/// Command runner with scripted outputs keyed by exact argument list.
/// Unscripted commands succeed with empty output.
#[derive(Clone, Default)]
pub struct MockRunner {
    state: Arc<Mutex<MockState>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(self, args: &[&str], output: CommandOutput) -> Self {
        let key = args.iter().map(|arg| (*arg).to_string()).collect();
        self.state.lock().unwrap().responses.insert(key, output);
        self
    }

    pub fn respond(self, args: &[&str], stdout: &str) -> Self {
        self.script(args, CommandOutput::ok(stdout))
    }

    pub fn fail(self, args: &[&str], stderr: &str) -> Self {
        self.script(args, CommandOutput::failed(stderr))
    }

    /// Argument lists of every command run so far, in order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.state.lock().unwrap().calls.clone()
    }
}

impl CommandRunner for MockRunner {
    async fn run(&self, _cwd: &Path, _program: &str, args: &[String]) -> io::Result<CommandOutput> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(args.to_vec());
        Ok(state
            .responses
            .get(args)
            .cloned()
            .unwrap_or_else(|| CommandOutput::ok("")))
    }
}

/// Console that keeps every message for later assertions.
#[derive(Default)]
pub struct RecordingConsole {
    lines: Mutex<Vec<String>>,
}

impl RecordingConsole {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl Console for RecordingConsole {
    fn log(&self, message: &str) {
        self.lines.lock().unwrap().push(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.lines.lock().unwrap().push(message.to_string());
    }
}
