//! CommandRunner port - external processes (build tool, git)

use std::path::Path;

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Stdout and stderr joined, for matching on messages like "nothing to commit"
    pub fn combined(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Status for error messages
    pub fn status_text(&self) -> String {
        match self.code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Runs external programs to completion
pub trait CommandRunner {
    /// Run with inherited stdio. Output is not captured.
    fn run_inherited(&self, program: &str, args: &[String], cwd: &Path)
        -> std::io::Result<CommandOutput>;

    /// Run with captured stdout/stderr
    fn run_captured(&self, program: &str, args: &[String], cwd: &Path)
        -> std::io::Result<CommandOutput>;
}
