//! System process runner
//!
//! Implements the CommandRunner port with `std::process::Command`.

use crate::domain::ports::{CommandOutput, CommandRunner};
use std::path::Path;
use std::process::{Command, Stdio};

/// Runs programs on the local machine
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner {
    stdout_to_stderr: bool,
}

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send inherited child stdout to our stderr, keeping stdout clean for
    /// the NDJSON event stream.
    pub fn stdout_to_stderr(mut self, enabled: bool) -> Self {
        self.stdout_to_stderr = enabled;
        self
    }

    /// Windows resolves `npm`, `pnpm`, ... through `.cmd` shims, which
    /// `CreateProcess` does not search for, so build commands go through
    /// `cmd /C` there.
    fn shell_command(program: &str, args: &[String], cwd: &Path) -> Command {
        let mut cmd = if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(program);
            cmd
        } else {
            Command::new(program)
        };
        cmd.args(args).current_dir(cwd);
        cmd
    }

    /// Arguments reach the program untouched; `cmd` would parse `&`, `|`
    /// and `^` in a commit message.
    fn direct_command(program: &str, args: &[String], cwd: &Path) -> Command {
        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(cwd);
        cmd
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run_inherited(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
    ) -> std::io::Result<CommandOutput> {
        let stdout = if self.stdout_to_stderr {
            Stdio::from(std::io::stderr())
        } else {
            Stdio::inherit()
        };
        let status = Self::shell_command(program, args, cwd)
            .stdin(Stdio::inherit())
            .stdout(stdout)
            .stderr(Stdio::inherit())
            .status()?;

        Ok(CommandOutput {
            success: status.success(),
            code: status.code(),
            stdout: String::new(),
            stderr: String::new(),
        })
    }

    fn run_captured(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
    ) -> std::io::Result<CommandOutput> {
        let output = Self::direct_command(program, args, cwd)
            .stdin(Stdio::null())
            .output()?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
