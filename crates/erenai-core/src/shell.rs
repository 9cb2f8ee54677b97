//! Shell command execution.

use std::process::Command;
use tracing::{debug, warn};

/// Captured result of one shell command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShellOutput {
    pub stdout: String,
    pub stderr: String,
    /// `true` only for a launched command that exited with status 0.
    pub success: bool,
    /// `false` when the shell itself could not be started.
    pub launched: bool,
}

impl ShellOutput {
    /// Output for a command that could not be launched at all.
    pub fn launch_failure(error: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: error.into(),
            success: false,
            launched: false,
        }
    }
}

/// Runs a literal command line. Failures are values, never panics or errors.
pub trait ShellExecutor {
    fn execute(&self, command: &str) -> ShellOutput;
}

/// Executes commands through the platform shell, blocking until exit.
#[derive(Debug, Clone, Default)]
pub struct SystemShell;

impl SystemShell {
    fn command(command_line: &str) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(command_line);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(command_line);
            cmd
        }
    }
}

impl ShellExecutor for SystemShell {
    fn execute(&self, command: &str) -> ShellOutput {
        debug!(target: "erenai::shell", "Running {:?}", command);
        match Self::command(command).output() {
            Ok(output) => {
                let result = ShellOutput {
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    success: output.status.success(),
                    launched: true,
                };
                if !result.success {
                    debug!(
                        target: "erenai::shell",
                        "Command {:?} exited with {:?}",
                        command,
                        output.status.code()
                    );
                }
                result
            }
            Err(e) => {
                warn!(target: "erenai::shell", "Failed to launch {:?}: {}", command, e);
                ShellOutput::launch_failure(e.to_string())
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_success_captures_stdout() {
        let output = SystemShell.execute("echo hello");
        assert!(output.success);
        assert!(output.launched);
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[test]
    fn test_launch_failure_is_distinct_from_exit_status() {
        let output = ShellOutput::launch_failure("No such file or directory");
        assert!(!output.success);
        assert!(!output.launched);
        assert_eq!(output.stderr, "No such file or directory");
    }

    #[test]
    fn test_nonzero_exit_is_failure() {
        let output = SystemShell.execute("echo oops >&2; exit 3");
        assert!(!output.success);
        assert!(output.launched);
        assert_eq!(output.stderr.trim(), "oops");
    }
}
