use std::path::Path;

use crate::command_runner::{CommandOutput, CommandRunner};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CommandFailure {
    pub(crate) command: String,
    pub(crate) status: i32,
    pub(crate) stderr: String,
}

pub(crate) fn run_program(
    runner: &dyn CommandRunner,
    program: &str,
    args: &[&str],
    cwd: Option<&Path>,
) -> Result<CommandOutput, String> {
    runner
        .run(program, args, cwd)
        .map_err(|error| format!("{program}: {error}"))
}

pub(crate) fn ensure_success(
    args: &[&str],
    output: CommandOutput,
) -> Result<CommandOutput, CommandFailure> {
    if output.status_code == 0 {
        return Ok(output);
    }

    let stderr = output.stderr.trim();
    Err(CommandFailure {
        command: args.join(" "),
        status: output.status_code,
        stderr: if stderr.is_empty() {
            output.stdout.trim().to_string()
        } else {
            stderr.to_string()
        },
    })
}

#[cfg(test)]
mod tests {
    use crate::command_runner::CommandOutput;

    use super::{CommandFailure, ensure_success};

    #[test]
    fn ensure_success_keeps_zero_exit_output() {
        let output = CommandOutput {
            status_code: 0,
            stdout: "ok\n".to_string(),
            stderr: String::new(),
        };

        let result = ensure_success(&["status"], output.clone()).expect("success");
        assert_eq!(result, output);
    }

    #[test]
    fn ensure_success_prefers_stderr_and_falls_back_to_stdout() {
        let with_stderr = ensure_success(
            &["clone", "git@github.com:u/a.git", "/tmp/a"],
            CommandOutput {
                status_code: 128,
                stdout: "ignored".to_string(),
                stderr: "fatal: repository not found\n".to_string(),
            },
        );
        assert_eq!(
            with_stderr.expect_err("expected failure"),
            CommandFailure {
                command: "clone git@github.com:u/a.git /tmp/a".to_string(),
                status: 128,
                stderr: "fatal: repository not found".to_string(),
            }
        );

        let stdout_only = ensure_success(
            &["status"],
            CommandOutput {
                status_code: 1,
                stdout: "something odd\n".to_string(),
                stderr: "  ".to_string(),
            },
        )
        .expect_err("expected failure");
        assert_eq!(stdout_only.stderr, "something odd");
    }
}
