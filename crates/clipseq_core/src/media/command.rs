//! Running external tools with output captured into the run log.

use std::process::{Command, Stdio};

use crate::logging::RunLogger;
use crate::orchestrator::{StepError, StepResult};

/// Captured stdout of a successful tool run; stderr only goes to the log.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub stdout: String,
}

/// Number of stderr lines kept in a `CommandFailed` message.
const ERROR_LINES: usize = 5;

/// Run `cmd` to completion, logging it and its output.
///
/// A non-zero exit becomes `StepError::CommandFailed` with the last stderr
/// lines as message, after the tail buffer has been written to the log.
pub fn run_tool(tool: &str, cmd: &mut Command, logger: &RunLogger) -> StepResult<ToolOutput> {
    logger.command(&format_command(cmd));

    let output = cmd
        .stdin(Stdio::null())
        .output()
        .map_err(|e| StepError::io_error(format!("executing {}", tool), e))?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    for line in stdout.lines() {
        logger.output_line(line, false);
    }
    for line in stderr.lines() {
        logger.output_line(line, true);
    }

    if !output.status.success() {
        let exit_code = output.status.code().unwrap_or(-1);
        logger.show_tail(&format!("{} output", tool));
        return Err(StepError::command_failed(
            tool,
            exit_code,
            last_lines(&stderr, ERROR_LINES),
        ));
    }

    Ok(ToolOutput { stdout })
}

/// Shell-like rendering of a command for the log.
pub fn format_command(cmd: &Command) -> String {
    let mut parts = vec![quote_arg(&cmd.get_program().to_string_lossy())];
    parts.extend(cmd.get_args().map(|a| quote_arg(&a.to_string_lossy())));
    parts.join(" ")
}

fn quote_arg(arg: &str) -> String {
    if !arg.is_empty() && !arg.contains(|c: char| c.is_whitespace() || c == '\'' || c == '"') {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', "'\\''"))
    }
}

fn last_lines(text: &str, count: usize) -> String {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(count);
    if lines.is_empty() {
        "no error output".to_string()
    } else {
        lines[start..].join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_and_quotes_arguments() {
        let mut cmd = Command::new("ffmpeg");
        cmd.args(["-i", "my clip.mp3", "-t", "2.500", "it's.mp3"]);
        assert_eq!(
            format_command(&cmd),
            "ffmpeg -i 'my clip.mp3' -t 2.500 'it'\\''s.mp3'"
        );
    }

    #[test]
    fn last_lines_skips_blank_lines() {
        assert_eq!(last_lines("a\n\nb\nc\n", 2), "b\nc");
        assert_eq!(last_lines("", 3), "no error output");
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_becomes_command_failed() {
        use crate::logging::LogConfig;

        let dir = tempfile::tempdir().unwrap();
        let logger = RunLogger::new("cmd", dir.path(), LogConfig::default(), None).unwrap();

        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo broken input >&2; exit 3"]);
        let err = run_tool("sh", &mut cmd, &logger).unwrap_err();

        match err {
            StepError::CommandFailed {
                tool,
                exit_code,
                message,
            } => {
                assert_eq!(tool, "sh");
                assert_eq!(exit_code, 3);
                assert_eq!(message, "broken input");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(logger.get_tail(), vec!["broken input".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn captures_stdout_on_success() {
        use crate::logging::LogConfig;

        let dir = tempfile::tempdir().unwrap();
        let logger = RunLogger::new("cmd", dir.path(), LogConfig::default(), None).unwrap();

        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo 12.5"]);
        let output = run_tool("sh", &mut cmd, &logger).unwrap();
        assert_eq!(output.stdout.trim(), "12.5");
    }
}
