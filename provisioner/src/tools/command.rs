use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::ProvisionError;

/// Locate `tool` on `PATH`.
pub fn require_tool(tool: &str, hint: &str) -> Result<PathBuf, ProvisionError> {
    which::which(tool).map_err(|_| ProvisionError::ToolNotFound {
        tool: tool.to_string(),
        hint: hint.to_string(),
    })
}

/// Command line as shown in logs and errors.
pub fn describe(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

fn check(status: ExitStatus, command: String) -> Result<()> {
    if status.success() {
        Ok(())
    } else {
        Err(ProvisionError::CommandFailed {
            command,
            status: status.to_string(),
        }
        .into())
    }
}

/// Run to completion with inherited stdio. A non-zero exit is an error.
pub async fn run(program: &str, args: &[String], cwd: &Path) -> Result<()> {
    let command = describe(program, args);
    info!(%command, cwd = %cwd.display(), "running");

    let status = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .status()
        .await
        .with_context(|| format!("Failed to start `{command}`"))?;
    check(status, command)
}

/// Like [`run`], but feeds `input` on stdin and then closes it so the child
/// never waits on the terminal.
pub async fn run_with_input(program: &str, args: &[String], cwd: &Path, input: &str) -> Result<()> {
    let command = describe(program, args);
    info!(%command, cwd = %cwd.display(), "running with scripted input");

    let mut child = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::piped())
        .spawn()
        .with_context(|| format!("Failed to start `{command}`"))?;

    if let Some(mut stdin) = child.stdin.take() {
        // The child may exit before reading everything.
        if let Err(e) = stdin.write_all(input.as_bytes()).await {
            debug!(%command, error = %e, "stdin closed early");
        }
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("Failed to wait for `{command}`"))?;
    check(status, command)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn describe_joins_program_and_args() {
        assert_eq!(
            describe("serverless", &args(&["deploy", "--stage", "dev"])),
            "serverless deploy --stage dev"
        );
        assert_eq!(describe("npm", &[]), "npm");
    }

    #[test]
    fn missing_tool_carries_hint() {
        let err = require_tool("no-such-tool-for-provisioner-tests", "install it").unwrap_err();
        match err {
            ProvisionError::ToolNotFound { tool, hint } => {
                assert_eq!(tool, "no-such-tool-for-provisioner-tests");
                assert_eq!(hint, "install it");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn non_zero_exit_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run("sh", &args(&["-c", "exit 3"]), dir.path()).await.unwrap_err();
        let err = err.downcast::<ProvisionError>().unwrap();
        assert!(matches!(err, ProvisionError::CommandFailed { .. }));
    }

    #[tokio::test]
    async fn scripted_input_reaches_the_child() {
        let dir = tempfile::tempdir().unwrap();
        let script = r#"read first; read second; test "$first" = y && test "$second" = y"#;
        run_with_input("sh", &args(&["-c", script]), dir.path(), "y\ny\n")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn closed_stdin_does_not_block() {
        let dir = tempfile::tempdir().unwrap();
        run_with_input("sh", &args(&["-c", "cat > /dev/null"]), dir.path(), "")
            .await
            .unwrap();
    }
}
