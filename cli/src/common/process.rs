//! # PackRS Process Execution Utilities (`common::process`)
//!
//! File: cli/src/common/process.rs
//!
//! ## Overview
//!
//! Runs external commands and maps their failures into the standard
//! `PackrsError::ExternalCommand` error. Output is captured rather than
//! inherited so that a failing tool's diagnostics end up in the error message
//! instead of scrolling past.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::process;
//! use std::time::Duration;
//!
//! # async fn run(app_dir: &std::path::Path) -> anyhow::Result<()> {
//! let output = process::run_command_capture(
//!     "zip",
//!     &["-r", "/tmp/app.zip", "."],
//!     Some(app_dir),
//!     Some(Duration::from_secs(600)),
//! )
//! .await?;
//! println!("{}", output.stdout);
//! # Ok(())
//! # }
//! ```
//!
use crate::core::error::{PackrsError, Result};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tracing::{debug, error, info};

/// Captured output of a finished command.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// # Run Command and Capture Output (`run_command_capture`)
///
/// Executes `program` with `args`, optionally inside `cwd`, and waits for it
/// to exit. Standard input is closed; stdout and stderr are captured.
///
/// With a `timeout`, the child is killed once the deadline passes.
///
/// ## Errors
///
/// Returns `PackrsError::ExternalCommand` when the program cannot be started,
/// exits non-zero, or times out. The error's `output` carries whatever the
/// command printed.
pub async fn run_command_capture(
    program: &str,
    args: &[&str],
    cwd: Option<&Path>,
    timeout: Option<Duration>,
) -> Result<CommandOutput> {
    let cmd_line = format!("{} {}", program, args.join(" "));
    info!("Executing command: {}", cmd_line);

    let mut command = tokio::process::Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = cwd {
        debug!("Setting CWD for command to {}", dir.display());
        command.current_dir(dir);
    }

    let run = command.output();
    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, run).await {
            Ok(result) => result,
            Err(_) => {
                error!("Command '{}' timed out after {:?}", cmd_line, limit);
                return Err(PackrsError::ExternalCommand {
                    cmd: cmd_line,
                    status: format!("timed out after {}s", limit.as_secs()),
                    output: String::new(),
                }
                .into());
            }
        },
        None => run.await,
    };

    let output = result.map_err(|e| PackrsError::ExternalCommand {
        cmd: cmd_line.clone(),
        status: "failed to start".to_string(),
        output: format!("{}. Is '{}' installed and in PATH?", e, program),
    })?;

    let captured = CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    if !output.status.success() {
        let exit_code = output
            .status
            .code()
            .map_or("?".to_string(), |c| c.to_string());
        error!("Command '{}' failed with exit code {}", cmd_line, exit_code);
        return Err(PackrsError::ExternalCommand {
            cmd: cmd_line,
            status: exit_code,
            output: format!("{}{}", captured.stdout, captured.stderr),
        }
        .into());
    }

    debug!("Command '{}' completed successfully.", cmd_line);
    Ok(captured)
}
