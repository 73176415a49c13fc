//! Process launching
//!
//! [`Launcher`] is the seam between the invoker and the operating system.
//! [`ProcessLauncher`] starts the player and returns immediately; a detached
//! task reaps the child and logs how it ended.

use crate::registry::PlayerCommand;
use std::process::Stdio;
use tokio::process::Command;

/// Starts a player command without waiting for it to finish
pub trait Launcher: Send + Sync {
    /// Launch `command`
    ///
    /// Returns once the process exists. Errors only cover the launch itself.
    fn launch(&self, command: &PlayerCommand) -> std::io::Result<()>;
}

/// Launches players as child processes of the server
///
/// Must be called from within a Tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn launch(&self, command: &PlayerCommand) -> std::io::Result<()> {
        let mut child = Command::new(command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        let pid = child.id();
        let label = command.to_string();
        tracing::debug!(pid, command = %label, "Player process started");

        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if status.success() => {
                    tracing::debug!(pid, command = %label, "Player finished");
                }
                Ok(status) => {
                    tracing::warn!(pid, command = %label, %status, "Player exited with failure");
                }
                Err(e) => {
                    tracing::warn!(pid, command = %label, error = %e, "Failed to wait for player");
                }
            }
        });

        Ok(())
    }
}
