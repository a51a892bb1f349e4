//! Execution of the fixed `sudo tlp ...` command set.

mod stats;

use std::process::Output;
use std::time::Duration;

use tokio::process::Command;

pub use stats::summarize;

/// Upper bound on any tlp invocation, in case sudo ends up waiting on
/// input it will never receive.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(20);

const TLP_START: &[&str] = &["tlp", "start"];
const TLP_FULLCHARGE: &[&str] = &["tlp", "fullcharge"];
const TLP_STAT: &[&str] = &["tlp-stat", "-b"];

#[derive(Debug, thiserror::Error)]
pub enum TlpError {
    #[error("command not found: {command}")]
    CommandNotFound { command: String },

    #[error("`{command}` failed with exit code {code}:\n{stderr}")]
    ToolFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("system error while running `{command}`: {source}")]
    System {
        command: String,
        source: std::io::Error,
    },

    #[error("`{command}` timed out after {COMMAND_TIMEOUT:?}")]
    Timeout { command: String },
}

/// The charging behavior the UI has asked tlp for.
///
/// Only a successful [`toggle`] call moves this; it is never inferred
/// from parsed stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Default,
    Recharge,
}

impl Profile {
    pub fn toggled(self) -> Self {
        match self {
            Profile::Default => Profile::Recharge,
            Profile::Recharge => Profile::Default,
        }
    }

    /// The tlp invocation that switches away from this profile.
    fn toggle_args(self) -> &'static [&'static str] {
        match self {
            Profile::Default => TLP_FULLCHARGE,
            Profile::Recharge => TLP_START,
        }
    }
}

/// Reset tlp to its configured defaults so the UI starts from a known
/// profile. A failure here is fatal to the caller.
pub async fn initialize() -> Result<(), TlpError> {
    run_sudo(TLP_START).await.map(|_| ())
}

/// Switch to the other profile and return it. The returned profile is the
/// real device state: on any error the caller must keep its current value,
/// since the command did not run to completion.
pub async fn toggle(current: Profile) -> Result<Profile, TlpError> {
    run_sudo(current.toggle_args()).await?;
    let next = current.toggled();
    log::info!("profile changed: {:?} -> {:?}", current, next);
    Ok(next)
}

/// Raw `tlp-stat -b` output. Callers render errors inline rather than
/// treating them as fatal; stats are display-only.
pub async fn query_stats() -> Result<String, TlpError> {
    let output = run_sudo(TLP_STAT).await?;
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// PATH lookup for the tlp executable, checked before the UI comes up.
pub fn is_installed() -> bool {
    let Some(paths) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&paths).any(|dir| dir.join("tlp").is_file())
}

async fn run_sudo(args: &[&str]) -> Result<Output, TlpError> {
    run_command("sudo", args).await
}

async fn run_command(program: &str, args: &[&str]) -> Result<Output, TlpError> {
    let command = std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<&str>>()
        .join(" ");

    log::debug!("running `{}`", command);

    let result = tokio::time::timeout(COMMAND_TIMEOUT, Command::new(program).args(args).output())
        .await
        .map_err(|_| TlpError::Timeout {
            command: command.clone(),
        })?;

    let output = result.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            TlpError::CommandNotFound {
                command: program.to_string(),
            }
        } else {
            TlpError::System {
                command: command.clone(),
                source: e,
            }
        }
    })?;

    if output.status.success() {
        Ok(output)
    } else {
        Err(TlpError::ToolFailed {
            command,
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
