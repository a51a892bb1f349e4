//! Sudo credential handling: validate once with the entered password,
//! keep the timestamp fresh while the app runs, revoke on the way out.

use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::tlp::COMMAND_TIMEOUT;

/// How often the cached sudo timestamp is re-validated.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(600);

/// Password prompts before giving up.
pub const MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Incorrect password.")]
    WrongPassword,

    #[error("Authentication failed:\n{0}")]
    Rejected(String),

    #[error("sudo validation timed out after {COMMAND_TIMEOUT:?}")]
    Timeout,

    #[error("system error while running sudo: {0}")]
    System(#[from] std::io::Error),
}

/// Handle for the cached sudo credentials.
///
/// Acquired once at startup via [`AuthSession::acquire`]; dropping it runs
/// `sudo -K` so the timestamp does not outlive the app on any exit path.
#[derive(Debug)]
pub struct AuthSession {
    _private: (),
}

impl AuthSession {
    /// Validate the given password with `sudo -S -v`, caching credentials
    /// for the commands that follow. The password buffer is dropped as
    /// soon as the call returns.
    pub async fn acquire(password: &str) -> Result<Self, AuthError> {
        let mut child = Command::new("sudo")
            .args(["-S", "-v"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            // sudo reads the password up to the newline; errors here mean
            // sudo already exited and are reported through wait below.
            let _ = stdin.write_all(password.as_bytes()).await;
            let _ = stdin.write_all(b"\n").await;
        }

        let output = tokio::time::timeout(COMMAND_TIMEOUT, child.wait_with_output())
            .await
            .map_err(|_| AuthError::Timeout)??;

        if output.status.success() {
            log::info!("sudo credentials cached");
            return Ok(Self { _private: () });
        }

        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        if stderr.to_lowercase().contains("try again") {
            Err(AuthError::WrongPassword)
        } else {
            Err(AuthError::Rejected(stderr.trim().to_string()))
        }
    }

    /// Re-validate the cached timestamp with `sudo -n -v`. Non-interactive
    /// so an expired cache fails here instead of hanging on a prompt.
    pub async fn refresh(&self) -> Result<(), AuthError> {
        let result = tokio::time::timeout(
            COMMAND_TIMEOUT,
            Command::new("sudo").args(["-n", "-v"]).output(),
        )
        .await
        .map_err(|_| AuthError::Timeout)?;

        let output = result?;
        if output.status.success() {
            log::debug!("sudo credentials refreshed");
            Ok(())
        } else {
            Err(AuthError::Rejected(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ))
        }
    }
}

impl Drop for AuthSession {
    fn drop(&mut self) {
        // Best effort: the app is exiting either way.
        match std::process::Command::new("sudo").arg("-K").status() {
            Ok(_) => log::info!("sudo credentials revoked"),
            Err(e) => log::warn!("failed to revoke sudo credentials: {}", e),
        }
    }
}
