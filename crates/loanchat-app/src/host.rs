//! Desktop capabilities used to deliver the sanction letter.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use loanchat_config::schema::DownloadConfig;
use loanchat_core::DocumentHost;

/// How long to wait for the opener to report back before assuming it
/// handed the URL off.
const OPENER_WAIT: Duration = Duration::from_secs(3);

/// Opens URLs with the platform's default handler and saves fetched
/// documents to a download directory.
pub struct SystemHost {
    open_in_browser: bool,
    output_dir: PathBuf,
    opener: fn(&str) -> Command,
    opener_wait: Duration,
}

impl SystemHost {
    pub fn new(open_in_browser: bool, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            open_in_browser,
            output_dir: output_dir.into(),
            opener: open_command,
            opener_wait: OPENER_WAIT,
        }
    }

    #[cfg(test)]
    fn with_opener(mut self, opener: fn(&str) -> Command, wait: Duration) -> Self {
        self.opener = opener;
        self.opener_wait = wait;
        self
    }

    /// Falls back to the user's download directory, then the working directory.
    pub fn from_config(config: &DownloadConfig) -> Self {
        let output_dir = config
            .output_dir
            .as_ref()
            .map(PathBuf::from)
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(config.open_in_browser, output_dir)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

#[async_trait]
impl DocumentHost for SystemHost {
    async fn open_in_new_context(&self, url: &str) -> bool {
        if !self.open_in_browser {
            return false;
        }
        let spawned = (self.opener)(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => {
                warn!("failed to launch opener: {e}");
                return false;
            }
        };

        match tokio::time::timeout(self.opener_wait, child.wait()).await {
            Ok(Ok(status)) if status.success() => true,
            Ok(Ok(status)) => {
                debug!(%status, "opener refused the URL");
                false
            }
            Ok(Err(e)) => {
                warn!("waiting for opener failed: {e}");
                false
            }
            // Still running; the runtime reaps it once it exits.
            Err(_) => {
                debug!("opener still running, assuming the URL was handed off");
                true
            }
        }
    }

    async fn save_file(&self, filename: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self.output_dir.join(filename);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }
}

#[cfg(target_os = "macos")]
fn open_command(url: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(url);
    cmd
}

#[cfg(target_os = "windows")]
fn open_command(url: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", "", url]);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn open_command(url: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(url);
    cmd
}
