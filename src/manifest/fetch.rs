use crate::config::ManifestConfig;
use crate::error::FetchFailure;
use std::fs;
use std::time::{Duration, Instant};
use subprocess::{Exec, ExitStatus, NullFile, Popen};

/// What happened when the updated manifest was requested
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Downloaded into the cache path during this run
    Fetched { elapsed: Duration },
    /// A cache file already existed, so nothing was downloaded
    ///
    /// The existing file is never revalidated; a stale download from an
    /// earlier run stays in use until it is deleted.
    AlreadyCached,
    /// Transient failure, safe to continue with local data
    ///
    /// Anything the tool wrote to the cache path has been removed.
    Failed(FetchFailure),
}

impl FetchOutcome {
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Download the updated manifest into its cache path unless it is already there
///
/// Runs `<fetch_tool> --log-level warn -f <remote_url> <updated_path>` and waits
/// at most `fetch_timeout`. A child that outlives the timeout is killed.
/// On failure the cache path is cleared so a partial file is never loaded.
pub fn fetch_updated(config: &ManifestConfig) -> FetchOutcome {
    if config.updated_path.exists() {
        tracing::debug!(
            "Updated manifest already cached at {}",
            config.updated_path.display()
        );
        return FetchOutcome::AlreadyCached;
    }

    tracing::info!(
        "Downloading updated weights manifest from {}",
        config.remote_url
    );

    let outcome = run_fetch_tool(config);
    match &outcome {
        FetchOutcome::Fetched { elapsed } => tracing::info!(
            "Downloading {} took: {:.2}s",
            config.remote_url,
            elapsed.as_secs_f64()
        ),
        FetchOutcome::Failed(FetchFailure::TimedOut(_)) => {
            tracing::warn!("Download from {} timed out", config.remote_url);
        }
        FetchOutcome::Failed(reason) => {
            tracing::warn!("Failed to download {}: {reason}", config.remote_url);
        }
        FetchOutcome::AlreadyCached => {}
    }

    // The path did not exist before this fetch, so anything there is partial
    if outcome.is_failed() && config.updated_path.exists() {
        if let Err(e) = fs::remove_file(&config.updated_path) {
            tracing::warn!(
                "Failed to remove partial manifest {}: {e}",
                config.updated_path.display()
            );
        }
    }
    outcome
}

fn run_fetch_tool(config: &ManifestConfig) -> FetchOutcome {
    let tool = match which::which(&config.fetch_tool) {
        Ok(path) => path,
        Err(_) => return FetchOutcome::Failed(FetchFailure::ToolMissing(config.fetch_tool.clone())),
    };

    let start = Instant::now();
    let mut process = match Exec::cmd(&tool)
        .arg("--log-level")
        .arg("warn")
        .arg("-f")
        .arg(&config.remote_url)
        .arg(&config.updated_path)
        .stdout(NullFile)
        .popen()
    {
        Ok(process) => process,
        Err(e) => return FetchOutcome::Failed(FetchFailure::Spawn(e.to_string())),
    };

    let timeout = config.fetch_timeout();
    match process.wait_timeout(timeout) {
        Ok(Some(status)) if status.success() => FetchOutcome::Fetched {
            elapsed: start.elapsed(),
        },
        Ok(Some(status)) => FetchOutcome::Failed(FetchFailure::Exit(describe_status(status))),
        Ok(None) => {
            terminate(&mut process);
            FetchOutcome::Failed(FetchFailure::TimedOut(timeout))
        }
        Err(e) => {
            terminate(&mut process);
            FetchOutcome::Failed(FetchFailure::Spawn(e.to_string()))
        }
    }
}

/// Kill and reap the fetch tool
fn terminate(process: &mut Popen) {
    if let Err(e) = process.kill() {
        tracing::warn!("Failed to kill fetch tool: {e}");
    }
    if let Err(e) = process.wait() {
        tracing::warn!("Failed to reap fetch tool: {e}");
    }
}

fn describe_status(status: ExitStatus) -> String {
    match status {
        ExitStatus::Exited(code) => format!("exit code {code}"),
        ExitStatus::Signaled(signal) => format!("killed by signal {signal}"),
        ExitStatus::Other(raw) => format!("wait status {raw}"),
        ExitStatus::Undetermined => "unknown exit status".to_string(),
    }
}
