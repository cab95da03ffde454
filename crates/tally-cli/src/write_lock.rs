//! Cross-process lock around commands that write the data directory.

use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const LOCK_FILE: &str = "tally.lock";
const LOCK_WAIT_TIMEOUT: Duration = Duration::from_secs(30);
const LOCK_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Removes the lock file on drop.
#[derive(Debug)]
pub struct WriteLockGuard {
    path: PathBuf,
}

impl Drop for WriteLockGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

#[derive(Debug, PartialEq, Eq)]
enum LockState {
    HeldBy(u32),
    Stale,
    Unreadable,
}

/// Wait until this process holds `<data_dir>/tally.lock`.
pub async fn acquire(data_dir: &Path) -> anyhow::Result<WriteLockGuard> {
    let lock_path = data_dir.join(LOCK_FILE);
    let started = Instant::now();

    loop {
        match try_acquire(&lock_path) {
            Ok(guard) => return Ok(guard),
            Err(LockState::Stale) => {
                tracing::debug!(path = %lock_path.display(), "removing stale write lock");
                let _ = std::fs::remove_file(&lock_path);
            }
            Err(state) => {
                if started.elapsed() >= LOCK_WAIT_TIMEOUT {
                    match state {
                        LockState::HeldBy(pid) => anyhow::bail!(
                            "another tly process (pid {pid}) is writing tasks; try again after it finishes"
                        ),
                        _ => anyhow::bail!(
                            "could not acquire write lock at {}; remove it if no tly process is running",
                            lock_path.display()
                        ),
                    }
                }
                tokio::time::sleep(LOCK_RETRY_DELAY).await;
            }
        }
    }
}

fn try_acquire(lock_path: &Path) -> Result<WriteLockGuard, LockState> {
    if let Some(parent) = lock_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    match OpenOptions::new().create_new(true).write(true).open(lock_path) {
        Ok(mut file) => {
            let _ = writeln!(file, "{}", std::process::id());
            Ok(WriteLockGuard {
                path: lock_path.to_path_buf(),
            })
        }
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
            let mut contents = String::new();
            OpenOptions::new()
                .read(true)
                .open(lock_path)
                .and_then(|mut file| file.read_to_string(&mut contents))
                .map_err(|_| LockState::Unreadable)?;

            match contents.trim().parse::<u32>() {
                Ok(pid) if is_process_running(pid) => Err(LockState::HeldBy(pid)),
                Ok(_) => Err(LockState::Stale),
                Err(_) => Err(LockState::Unreadable),
            }
        }
        Err(_) => Err(LockState::Unreadable),
    }
}

fn is_process_running(pid: u32) -> bool {
    if pid == std::process::id() {
        return true;
    }
    std::process::Command::new("kill")
        .arg("-0")
        .arg(pid.to_string())
        .stderr(std::process::Stdio::null())
        .status()
        .is_ok_and(|status| status.success())
}
