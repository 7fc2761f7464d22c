//! Suspended target process lifecycle.
//!
//! The target executable is launched suspended when a session starts and is
//! killed when the session ends. It never runs: the hold only ties a live
//! process instance to the file being patched.
//!
//! [`ProcessGuard`] owns the held process and terminates it on drop, so every
//! exit path of a session (save, failed save, closed input, error) tears it down.

mod suspended;

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::Result;

pub use suspended::{SuspendedLauncher, SuspendedProcess};

/// A launched process that has not been allowed to run.
pub trait HeldProcess {
    fn pid(&self) -> u32;

    /// Kill the process. Handles are released when the value is dropped.
    fn terminate(&mut self) -> Result<()>;
}

/// Creates held processes from an executable path.
pub trait ProcessLauncher {
    type Process: HeldProcess;

    fn launch(&self, path: &Path) -> Result<Self::Process>;
}

/// Owns a held process and terminates it exactly once.
pub struct ProcessGuard<P: HeldProcess> {
    process: Option<P>,
    path: PathBuf,
}

impl<P: HeldProcess> ProcessGuard<P> {
    /// Launch `path` suspended. Failure is fatal for the session.
    pub fn launch<L>(launcher: &L, path: &Path) -> Result<Self>
    where
        L: ProcessLauncher<Process = P>,
    {
        let process = launcher.launch(path)?;
        info!(
            "Holding {} suspended (pid {})",
            process_name(path),
            process.pid()
        );
        Ok(Self {
            process: Some(process),
            path: path.to_path_buf(),
        })
    }

    pub fn pid(&self) -> Option<u32> {
        self.process.as_ref().map(HeldProcess::pid)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Terminate now instead of waiting for drop.
    pub fn release(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        let Some(mut process) = self.process.take() else {
            return;
        };
        let pid = process.pid();
        match process.terminate() {
            Ok(()) => info!("Terminated suspended process (pid {})", pid),
            Err(e) => warn!("Failed to terminate suspended process (pid {}): {}", pid, e),
        }
    }
}

impl<P: HeldProcess> Drop for ProcessGuard<P> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// File name of the target, for log lines.
pub fn process_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}


#[cfg(test)]
mod tests {
    use super::fake::FakeLauncher;
    use super::*;

    #[test]
    fn test_guard_terminates_on_drop() {
        let launcher = FakeLauncher::default();
        {
            let guard = ProcessGuard::launch(&launcher, Path::new("game.exe")).unwrap();
            assert_eq!(guard.pid(), Some(4001));
            assert_eq!(guard.path(), Path::new("game.exe"));
        }
        let record = launcher.record.lock().unwrap();
        assert_eq!(record.launched, vec![PathBuf::from("game.exe")]);
        assert_eq!(record.terminated, vec![4001]);
    }

    #[test]
    fn test_release_terminates_once() {
        let launcher = FakeLauncher::default();
        let guard = ProcessGuard::launch(&launcher, Path::new("game.exe")).unwrap();
        guard.release();
        assert_eq!(launcher.record.lock().unwrap().terminated, vec![4001]);
    }

    #[test]
    fn test_termination_failure_is_not_escalated() {
        let launcher = FakeLauncher {
            fail_terminate: true,
            ..Default::default()
        };
        let guard = ProcessGuard::launch(&launcher, Path::new("game.exe")).unwrap();
        drop(guard);
        assert_eq!(launcher.record.lock().unwrap().terminated, vec![4001]);
    }

    #[test]
    fn test_launch_failure_propagates() {
        let launcher = FakeLauncher {
            fail_launch: true,
            ..Default::default()
        };
        let err = ProcessGuard::launch(&launcher, Path::new("missing.exe"))
            .err()
            .unwrap();
        assert!(err.is_fatal());
        assert!(launcher.record.lock().unwrap().terminated.is_empty());
    }

    #[test]
    fn test_process_name() {
        assert_eq!(process_name(Path::new("dir/sub/game.exe")), "game.exe");
        assert_eq!(process_name(Path::new("/")), "/");
    }
}
