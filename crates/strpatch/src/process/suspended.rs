//! Platform launchers that create a process without letting it run.

use std::path::Path;

use super::{HeldProcess, ProcessLauncher};
use crate::error::Result;

/// Launches the target with the platform's suspended-start mechanism.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuspendedLauncher;

impl ProcessLauncher for SuspendedLauncher {
    type Process = SuspendedProcess;

    fn launch(&self, path: &Path) -> Result<SuspendedProcess> {
        SuspendedProcess::spawn(path)
    }
}

// --- Windows ---

#[cfg(target_os = "windows")]
pub struct SuspendedProcess {
    process: windows::Win32::Foundation::HANDLE,
    thread: windows::Win32::Foundation::HANDLE,
    job: Option<windows::Win32::Foundation::HANDLE>,
    pid: u32,
}

#[cfg(target_os = "windows")]
impl SuspendedProcess {
    /// `CreateProcessW` with `CREATE_SUSPENDED`: the primary thread is never scheduled.
    fn spawn(path: &Path) -> Result<Self> {
        use windows::Win32::System::Threading::{
            CREATE_SUSPENDED, CreateProcessW, PROCESS_INFORMATION, STARTUPINFOW,
        };
        use windows::core::{HSTRING, PCWSTR, PWSTR};

        use crate::error::Error;

        let application = HSTRING::from(path.as_os_str());
        let startup = STARTUPINFOW {
            cb: std::mem::size_of::<STARTUPINFOW>() as u32,
            ..Default::default()
        };
        let mut info = PROCESS_INFORMATION::default();

        // SAFETY: `application` outlives the call, `startup` is initialised with
        // its size and `info` is a valid out-pointer.
        unsafe {
            CreateProcessW(
                &application,
                PWSTR::null(),
                None,
                None,
                false,
                CREATE_SUSPENDED,
                None,
                PCWSTR::null(),
                &startup,
                &mut info,
            )
        }
        .map_err(|e| Error::ProcessCreation {
            path: path.to_path_buf(),
            code: win32_code(&e),
            message: e.message().to_string(),
        })?;

        let job = match kill_on_close_job(info.hProcess) {
            Ok(job) => Some(job),
            Err(e) => {
                tracing::warn!("Failed to attach kill-on-close job: {}", e);
                None
            }
        };

        Ok(Self {
            process: info.hProcess,
            thread: info.hThread,
            job,
            pid: info.dwProcessId,
        })
    }
}

/// The `GetLastError` value behind a failed call, or the raw HRESULT when
/// the failure did not come from Win32.
#[cfg(target_os = "windows")]
fn win32_code(error: &windows::core::Error) -> i32 {
    use windows::Win32::Foundation::WIN32_ERROR;

    WIN32_ERROR::from_error(error)
        .map(|code| code.0 as i32)
        .unwrap_or(error.code().0)
}

/// Put the process in a job that kills it when the last handle closes, so it
/// cannot outlive an abnormal exit of this program.
#[cfg(target_os = "windows")]
fn kill_on_close_job(
    process: windows::Win32::Foundation::HANDLE,
) -> windows::core::Result<windows::Win32::Foundation::HANDLE> {
    use windows::Win32::Foundation::CloseHandle;
    use windows::Win32::System::JobObjects::{
        AssignProcessToJobObject, CreateJobObjectW, JOB_OBJECT_LIMIT_KILL_ON_JOB_CLOSE,
        JOBOBJECT_EXTENDED_LIMIT_INFORMATION, JobObjectExtendedLimitInformation,
        SetInformationJobObject,
    };
    use windows::core::PCWSTR;

    // SAFETY: CreateJobObjectW with no attributes and no name creates an anonymous job.
    let job = unsafe { CreateJobObjectW(None, PCWSTR::null())? };

    let mut limits = JOBOBJECT_EXTENDED_LIMIT_INFORMATION::default();
    limits.BasicLimitInformation.LimitFlags = JOB_OBJECT_LIMIT_KILL_ON_JOB_CLOSE;

    // SAFETY: `limits` matches the JobObjectExtendedLimitInformation class and
    // both handles are valid for the duration of the calls.
    let attached = unsafe {
        SetInformationJobObject(
            job,
            JobObjectExtendedLimitInformation,
            &limits as *const _ as *const std::ffi::c_void,
            std::mem::size_of::<JOBOBJECT_EXTENDED_LIMIT_INFORMATION>() as u32,
        )
        .and_then(|_| AssignProcessToJobObject(job, process))
    };

    if let Err(e) = attached {
        // SAFETY: `job` was returned by CreateJobObjectW above.
        unsafe {
            let _ = CloseHandle(job);
        }
        return Err(e);
    }

    Ok(job)
}

#[cfg(target_os = "windows")]
impl HeldProcess for SuspendedProcess {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn terminate(&mut self) -> Result<()> {
        use windows::Win32::System::Threading::TerminateProcess;

        // SAFETY: `self.process` is the process handle from CreateProcessW and
        // has not been closed yet.
        unsafe { TerminateProcess(self.process, 0) }.map_err(|e| {
            crate::error::Error::ProcessTermination {
                pid: self.pid,
                message: e.message().to_string(),
            }
        })
    }
}

#[cfg(target_os = "windows")]
impl Drop for SuspendedProcess {
    fn drop(&mut self) {
        use windows::Win32::Foundation::CloseHandle;

        // SAFETY: each handle is owned by this value and closed exactly once.
        unsafe {
            let _ = CloseHandle(self.thread);
            let _ = CloseHandle(self.process);
            if let Some(job) = self.job.take() {
                let _ = CloseHandle(job);
            }
        }
    }
}

// --- Linux ---

#[cfg(target_os = "linux")]
pub struct SuspendedProcess {
    child: std::process::Child,
    reaped: bool,
}

#[cfg(target_os = "linux")]
impl SuspendedProcess {
    /// Fork, request tracing and exec. The kernel stops the child at the first
    /// instruction of the new image, before any of its code runs.
    fn spawn(path: &Path) -> Result<Self> {
        use std::io;
        use std::os::unix::process::CommandExt;
        use std::process::{Command, Stdio};

        use crate::error::Error;

        let mut command = Command::new(path);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // SAFETY: the hook runs between fork and exec and only makes
        // async-signal-safe syscalls without allocating.
        unsafe {
            command.pre_exec(|| {
                if libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGKILL as libc::c_ulong) == -1 {
                    return Err(io::Error::last_os_error());
                }
                if libc::ptrace(
                    libc::PTRACE_TRACEME,
                    0 as libc::pid_t,
                    std::ptr::null_mut::<libc::c_void>(),
                    std::ptr::null_mut::<libc::c_void>(),
                ) == -1
                {
                    return Err(io::Error::last_os_error());
                }
                Ok(())
            });
        }

        let child = command.spawn().map_err(|e| Error::ProcessCreation {
            path: path.to_path_buf(),
            code: e.raw_os_error().unwrap_or(-1),
            message: e.to_string(),
        })?;

        Ok(Self {
            child,
            reaped: false,
        })
    }
}

#[cfg(target_os = "linux")]
impl HeldProcess for SuspendedProcess {
    fn pid(&self) -> u32 {
        self.child.id()
    }

    fn terminate(&mut self) -> Result<()> {
        use crate::error::Error;

        if self.reaped {
            return Ok(());
        }

        let pid = self.child.id();
        self.child
            .kill()
            .map_err(|e| Error::ProcessTermination {
                pid,
                message: e.to_string(),
            })?;

        // As the tracer we also see the exec stop, so wait until the kill is reported.
        loop {
            let mut status = 0;
            // SAFETY: `pid` is our own unreaped child.
            let rc = unsafe { libc::waitpid(pid as libc::pid_t, &mut status, 0) };
            if rc == -1 {
                let err = std::io::Error::last_os_error();
                if err.kind() == std::io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(Error::ProcessTermination {
                    pid,
                    message: err.to_string(),
                });
            }
            if libc::WIFEXITED(status) || libc::WIFSIGNALED(status) {
                break;
            }
        }

        self.reaped = true;
        Ok(())
    }
}

// --- Other platforms ---

#[cfg(not(any(target_os = "windows", target_os = "linux")))]
pub struct SuspendedProcess {
    pid: u32,
}

#[cfg(not(any(target_os = "windows", target_os = "linux")))]
impl SuspendedProcess {
    fn spawn(path: &Path) -> Result<Self> {
        Err(crate::error::Error::ProcessCreation {
            path: path.to_path_buf(),
            code: -1,
            message: "Suspended launch is not supported on this platform".to_string(),
        })
    }
}

#[cfg(not(any(target_os = "windows", target_os = "linux")))]
impl HeldProcess for SuspendedProcess {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn terminate(&mut self) -> Result<()> {
        Ok(())
    }
}
