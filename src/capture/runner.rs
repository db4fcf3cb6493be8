//! Command execution.
//!
//! [`CommandRunner`] is the seam between capture and the operating system.
//! [`ShellRunner`] runs commands through `/bin/sh -c`; tests substitute a
//! runner that returns canned outcomes.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

/// How often a running child is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Result of running one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The process ran to completion; `code` is `None` when it was killed
    /// by a signal
    Exited {
        stdout: Vec<u8>,
        stderr: Vec<u8>,
        code: Option<i32>,
    },
    /// The process outlived its timeout and was killed
    TimedOut,
    /// The process could not be started
    SpawnFailed(String),
}

impl CommandOutcome {
    /// A successful run with the given stdout.
    pub fn success(stdout: impl Into<Vec<u8>>) -> Self {
        Self::Exited {
            stdout: stdout.into(),
            stderr: Vec::new(),
            code: Some(0),
        }
    }

    /// A run that exited with `code` and wrote `stderr`.
    pub fn failure(code: i32, stderr: impl Into<Vec<u8>>) -> Self {
        Self::Exited {
            stdout: Vec::new(),
            stderr: stderr.into(),
            code: Some(code),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Exited { code: Some(0), .. })
    }
}

/// Capability to execute a command and collect its output.
pub trait CommandRunner {
    /// Run `command` in `cwd`, killing it after `timeout`.
    fn run(&self, command: &str, cwd: &Path, timeout: Duration) -> CommandOutcome;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, command: &str, cwd: &Path, timeout: Duration) -> CommandOutcome {
        (**self).run(command, cwd, timeout)
    }
}

/// Runs commands through a POSIX shell.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: PathBuf,
}

impl ShellRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::with_shell("/bin/sh")
    }

    /// Use another shell; it is invoked as `<shell> -c <command>`.
    pub fn with_shell(shell: impl Into<PathBuf>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str, cwd: &Path, timeout: Duration) -> CommandOutcome {
        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c")
            .arg(command)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // Background jobs the command starts join this group and die with it.
            cmd.process_group(0);
        }
        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => return CommandOutcome::SpawnFailed(e.to_string()),
        };

        // Pipes are drained concurrently so a chatty child cannot block on a
        // full pipe while we wait for it.
        let (tx, rx) = mpsc::channel();
        drain(Stream::Stdout, child.stdout.take(), tx.clone());
        drain(Stream::Stderr, child.stderr.take(), tx);

        let deadline = Instant::now() + timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    tracing::warn!("Command timed out after {timeout:?}: {command}");
                    kill_process_group(&mut child);
                    return CommandOutcome::TimedOut;
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    kill_process_group(&mut child);
                    return CommandOutcome::SpawnFailed(format!("waiting for process: {e}"));
                }
            }
        };

        // A background child holding stdout or stderr keeps the pipe open
        // after the shell exits; the deadline covers that wait too.
        let mut stdout = None;
        let mut stderr = None;
        while stdout.is_none() || stderr.is_none() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Ok((Stream::Stdout, buf)) => stdout = Some(buf),
                Ok((Stream::Stderr, buf)) => stderr = Some(buf),
                Err(RecvTimeoutError::Timeout) => {
                    tracing::warn!(
                        "Command output still open after {timeout:?}, killing its process group: {command}"
                    );
                    kill_process_group(&mut child);
                    return CommandOutcome::TimedOut;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        CommandOutcome::Exited {
            stdout: stdout.unwrap_or_default(),
            stderr: stderr.unwrap_or_default(),
            code: status.code(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

fn drain<R: Read + Send + 'static>(
    stream: Stream,
    pipe: Option<R>,
    tx: Sender<(Stream, Vec<u8>)>,
) {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        // The receiver is gone once the command timed out.
        let _ = tx.send((stream, buf));
    });
}

/// Kill the shell and everything left in its process group, then reap it.
fn kill_process_group(child: &mut Child) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        if let Ok(pid) = i32::try_from(child.id()) {
            if let Err(e) = killpg(Pid::from_raw(pid), Signal::SIGKILL) {
                tracing::debug!("killpg({pid}) failed: {e}");
            }
        }
    }
    let _ = child.kill();
    let _ = child.wait();
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(10);

    fn cwd() -> PathBuf {
        std::env::temp_dir()
    }

    #[test]
    fn test_captures_stdout() {
        let outcome = ShellRunner::new().run("echo hello", &cwd(), TIMEOUT);
        assert_eq!(outcome, CommandOutcome::success("hello\n"));
        assert!(outcome.is_success());
    }

    #[test]
    fn test_non_zero_exit() {
        let outcome = ShellRunner::new().run("echo oops >&2; exit 3", &cwd(), TIMEOUT);
        assert_eq!(outcome, CommandOutcome::failure(3, "oops\n"));
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_missing_executable_is_a_failed_exit() {
        let outcome = ShellRunner::new().run("definitely-not-a-real-binary-xyz", &cwd(), TIMEOUT);
        match outcome {
            CommandOutcome::Exited { code, .. } => assert_eq!(code, Some(127)),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_runs_in_cwd() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("marker"), "").unwrap();
        let outcome = ShellRunner::new().run("ls", dir.path(), TIMEOUT);
        assert_eq!(outcome, CommandOutcome::success("marker\n"));
    }

    #[test]
    fn test_timeout_kills_command() {
        let started = Instant::now();
        let outcome = ShellRunner::new().run("exec sleep 5", &cwd(), Duration::from_millis(200));
        assert_eq!(outcome, CommandOutcome::TimedOut);
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_timeout_covers_background_child_holding_output() {
        let started = Instant::now();
        let outcome = ShellRunner::new().run("sleep 6 & echo hi", &cwd(), Duration::from_millis(500));
        assert_eq!(outcome, CommandOutcome::TimedOut);
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn test_detached_background_child_does_not_block() {
        let started = Instant::now();
        let outcome = ShellRunner::new().run(
            "sleep 6 >/dev/null 2>&1 & echo hi",
            &cwd(),
            Duration::from_secs(5),
        );
        assert_eq!(outcome, CommandOutcome::success("hi\n"));
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn test_missing_shell_is_spawn_failure() {
        let runner = ShellRunner::with_shell("/nonexistent/shell");
        let outcome = runner.run("true", &cwd(), TIMEOUT);
        assert!(matches!(outcome, CommandOutcome::SpawnFailed(_)));
    }
}
