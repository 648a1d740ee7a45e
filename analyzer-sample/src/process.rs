use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Captured output of a process that exited successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("could not start {program}: {source}")]
    Unavailable {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} did not finish within {} seconds", .timeout.as_secs_f64())]
    Timeout { program: String, timeout: Duration },

    #[error("{program} failed ({status}): {diagnostic}")]
    Failed {
        program: String,
        status: String,
        diagnostic: String,
    },

    #[error("i/o error around {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Run a command to completion, killing it once `timeout` has elapsed.
///
/// Stdin is closed; stdout and stderr are captured on background threads so
/// a chatty child cannot block on a full pipe. A non-zero exit becomes
/// [`ProcessError::Failed`] carrying the child's stderr (or stdout when
/// stderr is empty).
pub fn run_with_timeout(
    command: &mut Command,
    timeout: Duration,
) -> Result<ProcessOutput, ProcessError> {
    let program = command.get_program().to_string_lossy().into_owned();
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command.spawn().map_err(|source| ProcessError::Unavailable {
        program: program.clone(),
        source,
    })?;
    debug!(program = %program, pid = child.id(), "started external process");

    let stdout = child.stdout.take().map(spawn_reader);
    let stderr = child.stderr.take().map(spawn_reader);

    let status = wait_until(&mut child, Instant::now() + timeout).map_err(|source| {
        ProcessError::Io {
            program: program.clone(),
            source,
        }
    })?;

    let Some(status) = status else {
        warn!(program = %program, ?timeout, "external process timed out, killed");
        return Err(ProcessError::Timeout { program, timeout });
    };

    let stdout = collect(stdout);
    let stderr = collect(stderr);

    if !status.success() {
        let diagnostic = if stderr.trim().is_empty() {
            stdout.trim().to_string()
        } else {
            stderr.trim().to_string()
        };
        return Err(ProcessError::Failed {
            program,
            status: status.to_string(),
            diagnostic,
        });
    }

    debug!(program = %program, bytes = stdout.len(), "external process finished");
    Ok(ProcessOutput { stdout, stderr })
}

/// Poll until the child exits or the deadline passes. On timeout the child is
/// killed and reaped and `None` is returned.
fn wait_until(child: &mut Child, deadline: Instant) -> io::Result<Option<ExitStatus>> {
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(Some(status)),
            Ok(None) => {}
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(e);
            }
        }

        if Instant::now() >= deadline {
            let _ = child.kill();
            child.wait()?;
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

fn collect(reader: Option<JoinHandle<Vec<u8>>>) -> String {
    reader
        .and_then(|handle| handle.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_captures_stdout() {
        let output =
            run_with_timeout(Command::new("echo").arg("hello"), Duration::from_secs(10)).unwrap();
        assert_eq!(output.stdout, "hello\n");
        assert!(output.stderr.is_empty());
    }

    #[test]
    fn test_missing_binary_is_unavailable() {
        let err = run_with_timeout(
            &mut Command::new("/nonexistent/bridge-analyzer-test-binary"),
            Duration::from_secs(1),
        )
        .unwrap_err();
        assert!(matches!(err, ProcessError::Unavailable { .. }), "{:?}", err);
    }

    #[test]
    fn test_timeout_kills_process() {
        let started = Instant::now();
        let err = run_with_timeout(Command::new("sleep").arg("10"), Duration::from_millis(200))
            .unwrap_err();
        assert!(matches!(err, ProcessError::Timeout { .. }), "{:?}", err);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_nonzero_exit_carries_stderr() {
        let err = run_with_timeout(
            Command::new("sh").args(["-c", "echo partial; echo oops >&2; exit 3"]),
            Duration::from_secs(10),
        )
        .unwrap_err();
        match err {
            ProcessError::Failed { diagnostic, .. } => assert_eq!(diagnostic, "oops"),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_nonzero_exit_falls_back_to_stdout() {
        let err = run_with_timeout(
            Command::new("sh").args(["-c", "echo parse error; exit 1"]),
            Duration::from_secs(10),
        )
        .unwrap_err();
        assert!(err.to_string().ends_with("parse error"), "{}", err);
    }
}
