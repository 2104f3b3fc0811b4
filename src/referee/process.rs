//! Agents running as child processes.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{LinkError, SetupError};
use crate::referee::AgentLink;

/// A child process spoken to over its stdin and stdout.
///
/// Stdout is read on a background thread so that reads can time out.
/// Stderr lines are logged. The child is killed on drop.
#[derive(Debug)]
pub struct ProcessAgent {
    name: String,
    child: Child,
    stdin: Option<ChildStdin>,
    lines: Receiver<String>,
}

impl ProcessAgent {
    /// Launch `command_line`, split on whitespace into program and
    /// arguments.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty command or if the process cannot be
    /// started.
    pub fn spawn(command_line: &str) -> Result<Self, SetupError> {
        let mut parts = command_line.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| SetupError::MalformedLine(command_line.to_string()))?;
        let mut child = Command::new(program)
            .args(parts)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let name = command_line.to_string();
        let stdin = child.stdin.take();
        let (sender, lines) = mpsc::channel();
        if let Some(stdout) = child.stdout.take() {
            thread::spawn(move || {
                for line in BufReader::new(stdout).lines() {
                    let Ok(line) = line else { break };
                    if sender.send(line).is_err() {
                        break;
                    }
                }
            });
        }
        if let Some(stderr) = child.stderr.take() {
            let agent = name.clone();
            thread::spawn(move || {
                for line in BufReader::new(stderr).lines().map_while(Result::ok) {
                    warn!(agent = %agent, "{line}");
                }
            });
        }
        debug!(agent = %name, pid = child.id(), "agent process started");

        Ok(Self {
            name,
            child,
            stdin,
            lines,
        })
    }

    /// The command line this agent was started with.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl AgentLink for ProcessAgent {
    fn send(&mut self, lines: &[String]) -> Result<(), LinkError> {
        let stdin = self.stdin.as_mut().ok_or(LinkError::Closed)?;
        for line in lines {
            writeln!(stdin, "{line}")?;
        }
        stdin.flush()?;
        Ok(())
    }

    fn receive(&mut self, expected: usize, timeout: Duration) -> Result<Vec<String>, LinkError> {
        let deadline = Instant::now() + timeout;
        let mut out = Vec::with_capacity(expected);
        while out.len() < expected {
            let left = deadline.saturating_duration_since(Instant::now());
            match self.lines.recv_timeout(left) {
                Ok(line) => out.push(line),
                Err(RecvTimeoutError::Timeout) => return Err(LinkError::Timeout),
                Err(RecvTimeoutError::Disconnected) => return Err(LinkError::Closed),
            }
        }
        Ok(out)
    }
}

impl Drop for ProcessAgent {
    fn drop(&mut self) {
        self.stdin.take();
        if let Err(err) = self.child.kill() {
            debug!(agent = %self.name, %err, "agent process already gone");
        }
        let _ = self.child.wait();
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_echo_agent() {
        let mut agent = ProcessAgent::spawn("cat").unwrap();
        agent.send(&["WAIT".to_string()]).unwrap();
        let answer = agent.receive(1, Duration::from_secs(5)).unwrap();
        assert_eq!(answer, vec!["WAIT"]);
    }

    #[test]
    fn test_silent_agent_times_out() {
        let mut agent = ProcessAgent::spawn("sleep 5").unwrap();
        assert!(matches!(
            agent.receive(1, Duration::from_millis(20)),
            Err(LinkError::Timeout)
        ));
    }

    #[test]
    fn test_empty_command() {
        assert!(ProcessAgent::spawn("   ").is_err());
    }
}
