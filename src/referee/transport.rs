//! How the scheduler talks to agents.
//!
//! Two transports exist. [`HarnessTransport`] speaks the `###` line
//! protocol to an outer harness that owns the agents. [`LinkTransport`]
//! talks to each agent directly through an [`AgentLink`]: a child process
//! or an in-process bot.

use std::fmt;
use std::io::{BufRead, Write};
use std::time::Duration;

use tracing::debug;

use crate::error::{LinkError, SetupError};
use crate::referee::Ranking;

/// What an agent receives at the start of a turn.
#[derive(Debug, Clone, Copy)]
pub struct TurnInput<'a> {
    /// Setup data, present only on the agent's first turn.
    pub setup: Option<&'a [String]>,
    /// The agent's view of the world.
    pub view: &'a [String],
}

impl TurnInput<'_> {
    /// Setup followed by view, as sent down a direct link.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = self.setup.map(<[String]>::to_vec).unwrap_or_default();
        lines.extend_from_slice(self.view);
        lines
    }
}

/// A channel to every agent in a match.
pub trait Transport {
    /// Announce an agent's first view before play starts.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel is broken.
    fn prime(&mut self, _agent: usize, _setup: &[String], _view: &[String]) -> Result<(), LinkError> {
        Ok(())
    }

    /// Send `input` to `agent` and read exactly `expected_lines` back.
    ///
    /// # Errors
    ///
    /// Returns an error when the agent does not answer in time or its
    /// channel is gone. The scheduler turns this into an elimination.
    fn exchange(
        &mut self,
        agent: usize,
        input: &TurnInput<'_>,
        expected_lines: usize,
        timeout: Duration,
    ) -> Result<Vec<String>, LinkError>;

    /// Report the final ranking.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel is broken.
    fn finish(&mut self, _ranking: &Ranking) -> Result<(), LinkError> {
        Ok(())
    }
}

/// Speaks the harness protocol over a reader and a writer.
///
/// ```text
/// <- ###Start 2
/// -> ###Input 0
/// -> ...view lines...
/// -> ###Output 0 1
/// <- GOTO SAMPLES
/// -> ###End 0 1
/// ```
///
/// Timing is the harness's job; the timeout passed to
/// [`Transport::exchange`] is ignored.
#[derive(Debug)]
pub struct HarnessTransport<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> HarnessTransport<R, W> {
    /// Read the `###Start N` handshake. Returns the transport and the
    /// announced agent count.
    ///
    /// # Errors
    ///
    /// Returns an error if the first line is not a valid handshake.
    pub fn connect(mut reader: R, writer: W) -> Result<(Self, usize), SetupError> {
        let mut line = String::new();
        reader.read_line(&mut line)?;
        let trimmed = line.trim();
        let agents = trimmed
            .strip_prefix("###Start ")
            .and_then(|n| n.trim().parse::<usize>().ok())
            .ok_or_else(|| SetupError::Handshake(trimmed.to_string()))?;
        debug!(agents, "harness handshake");
        Ok((Self { reader, writer }, agents))
    }

    fn send_input(&mut self, agent: usize, blocks: &[&[String]]) -> Result<(), LinkError> {
        writeln!(self.writer, "###Input {agent}")?;
        for block in blocks {
            for line in *block {
                writeln!(self.writer, "{line}")?;
            }
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> Transport for HarnessTransport<R, W> {
    fn prime(&mut self, agent: usize, setup: &[String], view: &[String]) -> Result<(), LinkError> {
        self.send_input(agent, &[setup, view])?;
        self.writer.flush()?;
        Ok(())
    }

    fn exchange(
        &mut self,
        agent: usize,
        input: &TurnInput<'_>,
        expected_lines: usize,
        _timeout: Duration,
    ) -> Result<Vec<String>, LinkError> {
        self.send_input(agent, &[input.view])?;
        writeln!(self.writer, "###Output {agent} {expected_lines}")?;
        self.writer.flush()?;

        let mut lines = Vec::with_capacity(expected_lines);
        for _ in 0..expected_lines {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Err(LinkError::Closed);
            }
            lines.push(line.trim_end_matches(['\r', '\n']).to_string());
        }
        Ok(lines)
    }

    fn finish(&mut self, ranking: &Ranking) -> Result<(), LinkError> {
        writeln!(self.writer, "###End {ranking}")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// A direct, line-oriented channel to one agent.
pub trait AgentLink: fmt::Debug {
    /// Deliver input lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the agent is gone.
    fn send(&mut self, lines: &[String]) -> Result<(), LinkError>;

    /// Read `expected` lines within `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::Timeout`] when the lines do not arrive in time,
    /// or another error if the agent is gone.
    fn receive(&mut self, expected: usize, timeout: Duration) -> Result<Vec<String>, LinkError>;
}

/// One [`AgentLink`] per agent.
#[derive(Debug, Default)]
pub struct LinkTransport {
    links: Vec<Box<dyn AgentLink>>,
}

impl LinkTransport {
    /// A transport over `links`, indexed by agent.
    #[must_use]
    pub fn new(links: Vec<Box<dyn AgentLink>>) -> Self {
        Self { links }
    }

    /// Number of links.
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// True when there are no links.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl Transport for LinkTransport {
    fn exchange(
        &mut self,
        agent: usize,
        input: &TurnInput<'_>,
        expected_lines: usize,
        timeout: Duration,
    ) -> Result<Vec<String>, LinkError> {
        let link = self.links.get_mut(agent).ok_or(LinkError::Closed)?;
        link.send(&input.lines())?;
        link.receive(expected_lines, timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_handshake() {
        let (_, agents) = HarnessTransport::connect(Cursor::new("###Start 2\n"), Vec::new()).unwrap();
        assert_eq!(agents, 2);
        assert!(matches!(
            HarnessTransport::connect(Cursor::new("hello\n"), Vec::new()),
            Err(SetupError::Handshake(_))
        ));
    }

    #[test]
    fn test_harness_exchange() {
        let input = Cursor::new("###Start 2\nWAIT\r\n");
        let (mut transport, _) = HarnessTransport::connect(input, Vec::new()).unwrap();
        let setup = lines(&["0"]);
        let view = lines(&["v1", "v2"]);
        transport.prime(1, &setup, &view).unwrap();
        let turn = TurnInput {
            setup: Some(&setup),
            view: &view,
        };
        let answer = transport
            .exchange(1, &turn, 1, Duration::from_millis(1))
            .unwrap();
        assert_eq!(answer, vec!["WAIT"]);
        assert!(matches!(
            transport.exchange(0, &turn, 1, Duration::from_millis(1)),
            Err(LinkError::Closed)
        ));
        transport.finish(&Ranking::from_scores(&[3, 3])).unwrap();

        let written = String::from_utf8(transport.writer).unwrap();
        assert_eq!(
            written,
            "###Input 1\n0\nv1\nv2\n###Input 1\nv1\nv2\n###Output 1 1\n\
             ###Input 0\nv1\nv2\n###Output 0 1\n###End 01\n"
        );
    }

    #[test]
    fn test_turn_input_lines() {
        let setup = lines(&["s"]);
        let view = lines(&["v"]);
        let first = TurnInput {
            setup: Some(&setup),
            view: &view,
        };
        assert_eq!(first.lines(), vec!["s", "v"]);
        let later = TurnInput {
            setup: None,
            view: &view,
        };
        assert_eq!(later.lines(), vec!["v"]);
    }
}
