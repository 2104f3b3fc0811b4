//! Saved matches.
//!
//! A recording stores the configuration and every answer each agent gave,
//! as JSON. A `null` answer is a turn where the agent produced nothing in
//! time.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::MatchConfig;
use crate::error::RecordingError;

/// Answers given by each agent, in turn order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    /// `responses[agent][turn]`: the lines read, or `None` on failure.
    pub responses: Vec<Vec<Option<Vec<String>>>>,
}

impl Transcript {
    /// An empty transcript for `agent_count` agents.
    #[must_use]
    pub fn new(agent_count: usize) -> Self {
        Self {
            responses: vec![Vec::new(); agent_count],
        }
    }

    /// Append one turn for `agent`.
    pub fn push(&mut self, agent: usize, answer: Option<Vec<String>>) {
        if let Some(turns) = self.responses.get_mut(agent) {
            turns.push(answer);
        }
    }

    /// Number of agents.
    #[must_use]
    pub fn agent_count(&self) -> usize {
        self.responses.len()
    }

    /// Turns recorded for `agent`.
    #[must_use]
    pub fn turns(&self, agent: usize) -> &[Option<Vec<String>>] {
        self.responses.get(agent).map_or(&[], Vec::as_slice)
    }
}

/// A complete, replayable match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recording {
    /// Setup parameters, seed included.
    pub config: MatchConfig,
    /// Agent answers.
    #[serde(flatten)]
    pub transcript: Transcript,
}

impl Recording {
    /// Bundle a configuration with the answers it produced.
    #[must_use]
    pub fn new(config: MatchConfig, transcript: Transcript) -> Self {
        Self { config, transcript }
    }

    /// Write as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), RecordingError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Read a recording written by [`Recording::save`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a recording.
    pub fn load(path: &Path) -> Result<Self, RecordingError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_transcript_push() {
        let mut transcript = Transcript::new(2);
        transcript.push(0, Some(vec!["WAIT".to_string()]));
        transcript.push(1, None);
        transcript.push(5, None);
        assert_eq!(transcript.agent_count(), 2);
        assert_eq!(transcript.turns(0).len(), 1);
        assert_eq!(transcript.turns(1), &[None]);
        assert!(transcript.turns(7).is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let mut transcript = Transcript::new(2);
        transcript.push(0, Some(vec!["GOTO SAMPLES".to_string()]));
        transcript.push(1, None);
        let recording = Recording::new(MatchConfig::default().with_seed(77), transcript);

        let file = NamedTempFile::new().unwrap();
        recording.save(file.path()).unwrap();
        let loaded = Recording::load(file.path()).unwrap();
        assert_eq!(loaded, recording);

        let text = std::fs::read_to_string(file.path()).unwrap();
        assert!(text.contains("null"));
    }

    #[test]
    fn test_load_rejects_garbage() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "not json").unwrap();
        assert!(matches!(
            Recording::load(file.path()),
            Err(RecordingError::Format(_))
        ));
    }
}
