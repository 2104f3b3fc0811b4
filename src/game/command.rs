//! Command grammar for agent output lines.
//!
//! Three mutually exclusive forms, keywords case-insensitive:
//!
//! ```text
//! GOTO <SAMPLES|DIAGNOSIS|MOLECULES|LABORATORY> [annotation]
//! CONNECT [A-E | integer] [annotation]
//! WAIT [annotation]
//! ```
//!
//! Parsing is purely syntactic. Whether an argument makes sense at the
//! agent's location is decided later, when the command is staged.

use crate::game::location::Location;
use crate::game::molecule::Molecule;

/// Annotations longer than this are shortened for display.
pub const MAX_ANNOTATION_CHARS: usize = 19;

/// Characters kept in front of the ellipsis when shortening.
const KEPT_CHARS: usize = 17;

const ELLIPSIS: &str = "...";

/// Raw `CONNECT` argument. Either a single molecule letter or an integer,
/// kept verbatim so failure messages can echo it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectArg(String);

impl ConnectArg {
    fn parse(token: &str) -> Option<Self> {
        let digits = token.strip_prefix('-').unwrap_or(token);
        let numeric = !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit());
        if numeric || Molecule::from_code(token).is_some() {
            Some(Self(token.to_string()))
        } else {
            None
        }
    }

    /// The argument text as submitted.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The argument read as a molecule letter.
    #[must_use]
    pub fn molecule(&self) -> Option<Molecule> {
        Molecule::from_code(&self.0)
    }

    /// The argument read as an integer.
    #[must_use]
    pub fn integer(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

/// One parsed agent command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start travelling.
    Goto {
        /// Destination module.
        target: Location,
        /// Trailing free text.
        annotation: Option<String>,
    },
    /// Interact with the module the robot stands at.
    Connect {
        /// Module-specific argument.
        arg: Option<ConnectArg>,
        /// Trailing free text.
        annotation: Option<String>,
    },
    /// Do nothing.
    Wait {
        /// Trailing free text.
        annotation: Option<String>,
    },
}

impl Command {
    /// The command's annotation, if any.
    #[must_use]
    pub fn annotation(&self) -> Option<&str> {
        match self {
            Self::Goto { annotation, .. }
            | Self::Connect { annotation, .. }
            | Self::Wait { annotation } => annotation.as_deref(),
        }
    }
}

/// Split off the first whitespace-delimited token.
fn split_token(text: &str) -> (&str, &str) {
    match text.find(char::is_whitespace) {
        Some(end) => (&text[..end], &text[end..]),
        None => (text, ""),
    }
}

fn annotation_of(rest: &str) -> Option<String> {
    let text = rest.trim_start();
    (!text.is_empty()).then(|| text.to_string())
}

/// Parse one output line. `None` means no grammar matched.
#[must_use]
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (keyword, rest) = split_token(line);

    if keyword.eq_ignore_ascii_case("GOTO") {
        let (target, rest) = split_token(rest.trim_start());
        let target = Location::from_goto_target(target)?;
        Some(Command::Goto {
            target,
            annotation: annotation_of(rest),
        })
    } else if keyword.eq_ignore_ascii_case("CONNECT") {
        let body = rest.trim_start();
        let (token, after) = split_token(body);
        match ConnectArg::parse(token) {
            Some(arg) => Some(Command::Connect {
                arg: Some(arg),
                annotation: annotation_of(after),
            }),
            None => Some(Command::Connect {
                arg: None,
                annotation: annotation_of(body),
            }),
        }
    } else if keyword.eq_ignore_ascii_case("WAIT") {
        Some(Command::Wait {
            annotation: annotation_of(rest),
        })
    } else {
        None
    }
}

/// Shorten text over [`MAX_ANNOTATION_CHARS`] characters to its first 17
/// characters and an ellipsis.
#[must_use]
pub fn truncate_annotation(text: &str) -> String {
    if text.chars().count() > MAX_ANNOTATION_CHARS {
        let mut short: String = text.chars().take(KEPT_CHARS).collect();
        short.push_str(ELLIPSIS);
        short
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goto() {
        assert_eq!(
            parse_command("GOTO MOLECULES"),
            Some(Command::Goto {
                target: Location::Molecules,
                annotation: None,
            })
        );
        assert_eq!(
            parse_command("goto laboratory  on my way"),
            Some(Command::Goto {
                target: Location::Laboratory,
                annotation: Some("on my way".to_string()),
            })
        );
    }

    #[test]
    fn test_goto_rejects_unknown_and_start() {
        assert_eq!(parse_command("GOTO"), None);
        assert_eq!(parse_command("GOTO START_POS"), None);
        assert_eq!(parse_command("GOTO SAMPLESX"), None);
    }

    #[test]
    fn test_connect_arguments() {
        let Some(Command::Connect { arg, annotation }) = parse_command("CONNECT 12 hi") else {
            panic!("expected connect");
        };
        assert_eq!(arg.unwrap().integer(), Some(12));
        assert_eq!(annotation.as_deref(), Some("hi"));

        let Some(Command::Connect { arg, .. }) = parse_command("connect b") else {
            panic!("expected connect");
        };
        assert_eq!(arg.unwrap().molecule(), Some(Molecule::B));

        let Some(Command::Connect { arg, .. }) = parse_command("CONNECT -3") else {
            panic!("expected connect");
        };
        assert_eq!(arg.unwrap().integer(), Some(-3));
    }

    #[test]
    fn test_connect_non_argument_becomes_annotation() {
        assert_eq!(
            parse_command("CONNECT Apple pie"),
            Some(Command::Connect {
                arg: None,
                annotation: Some("Apple pie".to_string()),
            })
        );
        assert_eq!(
            parse_command("CONNECT"),
            Some(Command::Connect {
                arg: None,
                annotation: None,
            })
        );
    }

    #[test]
    fn test_wait() {
        assert_eq!(parse_command("WAIT"), Some(Command::Wait { annotation: None }));
        assert_eq!(
            parse_command("Wait  zzz\r\n"),
            Some(Command::Wait {
                annotation: Some("zzz".to_string()),
            })
        );
    }

    #[test]
    fn test_garbage() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("WAITING"), None);
        assert_eq!(parse_command(" WAIT"), None);
        assert_eq!(parse_command("MOVE 1 2"), None);
    }

    #[test]
    fn test_truncate_annotation() {
        assert_eq!(truncate_annotation("short"), "short");
        assert_eq!(truncate_annotation("exactly nineteen ch"), "exactly nineteen ch");
        assert_eq!(truncate_annotation("twenty characters!!!"), "twenty characters...");
        assert_eq!(truncate_annotation("ééééééééééééééééééééé").chars().count(), 20);
    }
}
