//! Typed errors raised by registration, matching and resolution.
//!
//! Every [`CommandError`] variant maps to an [`ErrorKind`]. Kinds form a small
//! explicit hierarchy (see [`ErrorKind::parent`]) that the throwable chain walks
//! from most specific to most general when looking for a handler.

use std::time::Duration;

use thiserror::Error;

use crate::source::{AnswerKind, Source};
use crate::types::NumericRange;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("permission denied{}", permission_suffix(.permission))]
    PermissionDenied { permission: Option<String> },

    #[error("unknown command '{label}'")]
    UnknownCommand {
        label: String,
        /// Closest registered name, when one is close enough.
        suggestion: Option<String>,
    },

    #[error(transparent)]
    InvalidSyntax(#[from] SyntaxError),

    #[error("cannot resolve '{raw}' as {expected}: {reason}")]
    ContextResolveFailure {
        raw: String,
        expected: String,
        reason: String,
    },

    #[error("value {value} of '{parameter}' is outside {range}")]
    NumberOutOfRange {
        parameter: String,
        value: f64,
        range: NumericRange,
    },

    #[error("command is on cooldown for another {}s", remaining_secs(.remaining))]
    Cooldown { remaining: Duration },

    /// A message meant for the invoking source, delivered on its own channel.
    #[error("{message}")]
    SourceAnswer { kind: AnswerKind, message: String },

    #[error("command '{command}' declares an invalid usage '{usage}': {violation}")]
    InvalidUsageStructure {
        command: String,
        usage: String,
        violation: StructureViolation,
    },

    #[error("command '{command}' has ambiguous usages '{first}' and '{second}'")]
    AmbiguousUsageAddition {
        command: String,
        first: String,
        second: String,
    },
}

/// Why input did not fit any usage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("Unknown command, usage '{raw}' is unknown.")]
    UnknownUsage { raw: String },

    #[error("Missing required arguments '{missing}'\n Full syntax: '{syntax}'")]
    MissingArguments { missing: String, syntax: String },
}

/// Structural rule a usage broke at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StructureViolation {
    #[error("usage has no parameters")]
    Empty,
    #[error("usage has more than one greedy parameter")]
    MultipleGreedy,
    #[error("greedy parameter is not the last parameter")]
    GreedyNotLast,
    #[error("first parameter is optional")]
    OptionalFirst,
}

/// Tag identifying the kind of a [`CommandError`], used to key handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Root of the hierarchy; a handler here catches everything.
    Any,
    PermissionDenied,
    UnknownCommand,
    InvalidSyntax,
    ContextResolveFailure,
    NumberOutOfRange,
    Cooldown,
    SourceAnswer,
    /// Parent of the registration-time kinds.
    Registration,
    InvalidUsageStructure,
    AmbiguousUsageAddition,
}

impl ErrorKind {
    /// The next more general kind, or `None` at the root.
    pub fn parent(self) -> Option<ErrorKind> {
        match self {
            ErrorKind::Any => None,
            ErrorKind::NumberOutOfRange => Some(ErrorKind::ContextResolveFailure),
            ErrorKind::InvalidUsageStructure | ErrorKind::AmbiguousUsageAddition => {
                Some(ErrorKind::Registration)
            }
            _ => Some(ErrorKind::Any),
        }
    }

    /// This kind followed by every ancestor up to [`ErrorKind::Any`].
    pub fn lineage(self) -> impl Iterator<Item = ErrorKind> {
        std::iter::successors(Some(self), |kind| kind.parent())
    }
}

impl CommandError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommandError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            CommandError::UnknownCommand { .. } => ErrorKind::UnknownCommand,
            CommandError::InvalidSyntax(_) => ErrorKind::InvalidSyntax,
            CommandError::ContextResolveFailure { .. } => ErrorKind::ContextResolveFailure,
            CommandError::NumberOutOfRange { .. } => ErrorKind::NumberOutOfRange,
            CommandError::Cooldown { .. } => ErrorKind::Cooldown,
            CommandError::SourceAnswer { .. } => ErrorKind::SourceAnswer,
            CommandError::InvalidUsageStructure { .. } => ErrorKind::InvalidUsageStructure,
            CommandError::AmbiguousUsageAddition { .. } => ErrorKind::AmbiguousUsageAddition,
        }
    }

    /// Shorthand for a resolver rejecting raw input.
    pub fn resolve_failure(
        raw: impl Into<String>,
        expected: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        CommandError::ContextResolveFailure {
            raw: raw.into(),
            expected: expected.to_string(),
            reason: reason.into(),
        }
    }

    /// An error message delivered to the source on the error channel.
    pub fn answer(message: impl Into<String>) -> Self {
        CommandError::SourceAnswer {
            kind: AnswerKind::Error,
            message: message.into(),
        }
    }

    pub fn is_registration(&self) -> bool {
        self.kind().lineage().any(|kind| kind == ErrorKind::Registration)
    }

    /// Delivers the error itself when it describes its own handling.
    ///
    /// Returns `false` when a handler has to be looked up instead.
    pub fn handle_self(&self, source: &dyn Source) -> bool {
        match self {
            CommandError::SourceAnswer { kind, message } => {
                kind.send(source, message);
                true
            }
            _ => false,
        }
    }
}

fn permission_suffix(permission: &Option<String>) -> String {
    permission
        .as_deref()
        .map(|p| format!(" ({p})"))
        .unwrap_or_default()
}

fn remaining_secs(remaining: &Duration) -> u64 {
    let secs = remaining.as_secs();
    if remaining.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}

pub(crate) fn cooldown_seconds(remaining: Duration) -> u64 {
    remaining_secs(&remaining)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_lineage_walks_to_root() {
        let lineage: Vec<_> = ErrorKind::NumberOutOfRange.lineage().collect();
        assert_eq!(
            lineage,
            vec![
                ErrorKind::NumberOutOfRange,
                ErrorKind::ContextResolveFailure,
                ErrorKind::Any
            ]
        );
        assert_eq!(ErrorKind::Any.parent(), None);
    }

    #[test]
    fn test_registration_kinds() {
        let err = CommandError::AmbiguousUsageAddition {
            command: "ban".into(),
            first: "<a>".into(),
            second: "<b>".into(),
        };
        assert!(err.is_registration());
        assert!(!CommandError::answer("nope").is_registration());
    }

    #[test]
    fn test_display_messages() {
        let err = CommandError::PermissionDenied {
            permission: Some("command.ban".into()),
        };
        assert_eq!(err.to_string(), "permission denied (command.ban)");

        let err = CommandError::Cooldown {
            remaining: Duration::from_millis(1500),
        };
        assert_eq!(err.to_string(), "command is on cooldown for another 2s");

        let err: CommandError = SyntaxError::UnknownUsage {
            raw: "foo bar".into(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::InvalidSyntax);
        assert_eq!(err.to_string(), "Unknown command, usage 'foo bar' is unknown.");
    }
}
