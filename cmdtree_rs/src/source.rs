//! The invoking party of a dispatch and the permission check applied to it.
//!
//! Platform adapters implement [`Source`] around their own sender type; the
//! engine only ever talks to it through `reply`, `warn` and `error`.

/// Whoever issued the command line.
pub trait Source: Send + Sync {
    /// Stable identifier, used to key per-source state such as cooldowns.
    fn name(&self) -> &str;

    fn reply(&self, message: &str);

    fn warn(&self, message: &str);

    fn error(&self, message: &str);

    fn is_console(&self) -> bool {
        false
    }
}

/// Output channel a message is delivered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnswerKind {
    Reply,
    Warn,
    Error,
}

impl AnswerKind {
    pub fn send(&self, source: &dyn Source, message: &str) {
        match self {
            AnswerKind::Reply => source.reply(message),
            AnswerKind::Warn => source.warn(message),
            AnswerKind::Error => source.error(message),
        }
    }
}

/// Decides whether a source holds a permission node.
///
/// `None` means "no permission required" and implementations should answer
/// `true` for it.
pub trait PermissionResolver: Send + Sync {
    fn has_permission(&self, source: &dyn Source, permission: Option<&str>) -> bool;
}

/// Grants everything. Installed when no resolver is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAll;

impl PermissionResolver for AllowAll {
    fn has_permission(&self, _source: &dyn Source, _permission: Option<&str>) -> bool {
        true
    }
}

impl<F> PermissionResolver for F
where
    F: Fn(&dyn Source, &str) -> bool + Send + Sync,
{
    fn has_permission(&self, source: &dyn Source, permission: Option<&str>) -> bool {
        permission.is_none_or(|permission| self(source, permission))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording source shared by unit tests.

    use std::sync::Mutex;

    use super::{AnswerKind, Source};

    #[derive(Default)]
    pub struct RecordingSource {
        pub name: String,
        pub messages: Mutex<Vec<(AnswerKind, String)>>,
    }

    impl RecordingSource {
        pub fn named(name: &str) -> Self {
            Self {
                name: name.to_string(),
                messages: Mutex::new(Vec::new()),
            }
        }

        pub fn take(&self) -> Vec<(AnswerKind, String)> {
            std::mem::take(&mut *self.messages.lock().unwrap())
        }
    }

    impl Source for RecordingSource {
        fn name(&self) -> &str {
            &self.name
        }

        fn reply(&self, message: &str) {
            self.messages
                .lock()
                .unwrap()
                .push((AnswerKind::Reply, message.to_string()));
        }

        fn warn(&self, message: &str) {
            self.messages
                .lock()
                .unwrap()
                .push((AnswerKind::Warn, message.to_string()));
        }

        fn error(&self, message: &str) {
            self.messages
                .lock()
                .unwrap()
                .push((AnswerKind::Error, message.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingSource;
    use super::*;

    #[test]
    fn test_answer_kind_picks_channel() {
        let source = RecordingSource::named("tester");
        AnswerKind::Warn.send(&source, "careful");
        AnswerKind::Error.send(&source, "nope");
        assert_eq!(
            source.take(),
            vec![
                (AnswerKind::Warn, "careful".to_string()),
                (AnswerKind::Error, "nope".to_string())
            ]
        );
    }

    #[test]
    fn test_closure_permission_resolver() {
        let source = RecordingSource::named("tester");
        let resolver = |_: &dyn Source, node: &str| node.starts_with("user.");
        assert!(resolver.has_permission(&source, None));
        assert!(resolver.has_permission(&source, Some("user.chat")));
        assert!(!resolver.has_permission(&source, Some("admin.ban")));
        assert!(AllowAll.has_permission(&source, Some("admin.ban")));
    }
}
