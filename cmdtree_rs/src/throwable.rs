//! Error kind to handler table.
//!
//! Handlers are looked up along [`ErrorKind::lineage`], most specific first.
//! Errors nobody handles are logged, never shown to the source.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{CommandError, ErrorKind, cooldown_seconds};
use crate::source::Source;

pub type ThrowableHandler = Arc<dyn Fn(&CommandError, &dyn Source) + Send + Sync>;

pub struct ThrowableChain {
    handlers: HashMap<ErrorKind, ThrowableHandler>,
}

impl Default for ThrowableChain {
    /// Chain with the stock handlers installed.
    fn default() -> Self {
        let mut chain = Self::empty();
        chain.set(ErrorKind::PermissionDenied, |_, source| {
            source.error("You don't have permission to use this command!");
        });
        chain.set(ErrorKind::Cooldown, |error, source| {
            if let CommandError::Cooldown { remaining } = error {
                source.error(&format!(
                    "Please wait {} second(s) to execute this command again!",
                    cooldown_seconds(*remaining)
                ));
            }
        });
        chain.set(ErrorKind::InvalidSyntax, |error, source| {
            source.error(&error.to_string());
        });
        chain.set(ErrorKind::UnknownCommand, |error, source| {
            if let CommandError::UnknownCommand { label, suggestion } = error {
                let mut message = format!("Unknown command '{label}'");
                if let Some(suggestion) = suggestion {
                    message.push_str(&format!("\nDid you mean '{suggestion}'?"));
                }
                source.error(&message);
            }
        });
        chain.set(ErrorKind::ContextResolveFailure, |error, source| {
            source.error(&error.to_string());
        });
        chain
    }
}

impl ThrowableChain {
    /// A chain without any handlers.
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn set<F>(&mut self, kind: ErrorKind, handler: F)
    where
        F: Fn(&CommandError, &dyn Source) + Send + Sync + 'static,
    {
        self.handlers.insert(kind, Arc::new(handler));
    }

    pub fn remove(&mut self, kind: ErrorKind) -> Option<ThrowableHandler> {
        self.handlers.remove(&kind)
    }

    /// Closest handler for `kind`, walking up to [`ErrorKind::Any`].
    pub fn resolver_for(&self, kind: ErrorKind) -> Option<&ThrowableHandler> {
        kind.lineage().find_map(|kind| self.handlers.get(&kind))
    }

    /// Delivers `error` to `source`. Returns `false` when nothing handled it.
    pub fn handle(&self, error: &CommandError, source: &dyn Source) -> bool {
        if error.handle_self(source) {
            return true;
        }
        match self.resolver_for(error.kind()) {
            Some(handler) => {
                handler(error, source);
                true
            }
            None => {
                tracing::error!(kind = ?error.kind(), error = %error, source = source.name(), "unhandled command error");
                false
            }
        }
    }
}
