//! Global hooks around usage execution.
//!
//! Pre-processors see the plain context and the selected usage before any
//! resolver runs; post-processors see the resolved context. The first error
//! stops the chain and the usage never executes.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::command::{CommandId, CommandUsage};
use crate::context::{Context, ResolvedContext};
use crate::error::CommandError;
use crate::source::Source;

pub trait CommandPreProcessor: Send + Sync {
    fn process(&self, context: &Context<'_>, usage: &CommandUsage) -> Result<(), CommandError>;
}

pub trait CommandPostProcessor: Send + Sync {
    fn process(&self, context: &ResolvedContext<'_>) -> Result<(), CommandError>;
}

/// Checks the usage permission and the permission of every subcommand the
/// usage passes through.
#[derive(Debug, Default, Clone, Copy)]
pub struct UsagePermissionProcessor;

impl CommandPreProcessor for UsagePermissionProcessor {
    fn process(&self, context: &Context<'_>, usage: &CommandUsage) -> Result<(), CommandError> {
        let dispatcher = context.dispatcher();
        let permissions = dispatcher.permission_resolver();
        let source = context.source();

        let sub_permissions = usage
            .sub_command_params()
            .filter_map(|p| p.sub_command_id())
            .filter_map(|id| dispatcher.registry().command(id))
            .map(|command| command.permission());

        for permission in std::iter::once(usage.permission()).chain(sub_permissions) {
            if !permissions.has_permission(source, permission) {
                return Err(CommandError::PermissionDenied {
                    permission: permission.map(str::to_string),
                });
            }
        }
        Ok(())
    }
}

/// In-memory cooldowns keyed by source name and usage.
///
/// Registered as both a pre- and a post-processor sharing one table: the
/// pre-processor rejects a usage still cooling down, the post-processor
/// records the execution time. Input that fails to resolve never starts a
/// cooldown.
#[derive(Debug, Default)]
pub struct UsageCooldownProcessor {
    last_executed: Mutex<HashMap<(String, String), Instant>>,
}

impl UsageCooldownProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(source: &dyn Source, command: CommandId, usage: &CommandUsage) -> (String, String) {
        (source.name().to_string(), format!("{}:{}", command, usage.key()))
    }

    fn table(&self) -> MutexGuard<'_, HashMap<(String, String), Instant>> {
        self.last_executed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl CommandPreProcessor for UsageCooldownProcessor {
    fn process(&self, context: &Context<'_>, usage: &CommandUsage) -> Result<(), CommandError> {
        let Some(cooldown) = usage.cooldown() else {
            return Ok(());
        };

        let key = Self::key(context.source(), context.command(), usage);
        if let Some(last) = self.table().get(&key) {
            let elapsed = Instant::now().saturating_duration_since(*last);
            if elapsed < cooldown {
                return Err(CommandError::Cooldown {
                    remaining: cooldown - elapsed,
                });
            }
        }
        Ok(())
    }
}

impl CommandPostProcessor for UsageCooldownProcessor {
    fn process(&self, context: &ResolvedContext<'_>) -> Result<(), CommandError> {
        let usage = context.detected_usage();
        if usage.cooldown().is_some() {
            let key = Self::key(context.source(), context.command(), usage);
            self.table().insert(key, Instant::now());
        }
        Ok(())
    }
}
