//! The frozen dispatcher and its entry points.
//!
//! - `builder`: [`DispatcherBuilder`], the mutable registration phase
//! - `complete`: cursor-aware autocompletion
//!
//! A [`Dispatcher`] is read-only once built, so any number of threads may
//! dispatch through a shared reference.

mod builder;
mod complete;

pub use builder::DispatcherBuilder;

use std::sync::Arc;

use crate::command::{Command, CommandId, CommandRegistry, CommandUsage};
use crate::config::DispatcherConfig;
use crate::context::{ArgumentQueue, Context, ResolvedContext};
use crate::error::{CommandError, SyntaxError};
use crate::matching::{self, UsageMatch};
use crate::processors::{CommandPostProcessor, CommandPreProcessor};
use crate::resolvers::{
    ContextResolver, SuggestionRegistry, TypeHierarchy, TypeRegistry, ValueResolver,
};
use crate::source::{PermissionResolver, Source};
use crate::throwable::ThrowableChain;
use crate::types::{ArgType, MatchResult};

pub struct Dispatcher {
    config: DispatcherConfig,
    registry: CommandRegistry,
    hierarchy: TypeHierarchy,
    values: TypeRegistry<dyn ValueResolver>,
    contexts: TypeRegistry<dyn ContextResolver>,
    suggestions: SuggestionRegistry,
    permissions: Arc<dyn PermissionResolver>,
    pre_processors: Vec<Arc<dyn CommandPreProcessor>>,
    post_processors: Vec<Arc<dyn CommandPostProcessor>>,
    throwables: ThrowableChain,
}

impl Dispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn hierarchy(&self) -> &TypeHierarchy {
        &self.hierarchy
    }

    pub fn suggestions(&self) -> &SuggestionRegistry {
        &self.suggestions
    }

    pub fn throwables(&self) -> &ThrowableChain {
        &self.throwables
    }

    pub fn permission_resolver(&self) -> &dyn PermissionResolver {
        self.permissions.as_ref()
    }

    pub fn value_resolver(&self, ty: &ArgType) -> Option<Arc<dyn ValueResolver>> {
        self.values.lookup(ty, &self.hierarchy)
    }

    pub fn context_resolver(&self, ty: &ArgType) -> Option<Arc<dyn ContextResolver>> {
        self.contexts.lookup(ty, &self.hierarchy)
    }

    pub fn get_command(&self, name: &str) -> Option<CommandId> {
        self.registry.get_command(name)
    }

    pub fn get_sub_command(&self, owner: CommandId, name: &str) -> Option<CommandId> {
        self.registry.get_sub_command(owner, name)
    }

    pub fn command(&self, id: CommandId) -> Option<&Command> {
        self.registry.command(id)
    }

    pub fn registered_commands(&self) -> impl Iterator<Item = (CommandId, &Command)> + '_ {
        self.registry
            .registered_commands()
            .filter_map(|id| self.registry.command(id).map(|command| (id, command)))
    }

    /// Selects a usage for the input without resolving or executing anything.
    pub fn match_usage<I>(&self, command: CommandId, arguments: I) -> UsageMatch
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let arguments: ArgumentQueue = arguments.into_iter().collect();
        matching::find_usage(&self.registry, command, &arguments)
    }

    /// Dispatches to the command registered under `label`.
    ///
    /// Errors go through the throwable chain and yield [`MatchResult::Unknown`].
    pub fn dispatch<I>(&self, source: &dyn Source, label: &str, arguments: I) -> MatchResult
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let result = self.try_dispatch(source, label, arguments);
        self.settle(source, result)
    }

    /// Like [`dispatch`](Self::dispatch), splitting `line` on whitespace.
    pub fn dispatch_line(&self, source: &dyn Source, label: &str, line: &str) -> MatchResult {
        self.dispatch(source, label, line.split_whitespace())
    }

    pub fn dispatch_command<I>(&self, source: &dyn Source, command: CommandId, arguments: I) -> MatchResult
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let result = self.try_dispatch_command(source, command, arguments);
        self.settle(source, result)
    }

    /// Dispatch without error handling; the caller gets the error.
    pub fn try_dispatch<I>(
        &self,
        source: &dyn Source,
        label: &str,
        arguments: I,
    ) -> Result<MatchResult, CommandError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let Some(id) = self.get_command(label) else {
            return Err(self.unknown_command(label));
        };
        self.execute(source, id, label, arguments.into_iter().collect())
    }

    pub fn try_dispatch_command<I>(
        &self,
        source: &dyn Source,
        command: CommandId,
        arguments: I,
    ) -> Result<MatchResult, CommandError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let label = self
            .command(command)
            .map(|c| c.name().to_string())
            .unwrap_or_else(|| command.to_string());
        self.execute(source, command, &label, arguments.into_iter().collect())
    }

    fn settle(&self, source: &dyn Source, result: Result<MatchResult, CommandError>) -> MatchResult {
        match result {
            Ok(result) => result,
            Err(error) => {
                tracing::debug!(error = %error, "dispatch failed");
                self.throwables.handle(&error, source);
                MatchResult::Unknown
            }
        }
    }

    fn unknown_command(&self, label: &str) -> CommandError {
        let suggestion = if self.config.suggestions.did_you_mean {
            self.closest_command(label)
        } else {
            None
        };
        CommandError::UnknownCommand {
            label: label.to_string(),
            suggestion,
        }
    }

    /// Closest root name or alias within the configured edit distance.
    fn closest_command(&self, label: &str) -> Option<String> {
        let input = label.to_lowercase();
        let mut best: Option<(&str, usize)> = None;
        for (_, command) in self.registered_commands() {
            for name in std::iter::once(command.name()).chain(command.aliases().iter().map(String::as_str)) {
                let distance = strsim::levenshtein(&input, &name.to_lowercase());
                if distance <= self.config.suggestions.max_distance
                    && best.is_none_or(|(_, best_distance)| distance < best_distance)
                {
                    best = Some((name, distance));
                }
            }
        }
        best.map(|(name, _)| name.to_string())
    }

    fn execute(
        &self,
        source: &dyn Source,
        id: CommandId,
        label: &str,
        arguments: ArgumentQueue,
    ) -> Result<MatchResult, CommandError> {
        let command = self
            .command(id)
            .ok_or_else(|| self.unknown_command(label))?;
        if !self.permissions.has_permission(source, command.permission()) {
            return Err(CommandError::PermissionDenied {
                permission: command.permission().map(str::to_string),
            });
        }

        let context = Context::new(self, source, id, label, arguments);
        if context.arguments().is_empty() {
            tracing::debug!(command = %command.name(), "empty input, running default usage");
            self.execute_default(&context, id)?;
            return Ok(MatchResult::Incomplete);
        }

        let found = matching::find_usage(&self.registry, id, context.arguments());
        match (found.result, found.usage, found.boundary) {
            (MatchResult::Complete, Some(index), _) => {
                let usage = &self.registry.usages(id)[index];
                self.execute_usage(&context, usage)?;
            }
            (MatchResult::Incomplete, _, Some(sub)) => {
                self.execute_default(&context, sub)?;
            }
            (MatchResult::Incomplete, Some(index), None) => {
                let usage = &self.registry.usages(id)[index];
                let missing = found
                    .missing
                    .iter()
                    .map(|p| p.format())
                    .collect::<Vec<_>>()
                    .join(" ");
                return Err(SyntaxError::MissingArguments {
                    missing,
                    syntax: usage.format(command.name(), &self.config.command_prefix),
                }
                .into());
            }
            _ => {
                return Err(SyntaxError::UnknownUsage {
                    raw: context.arguments().join(),
                }
                .into());
            }
        }
        Ok(found.result)
    }

    fn run_pre_processors(&self, context: &Context<'_>, usage: &CommandUsage) -> Result<(), CommandError> {
        self.pre_processors
            .iter()
            .try_for_each(|processor| processor.process(context, usage))
    }

    fn run_post_processors(&self, context: &ResolvedContext<'_>) -> Result<(), CommandError> {
        self.post_processors
            .iter()
            .try_for_each(|processor| processor.process(context))
    }

    fn execute_usage(&self, context: &Context<'_>, usage: &CommandUsage) -> Result<(), CommandError> {
        self.run_pre_processors(context, usage)?;

        let mut resolved = ResolvedContext::new(context, usage);
        resolved.resolve()?;

        self.run_post_processors(&resolved)?;
        match usage.action() {
            Some(action) => action(&resolved),
            None => Ok(()),
        }
    }

    /// Runs the default usage of `command` without binding any input.
    fn execute_default(&self, context: &Context<'_>, command: CommandId) -> Result<(), CommandError> {
        let Some(node) = self.command(command) else {
            return Ok(());
        };
        if !self.permissions.has_permission(context.source(), node.permission()) {
            return Err(CommandError::PermissionDenied {
                permission: node.permission().map(str::to_string),
            });
        }
        let usage = node.default_usage();
        self.run_pre_processors(context, usage)?;

        let resolved = ResolvedContext::new(context, usage).at_command(command);
        self.run_post_processors(&resolved)?;
        match usage.action() {
            Some(action) => action(&resolved),
            None => Ok(()),
        }
    }
}
