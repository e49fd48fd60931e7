//! Registration phase.
//!
//! Everything that mutates registries happens here, before [`build`] hands
//! out the read-only [`Dispatcher`].
//!
//! [`build`]: DispatcherBuilder::build

use std::sync::Arc;

use super::Dispatcher;
use crate::command::{Command, CommandId};
use crate::config::DispatcherConfig;
use crate::error::{CommandError, ErrorKind};
use crate::processors::{
    CommandPostProcessor, CommandPreProcessor, UsageCooldownProcessor, UsagePermissionProcessor,
};
use crate::resolvers::{
    BoolResolver, ContextResolver, EnumResolver, FloatResolver, IntResolver, StaticSuggestions,
    StringResolver, SuggestionRegistry, SuggestionResolver, TypeHierarchy, TypeRegistry,
    UuidResolver, ValueResolver,
};
use crate::source::{AllowAll, PermissionResolver, Source};
use crate::throwable::ThrowableChain;
use crate::types::ArgType;
use crate::verification::{DefaultUsageVerifier, UsageVerifier};

pub struct DispatcherBuilder {
    inner: Dispatcher,
    verifier: Box<dyn UsageVerifier>,
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatcherBuilder {
    /// Builder with the built-in resolvers, processors and error handlers.
    pub fn new() -> Self {
        let mut values: TypeRegistry<dyn ValueResolver> = TypeRegistry::new();
        values.register(ArgType::STRING, Arc::new(StringResolver));
        values.register(ArgType::INT, Arc::new(IntResolver));
        values.register(ArgType::FLOAT, Arc::new(FloatResolver));
        values.register(ArgType::BOOL, Arc::new(BoolResolver));
        values.register(ArgType::UUID, Arc::new(UuidResolver));
        values.register(ArgType::ENUM, Arc::new(EnumResolver));

        let mut suggestions = SuggestionRegistry::default();
        suggestions.register(
            ArgType::BOOL,
            Arc::new(StaticSuggestions::new(["true", "false"])),
        );

        let cooldowns = Arc::new(UsageCooldownProcessor::new());
        let pre_processors: Vec<Arc<dyn CommandPreProcessor>> = vec![
            Arc::new(UsagePermissionProcessor),
            Arc::clone(&cooldowns) as Arc<dyn CommandPreProcessor>,
        ];
        let post_processors: Vec<Arc<dyn CommandPostProcessor>> =
            vec![cooldowns as Arc<dyn CommandPostProcessor>];

        let inner = Dispatcher {
            config: DispatcherConfig::default(),
            registry: Default::default(),
            hierarchy: TypeHierarchy::default(),
            values,
            contexts: TypeRegistry::new(),
            suggestions,
            permissions: Arc::new(AllowAll),
            pre_processors,
            post_processors,
            throwables: ThrowableChain::default(),
        };
        Self {
            inner,
            verifier: Box::new(DefaultUsageVerifier),
        }
    }

    pub fn config(&mut self, config: DispatcherConfig) -> &mut Self {
        self.inner.config = config;
        self
    }

    pub fn permission_resolver(&mut self, resolver: impl PermissionResolver + 'static) -> &mut Self {
        self.inner.permissions = Arc::new(resolver);
        self
    }

    /// Replaces the verifier for commands registered from now on.
    pub fn verifier(&mut self, verifier: impl UsageVerifier + 'static) -> &mut Self {
        self.verifier = Box::new(verifier);
        self
    }

    /// Declares `supertype` as a parent of `ty` for resolver fallback.
    pub fn declare_supertype(&mut self, ty: ArgType, supertype: ArgType) -> &mut Self {
        self.inner.hierarchy.declare(ty, supertype);
        self
    }

    pub fn register_value_resolver(
        &mut self,
        ty: ArgType,
        resolver: impl ValueResolver + 'static,
    ) -> &mut Self {
        self.inner.values.register(ty, Arc::new(resolver));
        self
    }

    pub fn register_context_resolver(
        &mut self,
        ty: ArgType,
        resolver: impl ContextResolver + 'static,
    ) -> &mut Self {
        self.inner.contexts.register(ty, Arc::new(resolver));
        self
    }

    pub fn register_suggestion_resolver(
        &mut self,
        ty: ArgType,
        resolver: impl SuggestionResolver + 'static,
    ) -> &mut Self {
        self.inner.suggestions.register(ty, Arc::new(resolver));
        self
    }

    /// Resolver picked by parameters declaring `suggest_with(name)`.
    pub fn register_named_suggestion_resolver(
        &mut self,
        name: impl Into<String>,
        resolver: impl SuggestionResolver + 'static,
    ) -> &mut Self {
        self.inner.suggestions.register_named(name, Arc::new(resolver));
        self
    }

    pub fn register_pre_processor(&mut self, processor: impl CommandPreProcessor + 'static) -> &mut Self {
        self.inner.pre_processors.push(Arc::new(processor));
        self
    }

    /// Inserts at `priority`, clamped to the current list length.
    pub fn insert_pre_processor(
        &mut self,
        priority: usize,
        processor: impl CommandPreProcessor + 'static,
    ) -> &mut Self {
        let index = priority.min(self.inner.pre_processors.len());
        self.inner.pre_processors.insert(index, Arc::new(processor));
        self
    }

    pub fn register_post_processor(&mut self, processor: impl CommandPostProcessor + 'static) -> &mut Self {
        self.inner.post_processors.push(Arc::new(processor));
        self
    }

    pub fn insert_post_processor(
        &mut self,
        priority: usize,
        processor: impl CommandPostProcessor + 'static,
    ) -> &mut Self {
        let index = priority.min(self.inner.post_processors.len());
        self.inner.post_processors.insert(index, Arc::new(processor));
        self
    }

    pub fn set_throwable_resolver<F>(&mut self, kind: ErrorKind, handler: F) -> &mut Self
    where
        F: Fn(&CommandError, &dyn Source) + Send + Sync + 'static,
    {
        self.inner.throwables.set(kind, handler);
        self
    }

    /// Stores a subcommand node without making it a top-level command.
    ///
    /// The returned handle may be passed to `Command::sub_command` on any
    /// number of parents.
    pub fn attach(&mut self, command: Command) -> Result<CommandId, CommandError> {
        self.insert(command, false)
    }

    /// Verifies every usage and usage pair of `command`, then registers it.
    ///
    /// A rejected command is logged and not registered.
    pub fn register_command(&mut self, command: Command) -> Result<CommandId, CommandError> {
        self.insert(command, true)
    }

    fn insert(&mut self, command: Command, root: bool) -> Result<CommandId, CommandError> {
        let name = command.name().to_string();
        self.inner
            .registry
            .insert(command, self.verifier.as_ref(), root)
            .inspect_err(|error| {
                tracing::error!(command = %name, error = %error, "command registration rejected");
            })
    }

    pub fn build(self) -> Dispatcher {
        tracing::debug!(
            commands = self.inner.registry.registered_commands().count(),
            nodes = self.inner.registry.len(),
            "dispatcher ready"
        );
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandParameter, CommandUsage};

    #[test]
    fn test_rejected_registration_is_reported() {
        let mut builder = DispatcherBuilder::new();
        let usage = |name: &str| {
            CommandUsage::new().parameter(CommandParameter::required(name, ArgType::STRING))
        };
        let result = builder.register_command(Command::new("give").usage(usage("a")).usage(usage("b")));
        assert!(matches!(
            result,
            Err(CommandError::AmbiguousUsageAddition { .. })
        ));

        let dispatcher = builder.build();
        assert!(dispatcher.get_command("give").is_none());
    }

    #[test]
    fn test_builtin_resolvers_and_supertype_fallback() {
        let mut builder = DispatcherBuilder::new();
        builder.declare_supertype(ArgType::named("port"), ArgType::INT);
        let dispatcher = builder.build();

        assert!(dispatcher.value_resolver(&ArgType::STRING).is_some());
        assert!(dispatcher.value_resolver(&ArgType::named("port")).is_some());
        assert!(dispatcher
            .value_resolver(&ArgType::enumeration("mode", ["a"]))
            .is_some());
        assert!(dispatcher.value_resolver(&ArgType::named("player")).is_none());
    }

    #[test]
    fn test_processor_priority_insert() {
        struct Marker;
        impl CommandPreProcessor for Marker {
            fn process(
                &self,
                _: &crate::context::Context<'_>,
                _: &CommandUsage,
            ) -> Result<(), CommandError> {
                Ok(())
            }
        }

        let mut builder = DispatcherBuilder::new();
        builder.insert_pre_processor(0, Marker);
        builder.insert_pre_processor(99, Marker);
        assert_eq!(builder.build().pre_processors.len(), 4);
    }
}
