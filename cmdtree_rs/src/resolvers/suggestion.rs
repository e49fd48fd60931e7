//! Completion candidates per parameter.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::{TypeHierarchy, TypeRegistry};
use crate::command::{CommandId, CommandParameter, FLAG_PREFIX};
use crate::dispatcher::Dispatcher;
use crate::source::Source;
use crate::types::ArgType;

/// What is being completed: the typed tokens and the index of the token under
/// the cursor.
pub struct SuggestionContext<'a> {
    pub(crate) dispatcher: &'a Dispatcher,
    pub(crate) source: &'a dyn Source,
    pub(crate) command: CommandId,
    pub(crate) arguments: &'a [String],
    pub(crate) index: usize,
}

impl<'a> SuggestionContext<'a> {
    pub fn dispatcher(&self) -> &'a Dispatcher {
        self.dispatcher
    }

    pub fn source(&self) -> &'a dyn Source {
        self.source
    }

    pub fn command(&self) -> CommandId {
        self.command
    }

    pub fn arguments(&self) -> &'a [String] {
        self.arguments
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// The partial token under the cursor.
    pub fn current(&self) -> &'a str {
        self.arguments
            .get(self.index)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// The token right before the cursor, if any.
    pub fn previous(&self) -> Option<&'a str> {
        let index = self.index.checked_sub(1)?;
        self.arguments.get(index).map(String::as_str)
    }
}

/// Produces candidates for one parameter. Must not fail: an empty list is the
/// worst answer.
pub trait SuggestionResolver: Send + Sync {
    fn suggest(&self, context: &SuggestionContext<'_>, parameter: &CommandParameter) -> Vec<String>;
}

/// A fixed candidate list.
#[derive(Debug, Clone, Default)]
pub struct StaticSuggestions(Vec<String>);

impl StaticSuggestions {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(values.into_iter().map(Into::into).collect())
    }
}

impl SuggestionResolver for StaticSuggestions {
    fn suggest(&self, _: &SuggestionContext<'_>, _: &CommandParameter) -> Vec<String> {
        self.0.clone()
    }
}

/// Variant names of one enum type, captured the first time the type is seen.
#[derive(Debug, Clone)]
pub struct EnumSuggestions {
    variants: Vec<String>,
}

impl EnumSuggestions {
    pub fn for_type(ty: &ArgType) -> Self {
        Self {
            variants: ty.variants().map(<[String]>::to_vec).unwrap_or_default(),
        }
    }
}

impl SuggestionResolver for EnumSuggestions {
    fn suggest(&self, _: &SuggestionContext<'_>, _: &CommandParameter) -> Vec<String> {
        self.variants.clone()
    }
}

/// Flag names, or the flag's value when the token before the cursor is the
/// flag itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct FlagSuggestions;

impl SuggestionResolver for FlagSuggestions {
    fn suggest(&self, context: &SuggestionContext<'_>, parameter: &CommandParameter) -> Vec<String> {
        let Some(flag) = parameter.as_flag() else {
            return Vec::new();
        };

        if let Some(input_type) = flag.input_type()
            && context.previous().is_some_and(|token| flag.accepts_input(token))
        {
            let value = CommandParameter::optional(flag.name(), input_type.clone());
            let dispatcher = context.dispatcher();
            return dispatcher
                .suggestions()
                .lookup(&value, dispatcher.hierarchy())
                .map(|resolver| resolver.suggest(context, &value))
                .unwrap_or_default();
        }

        flag.names()
            .map(|name| format!("{FLAG_PREFIX}{name}"))
            .collect()
    }
}

/// Suggestion resolvers keyed by type, plus parameter-specific overrides by
/// name and the built-in enum and flag resolvers.
pub struct SuggestionRegistry {
    by_type: TypeRegistry<dyn SuggestionResolver>,
    named: HashMap<String, Arc<dyn SuggestionResolver>>,
    enums: RwLock<HashMap<ArgType, Arc<dyn SuggestionResolver>>>,
    flags: Arc<dyn SuggestionResolver>,
}

impl Default for SuggestionRegistry {
    fn default() -> Self {
        Self {
            by_type: TypeRegistry::new(),
            named: HashMap::new(),
            enums: RwLock::new(HashMap::new()),
            flags: Arc::new(FlagSuggestions),
        }
    }
}

impl SuggestionRegistry {
    pub fn register(&mut self, ty: ArgType, resolver: Arc<dyn SuggestionResolver>) {
        self.by_type.register(ty, resolver);
    }

    pub fn register_named(&mut self, name: impl Into<String>, resolver: Arc<dyn SuggestionResolver>) {
        self.named.insert(name.into(), resolver);
    }

    /// Named override, exact type, enum, flag, then the first registered
    /// supertype.
    pub fn lookup(
        &self,
        parameter: &CommandParameter,
        hierarchy: &TypeHierarchy,
    ) -> Option<Arc<dyn SuggestionResolver>> {
        if let Some(name) = parameter.suggestion_override() {
            match self.named.get(name) {
                Some(resolver) => return Some(Arc::clone(resolver)),
                None => tracing::debug!(name, "named suggestion resolver not registered"),
            }
        }

        let ty = parameter.ty();
        if let Some(resolver) = self.by_type.exact(ty) {
            return Some(resolver);
        }
        if ty.is_enum() {
            return Some(self.enum_resolver(ty));
        }
        if *ty == ArgType::FLAG {
            return Some(Arc::clone(&self.flags));
        }
        self.by_type.by_supertype(ty, hierarchy)
    }

    fn enum_resolver(&self, ty: &ArgType) -> Arc<dyn SuggestionResolver> {
        if let Some(cached) = self
            .enums
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(ty)
        {
            return Arc::clone(cached);
        }

        let mut enums = self.enums.write().unwrap_or_else(PoisonError::into_inner);
        let resolver = enums.entry(ty.clone()).or_insert_with(|| {
            tracing::trace!(ty = %ty, "caching enum suggestions");
            Arc::new(EnumSuggestions::for_type(ty)) as Arc<dyn SuggestionResolver>
        });
        Arc::clone(resolver)
    }

    #[cfg(test)]
    fn cached_enum_count(&self) -> usize {
        self.enums
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandFlag;

    #[test]
    fn test_lookup_order() {
        let mut registry = SuggestionRegistry::default();
        let hierarchy = TypeHierarchy::default();
        registry.register(ArgType::NUMBER, Arc::new(StaticSuggestions::new(["0"])));
        registry.register_named("colors", Arc::new(StaticSuggestions::new(["red"])));

        let amount = CommandParameter::required("amount", ArgType::INT);
        assert!(registry.lookup(&amount, &hierarchy).is_some());

        let plain = CommandParameter::required("name", ArgType::STRING);
        assert!(registry.lookup(&plain, &hierarchy).is_none());

        let flag = CommandParameter::flag(CommandFlag::switch("s"));
        assert!(registry.lookup(&flag, &hierarchy).is_some());

        let overridden = CommandParameter::required("color", ArgType::STRING).suggest_with("colors");
        assert!(registry.lookup(&overridden, &hierarchy).is_some());
    }

    #[test]
    fn test_enum_resolver_is_cached_once() {
        let registry = SuggestionRegistry::default();
        let hierarchy = TypeHierarchy::default();
        let mode = CommandParameter::required("mode", ArgType::enumeration("mode", ["survival"]));

        assert_eq!(registry.cached_enum_count(), 0);
        let first = registry.lookup(&mode, &hierarchy);
        let second = registry.lookup(&mode, &hierarchy);
        assert_eq!(registry.cached_enum_count(), 1);
        match (first, second) {
            (Some(a), Some(b)) => assert!(Arc::ptr_eq(&a, &b)),
            _ => panic!("enum resolver missing"),
        }
    }
}
