//! Type-keyed resolver registries.
//!
//! - `hierarchy`: declared supertypes used for fallback lookup
//! - `value`: raw token to [`Value`](crate::types::Value)
//! - `context`: values derived from the invocation instead of input
//! - `suggestion`: completion candidates
//!
//! All three share [`TypeRegistry`]: exact type first, then the first entry in
//! registration order whose type is a supertype of the requested one.

mod context;
mod hierarchy;
mod suggestion;
mod value;

pub use context::{ContextResolver, FnContextResolver, context_fn};
pub use hierarchy::TypeHierarchy;
pub use suggestion::{
    EnumSuggestions, FlagSuggestions, StaticSuggestions, SuggestionContext, SuggestionRegistry,
    SuggestionResolver,
};
pub use value::{
    BoolResolver, EnumResolver, FloatResolver, FnResolver, IntResolver, StringResolver,
    UuidResolver, ValueResolver, resolver_fn,
};

use std::sync::Arc;

use crate::types::ArgType;

/// Ordered `type -> resolver` table.
pub struct TypeRegistry<R: ?Sized> {
    entries: Vec<(ArgType, Arc<R>)>,
}

impl<R: ?Sized> Default for TypeRegistry<R> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<R: ?Sized> TypeRegistry<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `resolver` for `ty`. Re-registering a type replaces the
    /// resolver but keeps the original slot in the fallback order.
    pub fn register(&mut self, ty: ArgType, resolver: Arc<R>) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == ty) {
            Some(entry) => entry.1 = resolver,
            None => self.entries.push((ty, resolver)),
        }
    }

    pub fn exact(&self, ty: &ArgType) -> Option<Arc<R>> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == ty)
            .map(|(_, resolver)| Arc::clone(resolver))
    }

    /// First registered supertype of `ty`, in registration order.
    pub fn by_supertype(&self, ty: &ArgType, hierarchy: &TypeHierarchy) -> Option<Arc<R>> {
        self.entries
            .iter()
            .find(|(registered, _)| hierarchy.is_subtype(ty, registered))
            .map(|(_, resolver)| Arc::clone(resolver))
    }

    pub fn lookup(&self, ty: &ArgType, hierarchy: &TypeHierarchy) -> Option<Arc<R>> {
        self.exact(ty).or_else(|| self.by_supertype(ty, hierarchy))
    }

    pub fn contains(&self, ty: &ArgType) -> bool {
        self.entries.iter().any(|(existing, _)| existing == ty)
    }

    pub fn types(&self) -> impl Iterator<Item = &ArgType> {
        self.entries.iter().map(|(ty, _)| ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_wins() {
        let mut registry: TypeRegistry<str> = TypeRegistry::new();
        registry.register(ArgType::NUMBER, Arc::from("number"));
        registry.register(ArgType::INT, Arc::from("int"));

        let hierarchy = TypeHierarchy::default();
        assert_eq!(registry.lookup(&ArgType::INT, &hierarchy).as_deref(), Some("int"));
        assert_eq!(
            registry.lookup(&ArgType::FLOAT, &hierarchy).as_deref(),
            Some("number")
        );
        assert!(registry.lookup(&ArgType::STRING, &hierarchy).is_none());
    }

    #[test]
    fn test_fallback_is_first_registered_not_most_specific() {
        let mut hierarchy = TypeHierarchy::empty();
        let admin = ArgType::named("admin");
        let player = ArgType::named("player");
        let entity = ArgType::named("entity");
        hierarchy.declare(admin.clone(), player.clone());
        hierarchy.declare(player.clone(), entity.clone());

        let mut registry: TypeRegistry<str> = TypeRegistry::new();
        registry.register(entity.clone(), Arc::from("entity"));
        registry.register(player.clone(), Arc::from("player"));

        // player is closer, but entity was registered first
        assert_eq!(registry.lookup(&admin, &hierarchy).as_deref(), Some("entity"));
    }

    #[test]
    fn test_reregistering_keeps_slot() {
        let mut registry: TypeRegistry<str> = TypeRegistry::new();
        registry.register(ArgType::STRING, Arc::from("a"));
        registry.register(ArgType::INT, Arc::from("b"));
        registry.register(ArgType::STRING, Arc::from("c"));

        let types: Vec<_> = registry.types().map(ArgType::name).collect();
        assert_eq!(types, vec!["string", "int"]);
        assert_eq!(registry.exact(&ArgType::STRING).as_deref(), Some("c"));
    }
}
