//! Values derived from the invocation rather than from raw input, such as
//! "the sender as a player".

use crate::context::ResolvedContext;
use crate::error::CommandError;
use crate::types::Value;

pub trait ContextResolver: Send + Sync {
    fn resolve(&self, context: &ResolvedContext<'_>) -> Result<Value, CommandError>;
}

pub struct FnContextResolver<F>(F);

pub fn context_fn<F>(resolve: F) -> FnContextResolver<F>
where
    F: Fn(&ResolvedContext<'_>) -> Result<Value, CommandError> + Send + Sync,
{
    FnContextResolver(resolve)
}

impl<F> ContextResolver for FnContextResolver<F>
where
    F: Fn(&ResolvedContext<'_>) -> Result<Value, CommandError> + Send + Sync,
{
    fn resolve(&self, context: &ResolvedContext<'_>) -> Result<Value, CommandError> {
        (self.0)(context)
    }
}
