//! Raw token to typed value.

use uuid::Uuid;

use crate::command::CommandParameter;
use crate::context::Context;
use crate::error::CommandError;
use crate::types::Value;

/// Turns one raw token (or a joined greedy run) into a [`Value`].
///
/// Rejections are reported as [`CommandError::ContextResolveFailure`].
pub trait ValueResolver: Send + Sync {
    fn resolve(
        &self,
        context: &Context<'_>,
        parameter: &CommandParameter,
        raw: &str,
    ) -> Result<Value, CommandError>;
}

/// Resolver built from a plain parsing function.
pub struct FnResolver<F>(F);

pub fn resolver_fn<F>(parse: F) -> FnResolver<F>
where
    F: Fn(&str) -> Result<Value, CommandError> + Send + Sync,
{
    FnResolver(parse)
}

impl<F> ValueResolver for FnResolver<F>
where
    F: Fn(&str) -> Result<Value, CommandError> + Send + Sync,
{
    fn resolve(
        &self,
        _context: &Context<'_>,
        _parameter: &CommandParameter,
        raw: &str,
    ) -> Result<Value, CommandError> {
        (self.0)(raw)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StringResolver;

impl ValueResolver for StringResolver {
    fn resolve(&self, _: &Context<'_>, _: &CommandParameter, raw: &str) -> Result<Value, CommandError> {
        Ok(Value::Str(raw.to_string()))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct IntResolver;

impl ValueResolver for IntResolver {
    fn resolve(
        &self,
        _: &Context<'_>,
        parameter: &CommandParameter,
        raw: &str,
    ) -> Result<Value, CommandError> {
        raw.parse::<i64>()
            .map(Value::Int)
            .map_err(|e| CommandError::resolve_failure(raw, parameter.ty(), e.to_string()))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FloatResolver;

impl ValueResolver for FloatResolver {
    fn resolve(
        &self,
        _: &Context<'_>,
        parameter: &CommandParameter,
        raw: &str,
    ) -> Result<Value, CommandError> {
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Value::Float(value)),
            Ok(_) => Err(CommandError::resolve_failure(raw, parameter.ty(), "not a finite number")),
            Err(e) => Err(CommandError::resolve_failure(raw, parameter.ty(), e.to_string())),
        }
    }
}

/// `true`/`false`, also `yes`/`no`, any case.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoolResolver;

impl ValueResolver for BoolResolver {
    fn resolve(
        &self,
        _: &Context<'_>,
        parameter: &CommandParameter,
        raw: &str,
    ) -> Result<Value, CommandError> {
        match raw.to_ascii_lowercase().as_str() {
            "true" | "yes" => Ok(Value::Bool(true)),
            "false" | "no" => Ok(Value::Bool(false)),
            _ => Err(CommandError::resolve_failure(
                raw,
                parameter.ty(),
                "expected true or false",
            )),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UuidResolver;

impl ValueResolver for UuidResolver {
    fn resolve(
        &self,
        _: &Context<'_>,
        parameter: &CommandParameter,
        raw: &str,
    ) -> Result<Value, CommandError> {
        Uuid::parse_str(raw)
            .map(Value::Uuid)
            .map_err(|e| CommandError::resolve_failure(raw, parameter.ty(), e.to_string()))
    }
}

/// Fallback for every enum type: case-insensitive variant match.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnumResolver;

impl ValueResolver for EnumResolver {
    fn resolve(
        &self,
        _: &Context<'_>,
        parameter: &CommandParameter,
        raw: &str,
    ) -> Result<Value, CommandError> {
        let ty = parameter.ty();
        match ty.variant(raw) {
            Some(variant) => Ok(Value::Enum(variant.to_string())),
            None => {
                let expected = ty.variants().unwrap_or_default().join(", ");
                Err(CommandError::resolve_failure(
                    raw,
                    ty,
                    format!("expected one of: {expected}"),
                ))
            }
        }
    }
}
