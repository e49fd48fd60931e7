//! Semantic argument types, resolved values and match outcomes.
//!
//! `ArgType` is the declared type of a parameter. It is a plain name plus an
//! optional enum shape; relations between types live in
//! [`TypeHierarchy`](crate::resolvers::TypeHierarchy), never in the type itself.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use uuid::Uuid;

/// Declared semantic type of a parameter or flag value.
///
/// Equality and hashing use the name only, so an enum type compares equal to
/// any other `ArgType` carrying the same name.
#[derive(Clone)]
pub struct ArgType {
    name: Cow<'static, str>,
    variants: Option<Arc<[String]>>,
}

impl ArgType {
    pub const STRING: ArgType = ArgType::builtin("string");
    pub const INT: ArgType = ArgType::builtin("int");
    pub const FLOAT: ArgType = ArgType::builtin("float");
    pub const BOOL: ArgType = ArgType::builtin("bool");
    pub const UUID: ArgType = ArgType::builtin("uuid");
    /// Abstract supertype of `int` and `float`.
    pub const NUMBER: ArgType = ArgType::builtin("number");
    /// Abstract supertype of every enum type.
    pub const ENUM: ArgType = ArgType::builtin("enum");
    /// Pseudo-type carried by flag and switch parameters.
    pub const FLAG: ArgType = ArgType::builtin("flag");
    /// Pseudo-type carried by subcommand literals.
    pub const COMMAND: ArgType = ArgType::builtin("command");

    const fn builtin(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            variants: None,
        }
    }

    /// A user-defined type such as `player` or `group`.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            variants: None,
        }
    }

    /// An enum type whose accepted values are the given variant names.
    pub fn enumeration<I, V>(name: impl Into<Cow<'static, str>>, variants: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            variants: Some(variants.into_iter().map(Into::into).collect()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variants(&self) -> Option<&[String]> {
        self.variants.as_deref()
    }

    pub fn is_enum(&self) -> bool {
        self.variants.is_some()
    }

    /// Case-insensitive lookup of an enum variant, returning its declared spelling.
    pub fn variant(&self, raw: &str) -> Option<&str> {
        self.variants()?
            .iter()
            .find(|variant| variant.eq_ignore_ascii_case(raw))
            .map(String::as_str)
    }
}

impl PartialEq for ArgType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ArgType {}

impl Hash for ArgType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Debug for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.variants {
            Some(variants) => write!(f, "ArgType({} {:?})", self.name, variants),
            None => write!(f, "ArgType({})", self.name),
        }
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A value produced by a value or context resolver.
#[derive(Clone)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Uuid(Uuid),
    /// Declared spelling of the matched enum variant.
    Enum(String),
    /// Anything a custom resolver produces (players, groups, ...).
    Custom(Arc<dyn Any + Send + Sync>),
}

impl Value {
    pub fn custom<T: Any + Send + Sync>(value: T) -> Self {
        Value::Custom(Arc::new(value))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) | Value::Enum(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric view used by range checks. `None` for non-numeric values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Value::Uuid(id) => Some(*id),
            _ => None,
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Custom(inner) => inner.downcast_ref::<T>(),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.as_f64().is_some()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Uuid(a), Value::Uuid(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::Custom(a), Value::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Float(n) => write!(f, "Float({n})"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Uuid(id) => write!(f, "Uuid({id})"),
            Value::Enum(s) => write!(f, "Enum({s})"),
            Value::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) | Value::Enum(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Uuid(id) => write!(f, "{id}"),
            Value::Custom(_) => f.write_str("<custom>"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

/// Inclusive numeric bounds; either end may be open.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NumericRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumericRange {
    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn at_most(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

impl fmt::Display for NumericRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = |b: Option<f64>| b.map_or_else(|| "*".to_string(), |v| v.to_string());
        write!(f, "[{}, {}]", bound(self.min), bound(self.max))
    }
}

/// Outcome of matching raw input against a command's usages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchResult {
    /// Every required parameter of the selected usage was bound.
    Complete,
    /// A valid prefix: required parameters are missing, the input stopped at a
    /// subcommand boundary, or the input was empty and the default usage ran.
    Incomplete,
    /// Nothing matched.
    Unknown,
}

impl MatchResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchResult::Complete => "complete",
            MatchResult::Incomplete => "incomplete",
            MatchResult::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arg_type_equality_ignores_variants() {
        let mode = ArgType::enumeration("mode", ["survival", "creative"]);
        assert_eq!(mode, ArgType::named("mode"));
        assert_ne!(mode, ArgType::STRING);
        assert!(mode.is_enum());
        assert!(!ArgType::INT.is_enum());
    }

    #[test]
    fn test_enum_variant_lookup_is_case_insensitive() {
        let mode = ArgType::enumeration("mode", ["Survival", "Creative"]);
        assert_eq!(mode.variant("survival"), Some("Survival"));
        assert_eq!(mode.variant("CREATIVE"), Some("Creative"));
        assert_eq!(mode.variant("hardcore"), None);
    }

    #[test]
    fn test_numeric_range_bounds() {
        let range = NumericRange::between(1.0, 10.0);
        assert!(range.contains(1.0));
        assert!(range.contains(10.0));
        assert!(!range.contains(15.0));
        assert!(!range.contains(0.5));
        assert!(NumericRange::at_least(3.0).contains(1e9));
        assert!(!NumericRange::at_most(3.0).contains(4.0));
        assert_eq!(NumericRange::at_least(2.0).to_string(), "[2, *]");
    }

    #[test]
    fn test_value_views() {
        assert_eq!(Value::Int(15).as_f64(), Some(15.0));
        assert_eq!(Value::from("x").as_f64(), None);
        assert_eq!(Value::Enum("Creative".into()).as_str(), Some("Creative"));

        #[derive(Debug, PartialEq)]
        struct Group(&'static str);
        let value = Value::custom(Group("admin"));
        assert_eq!(value.downcast_ref::<Group>(), Some(&Group("admin")));
        assert_eq!(value.to_string(), "<custom>");
    }

    #[test]
    fn test_match_result_display() {
        assert_eq!(MatchResult::Complete.to_string(), "complete");
        assert_eq!(MatchResult::Unknown.as_str(), "unknown");
    }
}
