//! Parameter value objects.
//!
//! A usage is an ordered list of [`CommandParameter`]s. Three kinds share the
//! type: subcommand literals, plain arguments and flags.

use std::fmt;
use std::sync::Arc;

use super::CommandId;
use super::flag::CommandFlag;
use crate::types::{ArgType, NumericRange, Value};

/// Value an optional parameter takes when the input leaves it out.
#[derive(Clone)]
pub enum DefaultValue {
    /// Raw input, resolved through the parameter's value resolver.
    Raw(String),
    Supplier(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Raw(raw) => write!(f, "Raw({raw:?})"),
            DefaultValue::Supplier(_) => f.write_str("Supplier(..)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParameterKind {
    /// Literal token selecting the subcommand node with this handle.
    SubCommand(CommandId),
    Argument,
    Flag(CommandFlag),
}

#[derive(Debug, Clone)]
pub struct CommandParameter {
    name: String,
    ty: ArgType,
    kind: ParameterKind,
    optional: bool,
    greedy: bool,
    position: usize,
    range: Option<NumericRange>,
    default: Option<DefaultValue>,
    suggest: Option<String>,
    description: Option<String>,
}

impl CommandParameter {
    fn new(name: impl Into<String>, ty: ArgType, kind: ParameterKind, optional: bool) -> Self {
        Self {
            name: name.into(),
            ty,
            kind,
            optional,
            greedy: false,
            position: 0,
            range: None,
            default: None,
            suggest: None,
            description: None,
        }
    }

    pub fn required(name: impl Into<String>, ty: ArgType) -> Self {
        Self::new(name, ty, ParameterKind::Argument, false)
    }

    pub fn optional(name: impl Into<String>, ty: ArgType) -> Self {
        Self::new(name, ty, ParameterKind::Argument, true)
    }

    /// Flags are always optional and typed as [`ArgType::FLAG`].
    pub fn flag(flag: CommandFlag) -> Self {
        Self::new(flag.name().to_string(), ArgType::FLAG, ParameterKind::Flag(flag), true)
    }

    pub fn sub_command(name: impl Into<String>, id: CommandId) -> Self {
        Self::new(name, ArgType::COMMAND, ParameterKind::SubCommand(id), false)
    }

    /// Consume every remaining token as one value.
    pub fn greedy(mut self) -> Self {
        self.greedy = true;
        self
    }

    pub fn with_range(mut self, range: NumericRange) -> Self {
        self.range = Some(range);
        self
    }

    /// Default given as raw input; makes the parameter optional.
    pub fn default_raw(mut self, raw: impl Into<String>) -> Self {
        self.optional = true;
        self.default = Some(DefaultValue::Raw(raw.into()));
        self
    }

    /// Default computed on demand; makes the parameter optional.
    pub fn default_with<F>(mut self, supplier: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.optional = true;
        self.default = Some(DefaultValue::Supplier(Arc::new(supplier)));
        self
    }

    /// Use the suggestion resolver registered under `name` instead of the type's.
    pub fn suggest_with(mut self, name: impl Into<String>) -> Self {
        self.suggest = Some(name.into());
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub(crate) fn at_position(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &ArgType {
        &self.ty
    }

    pub fn kind(&self) -> &ParameterKind {
        &self.kind
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn is_greedy(&self) -> bool {
        self.greedy
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn range(&self) -> Option<&NumericRange> {
        self.range.as_ref()
    }

    pub fn default_value(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    pub fn suggestion_override(&self) -> Option<&str> {
        self.suggest.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn as_flag(&self) -> Option<&CommandFlag> {
        match &self.kind {
            ParameterKind::Flag(flag) => Some(flag),
            _ => None,
        }
    }

    pub fn is_flag(&self) -> bool {
        self.as_flag().is_some()
    }

    pub fn is_switch(&self) -> bool {
        self.as_flag().is_some_and(CommandFlag::is_switch)
    }

    pub fn sub_command_id(&self) -> Option<CommandId> {
        match self.kind {
            ParameterKind::SubCommand(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_sub_command(&self) -> bool {
        self.sub_command_id().is_some()
    }

    /// Syntax fragment: `<name>`, `[name]`, `[name...]`, `[-s]`, `[-f <type>]`
    /// or the bare literal for subcommands.
    pub fn format(&self) -> String {
        match &self.kind {
            ParameterKind::SubCommand(_) => self.name.clone(),
            ParameterKind::Flag(flag) => format!("[{}]", flag.format()),
            ParameterKind::Argument => {
                let dots = if self.greedy { "..." } else { "" };
                if self.optional {
                    format!("[{}{dots}]", self.name)
                } else {
                    format!("<{}{dots}>", self.name)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_fragments() {
        assert_eq!(CommandParameter::required("player", ArgType::STRING).format(), "<player>");
        assert_eq!(CommandParameter::optional("duration", ArgType::STRING).format(), "[duration]");
        assert_eq!(
            CommandParameter::optional("reason", ArgType::STRING)
                .greedy()
                .format(),
            "[reason...]"
        );
        assert_eq!(
            CommandParameter::flag(CommandFlag::switch("s")).format(),
            "[-s]"
        );
        assert_eq!(
            CommandParameter::sub_command("first", CommandId(3)).format(),
            "first"
        );
    }

    #[test]
    fn test_defaults_make_parameter_optional() {
        let param = CommandParameter::required("reason", ArgType::STRING).default_raw("none");
        assert!(param.is_optional());
        assert!(matches!(param.default_value(), Some(DefaultValue::Raw(raw)) if raw == "none"));

        let param = CommandParameter::required("amount", ArgType::INT).default_with(|| Value::Int(1));
        assert!(param.is_optional());
    }

    #[test]
    fn test_flag_parameters_are_optional_flags() {
        let param = CommandParameter::flag(CommandFlag::value("reason", ArgType::STRING));
        assert!(param.is_flag());
        assert!(!param.is_switch());
        assert!(param.is_optional());
        assert_eq!(param.ty(), &ArgType::FLAG);
    }
}
