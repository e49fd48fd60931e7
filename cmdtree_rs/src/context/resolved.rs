//! Typed bindings of one invocation.

use std::sync::Arc;

use super::plain::Context;
use crate::command::{CommandFlag, CommandId, CommandParameter, CommandUsage, DefaultValue};
use crate::dispatcher::Dispatcher;
use crate::error::{CommandError, SyntaxError};
use crate::matching::{self, Binding, FlagHit, Outcome};
use crate::source::Source;
use crate::types::{ArgType, Value};

#[derive(Debug, Clone)]
pub struct ResolvedArgument {
    raw: Option<String>,
    parameter: Arc<CommandParameter>,
    value: Option<Value>,
}

impl ResolvedArgument {
    /// Raw input; `None` when the value came from a default supplier or the
    /// parameter was left out.
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    pub fn parameter(&self) -> &CommandParameter {
        &self.parameter
    }

    pub fn name(&self) -> &str {
        self.parameter.name()
    }

    pub fn position(&self) -> usize {
        self.parameter.position()
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedFlag {
    flag: CommandFlag,
    raw_flag: Option<String>,
    raw_value: Option<String>,
    value: Option<Value>,
}

impl ResolvedFlag {
    pub fn flag(&self) -> &CommandFlag {
        &self.flag
    }

    /// The token that named the flag, absent when the flag was not given.
    pub fn raw_flag(&self) -> Option<&str> {
        self.raw_flag.as_deref()
    }

    pub fn raw_value(&self) -> Option<&str> {
        self.raw_value.as_deref()
    }

    /// `Bool` presence for switches, the resolved input for value flags.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn is_present(&self) -> bool {
        self.raw_flag.is_some()
    }
}

/// Resolved view handed to post-processors and usage actions.
///
/// Arguments are kept per command node along the matched chain and in one
/// flattened list; a later binding with the same name replaces an earlier one
/// in the flattened list.
pub struct ResolvedContext<'a> {
    context: &'a Context<'a>,
    usage: &'a CommandUsage,
    per_command: Vec<(CommandId, Vec<ResolvedArgument>)>,
    arguments: Vec<ResolvedArgument>,
    flags: Vec<ResolvedFlag>,
    last_command: CommandId,
}

impl<'a> ResolvedContext<'a> {
    pub fn new(context: &'a Context<'a>, usage: &'a CommandUsage) -> Self {
        Self {
            context,
            usage,
            per_command: Vec::new(),
            arguments: Vec::new(),
            flags: Vec::new(),
            last_command: context.command(),
        }
    }

    /// Context for a default usage reached through `command`, which binds
    /// nothing but still records how deep the input went.
    pub(crate) fn at_command(mut self, command: CommandId) -> Self {
        self.last_command = command;
        self
    }

    /// Binds every parameter of the detected usage. No-op on empty input.
    pub fn resolve(&mut self) -> Result<(), CommandError> {
        let arguments = self.context.arguments();
        if arguments.is_empty() {
            return Ok(());
        }

        let dispatcher = self.context.dispatcher();
        let plan = matching::plan(self.usage, arguments, dispatcher.registry());
        match plan.outcome {
            Outcome::Complete => {}
            Outcome::Incomplete => return Err(self.missing_arguments(&plan.bindings)),
            Outcome::Mismatch => {
                return Err(SyntaxError::UnknownUsage {
                    raw: arguments.join(),
                }
                .into());
            }
        }

        let mut current = self.context.command();
        for (parameter, binding) in self.usage.parameters().iter().zip(plan.bindings) {
            match binding {
                Binding::Literal(_) => {
                    if let Some(id) = parameter.sub_command_id() {
                        current = id;
                        self.last_command = id;
                    }
                }
                Binding::Single(token) => {
                    let raw = arguments[token].to_string();
                    let value = self.resolve_value(parameter, &raw)?;
                    self.bind(current, parameter, Some(raw), Some(value))?;
                }
                Binding::Greedy(tokens) => {
                    let raw = arguments.join_indices(&tokens);
                    let value = self.resolve_value(parameter, &raw)?;
                    self.bind(current, parameter, Some(raw), Some(value))?;
                }
                Binding::Default => {
                    let (raw, value) = self.default_for(parameter, parameter)?;
                    self.bind(current, parameter, raw, value)?;
                }
                Binding::Flag(hit) => self.bind_flag(parameter, hit)?,
                Binding::Missing => {}
            }
        }
        tracing::trace!(
            arguments = self.arguments.len(),
            flags = self.flags.len(),
            last = %self.last_command,
            "context resolved"
        );
        Ok(())
    }

    fn missing_arguments(&self, bindings: &[Binding]) -> CommandError {
        let missing = self
            .usage
            .parameters()
            .iter()
            .zip(bindings)
            .filter(|(p, b)| **b == Binding::Missing && !p.is_optional())
            .map(|(p, _)| p.format())
            .collect::<Vec<_>>()
            .join(" ");
        let name = self
            .context
            .root()
            .map_or(self.context.label(), |root| root.name());
        let prefix = &self.context.dispatcher().config().command_prefix;
        SyntaxError::MissingArguments {
            missing,
            syntax: self.usage.format(name, prefix),
        }
        .into()
    }

    fn resolve_value(&self, parameter: &CommandParameter, raw: &str) -> Result<Value, CommandError> {
        let dispatcher = self.context.dispatcher();
        let resolver = dispatcher.value_resolver(parameter.ty()).ok_or_else(|| {
            CommandError::resolve_failure(raw, parameter.ty(), "no value resolver registered")
        })?;
        resolver.resolve(self.context, parameter, raw)
    }

    /// Default of `declared`, resolved as `target` when given as raw input.
    fn default_for(
        &self,
        declared: &CommandParameter,
        target: &CommandParameter,
    ) -> Result<(Option<String>, Option<Value>), CommandError> {
        match declared.default_value() {
            Some(DefaultValue::Raw(raw)) => {
                let value = self.resolve_value(target, raw)?;
                Ok((Some(raw.clone()), Some(value)))
            }
            Some(DefaultValue::Supplier(supplier)) => Ok((None, Some(supplier()))),
            None => Ok((None, None)),
        }
    }

    fn bind(
        &mut self,
        command: CommandId,
        parameter: &Arc<CommandParameter>,
        raw: Option<String>,
        value: Option<Value>,
    ) -> Result<(), CommandError> {
        if let (Some(range), Some(number)) = (parameter.range(), value.as_ref().and_then(Value::as_f64))
            && !range.contains(number)
        {
            return Err(CommandError::NumberOutOfRange {
                parameter: parameter.name().to_string(),
                value: number,
                range: *range,
            });
        }

        let argument = ResolvedArgument {
            raw,
            parameter: Arc::clone(parameter),
            value,
        };
        match self.per_command.iter_mut().find(|(id, _)| *id == command) {
            Some((_, bound)) => bound.push(argument.clone()),
            None => self.per_command.push((command, vec![argument.clone()])),
        }
        match self
            .arguments
            .iter_mut()
            .find(|existing| existing.name() == argument.name())
        {
            Some(existing) => *existing = argument,
            None => self.arguments.push(argument),
        }
        Ok(())
    }

    fn bind_flag(
        &mut self,
        parameter: &CommandParameter,
        hit: Option<FlagHit>,
    ) -> Result<(), CommandError> {
        let Some(flag) = parameter.as_flag() else {
            return Ok(());
        };
        let arguments = self.context.arguments();
        let raw_flag = hit.map(|hit| arguments[hit.flag].to_string());

        let (raw_value, value) = match (flag.input_type(), hit) {
            (None, _) => (None, Some(Value::Bool(hit.is_some()))),
            (Some(input_type), Some(hit)) => {
                let Some(token) = hit.value else {
                    return Err(CommandError::resolve_failure(
                        raw_flag.unwrap_or_default(),
                        input_type,
                        "missing flag value",
                    ));
                };
                let raw = arguments[token].to_string();
                let target = CommandParameter::optional(flag.name(), input_type.clone());
                let value = self.resolve_value(&target, &raw)?;
                (Some(raw), Some(value))
            }
            (Some(input_type), None) => {
                let target = CommandParameter::optional(flag.name(), input_type.clone());
                self.default_for(parameter, &target)?
            }
        };

        self.flags.push(ResolvedFlag {
            flag: flag.clone(),
            raw_flag,
            raw_value,
            value,
        });
        Ok(())
    }

    pub fn context(&self) -> &'a Context<'a> {
        self.context
    }

    pub fn dispatcher(&self) -> &'a Dispatcher {
        self.context.dispatcher()
    }

    pub fn source(&self) -> &'a dyn Source {
        self.context.source()
    }

    /// Root command the input was dispatched to.
    pub fn command(&self) -> CommandId {
        self.context.command()
    }

    pub fn label(&self) -> &str {
        self.context.label()
    }

    pub fn detected_usage(&self) -> &'a CommandUsage {
        self.usage
    }

    /// Deepest command node the input reached.
    pub fn last_used_command(&self) -> CommandId {
        self.last_command
    }

    /// Commands that received at least one argument, in order.
    pub fn commands_used(&self) -> impl Iterator<Item = CommandId> + '_ {
        self.per_command.iter().map(|(id, _)| *id)
    }

    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.resolved_argument(name)?.value()
    }

    pub fn resolved_argument(&self, name: &str) -> Option<&ResolvedArgument> {
        self.arguments.iter().find(|argument| argument.name() == name)
    }

    pub fn resolved_argument_in(&self, command: CommandId, name: &str) -> Option<&ResolvedArgument> {
        self.resolved_arguments_of(command)
            .iter()
            .find(|argument| argument.name() == name)
    }

    /// Flattened arguments across the matched chain.
    pub fn resolved_arguments(&self) -> &[ResolvedArgument] {
        &self.arguments
    }

    pub fn resolved_arguments_of(&self, command: CommandId) -> &[ResolvedArgument] {
        self.per_command
            .iter()
            .find(|(id, _)| *id == command)
            .map(|(_, arguments)| arguments.as_slice())
            .unwrap_or_default()
    }

    pub fn flag(&self, name: &str) -> Option<&ResolvedFlag> {
        self.flags
            .iter()
            .find(|resolved| resolved.flag.names().any(|n| n.eq_ignore_ascii_case(name)))
    }

    pub fn flag_value(&self, name: &str) -> Option<&Value> {
        self.flag(name)?.value()
    }

    /// Whether a switch was given. `false` for unknown names.
    pub fn switch(&self, name: &str) -> bool {
        self.flag(name).is_some_and(ResolvedFlag::is_present)
    }

    pub fn resolved_flags(&self) -> &[ResolvedFlag] {
        &self.flags
    }

    /// Value produced by the context resolver registered for `ty`.
    pub fn context_value(&self, ty: &ArgType) -> Result<Value, CommandError> {
        let resolver = self.dispatcher().context_resolver(ty).ok_or_else(|| {
            CommandError::resolve_failure(self.source().name(), ty, "no context resolver registered")
        })?;
        resolver.resolve(self)
    }
}
