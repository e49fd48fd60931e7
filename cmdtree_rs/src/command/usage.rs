//! One concrete parameter pattern a command accepts.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::parameter::CommandParameter;
use crate::context::ResolvedContext;
use crate::error::CommandError;

/// Code run once a usage has been matched and resolved.
pub type UsageAction =
    Arc<dyn Fn(&ResolvedContext<'_>) -> Result<(), CommandError> + Send + Sync>;

/// Immutable ordered parameter list plus permission, cooldown and action.
///
/// Built with chained calls; each added parameter gets the next position.
#[derive(Clone, Default)]
pub struct CommandUsage {
    parameters: Vec<Arc<CommandParameter>>,
    permission: Option<String>,
    cooldown: Option<Duration>,
    description: Option<String>,
    action: Option<UsageAction>,
}

impl CommandUsage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parameter(mut self, parameter: CommandParameter) -> Self {
        let position = self.parameters.len();
        self.parameters.push(Arc::new(parameter.at_position(position)));
        self
    }

    pub fn with_parameters<I>(self, parameters: I) -> Self
    where
        I: IntoIterator<Item = CommandParameter>,
    {
        parameters
            .into_iter()
            .fold(self, |usage, parameter| usage.parameter(parameter))
    }

    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = Some(cooldown);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn execute<F>(mut self, action: F) -> Self
    where
        F: Fn(&ResolvedContext<'_>) -> Result<(), CommandError> + Send + Sync + 'static,
    {
        self.action = Some(Arc::new(action));
        self
    }

    pub fn parameters(&self) -> &[Arc<CommandParameter>] {
        &self.parameters
    }

    pub fn permission(&self) -> Option<&str> {
        self.permission.as_deref()
    }

    pub fn cooldown(&self) -> Option<Duration> {
        self.cooldown
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn action(&self) -> Option<&UsageAction> {
        self.action.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Number of required positional parameters. Flags never count.
    pub fn min_length(&self) -> usize {
        self.parameters
            .iter()
            .filter(|p| !p.is_flag() && !p.is_optional())
            .count()
    }

    /// Subcommand literals in order.
    pub fn sub_command_params(&self) -> impl Iterator<Item = &Arc<CommandParameter>> {
        self.parameters.iter().filter(|p| p.is_sub_command())
    }

    pub fn has_sub_commands(&self) -> bool {
        self.sub_command_params().next().is_some()
    }

    pub fn greedy_parameter(&self) -> Option<&Arc<CommandParameter>> {
        self.parameters.iter().find(|p| p.is_greedy())
    }

    pub fn flags(&self) -> impl Iterator<Item = &Arc<CommandParameter>> {
        self.parameters.iter().filter(|p| p.is_flag())
    }

    pub(crate) fn without_parameters(mut self) -> Self {
        self.parameters.clear();
        self
    }

    /// Copy of this usage with `literal` in front and positions renumbered.
    pub(crate) fn prefixed(&self, literal: CommandParameter) -> Self {
        let parameters = std::iter::once(literal)
            .chain(self.parameters.iter().map(|p| CommandParameter::clone(p)))
            .enumerate()
            .map(|(position, p)| Arc::new(p.at_position(position)))
            .collect();
        Self {
            parameters,
            permission: self.permission.clone(),
            cooldown: self.cooldown,
            description: self.description.clone(),
            action: self.action.clone(),
        }
    }

    /// Parameter fragments joined by spaces, without command or prefix.
    pub fn key(&self) -> String {
        self.parameters
            .iter()
            .map(|p| p.format())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Full syntax line, e.g. `/ban <player> [-s] [duration] [reason...]`.
    pub fn format(&self, command: &str, prefix: &str) -> String {
        if self.parameters.is_empty() {
            format!("{prefix}{command}")
        } else {
            format!("{prefix}{command} {}", self.key())
        }
    }
}

impl fmt::Debug for CommandUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandUsage")
            .field("syntax", &self.key())
            .field("permission", &self.permission)
            .field("cooldown", &self.cooldown)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandFlag, CommandId};
    use crate::types::ArgType;

    fn ban_usage() -> CommandUsage {
        CommandUsage::new()
            .parameter(CommandParameter::required("player", ArgType::STRING))
            .parameter(CommandParameter::flag(CommandFlag::switch("silent").alias("s")))
            .parameter(CommandParameter::optional("duration", ArgType::STRING))
            .parameter(CommandParameter::optional("reason", ArgType::STRING).greedy())
    }

    #[test]
    fn test_positions_follow_insertion_order() {
        let usage = ban_usage();
        let positions: Vec<_> = usage.parameters().iter().map(|p| p.position()).collect();
        assert_eq!(positions, vec![0, 1, 2, 3]);
        assert_eq!(usage.min_length(), 1);
        assert_eq!(usage.greedy_parameter().map(|p| p.name()), Some("reason"));
    }

    #[test]
    fn test_format_syntax() {
        assert_eq!(
            ban_usage().format("ban", "/"),
            "/ban <player> [-silent] [duration] [reason...]"
        );
        assert_eq!(CommandUsage::new().format("help", "!"), "!help");
    }

    #[test]
    fn test_prefixed_renumbers() {
        let usage = ban_usage().prefixed(CommandParameter::sub_command("ban", CommandId(0)));
        let params = usage.parameters();
        assert_eq!(params[0].name(), "ban");
        assert_eq!(params[1].position(), 1);
        assert_eq!(params[4].position(), 4);
        assert_eq!(usage.min_length(), 2);
        assert!(usage.has_sub_commands());
    }
}
