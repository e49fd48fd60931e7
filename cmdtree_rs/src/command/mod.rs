//! Command tree data model.
//!
//! - `flag`: switches and value flags
//! - `parameter`: [`CommandParameter`] value objects
//! - `usage`: [`CommandUsage`] parameter patterns
//! - `registry`: arena of command nodes addressed by [`CommandId`]
//!
//! Nodes live in an arena and parents hold handles, so one subcommand can be
//! attached under any number of parents.

mod flag;
mod parameter;
mod registry;
mod usage;

pub use flag::{CommandFlag, FLAG_PREFIX};
pub use parameter::{CommandParameter, DefaultValue, ParameterKind};
pub use registry::CommandRegistry;
pub use usage::{CommandUsage, UsageAction};

use std::fmt;

/// Handle of a command node inside a [`CommandRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(pub(crate) usize);

impl CommandId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named node: aliases, declared usages, an implicit default usage and
/// handles of child nodes.
#[derive(Debug, Clone)]
pub struct Command {
    name: String,
    aliases: Vec<String>,
    description: Option<String>,
    permission: Option<String>,
    default_usage: CommandUsage,
    usages: Vec<CommandUsage>,
    children: Vec<CommandId>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            description: None,
            permission: None,
            default_usage: CommandUsage::new(),
            usages: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Permission checked before any matching happens.
    pub fn require(mut self, permission: impl Into<String>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    /// Zero-argument usage run on empty input or at a subcommand boundary.
    /// Any parameters on `usage` are ignored.
    pub fn with_default(mut self, usage: CommandUsage) -> Self {
        let mut usage = usage;
        if !usage.is_empty() {
            tracing::warn!(command = %self.name, "default usage parameters are ignored");
            usage = usage.without_parameters();
        }
        self.default_usage = usage;
        self
    }

    pub fn usage(mut self, usage: CommandUsage) -> Self {
        self.usages.push(usage);
        self
    }

    pub fn sub_command(mut self, child: CommandId) -> Self {
        self.children.push(child);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn permission(&self) -> Option<&str> {
        self.permission.as_deref()
    }

    pub fn default_usage(&self) -> &CommandUsage {
        &self.default_usage
    }

    /// Declared usages, not including those inherited from children.
    pub fn usages(&self) -> &[CommandUsage] {
        &self.usages
    }

    pub fn children(&self) -> &[CommandId] {
        &self.children
    }

    /// Case-insensitive match against the name or any alias.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(name))
    }
}
