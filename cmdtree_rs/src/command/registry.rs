//! Arena of command nodes.
//!
//! Children are inserted before their parents, so a node only ever refers to
//! handles that already exist and the graph cannot contain cycles. Each node
//! stores its flattened usages: its own usages followed by every child usage
//! prefixed with the child's literal.

use std::collections::HashMap;

use super::parameter::CommandParameter;
use super::usage::CommandUsage;
use super::{Command, CommandId};
use crate::error::CommandError;
use crate::verification::UsageVerifier;

#[derive(Debug)]
pub(crate) struct CommandNode {
    pub command: Command,
    pub usages: Vec<CommandUsage>,
}

#[derive(Debug, Default)]
pub struct CommandRegistry {
    nodes: Vec<CommandNode>,
    roots: HashMap<String, CommandId>,
    order: Vec<CommandId>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Verifies the command and stores it, as a root when `root` is set.
    ///
    /// Nothing is stored when verification fails.
    pub(crate) fn insert(
        &mut self,
        command: Command,
        verifier: &dyn UsageVerifier,
        root: bool,
    ) -> Result<CommandId, CommandError> {
        let usages = self.flatten(&command);
        verify(&command, &usages, verifier)?;

        let id = CommandId(self.nodes.len());
        let key = command.name().to_lowercase();
        tracing::debug!(command = %command.name(), %id, usages = usages.len(), root, "command stored");
        self.nodes.push(CommandNode { command, usages });

        if root {
            if let Some(previous) = self.roots.insert(key, id) {
                tracing::warn!(replaced = %previous, %id, "root command replaced");
                self.order.retain(|existing| *existing != previous);
            }
            self.order.push(id);
        }
        Ok(id)
    }

    fn flatten(&self, command: &Command) -> Vec<CommandUsage> {
        let mut usages = command.usages().to_vec();
        for &child in command.children() {
            let Some(node) = self.nodes.get(child.0) else {
                tracing::warn!(command = %command.name(), %child, "unknown subcommand handle skipped");
                continue;
            };
            for usage in &node.usages {
                let literal = CommandParameter::sub_command(node.command.name(), child);
                usages.push(usage.prefixed(literal));
            }
        }
        usages
    }

    /// Top-level command by name (case-insensitive), then by alias in
    /// registration order.
    pub fn get_command(&self, name: &str) -> Option<CommandId> {
        if let Some(id) = self.roots.get(&name.to_lowercase()) {
            return Some(*id);
        }
        self.order
            .iter()
            .copied()
            .find(|id| self.nodes[id.0].command.has_name(name))
    }

    /// Depth-first search below `owner`. Shared nodes are visited once per path.
    pub fn get_sub_command(&self, owner: CommandId, name: &str) -> Option<CommandId> {
        let node = self.nodes.get(owner.0)?;
        for &child in node.command.children() {
            let Some(child_node) = self.nodes.get(child.0) else {
                continue;
            };
            if child_node.command.has_name(name) {
                return Some(child);
            }
            if let Some(found) = self.get_sub_command(child, name) {
                return Some(found);
            }
        }
        None
    }

    /// Direct child of `owner` answering to `name`.
    pub fn child(&self, owner: CommandId, name: &str) -> Option<CommandId> {
        self.nodes
            .get(owner.0)?
            .command
            .children()
            .iter()
            .copied()
            .find(|child| self.command(*child).is_some_and(|c| c.has_name(name)))
    }

    pub fn command(&self, id: CommandId) -> Option<&Command> {
        self.nodes.get(id.0).map(|node| &node.command)
    }

    /// Flattened usages of a node. Empty for unknown handles.
    pub fn usages(&self, id: CommandId) -> &[CommandUsage] {
        self.nodes
            .get(id.0)
            .map(|node| node.usages.as_slice())
            .unwrap_or_default()
    }

    /// Root commands in registration order.
    pub fn registered_commands(&self) -> impl Iterator<Item = CommandId> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn verify(
    command: &Command,
    usages: &[CommandUsage],
    verifier: &dyn UsageVerifier,
) -> Result<(), CommandError> {
    for (index, usage) in usages.iter().enumerate() {
        verifier
            .verify(usage)
            .map_err(|violation| CommandError::InvalidUsageStructure {
                command: command.name().to_string(),
                usage: usage.key(),
                violation,
            })?;

        for other in &usages[index + 1..] {
            if verifier.are_ambiguous(usage, other) {
                return Err(CommandError::AmbiguousUsageAddition {
                    command: command.name().to_string(),
                    first: usage.key(),
                    second: other.key(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, StructureViolation};
    use crate::types::ArgType;
    use crate::verification::DefaultUsageVerifier;

    fn single(name: &str) -> CommandUsage {
        CommandUsage::new().parameter(CommandParameter::required(name, ArgType::STRING))
    }

    #[test]
    fn test_lookup_by_name_and_alias() {
        let mut registry = CommandRegistry::new();
        let id = registry
            .insert(Command::new("Ban").alias("b"), &DefaultUsageVerifier, true)
            .unwrap();
        assert_eq!(registry.get_command("ban"), Some(id));
        assert_eq!(registry.get_command("BAN"), Some(id));
        assert_eq!(registry.get_command("B"), Some(id));
        assert_eq!(registry.get_command("kick"), None);
    }

    #[test]
    fn test_flattened_usages_carry_literals() {
        let mut registry = CommandRegistry::new();
        let first = registry
            .insert(
                Command::new("first").usage(single("otherText")),
                &DefaultUsageVerifier,
                false,
            )
            .unwrap();
        let root = registry
            .insert(
                Command::new("test").usage(single("arg1")).sub_command(first),
                &DefaultUsageVerifier,
                true,
            )
            .unwrap();

        let keys: Vec<_> = registry.usages(root).iter().map(|u| u.key()).collect();
        assert_eq!(keys, vec!["<arg1>", "first <otherText>"]);
        assert_eq!(registry.get_command("first"), None);
        assert_eq!(registry.get_sub_command(root, "FIRST"), Some(first));
    }

    #[test]
    fn test_shared_sub_command_under_two_parents() {
        let mut registry = CommandRegistry::new();
        let shared = registry
            .insert(Command::new("info").usage(single("page")), &DefaultUsageVerifier, false)
            .unwrap();
        let a = registry
            .insert(Command::new("a").sub_command(shared), &DefaultUsageVerifier, true)
            .unwrap();
        let b = registry
            .insert(Command::new("b").sub_command(shared), &DefaultUsageVerifier, true)
            .unwrap();
        assert_eq!(registry.get_sub_command(a, "info"), Some(shared));
        assert_eq!(registry.get_sub_command(b, "info"), Some(shared));
    }

    #[test]
    fn test_nested_dfs() {
        let mut registry = CommandRegistry::new();
        let leaf = registry
            .insert(Command::new("leaf"), &DefaultUsageVerifier, false)
            .unwrap();
        let mid = registry
            .insert(Command::new("mid").sub_command(leaf), &DefaultUsageVerifier, false)
            .unwrap();
        let root = registry
            .insert(Command::new("root").sub_command(mid), &DefaultUsageVerifier, true)
            .unwrap();
        assert_eq!(registry.get_sub_command(root, "leaf"), Some(leaf));
        assert_eq!(registry.child(root, "leaf"), None);
        assert_eq!(registry.child(root, "mid"), Some(mid));
    }

    #[test]
    fn test_rejected_command_is_not_stored() {
        let mut registry = CommandRegistry::new();
        let err = registry
            .insert(
                Command::new("give").usage(single("player")).usage(single("item")),
                &DefaultUsageVerifier,
                true,
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AmbiguousUsageAddition);
        assert!(registry.is_empty());
        assert_eq!(registry.get_command("give"), None);

        let err = registry
            .insert(
                Command::new("bad").usage(CommandUsage::new().parameter(CommandParameter::optional(
                    "x",
                    ArgType::STRING,
                ))),
                &DefaultUsageVerifier,
                true,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            CommandError::InvalidUsageStructure {
                violation: StructureViolation::OptionalFirst,
                ..
            }
        ));
    }
}
