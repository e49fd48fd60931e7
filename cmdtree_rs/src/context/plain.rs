//! Unresolved view of an invocation, as pre-processors see it.

use super::queue::ArgumentQueue;
use crate::command::{Command, CommandId};
use crate::dispatcher::Dispatcher;
use crate::source::Source;

pub struct Context<'a> {
    dispatcher: &'a Dispatcher,
    source: &'a dyn Source,
    command: CommandId,
    label: String,
    arguments: ArgumentQueue,
}

impl<'a> Context<'a> {
    pub fn new(
        dispatcher: &'a Dispatcher,
        source: &'a dyn Source,
        command: CommandId,
        label: impl Into<String>,
        arguments: ArgumentQueue,
    ) -> Self {
        Self {
            dispatcher,
            source,
            command,
            label: label.into(),
            arguments,
        }
    }

    pub fn dispatcher(&self) -> &'a Dispatcher {
        self.dispatcher
    }

    pub fn source(&self) -> &'a dyn Source {
        self.source
    }

    /// Root command the input was dispatched to.
    pub fn command(&self) -> CommandId {
        self.command
    }

    pub fn root(&self) -> Option<&'a Command> {
        self.dispatcher.registry().command(self.command)
    }

    /// Label as typed, which may be an alias.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn arguments(&self) -> &ArgumentQueue {
        &self.arguments
    }
}
