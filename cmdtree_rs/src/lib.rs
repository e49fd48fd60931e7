//! # cmdtree
//!
//! **Usage-tree command dispatcher** - match raw input against a tree of
//! commands, subcommands, typed parameters and flags, then resolve and run
//! the selected usage.
//!
//! ## Features
//!
//! - **Flattened usages** - every subcommand usage is reachable from its root
//! - **Flags anywhere** - switches and value flags in any input position
//! - **Greedy arguments** - a trailing parameter may swallow the rest of the line
//! - **Ambiguity checks** - overlapping usages are rejected at registration
//! - **Throwable chain** - errors are routed to per-kind handlers
//! - **Autocompletion** - cursor-aware candidates per parameter
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cmdtree::{ArgType, Command, CommandParameter, CommandUsage, Dispatcher};
//!
//! let mut builder = Dispatcher::builder();
//! builder
//!     .register_command(Command::new("give").usage(
//!         CommandUsage::new()
//!             .parameter(CommandParameter::required("item", ArgType::STRING))
//!             .parameter(CommandParameter::required("amount", ArgType::INT))
//!             .execute(|ctx| {
//!                 println!("giving {:?}", ctx.argument("amount"));
//!                 Ok(())
//!             }),
//!     ))
//!     .expect("valid usage tree");
//! let dispatcher = builder.build();
//! ```

// ============================================================================
// Core Modules
// ============================================================================

/// Command tree model.
///
/// - [`Command`](command::Command) - a node with usages, aliases and children
/// - [`CommandUsage`](command::CommandUsage) - one accepted parameter sequence
/// - [`CommandParameter`](command::CommandParameter) - argument, flag or literal
/// - [`CommandRegistry`](command::CommandRegistry) - arena of registered nodes
pub mod command;

/// Optional `.cmdtree/config.toml` loading.
pub mod config;

/// Per-invocation state: raw tokens, cursor and resolved bindings.
pub mod context;

/// Builder and frozen dispatcher with dispatch and completion entry points.
pub mod dispatcher;

/// Error types and the kind hierarchy used by the throwable chain.
pub mod error;

/// Structural usage matching.
pub mod matching;

/// Pre- and post-processors run around usage execution.
pub mod processors;

/// Value, context and suggestion resolvers keyed by [`ArgType`].
pub mod resolvers;

/// Command sources and permission checks.
pub mod source;

/// Error handler table.
pub mod throwable;

/// Argument types, resolved values and match results.
pub mod types;

/// Usage structure and ambiguity verification.
pub mod verification;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use command::{
    Command, CommandFlag, CommandId, CommandParameter, CommandRegistry, CommandUsage, DefaultValue,
};
pub use config::DispatcherConfig;
pub use context::{Context, ResolvedContext};
pub use dispatcher::{Dispatcher, DispatcherBuilder};
pub use error::{CommandError, ErrorKind, StructureViolation, SyntaxError};
pub use matching::UsageMatch;
pub use source::{AllowAll, AnswerKind, PermissionResolver, Source};
pub use types::{ArgType, MatchResult, NumericRange, Value};
