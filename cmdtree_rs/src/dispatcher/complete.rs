//! Cursor-aware completion.
//!
//! The token under the cursor is always the last one. Everything typed before
//! it is planned against each usage exactly like dispatch would, and the first
//! parameter left without input decides what gets suggested. A flag in that
//! position offers its names even before any `-` is typed.

use std::collections::HashSet;

use super::Dispatcher;
use crate::command::{CommandId, CommandParameter, CommandUsage, FLAG_PREFIX};
use crate::context::ArgumentQueue;
use crate::matching::{self, Binding, Outcome, UsagePlan};
use crate::resolvers::{FlagSuggestions, SuggestionContext, SuggestionResolver};
use crate::source::Source;

impl Dispatcher {
    /// Candidates for the last token of `arguments` under `command`.
    ///
    /// An empty slice completes the first argument.
    pub fn auto_complete(
        &self,
        source: &dyn Source,
        command: CommandId,
        arguments: &[String],
    ) -> Vec<String> {
        let Some(root) = self.command(command) else {
            return Vec::new();
        };
        if !self.permissions.has_permission(source, root.permission()) {
            return Vec::new();
        }

        let owned;
        let arguments = if arguments.is_empty() {
            owned = [String::new()];
            &owned[..]
        } else {
            arguments
        };
        let index = arguments.len() - 1;
        let typed = ArgumentQueue::new(arguments[..index].to_vec());
        let context = SuggestionContext {
            dispatcher: self,
            source,
            command,
            arguments,
            index,
        };

        let mut candidates = Vec::new();
        for usage in self.registry.usages(command) {
            if !self.usage_permitted(source, usage) {
                continue;
            }
            let plan = matching::plan(usage, &typed, &self.registry);
            if plan.outcome == Outcome::Mismatch {
                continue;
            }
            candidates.extend(self.complete_usage(&context, usage, &plan));
        }

        tracing::trace!(%command, index, found = candidates.len(), "completion candidates");
        self.finish_candidates(context.current(), candidates)
    }

    /// Completes a raw line such as `"ban St"` or `"/gam"`.
    ///
    /// A lone token without trailing whitespace completes root command names
    /// and aliases; trailing whitespace starts a new, empty token.
    pub fn complete_line(&self, source: &dyn Source, line: &str) -> Vec<String> {
        let line = line
            .strip_prefix(self.config.command_prefix.as_str())
            .unwrap_or(line);
        let mut tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        let trailing = line.ends_with(char::is_whitespace);

        if tokens.is_empty() || (tokens.len() == 1 && !trailing) {
            let current = tokens.first().map(String::as_str).unwrap_or_default();
            return self.complete_root(source, current);
        }

        let label = tokens.remove(0);
        let Some(command) = self.get_command(&label) else {
            return Vec::new();
        };
        if trailing {
            tokens.push(String::new());
        }
        self.auto_complete(source, command, &tokens)
    }

    fn complete_root(&self, source: &dyn Source, current: &str) -> Vec<String> {
        let names = self
            .registered_commands()
            .filter(|(_, command)| self.permissions.has_permission(source, command.permission()))
            .flat_map(|(_, command)| {
                std::iter::once(command.name().to_string()).chain(command.aliases().iter().cloned())
            })
            .collect();
        self.finish_candidates(current, names)
    }

    fn usage_permitted(&self, source: &dyn Source, usage: &CommandUsage) -> bool {
        let sub_permissions = usage
            .sub_command_params()
            .filter_map(|p| p.sub_command_id())
            .filter_map(|id| self.registry.command(id))
            .map(|command| command.permission());
        std::iter::once(usage.permission())
            .chain(sub_permissions)
            .all(|permission| self.permissions.has_permission(source, permission))
    }

    fn complete_usage(
        &self,
        context: &SuggestionContext<'_>,
        usage: &CommandUsage,
        plan: &UsagePlan,
    ) -> Vec<String> {
        let parameters = usage.parameters();

        // Value of a flag typed right before the cursor.
        if let Some(previous) = context.previous()
            && let Some(flag) = parameters
                .iter()
                .find(|p| p.as_flag().is_some_and(|f| !f.is_switch() && f.accepts_input(previous)))
        {
            return FlagSuggestions.suggest(context, flag);
        }

        if context.current().starts_with(FLAG_PREFIX) {
            return parameters
                .iter()
                .zip(&plan.bindings)
                .filter(|(_, binding)| **binding == Binding::Flag(None))
                .filter_map(|(p, _)| p.as_flag())
                .flat_map(|flag| flag.names().map(|name| format!("{FLAG_PREFIX}{name}")))
                .collect();
        }

        // First parameter without input, flags included, in declaration order.
        let target = parameters
            .iter()
            .zip(&plan.bindings)
            .find(|(_, binding)| {
                matches!(binding, Binding::Missing | Binding::Default | Binding::Flag(None))
            })
            .or_else(|| {
                parameters
                    .iter()
                    .zip(&plan.bindings)
                    .find(|(p, binding)| p.is_greedy() && matches!(binding, Binding::Greedy(_)))
            })
            .map(|(p, _)| p);
        match target {
            Some(parameter) if parameter.is_flag() => FlagSuggestions.suggest(context, parameter),
            Some(parameter) => self.suggest_parameter(context, parameter),
            None => Vec::new(),
        }
    }

    fn suggest_parameter(
        &self,
        context: &SuggestionContext<'_>,
        parameter: &CommandParameter,
    ) -> Vec<String> {
        if parameter.is_sub_command() {
            return vec![parameter.name().to_string()];
        }
        self.suggestions
            .lookup(parameter, &self.hierarchy)
            .map(|resolver| resolver.suggest(context, parameter))
            .unwrap_or_default()
    }

    /// Drops duplicates, then applies the prefix filter and result limit.
    fn finish_candidates(&self, current: &str, candidates: Vec<String>) -> Vec<String> {
        let completion = &self.config.completion;
        let current = current.to_lowercase();
        let mut seen = HashSet::new();
        let mut finished: Vec<String> = candidates
            .into_iter()
            .filter(|candidate| seen.insert(candidate.clone()))
            .filter(|candidate| {
                !completion.filter_by_prefix || candidate.to_lowercase().starts_with(&current)
            })
            .collect();
        if let Some(max) = completion.max_results {
            finished.truncate(max);
        }
        finished
    }
}

#[cfg(test)]
mod tests {
    use crate::command::{Command, CommandFlag, CommandParameter, CommandUsage};
    use crate::config::DispatcherConfig;
    use crate::dispatcher::{Dispatcher, DispatcherBuilder};
    use crate::resolvers::StaticSuggestions;
    use crate::source::testing::RecordingSource;
    use crate::source::Source;
    use crate::types::ArgType;

    fn dispatcher() -> Dispatcher {
        let mut builder = DispatcherBuilder::new();
        builder.permission_resolver(|source: &dyn Source, permission: &str| {
            source.name() == "admin" || permission != "command.ban"
        });
        builder.register_named_suggestion_resolver("letters", StaticSuggestions::new(["x", "y", "z"]));
        builder.register_suggestion_resolver(
            ArgType::named("duration"),
            StaticSuggestions::new(["1h", "1d", "7d"]),
        );

        builder
            .register_command(
                Command::new("ban").require("command.ban").usage(
                    CommandUsage::new()
                        .parameter(CommandParameter::required("player", ArgType::STRING))
                        .parameter(CommandParameter::flag(CommandFlag::switch("silent").alias("s")))
                        .parameter(CommandParameter::flag(CommandFlag::value(
                            "time",
                            ArgType::named("duration"),
                        )))
                        .parameter(CommandParameter::optional("reason", ArgType::STRING).greedy()),
                ),
            )
            .unwrap();

        let first = builder
            .attach(
                Command::new("first").usage(
                    CommandUsage::new()
                        .parameter(
                            CommandParameter::required("otherText", ArgType::STRING)
                                .suggest_with("letters"),
                        )
                        .parameter(CommandParameter::required("arg1", ArgType::STRING)),
                ),
            )
            .unwrap();
        let other = builder
            .attach(Command::new("othersub").usage(
                CommandUsage::new().parameter(CommandParameter::required("otherArg", ArgType::STRING)),
            ))
            .unwrap();
        builder
            .register_command(
                Command::new("test")
                    .usage(CommandUsage::new().parameter(CommandParameter::required("arg1", ArgType::STRING)))
                    .sub_command(first)
                    .sub_command(other),
            )
            .unwrap();

        builder
            .register_command(Command::new("gamemode").alias("gm").usage(CommandUsage::new().parameter(
                CommandParameter::required(
                    "mode",
                    ArgType::enumeration("mode", ["survival", "creative", "spectator"]),
                ),
            )))
            .unwrap();
        builder.build()
    }

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_completes_subcommand_names() {
        let dispatcher = dispatcher();
        let source = RecordingSource::named("tester");
        let test = dispatcher.get_command("test").unwrap();

        assert_eq!(dispatcher.auto_complete(&source, test, &[]), vec!["first", "othersub"]);
        assert_eq!(dispatcher.auto_complete(&source, test, &args(&["fi"])), vec!["first"]);
    }

    #[test]
    fn test_completes_inside_subcommand() {
        let dispatcher = dispatcher();
        let source = RecordingSource::named("tester");
        let test = dispatcher.get_command("test").unwrap();
        assert_eq!(
            dispatcher.auto_complete(&source, test, &args(&["first", ""])),
            vec!["x", "y", "z"]
        );
    }

    #[test]
    fn test_enum_variants_filtered_by_prefix() {
        let dispatcher = dispatcher();
        let source = RecordingSource::named("tester");
        let gamemode = dispatcher.get_command("gm").unwrap();
        assert_eq!(
            dispatcher.auto_complete(&source, gamemode, &args(&["S"])),
            vec!["survival", "spectator"]
        );
    }

    #[test]
    fn test_flag_names_and_values() {
        let dispatcher = dispatcher();
        let admin = RecordingSource::named("admin");
        let ban = dispatcher.get_command("ban").unwrap();

        assert_eq!(
            dispatcher.auto_complete(&admin, ban, &args(&["Steve", "-"])),
            vec!["-silent", "-s", "-time"]
        );
        assert_eq!(
            dispatcher.auto_complete(&admin, ban, &args(&["Steve", "-s", "-"])),
            vec!["-time"]
        );
        assert_eq!(
            dispatcher.auto_complete(&admin, ban, &args(&["Steve", "-time", ""])),
            vec!["1h", "1d", "7d"]
        );
    }

    #[test]
    fn test_flag_offered_at_its_position() {
        let dispatcher = dispatcher();
        let admin = RecordingSource::named("admin");
        let ban = dispatcher.get_command("ban").unwrap();

        assert_eq!(
            dispatcher.auto_complete(&admin, ban, &args(&["Steve", ""])),
            vec!["-silent", "-s"]
        );
        assert_eq!(
            dispatcher.auto_complete(&admin, ban, &args(&["Steve", "-s", ""])),
            vec!["-time"]
        );
        assert!(dispatcher.auto_complete(&admin, ban, &args(&["Steve", "-s", "-time", "1d", ""])).is_empty());
    }

    #[test]
    fn test_denied_command_completes_nothing() {
        let dispatcher = dispatcher();
        let source = RecordingSource::named("guest");
        let ban = dispatcher.get_command("ban").unwrap();
        assert!(dispatcher.auto_complete(&source, ban, &args(&["Steve", "-"])).is_empty());
    }

    #[test]
    fn test_complete_line() {
        let dispatcher = dispatcher();
        let source = RecordingSource::named("guest");

        assert_eq!(dispatcher.complete_line(&source, "/g"), vec!["gamemode", "gm"]);
        assert_eq!(
            dispatcher.complete_line(&source, "gamemode c"),
            vec!["creative"]
        );
        assert_eq!(
            dispatcher.complete_line(&source, "test "),
            vec!["first", "othersub"]
        );
        assert!(dispatcher.complete_line(&source, "b").is_empty());
        assert!(dispatcher.complete_line(&source, "nope x").is_empty());
    }

    #[test]
    fn test_result_limit() {
        let mut builder = DispatcherBuilder::new();
        let mut config = DispatcherConfig::default();
        config.completion.max_results = Some(1);
        builder.config(config);
        builder
            .register_command(Command::new("mode").usage(CommandUsage::new().parameter(
                CommandParameter::required("value", ArgType::enumeration("value", ["a", "b"])),
            )))
            .unwrap();
        let dispatcher = builder.build();
        let source = RecordingSource::named("tester");
        let mode = dispatcher.get_command("mode").unwrap();
        assert_eq!(dispatcher.auto_complete(&source, mode, &[]), vec!["a"]);
    }
}
