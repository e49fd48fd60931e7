//! Structural matching of raw tokens against a command's usages.
//!
//! Matching never calls a resolver. Each usage is planned in two passes:
//!
//! 1. flags: every flag parameter claims the first unconsumed token naming it
//!    (anywhere in the queue), plus the following token for value flags
//!    unless that token names another flag of the usage
//! 2. positional walk: the dual [`Cursor`] steps through the remaining
//!    parameters and the tokens the flag pass left alone
//!
//! The best plan over all flattened usages is selected; resolution later
//! replays the same plan with real resolvers.

use std::sync::Arc;

use crate::command::{CommandId, CommandParameter, CommandRegistry, CommandUsage, ParameterKind};
use crate::context::{ArgumentQueue, Cursor, ShiftTarget};
use crate::types::MatchResult;

/// Tokens a flag parameter claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FlagHit {
    pub flag: usize,
    pub value: Option<usize>,
}

/// How one parameter was bound, in token indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Binding {
    Literal(usize),
    Single(usize),
    Greedy(Vec<usize>),
    /// Optional parameter left out of the input.
    Default,
    Flag(Option<FlagHit>),
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Complete,
    Incomplete,
    Mismatch,
}

#[derive(Debug, Clone)]
pub(crate) struct UsagePlan {
    pub bindings: Vec<Binding>,
    pub outcome: Outcome,
    /// Index of the last positional parameter that consumed a token.
    pub last_bound: Option<usize>,
}

impl UsagePlan {
    fn literals(&self) -> usize {
        self.bindings
            .iter()
            .filter(|b| matches!(b, Binding::Literal(_)))
            .count()
    }

    fn consumed(&self) -> usize {
        self.bindings
            .iter()
            .filter(|b| {
                matches!(
                    b,
                    Binding::Literal(_) | Binding::Single(_) | Binding::Greedy(_) | Binding::Flag(Some(_))
                )
            })
            .count()
    }

    fn score(&self) -> (usize, bool, usize) {
        (self.literals(), self.outcome == Outcome::Complete, self.consumed())
    }

    /// Subcommand whose literal was the last thing typed, for input that
    /// stops right at a subcommand boundary.
    fn boundary(&self, usage: &CommandUsage) -> Option<CommandId> {
        if self.outcome != Outcome::Incomplete {
            return None;
        }
        usage.parameters().get(self.last_bound?)?.sub_command_id()
    }

    fn missing(&self, usage: &CommandUsage) -> Vec<Arc<CommandParameter>> {
        usage
            .parameters()
            .iter()
            .zip(&self.bindings)
            .filter(|(p, b)| **b == Binding::Missing && !p.is_optional())
            .map(|(p, _)| Arc::clone(p))
            .collect()
    }
}

/// Result of selecting a usage for some input.
#[derive(Debug, Clone)]
pub struct UsageMatch {
    pub result: MatchResult,
    /// Index into the command's flattened usages.
    pub usage: Option<usize>,
    /// Subcommand the input stopped at, whose default usage applies.
    pub boundary: Option<CommandId>,
    /// Last parameter that consumed input, when incomplete.
    pub last_parameter: Option<Arc<CommandParameter>>,
    /// Required parameters with no input, when incomplete.
    pub missing: Vec<Arc<CommandParameter>>,
    pub(crate) plan: Option<UsagePlan>,
}

impl UsageMatch {
    fn unknown() -> Self {
        Self {
            result: MatchResult::Unknown,
            usage: None,
            boundary: None,
            last_parameter: None,
            missing: Vec::new(),
            plan: None,
        }
    }

    fn at_boundary(sub: CommandId) -> Self {
        Self {
            result: MatchResult::Incomplete,
            boundary: Some(sub),
            ..Self::unknown()
        }
    }
}

fn literal_matches(registry: &CommandRegistry, parameter: &CommandParameter, token: &str) -> bool {
    match parameter.sub_command_id().and_then(|id| registry.command(id)) {
        Some(command) => command.has_name(token),
        None => parameter.name().eq_ignore_ascii_case(token),
    }
}

/// Plans one usage against the input.
pub(crate) fn plan(
    usage: &CommandUsage,
    arguments: &ArgumentQueue,
    registry: &CommandRegistry,
) -> UsagePlan {
    let params = usage.parameters();
    let len = arguments.len();
    let mut consumed = vec![false; len];
    let mut bindings = vec![Binding::Missing; params.len()];
    let names_flag = |raw: &str| {
        params
            .iter()
            .filter_map(|p| p.as_flag())
            .any(|flag| flag.accepts_input(raw))
    };

    for (index, parameter) in params.iter().enumerate() {
        let Some(flag) = parameter.as_flag() else {
            continue;
        };
        let hit = (0..len).find(|&t| !consumed[t] && flag.accepts_input(&arguments[t]));
        let hit = hit.map(|token| {
            consumed[token] = true;
            let takes_value = !flag.is_switch()
                && token + 1 < len
                && !consumed[token + 1]
                && !names_flag(&arguments[token + 1]);
            let value = takes_value.then(|| {
                consumed[token + 1] = true;
                token + 1
            });
            FlagHit { flag: token, value }
        });
        bindings[index] = Binding::Flag(hit);
    }

    let mut cursor = Cursor::new();
    let mut last_bound = None;
    while cursor.parameter() < params.len() {
        let index = cursor.parameter();
        let parameter = &params[index];
        if parameter.is_flag() {
            cursor.shift(ShiftTarget::ParameterOnly);
            continue;
        }

        while cursor.raw() < len && consumed[cursor.raw()] {
            cursor.shift(ShiftTarget::RawOnly);
        }
        if cursor.raw() >= len {
            if !parameter.is_optional() {
                return UsagePlan {
                    bindings,
                    outcome: Outcome::Incomplete,
                    last_bound,
                };
            }
            bindings[index] = Binding::Default;
            cursor.shift(ShiftTarget::ParameterOnly);
            continue;
        }

        let token = cursor.raw();
        match parameter.kind() {
            ParameterKind::SubCommand(_) => {
                if !literal_matches(registry, parameter, &arguments[token]) {
                    return UsagePlan {
                        bindings,
                        outcome: Outcome::Mismatch,
                        last_bound,
                    };
                }
                consumed[token] = true;
                bindings[index] = Binding::Literal(token);
                cursor.shift(ShiftTarget::All);
            }
            _ if parameter.is_greedy() => {
                let rest: Vec<usize> = (token..len).filter(|&t| !consumed[t]).collect();
                rest.iter().for_each(|&t| consumed[t] = true);
                bindings[index] = Binding::Greedy(rest);
                cursor.seek_raw(len);
                cursor.shift(ShiftTarget::ParameterOnly);
            }
            _ => {
                consumed[token] = true;
                bindings[index] = Binding::Single(token);
                cursor.shift(ShiftTarget::All);
            }
        }
        last_bound = Some(index);
    }

    let leftover = (cursor.raw().min(len)..len).any(|t| !consumed[t]);
    UsagePlan {
        bindings,
        outcome: if leftover {
            Outcome::Mismatch
        } else {
            Outcome::Complete
        },
        last_bound,
    }
}

/// Follows the input as a path of subcommand names. Succeeds only when every
/// token names the next child.
fn chain_boundary(
    registry: &CommandRegistry,
    command: CommandId,
    arguments: &ArgumentQueue,
) -> Option<CommandId> {
    if arguments.is_empty() {
        return None;
    }
    arguments
        .iter()
        .try_fold(command, |current, token| registry.child(current, token))
}

/// Picks the usage of `command` that best fits the input.
///
/// Input made only of subcommand names stops at the last one. Otherwise plans
/// are ranked by matched literals, then completeness, then consumed tokens;
/// ties keep the earliest usage.
pub(crate) fn find_usage(
    registry: &CommandRegistry,
    command: CommandId,
    arguments: &ArgumentQueue,
) -> UsageMatch {
    let usages = registry.usages(command);
    let mut best: Option<(usize, UsagePlan)> = None;
    for (index, usage) in usages.iter().enumerate() {
        let candidate = plan(usage, arguments, registry);
        if candidate.outcome == Outcome::Mismatch {
            continue;
        }
        if best
            .as_ref()
            .is_none_or(|(_, current)| candidate.score() > current.score())
        {
            best = Some((index, candidate));
        }
    }

    if let Some(sub) = chain_boundary(registry, command, arguments) {
        tracing::debug!(%sub, "input stops at subcommand");
        return UsageMatch::at_boundary(sub);
    }

    if let Some((index, plan)) = &best
        && plan.outcome == Outcome::Complete
    {
        tracing::debug!(usage = %usages[*index].key(), "usage matched");
        return UsageMatch {
            result: MatchResult::Complete,
            usage: Some(*index),
            boundary: None,
            last_parameter: None,
            missing: Vec::new(),
            plan: Some(plan.clone()),
        };
    }

    let Some((index, plan)) = best else {
        tracing::debug!(input = %arguments.join(), "no usage matched");
        return UsageMatch::unknown();
    };
    let usage = &usages[index];
    if let Some(sub) = plan.boundary(usage) {
        return UsageMatch::at_boundary(sub);
    }

    UsageMatch {
        result: MatchResult::Incomplete,
        usage: Some(index),
        boundary: None,
        last_parameter: plan
            .last_bound
            .and_then(|bound| usage.parameters().get(bound).cloned()),
        missing: plan.missing(usage),
        plan: Some(plan),
    }
}
