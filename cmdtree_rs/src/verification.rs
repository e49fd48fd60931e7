//! Registration-time checks on usages.
//!
//! Structural rules, per usage:
//! 1. at least one parameter
//! 2. at most one greedy parameter, and only as the last parameter
//! 3. a required first parameter
//!
//! Ambiguity is a pairwise length heuristic, see [`DefaultUsageVerifier::are_ambiguous`].

use crate::command::CommandUsage;
use crate::error::StructureViolation;

pub trait UsageVerifier: Send + Sync {
    fn verify(&self, usage: &CommandUsage) -> Result<(), StructureViolation>;

    fn are_ambiguous(&self, first: &CommandUsage, second: &CommandUsage) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultUsageVerifier;

impl UsageVerifier for DefaultUsageVerifier {
    fn verify(&self, usage: &CommandUsage) -> Result<(), StructureViolation> {
        let params = usage.parameters();
        let Some(first) = params.first() else {
            return Err(StructureViolation::Empty);
        };

        let greedy: Vec<_> = params.iter().filter(|p| p.is_greedy()).collect();
        if greedy.len() > 1 {
            return Err(StructureViolation::MultipleGreedy);
        }
        if let Some(greedy) = greedy.first()
            && greedy.position() + 1 != params.len()
        {
            return Err(StructureViolation::GreedyNotLast);
        }
        if first.is_optional() {
            return Err(StructureViolation::OptionalFirst);
        }
        Ok(())
    }

    /// Equal required-parameter counts make two usages ambiguous. When both
    /// carry subcommand literals, the literal sequences decide instead.
    ///
    /// Argument types are not compared: `<player>` and `<amount:int>` at the
    /// same length still collide.
    fn are_ambiguous(&self, first: &CommandUsage, second: &CommandUsage) -> bool {
        let same_length = first.min_length() == second.min_length();
        if same_length && first.has_sub_commands() && second.has_sub_commands() {
            return first
                .sub_command_params()
                .map(|p| (p.name(), p.sub_command_id()))
                .eq(second
                    .sub_command_params()
                    .map(|p| (p.name(), p.sub_command_id())));
        }
        same_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandFlag, CommandId, CommandParameter};
    use crate::types::ArgType;

    fn usage(params: Vec<CommandParameter>) -> CommandUsage {
        CommandUsage::new().with_parameters(params)
    }

    #[test]
    fn test_structure_rules() {
        let verifier = DefaultUsageVerifier;
        assert_eq!(verifier.verify(&CommandUsage::new()), Err(StructureViolation::Empty));

        let two_greedy = usage(vec![
            CommandParameter::required("a", ArgType::STRING).greedy(),
            CommandParameter::required("b", ArgType::STRING).greedy(),
        ]);
        assert_eq!(verifier.verify(&two_greedy), Err(StructureViolation::MultipleGreedy));

        let greedy_middle = usage(vec![
            CommandParameter::required("a", ArgType::STRING),
            CommandParameter::required("b", ArgType::STRING).greedy(),
            CommandParameter::required("c", ArgType::STRING),
        ]);
        assert_eq!(verifier.verify(&greedy_middle), Err(StructureViolation::GreedyNotLast));

        let optional_first = usage(vec![CommandParameter::optional("a", ArgType::STRING)]);
        assert_eq!(verifier.verify(&optional_first), Err(StructureViolation::OptionalFirst));

        let ban = usage(vec![
            CommandParameter::required("player", ArgType::STRING),
            CommandParameter::flag(CommandFlag::switch("s")),
            CommandParameter::optional("duration", ArgType::STRING),
            CommandParameter::optional("reason", ArgType::STRING).greedy(),
        ]);
        assert_eq!(verifier.verify(&ban), Ok(()));
    }

    #[test]
    fn test_same_length_is_ambiguous_regardless_of_type() {
        let verifier = DefaultUsageVerifier;
        let by_player = usage(vec![CommandParameter::required("player", ArgType::named("player"))]);
        let by_amount = usage(vec![CommandParameter::required("amount", ArgType::INT)]);
        assert!(verifier.are_ambiguous(&by_player, &by_amount));

        let longer = usage(vec![
            CommandParameter::required("player", ArgType::named("player")),
            CommandParameter::required("amount", ArgType::INT),
        ]);
        assert!(!verifier.are_ambiguous(&by_player, &longer));
    }

    #[test]
    fn test_flags_do_not_change_length() {
        let verifier = DefaultUsageVerifier;
        let plain = usage(vec![CommandParameter::required("player", ArgType::STRING)]);
        let flagged = usage(vec![
            CommandParameter::required("player", ArgType::STRING),
            CommandParameter::flag(CommandFlag::switch("silent")),
        ]);
        assert!(verifier.are_ambiguous(&plain, &flagged));
    }

    #[test]
    fn test_subcommand_literals_decide_when_both_have_them() {
        let verifier = DefaultUsageVerifier;
        let first = usage(vec![
            CommandParameter::sub_command("first", CommandId(0)),
            CommandParameter::required("text", ArgType::STRING),
        ]);
        let other = usage(vec![
            CommandParameter::sub_command("other", CommandId(1)),
            CommandParameter::required("text", ArgType::STRING),
        ]);
        assert!(!verifier.are_ambiguous(&first, &other));

        let first_again = usage(vec![
            CommandParameter::sub_command("first", CommandId(0)),
            CommandParameter::required("amount", ArgType::INT),
        ]);
        assert!(verifier.are_ambiguous(&first, &first_again));

        // one side without literals falls back to the length rule
        let plain = usage(vec![
            CommandParameter::required("a", ArgType::STRING),
            CommandParameter::required("b", ArgType::STRING),
        ]);
        assert!(verifier.are_ambiguous(&first, &plain));
    }
}
