//! Flags and switches.

use crate::types::ArgType;

/// Marker every flag token starts with. A doubled marker is accepted too.
pub const FLAG_PREFIX: &str = "-";

/// A named flag. Switches carry no value; value flags resolve the token that
/// follows them through the resolver of their `input_type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFlag {
    name: String,
    aliases: Vec<String>,
    input_type: Option<ArgType>,
}

impl CommandFlag {
    /// A presence-only flag, e.g. `-silent`.
    pub fn switch(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            input_type: None,
        }
    }

    /// A flag followed by a value, e.g. `-reason <string>`.
    pub fn value(name: impl Into<String>, input_type: ArgType) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            input_type: Some(input_type),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn input_type(&self) -> Option<&ArgType> {
        self.input_type.as_ref()
    }

    pub fn is_switch(&self) -> bool {
        self.input_type.is_none()
    }

    /// Name followed by every alias.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Whether a raw token names this flag (`-s`, `--silent`, case-insensitive).
    pub fn accepts_input(&self, raw: &str) -> bool {
        let Some(stripped) = raw.strip_prefix(FLAG_PREFIX) else {
            return false;
        };
        let stripped = stripped.strip_prefix(FLAG_PREFIX).unwrap_or(stripped);
        !stripped.is_empty() && self.names().any(|name| name.eq_ignore_ascii_case(stripped))
    }

    pub fn format(&self) -> String {
        match &self.input_type {
            Some(ty) => format!("{FLAG_PREFIX}{} <{ty}>", self.name),
            None => format!("{FLAG_PREFIX}{}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_name_and_aliases() {
        let flag = CommandFlag::switch("silent").alias("s");
        assert!(flag.accepts_input("-silent"));
        assert!(flag.accepts_input("--silent"));
        assert!(flag.accepts_input("-S"));
        assert!(!flag.accepts_input("silent"));
        assert!(!flag.accepts_input("-"));
        assert!(!flag.accepts_input("---s"));
        assert!(!flag.accepts_input("-quiet"));
    }

    #[test]
    fn test_format() {
        assert_eq!(CommandFlag::switch("s").format(), "-s");
        assert_eq!(
            CommandFlag::value("reason", ArgType::STRING).format(),
            "-reason <string>"
        );
    }
}
