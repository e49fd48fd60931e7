//! Raw argument tokens of one invocation.

use std::ops::Index;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentQueue {
    tokens: Vec<String>,
}

impl ArgumentQueue {
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    /// Splits on whitespace; runs of whitespace never yield empty tokens.
    pub fn parse(line: &str) -> Self {
        Self::new(line.split_whitespace().map(str::to_string).collect())
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tokens
    }

    /// Tokens joined with single spaces.
    pub fn join(&self) -> String {
        self.tokens.join(" ")
    }

    /// Selected tokens joined with single spaces, in the given order.
    pub fn join_indices(&self, indices: &[usize]) -> String {
        indices
            .iter()
            .filter_map(|&index| self.get(index))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Index<usize> for ArgumentQueue {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        &self.tokens[index]
    }
}

impl<S: Into<String>> FromIterator<S> for ArgumentQueue {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_collapses_whitespace() {
        let queue = ArgumentQueue::parse("  Steve   -s\t1d ");
        assert_eq!(queue.len(), 3);
        assert_eq!(&queue[1], "-s");
        assert_eq!(queue.join(), "Steve -s 1d");
        assert!(ArgumentQueue::parse("   ").is_empty());
    }

    #[test]
    fn test_join_indices() {
        let queue: ArgumentQueue = ["a", "b", "c", "d"].into_iter().collect();
        assert_eq!(queue.join_indices(&[1, 3]), "b d");
        assert_eq!(queue.join_indices(&[9]), "");
    }
}
