//! Dual cursor over a usage's parameters and the raw token queue.
//!
//! The two indices move independently: flags consume raw tokens without a
//! parameter slot of their own in the positional walk, and a greedy parameter
//! consumes many raw tokens for one slot.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftTarget {
    RawOnly,
    ParameterOnly,
    All,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    parameter: usize,
    raw: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parameter(&self) -> usize {
        self.parameter
    }

    pub fn raw(&self) -> usize {
        self.raw
    }

    pub fn shift(&mut self, target: ShiftTarget) {
        match target {
            ShiftTarget::RawOnly => self.raw += 1,
            ShiftTarget::ParameterOnly => self.parameter += 1,
            ShiftTarget::All => {
                self.raw += 1;
                self.parameter += 1;
            }
        }
    }

    /// Moves the raw index to `raw` without touching the parameter index.
    pub fn seek_raw(&mut self, raw: usize) {
        self.raw = raw;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_targets_move_independently() {
        let mut cursor = Cursor::new();
        cursor.shift(ShiftTarget::RawOnly);
        cursor.shift(ShiftTarget::RawOnly);
        cursor.shift(ShiftTarget::ParameterOnly);
        cursor.shift(ShiftTarget::All);
        assert_eq!((cursor.parameter(), cursor.raw()), (2, 3));

        cursor.seek_raw(7);
        assert_eq!((cursor.parameter(), cursor.raw()), (2, 7));
    }
}
