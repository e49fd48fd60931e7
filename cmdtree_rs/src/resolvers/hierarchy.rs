//! Declared supertype table used for resolver fallback.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::types::ArgType;

/// Explicit "is a" relations between [`ArgType`]s.
///
/// `int` and `float` are declared under `number`; every enum type is
/// implicitly under `enum`. Queries are transitive.
#[derive(Debug, Clone)]
pub struct TypeHierarchy {
    supertypes: HashMap<ArgType, Vec<ArgType>>,
}

impl Default for TypeHierarchy {
    fn default() -> Self {
        let mut hierarchy = Self::empty();
        hierarchy.declare(ArgType::INT, ArgType::NUMBER);
        hierarchy.declare(ArgType::FLOAT, ArgType::NUMBER);
        hierarchy
    }
}

impl TypeHierarchy {
    /// No relations at all, not even the numeric ones.
    pub fn empty() -> Self {
        Self {
            supertypes: HashMap::new(),
        }
    }

    /// Records `supertype` as a direct parent of `ty`.
    pub fn declare(&mut self, ty: ArgType, supertype: ArgType) {
        let parents = self.supertypes.entry(ty).or_default();
        if !parents.contains(&supertype) {
            parents.push(supertype);
        }
    }

    /// Direct parents in declaration order.
    pub fn direct_supertypes(&self, ty: &ArgType) -> Vec<ArgType> {
        let mut parents = self.supertypes.get(ty).cloned().unwrap_or_default();
        if ty.is_enum() && !parents.contains(&ArgType::ENUM) {
            parents.push(ArgType::ENUM);
        }
        parents
    }

    /// Whether `supertype` is a strict ancestor of `ty`.
    pub fn is_subtype(&self, ty: &ArgType, supertype: &ArgType) -> bool {
        if ty == supertype {
            return false;
        }
        let mut seen = HashSet::new();
        let mut queue: VecDeque<ArgType> = self.direct_supertypes(ty).into();
        while let Some(next) = queue.pop_front() {
            if &next == supertype {
                return true;
            }
            if seen.insert(next.clone()) {
                queue.extend(self.direct_supertypes(&next));
            }
        }
        false
    }
}
