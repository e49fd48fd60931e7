//! Per-invocation state.
//!
//! - `queue`: raw tokens
//! - `cursor`: dual parameter/raw index
//! - `plain`: [`Context`], before resolution
//! - `resolved`: [`ResolvedContext`], typed bindings
//!
//! Everything here is created for one dispatch and dropped after it.

mod cursor;
mod plain;
mod queue;
mod resolved;

pub use cursor::{Cursor, ShiftTarget};
pub use plain::Context;
pub use queue::ArgumentQueue;
pub use resolved::{ResolvedArgument, ResolvedContext, ResolvedFlag};
