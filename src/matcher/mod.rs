//! Path matching and script accumulation.

mod error;
mod pool;
mod scripts;
mod search;

pub use error::MatchError;
pub use pool::{PartialPath, PathId, PathPool};
pub use scripts::{RewrittenProgram, ScopeTag, ScriptEntry, accumulate_scripts, rewrite_scripts};
pub use search::{MatchOutcome, MatchedPath, PathMatcher};
