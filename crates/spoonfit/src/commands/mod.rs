//! CLI command implementations for spoonfit

mod classify;
mod common;
mod lookup;
mod serve;
mod summarize;
mod tiers;

pub use classify::classify;
pub use common::{DEFAULT_AUDIT_LOG, build_classifier, load_tiers};
pub use lookup::lookup;
pub use serve::serve;
pub use summarize::summarize;
pub use tiers::tiers;
