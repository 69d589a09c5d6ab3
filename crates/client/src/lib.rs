//! Composition root for the combat agent binary.
//!
//! ```text
//! stdin (JSON lines) ─→ feed ─→ AgentHandle ─→ decision worker ─→ actuation worker ─→ sink
//! ```
//!
//! The binary parses [`args::Args`], installs logging, loads the combat
//! configuration and skill roster, builds the runtime and pumps perception
//! frames into it until the input ends.

pub mod args;
pub mod feed;
pub mod logging;

pub use args::Args;
pub use feed::{FeedSummary, SessionSummary, run_feed};
