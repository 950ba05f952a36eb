//! Trends Patcher: literal block replacement for the reports trends tab
//!
//! Reads one source file, applies an ordered list of exact `old → new` text
//! replacements, and writes the result back in place.
//!
//! # Semantics
//!
//! - Matching is literal and byte-exact (no regex, no whitespace folding)
//! - Every non-overlapping occurrence is replaced, left to right
//! - A rule whose `old` text is absent is a silent no-op
//! - Insertion rules (whose `new` contains `old`) skip occurrences that are
//!   already patched, so reruns do not duplicate inserted text
//! - Writes are atomic (tempfile + fsync + rename)
//!
//! # Example
//!
//! ```no_run
//! use trends_patcher::{builtin, Patcher};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let patcher = Patcher::new(builtin::DEFAULT_TARGET, builtin::rules()?);
//! let report = patcher.run()?;
//! for outcome in &report.outcomes {
//!     println!("{outcome}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod builtin;
pub mod config;
pub mod patcher;
pub mod rule;

// Re-exports
pub use config::{load_from_path, load_from_str, ConfigError, RuleSet, RuleSource};
pub use patcher::{apply, apply_counted, load, save, PatchError, PatchReport, Patcher};
pub use rule::{ReplacementRule, RuleOutcome};
