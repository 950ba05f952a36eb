pub mod loader;
pub mod schema;

pub use loader::{load_from_path, load_from_str, parse, ConfigError, RuleSource};
pub use schema::{Metadata, RuleSet, ValidationError, ValidationIssue};
