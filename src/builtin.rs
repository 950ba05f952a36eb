//! The trends tab rule set compiled into the binary.

use crate::config::{parse, ConfigError, RuleSet, RuleSource};
use crate::rule::ReplacementRule;

/// File patched when no target is given.
pub const DEFAULT_TARGET: &str = "apps/mobile_flutter/lib/screens/reports/trends_tab.dart";

/// Environment variable overriding [`DEFAULT_TARGET`].
pub const TARGET_ENV: &str = "TRENDS_PATCHER_FILE";

const TRENDS_TAB_RULES: &str = include_str!("../rules/trends_tab.toml");

/// Parse and validate the embedded rule set.
pub fn rule_set() -> Result<RuleSet, ConfigError> {
    parse(TRENDS_TAB_RULES, RuleSource::Builtin)
}

/// The embedded rules, in application order.
pub fn rules() -> Result<Vec<ReplacementRule>, ConfigError> {
    rule_set().map(RuleSet::into_rules)
}
