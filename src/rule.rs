use serde::Deserialize;
use std::fmt;

/// A literal block replacement: every occurrence of `old` becomes `new`.
///
/// Matching is exact and byte-for-byte. No regex, no whitespace folding, so a
/// stray trailing space in the target means the rule does not match.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReplacementRule {
    /// Label used in logs and validation messages
    pub id: String,
    /// Text to search for
    pub old: String,
    /// Replacement text (may be empty to delete)
    #[serde(default)]
    pub new: String,
}

/// What a single rule did to the text it was applied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub id: String,
    /// Occurrences of `old` that were rewritten
    pub replaced: usize,
    /// Occurrences of `old` left alone because they already sit inside `new`
    pub already_applied: usize,
}

impl RuleOutcome {
    /// True when the rule found nothing at all to act on.
    pub fn is_no_match(&self) -> bool {
        self.replaced == 0 && self.already_applied == 0
    }
}

impl fmt::Display for RuleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_no_match() {
            return write!(f, "{}: no match", self.id);
        }
        write!(f, "{}: {} replaced", self.id, self.replaced)?;
        if self.already_applied > 0 {
            write!(f, ", {} already applied", self.already_applied)?;
        }
        Ok(())
    }
}

impl ReplacementRule {
    pub fn new(id: impl Into<String>, old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            old: old.into(),
            new: new.into(),
        }
    }

    /// Replace every non-overlapping occurrence of `old`, scanning left to right.
    ///
    /// Insertion rules carry their own `old` text inside `new`. An occurrence
    /// that is already wrapped by a full copy of `new` at the expected offset
    /// is kept as-is, so running such a rule twice does not insert twice.
    ///
    /// An empty `old` matches nothing.
    pub fn apply(&self, text: &str) -> (String, RuleOutcome) {
        let mut outcome = RuleOutcome {
            id: self.id.clone(),
            replaced: 0,
            already_applied: 0,
        };

        if self.old.is_empty() {
            return (text.to_string(), outcome);
        }

        // Offsets at which `old` appears inside `new`
        let anchors: Vec<usize> = self
            .new
            .match_indices(self.old.as_str())
            .map(|(offset, _)| offset)
            .collect();

        let mut result = String::with_capacity(text.len());
        let mut last_end = 0;

        for (start, matched) in text.match_indices(self.old.as_str()) {
            if self.sits_inside_new(text, start, &anchors) {
                outcome.already_applied += 1;
                continue;
            }
            result.push_str(&text[last_end..start]);
            result.push_str(&self.new);
            last_end = start + matched.len();
            outcome.replaced += 1;
        }

        if outcome.replaced == 0 {
            return (text.to_string(), outcome);
        }

        result.push_str(&text[last_end..]);
        (result, outcome)
    }

    fn sits_inside_new(&self, text: &str, start: usize, anchors: &[usize]) -> bool {
        let bytes = text.as_bytes();
        anchors.iter().any(|&offset| {
            start >= offset && bytes[start - offset..].starts_with(self.new.as_bytes())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_every_occurrence() {
        let rule = ReplacementRule::new("r", "foo", "bar");
        let (out, outcome) = rule.apply("foo foo foo");
        assert_eq!(out, "bar bar bar");
        assert_eq!(outcome.replaced, 3);
        assert_eq!(outcome.already_applied, 0);
    }

    #[test]
    fn test_non_overlapping_left_to_right() {
        let rule = ReplacementRule::new("r", "aa", "b");
        let (out, outcome) = rule.apply("aaaaa");
        assert_eq!(out, "bba");
        assert_eq!(outcome.replaced, 2);
    }

    #[test]
    fn test_absent_pattern_is_noop() {
        let rule = ReplacementRule::new("r", "missing", "x");
        let (out, outcome) = rule.apply("nothing to see");
        assert_eq!(out, "nothing to see");
        assert!(outcome.is_no_match());
    }

    #[test]
    fn test_empty_old_matches_nothing() {
        let rule = ReplacementRule::new("r", "", "x");
        let (out, outcome) = rule.apply("abc");
        assert_eq!(out, "abc");
        assert!(outcome.is_no_match());
    }

    #[test]
    fn test_empty_new_deletes() {
        let rule = ReplacementRule::new("r", "// TODO\n", "");
        let (out, _) = rule.apply("a\n// TODO\nb\n");
        assert_eq!(out, "a\nb\n");
    }

    #[test]
    fn test_insertion_rule_is_not_reapplied() {
        let rule = ReplacementRule::new("import", "use a;", "use a;\nuse b;");
        let (once, first) = rule.apply("use a;\nfn main() {}\n");
        assert_eq!(once, "use a;\nuse b;\nfn main() {}\n");
        assert_eq!(first.replaced, 1);

        let (twice, second) = rule.apply(&once);
        assert_eq!(twice, once);
        assert_eq!(second.replaced, 0);
        assert_eq!(second.already_applied, 1);
    }

    #[test]
    fn test_insertion_rule_patches_only_bare_occurrences() {
        let rule = ReplacementRule::new("import", "use a;", "use a;\nuse b;");
        let (out, outcome) = rule.apply("use a;\nuse b;\nmod x {\nuse a;\n}\n");
        assert_eq!(out, "use a;\nuse b;\nmod x {\nuse a;\nuse b;\n}\n");
        assert_eq!(outcome.replaced, 1);
        assert_eq!(outcome.already_applied, 1);
    }

    #[test]
    fn test_prepend_rule_checks_anchor_offset() {
        let rule = ReplacementRule::new("header", "body", "// header\nbody");
        let (once, _) = rule.apply("body");
        let (twice, outcome) = rule.apply(&once);
        assert_eq!(twice, "// header\nbody");
        assert_eq!(outcome.already_applied, 1);
    }

    #[test]
    fn test_multibyte_text_around_match() {
        let rule = ReplacementRule::new("r", "ö", "oe");
        let (out, outcome) = rule.apply("Jönköping");
        assert_eq!(out, "Joenkoeping");
        assert_eq!(outcome.replaced, 2);
    }

    #[test]
    fn test_outcome_display() {
        let outcome = RuleOutcome {
            id: "weekly".to_string(),
            replaced: 1,
            already_applied: 0,
        };
        assert_eq!(outcome.to_string(), "weekly: 1 replaced");

        let none = RuleOutcome {
            id: "weekly".to_string(),
            replaced: 0,
            already_applied: 0,
        };
        assert_eq!(none.to_string(), "weekly: no match");
    }
}
