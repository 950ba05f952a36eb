use crate::rule::{ReplacementRule, RuleOutcome};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum PatchError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not valid UTF-8: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

impl PatchError {
    fn io(path: &Path, source: io::Error) -> Self {
        PatchError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Summary of one completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "PatchReport carries per-rule match counts"]
pub struct PatchReport {
    pub file: PathBuf,
    /// One entry per rule, in application order
    pub outcomes: Vec<RuleOutcome>,
    /// Whether the written text differs from what was read
    pub changed: bool,
}

impl PatchReport {
    /// Rules that found neither a bare nor an already-applied occurrence.
    pub fn unmatched(&self) -> impl Iterator<Item = &RuleOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.is_no_match())
    }
}

/// Read the whole file as UTF-8.
pub fn load(path: impl AsRef<Path>) -> Result<String, PatchError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| PatchError::io(path, source))?;
    String::from_utf8(bytes).map_err(|source| PatchError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Apply `rules` in order and return the transformed text.
///
/// A rule whose `old` text is absent is skipped silently.
pub fn apply(text: &str, rules: &[ReplacementRule]) -> String {
    apply_counted(text, rules).0
}

/// Like [`apply`], also returning what each rule did.
pub fn apply_counted(text: &str, rules: &[ReplacementRule]) -> (String, Vec<RuleOutcome>) {
    let mut current = text.to_string();
    let mut outcomes = Vec::with_capacity(rules.len());

    for rule in rules {
        let (next, outcome) = rule.apply(&current);
        debug!(
            rule = %outcome.id,
            replaced = outcome.replaced,
            already_applied = outcome.already_applied,
            "applied rule"
        );
        current = next;
        outcomes.push(outcome);
    }

    (current, outcomes)
}

/// Overwrite `path` with `text`.
///
/// Uses tempfile + fsync + rename, so the target is either fully replaced or
/// left untouched.
pub fn save(path: impl AsRef<Path>, text: &str) -> Result<(), PatchError> {
    let path = path.as_ref();
    atomic_write(path, text.as_bytes()).map_err(|source| PatchError::io(path, source))
}

/// A target file paired with the rules to run against it.
#[derive(Debug, Clone)]
pub struct Patcher {
    file: PathBuf,
    rules: Vec<ReplacementRule>,
}

impl Patcher {
    pub fn new(file: impl Into<PathBuf>, rules: Vec<ReplacementRule>) -> Self {
        Self {
            file: file.into(),
            rules,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn rules(&self) -> &[ReplacementRule] {
        &self.rules
    }

    /// Load, apply every rule, save.
    ///
    /// Nothing is written if the read fails. The file is rewritten even when
    /// no rule matched.
    pub fn run(&self) -> Result<PatchReport, PatchError> {
        let original = load(&self.file)?;
        debug!(file = %self.file.display(), bytes = original.len(), "loaded target");

        let (patched, outcomes) = apply_counted(&original, &self.rules);
        save(&self.file, &patched)?;

        let changed = patched != original;
        info!(
            file = %self.file.display(),
            rules = self.rules.len(),
            changed,
            "patched target"
        );

        Ok(PatchReport {
            file: self.file.clone(),
            outcomes,
            changed,
        })
    }
}

/// Atomic file write: tempfile + fsync + rename.
///
/// Symlinks are followed, so the file they point at is replaced and the link
/// survives. An existing target must be writable; the rename alone would only
/// need a writable directory. The replacement keeps the target's permissions.
fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let resolved = match fs::canonicalize(path) {
        Ok(resolved) => {
            OpenOptions::new().write(true).open(&resolved)?;
            Some(resolved)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => None,
        Err(err) => return Err(err),
    };
    let destination = resolved.as_deref().unwrap_or(path);

    // Same directory, same filesystem
    let parent = match destination.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;

    if resolved.is_some() {
        let permissions = fs::metadata(destination)?.permissions();
        temp.as_file().set_permissions(permissions)?;
    }

    temp.as_file().sync_all()?;
    temp.persist(destination).map_err(|e| e.error)?;

    Ok(())
}
