//! Reading and in-place rewriting of whole NAMELIST files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::line::{split_lines, LineEnding, LineKind, NamelistLine};
use super::value::{unquote, NamelistEdit};
use crate::atomic;
use crate::error::{CoreError, CoreResult};

/// An ordered sequence of tagged lines read from one file.
///
/// Never held across writes: [`rewrite`] always re-reads the file so edits
/// made outside the tool survive.
#[derive(Debug, Clone, PartialEq)]
pub struct NamelistFile {
    path: PathBuf,
    lines: Vec<NamelistLine>,
}

/// What [`NamelistFile::apply_edits`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSummary {
    /// Existing assignment lines replaced in place.
    pub replaced: usize,
    /// Assignment lines inserted before a block terminator.
    pub inserted: usize,
    /// `GROUP/KEY` of edits whose group block is absent (not applied).
    pub missing: Vec<String>,
}

/// Result of a [`rewrite`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// The file does not exist; nothing was done.
    Skipped,
    /// The file was processed.
    Written(EditSummary),
}

impl NamelistFile {
    /// Read and tokenize a file.
    pub fn read(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(path, &content))
    }

    /// Tokenize already-loaded content.
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Self {
        Self {
            path: path.into(),
            lines: split_lines(content),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines(&self) -> &[NamelistLine] {
        &self.lines
    }

    /// Whether a `&GROUP` block is present.
    pub fn has_group(&self, group: &str) -> bool {
        self.lines.iter().any(|line| {
            matches!(line.kind(), LineKind::BlockStart { group: g } if g.eq_ignore_ascii_case(group))
        })
    }

    /// `(key, raw value)` of every non-comment assignment inside `group`.
    pub fn group_assignments(&self, group: &str) -> Vec<(&str, &str)> {
        let mut current: Option<&str> = None;
        let mut found = Vec::new();
        for line in &self.lines {
            match line.kind() {
                LineKind::BlockStart { group: g } => current = Some(g.as_str()),
                LineKind::BlockEnd => current = None,
                LineKind::Assignment { key, value } => {
                    if current.is_some_and(|g| g.eq_ignore_ascii_case(group)) {
                        found.push((key.as_str(), value.as_str()));
                    }
                }
                _ => {}
            }
        }
        found
    }

    /// Unquoted value of the first assignment to `key` inside `group`.
    pub fn value(&self, group: &str, key: &str) -> Option<&str> {
        self.group_assignments(group)
            .into_iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| unquote(v))
    }

    /// Render the lines back to text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            line.write_to(&mut out);
        }
        out
    }

    /// Terminator used for new lines: the first one seen, LF if none.
    fn dominant_ending(&self) -> LineEnding {
        self.lines
            .iter()
            .map(NamelistLine::ending)
            .find(|e| *e != LineEnding::None)
            .unwrap_or(LineEnding::Lf)
    }

    /// Apply edits in memory.
    ///
    /// Inside each edit's group, every non-comment assignment to the key is
    /// replaced with a freshly formatted line. Edits whose key was not seen
    /// are inserted just before the group's `/`. Groups are never created.
    pub fn apply_edits(&mut self, edits: &[NamelistEdit]) -> EditSummary {
        let ending = self.dominant_ending();
        let mut summary = EditSummary::default();
        let mut applied = vec![false; edits.len()];
        let mut current: Option<String> = None;
        let mut out = Vec::with_capacity(self.lines.len() + edits.len());

        for line in self.lines.drain(..) {
            match line.kind() {
                LineKind::BlockStart { group } => {
                    current = Some(group.clone());
                    out.push(line);
                }
                LineKind::BlockEnd => {
                    if let Some(group) = current.take() {
                        for (i, edit) in edits.iter().enumerate() {
                            if !applied[i] && edit.targets(&group) {
                                out.push(NamelistLine::assignment(
                                    &edit.key,
                                    &edit.value.format(),
                                    ending,
                                ));
                                applied[i] = true;
                                summary.inserted += 1;
                            }
                        }
                    }
                    out.push(line);
                }
                LineKind::Assignment { key, .. } => {
                    let matching = current.as_deref().and_then(|group| {
                        edits.iter().enumerate().find(|(_, edit)| {
                            edit.targets(group) && edit.key.eq_ignore_ascii_case(key)
                        })
                    });
                    match matching {
                        Some((_, edit)) => {
                            // Later duplicates of the same edit are satisfied too.
                            for (j, other) in edits.iter().enumerate() {
                                if other.targets(&edit.group) && other.key.eq_ignore_ascii_case(key) {
                                    applied[j] = true;
                                }
                            }
                            out.push(NamelistLine::assignment(
                                &edit.key,
                                &edit.value.format(),
                                line.ending(),
                            ));
                            summary.replaced += 1;
                        }
                        None => out.push(line),
                    }
                }
                _ => out.push(line),
            }
        }

        self.lines = out;
        summary.missing = edits
            .iter()
            .zip(&applied)
            .filter(|(_, done)| !**done)
            .map(|(edit, _)| format!("{}/{}", edit.group, edit.key))
            .collect();
        summary
    }
}

/// Re-read `path`, apply `edits`, and write the result back atomically.
///
/// A missing file is a silent no-op ([`RewriteOutcome::Skipped`]). With no
/// effective change the file is not rewritten at all, so `rewrite(path, &[])`
/// leaves it byte-identical.
pub fn rewrite(path: impl AsRef<Path>, edits: &[NamelistEdit]) -> CoreResult<RewriteOutcome> {
    let path = path.as_ref();

    let original = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("NAMELIST {} not found, skipping", path.display());
            return Ok(RewriteOutcome::Skipped);
        }
        Err(source) => {
            return Err(CoreError::NamelistWriteFailed {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let mut file = NamelistFile::parse(path, &original);
    let summary = file.apply_edits(edits);
    for missing in &summary.missing {
        tracing::debug!("{}: no block for {}, edit skipped", path.display(), missing);
    }

    let updated = file.render();
    if updated != original {
        atomic::write_atomic(path, updated.as_bytes()).map_err(|source| {
            CoreError::NamelistWriteFailed {
                path: path.to_path_buf(),
                source,
            }
        })?;
        tracing::info!(
            "Updated {} ({} replaced, {} inserted)",
            path.display(),
            summary.replaced,
            summary.inserted
        );
    }

    Ok(RewriteOutcome::Written(summary))
}
