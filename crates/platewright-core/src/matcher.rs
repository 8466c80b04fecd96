//! Layered file-name matching over a bounded directory walk.
//!
//! # Design
//! - Matching strategies are explicit value objects evaluated in a fixed
//!   order; the first policy to yield a candidate wins.
//! - First-match, not best-match: no scoring is attempted when several files
//!   satisfy a policy (see [`MatchPolicy::NameContains`]).

use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::model::MatchCandidate;

/// Matching strategy applied to the files discovered under a root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Filename equals `<product>.<ext>` for an extension in the recognized
    /// set. Extension order is a priority ranking: a match on an earlier
    /// extension wins over a match on a later one, regardless of where each
    /// file sits in traversal order. Stems compare exactly; extensions
    /// compare ASCII-case-insensitively.
    ExactName,
    /// Case-insensitive filename containing the product name as a
    /// substring, restricted to recognized extensions. The first candidate
    /// in traversal order wins; when several files qualify, the winner is
    /// determined solely by the sorted walk order, which is a documented
    /// nondeterminism boundary rather than a ranking.
    NameContains,
}

/// File entry collected by the walk, retained in traversal order.
#[derive(Debug, Clone)]
struct WalkedFile {
    path: PathBuf,
    file_name: String,
}

/// Finds candidate files for a product name under a single search root.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    extensions: Vec<String>,
    policies: Vec<MatchPolicy>,
}

impl PathMatcher {
    /// Build a matcher over an ordered, recognized extension list with the
    /// default policy order: exact name first, then substring containment.
    ///
    /// Extensions are stored lowercase without a leading dot; their order
    /// ranks exact-match priority.
    #[must_use]
    pub fn new(extensions: &[String]) -> Self {
        Self::with_policies(
            extensions,
            vec![MatchPolicy::ExactName, MatchPolicy::NameContains],
        )
    }

    /// Build a matcher with an explicit policy order, for callers (and
    /// tests) that exercise a single strategy in isolation.
    #[must_use]
    pub fn with_policies(extensions: &[String], policies: Vec<MatchPolicy>) -> Self {
        Self {
            extensions: extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            policies,
        }
    }

    /// Search `root` for `product_name`, walking at most `max_depth` levels.
    ///
    /// Directories are visited in lexicographic order so the first-match
    /// policy is deterministic for a given tree. Unreadable entries are
    /// logged and skipped; they never abort the search.
    #[must_use]
    pub fn find(
        &self,
        root: &Path,
        product_name: &str,
        max_depth: usize,
    ) -> Option<MatchCandidate> {
        let files = self.collect_files(root, max_depth);
        self.policies
            .iter()
            .find_map(|policy| self.evaluate(*policy, &files, product_name))
    }

    fn collect_files(&self, root: &Path, max_depth: usize) -> Vec<WalkedFile> {
        let mut files = Vec::new();
        let walker = WalkDir::new(root).max_depth(max_depth).sort_by_file_name();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    warn!(
                        root = %root.display(),
                        %error,
                        "skipping unreadable entry during search"
                    );
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(file_name) = entry.file_name().to_str() else {
                continue;
            };
            if self.recognized_extension(file_name).is_none() {
                continue;
            }
            files.push(WalkedFile {
                file_name: file_name.to_string(),
                path: entry.into_path(),
            });
        }
        files
    }

    fn evaluate(
        &self,
        policy: MatchPolicy,
        files: &[WalkedFile],
        product_name: &str,
    ) -> Option<MatchCandidate> {
        match policy {
            MatchPolicy::ExactName => self.extensions.iter().find_map(|ext| {
                files
                    .iter()
                    .find(|file| stem_matches(&file.file_name, product_name, ext))
                    .map(|file| MatchCandidate {
                        path: file.path.clone(),
                        extension: ext.clone(),
                    })
            }),
            MatchPolicy::NameContains => {
                let needle = product_name.to_lowercase();
                files.iter().find_map(|file| {
                    let extension = self.recognized_extension(&file.file_name)?;
                    file.file_name
                        .to_lowercase()
                        .contains(&needle)
                        .then(|| MatchCandidate {
                            path: file.path.clone(),
                            extension,
                        })
                })
            }
        }
    }

    fn recognized_extension(&self, file_name: &str) -> Option<String> {
        let (_, ext) = file_name.rsplit_once('.')?;
        let lowered = ext.to_ascii_lowercase();
        self.extensions
            .iter()
            .any(|known| *known == lowered)
            .then_some(lowered)
    }
}

fn stem_matches(file_name: &str, product_name: &str, ext: &str) -> bool {
    file_name
        .rsplit_once('.')
        .is_some_and(|(stem, file_ext)| stem == product_name && file_ext.eq_ignore_ascii_case(ext))
}
