//! Priority-ordered search across multiple source roots.

use std::path::PathBuf;

use tracing::debug;

use crate::matcher::PathMatcher;
use crate::model::MatchCandidate;

/// Walks an ordered list of source roots, returning the first candidate
/// found under the highest-priority root that yields one.
#[derive(Debug, Clone)]
pub struct MultiRootSearcher {
    roots: Vec<PathBuf>,
    max_depth: usize,
    matcher: PathMatcher,
}

impl MultiRootSearcher {
    /// Build a searcher over priority-ordered roots and a bounded walk depth.
    #[must_use]
    pub fn new(roots: Vec<PathBuf>, max_depth: usize, matcher: PathMatcher) -> Self {
        Self {
            roots,
            max_depth,
            matcher,
        }
    }

    /// Resolve `product_name` against the roots in priority order.
    ///
    /// Short-circuits on the first root that yields a candidate; later roots
    /// are not consulted even when they also contain a match.
    #[must_use]
    pub fn search(&self, product_name: &str) -> Option<MatchCandidate> {
        for root in &self.roots {
            if let Some(candidate) = self.matcher.find(root, product_name, self.max_depth) {
                debug!(
                    product = product_name,
                    root = %root.display(),
                    path = %candidate.path.display(),
                    "candidate resolved"
                );
                return Some(candidate);
            }
            debug!(product = product_name, root = %root.display(), "no candidate under root");
        }
        None
    }

    /// Roots searched by this instance, in priority order.
    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}
