use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{FuzzError, Result};
use crate::identity::{AccessPolicy, Identity};
use crate::models::PageRecord;

/// Filename extension of page content files. Everything else in the tree is
/// ignored by both listing and staleness scans.
pub const PAGE_EXTENSION: &str = "md";

/// The durable tree of content files backing the wiki. Directories map to
/// namespaces, `:` is the id separator.
#[derive(Debug, Clone)]
pub struct PageStore {
    root: PathBuf,
}

impl PageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List every page the identity may read, sorted by id.
    ///
    /// Traversal is an explicit work stack rather than recursion. A
    /// namespace the identity cannot read is pruned whole: nothing below it
    /// is visited, regardless of per-page grants further down.
    pub fn list_pages(
        &self,
        policy: &dyn AccessPolicy,
        identity: &Identity,
    ) -> Result<Vec<PageRecord>> {
        let mut records = Vec::new();
        let mut stack: Vec<(PathBuf, String)> = vec![(self.root.clone(), String::new())];

        while let Some((dir, namespace)) = stack.pop() {
            let mut entries = fs::read_dir(&dir)?.collect::<std::io::Result<Vec<_>>>()?;
            entries.sort_by_key(|entry| entry.file_name());

            for entry in entries {
                let name = entry.file_name().to_string_lossy().into_owned();
                if name.starts_with('.') {
                    continue;
                }
                let path = entry.path();
                if path.is_dir() {
                    let child = format!("{namespace}{name}:");
                    if policy.can_read(&child, identity) {
                        stack.push((path, child));
                    }
                } else if let Some(stem) = name.strip_suffix(&format!(".{PAGE_EXTENSION}")) {
                    let id = format!("{namespace}{stem}");
                    if policy.can_read(&id, identity) {
                        let title = page_title(&path, &id)?;
                        records.push(PageRecord { id, title });
                    }
                }
            }
        }

        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }

    /// Newest content modification time across all pages, unix seconds.
    /// An empty or missing tree reports 0 so a fresh cache never goes stale
    /// against it.
    pub fn latest_modification(&self) -> Result<i64> {
        if !self.root.exists() {
            return Ok(0);
        }
        let mut latest = 0;
        for item in WalkDir::new(&self.root).follow_links(false) {
            let item = item.map_err(|e| FuzzError::CacheBuild(e.to_string()))?;
            if !item.file_type().is_file() {
                continue;
            }
            if item.path().extension().and_then(|x| x.to_str()) != Some(PAGE_EXTENSION) {
                continue;
            }
            let meta = item
                .metadata()
                .map_err(|e| FuzzError::CacheBuild(e.to_string()))?;
            let stamp = chrono::DateTime::<chrono::Utc>::from(meta.modified()?).timestamp();
            latest = latest.max(stamp);
        }
        Ok(latest)
    }
}

fn page_title(path: &Path, id: &str) -> Result<String> {
    let content = fs::read_to_string(path)?;
    Ok(first_heading(&content).unwrap_or_else(|| last_segment(id).to_string()))
}

/// First ATX heading of the page body, with marker and trailing closing
/// hashes stripped.
fn first_heading(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let trimmed = line.trim_start();
        let hashes = trimmed.len() - trimmed.trim_start_matches('#').len();
        if hashes == 0 || hashes > 6 {
            return None;
        }
        let rest = &trimmed[hashes..];
        if !rest.starts_with(' ') && !rest.is_empty() {
            return None;
        }
        let title = rest.trim().trim_end_matches('#').trim_end();
        (!title.is_empty()).then(|| title.to_string())
    })
}

fn last_segment(id: &str) -> &str {
    id.rsplit(':').next().unwrap_or(id)
}
