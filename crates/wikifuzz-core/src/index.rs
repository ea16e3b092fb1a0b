use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;

use crate::error::{FuzzError, Result};
use crate::identity::{AccessPolicy, Identity};
use crate::models::{CacheMeta, PageRecord};
use crate::pages::PageStore;

/// Per-identity page index cache: one snapshot file plus one metadata file
/// per identity, named by a one-way key so entries are disjoint and the raw
/// identity never reaches the filesystem.
///
/// Staleness is pull-based: a snapshot is stale once any page in the store
/// was modified after `last_built`, or when a rebuild is forced by a content
/// indexing hook. Rebuilds run every permission check under the caller's
/// identity and replace both files atomically, so readers never observe a
/// snapshot paired with foreign metadata.
pub struct IndexCache<P> {
    cache_dir: PathBuf,
    store: PageStore,
    policy: P,
    entry_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<P: AccessPolicy> IndexCache<P> {
    pub fn new(cache_dir: impl Into<PathBuf>, store: PageStore, policy: P) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            store,
            policy,
            entry_locks: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn store(&self) -> &PageStore {
        &self.store
    }

    /// Rebuild the identity's cache entry when missing, stale, or forced.
    /// A no-op when the entry is already current, leaving the files
    /// untouched byte for byte.
    pub fn ensure_fresh(&self, identity: &Identity, force: bool) -> Result<()> {
        let key = identity.cache_key();
        let lock = self.entry_lock(&key);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let latest = self.store.latest_modification()?;
        if !force
            && self.snapshot_path(&key).exists()
            && self
                .read_meta(&key)?
                .is_some_and(|meta| meta.last_built >= latest)
        {
            return Ok(());
        }

        let records = self.store.list_pages(&self.policy, identity)?;
        tracing::debug!(pages = records.len(), "rebuilding page index");

        self.create_cache_dir()?;
        write_atomic(&self.snapshot_path(&key), &serde_json::to_vec(&records)?)?;
        let meta = CacheMeta {
            last_built: Utc::now().timestamp(),
        };
        write_atomic(&self.meta_path(&key), &serde_json::to_vec(&meta)?)?;
        Ok(())
    }

    /// Read the identity's snapshot. `NotFound` when no entry exists yet;
    /// callers wanting freshness must call `ensure_fresh` first.
    pub fn get(&self, identity: &Identity) -> Result<Vec<PageRecord>> {
        let path = self.snapshot_path(&identity.cache_key());
        if !path.exists() {
            return Err(FuzzError::NotFound(format!(
                "no page index for {identity}"
            )));
        }
        Ok(serde_json::from_slice(&fs::read(path)?)?)
    }

    #[must_use]
    pub fn snapshot_path_for(&self, identity: &Identity) -> PathBuf {
        self.snapshot_path(&identity.cache_key())
    }

    fn snapshot_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("pages_{key}.json"))
    }

    fn meta_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("pages_{key}.meta.json"))
    }

    fn read_meta(&self, key: &str) -> Result<Option<CacheMeta>> {
        let path = self.meta_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(serde_json::from_slice(&fs::read(path)?).ok())
    }

    fn create_cache_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.cache_dir)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.cache_dir, fs::Permissions::from_mode(0o755))?;
        }
        Ok(())
    }

    /// Serializes writers per cache entry. Entries for distinct identities
    /// are disjoint files, so no cross-identity locking is needed.
    fn entry_lock(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self
            .entry_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks.entry(key.to_string()).or_default().clone()
    }
}

/// Write-new-then-rename so concurrent readers never see a torn file.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| FuzzError::CacheBuild(format!("target has no parent: {}", path.display())))?;
    let file_name = path
        .file_name()
        .and_then(|x| x.to_str())
        .ok_or_else(|| FuzzError::CacheBuild(format!("invalid filename: {}", path.display())))?;
    let tmp_name = format!(
        ".{file_name}.wikifuzz.tmp.{}",
        uuid::Uuid::new_v4().simple()
    );
    let tmp_path = parent.join(tmp_name);

    {
        let mut tmp = fs::OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&tmp_path)?;
        tmp.write_all(bytes)?;
        tmp.sync_all()?;
    }

    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(FuzzError::from(err));
    }

    if let Ok(dir) = fs::File::open(parent) {
        let _ = dir.sync_all();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use tempfile::tempdir;

    use super::*;
    use crate::acl::Acl;

    fn seed(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, content).expect("seed page");
    }

    fn cache_with_acl(temp: &Path, acl: &str) -> IndexCache<Acl> {
        IndexCache::new(
            temp.join("cache"),
            PageStore::new(temp.join("pages")),
            Acl::parse(acl).expect("acl"),
        )
    }

    #[test]
    fn builds_snapshot_scoped_to_identity() {
        let temp = tempdir().expect("tempdir");
        seed(temp.path(), "pages/public/start.md", "# Start");
        seed(temp.path(), "pages/secret/plan.md", "# Plan");

        let cache = cache_with_acl(temp.path(), "* * read\nsecret: * none\nsecret: boss read\n");

        let alice = Identity::new("alice");
        cache.ensure_fresh(&alice, false).expect("build");
        let records = cache.get(&alice).expect("get");
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["public:start"]);

        let boss = Identity::new("boss");
        cache.ensure_fresh(&boss, false).expect("build");
        let ids: Vec<String> = cache
            .get(&boss)
            .expect("get")
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, ["public:start", "secret:plan"]);
    }

    #[test]
    fn entries_are_isolated_per_identity() {
        let temp = tempdir().expect("tempdir");
        seed(temp.path(), "pages/start.md", "# Start");

        let cache = cache_with_acl(temp.path(), "* * read\n");
        let alice = Identity::new("alice");
        let bob = Identity::new("bob");
        cache.ensure_fresh(&alice, false).expect("build alice");
        cache.ensure_fresh(&bob, false).expect("build bob");

        let alice_path = cache.snapshot_path_for(&alice);
        let bob_path = cache.snapshot_path_for(&bob);
        assert_ne!(alice_path, bob_path);
        assert!(alice_path.exists());
        assert!(bob_path.exists());
    }

    #[test]
    fn repeated_ensure_fresh_is_a_byte_identical_noop() {
        let temp = tempdir().expect("tempdir");
        seed(temp.path(), "pages/start.md", "# Start");

        let cache = cache_with_acl(temp.path(), "* * read\n");
        let alice = Identity::new("alice");
        cache.ensure_fresh(&alice, false).expect("first build");

        let key = alice.cache_key();
        let snapshot_before = fs::read(cache.snapshot_path(&key)).expect("snapshot");
        let meta_before = fs::read(cache.meta_path(&key)).expect("meta");

        cache.ensure_fresh(&alice, false).expect("second build");
        assert_eq!(
            fs::read(cache.snapshot_path(&key)).expect("snapshot"),
            snapshot_before
        );
        assert_eq!(fs::read(cache.meta_path(&key)).expect("meta"), meta_before);
    }

    #[test]
    fn stale_metadata_triggers_rebuild() {
        let temp = tempdir().expect("tempdir");
        seed(temp.path(), "pages/start.md", "# Start");

        let cache = cache_with_acl(temp.path(), "* * read\n");
        let alice = Identity::new("alice");
        cache.ensure_fresh(&alice, false).expect("first build");

        // new content plus a backdated meta simulates modification after the
        // build without relying on filesystem timestamp granularity
        seed(temp.path(), "pages/later.md", "# Later");
        let key = alice.cache_key();
        let stale = CacheMeta {
            last_built: cache.store.latest_modification().expect("scan") - 10,
        };
        fs::write(
            cache.meta_path(&key),
            serde_json::to_vec(&stale).expect("meta json"),
        )
        .expect("backdate meta");

        cache.ensure_fresh(&alice, false).expect("rebuild");
        let ids: Vec<String> = cache
            .get(&alice)
            .expect("get")
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, ["later", "start"]);

        let rebuilt: CacheMeta =
            serde_json::from_slice(&fs::read(cache.meta_path(&key)).expect("meta")).expect("decode");
        assert!(rebuilt.last_built > stale.last_built);
    }

    #[test]
    fn force_rebuild_bypasses_staleness_check() {
        let temp = tempdir().expect("tempdir");
        seed(temp.path(), "pages/start.md", "# Start");

        let cache = cache_with_acl(temp.path(), "* * read\n");
        let alice = Identity::new("alice");
        cache.ensure_fresh(&alice, false).expect("first build");

        // same-second content change: the staleness check alone cannot see it
        seed(temp.path(), "pages/new.md", "# New");
        cache.ensure_fresh(&alice, true).expect("forced rebuild");

        let ids: Vec<String> = cache
            .get(&alice)
            .expect("get")
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, ["new", "start"]);
    }

    #[test]
    fn get_without_entry_reports_not_found() {
        let temp = tempdir().expect("tempdir");
        let cache = cache_with_acl(temp.path(), "* * read\n");
        let err = cache.get(&Identity::new("nobody")).expect_err("must fail");
        assert!(matches!(err, FuzzError::NotFound(_)));
    }

    #[test]
    fn missing_meta_file_forces_rebuild() {
        let temp = tempdir().expect("tempdir");
        seed(temp.path(), "pages/start.md", "# Start");

        let cache = cache_with_acl(temp.path(), "* * read\n");
        let alice = Identity::new("alice");
        cache.ensure_fresh(&alice, false).expect("first build");

        let key = alice.cache_key();
        fs::remove_file(cache.meta_path(&key)).expect("drop meta");
        cache.ensure_fresh(&alice, false).expect("rebuild");
        assert!(cache.meta_path(&key).exists());
    }
}
