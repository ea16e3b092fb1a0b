use std::fmt;

/// The authenticated principal a request runs as. Absence of an `Identity`
/// is the anonymous state and must fail closed at every serving entry point.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// One-way key used to name this identity's cache entry on disk. The raw
    /// identity string never appears in a filename, and the key of one
    /// identity is not derivable from another's.
    #[must_use]
    pub fn cache_key(&self) -> String {
        blake3::hash(self.0.as_bytes()).to_hex().to_string()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of the caller's identity, backed by the host's session system.
pub trait IdentityProvider {
    fn current_identity(&self) -> Option<Identity>;
}

/// Read-access predicate over page and namespace ids. Namespace ids carry a
/// trailing `:` separator; page ids do not.
pub trait AccessPolicy {
    fn can_read(&self, id: &str, identity: &Identity) -> bool;
}
