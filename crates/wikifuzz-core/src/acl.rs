use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{FuzzError, Result};
use crate::identity::{AccessPolicy, Identity};

/// Granted capability level. Ordering matters: `Edit` implies `Read`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AccessLevel {
    None,
    Read,
    Edit,
}

impl FromStr for AccessLevel {
    type Err = FuzzError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(Self::None),
            "read" => Ok(Self::Read),
            "edit" => Ok(Self::Edit),
            other => Err(FuzzError::InvalidAcl(format!(
                "unknown access level: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
struct AclRule {
    pattern: String,
    subject: String,
    level: AccessLevel,
}

impl AclRule {
    /// How specifically `pattern` covers `id`, or `None` when it does not.
    /// Exact page matches beat namespace prefixes, longer prefixes beat
    /// shorter ones, `*` matches everything with the lowest rank.
    fn pattern_specificity(&self, id: &str) -> Option<usize> {
        if self.pattern == "*" {
            return Some(0);
        }
        if self.pattern.ends_with(':') {
            return (id == self.pattern || id.starts_with(&self.pattern))
                .then_some(self.pattern.len());
        }
        (id == self.pattern).then_some(usize::MAX)
    }

    fn subject_specificity(&self, identity: &Identity) -> Option<usize> {
        if self.subject == "*" {
            return Some(0);
        }
        (self.subject == identity.as_str()).then_some(1)
    }
}

/// Ordered access rules for the page store, in the host wiki's line format:
/// one `pattern subject level` triple per line, `#` starts a comment.
/// The most specific matching rule wins; with no matching rule at all,
/// access is denied.
#[derive(Debug, Clone, Default)]
pub struct Acl {
    rules: Vec<AclRule>,
}

impl Acl {
    pub fn parse(text: &str) -> Result<Self> {
        let mut rules = Vec::new();
        for (number, line) in text.lines().enumerate() {
            let line = line.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }
            let mut fields = line.split_whitespace();
            let (Some(pattern), Some(subject), Some(level), None) = (
                fields.next(),
                fields.next(),
                fields.next(),
                fields.next(),
            ) else {
                return Err(FuzzError::InvalidAcl(format!(
                    "line {}: expected `pattern subject level`",
                    number + 1
                )));
            };
            rules.push(AclRule {
                pattern: pattern.to_string(),
                subject: subject.to_string(),
                level: level.parse()?,
            });
        }
        Ok(Self { rules })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }

    #[must_use]
    pub fn level_for(&self, id: &str, identity: &Identity) -> AccessLevel {
        self.rules
            .iter()
            .enumerate()
            .filter_map(|(index, rule)| {
                let pattern = rule.pattern_specificity(id)?;
                let subject = rule.subject_specificity(identity)?;
                Some(((pattern, subject, index), rule.level))
            })
            .max_by_key(|(rank, _)| *rank)
            .map_or(AccessLevel::None, |(_, level)| level)
    }
}

impl AccessPolicy for Acl {
    fn can_read(&self, id: &str, identity: &Identity) -> bool {
        self.level_for(id, identity) >= AccessLevel::Read
    }
}
