//! Data models for counter increments

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Dotted counter key to increment amount.
pub type IncMap = BTreeMap<String, u64>;

/// Increments for one site aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteIncs {
    /// Site token
    #[serde(rename = "t")]
    pub token: String,

    pub inc: IncMap,
}

impl SiteIncs {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            inc: IncMap::new(),
        }
    }

    /// Add to a counter, merging with any amount already recorded.
    pub fn record(&mut self, key: impl Into<String>, amount: u64) {
        *self.inc.entry(key.into()).or_insert(0) += amount;
    }
}

/// Increments for one video aggregate within a site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoIncs {
    /// Owning site token
    #[serde(rename = "st")]
    pub site_token: String,

    /// Video identifier
    #[serde(rename = "u")]
    pub uid: String,

    /// Video name (start events only)
    #[serde(rename = "n", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub inc: IncMap,
}

impl VideoIncs {
    pub fn new(site_token: impl Into<String>, uid: impl Into<String>) -> Self {
        Self {
            site_token: site_token.into(),
            uid: uid.into(),
            name: None,
            inc: IncMap::new(),
        }
    }

    pub fn with_name(
        site_token: impl Into<String>,
        uid: impl Into<String>,
        name: Option<String>,
    ) -> Self {
        Self {
            name,
            ..Self::new(site_token, uid)
        }
    }

    /// Add to a counter, merging with any amount already recorded.
    pub fn record(&mut self, key: impl Into<String>, amount: u64) {
        *self.inc.entry(key.into()).or_insert(0) += amount;
    }
}

/// One event's worth of counter increments, ready for the storage
/// collaborator. The site entry is always present, even with empty `inc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncrementSet {
    pub site: SiteIncs,
    pub videos: Vec<VideoIncs>,
}

impl IncrementSet {
    /// The "nothing to record" set: empty site increments, no videos.
    pub fn empty(token: impl Into<String>) -> Self {
        Self {
            site: SiteIncs::new(token),
            videos: Vec::new(),
        }
    }

    /// Whether the set carries no increments at all.
    pub fn is_empty(&self) -> bool {
        self.site.inc.is_empty() && self.videos.iter().all(|v| v.inc.is_empty())
    }
}
