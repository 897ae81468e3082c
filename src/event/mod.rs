//! Typed analytics event input
//!
//! Incoming events arrive as query-style key/value pairs. This module wraps
//! the raw pairs in [`EventParams`], validates the required global fields,
//! and lifts them into the tagged [`StatEvent`] union — load and start
//! events carry different shapes (`vu` is an ordered sequence of video slots
//! for load, a single identifier for start).

use std::collections::HashMap;

use tracing::debug;

use crate::stats::{StatError, StatResult};

/// Fields every event must carry to be classifiable:
/// site token, event type, hostname class and device id.
pub const REQUIRED_GLOBALS: [&str; 4] = ["t", "e", "h", "d"];

/// Raw query-style parameter bag.
///
/// Repeated keys (`pm`, `vu`) accumulate in arrival order; flags (`po`,
/// `em`) are represented by key presence.
#[derive(Debug, Clone, Default)]
pub struct EventParams {
    values: HashMap<String, Vec<String>>,
}

impl EventParams {
    /// Build from decoded query pairs, preserving the order of repeated keys.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            params.insert(key, value);
        }
        params
    }

    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.values.entry(key.into()).or_default().push(value.into());
    }

    /// First value for a key, if any.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.values.get(key)?.first().map(String::as_str)
    }

    /// All values for a key, in arrival order.
    pub fn all(&self, key: &str) -> &[String] {
        self.values.get(key).map_or(&[], Vec::as_slice)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Whether all of `t`, `e`, `h`, `d` are present.
    pub fn has_required_globals(&self) -> bool {
        REQUIRED_GLOBALS.iter().all(|key| self.contains(key))
    }
}

/// Coarse category of the embedding host.
///
/// Only `m` (main) and `e` (extra) hosts are tracked for browser/platform
/// and player-mode counters; other classes keep their raw code for the
/// per-hostname page/load/view keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hostname {
    Main,
    Extra,
    Other(String),
}

impl Hostname {
    pub fn parse(code: &str) -> Self {
        match code {
            "m" => Hostname::Main,
            "e" => Hostname::Extra,
            other => Hostname::Other(other.to_string()),
        }
    }

    /// The wire code used inside dotted counter keys.
    pub fn code(&self) -> &str {
        match self {
            Hostname::Main => "m",
            Hostname::Extra => "e",
            Hostname::Other(code) => code,
        }
    }

    /// Main and extra hosts get browser/platform and player-mode tracking.
    pub fn is_tracked(&self) -> bool {
        matches!(self, Hostname::Main | Hostname::Extra)
    }
}

/// A player-load event (`e=l`): page view plus zero or more video slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadEvent {
    pub token: String,
    pub hostname: Hostname,
    pub device: String,
    /// `po` — prepare-only, suppresses page/video-load counters
    pub prepare_only: bool,
    /// `em` — embedded player context
    pub embed: bool,
    /// Player-mode code per video slot, aligned with `video_uids`
    pub player_modes: Vec<String>,
    /// Video identifier per slot; blank entries mean "no video in this slot"
    pub video_uids: Vec<String>,
}

/// A video-start event (`e=s`): exactly one video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartEvent {
    pub token: String,
    pub hostname: Hostname,
    pub device: String,
    pub embed: bool,
    pub video_uid: String,
    /// `vn` — video name
    pub video_name: Option<String>,
    /// `vc` — video source code
    pub source_code: Option<String>,
}

/// Discriminated event input for the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatEvent {
    Load(LoadEvent),
    Start(StartEvent),
}

impl StatEvent {
    /// Lift a raw parameter bag into a typed event.
    ///
    /// Returns `Ok(None)` when the event is not classifiable (missing
    /// required globals, or an unknown event type) — callers record nothing
    /// in that case. A start event without a video identifier is malformed
    /// and rejected with [`StatError::BadParameters`].
    pub fn from_params(params: &EventParams) -> StatResult<Option<Self>> {
        if !params.has_required_globals() {
            debug!("event missing required global fields, nothing to record");
            return Ok(None);
        }

        let token = params.first("t").unwrap_or_default().to_string();
        let hostname = Hostname::parse(params.first("h").unwrap_or_default());
        let device = params.first("d").unwrap_or_default().to_string();
        let embed = params.contains("em");

        match params.first("e") {
            Some("l") => Ok(Some(StatEvent::Load(LoadEvent {
                token,
                hostname,
                device,
                prepare_only: params.contains("po"),
                embed,
                player_modes: params.all("pm").to_vec(),
                video_uids: params.all("vu").to_vec(),
            }))),
            Some("s") => {
                let video_uid = params
                    .first("vu")
                    .ok_or(StatError::BadParameters)?
                    .to_string();
                Ok(Some(StatEvent::Start(StartEvent {
                    token,
                    hostname,
                    device,
                    embed,
                    video_uid,
                    video_name: params.first("vn").map(str::to_string),
                    source_code: params.first("vc").map(str::to_string),
                })))
            }
            other => {
                debug!(event_type = ?other, "unknown event type, nothing to record");
                Ok(None)
            }
        }
    }
}
