//! Event classification into counter increments
//!
//! `stat_incs` turns one raw analytics event into the increments to apply
//! to the site aggregate and each video aggregate. The dotted key families:
//!
//! - `pv.<h>` / `pv.em` — page view (site only)
//! - `vl.<h>` / `vl.em` — video load
//! - `vv.<h>` / `vv.em` — video view (start)
//! - `bp.<browser>-<platform>` — user-agent dimension
//! - `md.<mode>.<device>` — player mode per device
//! - `vs.<source>` — video source (start, video only)

use std::collections::BTreeMap;

use crate::event::{EventParams, LoadEvent, StartEvent, StatEvent};
use crate::stats::models::{IncrementSet, SiteIncs, VideoIncs};
use crate::stats::{StatError, StatResult};
use crate::useragent::browser_and_platform_key;

/// Classify an event with a single hit. See [`stat_incs_with_hits`].
pub fn stat_incs(params: &EventParams, user_agent: &str) -> StatResult<IncrementSet> {
    stat_incs_with_hits(params, user_agent, 1)
}

/// Classify an event into site and video counter increments.
///
/// Events missing any of the required global fields (or with an unknown
/// event type) yield an empty set, not an error: callers treat empty `inc`
/// maps as "nothing to persist". Malformed events — a start event without a
/// video identifier, a load event whose `pm` sequence is shorter than its
/// `vu` sequence, a tracked non-embed start without a source code — are
/// rejected with [`StatError::BadParameters`] and produce nothing partial.
///
/// `hits` scales every increment; one request can stand for several
/// identical observations.
pub fn stat_incs_with_hits(
    params: &EventParams,
    user_agent: &str,
    hits: u64,
) -> StatResult<IncrementSet> {
    let Some(event) = StatEvent::from_params(params)? else {
        return Ok(IncrementSet::empty(params.first("t").unwrap_or_default()));
    };

    match event {
        StatEvent::Load(load) => classify_load(&load, user_agent, hits),
        StatEvent::Start(start) => classify_start(&start, hits),
    }
}

fn classify_load(event: &LoadEvent, user_agent: &str, hits: u64) -> StatResult<IncrementSet> {
    let mut site = SiteIncs::new(&event.token);
    let mut videos = Vec::new();

    // Prepare-only loads record nothing.
    if !event.prepare_only {
        let tracked = event.hostname.is_tracked();
        // Computed once, shared between the site and every video slot.
        let bp = (tracked && !event.embed).then(|| browser_and_platform_key(user_agent));

        if !event.embed {
            site.record(format!("pv.{}", event.hostname.code()), hits);
        }
        if tracked {
            if event.embed {
                site.record("pv.em", hits);
            } else if let Some(bp) = &bp {
                site.record(format!("bp.{bp}"), hits);

                // Repeated player-mode codes aggregate into one key.
                let mut mode_counts: BTreeMap<&str, u64> = BTreeMap::new();
                for mode in &event.player_modes {
                    *mode_counts.entry(mode).or_insert(0) += 1;
                }
                for (mode, occurrences) in mode_counts {
                    site.record(
                        format!("md.{mode}.{}", event.device),
                        occurrences * hits,
                    );
                }
            }
        }

        for (slot, uid) in event.video_uids.iter().enumerate() {
            // Blank slot: no video loaded there.
            if uid.is_empty() {
                continue;
            }

            let mut video = VideoIncs::new(&event.token, uid);
            if !event.embed {
                video.record(format!("vl.{}", event.hostname.code()), hits);
            }
            if tracked {
                if event.embed {
                    video.record("vl.em", hits);
                } else if let Some(bp) = &bp {
                    video.record(format!("bp.{bp}"), hits);
                    let mode = event
                        .player_modes
                        .get(slot)
                        .ok_or(StatError::BadParameters)?;
                    video.record(format!("md.{mode}.{}", event.device), hits);
                }
            }
            videos.push(video);
        }
    }

    Ok(IncrementSet { site, videos })
}

fn classify_start(event: &StartEvent, hits: u64) -> StatResult<IncrementSet> {
    let mut site = SiteIncs::new(&event.token);
    let mut video =
        VideoIncs::with_name(&event.token, &event.video_uid, event.video_name.clone());

    if !event.embed {
        let key = format!("vv.{}", event.hostname.code());
        site.record(key.clone(), hits);
        video.record(key, hits);
    }
    if event.hostname.is_tracked() {
        if event.embed {
            site.record("vv.em", hits);
            video.record("vv.em", hits);
        } else {
            // Source code is tracked on the video only, never the site.
            let source = event
                .source_code
                .as_deref()
                .ok_or(StatError::BadParameters)?;
            video.record(format!("vs.{source}"), hits);
        }
    }

    Ok(IncrementSet {
        site,
        videos: vec![video],
    })
}
