//! Dotted-key decoding back into nested JSON
//!
//! Reconstructs the subscriber-facing JSON view from an [`IncrementSet`],
//! tagging the site and each video with the caller-supplied `second`
//! sequence token. Decoding is a pure structural remap over the key
//! families produced by the classifier; unrecognized prefixes are dropped
//! so older decoders tolerate newer increment families.

use serde_json::{json, Map, Value};
use tracing::trace;

use crate::stats::models::{IncMap, IncrementSet};

/// Decode an increment set into `{"site": ..., "videos": [...]}`.
///
/// The site object is empty when its `inc` is empty; videos with empty
/// `inc` are omitted. Never fails.
pub fn incs_to_json(incs: &IncrementSet, second: i64) -> Value {
    let site = if incs.site.inc.is_empty() {
        json!({})
    } else {
        let mut out = Map::new();
        out.insert("id".to_string(), json!(second));
        decode_inc(&incs.site.inc, &mut out);
        Value::Object(out)
    };

    let videos: Vec<Value> = incs
        .videos
        .iter()
        .filter(|video| !video.inc.is_empty())
        .map(|video| {
            let mut out = Map::new();
            out.insert("id".to_string(), json!(second));
            out.insert("u".to_string(), json!(video.uid));
            if let Some(name) = &video.name {
                out.insert("n".to_string(), json!(name));
            }
            decode_inc(&video.inc, &mut out);
            Value::Object(out)
        })
        .collect();

    json!({ "site": site, "videos": videos })
}

fn decode_inc(inc: &IncMap, out: &mut Map<String, Value>) {
    for (key, &amount) in inc {
        let mut segments = key.split('.');
        let family = segments.next().unwrap_or_default();
        let seg1 = segments.next();
        let seg2 = segments.next();

        match (family, seg1, seg2) {
            // Scalar families: the segment only routed storage, drop it
            ("pv" | "vl" | "vv", Some(_), None) => add_scalar(out, family, amount),
            // One-level composites
            ("bp" | "vs", Some(segment), None) => {
                add_nested(out, family, &[segment], amount);
            }
            // Two-level composite
            ("md", Some(mode), Some(device)) => {
                add_nested(out, family, &[mode, device], amount);
            }
            _ => trace!(key = %key, "dropping unrecognized increment key"),
        }
    }
}

fn add_scalar(out: &mut Map<String, Value>, key: &str, amount: u64) {
    let current = out.get(key).and_then(Value::as_u64).unwrap_or(0);
    out.insert(key.to_string(), json!(current + amount));
}

fn add_nested(out: &mut Map<String, Value>, family: &str, path: &[&str], amount: u64) {
    let Some((leaf, intermediate)) = path.split_last() else {
        return;
    };

    let mut node = out
        .entry(family.to_string())
        .or_insert_with(|| json!({}));
    for segment in intermediate {
        let Some(map) = node.as_object_mut() else {
            return;
        };
        node = map.entry(segment.to_string()).or_insert_with(|| json!({}));
    }

    let Some(map) = node.as_object_mut() else {
        return;
    };
    let current = map.get(*leaf).and_then(Value::as_u64).unwrap_or(0);
    map.insert(leaf.to_string(), json!(current + amount));
}
