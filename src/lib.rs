pub mod event;
pub mod stats;
pub mod useragent;

pub use event::{EventParams, Hostname, StatEvent};
pub use stats::{incs_to_json, stat_incs, stat_incs_with_hits};
pub use stats::{IncrementSet, SiteIncs, StatError, StatResult, VideoIncs};
pub use useragent::browser_and_platform_key;
