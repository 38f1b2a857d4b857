//! Persistent dependency cache
//!
//! Build containers live only as long as one pipeline. The local Maven
//! repository lives in a named volume mounted into each of them, so
//! dependencies downloaded by one run are there for the next.

pub mod volume;

pub use volume::{ensure_cache_volume, labels, CacheMount, CacheVolume};
