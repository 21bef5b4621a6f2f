//! Client-side session cache.
//!
//! - `store` - string key-value backends (memory with quota, directory of files)
//! - `clock` - injectable time source
//! - `session` - typed TTL cache over a store

mod clock;
mod session;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use session::SessionCache;
pub use store::{FileStore, KeyValueStore, MemoryStore};
