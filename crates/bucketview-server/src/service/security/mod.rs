//! Session verification keys.

mod session_keys;

pub use session_keys::{SessionAlgorithm, SessionKeys, SessionKeysConfig};
