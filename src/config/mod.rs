//! Configuration parsing.

pub mod duration;
mod remote;

pub use duration::{parse_duration, parse_duration_to_secs};
pub use remote::{sanitize_connection_string, ConnectionStringError, RemoteConfig};
