pub mod bounded;
pub mod logging;

pub use bounded::{bounded_wait, TimedOut};
