//! Fixed-Capacity Ring Buffer
//!
//! Bounded history of the most recent samples. Pushing into a full buffer
//! evicts the oldest sample.

mod buffer;

pub use buffer::{RingBuffer, DEFAULT_CAPACITY};
