//! Random number generation
//!
//! Arrivals, destinations and burst spawning all draw from one
//! [`RngManager`]; nothing in the engine touches another source of
//! randomness.

mod xorshift;

pub use xorshift::RngManager;
