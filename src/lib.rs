#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Singly-linked bucket chains used by [`ChainingMap`].
pub mod chain;

/// A hash map using separate chaining.
///
/// This module provides a [`ChainingMap`] whose buckets are singly-linked
/// chains and which only resizes when asked to.
pub mod chaining;

pub mod hash;
mod mode;

/// A hash map using open addressing with quadratic probing.
///
/// This module provides an [`OpenAddressingMap`] with tombstone deletion that
/// doubles its prime-sized bucket array whenever it reaches half full.
pub mod open_addressing;

pub mod prime;

#[cfg(any(test, feature = "stats"))]
pub mod stats;

/// Bucket count used by `new()`, `with_hasher()` and `Default`.
pub const DEFAULT_CAPACITY: usize = 11;

pub use chaining::ChainingMap;
pub use mode::find_mode;
pub use open_addressing::OpenAddressingMap;
