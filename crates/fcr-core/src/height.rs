//! # Block Heights and Height Sources
//!
//! Record timestamps in the registry are block-height-like monotonic
//! counters rather than wall-clock instants. [`BlockHeight`] is the value
//! type; [`HeightSource`] is where a registry reads "now" from when an
//! operation stamps a record (`created_at`, `last_updated`).
//!
//! Facility verification is the exception: the caller supplies the height
//! explicitly, and the registry stores it verbatim.
//!
//! ## Sources
//!
//! - [`ManualHeight`]: an atomic counter that only moves when told to.
//!   Deterministic; used by tests and by scripted runs.
//! - [`WallClockHeight`]: UTC unix seconds, for deployments without a
//!   chain to follow.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A block-height-like position on a monotonic counter.
///
/// `BlockHeight::GENESIS` (zero) doubles as "never happened" for facility
/// records that have not been verified.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BlockHeight(pub u64);

impl BlockHeight {
    /// Height zero.
    pub const GENESIS: Self = Self(0);

    /// The raw counter value.
    pub fn get(&self) -> u64 {
        self.0
    }

    /// Height `by` steps later, saturating at `u64::MAX`.
    pub fn advanced(&self, by: u64) -> Self {
        Self(self.0.saturating_add(by))
    }
}

impl From<u64> for BlockHeight {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a registry reads the current height from.
pub trait HeightSource: Send + Sync + std::fmt::Debug {
    /// The current height.
    fn current(&self) -> BlockHeight;

    /// Move the source forward by `by` steps and return the new height.
    ///
    /// Sources that follow an external clock cannot be moved and return
    /// `None`.
    fn advance(&self, _by: u64) -> Option<BlockHeight> {
        None
    }
}

/// A settable counter.
#[derive(Debug, Default)]
pub struct ManualHeight {
    height: AtomicU64,
}

impl ManualHeight {
    /// Start the counter at `start`.
    pub fn new(start: impl Into<BlockHeight>) -> Self {
        Self {
            height: AtomicU64::new(start.into().0),
        }
    }

    /// Jump to an arbitrary height. Moving backwards is allowed.
    pub fn set(&self, height: impl Into<BlockHeight>) {
        self.height.store(height.into().0, Ordering::SeqCst);
    }
}

impl HeightSource for ManualHeight {
    fn current(&self) -> BlockHeight {
        BlockHeight(self.height.load(Ordering::SeqCst))
    }

    fn advance(&self, by: u64) -> Option<BlockHeight> {
        let mut current = self.height.load(Ordering::SeqCst);
        loop {
            let next = current.saturating_add(by);
            match self.height.compare_exchange_weak(
                current,
                next,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return Some(BlockHeight(next)),
                Err(actual) => current = actual,
            }
        }
    }
}

/// UTC unix seconds as a height.
#[derive(Debug, Default, Clone, Copy)]
pub struct WallClockHeight;

impl HeightSource for WallClockHeight {
    fn current(&self) -> BlockHeight {
        // Pre-epoch clocks clamp to genesis.
        BlockHeight(u64::try_from(Utc::now().timestamp()).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genesis_is_zero() {
        assert_eq!(BlockHeight::GENESIS.get(), 0);
        assert_eq!(BlockHeight::default(), BlockHeight::GENESIS);
    }

    #[test]
    fn test_advanced_saturates() {
        assert_eq!(BlockHeight(u64::MAX).advanced(1), BlockHeight(u64::MAX));
        assert_eq!(BlockHeight(10).advanced(5), BlockHeight(15));
    }

    #[test]
    fn test_manual_height_set_and_advance() {
        let heights = ManualHeight::new(12345);
        assert_eq!(heights.current(), BlockHeight(12345));
        assert_eq!(heights.advance(5), Some(BlockHeight(12350)));
        assert_eq!(heights.current(), BlockHeight(12350));
        heights.set(7);
        assert_eq!(heights.current(), BlockHeight(7));
    }

    #[test]
    fn test_wall_clock_cannot_advance() {
        let clock = WallClockHeight;
        assert!(clock.current() > BlockHeight::GENESIS);
        assert_eq!(clock.advance(1), None);
    }

    #[test]
    fn test_ordering() {
        assert!(BlockHeight(1) < BlockHeight(2));
    }

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&BlockHeight(12345)).unwrap(), "12345");
    }
}
