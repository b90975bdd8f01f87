//! Strongly-typed identifiers and renderer handles.
//!
//! Newtype wrappers prevent accidental mixing of camera handles with
//! visual-model handles, or item ids from different physics systems.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

static NEXT_SYSTEM_ID: AtomicU32 = AtomicU32::new(0);
static NEXT_ASSET_KEY: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a physics system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SystemId(pub u32);

impl SystemId {
    /// Allocates a fresh, never reused system id.
    pub fn next() -> Self {
        Self(NEXT_SYSTEM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Handle to a physical item inside a physics system's arena.
///
/// The generation detects slot reuse: a handle to a removed item
/// never resolves to the item that later occupies the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId {
    /// Owning system.
    pub system: SystemId,
    /// Arena slot.
    pub index: u32,
    /// Slot generation at insertion time.
    pub generation: u32,
}

impl ItemId {
    /// Returns the slot index as `usize` for array indexing.
    #[inline]
    pub fn slot(self) -> usize {
        self.index as usize
    }
}

/// Stable identity of a visual asset (shape, material or model).
///
/// Assigned once when the asset is created. Shared `Arc`s of the same
/// asset carry the same key; equal-valued but separately created assets
/// do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetKey(pub u64);

impl AssetKey {
    /// Allocates a fresh asset key.
    pub fn next() -> Self {
        Self(NEXT_ASSET_KEY.fetch_add(1, Ordering::Relaxed))
    }
}

/// Handle to a camera issued by a visualization backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CameraId(pub i32);

impl CameraId {
    /// Returned by backends without multi-camera support.
    pub const INVALID: CameraId = CameraId(-1);

    #[inline]
    pub fn is_valid(self) -> bool {
        self.0 >= 0
    }
}

/// Handle to a visual model binding issued by a visualization backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VisualModelId(pub i32);

impl VisualModelId {
    /// Returned by backends without standalone visual model support.
    pub const INVALID: VisualModelId = VisualModelId(-1);

    #[inline]
    pub fn is_valid(self) -> bool {
        self.0 >= 0
    }
}

impl From<i32> for CameraId {
    fn from(val: i32) -> Self {
        Self(val)
    }
}

impl From<i32> for VisualModelId {
    fn from(val: i32) -> Self {
        Self(val)
    }
}
