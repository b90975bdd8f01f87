//! Deduplicated asset table keyed by asset identity.

use std::collections::HashMap;
use std::sync::Arc;

use orrery_assets::Keyed;
use orrery_types::AssetKey;

/// Maps asset keys to sequential export ids.
///
/// Ids are `0..n` in first-encounter order and never reassigned. The
/// hash map only serves lookups; iteration follows the insertion-ordered
/// list, so output built from a registry is deterministic.
#[derive(Debug)]
pub struct ExportRegistry<T: Keyed> {
    ids: HashMap<AssetKey, u32>,
    entries: Vec<Arc<T>>,
}

impl<T: Keyed> ExportRegistry<T> {
    pub fn new() -> Self {
        Self {
            ids: HashMap::new(),
            entries: Vec::new(),
        }
    }

    /// Returns the id of `asset`, inserting it if unseen.
    ///
    /// The flag is true when this call inserted the asset.
    pub fn register(&mut self, asset: &Arc<T>) -> (u32, bool) {
        let key = asset.asset_key();
        if let Some(&id) = self.ids.get(&key) {
            return (id, false);
        }
        let id = self.entries.len() as u32;
        self.ids.insert(key, id);
        self.entries.push(Arc::clone(asset));
        (id, true)
    }

    pub fn id_of(&self, key: AssetKey) -> Option<u32> {
        self.ids.get(&key).copied()
    }

    pub fn get(&self, id: u32) -> Option<&Arc<T>> {
        self.entries.get(id as usize)
    }

    /// Entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Arc<T>)> + '_ {
        self.entries.iter().enumerate().map(|(i, a)| (i as u32, a))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Keyed> Default for ExportRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
