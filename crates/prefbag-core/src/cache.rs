//! Explicit cache of override snapshots.

use indexmap::IndexMap;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

use prefbag_types::prelude::*;

/// LRU cache of persisted-override snapshots keyed by resource identity.
///
/// Opt-in: the engine never consults this implicitly. Callers put a
/// snapshot (`Settings::all_saved`) after a sync and invalidate whenever
/// they write through another engine instance.
pub struct SettingsCache {
	cache: Arc<parking_lot::RwLock<LruCache<ResourceRef, IndexMap<String, SettingValue>>>>,
}

impl SettingsCache {
	pub fn new(capacity: usize) -> Self {
		let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
		Self { cache: Arc::new(parking_lot::RwLock::new(LruCache::new(capacity))) }
	}

	pub fn get(&self, resource: &ResourceRef) -> Option<IndexMap<String, SettingValue>> {
		let mut cache = self.cache.write();
		cache.get(resource).cloned()
	}

	pub fn put(&self, resource: ResourceRef, saved: IndexMap<String, SettingValue>) {
		let mut cache = self.cache.write();
		cache.put(resource, saved);
	}

	/// Drop one resource's snapshot
	pub fn invalidate(&self, resource: &ResourceRef) {
		let mut cache = self.cache.write();
		cache.pop(resource);
	}

	/// Invalidate all cached snapshots
	pub fn clear(&self) {
		let mut cache = self.cache.write();
		cache.clear();
	}

	pub fn len(&self) -> usize {
		self.cache.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.cache.read().is_empty()
	}
}

impl Clone for SettingsCache {
	fn clone(&self) -> Self {
		Self { cache: self.cache.clone() }
	}
}


// vim: ts=4
