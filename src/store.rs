//! Persistence of per-node layout positions across sessions.
//!
//! The whole mapping lives under one namespace key in a [`KeyValueStore`], encoded as a
//! flat JSON object `{"<node id>": {"x": .., "y": ..}}`. Backends range from an
//! in-memory map (tests, headless use) to a JSON file on native targets and the
//! browser's local storage on the web.

use crate::geometry::Point;
use crate::surface::RenderSurface;
use crate::types::{NodeId, PersistedPosition};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

/// A durable string key-value medium.
pub trait KeyValueStore {
    /// Reads the value stored under `key`.
    fn get_string(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_string(&mut self, key: &str, value: String);

    /// Deletes `key`.
    fn remove(&mut self, key: &str);

    /// Pushes buffered writes to the medium.
    fn flush(&mut self) {}
}

/// In-memory backend. Clones share the same map, so a clone outlives a store that
/// was handed the original and can be used to simulate a later session.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set_string(&mut self, key: &str, value: String) {
        self.entries.borrow_mut().insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// Native backend keeping all keys in one JSON file.
///
/// Every write rewrites the file. Read or write failures are logged and the store
/// keeps working from memory.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct FileStore {
    path: std::path::PathBuf,
    entries: HashMap<String, String>,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    /// Opens the store at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl Into<std::path::PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|err| {
                log::warn!("Ignoring corrupted store file {}: {err}", path.display());
                HashMap::new()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => {
                log::warn!("Failed to read store file {}: {err}", path.display());
                HashMap::new()
            }
        };
        Self { path, entries }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn write(&self) {
        let json = match serde_json::to_string_pretty(&self.entries) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("Failed to serialize store: {err}");
                return;
            }
        };
        if let Some(parent) = self.path.parent() {
            if let Err(err) = std::fs::create_dir_all(parent) {
                log::warn!("Failed to create {}: {err}", parent.display());
                return;
            }
        }
        if let Err(err) = std::fs::write(&self.path, json) {
            log::warn!("Failed to write store file {}: {err}", self.path.display());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStore for FileStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_string(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
        self.write();
    }

    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.write();
        }
    }
}

/// Browser backend over `window.localStorage`.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    storage: Option<web_sys::Storage>,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    /// Binds to the window's local storage. Without one, every read is empty and writes are dropped.
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|win| win.local_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("localStorage unavailable; node positions will not persist");
        }
        Self { storage }
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get_string(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set_string(&mut self, key: &str, value: String) {
        if let Some(storage) = &self.storage {
            if storage.set_item(key, &value).is_err() {
                log::warn!("localStorage rejected write to {key}");
            }
        }
    }

    fn remove(&mut self, key: &str) {
        if let Some(storage) = &self.storage {
            if storage.remove_item(key).is_err() {
                log::warn!("localStorage rejected removal of {key}");
            }
        }
    }
}

/// On-disk form of one position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct StoredPoint {
    x: f64,
    y: f64,
}

/// Persisted node positions, keyed by node id.
///
/// Holds at most one position per node. Positions for nodes missing from the
/// current diagram are kept but never applied.
///
/// Coordinates are stored as `f64` so large layouts round-trip without losing precision.
pub struct PositionStore {
    backend: Box<dyn KeyValueStore>,
    key: String,
}

impl PositionStore {
    /// Creates a store over `backend`, using `key` as the namespace.
    pub fn new(backend: impl KeyValueStore + 'static, key: impl Into<String>) -> Self {
        Self {
            backend: Box::new(backend),
            key: key.into(),
        }
    }

    /// Creates a store with the default namespace key.
    pub fn with_backend(backend: impl KeyValueStore + 'static) -> Self {
        Self::new(backend, crate::constants::POSITIONS_STORAGE_KEY)
    }

    /// The namespace key holding the mapping.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Decodes the whole mapping. Absent or corrupted records yield an empty map.
    fn load(&self) -> BTreeMap<NodeId, StoredPoint> {
        let Some(raw) = self.backend.get_string(&self.key) else {
            return BTreeMap::new();
        };
        if raw.trim().is_empty() {
            return BTreeMap::new();
        }
        serde_json::from_str(&raw).unwrap_or_else(|err| {
            log::warn!("Discarding corrupted position record under {}: {err}", self.key);
            BTreeMap::new()
        })
    }

    /// The persisted position of `node_id`, if any.
    pub fn get(&self, node_id: &str) -> Option<PersistedPosition> {
        self.load()
            .get(node_id)
            .map(|p| PersistedPosition::new(node_id, p.x, p.y))
    }

    /// Every persisted position.
    pub fn all(&self) -> Vec<PersistedPosition> {
        self.load()
            .into_iter()
            .map(|(id, p)| PersistedPosition::new(id, p.x, p.y))
            .collect()
    }

    /// Replaces the stored mapping with `positions`. Later entries for the same id win.
    pub fn set_all<I>(&mut self, positions: I)
    where
        I: IntoIterator<Item = PersistedPosition>,
    {
        let mapping: BTreeMap<NodeId, StoredPoint> = positions
            .into_iter()
            .map(|p| (p.node_id, StoredPoint { x: p.x, y: p.y }))
            .collect();
        match serde_json::to_string(&mapping) {
            Ok(json) => {
                self.backend.set_string(&self.key, json);
                self.backend.flush();
            }
            Err(err) => log::warn!("Failed to encode node positions: {err}"),
        }
    }

    /// Removes every persisted position.
    pub fn clear(&mut self) {
        self.backend.remove(&self.key);
        self.backend.flush();
    }

    /// Persists the live position of every node on `surface`.
    pub fn snapshot_from<S: RenderSurface + ?Sized>(&mut self, surface: &S) {
        let nodes = surface.nodes();
        log::debug!("Persisting {} node positions", nodes.len());
        self.set_all(nodes.iter().map(PersistedPosition::from));
    }

    /// Moves nodes on `surface` to their persisted positions and returns how many were restored.
    ///
    /// Records for nodes absent from the surface are left untouched.
    pub fn restore_into<S: RenderSurface + ?Sized>(&self, surface: &mut S) -> usize {
        let saved = self.load();
        if saved.is_empty() {
            return 0;
        }
        let mut restored = 0;
        for node in surface.nodes() {
            if let Some(point) = saved.get(&node.id) {
                let point = Point::new(point.x as f32, point.y as f32);
                surface.set_node_position(&node.id, point);
                restored += 1;
            }
        }
        log::debug!("Restored {restored} of {} persisted positions", saved.len());
        restored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::testing::RecordingSurface;

    fn store() -> (PositionStore, MemoryStore) {
        let backend = MemoryStore::new();
        (PositionStore::with_backend(backend.clone()), backend)
    }

    #[test]
    fn test_get_on_empty_store_is_absent() {
        let (store, _) = store();
        assert_eq!(store.get("a"), None);
        assert!(store.all().is_empty());
    }

    #[test]
    fn test_last_write_wins_within_batch() {
        let (mut store, _) = store();
        store.set_all(vec![
            PersistedPosition::new("a", 1.0, 1.0),
            PersistedPosition::new("a", 2.0, 2.0),
        ]);
        assert_eq!(store.get("a"), Some(PersistedPosition::new("a", 2.0, 2.0)));
    }

    #[test]
    fn test_set_all_overwrites_previous_batch() {
        let (mut store, _) = store();
        store.set_all(vec![PersistedPosition::new("a", 1.0, 1.0)]);
        store.set_all(vec![PersistedPosition::new("b", 3.0, 4.0)]);
        assert_eq!(store.get("a"), None);
        assert_eq!(store.get("b"), Some(PersistedPosition::new("b", 3.0, 4.0)));
    }

    #[test]
    fn test_clear_removes_every_position() {
        let (mut store, _) = store();
        let ids = ["a", "b", "c"];
        store.set_all(
            ids.iter()
                .enumerate()
                .map(|(i, id)| PersistedPosition::new(*id, i as f64, 0.0)),
        );
        store.clear();
        for id in ids {
            assert_eq!(store.get(id), None);
        }
    }

    #[test]
    fn test_clear_drops_the_backend_key() {
        let (mut store, backend) = store();
        store.set_all(vec![PersistedPosition::new("a", 1.0, 1.0)]);
        assert!(backend.get_string(store.key()).is_some());
        store.clear();
        assert_eq!(backend.get_string(store.key()), None);
        // Clearing an already empty store is harmless
        store.clear();
        assert!(store.all().is_empty());
    }

    #[test]
    fn test_large_coordinates_keep_double_precision() {
        let (mut store, backend) = store();
        // Neither value is representable as f32
        store.set_all(vec![PersistedPosition::new("far", 12_345_678.25, -98_765_432.125)]);

        let reloaded = PositionStore::with_backend(backend);
        let saved = reloaded.get("far").unwrap();
        assert_eq!(saved.x, 12_345_678.25);
        assert_eq!(saved.y, -98_765_432.125);
    }

    #[test]
    fn test_corrupted_record_reads_as_empty() {
        let (mut store, mut backend) = store();
        backend.set_string(crate::constants::POSITIONS_STORAGE_KEY, "{not json".into());
        assert_eq!(store.get("a"), None);
        // A fresh write repairs the record
        store.set_all(vec![PersistedPosition::new("a", 5.0, 6.0)]);
        assert_eq!(store.get("a"), Some(PersistedPosition::new("a", 5.0, 6.0)));
    }

    #[test]
    fn test_flat_record_encoding() {
        let (mut store, backend) = store();
        store.set_all(vec![PersistedPosition::new("a", 1.5, -2.0)]);
        let raw = backend.get_string(store.key()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["a"]["x"], 1.5);
        assert_eq!(value["a"]["y"], -2.0);
    }

    #[test]
    fn test_positions_survive_into_next_session() {
        let backend = MemoryStore::new();
        let mut surface = RecordingSurface::with_nodes(3);
        surface.nodes[1].position = Point::new(99.0, -1.0);
        PositionStore::with_backend(backend.clone()).snapshot_from(&surface);

        let next_session = PositionStore::with_backend(backend);
        let mut fresh = RecordingSurface::with_nodes(2);
        let restored = next_session.restore_into(&mut fresh);
        assert_eq!(restored, 2);
        assert_eq!(fresh.nodes[1].position, Point::new(99.0, -1.0));
    }

    #[test]
    fn test_restore_ignores_unknown_nodes() {
        let (mut store, _) = store();
        store.set_all(vec![PersistedPosition::new("ghost", 1.0, 1.0)]);
        let mut surface = RecordingSurface::with_nodes(2);
        assert_eq!(store.restore_into(&mut surface), 0);
        assert!(surface.calls.is_empty());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_store_round_trips_through_disk() {
        let dir = std::env::temp_dir().join(format!("topology_viewport_test_{}", std::process::id()));
        let path = dir.join("positions.json");
        let _ = std::fs::remove_file(&path);

        let mut store = PositionStore::with_backend(FileStore::open(&path));
        store.set_all(vec![PersistedPosition::new("a", 7.0, 8.0)]);

        let reopened = PositionStore::with_backend(FileStore::open(&path));
        assert_eq!(reopened.get("a"), Some(PersistedPosition::new("a", 7.0, 8.0)));

        std::fs::write(&path, "garbage").unwrap();
        let corrupted = PositionStore::with_backend(FileStore::open(&path));
        assert_eq!(corrupted.get("a"), None);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
