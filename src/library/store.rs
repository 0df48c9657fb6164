use std::sync::Arc;

use tracing::{debug, error, warn};

use super::{
    examples::example_tracks,
    storage::{KeyValueStore, StorageError},
    track::Track,
};

pub const TRACKS_KEY: &str = "melody-ai-tracks";

/// Tracks in newest-first order. The in-memory list is authoritative for the
/// session; storage failures are logged and otherwise ignored.
pub struct TrackStore {
    tracks: Vec<Track>,
    storage: Arc<dyn KeyValueStore>,
}

impl TrackStore {
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let tracks = match storage.get(TRACKS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Track>>(&raw) {
                Ok(tracks) if !tracks.is_empty() => tracks,
                Ok(_) => example_tracks(),
                Err(e) => {
                    error!(error = %e, "Failed to parse stored tracks");
                    example_tracks()
                }
            },
            Ok(None) => example_tracks(),
            Err(e) => {
                error!(error = %e, "Failed to load tracks from storage");
                example_tracks()
            }
        };

        debug!(count = tracks.len(), "track_store_loaded");
        Self { tracks, storage }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id() == id)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Puts a freshly generated track first. Example tracks are dropped: once
    /// something real exists they are no longer shown.
    pub fn append(&mut self, track: Track) {
        self.tracks
            .retain(|t| !t.is_example() && t.id() != track.id());
        self.tracks.insert(0, track);
        self.persist();
    }

    /// Replaces the track with the same id in place. Returns `false` when no
    /// such track exists.
    pub fn update(&mut self, track: Track) -> bool {
        let Some(slot) = self.tracks.iter_mut().find(|t| t.id() == track.id()) else {
            warn!(id = track.id(), "track_update_unknown_id");
            return false;
        };
        *slot = track;
        self.persist();
        true
    }

    pub fn persistable(&self) -> Vec<&Track> {
        self.tracks.iter().filter(|t| !t.is_example()).collect()
    }

    /// Writes the non-example tracks. An empty set is never written so a
    /// transient empty state cannot wipe what is already stored.
    pub fn persist(&self) {
        let tracks = self.persistable();
        if tracks.is_empty() {
            debug!("track_store_persist_skipped");
            return;
        }

        let result = serde_json::to_string(&tracks)
            .map_err(StorageError::from)
            .and_then(|json| self.storage.set(TRACKS_KEY, &json));

        if let Err(e) = result {
            error!(error = %e, "Failed to save tracks to storage");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::storage::MemoryStore;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::InvalidKey(key.to_string()))
        }

        fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::InvalidKey(key.to_string()))
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            Err(StorageError::InvalidKey(key.to_string()))
        }
    }

    fn stored(storage: &MemoryStore) -> Vec<Track> {
        let raw = storage.get(TRACKS_KEY).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn empty_storage_starts_with_examples() {
        let storage = Arc::new(MemoryStore::new());
        let store = TrackStore::load(storage.clone());

        assert_eq!(store.len(), 3);
        assert!(store.tracks().iter().all(Track::is_example));
        assert_eq!(storage.get(TRACKS_KEY).unwrap(), None);
    }

    #[test]
    fn corrupt_storage_falls_back_to_examples() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(TRACKS_KEY, "{not json").unwrap();

        let store = TrackStore::load(storage);
        assert!(store.tracks().iter().all(Track::is_example));
    }

    #[test]
    fn unreadable_storage_falls_back_to_examples() {
        let store = TrackStore::load(Arc::new(BrokenStore));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn appended_tracks_read_back_newest_first() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = TrackStore::load(storage.clone());

        let tracks: Vec<Track> = (0..4)
            .map(|i| Track::generated(format!("song {i}"), format!("https://m/{i}"), "la"))
            .collect();
        for t in &tracks {
            store.append(t.clone());
        }

        let expected: Vec<Track> = tracks.iter().rev().cloned().collect();
        assert_eq!(store.tracks(), expected.as_slice());
        assert_eq!(stored(&storage), expected);
    }

    #[test]
    fn examples_never_reach_storage() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = TrackStore::load(storage.clone());
        store.append(Track::generated("song", "https://m/1", "la"));

        assert!(store.tracks().iter().all(|t| !t.is_example()));
        assert!(stored(&storage).iter().all(|t| !t.is_example()));
        let raw = storage.get(TRACKS_KEY).unwrap().unwrap();
        assert!(!raw.contains("example1"));
    }

    #[test]
    fn persist_with_only_examples_keeps_existing_data() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(TRACKS_KEY, "previous").unwrap();

        let store = TrackStore {
            tracks: example_tracks(),
            storage: storage.clone(),
        };
        store.persist();

        assert_eq!(storage.get(TRACKS_KEY).unwrap().as_deref(), Some("previous"));
    }

    #[test]
    fn update_replaces_in_place() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = TrackStore::load(storage.clone());
        let first = Track::generated("one", "https://m/1", "a");
        let second = Track::generated("two", "https://m/2", "b");
        store.append(first.clone());
        store.append(second.clone());

        assert!(store.update(first.with_lyrics("edited")));

        assert_eq!(store.tracks()[0], second);
        assert_eq!(store.tracks()[1].lyrics(), Some("edited"));
        assert_eq!(stored(&storage)[1].lyrics(), Some("edited"));
    }

    #[test]
    fn update_of_unknown_id_is_a_no_op() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = TrackStore::load(storage);
        let before = store.tracks().to_vec();

        assert!(!store.update(Track::generated("ghost", "https://m/x", "")));
        assert_eq!(store.tracks(), before.as_slice());
    }

    #[test]
    fn reload_reproduces_persisted_tracks_without_examples() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = TrackStore::load(storage.clone());
        store.append(Track::generated("one", "https://m/1", "a"));
        store.append(Track::generated("two", "https://m/2", "b"));
        let saved = store.tracks().to_vec();

        let reloaded = TrackStore::load(storage);
        assert_eq!(reloaded.tracks(), saved.as_slice());
    }

    #[test]
    fn write_failures_do_not_lose_memory_state() {
        let mut store = TrackStore::load(Arc::new(BrokenStore));
        let t = Track::generated("one", "https://m/1", "a");
        store.append(t.clone());

        assert_eq!(store.tracks(), &[t]);
    }
}
