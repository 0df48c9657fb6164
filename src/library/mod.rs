pub mod examples;
pub mod storage;
pub mod store;
pub mod track;

pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::{TRACKS_KEY, TrackStore};
pub use track::{MAX_PROMPT_CHARS, Track};
