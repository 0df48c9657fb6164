pub mod error;
pub mod media;
pub mod progress;
pub mod sink;
pub mod state;
pub mod surface;

pub use error::MediaError;
pub use media::{MediaHandle, MediaResolver};
pub use sink::{PlaybackSink, ProcessSink};
pub use state::PlayerState;
pub use surface::{PlaybackSurface, SourceStatus};
