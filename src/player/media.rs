use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    time::Duration,
};

use reqwest::Client;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::library::Track;

use super::error::MediaError;

/// Fetched media bytes held in a temporary file. The file is deleted when
/// the handle is dropped.
#[derive(Debug)]
pub struct MediaHandle {
    file: NamedTempFile,
    track_id: String,
    duration: Option<Duration>,
}

impl MediaHandle {
    pub fn write(dir: &Path, track_id: &str, bytes: &[u8]) -> Result<Self, MediaError> {
        std::fs::create_dir_all(dir)?;
        let mut file = tempfile::Builder::new()
            .prefix("melody-")
            .suffix(".m4a")
            .tempfile_in(dir)?;
        file.write_all(bytes)?;
        file.flush()?;

        Ok(Self {
            file,
            track_id: track_id.to_string(),
            duration: probe_mp4_duration(bytes),
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn track_id(&self) -> &str {
        &self.track_id
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }
}

impl Drop for MediaHandle {
    fn drop(&mut self) {
        debug!(
            track_id = %self.track_id,
            path = %self.file.path().display(),
            "media_handle_released"
        );
    }
}

/// Turns a track's media URL into a local file, for playback or for saving.
#[derive(Debug, Clone)]
pub struct MediaResolver {
    client: Client,
    cache_dir: PathBuf,
}

impl MediaResolver {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Result<Self, MediaError> {
        Ok(Self {
            client: Client::builder().build()?,
            cache_dir: cache_dir.into(),
        })
    }

    pub async fn fetch(&self, track: &Track) -> Result<MediaHandle, MediaError> {
        if track.media_ref().is_empty() {
            return Err(MediaError::NoSource);
        }

        let response = self.client.get(track.media_ref()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::Status(status.as_u16()));
        }
        let bytes = response.bytes().await?;
        debug!(track_id = track.id(), bytes = bytes.len(), "media_fetched");

        let dir = self.cache_dir.clone();
        let track_id = track.id().to_string();
        tokio::task::spawn_blocking(move || MediaHandle::write(&dir, &track_id, &bytes))
            .await
            .map_err(|e| MediaError::Io(io::Error::other(e)))?
    }

    /// Fetches through a separate handle and copies it into `dest_dir`. The
    /// handle is released whether or not the copy succeeds.
    pub async fn download(&self, track: &Track, dest_dir: &Path) -> Result<PathBuf, MediaError> {
        let handle = self.fetch(track).await?;

        tokio::fs::create_dir_all(dest_dir).await?;
        let dest = unique_path(dest_dir, &track.download_file_name());
        tokio::fs::copy(handle.path(), &dest).await?;

        info!(track_id = track.id(), dest = %dest.display(), "track_downloaded");
        Ok(dest)
    }
}

fn unique_path(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = file_name.rsplit_once('.').unwrap_or((file_name, ""));
    (1..)
        .map(|n| {
            if ext.is_empty() {
                dir.join(format!("{stem} ({n})"))
            } else {
                dir.join(format!("{stem} ({n}).{ext}"))
            }
        })
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

/// Reads the movie duration from an ISO-BMFF `moov/mvhd` box.
pub fn probe_mp4_duration(bytes: &[u8]) -> Option<Duration> {
    let moov = find_box(bytes, b"moov")?;
    let mvhd = find_box(moov, b"mvhd")?;

    let version = *mvhd.first()?;
    let (timescale, duration) = match version {
        0 => (read_u32(mvhd, 12)?, u64::from(read_u32(mvhd, 16)?)),
        1 => (read_u32(mvhd, 20)?, read_u64(mvhd, 24)?),
        _ => return None,
    };

    if timescale == 0 || duration == 0 || duration == u64::MAX {
        return None;
    }
    Some(Duration::from_secs_f64(duration as f64 / f64::from(timescale)))
}

/// Payload of the first box of type `kind` among the boxes in `data`.
fn find_box<'a>(mut data: &'a [u8], kind: &[u8; 4]) -> Option<&'a [u8]> {
    while data.len() >= 8 {
        let size = read_u32(data, 0)? as u64;
        let (header, size) = match size {
            0 => (8, data.len() as u64),
            1 => (16, read_u64(data, 8)?),
            n => (8, n),
        };
        let size = usize::try_from(size).ok()?;
        if size < header || size > data.len() {
            return None;
        }
        if &data[4..8] == kind {
            return Some(&data[header..size]);
        }
        data = &data[size..];
    }
    None
}

fn read_u32(data: &[u8], at: usize) -> Option<u32> {
    let bytes = data.get(at..at + 4)?;
    Some(u32::from_be_bytes(bytes.try_into().ok()?))
}

fn read_u64(data: &[u8], at: usize) -> Option<u64> {
    let bytes = data.get(at..at + 8)?;
    Some(u64::from_be_bytes(bytes.try_into().ok()?))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    fn mp4_box(kind: &[u8; 4], payload: &[u8]) -> Vec<u8> {
        let mut out = ((payload.len() + 8) as u32).to_be_bytes().to_vec();
        out.extend_from_slice(kind);
        out.extend_from_slice(payload);
        out
    }

    /// Minimal `ftyp` + `moov/mvhd` file lasting `secs` seconds.
    pub(crate) fn tiny_mp4(secs: u32) -> Vec<u8> {
        let mut mvhd = vec![0u8; 4 + 4 + 4];
        mvhd.extend_from_slice(&1000u32.to_be_bytes());
        mvhd.extend_from_slice(&(secs * 1000).to_be_bytes());
        mvhd.extend_from_slice(&[0u8; 80]);

        let mut file = mp4_box(b"ftyp", b"isom\0\0\0\0");
        file.extend(mp4_box(b"moov", &mp4_box(b"mvhd", &mvhd)));
        file
    }

    #[test]
    fn reads_duration_from_mvhd() {
        assert_eq!(probe_mp4_duration(&tiny_mp4(8)), Some(Duration::from_secs(8)));
    }

    #[test]
    fn reads_version_one_header() {
        let mut mvhd = vec![1u8, 0, 0, 0];
        mvhd.extend_from_slice(&[0u8; 16]);
        mvhd.extend_from_slice(&600u32.to_be_bytes());
        mvhd.extend_from_slice(&3000u64.to_be_bytes());
        let file = mp4_box(b"moov", &mp4_box(b"mvhd", &mvhd));

        assert_eq!(probe_mp4_duration(&file), Some(Duration::from_secs(5)));
    }

    #[test]
    fn garbage_has_no_duration() {
        assert_eq!(probe_mp4_duration(b"not a movie at all"), None);
        assert_eq!(probe_mp4_duration(&[]), None);
        assert_eq!(probe_mp4_duration(&mp4_box(b"free", &[0; 32])), None);
    }

    #[test]
    fn handle_file_goes_away_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let handle = MediaHandle::write(dir.path(), "t1", &tiny_mp4(3)).unwrap();
        let path = handle.path().to_path_buf();

        assert!(path.exists());
        assert_eq!(handle.track_id(), "t1");
        assert_eq!(handle.duration(), Some(Duration::from_secs(3)));

        drop(handle);
        assert!(!path.exists());
    }

    #[test]
    fn unique_path_avoids_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("song.m4a"), b"x").unwrap();
        std::fs::write(dir.path().join("song (1).m4a"), b"x").unwrap();

        assert_eq!(
            unique_path(dir.path(), "song.m4a"),
            dir.path().join("song (2).m4a")
        );
        assert_eq!(unique_path(dir.path(), "new.m4a"), dir.path().join("new.m4a"));
    }
}
