use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MAX_PROMPT_CHARS: usize = 200;
const DOWNLOAD_STEM_CHARS: usize = 30;

/// A generated song, or one of the bundled examples. Only the lyrics can
/// change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    id: String,
    prompt: String,
    #[serde(rename = "mediaUrl", alias = "mediaRef", default)]
    media_ref: String,
    cover_art_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lyrics: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    is_example: bool,
}

impl Track {
    pub fn generated(
        prompt: impl Into<String>,
        media_ref: impl Into<String>,
        lyrics: impl Into<String>,
    ) -> Self {
        let id = Uuid::new_v4().to_string();
        Self {
            cover_art_url: cover_art_url(&id),
            id,
            prompt: prompt.into(),
            media_ref: media_ref.into(),
            lyrics: Some(lyrics.into()),
            is_example: false,
        }
    }

    pub fn example(id: &str, prompt: &str, lyrics: &str) -> Self {
        Self {
            id: id.to_string(),
            prompt: prompt.to_string(),
            media_ref: String::new(),
            cover_art_url: cover_art_url(id),
            lyrics: Some(lyrics.to_string()),
            is_example: true,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn media_ref(&self) -> &str {
        &self.media_ref
    }

    pub fn cover_art_url(&self) -> &str {
        &self.cover_art_url
    }

    pub fn lyrics(&self) -> Option<&str> {
        self.lyrics.as_deref()
    }

    pub fn is_example(&self) -> bool {
        self.is_example
    }

    pub fn is_playable(&self) -> bool {
        !self.is_example && !self.media_ref.is_empty()
    }

    /// Same track with new lyrics; blank text clears them.
    pub fn with_lyrics(&self, lyrics: impl Into<String>) -> Self {
        let lyrics = lyrics.into();
        Self {
            lyrics: (!lyrics.trim().is_empty()).then_some(lyrics),
            ..self.clone()
        }
    }

    pub fn download_file_name(&self) -> String {
        let stem: String = self
            .prompt
            .chars()
            .take(DOWNLOAD_STEM_CHARS)
            .map(|c| if c.is_whitespace() { '_' } else { c })
            .filter(|c| !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
            .collect();

        if stem.is_empty() {
            format!("{}.m4a", self.id)
        } else {
            format!("{stem}.m4a")
        }
    }
}

pub fn cover_art_url(id: &str) -> String {
    format!("https://picsum.photos/seed/{id}/500/500")
}
