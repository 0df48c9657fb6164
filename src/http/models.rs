use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest<'a> {
    pub contents: Vec<Content<'a>>,
}

impl<'a> GenerateContentRequest<'a> {
    pub fn from_text(text: &'a str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text }],
            }],
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Content<'a> {
    pub parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
pub struct Part<'a> {
    pub text: &'a str,
}

#[derive(Debug, Deserialize, Default)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, with all of its text parts joined.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PredictLongRunningRequest<'a> {
    pub instances: Vec<VideoInstance<'a>>,
    pub parameters: VideoParameters,
}

impl<'a> PredictLongRunningRequest<'a> {
    pub fn single(prompt: &'a str) -> Self {
        Self {
            instances: vec![VideoInstance { prompt }],
            parameters: VideoParameters { sample_count: 1 },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VideoInstance<'a> {
    pub prompt: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoParameters {
    pub sample_count: u32,
}

#[derive(Debug, Deserialize)]
pub struct OperationResponse {
    pub name: String,
    #[serde(default)]
    pub done: bool,
    pub error: Option<ErrorBody>,
    pub response: Option<VideoResponse>,
}

impl OperationResponse {
    pub fn locators(&self) -> Vec<String> {
        self.response
            .as_ref()
            .and_then(|r| r.generate_video_response.as_ref())
            .map(|r| {
                r.generated_samples
                    .iter()
                    .filter_map(|s| s.video.as_ref().and_then(|v| v.uri.clone()))
                    .filter(|uri| !uri.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResponse {
    pub generate_video_response: Option<GeneratedSamples>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSamples {
    #[serde(default, alias = "generatedVideos")]
    pub generated_samples: Vec<GeneratedSample>,
}

#[derive(Debug, Deserialize)]
pub struct GeneratedSample {
    pub video: Option<VideoRef>,
}

#[derive(Debug, Deserialize)]
pub struct VideoRef {
    pub uri: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
    pub status: Option<String>,
}
