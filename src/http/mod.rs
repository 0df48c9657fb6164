pub mod backend;
pub mod error;
pub mod models;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ApiConfig;

use self::{
    backend::{GenerationBackend, Operation},
    error::ApiError,
    models::{
        GenerateContentRequest, GenerateContentResponse, OperationResponse,
        PredictLongRunningRequest,
    },
};

const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GeminiClient {
    client: Client,
    api_base: String,
    text_model: String,
    video_model: String,
}

impl GeminiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            text_model: config.text_model.clone(),
            video_model: config.video_model.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        api_key: &str,
    ) -> Result<T, ApiError> {
        let response = request.header(API_KEY_HEADER, api_key).send().await?;
        let status = response.status();
        let body = response.text().await?;

        debug!(status = status.as_u16(), bytes = body.len(), "gemini_response");

        if !status.is_success() {
            let err = ApiError::from_response(status.as_u16(), &body);
            warn!(status = status.as_u16(), error = %err, "gemini_request_failed");
            return Err(err);
        }

        serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, "gemini_response_malformed");
            ApiError::Decode(e.to_string())
        })
    }
}

impl TryFrom<OperationResponse> for Operation {
    type Error = ApiError;

    fn try_from(response: OperationResponse) -> Result<Self, Self::Error> {
        if let Some(error) = response.error {
            if error.message.trim().is_empty() {
                return Err(ApiError::Opaque);
            }
            return Err(ApiError::Status {
                code: error.code.unwrap_or(500),
                status: error.status,
                message: error.message,
            });
        }

        let locators = response.locators();
        Ok(Operation {
            name: response.name,
            done: response.done,
            locators,
        })
    }
}

#[async_trait]
impl GenerationBackend for GeminiClient {
    async fn generate_text(&self, prompt: &str, api_key: &str) -> Result<String, ApiError> {
        let url = self.endpoint(&format!("models/{}:generateContent", self.text_model));
        let request = self
            .client
            .post(url)
            .json(&GenerateContentRequest::from_text(prompt));

        let response: GenerateContentResponse = self.send(request, api_key).await?;
        Ok(response.text())
    }

    async fn submit_video(&self, prompt: &str, api_key: &str) -> Result<Operation, ApiError> {
        let url = self.endpoint(&format!("models/{}:predictLongRunning", self.video_model));
        let request = self
            .client
            .post(url)
            .json(&PredictLongRunningRequest::single(prompt));

        let response: OperationResponse = self.send(request, api_key).await?;
        debug!(operation = response.name.as_str(), "video_operation_submitted");
        response.try_into()
    }

    async fn poll_operation(
        &self,
        operation: &Operation,
        api_key: &str,
    ) -> Result<Operation, ApiError> {
        let request = self.client.get(self.endpoint(&operation.name));
        let response: OperationResponse = self.send(request, api_key).await?;
        response.try_into()
    }
}
