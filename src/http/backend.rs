use async_trait::async_trait;

use super::error::ApiError;

/// Handle of a long-running media generation job on the remote side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub name: String,
    pub done: bool,
    pub locators: Vec<String>,
}

impl Operation {
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            done: false,
            locators: Vec::new(),
        }
    }

    pub fn finished(name: impl Into<String>, locators: Vec<String>) -> Self {
        Self {
            name: name.into(),
            done: true,
            locators,
        }
    }

    pub fn first_locator(&self) -> Option<&str> {
        self.locators.first().map(String::as_str)
    }
}

#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate_text(&self, prompt: &str, api_key: &str) -> Result<String, ApiError>;

    async fn submit_video(&self, prompt: &str, api_key: &str) -> Result<Operation, ApiError>;

    async fn poll_operation(
        &self,
        operation: &Operation,
        api_key: &str,
    ) -> Result<Operation, ApiError>;
}
