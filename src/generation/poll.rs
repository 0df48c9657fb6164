use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::http::backend::{GenerationBackend, Operation};

use super::error::GenerationError;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// How a pending media operation is re-fetched. Without bounds the loop runs
/// until the operation is done or a status call fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: Option<u32>,
    pub max_duration: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: None,
            max_duration: None,
        }
    }
}

impl PollPolicy {
    pub fn every(interval: Duration) -> Self {
        Self {
            interval,
            ..Self::default()
        }
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    pub fn with_max_duration(mut self, duration: Duration) -> Self {
        self.max_duration = Some(duration);
        self
    }

    pub fn is_bounded(&self) -> bool {
        self.max_attempts.is_some() || self.max_duration.is_some()
    }

    fn exhausted(&self, attempts: u32, started: Instant) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
            || self
                .max_duration
                .is_some_and(|max| started.elapsed() + self.interval > max)
    }

    pub async fn wait_for<B>(
        &self,
        backend: &B,
        mut operation: Operation,
        api_key: &str,
    ) -> Result<Operation, GenerationError>
    where
        B: GenerationBackend + ?Sized,
    {
        let started = Instant::now();
        let mut attempts = 0u32;

        while !operation.done {
            if self.exhausted(attempts, started) {
                warn!(
                    operation = operation.name.as_str(),
                    attempts, "media_operation_poll_limit"
                );
                return Err(GenerationError::PollLimitReached { attempts });
            }

            tokio::time::sleep(self.interval).await;
            attempts += 1;
            debug!(operation = operation.name.as_str(), attempts, "media_operation_poll");
            operation = backend.poll_operation(&operation, api_key).await?;
        }

        info!(
            operation = operation.name.as_str(),
            attempts,
            elapsed_ms = started.elapsed().as_millis(),
            "media_operation_done"
        );
        Ok(operation)
    }
}
