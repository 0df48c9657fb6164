use std::sync::Arc;

use tracing::{error, info};

use crate::library::KeyValueStore;

pub const API_KEY_KEY: &str = "gemini-api-key";

/// User preferences kept in durable storage. Currently just the Gemini
/// credential.
pub struct Settings {
    api_key: Option<String>,
    storage: Arc<dyn KeyValueStore>,
}

impl Settings {
    /// A stored key wins over `fallback`; the fallback is never written back.
    pub fn load(storage: Arc<dyn KeyValueStore>, fallback: Option<String>) -> Self {
        let stored = match storage.get(API_KEY_KEY) {
            Ok(value) => value,
            Err(e) => {
                error!(error = %e, "Failed to read API key from storage");
                None
            }
        };

        let api_key = normalize(stored).or_else(|| normalize(fallback));

        Self { api_key, storage }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn set_api_key(&mut self, key: Option<String>) {
        let key = normalize(key);

        let result = match &key {
            Some(k) => self.storage.set(API_KEY_KEY, k),
            None => self.storage.remove(API_KEY_KEY),
        };
        if let Err(e) = result {
            error!(error = %e, "Failed to save API key to storage");
        }

        info!(present = key.is_some(), "api_key_updated");
        self.api_key = key;
    }
}

fn normalize(key: Option<String>) -> Option<String> {
    key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty())
}
