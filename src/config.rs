use std::{path::PathBuf, time::Duration};

use color_eyre::eyre::{Result, WrapErr, eyre};
use directories::{ProjectDirs, UserDirs};

use crate::generation::{GenerationStrategy, poll::PollPolicy};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_VIDEO_MODEL: &str = "veo-2.0-generate-001";
pub const DEFAULT_PLAYER: &str = "mpv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub api_base: String,
    pub text_model: String,
    pub video_model: String,
    /// Per-request limit. Unset means a stalled call is waited on forever,
    /// like the polling loop itself.
    pub request_timeout: Option<Duration>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            video_model: DEFAULT_VIDEO_MODEL.to_string(),
            request_timeout: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub strategy: GenerationStrategy,
    pub poll: PollPolicy,
    pub player_program: String,
    pub data_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub download_dir: PathBuf,
    /// Used when no credential has been saved in settings.
    pub fallback_api_key: Option<String>,
    pub toast_duration: Duration,
    pub tick_rate: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api = ApiConfig {
            api_base: var("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            text_model: var("MELODY_TEXT_MODEL").unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
            video_model: var("MELODY_VIDEO_MODEL")
                .unwrap_or_else(|| DEFAULT_VIDEO_MODEL.to_string()),
            request_timeout: var("MELODY_REQUEST_TIMEOUT_SECS")
                .map(|raw| parse_secs("MELODY_REQUEST_TIMEOUT_SECS", &raw))
                .transpose()?
                .map(Duration::from_secs),
        };

        let strategy = match var("MELODY_STRATEGY") {
            Some(raw) => raw.parse::<GenerationStrategy>().wrap_err("Invalid MELODY_STRATEGY")?,
            None => GenerationStrategy::default(),
        };

        let mut poll = match var("MELODY_POLL_INTERVAL_SECS") {
            Some(raw) => PollPolicy::every(Duration::from_secs(parse_secs(
                "MELODY_POLL_INTERVAL_SECS",
                &raw,
            )?)),
            None => PollPolicy::default(),
        };
        if let Some(raw) = var("MELODY_POLL_MAX_ATTEMPTS") {
            let attempts = raw
                .trim()
                .parse::<u32>()
                .wrap_err_with(|| format!("Invalid MELODY_POLL_MAX_ATTEMPTS `{raw}`"))?;
            poll = poll.with_max_attempts(attempts);
        }
        if let Some(raw) = var("MELODY_POLL_MAX_SECS") {
            poll = poll.with_max_duration(Duration::from_secs(parse_secs(
                "MELODY_POLL_MAX_SECS",
                &raw,
            )?));
        }

        let project = ProjectDirs::from("com", "melody", "melody");
        let data_dir = match var("MELODY_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => project
                .as_ref()
                .map(|p| p.data_local_dir().to_path_buf())
                .ok_or_else(|| eyre!("Could not determine a data directory, set MELODY_DATA_DIR"))?,
        };
        let cache_dir = project
            .as_ref()
            .map(|p| p.cache_dir().to_path_buf())
            .unwrap_or_else(|| data_dir.join("cache"));
        let download_dir = UserDirs::new()
            .and_then(|u| u.download_dir().map(PathBuf::from))
            .unwrap_or_else(|| data_dir.clone());

        Ok(Self {
            api,
            strategy,
            poll,
            player_program: var("MELODY_PLAYER").unwrap_or_else(|| DEFAULT_PLAYER.to_string()),
            data_dir,
            cache_dir,
            download_dir,
            fallback_api_key: var("GEMINI_API_KEY").map(|k| k.trim().to_string()),
            toast_duration: Duration::from_secs(3),
            tick_rate: Duration::from_millis(250),
        })
    }
}

fn parse_secs(name: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .wrap_err_with(|| format!("Invalid {name} `{raw}`, expected whole seconds"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(move |name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[("MELODY_DATA_DIR", "/tmp/melody")]).unwrap();

        assert_eq!(config.api, ApiConfig::default());
        assert_eq!(config.api.request_timeout, None);
        assert_eq!(config.strategy, GenerationStrategy::Parallel);
        assert_eq!(config.poll, PollPolicy::default());
        assert!(!config.poll.is_bounded());
        assert_eq!(config.player_program, "mpv");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/melody"));
        assert_eq!(config.fallback_api_key, None);
        assert_eq!(config.toast_duration, Duration::from_secs(3));
    }

    #[test]
    fn overrides_are_read() {
        let config = config_from(&[
            ("MELODY_DATA_DIR", "/tmp/melody"),
            ("GEMINI_API_BASE", "http://localhost:9000/v1"),
            ("MELODY_STRATEGY", "Sequential"),
            ("MELODY_POLL_INTERVAL_SECS", "2"),
            ("MELODY_POLL_MAX_ATTEMPTS", "30"),
            ("MELODY_POLL_MAX_SECS", "600"),
            ("MELODY_PLAYER", "ffplay"),
            ("MELODY_REQUEST_TIMEOUT_SECS", "90"),
            ("GEMINI_API_KEY", " abc "),
        ])
        .unwrap();

        assert_eq!(config.api.api_base, "http://localhost:9000/v1");
        assert_eq!(config.api.request_timeout, Some(Duration::from_secs(90)));
        assert_eq!(config.strategy, GenerationStrategy::Sequential);
        assert_eq!(
            config.poll,
            PollPolicy::every(Duration::from_secs(2))
                .with_max_attempts(30)
                .with_max_duration(Duration::from_secs(600))
        );
        assert_eq!(config.player_program, "ffplay");
        assert_eq!(config.fallback_api_key.as_deref(), Some("abc"));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = config_from(&[("MELODY_DATA_DIR", "/tmp/melody"), ("MELODY_STRATEGY", "  ")])
            .unwrap();
        assert_eq!(config.strategy, GenerationStrategy::Parallel);
    }

    #[test]
    fn invalid_values_fail_with_the_variable_name() {
        let err = config_from(&[("MELODY_DATA_DIR", "/tmp/m"), ("MELODY_STRATEGY", "random")])
            .unwrap_err();
        assert!(err.to_string().contains("MELODY_STRATEGY"));

        let err = config_from(&[
            ("MELODY_DATA_DIR", "/tmp/m"),
            ("MELODY_POLL_INTERVAL_SECS", "ten"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("MELODY_POLL_INTERVAL_SECS"));
    }
}
