use std::time::Duration;

use crate::source::SourcePattern;

/// Compiled-in client configuration.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub user_id: u64,
    pub source_patterns: Vec<SourcePattern>,
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
    pub connect_timeout: Duration,
    /// Per-call timeout; the poll budget bounds the lifecycle as a whole.
    pub request_timeout: Duration,
    pub max_export_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            user_id: 1,
            source_patterns: vec![
                SourcePattern::new("bilibili.com", "/video"),
                SourcePattern::new("youtube.com", "/watch"),
            ],
            poll_interval: Duration::from_millis(5_000),
            max_poll_attempts: 60,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_export_bytes: 5 * 1024 * 1024,
        }
    }
}
