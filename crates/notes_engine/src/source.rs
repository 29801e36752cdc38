use url::Url;

/// A supported page: host equal to (or a subdomain of) `host_suffix`, with a
/// path starting at `path_prefix`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePattern {
    pub host_suffix: String,
    pub path_prefix: String,
}

impl SourcePattern {
    pub fn new(host_suffix: impl Into<String>, path_prefix: impl Into<String>) -> Self {
        Self {
            host_suffix: host_suffix.into().to_ascii_lowercase(),
            path_prefix: path_prefix.into(),
        }
    }

    fn matches(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.to_ascii_lowercase();
        let host_ok = host == self.host_suffix
            || host
                .strip_suffix(&self.host_suffix)
                .is_some_and(|prefix| prefix.ends_with('.'));
        host_ok && url.path().starts_with(&self.path_prefix)
    }
}

/// Allow-list consulted before any submission reaches the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePolicy {
    patterns: Vec<SourcePattern>,
}

impl SourcePolicy {
    pub fn new(patterns: Vec<SourcePattern>) -> Self {
        Self { patterns }
    }

    pub fn is_supported(&self, raw: &str) -> bool {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return false;
        }
        let Ok(url) = Url::parse(trimmed) else {
            return false;
        };
        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }
        self.patterns.iter().any(|pattern| pattern.matches(&url))
    }
}
