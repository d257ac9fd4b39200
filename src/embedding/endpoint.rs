//! Embedding endpoint resolution.
//!
//! Precedence is fixed: an explicitly configured URL, then the container
//! gateway when running inside Docker, then localhost. The process
//! environment is read once by [`EndpointSources::detect`] at startup;
//! resolution itself is a pure function of the collected sources.

/// Environment variable carrying an explicit base URL.
pub const OLLAMA_URL_ENV: &str = "OLLAMA_URL";

/// Presence-only marker set in container images.
pub const CONTAINER_MARKER_ENV: &str = "DOCKER_CONTAINER";

/// Host gateway address reachable from inside a container.
pub const CONTAINER_GATEWAY_URL: &str = "http://host.docker.internal:11434";

/// Default for a provider running on the same host.
pub const LOCAL_DEFAULT_URL: &str = "http://localhost:11434";

/// Path of the embeddings API relative to the base URL.
pub const EMBEDDINGS_PATH: &str = "/api/embeddings";

/// Inputs to endpoint resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointSources {
    /// Explicit base URL from configuration; empty strings count as unset
    pub explicit: Option<String>,

    /// Whether the container marker is present
    pub containerized: bool,
}

impl EndpointSources {
    /// Combines an explicit URL with the container marker from the
    /// process environment.
    pub fn detect(explicit: Option<String>) -> Self {
        Self {
            explicit,
            containerized: std::env::var_os(CONTAINER_MARKER_ENV).is_some(),
        }
    }

    /// Resolves the base URL of the embedding service.
    #[must_use]
    pub fn resolve(&self) -> String {
        match self.explicit.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ if self.containerized => CONTAINER_GATEWAY_URL.to_string(),
            _ => LOCAL_DEFAULT_URL.to_string(),
        }
    }
}

/// Joins a base URL and the embeddings path.
#[must_use]
pub fn embeddings_url(base_url: &str) -> String {
    format!("{}{EMBEDDINGS_PATH}", base_url.trim_end_matches('/'))
}
