use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_parse<T: std::str::FromStr>(profile: &str, key: &str, default: T) -> T {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `PDFCHAT_PROFILE`. When set (e.g. `PROD`), every
    /// key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("PDFCHAT_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            server: ServerConfig::from_env_profiled(p),
            storage: StorageConfig::from_env_profiled(p),
            llm: LlmConfig::from_env_profiled(p),
            embedding: EmbeddingConfig::from_env_profiled(p),
            retrieval: RetrievalConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  server:      {}:{}", self.server.host, self.server.port);
        tracing::info!("  storage:     index={}", self.storage.index_path.display());
        tracing::info!(
            "  llm:         provider={}, model={}, configured={}",
            self.llm.provider,
            self.llm.model(),
            self.llm.is_configured()
        );
        tracing::info!(
            "  embedding:   provider={}, model={}, dimensions={}",
            self.embedding.provider,
            self.embedding.model,
            self.embedding.dimensions
        );
        tracing::info!(
            "  retrieval:   top_k={}, chunk_size={}, overlap={}",
            self.retrieval.top_k,
            self.retrieval.chunk_size,
            self.retrieval.chunk_overlap
        );
    }

    /// Return a redacted view safe for API responses (no secrets).
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "server": { "host": self.server.host, "port": self.server.port },
            "storage": { "index_path": self.storage.index_path },
            "llm": {
                "provider": self.llm.provider,
                "model": self.llm.model(),
                "configured": self.llm.is_configured(),
            },
            "embedding": {
                "provider": self.embedding.provider,
                "model": self.embedding.model,
                "dimensions": self.embedding.dimensions,
            },
            "retrieval": { "top_k": self.retrieval.top_k },
        })
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
    /// Maximum accepted request body, in megabytes.
    pub max_upload_mb: usize,
}

impl ServerConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            host: profiled_env_or(p, "HOST", "0.0.0.0"),
            port: profiled_env_parse(p, "PORT", 8000),
            cors_origin: profiled_env_or(p, "CORS_ORIGIN", "*"),
            max_upload_mb: profiled_env_parse(p, "MAX_UPLOAD_MB", 64),
        }
    }
}

// ── Storage ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    /// The single, well-known location of the persisted vector index.
    pub index_path: PathBuf,
}

impl StorageConfig {
    fn from_env_profiled(p: &str) -> Self {
        let data_dir = PathBuf::from(profiled_env_or(p, "DATA_DIR", "data"));
        let index_path = profiled_env_opt(p, "INDEX_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("faiss_index").join("index.msgpack"));
        Self { data_dir, index_path }
    }
}

// ── LLM (Gemini / OpenAI) ─────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "gemini", "openai"
    pub provider: String,
    pub google_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    pub max_tokens: u32,
}

impl LlmConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            provider: profiled_env_or(p, "LLM_PROVIDER", "gemini"),
            google_api_key: profiled_env_opt(p, "GOOGLE_API_KEY"),
            gemini_model: profiled_env_or(p, "GEMINI_MODEL", "gemini-1.5-flash"),
            gemini_base_url: profiled_env_or(
                p,
                "GEMINI_BASE_URL",
                "https://generativelanguage.googleapis.com",
            ),
            openai_api_key: profiled_env_opt(p, "OPENAI_API_KEY"),
            openai_model: profiled_env_or(p, "OPENAI_MODEL", "gpt-4o-mini"),
            openai_base_url: profiled_env_opt(p, "OPENAI_BASE_URL"),
            max_tokens: profiled_env_parse(p, "LLM_MAX_TOKENS", 2048),
        }
    }

    /// Model name of the active provider.
    pub fn model(&self) -> &str {
        match self.provider.as_str() {
            "openai" => &self.openai_model,
            _ => &self.gemini_model,
        }
    }

    pub fn is_configured(&self) -> bool {
        match self.provider.as_str() {
            "gemini" | "google" => self.google_api_key.is_some(),
            "openai" => self.openai_api_key.is_some(),
            _ => false,
        }
    }
}

// ── Embedding ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// "gemini", "openai"
    pub provider: String,
    pub model: String,
    pub dimensions: usize,
    pub batch_size: usize,
}

impl EmbeddingConfig {
    fn from_env_profiled(p: &str) -> Self {
        let provider = profiled_env_or(p, "EMBEDDING_PROVIDER", "gemini");
        let default_model = match provider.as_str() {
            "openai" => "text-embedding-3-small",
            _ => "models/embedding-001",
        };
        let default_dimensions = match provider.as_str() {
            "openai" => 1536,
            _ => 768,
        };
        Self {
            model: profiled_env_or(p, "EMBEDDING_MODEL", default_model),
            dimensions: profiled_env_parse(p, "EMBEDDING_DIMENSIONS", default_dimensions),
            batch_size: profiled_env_parse(p, "EMBEDDING_BATCH_SIZE", 64),
            provider,
        }
    }
}

// ── Retrieval ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks handed to the model per question.
    pub top_k: usize,
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Maximum characters shared between neighbouring chunks.
    pub chunk_overlap: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 4,
            chunk_size: 1000,
            chunk_overlap: 100,
        }
    }
}

impl RetrievalConfig {
    fn from_env_profiled(p: &str) -> Self {
        let defaults = Self::default();
        Self {
            top_k: profiled_env_parse(p, "RETRIEVAL_TOP_K", defaults.top_k),
            chunk_size: profiled_env_parse(p, "CHUNK_SIZE", defaults.chunk_size),
            chunk_overlap: profiled_env_parse(p, "CHUNK_OVERLAP", defaults.chunk_overlap),
        }
    }
}
