use anyhow::Result;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_AI_URL: &str = "http://localhost:8000";

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the auth/roadmap backend.
    pub api_url: String,
    /// Base URL of the roadmap-generation service.
    pub ai_url: String,
    /// When set, a failed login still opens a local, token-less session.
    pub demo_mode: bool,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Ok(Self::from_lookup(|key| std::env::var(key).ok()))
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        ClientConfig {
            api_url: trim_url(lookup("ROADMAP_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into())),
            ai_url: trim_url(lookup("ROADMAP_AI_URL").unwrap_or_else(|| DEFAULT_AI_URL.into())),
            demo_mode: lookup("ROADMAP_DEMO_MODE")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        }
    }
}

fn trim_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
