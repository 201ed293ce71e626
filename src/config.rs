use crate::translation::DEFAULT_GOOGLE_TRANSLATE_URL;
use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Google Cloud Translation
    pub google_translate_api_key: String,
    pub google_translate_api_url: String,

    // Storage; None runs on the in-memory store
    pub database_url: Option<String>,

    // HTTP server
    pub port: u16,
    pub public_base_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            google_translate_api_key: std::env::var("GOOGLE_TRANSLATE_API_KEY")
                .context("GOOGLE_TRANSLATE_API_KEY not set")?,
            google_translate_api_url: std::env::var("GOOGLE_TRANSLATE_API_URL")
                .unwrap_or_else(|_| DEFAULT_GOOGLE_TRANSLATE_URL.to_string()),

            database_url: non_empty_var("DATABASE_URL"),

            port: match std::env::var("PORT") {
                Ok(port) => port
                    .parse()
                    .with_context(|| format!("PORT is not a valid port number: {}", port))?,
                Err(_) => 8080,
            },
            public_base_url: non_empty_var("PUBLIC_BASE_URL"),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
