// src/config.rs

use std::env;
use anyhow::{Context, Result};
use url::Url;

// A struct to hold all configuration, loaded once at startup from the .env file.
#[derive(Clone, Debug)]
pub struct Config {
    // Server settings
    pub port: u16,

    /// Gaia chat-completion endpoint settings.
    /// The endpoint is the base URL of an OpenAI-compatible API,
    /// e.g. `https://llama70b.gaia.domains/v1`.
    pub gaia_api_key: String,
    pub gaia_api_endpoint: String,
    pub gaia_model_name: String,

    // Ankr Advanced API settings
    pub ankr_api_key: String,

    // Agent settings
    pub temperature: Option<f32>,
    pub max_tool_rounds: u32,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load variables from the .env file into the environment
        dotenvy::dotenv().ok();

        let gaia_api_key =
            env::var("GAIA_API_KEY").context("GAIA_API_KEY must be set in the environment")?;
        let gaia_api_endpoint = env::var("GAIA_API_ENDPOINT")
            .context("GAIA_API_ENDPOINT must be set to the base URL of an OpenAI-compatible API")?;
        Url::parse(&gaia_api_endpoint).context("GAIA_API_ENDPOINT is not a valid URL")?;

        let ankr_api_key =
            env::var("ANKR_API_KEY").context("ANKR_API_KEY must be set in the environment")?;

        let temperature = match env::var("TEMPERATURE") {
            Ok(raw) => Some(
                raw.parse::<f32>()
                    .context("TEMPERATURE must be a valid number")?,
            ),
            Err(_) => None,
        };

        Ok(Config {
            // Server settings
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,

            // Gaia settings
            gaia_api_key,
            gaia_api_endpoint,
            gaia_model_name: env::var("GAIA_MODEL_NAME").unwrap_or_else(|_| "llama70b".to_string()),

            // Ankr settings
            ankr_api_key,

            // Agent settings
            temperature,
            max_tool_rounds: env::var("MAX_TOOL_ROUNDS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("MAX_TOOL_ROUNDS must be a valid number")?,
        })
    }
}
