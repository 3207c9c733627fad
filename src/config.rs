use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for the itinerary planner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub travel_api: TravelApiConfig,
    pub retry: RetryConfig,
    pub planner: PlannerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
}

/// OpenAI-compatible chat completions endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: i32,
    /// Upper bound for one completion call, retries included
    pub timeout_seconds: u64,
}

/// RapidAPI travel provider (flights, hotels, hotel details)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelApiConfig {
    pub api_key: String,
    pub host: String,
    pub base_url: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_base: f64,
    pub jitter_factor: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Offers per category shown to the model
    pub max_offers_in_prompt: usize,
    pub suggestion_count: usize,
}

impl Config {
    /// Load configuration from file with environment variable overrides
    /// ALWAYS returns a valid config - never fails
    pub fn load() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => tracing::info!("Loaded .env from: {}", path.display()),
            Err(_) => tracing::warn!("No .env file found - continuing with env vars only"),
        }

        let config_path =
            env::var("PLANNER_CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            match fs::read_to_string(&config_path) {
                Ok(contents) => match Self::from_yaml(&contents) {
                    Ok(config) => {
                        tracing::info!("Loaded configuration from {}", config_path);
                        config
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to parse config file {}: {} - using defaults",
                            config_path,
                            e
                        );
                        Self::default()
                    }
                },
                Err(e) => {
                    tracing::error!(
                        "Failed to read config file {}: {} - using defaults",
                        config_path,
                        e
                    );
                    Self::default()
                }
            }
        } else {
            tracing::warn!("Config file not found at {} - using defaults", config_path);
            Self::default()
        };

        config.apply_env_overrides();

        // Validate configuration - log warnings but don't fail
        if let Err(e) = config.validate() {
            tracing::warn!("Config validation warnings: {} - continuing anyway", e);
        }

        config
    }

    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(contents)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(bind) = env::var("PLANNER_BIND") {
            self.server.bind = bind;
        }

        // LLM overrides
        if let Ok(api_key) = env::var("LLM_API_KEY").or_else(|_| env::var("OPENAI_API_KEY")) {
            self.llm.api_key = api_key;
        }
        if let Ok(base_url) = env::var("LLM_BASE_URL") {
            self.llm.base_url = base_url;
        }
        if let Ok(model) = env::var("LLM_MODEL") {
            self.llm.model = model;
        }
        if let Ok(timeout) = env::var("LLM_TIMEOUT_SECONDS") {
            if let Ok(secs) = timeout.parse() {
                self.llm.timeout_seconds = secs;
            }
        }

        // Travel API overrides
        if let Ok(api_key) = env::var("RAPIDAPI_KEY") {
            self.travel_api.api_key = api_key;
        }
        if let Ok(host) = env::var("RAPIDAPI_HOST") {
            self.travel_api.host = host;
        }
        if let Ok(base_url) = env::var("TRAVEL_API_BASE_URL") {
            self.travel_api.base_url = base_url;
        }

        // Retry overrides
        if let Ok(attempts) = env::var("PLANNER_RETRY_MAX_ATTEMPTS") {
            if let Ok(n) = attempts.parse() {
                self.retry.max_attempts = n;
            }
        }
        if let Ok(jitter) = env::var("PLANNER_RETRY_JITTER_FACTOR") {
            if let Ok(jitter_val) = jitter.parse() {
                self.retry.jitter_factor = jitter_val;
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.llm.api_key == "PLACEHOLDER_LLM_API_KEY" || self.llm.api_key.is_empty() {
            return Err("LLM_API_KEY environment variable must be set".into());
        }
        if self.travel_api.api_key.is_empty() {
            return Err("RAPIDAPI_KEY environment variable must be set".into());
        }
        if self.llm.timeout_seconds == 0 {
            return Err("llm.timeout_seconds cannot be 0".into());
        }
        if self.retry.max_attempts == 0 {
            return Err("retry.max_attempts cannot be 0".into());
        }
        if self.retry.jitter_factor < 0.0 || self.retry.jitter_factor > 1.0 {
            return Err("Retry jitter factor must be between 0.0 and 1.0".into());
        }
        if self.planner.max_offers_in_prompt == 0 {
            return Err("planner.max_offers_in_prompt cannot be 0".into());
        }

        Ok(())
    }

    pub fn travel_api_timeout(&self) -> Duration {
        Duration::from_secs(self.travel_api.timeout_seconds)
    }
}

impl LlmConfig {
    /// Upper bound on one completion call, retries included.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind: "127.0.0.1:8080".to_string(),
            },
            llm: LlmConfig {
                api_key: "PLACEHOLDER_LLM_API_KEY".to_string(),
                base_url: "https://api.openai.com/v1".to_string(),
                model: "gpt-4o-mini".to_string(),
                temperature: 0.7,
                max_tokens: 3000,
                timeout_seconds: 60,
            },
            travel_api: TravelApiConfig {
                api_key: String::new(),
                host: "booking-com15.p.rapidapi.com".to_string(),
                base_url: "https://booking-com15.p.rapidapi.com".to_string(),
                timeout_seconds: 20,
            },
            retry: RetryConfig {
                max_attempts: 3,
                initial_delay_ms: 200,
                max_delay_ms: 5000,
                backoff_base: 2.0,
                jitter_factor: 0.2,
            },
            planner: PlannerConfig {
                max_offers_in_prompt: 3,
                suggestion_count: 5,
            },
        }
    }
}
