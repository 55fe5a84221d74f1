use serde::Deserialize;
use std::env;

use crate::services::similarity::StopWords;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub mongo_uri: String,
    pub mongo_database: String,
    pub bind_addr: String,
    pub recommendation: RecommendationSettings,
}

/// Tunables of the recommendation engine. Defaults reproduce the production behaviour.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecommendationSettings {
    pub history_limit: usize,
    pub default_count: usize,
    pub max_count: usize,
    pub cold_start_min_difficulty: i32,
    pub cold_start_max_difficulty: i32,
    pub vectorizer_max_features: usize,
    pub vectorizer_min_df: usize,
    pub vectorizer_max_df: f64,
    pub stop_words: StopWords,
    pub text_similarity_enabled: bool,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            history_limit: 50,
            default_count: 5,
            max_count: 50,
            cold_start_min_difficulty: 2,
            cold_start_max_difficulty: 3,
            vectorizer_max_features: 1000,
            vectorizer_min_df: 2,
            vectorizer_max_df: 0.8,
            stop_words: StopWords::Russian,
            text_similarity_enabled: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        // Load environment variables from root .env file (two levels up)
        // Try root .env first, then fallback to local .env
        let skip_root_env = env::var("SKIP_ROOT_ENV").is_ok();
        if skip_root_env {
            dotenvy::dotenv().ok();
        } else if dotenvy::from_path("../../.env").is_err() {
            dotenvy::dotenv().ok();
        }

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            // Override with environment variables (prefix: APP_)
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let mongo_uri = settings
            .get_string("database.mongo_uri")
            .or_else(|_| env::var("MONGO_URI"))
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

        let mongo_database = settings
            .get_string("database.mongo_database")
            .or_else(|_| env::var("MONGO_DATABASE"))
            .unwrap_or_else(|_| "trainingground".to_string());

        let bind_addr = settings
            .get_string("server.bind_addr")
            .or_else(|_| env::var("BIND_ADDR"))
            .unwrap_or_else(|_| "0.0.0.0:8081".to_string());

        let recommendation = match settings.get::<RecommendationSettings>("recommendation") {
            Ok(value) => value,
            Err(config::ConfigError::NotFound(_)) => RecommendationSettings::default(),
            Err(err) => return Err(err),
        };

        if recommendation.cold_start_min_difficulty > recommendation.cold_start_max_difficulty {
            return Err(config::ConfigError::Message(format!(
                "recommendation.cold_start_min_difficulty ({}) exceeds cold_start_max_difficulty ({})",
                recommendation.cold_start_min_difficulty, recommendation.cold_start_max_difficulty
            )));
        }

        Ok(Config {
            mongo_uri,
            mongo_database,
            bind_addr,
            recommendation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_match_engine_constants() {
        let settings = RecommendationSettings::default();
        assert_eq!(settings.history_limit, 50);
        assert_eq!(settings.vectorizer_max_features, 1000);
        assert_eq!(settings.vectorizer_min_df, 2);
        assert!((settings.vectorizer_max_df - 0.8).abs() < f64::EPSILON);
        assert_eq!(settings.stop_words, StopWords::Russian);
    }

    #[test]
    fn partial_settings_fall_back_to_defaults() {
        let settings: RecommendationSettings = config::Config::builder()
            .set_override("history_limit", 20)
            .unwrap()
            .set_override("stop_words", "english")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.history_limit, 20);
        assert_eq!(settings.stop_words, StopWords::English);
        assert_eq!(settings.max_count, 50);
        assert!(settings.text_similarity_enabled);
    }
}
