use std::sync::Arc;

use crate::config::Config;
use crate::stores::{HistoryStore, MongoHistoryStore, MongoTaskStore, TaskStore};
use mongodb::{Client as MongoClient, Database};

pub mod candidate_selector;
pub mod cold_start;
pub mod history_analyzer;
pub mod ranker;
pub mod recommendation_service;
pub mod similarity;

pub use recommendation_service::RecommendationEngine;

pub struct AppState {
    pub config: Config,
    pub mongo: Option<Database>,
    pub engine: RecommendationEngine,
}

impl AppState {
    pub async fn new(config: Config, mongo_client: MongoClient) -> anyhow::Result<Self> {
        let mongo = mongo_client.database(&config.mongo_database);

        tracing::info!("Attempting to ping MongoDB...");

        tokio::time::timeout(
            std::time::Duration::from_secs(5),
            mongo.run_command(mongodb::bson::doc! { "ping": 1 }),
        )
        .await
        .map_err(|_| anyhow::anyhow!("MongoDB ping timeout after 5s"))??;

        tracing::info!("MongoDB connection established successfully");

        let engine = RecommendationEngine::from_settings(
            Arc::new(MongoHistoryStore::new(mongo.clone())),
            Arc::new(MongoTaskStore::new(mongo.clone())),
            config.recommendation.clone(),
        );

        Ok(Self {
            config,
            mongo: Some(mongo),
            engine,
        })
    }

    /// State backed by arbitrary stores, without a database connection.
    pub fn with_stores(
        config: Config,
        history: Arc<dyn HistoryStore>,
        tasks: Arc<dyn TaskStore>,
    ) -> Self {
        let engine =
            RecommendationEngine::from_settings(history, tasks, config.recommendation.clone());
        Self {
            config,
            mongo: None,
            engine,
        }
    }
}
