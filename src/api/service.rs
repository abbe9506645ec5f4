//! Shared state behind every page and endpoint
//!
//! The joined dataset is loaded once at startup. The delay model is trained on
//! first use and cached, so only the first risk or performance request pays for
//! training.

use anyhow::{anyhow, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::loader;
use crate::models::Dataset;
use crate::trainer::{train_delay_model, ModelConfig, TrainedModel};

pub struct DashboardService {
    data: Arc<Dataset>,
    model_config: ModelConfig,
    cached_model: Arc<RwLock<Option<Arc<TrainedModel>>>>,
}

impl DashboardService {
    pub fn new(data: Dataset, model_config: ModelConfig) -> Self {
        Self {
            data: Arc::new(data),
            model_config,
            cached_model: Arc::new(RwLock::new(None)),
        }
    }

    pub fn load(data_dir: &Path, model_config: ModelConfig) -> Result<Self> {
        let data = loader::load_all_data(data_dir)?;
        Ok(Self::new(data, model_config))
    }

    pub fn data(&self) -> &Dataset {
        &self.data
    }

    pub async fn model(&self) -> Result<Arc<TrainedModel>> {
        // Check cache first
        {
            let cache = self.cached_model.read().await;
            if let Some(model) = cache.as_ref() {
                return Ok(model.clone());
            }
        }

        let mut cache = self.cached_model.write().await;
        if let Some(model) = cache.as_ref() {
            return Ok(model.clone());
        }

        info!("Training delay model on {} orders", self.data.orders.len());
        let data = self.data.clone();
        let config = self.model_config.clone();
        let model = tokio::task::spawn_blocking(move || train_delay_model(&data.orders, &config))
            .await
            .map_err(|e| anyhow!("training task failed: {}", e))??;

        let model = Arc::new(model);
        *cache = Some(model.clone());
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::ForestConfig;
    use crate::trainer::fixtures::synthetic_orders;

    #[tokio::test]
    async fn test_model_is_trained_once() {
        let data = Dataset {
            orders: synthetic_orders(80),
            vehicles: Vec::new(),
        };
        let config = ModelConfig {
            forest: ForestConfig {
                n_trees: 10,
                ..ForestConfig::default()
            },
            ..ModelConfig::default()
        };
        let service = DashboardService::new(data, config);
        let a = service.model().await.unwrap();
        let b = service.model().await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn test_empty_dataset_cannot_train() {
        let service = DashboardService::new(Dataset::default(), ModelConfig::default());
        assert!(service.model().await.is_err());
    }
}
