//! Command-line and environment configuration

use clap::{Args, Parser};
use std::path::PathBuf;

use crate::forest::{ClassWeight, ForestConfig};
use crate::trainer::ModelConfig;

/// Options shared by the dashboard server and the terminal report
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Directory holding the seven input CSV files
    #[arg(long, env = "NEXGEN_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Number of trees in the forest
    #[arg(long, default_value = "300")]
    pub trees: usize,

    /// Maximum tree depth
    #[arg(long, default_value = "10")]
    pub max_depth: usize,

    /// Minimum samples per leaf
    #[arg(long, default_value = "5")]
    pub min_samples_leaf: usize,

    /// Seed for bootstrap sampling and the train/test split
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Share of orders held out for evaluation (0.0 - 1.0)
    #[arg(long, default_value = "0.25")]
    pub test_size: f64,

    /// Weight every order equally instead of balancing the two classes
    #[arg(long)]
    pub unweighted: bool,
}

impl ModelArgs {
    pub fn model_config(&self) -> ModelConfig {
        ModelConfig {
            forest: ForestConfig {
                n_trees: self.trees.max(1),
                max_depth: self.max_depth.max(1),
                min_samples_leaf: self.min_samples_leaf.max(1),
                seed: self.seed,
                class_weight: if self.unweighted {
                    ClassWeight::Uniform
                } else {
                    ClassWeight::Balanced
                },
            },
            test_size: self.test_size.clamp(0.05, 0.95),
            split_seed: self.seed,
        }
    }
}

/// NexGen Logistics predictive dashboard
#[derive(Parser, Debug, Clone)]
#[command(name = "nexgen_logistics")]
#[command(about = "Serve the logistics KPI, delay-risk and sustainability dashboard")]
pub struct DashboardArgs {
    /// Port to listen on
    #[arg(long, env = "NEXGEN_PORT", default_value = "8501")]
    pub port: u16,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    #[command(flatten)]
    pub model: ModelArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_model_defaults() {
        let args = DashboardArgs::parse_from(["nexgen_logistics"]);
        assert_eq!(args.port, 8501);
        let cfg = args.model.model_config();
        assert_eq!(cfg.forest.n_trees, 300);
        assert_eq!(cfg.forest.max_depth, 10);
        assert_eq!(cfg.forest.min_samples_leaf, 5);
        assert_eq!(cfg.forest.class_weight, ClassWeight::Balanced);
        assert_eq!(cfg.test_size, 0.25);
    }

    #[test]
    fn test_overrides() {
        let args = DashboardArgs::parse_from([
            "nexgen_logistics",
            "--port",
            "9000",
            "--trees",
            "50",
            "--unweighted",
            "--test-size",
            "2.0",
        ]);
        assert_eq!(args.port, 9000);
        let cfg = args.model.model_config();
        assert_eq!(cfg.forest.n_trees, 50);
        assert_eq!(cfg.forest.class_weight, ClassWeight::Uniform);
        assert_eq!(cfg.test_size, 0.95);
    }
}
