//! Delay classifier training and evaluation

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::encoding::LabelEncoder;
use crate::forest::{ForestConfig, RandomForest};
use crate::models::OrderRow;

/// Model inputs, in column order
pub const FEATURES: [&str; 6] = [
    "route_distance_km",
    "vehicle_capacity",
    "warehouse_load",
    "delivery_priority",
    "fuel_cost",
    "maintenance_cost",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub forest: ForestConfig,
    pub test_size: f64,
    pub split_seed: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            forest: ForestConfig::default(),
            test_size: 0.25,
            split_seed: 42,
        }
    }
}

/// Raw feature values for one order; `delivery_priority` is still a label here
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureInput {
    pub route_distance_km: f64,
    pub vehicle_capacity: f64,
    pub warehouse_load: f64,
    pub delivery_priority: String,
    pub fuel_cost: f64,
    pub maintenance_cost: f64,
}

impl From<&OrderRow> for FeatureInput {
    fn from(o: &OrderRow) -> Self {
        Self {
            route_distance_km: o.route_distance_km,
            vehicle_capacity: o.vehicle_capacity,
            warehouse_load: o.warehouse_load,
            delivery_priority: o.delivery_priority.clone(),
            fuel_cost: o.fuel_cost,
            maintenance_cost: o.maintenance_cost,
        }
    }
}

impl FeatureInput {
    fn encode(&self, priority: &LabelEncoder) -> Result<Vec<f64>> {
        Ok(vec![
            self.route_distance_km,
            self.vehicle_capacity,
            self.warehouse_load,
            priority.transform(&self.delivery_priority)?,
            self.fuel_cost,
            self.maintenance_cost,
        ])
    }
}

/// `[[tn, fp], [fn, tp]]`, rows are actual, columns predicted
pub type ConfusionMatrix = [[usize; 2]; 2];

#[derive(Debug, Clone, Serialize)]
pub struct ModelMetrics {
    pub accuracy: f64,
    /// `None` when the test split holds a single class
    pub roc_auc: Option<f64>,
    pub confusion_matrix: ConfusionMatrix,
    /// Sorted by importance, descending
    pub feature_importance: Vec<(String, f64)>,
    pub train_size: usize,
    pub test_size: usize,
}

#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub forest: RandomForest,
    pub features: Vec<String>,
    pub priority_encoder: LabelEncoder,
    pub metrics: ModelMetrics,
}

impl TrainedModel {
    /// Delay risk in percent for arbitrary feature values
    pub fn predict_risk(&self, input: &FeatureInput) -> Result<f64> {
        let row = input.encode(&self.priority_encoder)?;
        Ok(self.forest.predict_proba(&row) * 100.0)
    }

    pub fn predict_order(&self, order: &OrderRow) -> Result<f64> {
        self.predict_risk(&FeatureInput::from(order))
    }
}

/// Per-class shuffled split; each class contributes `round(n_c * test_size)` test rows.
pub fn stratified_split(labels: &[bool], test_size: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();
    for class in [false, true] {
        let mut idx: Vec<usize> = (0..labels.len()).filter(|&i| labels[i] == class).collect();
        idx.shuffle(&mut rng);
        let n_test = (((idx.len() as f64) * test_size).round() as usize).min(idx.len());
        test.extend_from_slice(&idx[..n_test]);
        train.extend_from_slice(&idx[n_test..]);
    }
    train.sort_unstable();
    test.sort_unstable();
    (train, test)
}

pub fn accuracy(actual: &[bool], predicted: &[bool]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let hits = actual.iter().zip(predicted).filter(|(a, p)| a == p).count();
    hits as f64 / actual.len() as f64
}

pub fn confusion_matrix(actual: &[bool], predicted: &[bool]) -> ConfusionMatrix {
    let mut m = [[0usize; 2]; 2];
    for (&a, &p) in actual.iter().zip(predicted) {
        m[a as usize][p as usize] += 1;
    }
    m
}

/// Mann-Whitney formulation with average ranks for ties.
pub fn roc_auc(actual: &[bool], scores: &[f64]) -> Option<f64> {
    let n_pos = actual.iter().filter(|&&a| a).count();
    let n_neg = actual.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return None;
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let mut ranks = vec![0.0; scores.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && scores[order[j + 1]] == scores[order[i]] {
            j += 1;
        }
        // ranks are 1-based
        let avg = (i + j) as f64 / 2.0 + 1.0;
        for k in i..=j {
            ranks[order[k]] = avg;
        }
        i = j + 1;
    }

    let pos_rank_sum: f64 = actual
        .iter()
        .zip(&ranks)
        .filter(|(a, _)| **a)
        .map(|(_, r)| r)
        .sum();
    let u = pos_rank_sum - (n_pos * (n_pos + 1)) as f64 / 2.0;
    Some(u / (n_pos * n_neg) as f64)
}

/// Fit the delay classifier on the joined order table and score it on a held-out split.
pub fn train_delay_model(orders: &[OrderRow], config: &ModelConfig) -> Result<TrainedModel> {
    if !(config.test_size > 0.0 && config.test_size < 1.0) {
        bail!("test_size must lie strictly between 0 and 1, got {}", config.test_size);
    }
    let usable: Vec<&OrderRow> = orders
        .iter()
        .filter(|o| {
            [
                o.route_distance_km,
                o.vehicle_capacity,
                o.warehouse_load,
                o.fuel_cost,
                o.maintenance_cost,
                o.actual_delivery_days,
                o.expected_delivery_days,
            ]
            .iter()
            .all(|v| v.is_finite())
        })
        .collect();
    if usable.is_empty() {
        bail!("no usable orders to train on");
    }

    let priority_encoder = LabelEncoder::fit(usable.iter().map(|o| o.delivery_priority.as_str()));
    let rows: Vec<Vec<f64>> = usable
        .iter()
        .map(|o| FeatureInput::from(*o).encode(&priority_encoder))
        .collect::<Result<_>>()?;
    let labels: Vec<bool> = usable.iter().map(|o| o.is_delayed()).collect();

    let (train_idx, test_idx) = stratified_split(&labels, config.test_size, config.split_seed);
    if test_idx.is_empty() {
        bail!("test split is empty ({} usable orders)", usable.len());
    }

    let x_train: Vec<Vec<f64>> = train_idx.iter().map(|&i| rows[i].clone()).collect();
    let y_train: Vec<bool> = train_idx.iter().map(|&i| labels[i]).collect();
    let forest = RandomForest::fit(&x_train, &y_train, &config.forest)
        .context("fitting delay classifier")?;

    let y_test: Vec<bool> = test_idx.iter().map(|&i| labels[i]).collect();
    let proba: Vec<f64> = test_idx.iter().map(|&i| forest.predict_proba(&rows[i])).collect();
    let predicted: Vec<bool> = proba.iter().map(|&p| p >= 0.5).collect();

    let mut feature_importance: Vec<(String, f64)> = FEATURES
        .iter()
        .map(|f| f.to_string())
        .zip(forest.feature_importances())
        .collect();
    feature_importance.sort_by(|a, b| b.1.total_cmp(&a.1));

    let metrics = ModelMetrics {
        accuracy: accuracy(&y_test, &predicted),
        roc_auc: roc_auc(&y_test, &proba),
        confusion_matrix: confusion_matrix(&y_test, &predicted),
        feature_importance,
        train_size: train_idx.len(),
        test_size: test_idx.len(),
    };

    info!(
        accuracy = metrics.accuracy,
        roc_auc = ?metrics.roc_auc,
        train = metrics.train_size,
        test = metrics.test_size,
        "delay model trained"
    );

    Ok(TrainedModel {
        forest,
        features: FEATURES.iter().map(|f| f.to_string()).collect(),
        priority_encoder,
        metrics,
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::OrderRow;

    /// Orders whose delay depends mostly on distance and priority
    pub fn synthetic_orders(n: usize) -> Vec<OrderRow> {
        let priorities = ["Express", "Standard", "Economy"];
        (0..n)
            .map(|i| {
                let distance = 50.0 + ((i * 97) % 2000) as f64;
                let priority = priorities[i % 3];
                let expected = 3.0;
                let late = distance > 1000.0 || (priority == "Economy" && i % 2 == 0);
                let actual = if late { expected + 2.0 } else { expected };
                OrderRow {
                    order_id: format!("ORD{:06}", i + 1),
                    customer_id: format!("SMB_{:04}", i % 40),
                    customer_segment: Some("SMB".into()),
                    product_category: Some("Books".into()),
                    origin: Some(["Mumbai", "Delhi", "Pune"][i % 3].into()),
                    destination: Some(["Delhi", "Chennai"][i % 2].into()),
                    route: Some(format!("R{}", i % 4)),
                    carrier: Some(["QuickShip", "GlobalTransit"][i % 2].into()),
                    vehicle_id: Some(format!("VEH{:03}", i % 6)),
                    route_distance_km: distance,
                    vehicle_capacity: [800.0, 2500.0, 5000.0][i % 3],
                    warehouse_load: ((i * 31) % 100) as f64,
                    delivery_priority: priority.into(),
                    fuel_cost: distance * 0.4,
                    maintenance_cost: 100.0 + (i % 9) as f64 * 20.0,
                    actual_delivery_days: actual,
                    expected_delivery_days: expected,
                    total_cost: 500.0 + distance * 0.6,
                    cost_variance: 0.0,
                    feedback_score: if i % 5 == 0 { None } else { Some(((i % 5) + 1) as f64) },
                    fuel_consumption_rate: 8.0,
                    estimated_co2: distance * 8.0,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::synthetic_orders;
    use super::*;

    fn quick_config() -> ModelConfig {
        ModelConfig {
            forest: ForestConfig {
                n_trees: 40,
                ..ForestConfig::default()
            },
            ..ModelConfig::default()
        }
    }

    #[test]
    fn test_stratified_split_keeps_class_ratio() {
        let labels: Vec<bool> = (0..100).map(|i| i < 20).collect();
        let (train, test) = stratified_split(&labels, 0.25, 42);
        assert_eq!(train.len() + test.len(), 100);
        assert_eq!(test.len(), 25);
        assert_eq!(test.iter().filter(|&&i| labels[i]).count(), 5);
        assert!(train.iter().all(|i| !test.contains(i)));
    }

    #[test]
    fn test_roc_auc() {
        let actual = [false, false, true, true];
        assert_eq!(roc_auc(&actual, &[0.1, 0.4, 0.35, 0.8]), Some(0.75));
        assert_eq!(roc_auc(&actual, &[0.1, 0.2, 0.8, 0.9]), Some(1.0));
        assert_eq!(roc_auc(&actual, &[0.5, 0.5, 0.5, 0.5]), Some(0.5));
        assert_eq!(roc_auc(&[true, true], &[0.1, 0.2]), None);
    }

    #[test]
    fn test_confusion_and_accuracy() {
        let actual = [false, false, true, true, true];
        let predicted = [false, true, true, false, true];
        assert_eq!(confusion_matrix(&actual, &predicted), [[1, 1], [1, 2]]);
        assert!((accuracy(&actual, &predicted) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_train_delay_model() {
        let orders = synthetic_orders(200);
        let model = train_delay_model(&orders, &quick_config()).unwrap();

        let m = &model.metrics;
        assert_eq!(m.train_size + m.test_size, 200);
        let cm_total: usize = m.confusion_matrix.iter().flatten().sum();
        assert_eq!(cm_total, m.test_size);
        assert!(m.accuracy > 0.7);
        assert!(m.roc_auc.unwrap() > 0.7);

        let imp_sum: f64 = m.feature_importance.iter().map(|(_, v)| v).sum();
        assert!((imp_sum - 1.0).abs() < 1e-9);
        assert!(m.feature_importance.windows(2).all(|w| w[0].1 >= w[1].1));
        assert_eq!(model.features, FEATURES.to_vec());
    }

    #[test]
    fn test_predict_order_is_percent() {
        let orders = synthetic_orders(120);
        let model = train_delay_model(&orders, &quick_config()).unwrap();
        for o in orders.iter().take(10) {
            let risk = model.predict_order(o).unwrap();
            assert!((0.0..=100.0).contains(&risk));
        }

        let mut unseen = FeatureInput::from(&orders[0]);
        unseen.delivery_priority = "Overnight".into();
        assert!(model.predict_risk(&unseen).is_err());
    }

    #[test]
    fn test_split_tolerates_out_of_range_test_size() {
        let labels: Vec<bool> = (0..10).map(|i| i % 2 == 0).collect();
        let (train, test) = stratified_split(&labels, 1.5, 42);
        assert!(train.is_empty());
        assert_eq!(test.len(), 10);
        let (train, test) = stratified_split(&labels, -0.5, 42);
        assert_eq!(train.len(), 10);
        assert!(test.is_empty());
    }

    #[test]
    fn test_rejects_test_size_outside_unit_interval() {
        let orders = synthetic_orders(40);
        for test_size in [0.0, 1.0, 1.5, f64::NAN] {
            let config = ModelConfig {
                test_size,
                ..quick_config()
            };
            assert!(train_delay_model(&orders, &config).is_err(), "test_size {}", test_size);
        }
    }

    #[test]
    fn test_single_class_fails() {
        let mut orders = synthetic_orders(40);
        for o in &mut orders {
            o.actual_delivery_days = o.expected_delivery_days;
        }
        assert!(train_delay_model(&orders, &quick_config()).is_err());
    }
}
