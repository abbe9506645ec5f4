//! The seven dashboard views
//!
//! Every view is a pure function of the joined order table (and, where it needs
//! one, the trained delay model). The structs are serialized as-is for the JSON
//! API and handed to [`crate::render`] for the HTML pages.

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::models::{ChurnRisk, Dataset, OrderRow};
use crate::trainer::{FeatureInput, TrainedModel};

pub const HISTOGRAM_BINS: usize = 20;
pub const CHURN_TABLE_ROWS: usize = 20;

/// Navigation entries, in sidebar order: (slug, title)
pub const VIEWS: [(&str, &str); 7] = [
    ("overview", "Executive Overview"),
    ("risk", "Delivery Risk Predictor"),
    ("performance", "Model Performance"),
    ("fleet", "Fleet Optimization"),
    ("cost", "Cost Intelligence"),
    ("customer", "Customer Experience"),
    ("sustainability", "Sustainability Tracker"),
];

fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// Mean of `value` per key, sorted by key
fn mean_by<K, V>(orders: &[OrderRow], key: K, value: V) -> Vec<(String, f64)>
where
    K: Fn(&OrderRow) -> Option<String>,
    V: Fn(&OrderRow) -> f64,
{
    let mut groups: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for o in orders {
        if let Some(k) = key(o) {
            let g = groups.entry(k).or_insert((0.0, 0));
            g.0 += value(o);
            g.1 += 1;
        }
    }
    groups
        .into_iter()
        .map(|(k, (sum, n))| (k, sum / n as f64))
        .collect()
}

// ============================================================================
// 1. Executive overview
// ============================================================================

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Equal-width bins over `[min, max]`; the last bin is closed on the right.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (lo, hi) = if max > min { (min, max) } else { (min - 0.5, max + 0.5) };
    let width = (hi - lo) / bins as f64;

    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|b| HistogramBin {
            start: lo + width * b as f64,
            end: lo + width * (b + 1) as f64,
            count: 0,
        })
        .collect();
    for &v in values {
        let b = (((v - lo) / width) as usize).min(bins - 1);
        out[b].count += 1;
    }
    out
}

#[derive(Debug, Clone, Serialize)]
pub struct OverviewView {
    pub total_orders: usize,
    pub delayed_orders: usize,
    pub delay_rate_pct: f64,
    pub avg_cost: f64,
    pub delay_histogram: Vec<HistogramBin>,
}

pub fn executive_overview(data: &Dataset) -> OverviewView {
    let total_orders = data.orders.len();
    let delayed_orders = data.orders.iter().filter(|o| o.is_delayed()).count();
    let delay_rate_pct = if total_orders == 0 {
        0.0
    } else {
        delayed_orders as f64 / total_orders as f64 * 100.0
    };
    let delays: Vec<f64> = data.orders.iter().map(OrderRow::delay_days).collect();

    OverviewView {
        total_orders,
        delayed_orders,
        delay_rate_pct,
        avg_cost: mean(data.orders.iter().map(|o| o.total_cost)),
        delay_histogram: histogram(&delays, HISTOGRAM_BINS),
    }
}

// ============================================================================
// 2. Delivery risk predictor
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    pub fn from_percent(risk: f64) -> Self {
        if risk > 70.0 {
            RiskBand::High
        } else if risk > 40.0 {
            RiskBand::Medium
        } else {
            RiskBand::Low
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            RiskBand::High => "High Risk - Immediate Action Required",
            RiskBand::Medium => "Medium Risk - Monitor Closely",
            RiskBand::Low => "Low Risk - On Track",
        }
    }

    pub fn actions(&self) -> &'static [&'static str] {
        match self {
            RiskBand::High => &[
                "Switch to faster route or priority lane",
                "Assign higher-capacity or low-maintenance vehicle",
                "Upgrade delivery priority",
                "Proactively notify customer",
            ],
            RiskBand::Medium => &[
                "Monitor route congestion",
                "Keep backup vehicle ready",
            ],
            RiskBand::Low => &[],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskView {
    pub order_id: Option<String>,
    pub risk_pct: f64,
    pub band: RiskBand,
    pub headline: &'static str,
    pub actions: Vec<&'static str>,
    pub inputs: FeatureInput,
}

impl RiskView {
    pub fn new(order_id: Option<String>, risk_pct: f64, inputs: FeatureInput) -> Self {
        let band = RiskBand::from_percent(risk_pct);
        Self {
            order_id,
            risk_pct,
            band,
            headline: band.headline(),
            actions: band.actions().to_vec(),
            inputs,
        }
    }
}

/// Risk for `order_id`, or for the first order when none is given.
/// `Ok(None)` when the order does not exist or the table is empty.
pub fn delivery_risk(
    data: &Dataset,
    model: &TrainedModel,
    order_id: Option<&str>,
) -> anyhow::Result<Option<RiskView>> {
    let order = match order_id {
        Some(id) => data.find_order(id),
        None => data.orders.first(),
    };
    let Some(order) = order else {
        return Ok(None);
    };
    let risk = model.predict_order(order)?;
    Ok(Some(RiskView::new(
        Some(order.order_id.clone()),
        risk,
        FeatureInput::from(order),
    )))
}

// ============================================================================
// 3. Model performance
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct LabelledMatrix {
    pub row_labels: [&'static str; 2],
    pub col_labels: [&'static str; 2],
    pub values: [[usize; 2]; 2],
}

#[derive(Debug, Clone, Serialize)]
pub struct PerformanceView {
    pub accuracy_pct: f64,
    pub roc_auc: Option<f64>,
    pub feature_importance: Vec<(String, f64)>,
    pub confusion: LabelledMatrix,
    pub train_size: usize,
    pub test_size: usize,
}

pub fn model_performance(model: &TrainedModel) -> PerformanceView {
    let m = &model.metrics;
    PerformanceView {
        accuracy_pct: m.accuracy * 100.0,
        roc_auc: m.roc_auc,
        feature_importance: m.feature_importance.clone(),
        confusion: LabelledMatrix {
            row_labels: ["Actual On-Time", "Actual Delayed"],
            col_labels: ["Predicted On-Time", "Predicted Delayed"],
            values: m.confusion_matrix,
        },
        train_size: m.train_size,
        test_size: m.test_size,
    }
}

// ============================================================================
// 4. Fleet optimization
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum FleetGrouping {
    Vehicle,
    Carrier,
    /// Neither vehicles nor carriers joined; a sample of order ids is listed
    Order,
}

#[derive(Debug, Clone, Serialize)]
pub struct FleetRow {
    pub key: String,
    pub assigned_orders: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FleetView {
    pub grouping: FleetGrouping,
    pub rows: Vec<FleetRow>,
    /// Fleet vehicles that received no orders
    pub idle_vehicles: Vec<String>,
    pub recommendation: &'static str,
}

fn count_by<K: Fn(&OrderRow) -> Option<&str>>(orders: &[OrderRow], key: K) -> Vec<FleetRow> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for o in orders {
        if let Some(k) = key(o) {
            *counts.entry(k).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .map(|(k, n)| FleetRow {
            key: k.to_string(),
            assigned_orders: n,
        })
        .collect()
}

pub fn fleet_optimization(data: &Dataset) -> FleetView {
    let (grouping, rows) = if data.orders.iter().any(|o| o.vehicle_id.is_some()) {
        (FleetGrouping::Vehicle, count_by(&data.orders, |o| o.vehicle_id.as_deref()))
    } else if data.orders.iter().any(|o| o.carrier.is_some()) {
        (FleetGrouping::Carrier, count_by(&data.orders, |o| o.carrier.as_deref()))
    } else {
        let rows = data
            .orders
            .iter()
            .take(10)
            .map(|o| FleetRow {
                key: o.order_id.clone(),
                assigned_orders: 1,
            })
            .collect();
        (FleetGrouping::Order, rows)
    };

    let used: HashSet<&str> = data
        .orders
        .iter()
        .filter_map(|o| o.vehicle_id.as_deref())
        .collect();
    let mut idle_vehicles: Vec<String> = data
        .vehicles
        .iter()
        .filter(|v| !used.contains(v.vehicle_id.as_str()))
        .map(|v| v.vehicle_id.clone())
        .collect();
    idle_vehicles.sort();

    FleetView {
        grouping,
        rows,
        idle_vehicles,
        recommendation: "Reassign under-utilized vehicles to high-risk routes.",
    }
}

// ============================================================================
// 5. Cost intelligence
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Heatmap {
    pub rows: Vec<String>,
    pub cols: Vec<String>,
    /// `cells[r][c]` is the mean cost for origin `rows[r]` to destination `cols[c]`
    pub cells: Vec<Vec<Option<f64>>>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum CostGrouping {
    Route,
    Carrier,
}

#[derive(Debug, Clone, Serialize)]
pub struct CostSpread {
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CostView {
    pub heatmap: Option<Heatmap>,
    pub grouping: Option<CostGrouping>,
    pub breakdown: Vec<(String, f64)>,
    pub variance: CostSpread,
    pub warning: &'static str,
}

pub fn cost_heatmap(orders: &[OrderRow]) -> Option<Heatmap> {
    let mut cells: BTreeMap<(&str, &str), (f64, usize)> = BTreeMap::new();
    for o in orders {
        if let (Some(from), Some(to)) = (o.origin.as_deref(), o.destination.as_deref()) {
            let c = cells.entry((from, to)).or_insert((0.0, 0));
            c.0 += o.total_cost;
            c.1 += 1;
        }
    }
    if cells.is_empty() {
        return None;
    }

    let rows: Vec<String> = cells
        .keys()
        .map(|(r, _)| r.to_string())
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();
    let cols: Vec<String> = cells
        .keys()
        .map(|(_, c)| c.to_string())
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();
    let grid = rows
        .iter()
        .map(|r| {
            cols.iter()
                .map(|c| {
                    cells
                        .get(&(r.as_str(), c.as_str()))
                        .map(|(sum, n)| sum / *n as f64)
                })
                .collect()
        })
        .collect();

    Some(Heatmap {
        rows,
        cols,
        cells: grid,
    })
}

pub fn cost_intelligence(data: &Dataset) -> CostView {
    let orders = &data.orders;
    let (grouping, breakdown) = if orders.iter().any(|o| o.route.is_some()) {
        (Some(CostGrouping::Route), mean_by(orders, |o| o.route.clone(), |o| o.total_cost))
    } else if orders.iter().any(|o| o.carrier.is_some()) {
        (Some(CostGrouping::Carrier), mean_by(orders, |o| o.carrier.clone(), |o| o.total_cost))
    } else {
        (None, Vec::new())
    };

    let deviations: Vec<f64> = orders.iter().map(|o| o.cost_variance).collect();
    let variance = CostSpread {
        min: deviations.iter().copied().fold(f64::INFINITY, f64::min).min(0.0),
        max: deviations.iter().copied().fold(f64::NEG_INFINITY, f64::max).max(0.0),
        std_dev: mean(deviations.iter().map(|d| d * d)).sqrt(),
    };

    CostView {
        heatmap: cost_heatmap(orders),
        grouping,
        breakdown,
        variance,
        warning: "High cost variance detected across routes -> optimization opportunity.",
    }
}

// ============================================================================
// 6. Customer experience
// ============================================================================

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CustomerRisk {
    pub customer_id: String,
    pub feedback_score: f64,
    pub churn_risk: ChurnRisk,
    pub risk_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerView {
    /// Every customer with feedback, sorted by id
    pub customers: Vec<CustomerRisk>,
    pub high_risk: usize,
    pub table_rows: usize,
}

pub fn customer_experience(data: &Dataset) -> CustomerView {
    let customers: Vec<CustomerRisk> = mean_by(
        &data
            .orders
            .iter()
            .filter(|o| o.feedback_score.map_or(false, f64::is_finite))
            .cloned()
            .collect::<Vec<_>>(),
        |o| Some(o.customer_id.clone()),
        |o| o.feedback_score.unwrap_or_default(),
    )
    .into_iter()
    .map(|(customer_id, score)| CustomerRisk {
        customer_id,
        feedback_score: score,
        churn_risk: ChurnRisk::from_score(score),
        risk_score: (5.0 - score).abs() + 0.5,
    })
    .collect();

    CustomerView {
        high_risk: customers
            .iter()
            .filter(|c| c.churn_risk == ChurnRisk::High)
            .count(),
        table_rows: customers.len().min(CHURN_TABLE_ROWS),
        customers,
    }
}

// ============================================================================
// 7. Sustainability
// ============================================================================

/// Share of emissions a fuel-efficient fleet is projected to save
pub const EFFICIENT_FLEET_SAVING: f64 = 0.25;

#[derive(Debug, Clone, Serialize)]
pub struct SustainabilityView {
    pub avg_co2_kg: f64,
    pub total_co2_kg: f64,
    pub projected_saving_kg: f64,
    /// Mean estimated CO2 per route, highest first
    pub by_route: Vec<(String, f64)>,
}

pub fn sustainability(data: &Dataset) -> SustainabilityView {
    let total: f64 = data.orders.iter().map(|o| o.estimated_co2).sum();
    let mut by_route = mean_by(&data.orders, |o| o.route.clone(), |o| o.estimated_co2);
    by_route.sort_by(|a, b| b.1.total_cmp(&a.1));
    by_route.truncate(10);

    SustainabilityView {
        avg_co2_kg: mean(data.orders.iter().map(|o| o.estimated_co2)),
        total_co2_kg: total,
        projected_saving_kg: total * EFFICIENT_FLEET_SAVING,
        by_route,
    }
}
