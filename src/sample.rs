//! Synthetic versions of the seven input tables
//!
//! Whether an order slips is mostly noise with respect to the model features:
//! long routes and bad weather nudge the odds up a little, nothing more. Ratings
//! drop for late or damaged deliveries, and a share of orders is left out of the
//! side tables so the loader's fill-in values show up in the joined table.

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use csv::WriterBuilder;
use rand::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::loader::{
    COSTS_FILE, DELIVERY_FILE, FEEDBACK_FILE, ORDERS_FILE, ROUTES_FILE, VEHICLES_FILE,
    WAREHOUSE_FILE,
};

const CITIES: [&str; 10] = [
    "Mumbai", "Delhi", "Bangalore", "Chennai", "Kolkata", "Hyderabad", "Pune", "Ahmedabad",
    "Jaipur", "Lucknow",
];
const SEGMENTS: [&str; 3] = ["Enterprise", "SMB", "Individual"];
const PRIORITIES: [&str; 3] = ["Express", "Standard", "Economy"];
const CATEGORIES: [&str; 5] = ["Electronics", "Fashion", "Food & Beverage", "Healthcare", "Books"];
const CARRIERS: [&str; 5] = [
    "SpeedyLogistics",
    "QuickShip",
    "GlobalTransit",
    "ReliableExpress",
    "EcoDeliver",
];
const WEATHER: [&str; 4] = ["None", "Light_Rain", "Heavy_Rain", "Fog"];
const VEHICLE_TYPES: [(&str, f64, f64, f64); 5] = [
    // type, capacity kg, km per litre, kg CO2 per km
    ("Small_Van", 800.0, 12.0, 0.25),
    ("Medium_Truck", 2500.0, 8.0, 0.45),
    ("Large_Truck", 5000.0, 5.0, 0.75),
    ("Refrigerated", 2000.0, 6.5, 0.60),
    ("Express_Bike", 50.0, 40.0, 0.05),
];
const VEHICLE_STATUS: [&str; 3] = ["Available", "In_Transit", "Maintenance"];

/// Baseline chance that a covered delivery slips
const BASE_LATE_ODDS: f64 = 0.42;

#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub orders: usize,
    pub vehicles: usize,
    /// Share of orders that get a delivery, route and cost row
    pub coverage: f64,
    /// Share of covered orders with customer feedback
    pub feedback_rate: f64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            orders: 200,
            vehicles: 50,
            coverage: 0.98,
            feedback_rate: 0.8,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderOut {
    order_id: String,
    order_date: String,
    customer_segment: &'static str,
    priority: &'static str,
    product_category: &'static str,
    order_value_inr: f64,
    origin: &'static str,
    destination: &'static str,
    special_handling: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DeliveryOut {
    order_id: String,
    carrier: &'static str,
    promised_delivery_days: u32,
    actual_delivery_days: u32,
    delivery_status: &'static str,
    quality_issue: &'static str,
    customer_rating: u32,
    delivery_cost_inr: f64,
}

#[derive(Debug, Serialize)]
pub struct RouteOut {
    order_id: String,
    route: String,
    distance_km: f64,
    fuel_consumption_l: f64,
    toll_charges_inr: f64,
    traffic_delay_minutes: u32,
    weather_impact: &'static str,
}

#[derive(Debug, Serialize)]
pub struct VehicleOut {
    vehicle_id: String,
    vehicle_type: &'static str,
    capacity_kg: f64,
    fuel_efficiency_km_per_l: f64,
    current_location: &'static str,
    status: &'static str,
    age_years: u32,
    co2_emissions_kg_per_km: f64,
}

#[derive(Debug, Serialize)]
pub struct CostOut {
    order_id: String,
    fuel_cost: f64,
    labor_cost: f64,
    vehicle_maintenance: f64,
    insurance: f64,
    packaging_cost: f64,
    technology_platform_fee: f64,
    other_overhead: f64,
}

#[derive(Debug, Serialize)]
pub struct FeedbackOut {
    feedback_id: String,
    order_id: String,
    feedback_date: String,
    rating: u32,
    feedback_text: &'static str,
    would_recommend: &'static str,
    issue_category: &'static str,
}

#[derive(Debug, Serialize)]
pub struct WarehouseOut {
    warehouse_id: String,
    location: &'static str,
    product_category: &'static str,
    current_stock_units: u32,
    reorder_level: u32,
    storage_cost_per_unit: f64,
    last_restocked_date: String,
}

/// The seven generated tables, ready to be written as CSV
#[derive(Debug, Default)]
pub struct SampleTables {
    pub orders: Vec<OrderOut>,
    pub deliveries: Vec<DeliveryOut>,
    pub routes: Vec<RouteOut>,
    pub vehicles: Vec<VehicleOut>,
    pub costs: Vec<CostOut>,
    pub feedback: Vec<FeedbackOut>,
    pub warehouses: Vec<WarehouseOut>,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Symmetric city-pair distances between 120 and 2400 km
fn distance_table(rng: &mut impl Rng) -> HashMap<(usize, usize), f64> {
    let mut table = HashMap::new();
    for a in 0..CITIES.len() {
        for b in (a + 1)..CITIES.len() {
            let d = rng.gen_range(120.0..2400.0_f64).round();
            table.insert((a, b), d);
            table.insert((b, a), d);
        }
    }
    table
}

pub fn generate(config: &SampleConfig, rng: &mut StdRng) -> Result<SampleTables> {
    let start = NaiveDate::from_ymd_opt(2024, 9, 1).context("invalid start date")?;
    let distances = distance_table(rng);
    let coverage = config.coverage.clamp(0.0, 1.0);
    let feedback_rate = config.feedback_rate.clamp(0.0, 1.0);
    let mut tables = SampleTables::default();

    for i in 0..config.orders {
        let order_id = format!("ORD{:06}", i + 1);
        let order_date = start + Duration::days(rng.gen_range(0..90));
        let origin = rng.gen_range(0..CITIES.len());
        let mut destination = rng.gen_range(0..CITIES.len() - 1);
        if destination >= origin {
            destination += 1;
        }
        let priority = PRIORITIES[rng.gen_range(0..PRIORITIES.len())];
        let distance = distances.get(&(origin, destination)).copied().unwrap_or(500.0);

        tables.orders.push(OrderOut {
            order_id: order_id.clone(),
            order_date: order_date.format("%Y-%m-%d").to_string(),
            customer_segment: SEGMENTS[rng.gen_range(0..SEGMENTS.len())],
            priority,
            product_category: CATEGORIES[rng.gen_range(0..CATEGORIES.len())],
            order_value_inr: round2(rng.gen_range(150.0..15000.0)),
            origin: CITIES[origin],
            destination: CITIES[destination],
            special_handling: if rng.gen_bool(0.15) { "Fragile" } else { "None" },
        });

        if !rng.gen_bool(coverage) {
            continue;
        }

        let weather = WEATHER[rng.gen_range(0..WEATHER.len())];
        let traffic: u32 = rng.gen_range(0..120);
        let promised: u32 = match priority {
            "Express" => rng.gen_range(1..=2),
            "Standard" => rng.gen_range(3..=5),
            _ => rng.gen_range(5..=7),
        };
        let mut late_odds = BASE_LATE_ODDS;
        if distance > 1800.0 {
            late_odds += 0.04;
        }
        if weather == "Heavy_Rain" {
            late_odds += 0.04;
        }
        let slip: u32 = if rng.gen_bool(late_odds) {
            rng.gen_range(1..=4)
        } else {
            0
        };
        let early: u32 = if slip == 0 && promised > 1 && rng.gen_bool(0.2) { 1 } else { 0 };
        let actual = promised + slip - early;
        let status = match slip {
            0 => "On-Time",
            1 | 2 => "Slightly-Delayed",
            _ => "Severely-Delayed",
        };
        let quality = if rng.gen_bool(0.1) { "Damaged" } else { "Perfect" };
        let base_rating: i32 = 5 - slip as i32 - if quality == "Damaged" { 1 } else { 0 };
        let rating = (base_rating + rng.gen_range(-1..=1)).clamp(1, 5) as u32;

        let fuel_l = round2(distance / rng.gen_range(5.0..12.0));

        tables.deliveries.push(DeliveryOut {
            order_id: order_id.clone(),
            carrier: CARRIERS[rng.gen_range(0..CARRIERS.len())],
            promised_delivery_days: promised,
            actual_delivery_days: actual,
            delivery_status: status,
            quality_issue: quality,
            customer_rating: rating,
            delivery_cost_inr: round2(distance * rng.gen_range(0.8..1.6)),
        });
        tables.routes.push(RouteOut {
            order_id: order_id.clone(),
            route: format!("{}-{}", CITIES[origin], CITIES[destination]),
            distance_km: distance,
            fuel_consumption_l: fuel_l,
            toll_charges_inr: round2(distance * rng.gen_range(0.1..0.4)),
            traffic_delay_minutes: traffic,
            weather_impact: weather,
        });
        tables.costs.push(CostOut {
            order_id: order_id.clone(),
            fuel_cost: round2(fuel_l * 95.0),
            labor_cost: round2(rng.gen_range(200.0..1200.0)),
            vehicle_maintenance: round2(rng.gen_range(50.0..400.0)),
            insurance: round2(rng.gen_range(20.0..200.0)),
            packaging_cost: round2(rng.gen_range(10.0..150.0)),
            technology_platform_fee: round2(rng.gen_range(5.0..60.0)),
            other_overhead: round2(rng.gen_range(10.0..120.0)),
        });

        if rng.gen_bool(feedback_rate) {
            let (text, issue) = match rating {
                1 | 2 => ("Delivery was late and support was slow", "Timing"),
                3 => ("Average experience", "Other"),
                _ => ("Great service", "None"),
            };
            let feedback_id = format!("FB{:05}", tables.feedback.len() + 1);
            tables.feedback.push(FeedbackOut {
                feedback_id,
                order_id,
                feedback_date: (order_date + Duration::days(actual as i64 + 1))
                    .format("%Y-%m-%d")
                    .to_string(),
                rating,
                feedback_text: text,
                would_recommend: if rating >= 4 { "Yes" } else { "No" },
                issue_category: issue,
            });
        }
    }

    for i in 0..config.vehicles {
        let (kind, capacity, efficiency, co2) = VEHICLE_TYPES[rng.gen_range(0..VEHICLE_TYPES.len())];
        tables.vehicles.push(VehicleOut {
            vehicle_id: format!("VEH{:03}", i + 1),
            vehicle_type: kind,
            capacity_kg: capacity,
            fuel_efficiency_km_per_l: efficiency,
            current_location: CITIES[rng.gen_range(0..CITIES.len())],
            status: VEHICLE_STATUS[rng.gen_range(0..VEHICLE_STATUS.len())],
            age_years: rng.gen_range(0..12),
            co2_emissions_kg_per_km: co2,
        });
    }

    for city in CITIES {
        for category in CATEGORIES {
            let warehouse_id = format!("WH{:03}", tables.warehouses.len() + 1);
            tables.warehouses.push(WarehouseOut {
                warehouse_id,
                location: city,
                product_category: category,
                current_stock_units: rng.gen_range(0..1500),
                reorder_level: rng.gen_range(100..500),
                storage_cost_per_unit: round2(rng.gen_range(1.0..12.0)),
                last_restocked_date: (start - Duration::days(rng.gen_range(1..60)))
                    .format("%Y-%m-%d")
                    .to_string(),
            });
        }
    }

    Ok(tables)
}

fn write_csv<T: Serialize>(dir: &Path, name: &str, rows: &[T]) -> Result<()> {
    let path = dir.join(name);
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(&path)
        .with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

impl SampleTables {
    /// Write all seven files under `dir` using the loader's file names.
    pub fn write_to(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
        write_csv(dir, ORDERS_FILE, &self.orders)?;
        write_csv(dir, DELIVERY_FILE, &self.deliveries)?;
        write_csv(dir, ROUTES_FILE, &self.routes)?;
        write_csv(dir, VEHICLES_FILE, &self.vehicles)?;
        write_csv(dir, COSTS_FILE, &self.costs)?;
        write_csv(dir, FEEDBACK_FILE, &self.feedback)?;
        write_csv(dir, WAREHOUSE_FILE, &self.warehouses)?;
        Ok(())
    }

    /// `(file name, row count)` per table, in write order
    pub fn row_counts(&self) -> [(&'static str, usize); 7] {
        [
            (ORDERS_FILE, self.orders.len()),
            (DELIVERY_FILE, self.deliveries.len()),
            (ROUTES_FILE, self.routes.len()),
            (VEHICLES_FILE, self.vehicles.len()),
            (COSTS_FILE, self.costs.len()),
            (FEEDBACK_FILE, self.feedback.len()),
            (WAREHOUSE_FILE, self.warehouses.len()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_all_data;
    use crate::trainer::{train_delay_model, ModelConfig};

    fn sample(seed: u64, orders: usize) -> SampleTables {
        let config = SampleConfig {
            orders,
            ..SampleConfig::default()
        };
        generate(&config, &mut StdRng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn test_side_tables_follow_coverage() {
        let tables = sample(7, 300);
        assert_eq!(tables.orders.len(), 300);
        assert_eq!(tables.vehicles.len(), 50);
        assert_eq!(tables.warehouses.len(), CITIES.len() * CATEGORIES.len());
        assert_eq!(tables.deliveries.len(), tables.routes.len());
        assert_eq!(tables.deliveries.len(), tables.costs.len());
        assert!(tables.deliveries.len() <= 300);
        assert!(tables.feedback.len() <= tables.deliveries.len());
    }

    #[test]
    fn test_same_seed_same_tables() {
        let a = sample(11, 50);
        let b = sample(11, 50);
        assert_eq!(a.row_counts(), b.row_counts());
        let delays = |t: &SampleTables| -> Vec<u32> {
            t.deliveries.iter().map(|d| d.actual_delivery_days).collect()
        };
        assert_eq!(delays(&a), delays(&b));
    }

    #[test]
    fn test_written_tables_load_one_row_per_order() {
        let dir = tempfile::tempdir().unwrap();
        sample(3, 120).write_to(dir.path()).unwrap();
        let data = load_all_data(dir.path()).unwrap();
        assert_eq!(data.orders.len(), 120);
        assert_eq!(data.vehicles.len(), 50);
        let delayed = data.orders.iter().filter(|o| o.is_delayed()).count();
        assert!(delayed > 0 && delayed < 120);
    }

    #[test]
    fn test_default_model_accuracy_is_near_chance() {
        // Delays are mostly noise against the features, so held-out accuracy
        // stays in the 40-50% band give or take sampling error
        let mut accuracies = Vec::new();
        for seed in [1, 2, 3] {
            let dir = tempfile::tempdir().unwrap();
            sample(seed, 400).write_to(dir.path()).unwrap();
            let data = load_all_data(dir.path()).unwrap();
            let model = train_delay_model(&data.orders, &ModelConfig::default()).unwrap();
            let accuracy = model.metrics.accuracy;
            assert!((0.25..=0.68).contains(&accuracy), "seed {} accuracy {}", seed, accuracy);
            accuracies.push(accuracy);
        }
        let mean = accuracies.iter().sum::<f64>() / accuracies.len() as f64;
        assert!((0.33..=0.62).contains(&mean), "mean accuracy {}", mean);
    }
}
