//! CSV ingestion and the order-level join
//!
//! Each of the seven input files is read on its own, headers are normalized
//! (`Order_ID` -> `order_id`), identifier columns are renamed to their canonical
//! names and the rows are deserialized into the typed records of [`crate::models`].
//! The joined table always has exactly one row per order: a join that finds no
//! partner falls back to sentinel defaults instead of dropping the order.

use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, StringRecord};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

use crate::models::{
    CostRecord, Dataset, DeliveryRecord, FeedbackRecord, OrderRecord, OrderRow, RouteRecord,
    VehicleRecord, WarehouseRecord,
};

pub const ORDERS_FILE: &str = "orders.csv";
pub const DELIVERY_FILE: &str = "delivery_performance.csv";
pub const ROUTES_FILE: &str = "routes_distance.csv";
pub const VEHICLES_FILE: &str = "vehicle_fleet.csv";
pub const COSTS_FILE: &str = "cost_breakdown.csv";
pub const FEEDBACK_FILE: &str = "customer_feedback.csv";
pub const WAREHOUSE_FILE: &str = "warehouse_inventory.csv";

const ORDER_ID_ALIASES: &[&str] = &["orderid", "order_id"];
const VEHICLE_ID_ALIASES: &[&str] = &["vehicleid", "vehicle_id"];
const WAREHOUSE_ID_ALIASES: &[&str] = &["warehouseid", "warehouse_id"];

/// Fill-ins used when a join misses or a cell is empty
pub mod defaults {
    pub const ROUTE_DISTANCE_KM: f64 = 100.0;
    pub const VEHICLE_CAPACITY: f64 = 1000.0;
    pub const WAREHOUSE_LOAD: f64 = 50.0;
    pub const DELIVERY_PRIORITY: &str = "medium";
    pub const FUEL_COST: f64 = 500.0;
    pub const MAINTENANCE_COST: f64 = 200.0;
    pub const ACTUAL_DELIVERY_DAYS: f64 = 5.0;
    pub const EXPECTED_DELIVERY_DAYS: f64 = 3.0;
    pub const TOTAL_COST: f64 = 1000.0;
    pub const FUEL_CONSUMPTION_RATE: f64 = 5.0;
}

/// `" Order ID "` -> `"order_id"`
pub fn normalize_header(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "_")
}

/// Normalize every header and rename the first identifier alias found to `canonical`.
fn normalize_headers(headers: &StringRecord, id_aliases: &[&str]) -> StringRecord {
    let mut names: Vec<String> = headers.iter().map(normalize_header).collect();
    if let Some(canonical) = id_aliases.last() {
        if let Some(pos) = id_aliases
            .iter()
            .find_map(|alias| names.iter().position(|n| n == alias))
        {
            names[pos] = canonical.to_string();
        }
    }
    StringRecord::from(names)
}

/// Read one table. A missing file is an empty table, a present file without its
/// identifier column is an error, and rows that fail to parse are skipped.
pub fn read_table<T: DeserializeOwned>(path: &Path, id_aliases: &[&str]) -> Result<Vec<T>> {
    if !path.exists() {
        warn!("{} not found, continuing with an empty table", path.display());
        return Ok(Vec::new());
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = normalize_headers(reader.headers()?, id_aliases);
    if let Some(id) = id_aliases.last() {
        if !headers.iter().any(|h| h == *id) {
            bail!("{} has no {} column", path.display(), id);
        }
    }
    reader.set_headers(headers);

    let mut rows = Vec::new();
    let mut error_count = 0;
    for (i, result) in reader.deserialize::<T>().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => {
                if error_count < 5 {
                    warn!("Skipping row {} of {}: {}", i + 1, path.display(), e);
                }
                error_count += 1;
            }
        }
    }

    if error_count > 0 {
        warn!("{}: {} rows skipped", path.display(), error_count);
    }
    info!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// The seven raw tables before joining
#[derive(Debug, Default)]
pub struct RawTables {
    pub orders: Vec<OrderRecord>,
    pub delivery: Vec<DeliveryRecord>,
    pub routes: Vec<RouteRecord>,
    pub vehicles: Vec<VehicleRecord>,
    pub costs: Vec<CostRecord>,
    pub feedback: Vec<FeedbackRecord>,
    pub warehouses: Vec<WarehouseRecord>,
}

impl RawTables {
    pub fn read(dir: &Path) -> Result<Self> {
        Ok(Self {
            orders: read_table(&dir.join(ORDERS_FILE), ORDER_ID_ALIASES)?,
            delivery: read_table(&dir.join(DELIVERY_FILE), ORDER_ID_ALIASES)?,
            routes: read_table(&dir.join(ROUTES_FILE), ORDER_ID_ALIASES)?,
            vehicles: read_table(&dir.join(VEHICLES_FILE), VEHICLE_ID_ALIASES)?,
            costs: read_table(&dir.join(COSTS_FILE), ORDER_ID_ALIASES)?,
            feedback: read_table(&dir.join(FEEDBACK_FILE), ORDER_ID_ALIASES)?,
            warehouses: read_table(&dir.join(WAREHOUSE_FILE), WAREHOUSE_ID_ALIASES)?,
        })
    }
}

/// Load every CSV under `dir` and build the joined order table.
pub fn load_all_data(dir: &Path) -> Result<Dataset> {
    info!("Loading datasets from {}", dir.display());
    let tables = RawTables::read(dir)?;
    let dataset = join_tables(tables);
    info!(
        "Joined {} orders ({} vehicles in fleet)",
        dataset.orders.len(),
        dataset.vehicles.len()
    );
    Ok(dataset)
}

/// First row per key wins so every left join stays one-to-one.
fn index_by<'a, T, F>(rows: &'a [T], key: F) -> HashMap<&'a str, &'a T>
where
    F: Fn(&'a T) -> &'a str,
{
    let mut map = HashMap::with_capacity(rows.len());
    for row in rows {
        map.entry(key(row)).or_insert(row);
    }
    map
}

/// Round-robin vehicle assignment per origin city.
struct FleetAssigner<'a> {
    by_location: HashMap<&'a str, Vec<&'a VehicleRecord>>,
    cursor: HashMap<&'a str, usize>,
}

impl<'a> FleetAssigner<'a> {
    fn new(vehicles: &'a [VehicleRecord]) -> Self {
        let mut by_location: HashMap<&str, Vec<&VehicleRecord>> = HashMap::new();
        for v in vehicles {
            if let Some(loc) = v.current_location.as_deref() {
                by_location.entry(loc).or_default().push(v);
            }
        }
        for pool in by_location.values_mut() {
            if pool.iter().any(|v| v.is_available()) {
                pool.retain(|v| v.is_available());
            }
            pool.sort_by(|a, b| a.vehicle_id.cmp(&b.vehicle_id));
        }
        Self {
            by_location,
            cursor: HashMap::new(),
        }
    }

    fn assign(&mut self, origin: &'a str) -> Option<&'a VehicleRecord> {
        let pool = self.by_location.get(origin)?;
        let next = self.cursor.entry(origin).or_insert(0);
        let vehicle = pool[*next % pool.len()];
        *next += 1;
        Some(vehicle)
    }
}

fn customer_id_for(order: &OrderRecord) -> String {
    if let Some(id) = order.customer_id.as_deref().filter(|s| !s.is_empty()) {
        return id.to_string();
    }
    let tail: String = {
        let chars: Vec<char> = order.order_id.chars().collect();
        let start = chars.len().saturating_sub(4);
        chars[start..].iter().collect()
    };
    let segment = order.customer_segment.as_deref().unwrap_or("Unknown");
    format!("{}_{}", segment, tail)
}

fn sum_present(parts: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = parts.iter().flatten().copied().collect();
    if present.is_empty() {
        None
    } else {
        Some(present.iter().sum())
    }
}

/// Left-join every table onto the orders and derive the model and view fields.
pub fn join_tables(tables: RawTables) -> Dataset {
    let delivery = index_by(&tables.delivery, |r| r.order_id.as_str());
    let routes = index_by(&tables.routes, |r| r.order_id.as_str());
    let costs = index_by(&tables.costs, |r| r.order_id.as_str());
    let feedback = index_by(&tables.feedback, |r| r.order_id.as_str());

    let mut warehouse_by_cell: HashMap<(&str, &str), &WarehouseRecord> = HashMap::new();
    let mut warehouse_by_city: HashMap<&str, &WarehouseRecord> = HashMap::new();
    for w in &tables.warehouses {
        if let Some(loc) = w.location.as_deref() {
            warehouse_by_city.entry(loc).or_insert(w);
            if let Some(cat) = w.product_category.as_deref() {
                warehouse_by_cell.entry((loc, cat)).or_insert(w);
            }
        }
    }

    let mut fleet = FleetAssigner::new(&tables.vehicles);

    let mut orders: Vec<OrderRow> = tables
        .orders
        .iter()
        .map(|order| {
            let d = delivery.get(order.order_id.as_str()).copied();
            let r = routes.get(order.order_id.as_str()).copied();
            let c = costs.get(order.order_id.as_str()).copied();
            let f = feedback.get(order.order_id.as_str()).copied();

            let origin = order.origin.as_deref();
            let vehicle = origin.and_then(|o| fleet.assign(o));
            let warehouse = origin.and_then(|o| {
                order
                    .product_category
                    .as_deref()
                    .and_then(|cat| warehouse_by_cell.get(&(o, cat)).copied())
                    .or_else(|| warehouse_by_city.get(o).copied())
            });

            let route_distance_km = r
                .and_then(|r| r.distance_km)
                .unwrap_or(defaults::ROUTE_DISTANCE_KM);
            let fuel_consumption_rate = r
                .and_then(|r| r.fuel_consumption_l)
                .unwrap_or(defaults::FUEL_CONSUMPTION_RATE);
            let maintenance = c.and_then(|c| c.vehicle_maintenance);
            let fuel = c.and_then(|c| c.fuel_cost);

            let total_cost = sum_present(&[
                d.and_then(|d| d.delivery_cost_inr),
                r.and_then(|r| r.toll_charges_inr),
                fuel,
                c.and_then(|c| c.labor_cost),
                c.and_then(|c| c.packaging_cost),
                maintenance,
            ])
            .unwrap_or(defaults::TOTAL_COST);

            OrderRow {
                order_id: order.order_id.clone(),
                customer_id: customer_id_for(order),
                customer_segment: order.customer_segment.clone(),
                product_category: order.product_category.clone(),
                origin: order.origin.clone(),
                destination: order.destination.clone(),
                route: r.and_then(|r| r.route.clone()),
                carrier: d.and_then(|d| d.carrier.clone()),
                vehicle_id: vehicle.map(|v| v.vehicle_id.clone()),
                route_distance_km,
                vehicle_capacity: vehicle
                    .and_then(|v| v.capacity_kg)
                    .unwrap_or(defaults::VEHICLE_CAPACITY),
                warehouse_load: warehouse
                    .and_then(|w| w.load())
                    .unwrap_or(defaults::WAREHOUSE_LOAD),
                delivery_priority: order
                    .priority
                    .clone()
                    .filter(|p| !p.is_empty())
                    .unwrap_or_else(|| defaults::DELIVERY_PRIORITY.to_string()),
                fuel_cost: fuel.unwrap_or(defaults::FUEL_COST),
                maintenance_cost: maintenance.unwrap_or(defaults::MAINTENANCE_COST),
                actual_delivery_days: d
                    .and_then(|d| d.actual_delivery_days)
                    .unwrap_or(defaults::ACTUAL_DELIVERY_DAYS),
                expected_delivery_days: d
                    .and_then(|d| d.promised_delivery_days)
                    .unwrap_or(defaults::EXPECTED_DELIVERY_DAYS),
                total_cost,
                cost_variance: 0.0,
                feedback_score: f.and_then(|f| f.rating),
                fuel_consumption_rate,
                estimated_co2: route_distance_km * fuel_consumption_rate,
            }
        })
        .collect();

    if !orders.is_empty() {
        let mean_cost = orders.iter().map(|o| o.total_cost).sum::<f64>() / orders.len() as f64;
        for o in &mut orders {
            o.cost_variance = o.total_cost - mean_cost;
        }
    }

    Dataset {
        orders,
        vehicles: tables.vehicles,
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    pub fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).expect("write fixture");
    }

    /// Five orders across two origins, with deliberate gaps in the side tables
    pub fn sample_dir() -> TempDir {
        let dir = tempfile::tempdir().expect("create temp dir");
        write(
            dir.path(),
            "orders.csv",
            "Order_ID,Order_Date,Customer_Segment,Priority,Product_Category,Order_Value_INR,Origin,Destination,Special_Handling\n\
             ORD000001,2024-09-01,Enterprise,Express,Electronics,1200,Mumbai,Delhi,None\n\
             ORD000002,2024-09-02,SMB,Standard,Fashion,300,Mumbai,Pune,None\n\
             ORD000003,2024-09-03,Individual,Economy,Electronics,800,Delhi,Mumbai,Fragile\n\
             ORD000004,2024-09-04,SMB,,Books,150,Delhi,Chennai,None\n\
             ORD000005,2024-09-05,Enterprise,Express,Fashion,950,Kolkata,Delhi,None\n",
        );
        write(
            dir.path(),
            "delivery_performance.csv",
            "Order_ID,Carrier,Promised_Delivery_Days,Actual_Delivery_Days,Delivery_Status,Quality_Issue,Customer_Rating,Delivery_Cost_INR\n\
             ORD000001,SpeedyLogistics,2,4,Slightly-Delayed,None,3,400\n\
             ORD000002,QuickShip,4,3,On-Time,None,5,250\n\
             ORD000003,SpeedyLogistics,5,5,On-Time,None,4,300\n\
             ORD000003,Duplicate,9,1,On-Time,None,4,999\n\
             ORD000004,QuickShip,3,6,Severely-Delayed,Damaged,1,200\n",
        );
        write(
            dir.path(),
            "routes_distance.csv",
            "Order_ID,Route,Distance_KM,Fuel_Consumption_L,Toll_Charges_INR,Traffic_Delay_Minutes,Weather_Impact\n\
             ORD000001,Mumbai-Delhi,1400,120,500,30,None\n\
             ORD000002,Mumbai-Pune,150,12,100,5,Rain\n\
             ORD000003,Delhi-Mumbai,1400,110,500,60,None\n\
             ORD000004,Delhi-Chennai,2200,,800,90,Fog\n",
        );
        write(
            dir.path(),
            "vehicle_fleet.csv",
            "Vehicle_ID,Vehicle_Type,Capacity_KG,Fuel_Efficiency_KM_per_L,Current_Location,Status,Age_Years,CO2_Emissions_Kg_per_KM\n\
             VEH002,Large_Truck,5000,6,Mumbai,Available,3,0.9\n\
             VEH001,Small_Van,800,12,Mumbai,Available,1,0.3\n\
             VEH003,Medium_Truck,2500,8,Delhi,In_Maintenance,5,0.6\n",
        );
        write(
            dir.path(),
            "cost_breakdown.csv",
            "Order_ID,Fuel_Cost,Labor_Cost,Vehicle_Maintenance,Insurance,Packaging_Cost,Technology_Platform_Fee,Other_Overhead\n\
             ORD000001,600,300,150,50,40,20,10\n\
             ORD000002,100,80,,10,15,5,5\n\
             ORD000004,900,400,250,60,50,25,20\n",
        );
        write(
            dir.path(),
            "customer_feedback.csv",
            "Feedback_ID,Order_ID,Feedback_Date,Rating,Feedback_Text,Would_Recommend,Issue_Category\n\
             FB001,ORD000001,2024-09-06,2,Late again,No,Timing\n\
             FB002,ORD000002,2024-09-06,5,Great,Yes,None\n\
             FB003,ORD000004,2024-09-10,1,Damaged box,No,Damage\n",
        );
        write(
            dir.path(),
            "warehouse_inventory.csv",
            "Warehouse_ID,Location,Product_Category,Current_Stock_Units,Reorder_Level,Storage_Cost_per_Unit,Last_Restocked_Date\n\
             WH001,Mumbai,Electronics,300,100,5,2024-08-01\n\
             WH002,Mumbai,Fashion,100,100,3,2024-08-02\n\
             WH003,Delhi,Books,0,50,2,2024-08-03\n",
        );
        dir
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header(" Order ID "), "order_id");
        assert_eq!(normalize_header("Distance_KM"), "distance_km");
    }

    #[test]
    fn test_join_preserves_order_count() {
        let dir = sample_dir();
        let data = load_all_data(dir.path()).unwrap();
        assert_eq!(data.orders.len(), 5);
        let ids: Vec<&str> = data.orders.iter().map(|o| o.order_id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["ORD000001", "ORD000002", "ORD000003", "ORD000004", "ORD000005"]
        );
    }

    #[test]
    fn test_delay_flag_matches_days() {
        let dir = sample_dir();
        let data = load_all_data(dir.path()).unwrap();
        for o in &data.orders {
            assert_eq!(
                o.is_delayed(),
                o.actual_delivery_days > o.expected_delivery_days
            );
        }
        // ORD000003 keeps its first delivery row, not the duplicate
        let third = data.find_order("ORD000003").unwrap();
        assert_eq!(third.carrier.as_deref(), Some("SpeedyLogistics"));
        assert!(!third.is_delayed());
        assert!(data.find_order("ORD000004").unwrap().is_delayed());
    }

    #[test]
    fn test_missing_joins_use_defaults() {
        let dir = sample_dir();
        let data = load_all_data(dir.path()).unwrap();

        let lone = data.find_order("ORD000005").unwrap();
        assert_eq!(lone.route_distance_km, defaults::ROUTE_DISTANCE_KM);
        assert_eq!(lone.vehicle_capacity, defaults::VEHICLE_CAPACITY);
        assert_eq!(lone.warehouse_load, defaults::WAREHOUSE_LOAD);
        assert_eq!(lone.fuel_cost, defaults::FUEL_COST);
        assert_eq!(lone.maintenance_cost, defaults::MAINTENANCE_COST);
        assert_eq!(lone.actual_delivery_days, defaults::ACTUAL_DELIVERY_DAYS);
        assert_eq!(lone.expected_delivery_days, defaults::EXPECTED_DELIVERY_DAYS);
        assert_eq!(lone.total_cost, defaults::TOTAL_COST);
        assert_eq!(lone.feedback_score, None);
        assert!(lone.vehicle_id.is_none());

        let blank_priority = data.find_order("ORD000004").unwrap();
        assert_eq!(blank_priority.delivery_priority, defaults::DELIVERY_PRIORITY);
        assert_eq!(
            blank_priority.fuel_consumption_rate,
            defaults::FUEL_CONSUMPTION_RATE
        );
    }

    #[test]
    fn test_derived_cost_and_emissions() {
        let dir = sample_dir();
        let data = load_all_data(dir.path()).unwrap();

        let first = data.find_order("ORD000001").unwrap();
        // delivery 400 + toll 500 + fuel 600 + labor 300 + packaging 40 + maintenance 150
        assert_eq!(first.total_cost, 1990.0);
        assert_eq!(first.estimated_co2, 1400.0 * 120.0);
        assert_eq!(first.customer_id, "Enterprise_0001");

        let variance_sum: f64 = data.orders.iter().map(|o| o.cost_variance).sum();
        assert!(variance_sum.abs() < 1e-6);
    }

    #[test]
    fn test_fleet_and_warehouse_joins() {
        let dir = sample_dir();
        let data = load_all_data(dir.path()).unwrap();

        // Mumbai orders alternate over the sorted available vehicles
        assert_eq!(
            data.find_order("ORD000001").unwrap().vehicle_id.as_deref(),
            Some("VEH001")
        );
        assert_eq!(
            data.find_order("ORD000002").unwrap().vehicle_id.as_deref(),
            Some("VEH002")
        );
        // Delhi only has a vehicle in maintenance, which is still used
        assert_eq!(
            data.find_order("ORD000003").unwrap().vehicle_id.as_deref(),
            Some("VEH003")
        );

        assert_eq!(data.find_order("ORD000001").unwrap().warehouse_load, 75.0);
        assert_eq!(data.find_order("ORD000002").unwrap().warehouse_load, 50.0);
        assert_eq!(data.find_order("ORD000004").unwrap().warehouse_load, 0.0);
    }

    #[test]
    fn test_fixture_dir_is_removed_on_drop() {
        let dir = sample_dir();
        let path = dir.path().to_path_buf();
        assert!(path.join("orders.csv").exists());
        drop(dir);
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_files_yield_empty_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let data = load_all_data(dir.path()).unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn test_missing_id_column_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "orders.csv", "Ref,Origin\nA,Mumbai\n");
        assert!(load_all_data(dir.path()).is_err());
    }

    #[test]
    fn test_lowercase_id_alias() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "orders.csv", "OrderID,Origin\nX1,Pune\n");
        let data = load_all_data(dir.path()).unwrap();
        assert_eq!(data.orders[0].order_id, "X1");
        assert_eq!(data.orders[0].customer_id, "Unknown_X1");
    }
}
