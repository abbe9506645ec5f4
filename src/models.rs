use serde::{Deserialize, Serialize};

/// Row of `orders.csv`
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRecord {
    pub order_id: String,
    #[serde(default)]
    pub order_date: Option<String>,
    #[serde(default)]
    pub customer_segment: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub product_category: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub order_value_inr: Option<f64>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub special_handling: Option<String>,
}

/// Row of `delivery_performance.csv`
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryRecord {
    pub order_id: String,
    #[serde(default)]
    pub carrier: Option<String>,
    #[serde(
        default,
        alias = "expected_delivery_days",
        deserialize_with = "csv::invalid_option"
    )]
    pub promised_delivery_days: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub actual_delivery_days: Option<f64>,
    #[serde(default)]
    pub delivery_status: Option<String>,
    #[serde(default)]
    pub quality_issue: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub customer_rating: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub delivery_cost_inr: Option<f64>,
}

/// Row of `routes_distance.csv`
#[derive(Debug, Clone, Deserialize)]
pub struct RouteRecord {
    pub order_id: String,
    #[serde(default)]
    pub route: Option<String>,
    #[serde(
        default,
        alias = "route_distance_km",
        deserialize_with = "csv::invalid_option"
    )]
    pub distance_km: Option<f64>,
    #[serde(
        default,
        alias = "fuel_consumption_rate",
        deserialize_with = "csv::invalid_option"
    )]
    pub fuel_consumption_l: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub toll_charges_inr: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub traffic_delay_minutes: Option<f64>,
    #[serde(default)]
    pub weather_impact: Option<String>,
}

/// Row of `vehicle_fleet.csv`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub vehicle_id: String,
    #[serde(default)]
    pub vehicle_type: Option<String>,
    #[serde(
        default,
        alias = "vehicle_capacity",
        deserialize_with = "csv::invalid_option"
    )]
    pub capacity_kg: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub fuel_efficiency_km_per_l: Option<f64>,
    #[serde(default)]
    pub current_location: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub age_years: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub co2_emissions_kg_per_km: Option<f64>,
}

impl VehicleRecord {
    pub fn is_available(&self) -> bool {
        self.status
            .as_deref()
            .map(|s| s.eq_ignore_ascii_case("available"))
            .unwrap_or(false)
    }
}

/// Row of `cost_breakdown.csv`
#[derive(Debug, Clone, Deserialize)]
pub struct CostRecord {
    pub order_id: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub fuel_cost: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub labor_cost: Option<f64>,
    #[serde(
        default,
        alias = "maintenance_cost",
        deserialize_with = "csv::invalid_option"
    )]
    pub vehicle_maintenance: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub insurance: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub packaging_cost: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub technology_platform_fee: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub other_overhead: Option<f64>,
}

/// Row of `customer_feedback.csv`
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackRecord {
    #[serde(default)]
    pub feedback_id: Option<String>,
    pub order_id: String,
    #[serde(default)]
    pub feedback_date: Option<String>,
    #[serde(
        default,
        alias = "feedback_score",
        deserialize_with = "csv::invalid_option"
    )]
    pub rating: Option<f64>,
    #[serde(default)]
    pub feedback_text: Option<String>,
    #[serde(default)]
    pub would_recommend: Option<String>,
    #[serde(default)]
    pub issue_category: Option<String>,
}

/// Row of `warehouse_inventory.csv`
#[derive(Debug, Clone, Deserialize)]
pub struct WarehouseRecord {
    pub warehouse_id: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub product_category: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub current_stock_units: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub reorder_level: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub storage_cost_per_unit: Option<f64>,
    #[serde(default)]
    pub last_restocked_date: Option<String>,
}

impl WarehouseRecord {
    /// Stock pressure in [0, 100]; 50 when stock sits exactly at the reorder level.
    pub fn load(&self) -> Option<f64> {
        let stock = self.current_stock_units?.max(0.0);
        let reorder = self.reorder_level?.max(0.0);
        if stock + reorder == 0.0 {
            return None;
        }
        Some(100.0 * stock / (stock + reorder))
    }
}

/// Joined, one-per-order row used by the model and every dashboard view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderRow {
    pub order_id: String,
    pub customer_id: String,
    pub customer_segment: Option<String>,
    pub product_category: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub route: Option<String>,
    pub carrier: Option<String>,
    pub vehicle_id: Option<String>,
    pub route_distance_km: f64,
    pub vehicle_capacity: f64,
    pub warehouse_load: f64,
    pub delivery_priority: String,
    pub fuel_cost: f64,
    pub maintenance_cost: f64,
    pub actual_delivery_days: f64,
    pub expected_delivery_days: f64,
    pub total_cost: f64,
    pub cost_variance: f64,
    pub feedback_score: Option<f64>,
    pub fuel_consumption_rate: f64,
    pub estimated_co2: f64,
}

impl OrderRow {
    /// Delivery missed its promise
    pub fn is_delayed(&self) -> bool {
        self.actual_delivery_days > self.expected_delivery_days
    }

    pub fn delay_days(&self) -> f64 {
        self.actual_delivery_days - self.expected_delivery_days
    }
}

/// Customer churn bucket
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChurnRisk {
    High,
    Low,
}

impl ChurnRisk {
    pub fn from_score(mean_feedback: f64) -> Self {
        if mean_feedback < 3.0 {
            ChurnRisk::High
        } else {
            ChurnRisk::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChurnRisk::High => "High",
            ChurnRisk::Low => "Low",
        }
    }
}

/// Everything the dashboard reads: the joined table plus the fleet roster
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub orders: Vec<OrderRow>,
    pub vehicles: Vec<VehicleRecord>,
}

impl Dataset {
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn find_order(&self, order_id: &str) -> Option<&OrderRow> {
        self.orders.iter().find(|o| o.order_id == order_id)
    }
}
