//! Server-side HTML for the dashboard pages
//!
//! Charts are inline SVG so the pages work without any JavaScript bundle.

use crate::views::{
    CostGrouping, CostView, CustomerView, FleetGrouping, FleetView, Heatmap, HistogramBin,
    OverviewView, PerformanceView, RiskBand, RiskView, SustainabilityView, CHURN_TABLE_ROWS,
    VIEWS,
};
use crate::models::ChurnRisk;

const BG: &str = "#020617";
const ACCENT: &str = "#6366f1";
const GREEN: &str = "#22c55e";
const AMBER: &str = "#eab308";
const RED: &str = "#ef4444";

const STYLE: &str = r#"
html, body { margin: 0; font-family: 'Inter', sans-serif; background: #020617; color: #e5e7eb; }
.layout { display: flex; min-height: 100vh; }
nav { width: 240px; background: #0f172a; padding: 24px 16px; }
nav h2 { font-size: 15px; color: #a5b4fc; margin: 0 0 16px; }
nav a { display: block; color: #cbd5e1; text-decoration: none; padding: 8px 10px; border-radius: 8px; margin-bottom: 4px; }
nav a.active, nav a:hover { background: #1e293b; color: white; }
main { flex: 1; padding: 28px 36px; }
h1 { font-size: 24px; margin-top: 0; animation: fadeInUp 0.5s ease-out; }
h3 { margin-top: 28px; }
.kpis { display: flex; gap: 20px; }
.kpi-card { flex: 1; background: linear-gradient(135deg, #1f2933, #111827); border-radius: 18px; padding: 20px;
  color: white; box-shadow: 0 0 25px rgba(99,102,241,0.25); transition: transform 0.3s ease; animation: fadeInUp 0.6s ease-out; }
.kpi-card:hover { transform: scale(1.03); box-shadow: 0 0 35px rgba(99,102,241,0.4); }
.kpi-card h4 { margin: 0; color: #a5b4fc; }
.kpi-card .value { font-size: 34px; font-weight: 700; margin: 8px 0; }
.kpi-card p { margin: 0; color: #94a3b8; }
.notice { padding: 12px 16px; border-radius: 10px; margin: 18px 0; }
.notice.success { background: rgba(34,197,94,0.15); border: 1px solid #22c55e; }
.notice.warning { background: rgba(234,179,8,0.15); border: 1px solid #eab308; }
.notice.error { background: rgba(239,68,68,0.15); border: 1px solid #ef4444; }
.notice.info { background: rgba(59,130,246,0.15); border: 1px solid #3b82f6; }
table { border-collapse: collapse; margin-top: 12px; }
th, td { padding: 6px 14px; border-bottom: 1px solid #1e293b; text-align: left; }
th { color: #a5b4fc; }
.progress { height: 14px; background: #1e293b; border-radius: 7px; overflow: hidden; max-width: 640px; }
.progress > div { height: 100%; background-image: linear-gradient(to right, #22c55e, #eab308, #ef4444); }
form input { background: #0f172a; color: white; border: 1px solid #334155; border-radius: 6px; padding: 6px 10px; }
form button { background: #6366f1; color: white; border: 0; border-radius: 6px; padding: 7px 14px; cursor: pointer; }
@keyframes fadeInUp { from { opacity: 0; transform: translateY(20px); } to { opacity: 1; transform: translateY(0); } }
"#;

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Full page with the navigation sidebar; `active` is the slug of the current view.
pub fn page(active: &str, title: &str, body: &str) -> String {
    let nav: String = VIEWS
        .iter()
        .map(|(slug, name)| {
            let class = if *slug == active { " class=\"active\"" } else { "" };
            format!("<a href=\"/views/{}\"{}>{}</a>", slug, class, name)
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title} | NexGen Logistics</title>
<style>{style}</style>
</head>
<body>
<div class="layout">
<nav><h2>NexGen Logistics - Predictive &amp; Prescriptive AI</h2>{nav}</nav>
<main>
<h1>{title}</h1>
{body}
</main>
</div>
</body>
</html>"#,
        title = escape(title),
        style = STYLE,
        nav = nav,
        body = body,
    )
}

fn notice(kind: &str, text: &str) -> String {
    format!("<div class=\"notice {}\">{}</div>", kind, escape(text))
}

fn kpi_card(label: &str, value: &str, caption: &str) -> String {
    format!(
        "<div class=\"kpi-card\"><h4>{}</h4><div class=\"value\">{}</div><p>{}</p></div>",
        escape(label),
        escape(value),
        escape(caption)
    )
}

fn bullet_list(items: &[&str]) -> String {
    let lis: String = items.iter().map(|i| format!("<li>{}</li>", escape(i))).collect();
    format!("<ul>{}</ul>", lis)
}

// ============================================================================
// Colour scales
// ============================================================================

fn lerp_rgb(stops: &[(u8, u8, u8)], t: f64) -> String {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let seg = (stops.len() - 1) as f64 * t;
    let i = (seg.floor() as usize).min(stops.len() - 2);
    let f = seg - i as f64;
    let (a, b) = (stops[i], stops[i + 1]);
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * f).round() as u8;
    format!("#{:02x}{:02x}{:02x}", mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

const INFERNO: [(u8, u8, u8); 5] = [
    (0, 0, 4),
    (87, 16, 110),
    (188, 55, 84),
    (249, 142, 9),
    (252, 255, 164),
];
const VIRIDIS: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];
const BLUES: [(u8, u8, u8); 3] = [(198, 219, 239), (66, 146, 198), (8, 48, 107)];

fn normalized(v: f64, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        (v - lo) / (hi - lo)
    } else {
        1.0
    }
}

// ============================================================================
// SVG charts
// ============================================================================

const CHART_W: f64 = 760.0;
const CHART_H: f64 = 320.0;
const PAD: f64 = 48.0;

fn svg_open(title: &str, width: f64, height: f64) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" \
         style=\"background:{bg}\" font-size=\"11\" fill=\"white\">\
         <text x=\"{cx}\" y=\"20\" text-anchor=\"middle\" font-size=\"14\">{t}</text>",
        w = width,
        h = height,
        bg = BG,
        cx = width / 2.0,
        t = escape(title)
    )
}

/// Vertical bars, one per `(label, value)`; `scale` colours bars by value.
pub fn bar_chart(title: &str, bars: &[(String, f64)], scale: Option<&[(u8, u8, u8)]>) -> String {
    let mut svg = svg_open(title, CHART_W, CHART_H);
    if bars.is_empty() {
        svg.push_str("</svg>");
        return svg;
    }
    let max = bars.iter().map(|b| b.1).fold(0.0_f64, f64::max);
    let min = bars.iter().map(|b| b.1).fold(f64::INFINITY, f64::min);
    let plot_h = CHART_H - 2.0 * PAD;
    let slot = (CHART_W - 2.0 * PAD) / bars.len() as f64;
    let bar_w = (slot * 0.8).max(1.0);

    for (i, (label, value)) in bars.iter().enumerate() {
        let h = if max > 0.0 { value.max(0.0) / max * plot_h } else { 0.0 };
        let x = PAD + slot * i as f64 + (slot - bar_w) / 2.0;
        let y = CHART_H - PAD - h;
        let fill = match scale {
            Some(stops) => lerp_rgb(stops, normalized(*value, min, max)),
            None => ACCENT.to_string(),
        };
        svg.push_str(&format!(
            "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\"><title>{}: {:.3}</title></rect>",
            x, y, bar_w, h, fill, escape(label), value
        ));
        if bars.len() <= 24 {
            svg.push_str(&format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" transform=\"rotate(-35 {:.1} {:.1})\">{}</text>",
                x + bar_w / 2.0,
                CHART_H - PAD + 14.0,
                x + bar_w / 2.0,
                CHART_H - PAD + 14.0,
                escape(label)
            ));
        }
    }
    svg.push_str(&format!(
        "<text x=\"{}\" y=\"{:.1}\">{:.2}</text></svg>",
        4, PAD, max
    ));
    svg
}

pub fn histogram_chart(title: &str, bins: &[HistogramBin]) -> String {
    let bars: Vec<(String, f64)> = bins
        .iter()
        .map(|b| (format!("{:.1}..{:.1}", b.start, b.end), b.count as f64))
        .collect();
    bar_chart(title, &bars, None)
}

/// Semicircular 0-100 gauge with green/amber/red steps at 40 and 70.
pub fn gauge_chart(title: &str, value: f64) -> String {
    let (w, h) = (420.0, 260.0);
    let (cx, cy, r) = (w / 2.0, 200.0, 150.0);
    let point = |pct: f64| {
        let angle = std::f64::consts::PI * (1.0 - pct / 100.0);
        (cx + r * angle.cos(), cy - r * angle.sin())
    };

    let mut svg = svg_open(title, w, h);
    for (from, to, color) in [(0.0, 40.0, GREEN), (40.0, 70.0, AMBER), (70.0, 100.0, RED)] {
        let (x1, y1) = point(from);
        let (x2, y2) = point(to);
        svg.push_str(&format!(
            "<path d=\"M {:.1} {:.1} A {r} {r} 0 0 1 {:.1} {:.1}\" stroke=\"{}\" stroke-width=\"26\" fill=\"none\"/>",
            x1, y1, x2, y2, color, r = r
        ));
    }
    let (nx, ny) = point(value.clamp(0.0, 100.0));
    svg.push_str(&format!(
        "<line x1=\"{cx}\" y1=\"{cy}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"5\"/>\
         <text x=\"{cx}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"30\">{:.1}</text></svg>",
        nx,
        ny,
        ACCENT,
        cy + 45.0,
        value,
        cx = cx,
        cy = cy
    ));
    svg
}

pub fn heatmap_chart(title: &str, heat: &Heatmap) -> String {
    let cell = 56.0;
    let left = 110.0;
    let top = 90.0;
    let w = left + cell * heat.cols.len() as f64 + 20.0;
    let h = top + cell * heat.rows.len() as f64 + 20.0;
    let values = heat.cells.iter().flatten().flatten().copied();
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    let mut svg = svg_open(title, w.max(320.0), h);
    for (c, name) in heat.cols.iter().enumerate() {
        let x = left + cell * c as f64 + cell / 2.0;
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" transform=\"rotate(-45 {:.1} {:.1})\">{}</text>",
            x,
            top - 6.0,
            x,
            top - 6.0,
            escape(name)
        ));
    }
    for (r, name) in heat.rows.iter().enumerate() {
        let y = top + cell * r as f64;
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\">{}</text>",
            left - 6.0,
            y + cell / 2.0 + 4.0,
            escape(name)
        ));
        for (c, v) in heat.cells[r].iter().enumerate() {
            let x = left + cell * c as f64;
            let fill = match v {
                Some(v) => lerp_rgb(&INFERNO, normalized(*v, lo, hi)),
                None => "#111827".to_string(),
            };
            let tip = v.map(|v| format!("{:.0}", v)).unwrap_or_else(|| "n/a".into());
            svg.push_str(&format!(
                "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{cell}\" height=\"{cell}\" fill=\"{}\" stroke=\"{}\">\
                 <title>{} -> {}: {}</title></rect>",
                x,
                y,
                fill,
                BG,
                escape(name),
                escape(&heat.cols[c]),
                tip,
                cell = cell
            ));
        }
    }
    svg.push_str("</svg>");
    svg
}

/// Feedback score on x, churn risk score on y; marker size follows the risk score.
pub fn churn_scatter(title: &str, view: &CustomerView) -> String {
    let mut svg = svg_open(title, CHART_W, CHART_H);
    let plot_w = CHART_W - 2.0 * PAD;
    let plot_h = CHART_H - 2.0 * PAD;
    let x_of = |score: f64| PAD + (score.clamp(0.0, 5.0) / 5.0) * plot_w;
    let y_of = |risk: f64| CHART_H - PAD - (risk.clamp(0.0, 5.5) / 5.5) * plot_h;

    svg.push_str(&format!(
        "<line x1=\"{p}\" y1=\"{b}\" x2=\"{r}\" y2=\"{b}\" stroke=\"#334155\"/>\
         <text x=\"{cx}\" y=\"{lb}\" text-anchor=\"middle\">feedback_score</text>",
        p = PAD,
        b = CHART_H - PAD,
        r = CHART_W - PAD,
        cx = CHART_W / 2.0,
        lb = CHART_H - 12.0
    ));
    for c in &view.customers {
        let color = match c.churn_risk {
            ChurnRisk::High => RED,
            ChurnRisk::Low => GREEN,
        };
        svg.push_str(&format!(
            "<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"{:.1}\" fill=\"{}\" fill-opacity=\"0.7\"><title>{}: {:.2}</title></circle>",
            x_of(c.feedback_score),
            y_of(c.risk_score),
            3.0 + c.risk_score * 1.5,
            color,
            escape(&c.customer_id),
            c.feedback_score
        ));
    }
    svg.push_str("</svg>");
    svg
}

// ============================================================================
// View pages
// ============================================================================

pub fn overview_page(view: &OverviewView) -> String {
    let mut body = String::from("<div class=\"kpis\">");
    body.push_str(&kpi_card("Total Orders", &view.total_orders.to_string(), "Across all warehouses"));
    body.push_str(&kpi_card("Delay Rate", &format!("{:.1}%", view.delay_rate_pct), "Orders missing SLA"));
    body.push_str(&kpi_card("Avg Cost / Order", &format!("₹{:.0}", view.avg_cost), "End-to-end logistics"));
    body.push_str("</div>");
    body.push_str(&notice(
        "success",
        "Predictive analytics enabled | Cost optimization insights generated",
    ));
    body.push_str("<h3>Delay Pattern Analysis</h3>");
    body.push_str(&histogram_chart("Delivery Delay Distribution (Days)", &view.delay_histogram));
    page("overview", "Executive Command Center", &body)
}

fn risk_form(selected: Option<&str>) -> String {
    format!(
        "<form method=\"get\" action=\"/views/risk\">\
         <label>Order ID <input name=\"order_id\" value=\"{}\"></label> \
         <button type=\"submit\">Predict Delivery Risk</button></form>",
        escape(selected.unwrap_or(""))
    )
}

pub fn risk_page(view: Option<&RiskView>, requested: Option<&str>) -> String {
    let mut body = risk_form(requested);
    match view {
        None => body.push_str(&notice("warning", "Not enough data for prediction")),
        Some(v) => {
            if let Some(id) = &v.order_id {
                body.push_str(&format!("<h3>Predicted Delivery Risk for {}</h3>", escape(id)));
            }
            body.push_str(&format!(
                "<div class=\"progress\"><div style=\"width:{:.1}%\"></div></div>",
                v.risk_pct.clamp(0.0, 100.0)
            ));
            body.push_str(&gauge_chart("Delay Probability (%)", v.risk_pct));
            let kind = match v.band {
                RiskBand::High => "error",
                RiskBand::Medium => "warning",
                RiskBand::Low => "success",
            };
            body.push_str(&notice(kind, v.headline));
            if !v.actions.is_empty() {
                let heading = if v.band == RiskBand::High {
                    "Recommended Actions"
                } else {
                    "Suggested Actions"
                };
                body.push_str(&format!("<strong>{}:</strong>", heading));
                body.push_str(&bullet_list(&v.actions));
            }
            body.push_str(&format!(
                "<table><tr><th>Feature</th><th>Value</th></tr>\
                 <tr><td>route_distance_km</td><td>{:.1}</td></tr>\
                 <tr><td>vehicle_capacity</td><td>{:.0}</td></tr>\
                 <tr><td>warehouse_load</td><td>{:.1}</td></tr>\
                 <tr><td>delivery_priority</td><td>{}</td></tr>\
                 <tr><td>fuel_cost</td><td>{:.1}</td></tr>\
                 <tr><td>maintenance_cost</td><td>{:.1}</td></tr></table>",
                v.inputs.route_distance_km,
                v.inputs.vehicle_capacity,
                v.inputs.warehouse_load,
                escape(&v.inputs.delivery_priority),
                v.inputs.fuel_cost,
                v.inputs.maintenance_cost
            ));
        }
    }
    page("risk", "Predictive Delivery Risk Engine", &body)
}

pub fn performance_page(view: &PerformanceView) -> String {
    let auc = view
        .roc_auc
        .map(|a| format!("{:.3}", a))
        .unwrap_or_else(|| "n/a".to_string());
    let mut body = String::from("<div class=\"kpis\">");
    body.push_str(&kpi_card("Model Accuracy", &format!("{:.2}%", view.accuracy_pct), "Held-out orders"));
    body.push_str(&kpi_card("ROC-AUC Score", &auc, "Discrimination"));
    body.push_str(&kpi_card(
        "Training / Test",
        &format!("{} / {}", view.train_size, view.test_size),
        "Stratified 75/25 split",
    ));
    body.push_str("</div><h3>What Drives Delivery Delays?</h3>");
    body.push_str(&bar_chart("Feature Importance Analysis", &view.feature_importance, Some(&BLUES)));

    body.push_str("<h3>Confusion Matrix</h3><table><tr><th></th>");
    for c in view.confusion.col_labels {
        body.push_str(&format!("<th>{}</th>", c));
    }
    body.push_str("</tr>");
    for (label, row) in view.confusion.row_labels.iter().zip(view.confusion.values) {
        body.push_str(&format!(
            "<tr><th>{}</th><td>{}</td><td>{}</td></tr>",
            label, row[0], row[1]
        ));
    }
    body.push_str("</table>");
    body.push_str(&notice(
        "info",
        "The model focuses primarily on route distance, delivery priority, and cost pressure \
         signals, aligning with real-world logistics risk factors.",
    ));
    page("performance", "Model Performance & Explainability", &body)
}

pub fn fleet_page(view: &FleetView) -> String {
    let header = match view.grouping {
        FleetGrouping::Vehicle => ("Vehicle", "Assigned Orders"),
        FleetGrouping::Carrier => ("Carrier", "Assigned Orders"),
        FleetGrouping::Order => ("Order", "Fleet Data"),
    };
    let mut body = format!("<table><tr><th>{}</th><th>{}</th></tr>", header.0, header.1);
    for row in &view.rows {
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>",
            escape(&row.key),
            row.assigned_orders
        ));
    }
    body.push_str("</table>");
    if !view.idle_vehicles.is_empty() {
        body.push_str(&format!(
            "<h3>Idle vehicles ({})</h3><p>{}</p>",
            view.idle_vehicles.len(),
            escape(&view.idle_vehicles.join(", "))
        ));
    }
    body.push_str(&notice("info", &format!("Recommendation: {}", view.recommendation)));
    page("fleet", "Dynamic Fleet Optimization", &body)
}

pub fn cost_page(view: &CostView) -> String {
    let mut body = String::new();
    if let Some(heat) = &view.heatmap {
        body.push_str("<h3>Cost Hotspots</h3>");
        body.push_str(&heatmap_chart("Average Cost Heatmap (Origin x Destination)", heat));
    }
    if let Some(grouping) = view.grouping {
        let title = match grouping {
            CostGrouping::Route => "Cost by Route",
            CostGrouping::Carrier => "Cost by Carrier",
        };
        body.push_str(&bar_chart(title, &view.breakdown, Some(&VIRIDIS)));
    }
    body.push_str(&format!(
        "<h3>Cost variance</h3><p>Deviation from the average order cost ranges from \
         ₹{:.0} to ₹{:.0} (standard deviation ₹{:.0}).</p>",
        view.variance.min, view.variance.max, view.variance.std_dev
    ));
    body.push_str(&notice("warning", view.warning));
    page("cost", "Cost Intelligence Platform", &body)
}

pub fn customer_page(view: &CustomerView) -> String {
    let mut body = String::new();
    if view.customers.is_empty() {
        body.push_str(&notice("warning", "No customer feedback data available for visualization"));
    } else {
        body.push_str(&churn_scatter("Customer Churn Risk Landscape", view));
        body.push_str(&format!(
            "<p>{} of {} customers are at high churn risk.</p>",
            view.high_risk,
            view.customers.len()
        ));
    }
    body.push_str(
        "<table><tr><th>customer_id</th><th>feedback_score</th><th>Churn Risk</th><th>risk_score</th></tr>",
    );
    for c in view.customers.iter().take(CHURN_TABLE_ROWS) {
        body.push_str(&format!(
            "<tr><td>{}</td><td>{:.2}</td><td>{}</td><td>{:.2}</td></tr>",
            escape(&c.customer_id),
            c.feedback_score,
            c.churn_risk.label(),
            c.risk_score
        ));
    }
    body.push_str("</table>");
    page("customer", "Customer Churn Risk Monitor", &body)
}

pub fn sustainability_page(view: &SustainabilityView) -> String {
    let mut body = String::from("<div class=\"kpis\">");
    body.push_str(&kpi_card(
        "Avg CO₂ per Delivery",
        &format!("{:.2} kg", view.avg_co2_kg),
        "Distance x fuel consumption",
    ));
    body.push_str(&kpi_card(
        "Projected Saving",
        &format!("{:.0} kg", view.projected_saving_kg),
        "With a fuel-efficient fleet",
    ));
    body.push_str("</div>");
    if !view.by_route.is_empty() {
        body.push_str(&bar_chart("Highest-Emission Routes (avg kg)", &view.by_route, Some(&VIRIDIS)));
    }
    body.push_str(&notice(
        "success",
        "Switching to fuel-efficient vehicles can reduce emissions by ~25%",
    ));
    page("sustainability", "Sustainability & Carbon Tracker", &body)
}

/// Page used when a view cannot be computed (e.g. the model failed to train)
pub fn error_page(active: &str, title: &str, message: &str) -> String {
    page(active, title, &notice("error", message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::{HistogramBin, OverviewView};

    #[test]
    fn test_escape() {
        assert_eq!(escape("<a href='x'>&</a>"), "&lt;a href=&#39;x&#39;&gt;&amp;&lt;/a&gt;");
    }

    #[test]
    fn test_page_marks_active_view() {
        let html = page("fleet", "Fleet", "<p>body</p>");
        assert!(html.contains("<a href=\"/views/fleet\" class=\"active\">Fleet Optimization</a>"));
        assert!(html.contains("<a href=\"/views/overview\">Executive Overview</a>"));
        assert!(html.contains("<p>body</p>"));
    }

    #[test]
    fn test_overview_page_has_kpis_and_chart() {
        let view = OverviewView {
            total_orders: 150,
            delayed_orders: 69,
            delay_rate_pct: 46.0,
            avg_cost: 1234.4,
            delay_histogram: vec![HistogramBin { start: 0.0, end: 1.0, count: 3 }],
        };
        let html = overview_page(&view);
        assert!(html.contains(">150<"));
        assert!(html.contains("46.0%"));
        assert!(html.contains("₹1234"));
        assert!(html.contains("<svg"));
    }

    #[test]
    fn test_colour_scale_endpoints() {
        assert_eq!(lerp_rgb(&VIRIDIS, 0.0), "#440154");
        assert_eq!(lerp_rgb(&VIRIDIS, 1.0), "#fde725");
        assert_eq!(lerp_rgb(&VIRIDIS, f64::NAN), "#440154");
    }

    #[test]
    fn test_gauge_shows_value() {
        let svg = gauge_chart("Delay Probability (%)", 72.25);
        assert!(svg.contains("72.2") || svg.contains("72.3"));
        assert!(svg.ends_with("</svg>"));
    }
}
