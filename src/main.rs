//! NexGen Logistics dashboard server
//!
//! Usage:
//!   ./target/release/nexgen_logistics [options]
//!
//! Options:
//!   --port PORT        Port to listen on (default: 8501, env NEXGEN_PORT)
//!   --data-dir PATH    Directory with the seven CSV files (default: data, env NEXGEN_DATA_DIR)
//!   --trees N          Trees in the delay model (default: 300)
//!
//! Pages:
//!   GET /views/{overview,risk,performance,fleet,cost,customer,sustainability}
//!
//! JSON:
//!   GET  /api/v1/health
//!   GET  /api/v1/{overview,risk,performance,fleet,cost,customer,sustainability}
//!   POST /api/v1/predict

use anyhow::{Context, Result};
use clap::Parser;
use nexgen_logistics::api::{self, DashboardService};
use nexgen_logistics::config::DashboardArgs;
use nexgen_logistics::views::VIEWS;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_banner(port: u16, orders: usize) {
    println!("============================================================");
    println!("       NEXGEN LOGISTICS - PREDICTIVE AI DASHBOARD");
    println!("============================================================");
    println!();
    println!("  Orders:   {}", orders);
    println!("  Pages:    http://localhost:{}/", port);
    println!("  JSON:     http://localhost:{}/api/v1/", port);
    println!();
    println!("Views:");
    for (slug, title) in VIEWS {
        println!("  /views/{:<16} {}", slug, title);
    }
    println!();
    println!("============================================================");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .init();

    let args = DashboardArgs::parse();

    let service = DashboardService::load(&args.model.data_dir, args.model.model_config())
        .with_context(|| format!("loading data from {}", args.model.data_dir.display()))?;
    if service.data().is_empty() {
        tracing::warn!(
            "No orders found in {}; run generate_sample to create sample data",
            args.model.data_dir.display()
        );
    }
    print_banner(args.port, service.data().orders.len());

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let app = api::router(Arc::new(service));

    tracing::info!("Starting dashboard on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
