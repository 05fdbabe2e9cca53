//! Residence Admin - command-line driver
//!
//! Loads the service catalog, resolves the customers on an optional floor and
//! prints one page of them.
//!
//! Usage: `residence-admin [FLOOR] [PAGE]`

use anyhow::{Context, Result};
use residence_admin::client::{AsyncResidenceClient, AsyncResidenceClientImpl};
use residence_admin::repositories::{
    ApiCustomerRepository, ApiServiceRepository, CustomerRepository, ServiceRepository,
};
use residence_admin::{
    Config, CustomerAggregator, CustomerViewService, CustomerViewServiceImpl, Floor, Metrics,
    Paginator, ResidenceClient, ServiceCatalog,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Initialize logging (stderr only, stdout carries the listing)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let floor = args
        .next()
        .map(|raw| raw.parse::<Floor>())
        .transpose()
        .context("FLOOR must be an integer")?;
    let page = args
        .next()
        .map(|raw| raw.parse::<i64>())
        .transpose()
        .context("PAGE must be an integer")?
        .unwrap_or(1);

    info!("Using residence API at {}", config.api_base_url);

    let metrics = Metrics::new();
    let sync_client = ResidenceClient::new(&config).with_metrics(metrics.clone());
    let client = Arc::new(AsyncResidenceClientImpl::new(sync_client)) as Arc<dyn AsyncResidenceClient>;

    let service_repo = Arc::new(ApiServiceRepository::new(client.clone())) as Arc<dyn ServiceRepository>;
    let customer_repo = Arc::new(ApiCustomerRepository::new(client)) as Arc<dyn CustomerRepository>;

    let view = CustomerViewServiceImpl::new(
        ServiceCatalog::new(service_repo),
        CustomerAggregator::new(customer_repo).with_metrics(metrics.clone()),
        Paginator::new(config.items_per_page)?,
    );

    if let Err(e) = view.refresh_services().await {
        error!("Could not load services: {}", e);
        return Err(e.into());
    }

    let floors = view.available_floors().await;
    info!("Floors with services: {:?}", floors);

    let outcome = view.select_floor(floor).await;
    info!("Customer resolution: {:?}", outcome);

    let state = view.jump_to_page(page);
    match floor {
        Some(floor) => println!("Floor {}", floor),
        None => println!("All floors"),
    }
    for (id, customer) in view.page() {
        println!("  [{}] {}", id, customer.display_name());
    }
    println!(
        "Page {} of {} ({} customers)",
        state.current_page, state.max_page, state.source_len
    );

    let summary = metrics.summary();
    info!(
        requests = summary.http_requests_total,
        errors = summary.http_errors_total,
        resolved = summary.customers_resolved_total,
        omitted = summary.resolution_failures_total,
        "Done"
    );

    Ok(())
}
