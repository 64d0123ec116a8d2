use std::sync::Arc;

use anyhow::Result;
use rust_decimal::Decimal;
use sales_points_service::{
    adapters::database::memory::MemoryDatabase, api, commands::DomainLogic, domain::PaymentMethod,
};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let database = MemoryDatabase::default();
    seed_payment_methods(&database)?;

    let logic = DomainLogic::new(Arc::new(database.clone()), Arc::new(database));
    let app = api::build_router(logic);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    tracing::info!(%addr, "starting sales points service");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Register the read-only payment-method catalog
///
/// Modifier ranges are inclusive; the points modifier is the rate applied to
/// the base price.
fn seed_payment_methods(database: &MemoryDatabase) -> Result<()> {
    let catalog = [
        (
            "CASH",
            Decimal::new(90, 2),
            Decimal::new(102, 2),
            Decimal::new(5, 2),
        ),
        (
            "CASH_ON_DELIVERY",
            Decimal::new(100, 2),
            Decimal::new(102, 2),
            Decimal::new(5, 2),
        ),
        (
            "VISA",
            Decimal::new(95, 2),
            Decimal::new(100, 2),
            Decimal::new(3, 2),
        ),
        (
            "MASTERCARD",
            Decimal::new(95, 2),
            Decimal::new(100, 2),
            Decimal::new(3, 2),
        ),
        (
            "AMEX",
            Decimal::new(98, 2),
            Decimal::new(101, 2),
            Decimal::new(2, 2),
        ),
        (
            "JCB",
            Decimal::new(95, 2),
            Decimal::new(100, 2),
            Decimal::new(5, 2),
        ),
    ];

    for (name, from, to, points_modifier) in catalog {
        database.register_payment_method(PaymentMethod {
            payment_method_id: Uuid::new_v4(),
            name: name.to_string(),
            price_modifier_from: from,
            price_modifier_to: to,
            points_modifier,
        })?;
    }

    Ok(())
}
