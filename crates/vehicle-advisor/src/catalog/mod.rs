//! Catalog Store
//!
//! Read-only access to the dealership catalog. The chat engine only talks to
//! [`CatalogStore`]; PostgreSQL backs production and an in-memory store backs
//! demos and tests.

mod memory;
mod postgres;

pub use memory::MemoryCatalogStore;
pub use postgres::{CatalogConfig, PgCatalogStore};

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::Result;
use crate::model::{FinancingOffer, RateQuote, VehicleRecord};
use crate::query::{FinancingQuery, LowestRateQuery, NearestPriceQuery, VehiclePriceQuery, VehicleQuery};

/// Catalog backend (Strategy pattern)
///
/// Lookups are independent and may run concurrently on a shared store.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Available vehicles matching a query, in query order
    async fn vehicles(&self, query: &VehicleQuery) -> Result<Vec<VehicleRecord>>;

    /// Approved financing offers matching a query, lowest monthly rate first
    async fn financing_offers(&self, query: &FinancingQuery) -> Result<Vec<FinancingOffer>>;

    /// Price of the cheapest available unit of a brand/model
    async fn vehicle_price(&self, query: &VehiclePriceQuery) -> Result<Option<Decimal>>;

    /// Average price across available vehicles
    async fn average_price(&self) -> Result<Option<Decimal>>;

    /// Available vehicle closest in price to a target
    async fn nearest_vehicle(&self, query: &NearestPriceQuery) -> Result<Option<VehicleRecord>>;

    /// Lowest approved annual rate
    async fn lowest_rate(&self, query: &LowestRateQuery) -> Result<Option<RateQuote>>;

    /// Check if the store answers
    async fn health_check(&self) -> bool;

    /// Backend name
    fn name(&self) -> &str;
}
