//! In-Memory Catalog Store
//!
//! For demos and tests. Evaluates the same query values the SQL backend
//! renders, against rows held in memory.

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::CatalogStore;
use crate::error::{AdvisorError, Result};
use crate::model::{FinancingOffer, RateQuote, VEHICLE_STATUS_AVAILABLE, VehicleRecord};
use crate::query::{
    FinancingQuery, LowestRateQuery, NearestPriceQuery, PriceOrder, VehiclePriceQuery, VehicleQuery,
};

/// Catalog held in memory
pub struct MemoryCatalogStore {
    vehicles: Vec<VehicleRecord>,
    offers: Vec<FinancingOffer>,
    /// Simulates a lost database connection
    offline: bool,
}

impl Default for MemoryCatalogStore {
    fn default() -> Self {
        Self::demo()
    }
}

impl MemoryCatalogStore {
    pub fn new(vehicles: Vec<VehicleRecord>, offers: Vec<FinancingOffer>) -> Self {
        Self { vehicles, offers, offline: false }
    }

    /// Catalog with no rows at all
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    /// Store whose every lookup fails with [`AdvisorError::StoreUnavailable`]
    pub fn offline() -> Self {
        Self { offline: true, ..Self::empty() }
    }

    /// Small dealership catalog used when no database is configured
    pub fn demo() -> Self {
        Self::new(demo_vehicles(), demo_offers())
    }

    fn ensure_online(&self) -> Result<()> {
        if self.offline {
            return Err(AdvisorError::StoreUnavailable("catálogo em memória offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn vehicles(&self, query: &VehicleQuery) -> Result<Vec<VehicleRecord>> {
        self.ensure_online()?;

        let mut rows: Vec<VehicleRecord> = self
            .vehicles
            .iter()
            .filter(|v| query.matches(v))
            .cloned()
            .collect();

        match query.order {
            PriceOrder::Ascending => rows.sort_by(|a, b| a.price.cmp(&b.price)),
            PriceOrder::Descending => rows.sort_by(|a, b| b.price.cmp(&a.price)),
        }
        rows.truncate(query.limit as usize);
        Ok(rows)
    }

    async fn financing_offers(&self, query: &FinancingQuery) -> Result<Vec<FinancingOffer>> {
        self.ensure_online()?;

        let mut rows: Vec<FinancingOffer> = self
            .offers
            .iter()
            .filter(|o| query.matches(o))
            .cloned()
            .collect();

        rows.sort_by(|a, b| a.monthly_rate.total_cmp(&b.monthly_rate));
        rows.truncate(query.limit as usize);
        Ok(rows)
    }

    async fn vehicle_price(&self, query: &VehiclePriceQuery) -> Result<Option<Decimal>> {
        self.ensure_online()?;

        Ok(self
            .vehicles
            .iter()
            .filter(|v| query.matches(v))
            .map(|v| v.price)
            .min())
    }

    async fn average_price(&self) -> Result<Option<Decimal>> {
        self.ensure_online()?;

        let prices: Vec<Decimal> = self
            .vehicles
            .iter()
            .filter(|v| v.is_available())
            .map(|v| v.price)
            .collect();

        if prices.is_empty() {
            return Ok(None);
        }
        let total: Decimal = prices.iter().sum();
        Ok(Some(total / Decimal::from(prices.len())))
    }

    async fn nearest_vehicle(&self, query: &NearestPriceQuery) -> Result<Option<VehicleRecord>> {
        self.ensure_online()?;

        Ok(self
            .vehicles
            .iter()
            .filter_map(|v| query.distance(v).map(|d| (d, v)))
            .min_by(|a, b| a.0.cmp(&b.0))
            .map(|(_, v)| v.clone()))
    }

    async fn lowest_rate(&self, query: &LowestRateQuery) -> Result<Option<RateQuote>> {
        self.ensure_online()?;

        Ok(self
            .offers
            .iter()
            .filter(|o| query.matches(o))
            .min_by(|a, b| a.annual_rate.total_cmp(&b.annual_rate))
            .map(|o| RateQuote { annual_rate: o.annual_rate, bank: o.bank.clone() }))
    }

    async fn health_check(&self) -> bool {
        !self.offline
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[allow(clippy::too_many_arguments)]
fn vehicle(
    brand: &str,
    model: &str,
    trim: &str,
    price: Decimal,
    consumption: (f64, f64),
    horsepower: i32,
    annual_tax: Decimal,
    color: &str,
    fuel_type: &str,
) -> VehicleRecord {
    VehicleRecord {
        brand: brand.into(),
        model: model.into(),
        trim: trim.into(),
        price,
        body_type: "Novo".into(),
        status: VEHICLE_STATUS_AVAILABLE.into(),
        urban_consumption: consumption.0,
        highway_consumption: consumption.1,
        horsepower,
        annual_tax,
        model_year: 2024,
        color: color.into(),
        fuel_type: fuel_type.into(),
    }
}

fn demo_vehicles() -> Vec<VehicleRecord> {
    let mut sold = vehicle(
        "Volkswagen", "Polo", "Track 1.0", dec!(79990), (13.2, 15.0), 84, dec!(3199.60), "Prata", "Flex",
    );
    sold.status = "Vendido".into();

    let mut used = vehicle(
        "Hyundai", "HB20", "Comfort 1.0", dec!(68500), (12.9, 14.6), 80, dec!(2740.00), "Cinza", "Flex",
    );
    used.body_type = "Seminovo".into();
    used.model_year = 2022;

    vec![
        vehicle(
            "Chevrolet", "Onix", "LT 1.0 Turbo", dec!(98590), (13.5, 16.4), 116, dec!(3943.60), "Vermelho", "Flex",
        ),
        vehicle(
            "Fiat", "Argo", "Drive 1.3", dec!(89990), (12.6, 14.1), 107, dec!(3599.60), "Branco", "Flex",
        ),
        vehicle(
            "Honda", "Civic", "LX 2.0 CVT", dec!(154900), (11.3, 13.9), 155, dec!(6196.00), "Preto", "Flex",
        ),
        vehicle(
            "Toyota", "Corolla", "GLI 1.8 CVT", dec!(149990), (11.9, 14.2), 144, dec!(5999.60), "Prata", "Flex",
        ),
        vehicle(
            "Jeep", "Compass", "Limited 1.3 Turbo", dec!(219990), (10.1, 12.0), 185, dec!(8799.60), "Azul", "Flex",
        ),
        used,
        sold,
    ]
}

#[allow(clippy::too_many_arguments)]
fn offer(
    bank: &str,
    offer_type: &str,
    monthly_rate: f64,
    annual_rate: f64,
    installment_count: i32,
    down_payment: Decimal,
    installment_value: Decimal,
    notes: &str,
) -> FinancingOffer {
    FinancingOffer {
        bank: bank.into(),
        offer_type: offer_type.into(),
        monthly_rate,
        annual_rate,
        installment_count,
        down_payment,
        installment_value,
        total_value: down_payment + installment_value * Decimal::from(installment_count),
        notes: notes.into(),
        approved: true,
    }
}

fn demo_offers() -> Vec<FinancingOffer> {
    let mut rejected = offer(
        "Banco Pan", "CDC", 0.79, 9.91, 48, dec!(10000), dec!(2100.00), "",
    );
    rejected.approved = false;

    vec![
        offer(
            "Itaú Unibanco", "CDC", 1.19, 15.23, 48, dec!(20000), dec!(1850.40),
            "Taxa promocional para clientes correntistas",
        ),
        offer(
            "Banco do Brasil", "CDC", 1.29, 16.62, 60, dec!(15000), dec!(1720.90), "",
        ),
        offer(
            "Santander", "Leasing", 1.35, 17.46, 36, dec!(25000), dec!(2350.00),
            "Sem IOF na modalidade leasing",
        ),
        offer(
            "Bradesco", "CDC", 1.49, 19.45, 72, dec!(10000), dec!(1690.30), "",
        ),
        rejected,
    ]
}
