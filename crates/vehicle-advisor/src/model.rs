//! Domain Models
//!
//! Read-only projections of the dealership catalog plus the transient
//! quote produced by the amortization calculator.
//! Catalog money values are `rust_decimal`; quotes are `f64` because the
//! annuity formula needs real exponentiation.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Status literal the catalog uses for vehicles on sale
pub const VEHICLE_STATUS_AVAILABLE: &str = "Disponivel";

/// A vehicle row from the catalog
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct VehicleRecord {
    pub brand: String,

    pub model: String,

    /// Version/trim name (e.g., "Drive 1.3")
    #[sqlx(rename = "trim_level")]
    pub trim: String,

    /// Sale price in BRL
    pub price: Decimal,

    /// "Novo", "Usado", "Seminovo"
    pub body_type: String,

    pub status: String,

    /// km/l in the city
    pub urban_consumption: f64,

    /// km/l on the highway
    pub highway_consumption: f64,

    pub horsepower: i32,

    /// IPVA (annual vehicle tax) in BRL
    pub annual_tax: Decimal,

    pub model_year: i32,

    pub color: String,

    pub fuel_type: String,
}

impl VehicleRecord {
    /// "Brand Model Trim"
    pub fn display_name(&self) -> String {
        format!("{} {} {}", self.brand, self.model, self.trim)
    }

    pub fn is_available(&self) -> bool {
        self.status == VEHICLE_STATUS_AVAILABLE
    }

    pub fn price_f64(&self) -> f64 {
        self.price.to_f64().unwrap_or_default()
    }
}

/// A financing product offered by a partner bank
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct FinancingOffer {
    pub bank: String,

    /// Product type (e.g., "CDC", "Leasing", "Consórcio")
    pub offer_type: String,

    /// Monthly interest rate, in percent
    pub monthly_rate: f64,

    /// Annual interest rate, in percent
    pub annual_rate: f64,

    pub installment_count: i32,

    pub down_payment: Decimal,

    pub installment_value: Decimal,

    pub total_value: Decimal,

    #[sqlx(default)]
    pub notes: String,

    pub approved: bool,
}

/// Lowest approved annual rate and the bank offering it
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RateQuote {
    /// Annual rate in percent, as stored in the catalog
    pub annual_rate: f64,

    pub bank: String,
}

impl RateQuote {
    /// Annual rate as a fraction (4.27% -> 0.0427)
    pub fn annual_fraction(&self) -> f64 {
        self.annual_rate / 100.0
    }
}

/// Result of a forward or inverse amortization calculation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FinancingQuote {
    pub vehicle_price: f64,

    /// Down payment given (forward) or required (inverse)
    pub down_payment: f64,

    /// Amount financed
    pub principal: f64,

    /// Annual rate as a fraction
    pub annual_rate: f64,

    /// Monthly rate as a fraction
    pub monthly_rate: f64,

    pub installments: f64,

    pub monthly_payment: f64,

    pub total_paid: f64,

    pub total_interest: f64,

    /// Bank whose rate was used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank: Option<String>,
}

impl FinancingQuote {
    pub fn with_bank(mut self, bank: impl Into<String>) -> Self {
        self.bank = Some(bank.into());
        self
    }
}
