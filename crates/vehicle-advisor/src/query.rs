//! Catalog Query Builder
//!
//! Turns typed filters into catalog lookups. Every lookup is a value with
//! explicit predicates, ordering and row limit; it can be rendered to SQL
//! with positional (`$n`) parameters or evaluated against in-memory rows.
//! Caller-influenced values only ever travel as [`SqlParam`]s, never inside
//! the SQL text.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::model::{FinancingOffer, VehicleRecord};

/// Rows returned by list lookups
pub const RESULT_LIMIT: u32 = 3;

/// Price ceiling applied to "cheap vehicle" questions
pub const CHEAP_VEHICLE_MAX_PRICE: Decimal = dec!(100000);

/// Max distance between a target price and the vehicle attached to a quote
pub const NEAREST_PRICE_TOLERANCE: Decimal = dec!(5000);

const VEHICLE_SELECT: &str = "SELECT m.marca AS brand, mo.modelo AS model, v.versao AS trim_level, \
v.preco_venda::numeric AS price, v.tipo_veiculo AS body_type, v.status_veiculo AS status, \
v.consumo_urbano::float8 AS urban_consumption, v.consumo_rodoviario::float8 AS highway_consumption, \
v.potencia_cv::int4 AS horsepower, v.ipva_anual::numeric AS annual_tax, v.ano_modelo::int4 AS model_year, \
v.cor AS color, v.tipo_combustivel AS fuel_type";

const VEHICLE_FROM: &str = " FROM veiculos v \
JOIN modelos mo ON v.id_modelos = mo.id_modelos \
JOIN marcas m ON mo.id_marcas = m.id_marcas \
WHERE v.status_veiculo = 'Disponivel'";

const FINANCING_SELECT: &str = "SELECT banco_financiadora AS bank, tipo_financiamento AS offer_type, \
taxa_juros_mes::float8 AS monthly_rate, taxa_juros_ano::float8 AS annual_rate, \
numero_parcelas::int4 AS installment_count, valor_entrada::numeric AS down_payment, \
valor_parcela::numeric AS installment_value, valor_total::numeric AS total_value, \
COALESCE(observacoes, '') AS notes, aprovado AS approved \
FROM financiamentos WHERE aprovado = true";

/// A value bound to a positional parameter
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SqlParam {
    Decimal(Decimal),
    Text(String),
    Int(i32),
}

/// SQL text plus its bound parameters, in placeholder order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SqlStatement {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl SqlStatement {
    fn new(base: &str) -> Self {
        Self { sql: base.to_string(), params: Vec::new() }
    }

    /// Append a fragment whose `{}` becomes the next `$n` placeholder
    fn push_bound(&mut self, fragment: &str, param: SqlParam) {
        self.params.push(param);
        let placeholder = format!("${}", self.params.len());
        self.sql.push_str(&fragment.replace("{}", &placeholder));
    }

    fn push(&mut self, fragment: &str) {
        self.sql.push_str(fragment);
    }
}

// ============================================================================
// Vehicles
// ============================================================================

/// Explicit sort request from the caller
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortPreference {
    Cheap,
    Expensive,
}

impl SortPreference {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "expensive" => Some(Self::Expensive),
            "cheap" => Some(Self::Cheap),
            _ => None,
        }
    }
}

/// Ordering of vehicle rows by sale price
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceOrder {
    Ascending,
    Descending,
}

impl PriceOrder {
    const fn sql(self) -> &'static str {
        match self {
            Self::Ascending => " ORDER BY v.preco_venda ASC",
            Self::Descending => " ORDER BY v.preco_venda DESC",
        }
    }
}

/// Optional filters for a vehicle lookup
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleFilters {
    pub max_price: Option<Decimal>,
    pub min_price: Option<Decimal>,
    pub brand: Option<String>,
    pub body_type: Option<String>,
    pub sort: Option<SortPreference>,
}

impl VehicleFilters {
    /// Filters for "carro barato" questions
    pub fn cheap() -> Self {
        Self { max_price: Some(CHEAP_VEHICLE_MAX_PRICE), ..Self::default() }
    }

    /// Filters for "carro mais caro" questions
    pub fn expensive() -> Self {
        Self { sort: Some(SortPreference::Expensive), ..Self::default() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VehiclePredicate {
    MaxPrice(Decimal),
    MinPrice(Decimal),
    /// Case-insensitive brand equality
    Brand(String),
    BodyType(String),
}

impl VehiclePredicate {
    fn push_sql(&self, statement: &mut SqlStatement) {
        match self {
            Self::MaxPrice(price) => {
                statement.push_bound(" AND v.preco_venda <= {}", SqlParam::Decimal(*price));
            }
            Self::MinPrice(price) => {
                statement.push_bound(" AND v.preco_venda >= {}", SqlParam::Decimal(*price));
            }
            Self::Brand(brand) => {
                statement.push_bound(" AND LOWER(m.marca) = LOWER({})", SqlParam::Text(brand.clone()));
            }
            Self::BodyType(body_type) => {
                statement.push_bound(" AND v.tipo_veiculo = {}", SqlParam::Text(body_type.clone()));
            }
        }
    }

    pub fn matches(&self, vehicle: &VehicleRecord) -> bool {
        match self {
            Self::MaxPrice(price) => vehicle.price <= *price,
            Self::MinPrice(price) => vehicle.price >= *price,
            Self::Brand(brand) => vehicle.brand.to_lowercase() == brand.to_lowercase(),
            Self::BodyType(body_type) => vehicle.body_type == *body_type,
        }
    }
}

/// Available vehicles matching all predicates, ordered by price
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VehicleQuery {
    pub predicates: Vec<VehiclePredicate>,
    pub order: PriceOrder,
    pub limit: u32,
}

impl VehicleQuery {
    pub fn to_sql(&self) -> SqlStatement {
        let mut statement = SqlStatement::new(VEHICLE_SELECT);
        statement.push(VEHICLE_FROM);
        for predicate in &self.predicates {
            predicate.push_sql(&mut statement);
        }
        statement.push(self.order.sql());
        statement.push(&format!(" LIMIT {}", self.limit));
        statement
    }

    pub fn matches(&self, vehicle: &VehicleRecord) -> bool {
        vehicle.is_available() && self.predicates.iter().all(|p| p.matches(vehicle))
    }
}

fn positive(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| *v > Decimal::ZERO)
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty()).map(String::from)
}

/// Build the vehicle lookup for a set of filters.
///
/// Rows are sorted by descending price when the caller asked for expensive
/// vehicles or gave no price ceiling; otherwise ascending.
pub fn build_vehicle_query(filters: &VehicleFilters) -> VehicleQuery {
    let max_price = positive(filters.max_price);
    let mut predicates = Vec::new();

    if let Some(price) = max_price {
        predicates.push(VehiclePredicate::MaxPrice(price));
    }
    if let Some(price) = positive(filters.min_price) {
        predicates.push(VehiclePredicate::MinPrice(price));
    }
    if let Some(brand) = non_blank(filters.brand.as_ref()) {
        predicates.push(VehiclePredicate::Brand(brand));
    }
    if let Some(body_type) = non_blank(filters.body_type.as_ref()) {
        predicates.push(VehiclePredicate::BodyType(body_type));
    }

    let order = if filters.sort == Some(SortPreference::Expensive) || max_price.is_none() {
        PriceOrder::Descending
    } else {
        PriceOrder::Ascending
    };

    VehicleQuery { predicates, order, limit: RESULT_LIMIT }
}

/// Available vehicle closest in price to a target, within a tolerance
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NearestPriceQuery {
    pub target: Decimal,
    pub tolerance: Decimal,
}

impl NearestPriceQuery {
    pub const fn new(target: Decimal) -> Self {
        Self { target, tolerance: NEAREST_PRICE_TOLERANCE }
    }

    pub fn to_sql(&self) -> SqlStatement {
        let mut statement = SqlStatement::new(VEHICLE_SELECT);
        statement.push(VEHICLE_FROM);
        statement.push_bound(" AND ABS(v.preco_venda - {})", SqlParam::Decimal(self.target));
        statement.push_bound(" <= {}", SqlParam::Decimal(self.tolerance));
        statement.push(" ORDER BY ABS(v.preco_venda - $1) ASC LIMIT 1");
        statement
    }

    /// Distance from the target, if within tolerance
    pub fn distance(&self, vehicle: &VehicleRecord) -> Option<Decimal> {
        let distance = (vehicle.price - self.target).abs();
        (vehicle.is_available() && distance <= self.tolerance).then_some(distance)
    }
}

/// Price of the cheapest available unit of a brand/model pair
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VehiclePriceQuery {
    pub brand: String,
    pub model: String,
}

impl VehiclePriceQuery {
    pub fn new(brand: impl Into<String>, model: impl Into<String>) -> Self {
        Self { brand: brand.into(), model: model.into() }
    }

    pub fn to_sql(&self) -> SqlStatement {
        let mut statement = SqlStatement::new("SELECT v.preco_venda::numeric");
        statement.push(VEHICLE_FROM);
        statement.push_bound(" AND LOWER(m.marca) = LOWER({})", SqlParam::Text(self.brand.clone()));
        statement.push_bound(" AND LOWER(mo.modelo) = LOWER({})", SqlParam::Text(self.model.clone()));
        statement.push(" ORDER BY v.preco_venda ASC LIMIT 1");
        statement
    }

    pub fn matches(&self, vehicle: &VehicleRecord) -> bool {
        vehicle.is_available()
            && vehicle.brand.to_lowercase() == self.brand.to_lowercase()
            && vehicle.model.to_lowercase() == self.model.to_lowercase()
    }
}

/// Average price of all available vehicles
pub fn average_price_sql() -> SqlStatement {
    SqlStatement::new(
        "SELECT AVG(v.preco_venda)::numeric FROM veiculos v WHERE v.status_veiculo = 'Disponivel'",
    )
}

// ============================================================================
// Financing
// ============================================================================

/// Optional filters for a financing lookup
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancingFilters {
    pub max_installments: Option<i32>,
    pub offer_type: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FinancingPredicate {
    MaxInstallments(i32),
    OfferType(String),
}

impl FinancingPredicate {
    fn push_sql(&self, statement: &mut SqlStatement) {
        match self {
            Self::MaxInstallments(count) => {
                statement.push_bound(" AND numero_parcelas <= {}", SqlParam::Int(*count));
            }
            Self::OfferType(offer_type) => {
                statement.push_bound(" AND tipo_financiamento = {}", SqlParam::Text(offer_type.clone()));
            }
        }
    }

    pub fn matches(&self, offer: &FinancingOffer) -> bool {
        match self {
            Self::MaxInstallments(count) => offer.installment_count <= *count,
            Self::OfferType(offer_type) => offer.offer_type == *offer_type,
        }
    }
}

/// Approved offers matching all predicates, cheapest monthly rate first
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinancingQuery {
    pub predicates: Vec<FinancingPredicate>,
    pub limit: u32,
}

impl FinancingQuery {
    pub fn to_sql(&self) -> SqlStatement {
        let mut statement = SqlStatement::new(FINANCING_SELECT);
        for predicate in &self.predicates {
            predicate.push_sql(&mut statement);
        }
        statement.push(&format!(" ORDER BY taxa_juros_mes ASC LIMIT {}", self.limit));
        statement
    }

    pub fn matches(&self, offer: &FinancingOffer) -> bool {
        offer.approved && self.predicates.iter().all(|p| p.matches(offer))
    }
}

pub fn build_financing_query(filters: &FinancingFilters) -> FinancingQuery {
    let mut predicates = Vec::new();

    if let Some(count) = filters.max_installments.filter(|c| *c > 0) {
        predicates.push(FinancingPredicate::MaxInstallments(count));
    }
    if let Some(offer_type) = non_blank(filters.offer_type.as_ref()) {
        predicates.push(FinancingPredicate::OfferType(offer_type));
    }

    FinancingQuery { predicates, limit: RESULT_LIMIT }
}

/// Lowest approved annual rate, optionally for a single bank
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LowestRateQuery {
    pub bank: Option<String>,
}

impl LowestRateQuery {
    pub fn for_bank(bank: Option<&str>) -> Self {
        Self { bank: non_blank(bank.map(String::from).as_ref()) }
    }

    pub fn to_sql(&self) -> SqlStatement {
        let mut statement = SqlStatement::new(
            "SELECT taxa_juros_ano::float8 AS annual_rate, banco_financiadora AS bank \
             FROM financiamentos WHERE aprovado = true",
        );
        if let Some(bank) = &self.bank {
            statement.push_bound(" AND banco_financiadora = {}", SqlParam::Text(bank.clone()));
        }
        statement.push(" ORDER BY taxa_juros_ano ASC LIMIT 1");
        statement
    }

    pub fn matches(&self, offer: &FinancingOffer) -> bool {
        offer.approved && self.bank.as_ref().is_none_or(|bank| offer.bank == *bank)
    }
}
