//! Chat Engine
//!
//! Answers one customer message: classify, extract what the intent needs,
//! look the catalog up, run the amortization math and render the reply.
//! Every failure is turned into customer-facing text here, so callers
//! always get a non-empty answer.
//!
//! ```text
//! message ─▶ classify ─▶ extract ─▶ catalog lookups ─▶ amortization ─▶ render
//!                │
//!                └─ unrecognized ─▶ generative fallback | help text
//! ```

use std::sync::Arc;
use std::time::Duration;

use agent_core::{GenerationOptions, LlmProvider, Message, ToolRegistry};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::{debug, warn};

use crate::ADVISOR_SYSTEM_PROMPT;
use crate::amortization::{compute_installment, compute_required_down_payment};
use crate::catalog::CatalogStore;
use crate::error::{AdvisorError, Result};
use crate::extract::ExtractedParameters;
use crate::format::Answer;
use crate::intent::{Intent, classify};
use crate::model::RateQuote;
use crate::query::{
    FinancingFilters, LowestRateQuery, NearestPriceQuery, VehicleFilters, VehiclePriceQuery,
    build_financing_query, build_vehicle_query,
};

/// Reply used when the request deadline elapses
pub const TIMEOUT_MESSAGE: &str =
    "❌ A consulta demorou mais que o esperado. Por favor, tente novamente em instantes.";

/// Vehicle name shown when the target-payment question names no vehicle
const GENERIC_VEHICLE_NAME: &str = "Veículo da nossa base";

/// Free-text answers for messages no rule recognises
pub struct GenerativeFallback {
    provider: Arc<dyn LlmProvider>,
    options: GenerationOptions,
    system_prompt: String,
}

impl GenerativeFallback {
    /// System prompt is the advisor prompt plus the tool catalog
    pub fn new(provider: Arc<dyn LlmProvider>, options: GenerationOptions, tools: &ToolRegistry) -> Self {
        let system_prompt = if tools.is_empty() {
            ADVISOR_SYSTEM_PROMPT.to_string()
        } else {
            format!("{ADVISOR_SYSTEM_PROMPT}\n\n{}", tools.generate_prompt_section())
        };

        Self { provider, options, system_prompt }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Generated reply, or `None` when the provider fails or returns nothing
    async fn generate(&self, message: &str) -> Option<String> {
        let messages = [Message::system(self.system_prompt.clone()), Message::user(message)];

        match self.provider.complete(&messages, &self.options).await {
            Ok(completion) => {
                let text = completion.content.trim();
                if text.is_empty() {
                    warn!(provider = self.provider.name(), "Empty completion, using help text");
                    None
                } else {
                    Some(text.to_string())
                }
            }
            Err(e) => {
                warn!(
                    provider = self.provider.name(),
                    retryable = e.is_retryable(),
                    "Generative fallback failed: {}",
                    e
                );
                None
            }
        }
    }
}

/// Conversational query engine
pub struct ChatEngine {
    catalog: Arc<dyn CatalogStore>,
    fallback: Option<GenerativeFallback>,
}

impl ChatEngine {
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self { catalog, fallback: None }
    }

    /// Route unrecognized messages to a generative model
    #[must_use]
    pub fn with_fallback(mut self, fallback: GenerativeFallback) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn catalog(&self) -> &Arc<dyn CatalogStore> {
        &self.catalog
    }

    pub const fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Answer a message. Never empty.
    pub async fn answer(&self, message: &str) -> String {
        let intent = classify(message);
        debug!(%intent, "Classified message");

        match self.dispatch(intent, message).await {
            Ok(text) => text,
            Err(err) => {
                if err.is_store_failure() {
                    warn!(%intent, catalog = self.catalog.name(), "Catalog lookup failed: {}", err);
                } else {
                    debug!(%intent, "Answering with guidance: {}", err);
                }
                err.user_message()
            }
        }
    }

    /// Answer within `deadline`; elapsing drops every in-flight lookup
    pub async fn answer_within(&self, message: &str, deadline: Duration) -> String {
        if let Ok(text) = tokio::time::timeout(deadline, self.answer(message)).await {
            text
        } else {
            warn!(?deadline, "Request deadline elapsed");
            TIMEOUT_MESSAGE.to_string()
        }
    }

    async fn dispatch(&self, intent: Intent, message: &str) -> Result<String> {
        let params = if intent.needs_parameters() {
            let params = ExtractedParameters::from_message(message);
            debug!(?params, "Extracted parameters");
            params
        } else {
            ExtractedParameters::default()
        };

        let answer = match intent {
            Intent::CheapVehicles => self.vehicles(&VehicleFilters::cheap()).await?,
            Intent::ExpensiveVehicles => self.vehicles(&VehicleFilters::expensive()).await?,
            Intent::SimulateNamedVehicle => self.simulate_named_vehicle(&params).await?,
            Intent::SimulateGenericTerm => self.simulate_generic_term().await?,
            Intent::BestFinancing => {
                let query = build_financing_query(&FinancingFilters::default());
                Answer::Offers(self.catalog.financing_offers(&query).await?)
            }
            Intent::TargetMonthlyPayment => self.required_down_payment(&params).await?,
            Intent::Unrecognized => return Ok(self.unrecognized(message).await),
        };

        Ok(answer.render())
    }

    async fn vehicles(&self, filters: &VehicleFilters) -> Result<Answer> {
        let query = build_vehicle_query(filters);
        Ok(Answer::Vehicles(self.catalog.vehicles(&query).await?))
    }

    async fn simulate_named_vehicle(&self, params: &ExtractedParameters) -> Result<Answer> {
        let vehicle = params.vehicle.ok_or_else(|| AdvisorError::MissingParameter {
            name: "o veículo".into(),
            example: "simular Fiat Argo com entrada de R$ 20.000 em 48x".into(),
        })?;

        let price = self
            .catalog
            .vehicle_price(&VehiclePriceQuery::new(vehicle.brand, vehicle.model))
            .await?
            .ok_or_else(|| AdvisorError::NotFound(format!("o veículo {}", vehicle.display_name)))?;

        self.simulate(price, params.down_payment_or_default(), params.installments_or_default())
            .await
    }

    async fn simulate_generic_term(&self) -> Result<Answer> {
        let price = self.average_price().await?;
        self.simulate(price, 0.0, 60).await
    }

    /// Forward quote at the best approved rate, with the closest-priced vehicle
    async fn simulate(&self, price: Decimal, down_payment: f64, installments: u32) -> Result<Answer> {
        let price_value = to_f64(price)?;
        if down_payment >= price_value {
            return Err(AdvisorError::InvalidParameter(format!(
                "a entrada de R$ {down_payment:.2} cobre todo o valor do veículo (R$ {price_value:.2})"
            )));
        }

        let vehicle = self.catalog.nearest_vehicle(&NearestPriceQuery::new(price)).await?;
        let rate = self.best_rate().await?;

        let quote = compute_installment(
            price_value,
            down_payment,
            f64::from(installments),
            rate.annual_fraction(),
        )?
        .with_bank(rate.bank);

        Ok(Answer::Installment { vehicle, quote })
    }

    async fn required_down_payment(&self, params: &ExtractedParameters) -> Result<Answer> {
        let target = params.target_monthly_payment.ok_or_else(|| AdvisorError::MissingParameter {
            name: "o valor da parcela desejada".into(),
            example: "parcela de R$ 1.000".into(),
        })?;

        let (price, vehicle_name) = match params.vehicle {
            Some(vehicle) => {
                let price = self
                    .catalog
                    .vehicle_price(&VehiclePriceQuery::new(vehicle.brand, vehicle.model))
                    .await?
                    .ok_or_else(|| {
                        AdvisorError::NotFound(format!("o veículo {}", vehicle.display_name))
                    })?;
                (price, vehicle.display_name.to_string())
            }
            None => (self.average_price().await?, GENERIC_VEHICLE_NAME.to_string()),
        };

        let rate = self.best_rate().await?;
        let quote = compute_required_down_payment(
            to_f64(price)?,
            target,
            f64::from(params.installments_or_default()),
            rate.annual_fraction(),
        )?
        .with_bank(rate.bank);

        Ok(Answer::RequiredDownPayment { vehicle_name, quote })
    }

    async fn average_price(&self) -> Result<Decimal> {
        self.catalog
            .average_price()
            .await?
            .ok_or_else(|| AdvisorError::NotFound("veículos disponíveis".into()))
    }

    async fn best_rate(&self) -> Result<RateQuote> {
        self.catalog
            .lowest_rate(&LowestRateQuery::default())
            .await?
            .ok_or_else(|| AdvisorError::NotFound("opções de financiamento aprovadas".into()))
    }

    async fn unrecognized(&self, message: &str) -> String {
        if let Some(fallback) = &self.fallback {
            if let Some(text) = fallback.generate(message).await {
                return text;
            }
        }
        Answer::Help.render()
    }
}

fn to_f64(value: Decimal) -> Result<f64> {
    value
        .to_f64()
        .ok_or_else(|| AdvisorError::InvalidParameter(format!("valor fora do intervalo: {value}")))
}
