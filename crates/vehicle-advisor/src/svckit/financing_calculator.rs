//! Financing Calculator Tool
//!
//! Fixed-payment loan simulation at the best approved rate, optionally for a
//! single bank.

use std::sync::Arc;

use async_trait::async_trait;

use agent_core::{Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema, tool::ParameterSchema};

use crate::amortization::compute_installment;
use crate::catalog::CatalogStore;
use crate::error::{AdvisorError, Result};
use crate::extract::DEFAULT_DOWN_PAYMENT;
use crate::format::format_installment_quote;
use crate::model::FinancingQuote;
use crate::query::LowestRateQuery;

const NAME: &str = "calculate_financing";

/// Tool for simulating installments
pub struct FinancingCalculatorTool {
    catalog: Arc<dyn CatalogStore>,
}

impl FinancingCalculatorTool {
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self { catalog }
    }

    async fn quote(&self, call: &ToolCall) -> Result<FinancingQuote> {
        let price = call
            .get_f64("vehicle_price")
            .filter(|p| *p > 0.0)
            .ok_or_else(|| AdvisorError::InvalidParameter("vehicle_price deve ser positivo".into()))?;
        let installments = call
            .get_f64("installments")
            .ok_or_else(|| AdvisorError::InvalidParameter("installments deve ser numérico".into()))?
            .round();
        let down_payment = call.get_f64("down_payment").unwrap_or(DEFAULT_DOWN_PAYMENT);

        if down_payment < 0.0 || down_payment >= price {
            return Err(AdvisorError::InvalidParameter(format!(
                "down_payment deve estar entre 0 e o valor do veículo (recebido {down_payment})"
            )));
        }

        let bank = call.get_str("bank");
        let rate = self
            .catalog
            .lowest_rate(&LowestRateQuery::for_bank(bank))
            .await?
            .ok_or_else(|| match bank {
                Some(bank) => AdvisorError::NotFound(format!("financiamento aprovado do banco {bank}")),
                None => AdvisorError::NotFound("opções de financiamento aprovadas".into()),
            })?;

        Ok(compute_installment(price, down_payment, installments, rate.annual_fraction())?.with_bank(rate.bank))
    }
}

#[async_trait]
impl Tool for FinancingCalculatorTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: NAME.into(),
            description: "Calcula financiamento com simulação detalhada: parcela, total pago e juros pela menor taxa aprovada.".into(),
            parameters: vec![
                ParameterSchema::required("vehicle_price", "number", "Preço do veículo"),
                ParameterSchema::required("installments", "number", "Número de parcelas"),
                ParameterSchema::optional("down_payment", "number", "Valor da entrada")
                    .with_default(serde_json::json!(0)),
                ParameterSchema::optional("bank", "string", "Banco para financiamento"),
            ],
            category: Some("financing".into()),
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        match self.quote(call).await {
            Ok(quote) => {
                let data = serde_json::to_value(&quote)?;
                Ok(ToolResult::success(NAME, format_installment_quote(None, &quote)).with_data(data))
            }
            Err(e) => Ok(ToolResult::failure(NAME, e.user_message())),
        }
    }
}
