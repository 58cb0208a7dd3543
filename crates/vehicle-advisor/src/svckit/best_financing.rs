//! Best Financing Tool
//!
//! Lists the approved financing offers with the lowest monthly rates.

use std::sync::Arc;

use async_trait::async_trait;

use agent_core::{Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema, tool::ParameterSchema};

use crate::catalog::CatalogStore;
use crate::format::format_financing_offers;
use crate::query::{FinancingFilters, build_financing_query};

const NAME: &str = "get_best_financing";

/// Tool for finding the cheapest financing offers
pub struct BestFinancingTool {
    catalog: Arc<dyn CatalogStore>,
}

impl BestFinancingTool {
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self { catalog }
    }
}

/// Whole installment cap; floats and numeric strings are accepted
fn max_installments(call: &ToolCall) -> Option<i32> {
    let value = call.get_f64("max_installments")?.round();
    if value.is_finite() && value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX) {
        #[allow(clippy::cast_possible_truncation)]
        let cap = value as i32;
        Some(cap)
    } else {
        None
    }
}

#[async_trait]
impl Tool for BestFinancingTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: NAME.into(),
            description: "Busca as melhores opções de financiamento aprovadas, da menor taxa mensal para a maior.".into(),
            parameters: vec![
                ParameterSchema::optional("max_installments", "integer", "Número máximo de parcelas"),
                ParameterSchema::optional("type", "string", "Tipo de financiamento (CDC, Leasing, Consórcio)"),
            ],
            category: Some("financing".into()),
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let filters = FinancingFilters {
            max_installments: max_installments(call),
            offer_type: call.get_str("type").map(String::from),
        };

        match self.catalog.financing_offers(&build_financing_query(&filters)).await {
            Ok(offers) => {
                let data = serde_json::to_value(&offers)?;
                Ok(ToolResult::success(NAME, format_financing_offers(&offers)).with_data(data))
            }
            Err(e) => {
                tracing::warn!(tool = NAME, "Catalog lookup failed: {}", e);
                Ok(ToolResult::failure(NAME, e.user_message()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalogStore;
    use serde_json::json;

    fn tool() -> BestFinancingTool {
        BestFinancingTool::new(Arc::new(MemoryCatalogStore::demo()))
    }

    #[tokio::test]
    async fn test_lowest_rates_first() {
        let result = tool().execute(&ToolCall::new(NAME)).await.unwrap();
        assert!(result.success);

        let itau = result.output.find("Itaú Unibanco").unwrap();
        let bb = result.output.find("Banco do Brasil").unwrap();
        assert!(itau < bb);
    }

    #[tokio::test]
    async fn test_filters() {
        let call = ToolCall::new(NAME)
            .with_arg("max_installments", json!(40))
            .with_arg("type", json!("Leasing"));
        let result = tool().execute(&call).await.unwrap();

        let offers = result.data.unwrap();
        let offers = offers.as_array().unwrap();
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0]["bank"], "Santander");
    }

    #[tokio::test]
    async fn test_max_installments_accepts_float_and_string() {
        for cap in [json!(40.0), json!("40")] {
            let call = ToolCall::new(NAME).with_arg("max_installments", cap);
            let result = tool().execute(&call).await.unwrap();

            let offers = result.data.unwrap();
            let offers = offers.as_array().unwrap();
            assert_eq!(offers.len(), 1);
            assert_eq!(offers[0]["bank"], "Santander");
        }
    }

    #[tokio::test]
    async fn test_no_offers() {
        let call = ToolCall::new(NAME).with_arg("type", json!("Consórcio"));
        let result = tool().execute(&call).await.unwrap();
        assert_eq!(result.output, "❌ Nenhuma opção de financiamento encontrada.");
    }
}
