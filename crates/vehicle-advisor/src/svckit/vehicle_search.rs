//! Vehicle Search Tool
//!
//! Lists available vehicles with optional price, brand and type filters.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::json;

use agent_core::{Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema, tool::ParameterSchema};

use crate::catalog::CatalogStore;
use crate::format::format_vehicle_list;
use crate::query::{SortPreference, VehicleFilters, build_vehicle_query};

const NAME: &str = "get_vehicles_available";

/// Tool for searching the vehicle inventory
pub struct VehicleSearchTool {
    catalog: Arc<dyn CatalogStore>,
}

impl VehicleSearchTool {
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self { catalog }
    }
}

fn decimal_arg(call: &ToolCall, key: &str) -> Option<Decimal> {
    call.get_f64(key).and_then(|v| Decimal::try_from(v).ok())
}

fn filters_from(call: &ToolCall) -> VehicleFilters {
    VehicleFilters {
        max_price: decimal_arg(call, "max_price"),
        min_price: decimal_arg(call, "min_price"),
        brand: call.get_str("brand").map(String::from),
        body_type: call.get_str("type").map(String::from),
        sort: call.get_str("sort").and_then(SortPreference::parse),
    }
}

#[async_trait]
impl Tool for VehicleSearchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: NAME.into(),
            description: "Busca veículos disponíveis com filtros opcionais. Retorna até 3 veículos ordenados por preço.".into(),
            parameters: vec![
                ParameterSchema::optional("max_price", "number", "Preço máximo"),
                ParameterSchema::optional("min_price", "number", "Preço mínimo"),
                ParameterSchema::optional("brand", "string", "Marca do veículo"),
                ParameterSchema::optional("type", "string", "Tipo do veículo (Novo, Usado, Seminovo)")
                    .with_enum(vec![json!("Novo"), json!("Usado"), json!("Seminovo")]),
                ParameterSchema::optional("sort", "string", "Ordenação: 'cheap' ou 'expensive'")
                    .with_enum(vec![json!("cheap"), json!("expensive")]),
            ],
            category: Some("inventory".into()),
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let query = build_vehicle_query(&filters_from(call));

        match self.catalog.vehicles(&query).await {
            Ok(vehicles) => {
                let data = serde_json::to_value(&vehicles)?;
                Ok(ToolResult::success(NAME, format_vehicle_list(&vehicles)).with_data(data))
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

    fn tool() -> VehicleSearchTool {
        VehicleSearchTool::new(Arc::new(MemoryCatalogStore::demo()))
    }

    #[test]
    fn test_filters_from_arguments() {
        let call = ToolCall::new(NAME)
            .with_arg("max_price", json!(120000))
            .with_arg("brand", json!("  "))
            .with_arg("sort", json!("expensive"));
        let filters = filters_from(&call);
        assert_eq!(filters.max_price, Some(Decimal::from(120_000)));
        assert_eq!(filters.brand, None);
        assert_eq!(filters.sort, Some(SortPreference::Expensive));
    }

    #[tokio::test]
    async fn test_brand_filter() {
        let call = ToolCall::new(NAME).with_arg("brand", json!("honda"));
        let result = tool().execute(&call).await.unwrap();

        assert!(result.success);
        assert!(result.output.contains("Honda Civic LX 2.0 CVT"));
        let rows = result.data.unwrap();
        assert_eq!(rows.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_type_filter_and_no_match() {
        let used = ToolCall::new(NAME).with_arg("type", json!("Seminovo"));
        let result = tool().execute(&used).await.unwrap();
        assert!(result.output.contains("Hyundai HB20"));

        let none = ToolCall::new(NAME).with_arg("max_price", json!(1000));
        let result = tool().execute(&none).await.unwrap();
        assert!(result.success);
        assert!(result.output.contains("Nenhum veículo encontrado"));
    }

    #[tokio::test]
    async fn test_store_failure_is_reported() {
        let offline = VehicleSearchTool::new(Arc::new(MemoryCatalogStore::offline()));
        let result = offline.execute(&ToolCall::new(NAME)).await.unwrap();
        assert!(!result.success);
        assert_eq!(result.output, "❌ Conexão com base de dados indisponível");
    }
}
