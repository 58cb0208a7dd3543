//! # vehicle-advisor
//!
//! Conversational advisor for a car dealership. Answers free-text questions
//! (in Portuguese) about the vehicle inventory and loan financing using a
//! read-only catalog.
//!
//! ## Pipeline
//!
//! ```text
//! ┌───────────┐   ┌───────────┐   ┌─────────────┐   ┌──────────────┐   ┌───────────┐
//! │  intent   │──▶│  extract  │──▶│    query    │──▶│ amortization │──▶│  format   │
//! │ classify  │   │ parameters│   │  (catalog)  │   │  (Price)     │   │  answer   │
//! └───────────┘   └───────────┘   └─────────────┘   └──────────────┘   └───────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! let engine = ChatEngine::new(Arc::new(MemoryCatalogStore::demo()));
//! let text = engine.answer("Simular Fiat Argo com entrada de R$ 20.000 em 48x").await;
//! ```

pub mod amortization;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod extract;
pub mod format;
pub mod intent;
pub mod model;
pub mod query;
pub mod svckit;

use std::sync::Arc;

use agent_core::ToolRegistry;

pub use catalog::{CatalogConfig, CatalogStore, MemoryCatalogStore, PgCatalogStore};
pub use engine::{ChatEngine, GenerativeFallback};
pub use error::{AdvisorError, Result};
pub use extract::ExtractedParameters;
pub use intent::{Intent, classify};
pub use model::{FinancingOffer, FinancingQuote, RateQuote, VehicleRecord};

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::svckit::{BestFinancingTool, FinancingCalculatorTool, VehicleSearchTool};
}

/// Register every catalog tool against one store
pub fn register_tools(registry: &mut ToolRegistry, catalog: &Arc<dyn CatalogStore>) {
    registry.register(tools::VehicleSearchTool::new(Arc::clone(catalog)));
    registry.register(tools::BestFinancingTool::new(Arc::clone(catalog)));
    registry.register(tools::FinancingCalculatorTool::new(Arc::clone(catalog)));
}

/// System prompt for the generative fallback
pub const ADVISOR_SYSTEM_PROMPT: &str = r"🚗 CONSULTOR DE VENDAS AUTOMOTIVAS

Você é um consultor especializado em vendas de veículos com acesso à base de dados da concessionária.

REGRAS:
1. ✅ Responda apenas sobre veículos, financiamento e a concessionária
2. ✅ Para carros baratos ou caros, oriente o cliente a perguntar 'carro barato' ou 'carro mais caro'
3. ✅ Para simulações, peça modelo, entrada e número de parcelas (ex.: 'simular Fiat Argo com entrada de R$ 20.000 em 48x')
4. ✅ Para taxas, oriente o cliente a perguntar sobre 'financiamento'
5. ❌ NUNCA invente preços, taxas ou disponibilidade de veículos

FORMATO DE RESPOSTA:
💡 Responda em português, de forma curta e cordial.
❓ Seja proativo oferecendo simulações e mais informações.";
