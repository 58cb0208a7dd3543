//! Service Kit - Agent Tools
//!
//! Catalog tools that implement `agent_core::Tool` for the vehicle advisor.

mod best_financing;
mod financing_calculator;
mod vehicle_search;

pub use best_financing::BestFinancingTool;
pub use financing_calculator::FinancingCalculatorTool;
pub use vehicle_search::VehicleSearchTool;
