//! Intent Classification
//!
//! Maps a customer message onto exactly one [`Intent`] by walking an ordered
//! list of keyword rules. The first rule whose predicate holds wins, so the
//! order of [`INTENT_RULES`] is part of the contract: a message that asks to
//! "simular" a named vehicle with "entrada" is a simulation even when it also
//! mentions "financiamento".

use serde::{Deserialize, Serialize};

use crate::extract::find_known_vehicle;

/// What the customer is asking for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    CheapVehicles,
    ExpensiveVehicles,
    SimulateNamedVehicle,
    SimulateGenericTerm,
    BestFinancing,
    TargetMonthlyPayment,
    Unrecognized,
}

impl Intent {
    /// Whether answering needs values pulled out of the message text
    pub const fn needs_parameters(self) -> bool {
        matches!(self, Self::SimulateNamedVehicle | Self::TargetMonthlyPayment)
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::CheapVehicles => "cheap_vehicles",
            Self::ExpensiveVehicles => "expensive_vehicles",
            Self::SimulateNamedVehicle => "simulate_named_vehicle",
            Self::SimulateGenericTerm => "simulate_generic_term",
            Self::BestFinancing => "best_financing",
            Self::TargetMonthlyPayment => "target_monthly_payment",
            Self::Unrecognized => "unrecognized",
        };
        f.write_str(name)
    }
}

const CHEAP_PHRASES: &[&str] = &[
    "carro barato",
    "carros baratos",
    "veículo barato",
    "veículos baratos",
];

const EXPENSIVE_PHRASES: &[&str] = &[
    "carro caro",
    "carros caros",
    "carro mais caro",
    "veículo caro",
    "veículos caros",
];

const FINANCING_PHRASES: &[&str] = &["financiamento", "melhor taxa", "banco"];

const CURRENCY_CUES: &[&str] = &["reais", "r$"];

/// A (predicate, intent) pair evaluated against the lowercased message
pub struct IntentRule {
    pub intent: Intent,
    matches: fn(&str) -> bool,
}

impl IntentRule {
    pub fn matches(&self, lowered: &str) -> bool {
        (self.matches)(lowered)
    }
}

fn contains_any(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| text.contains(phrase))
}

fn is_cheap(text: &str) -> bool {
    contains_any(text, CHEAP_PHRASES)
}

fn is_expensive(text: &str) -> bool {
    contains_any(text, EXPENSIVE_PHRASES)
}

fn is_named_simulation(text: &str) -> bool {
    text.contains("simular") && find_known_vehicle(text).is_some() && text.contains("entrada")
}

fn is_generic_simulation(text: &str) -> bool {
    text.contains("simular") && text.contains("60")
}

fn is_financing(text: &str) -> bool {
    contains_any(text, FINANCING_PHRASES)
}

fn is_target_payment(text: &str) -> bool {
    text.contains("parcela") && contains_any(text, CURRENCY_CUES)
}

/// Priority-ordered rules; evaluation stops at the first match
pub const INTENT_RULES: &[IntentRule] = &[
    IntentRule { intent: Intent::CheapVehicles, matches: is_cheap },
    IntentRule { intent: Intent::ExpensiveVehicles, matches: is_expensive },
    IntentRule { intent: Intent::SimulateNamedVehicle, matches: is_named_simulation },
    IntentRule { intent: Intent::SimulateGenericTerm, matches: is_generic_simulation },
    IntentRule { intent: Intent::BestFinancing, matches: is_financing },
    IntentRule { intent: Intent::TargetMonthlyPayment, matches: is_target_payment },
];

/// Classify a raw message
pub fn classify(message: &str) -> Intent {
    classify_lowered(&message.to_lowercase())
}

/// Classify a message that is already lowercase
pub fn classify_lowered(lowered: &str) -> Intent {
    INTENT_RULES
        .iter()
        .find(|rule| rule.matches(lowered))
        .map_or(Intent::Unrecognized, |rule| rule.intent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cheap_phrases() {
        assert_eq!(classify("Quero um carro barato"), Intent::CheapVehicles);
        assert_eq!(classify("VEÍCULOS BARATOS disponíveis?"), Intent::CheapVehicles);
    }

    #[test]
    fn test_expensive_phrases() {
        assert_eq!(classify("Qual o carro mais caro?"), Intent::ExpensiveVehicles);
        assert_eq!(classify("mostre veículos caros"), Intent::ExpensiveVehicles);
    }

    #[test]
    fn test_cheap_wins_over_expensive() {
        assert_eq!(
            classify("carro barato ou carro caro, tanto faz"),
            Intent::CheapVehicles
        );
    }

    #[test]
    fn test_named_simulation_needs_all_three_cues() {
        assert_eq!(
            classify("Simular Fiat Argo com entrada de R$ 20.000 em 48x"),
            Intent::SimulateNamedVehicle
        );
        // no "entrada" and no "60": falls through to financing
        assert_eq!(
            classify("simular financiamento do fiat argo"),
            Intent::BestFinancing
        );
    }

    #[test]
    fn test_simulation_beats_financing() {
        assert_eq!(
            classify("simular financiamento do toyota corolla com entrada de 30000"),
            Intent::SimulateNamedVehicle
        );
        assert_eq!(
            classify("simular financiamento em 60 parcelas"),
            Intent::SimulateGenericTerm
        );
    }

    #[test]
    fn test_financing_phrases() {
        assert_eq!(classify("Qual banco tem a melhor taxa?"), Intent::BestFinancing);
    }

    #[test]
    fn test_target_payment_needs_currency_cue() {
        assert_eq!(
            classify("Quero uma parcela de R$ 1.500 no Honda Civic"),
            Intent::TargetMonthlyPayment
        );
        assert_eq!(
            classify("parcela de 900 reais"),
            Intent::TargetMonthlyPayment
        );
        assert_eq!(classify("quero uma parcela baixa"), Intent::Unrecognized);
    }

    #[test]
    fn test_unrecognized() {
        assert_eq!(classify("bom dia!"), Intent::Unrecognized);
        assert_eq!(classify(""), Intent::Unrecognized);
    }

    #[test]
    fn test_needs_parameters() {
        assert!(Intent::SimulateNamedVehicle.needs_parameters());
        assert!(Intent::TargetMonthlyPayment.needs_parameters());
        assert!(!Intent::CheapVehicles.needs_parameters());
    }
}
