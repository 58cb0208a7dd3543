//! Parameter Extraction
//!
//! Pulls down payment, installment count, target monthly payment and a named
//! vehicle out of free text. Amounts follow the Brazilian convention: '.'
//! groups thousands and ',' separates decimals ("R$ 15.000,50").
//!
//! Each field has an ordered list of compiled patterns. The first pattern
//! whose capture parses and falls inside the accepted range wins; an
//! out-of-range capture moves on to the next pattern.

use std::ops::RangeInclusive;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Accepted down payment range (BRL)
pub const DOWN_PAYMENT_RANGE: RangeInclusive<f64> = 1_000.0..=1_000_000.0;

/// Accepted installment count range
pub const INSTALLMENT_RANGE: RangeInclusive<f64> = 12.0..=84.0;

/// Accepted target monthly payment range (BRL)
pub const TARGET_PAYMENT_RANGE: RangeInclusive<f64> = 200.0..=5_000.0;

/// Installment count used when none is found in the message
pub const DEFAULT_INSTALLMENTS: u32 = 60;

/// Down payment used when none is found in the message
pub const DEFAULT_DOWN_PAYMENT: f64 = 0.0;

/// Brazilian-formatted amount: 15000 | 15.000 | 15.000,50
const AMOUNT: &str = r"([0-9]+(?:\.[0-9]{3})*(?:,[0-9]{2})?)";

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(&p.replace("{amount}", AMOUNT)).expect("static pattern compiles"))
        .collect()
}

static DOWN_PAYMENT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"entrada\s+(?:de\s+)?r?\$?\s*{amount}",
        r"entrada\s+(?:de\s+)?([0-9]+\.?[0-9]*)",
        r"{amount}\s+reais?\s+(?:de\s+)?entrada",
        r"r?\$\s*{amount}\s+(?:de\s+)?entrada",
    ])
});

static INSTALLMENT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(\d+)x",
        r"em\s+(\d+)x",
        r"(\d+)\s+parcelas?",
        r"(\d+)\s+vezes?",
    ])
});

static TARGET_PAYMENT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"parcela\s+(?:de\s+)?r?\$?\s*{amount}",
        r"{amount}\s+reais?\s+(?:de\s+)?parcela",
        r"r?\$\s*{amount}\s+(?:de\s+)?parcela",
    ])
});

/// A vehicle the advisor recognises by name
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct KnownVehicle {
    /// Lowercase phrase searched for in the message
    pub phrase: &'static str,
    pub brand: &'static str,
    pub model: &'static str,
    /// Full commercial name shown in answers
    pub display_name: &'static str,
}

/// Lookup table of named vehicles, in match priority order
pub const KNOWN_VEHICLES: &[KnownVehicle] = &[
    KnownVehicle {
        phrase: "chevrolet onix",
        brand: "Chevrolet",
        model: "Onix",
        display_name: "Chevrolet Onix LT 1.0 Turbo",
    },
    KnownVehicle {
        phrase: "fiat argo",
        brand: "Fiat",
        model: "Argo",
        display_name: "Fiat Argo Drive 1.3",
    },
    KnownVehicle {
        phrase: "honda civic",
        brand: "Honda",
        model: "Civic",
        display_name: "Honda Civic LX 2.0 CVT",
    },
    KnownVehicle {
        phrase: "toyota corolla",
        brand: "Toyota",
        model: "Corolla",
        display_name: "Toyota Corolla GLI 1.8 CVT",
    },
];

/// Typed parameters found in one message
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ExtractedParameters {
    pub down_payment: Option<f64>,
    pub installment_count: Option<u32>,
    pub target_monthly_payment: Option<f64>,
    pub vehicle: Option<KnownVehicle>,
}

impl ExtractedParameters {
    /// Run every extractor over a message
    pub fn from_message(message: &str) -> Self {
        let lowered = message.to_lowercase();
        Self {
            down_payment: extract_down_payment(&lowered),
            installment_count: extract_installment_count(&lowered),
            target_monthly_payment: extract_target_payment(&lowered),
            vehicle: find_known_vehicle(&lowered),
        }
    }

    /// Down payment, or 0 when absent
    pub fn down_payment_or_default(&self) -> f64 {
        self.down_payment.unwrap_or(DEFAULT_DOWN_PAYMENT)
    }

    /// Installment count, or 60 when absent
    pub fn installments_or_default(&self) -> u32 {
        self.installment_count.unwrap_or(DEFAULT_INSTALLMENTS)
    }

    pub fn vehicle_brand(&self) -> Option<&'static str> {
        self.vehicle.map(|v| v.brand)
    }

    pub fn vehicle_model(&self) -> Option<&'static str> {
        self.vehicle.map(|v| v.model)
    }
}

/// Parse a Brazilian-formatted number ("15.000,50" -> 15000.50)
pub fn parse_brl_number(raw: &str) -> Option<f64> {
    let normalized = raw.replace('.', "").replace(',', ".");
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn first_amount_in_range(
    text: &str,
    patterns: &[Regex],
    range: &RangeInclusive<f64>,
) -> Option<f64> {
    patterns.iter().find_map(|pattern| {
        let raw = pattern.captures(text)?.get(1)?.as_str();
        parse_brl_number(raw).filter(|value| range.contains(value))
    })
}

/// Down payment amount, if one in [1 000, 1 000 000] is present
pub fn extract_down_payment(message: &str) -> Option<f64> {
    let lowered = message.to_lowercase();
    first_amount_in_range(&lowered, &DOWN_PAYMENT_PATTERNS, &DOWN_PAYMENT_RANGE)
}

/// Installment count, if one in [12, 84] is present
pub fn extract_installment_count(message: &str) -> Option<u32> {
    let lowered = message.to_lowercase();
    INSTALLMENT_PATTERNS.iter().find_map(|pattern| {
        let count = pattern.captures(&lowered)?.get(1)?.as_str().parse::<u32>().ok()?;
        INSTALLMENT_RANGE.contains(&f64::from(count)).then_some(count)
    })
}

/// Installment count with the 60-installment default applied
pub fn extract_installments(message: &str) -> u32 {
    extract_installment_count(message).unwrap_or(DEFAULT_INSTALLMENTS)
}

/// Target monthly payment, if one in [200, 5 000] is present
pub fn extract_target_payment(message: &str) -> Option<f64> {
    let lowered = message.to_lowercase();
    first_amount_in_range(&lowered, &TARGET_PAYMENT_PATTERNS, &TARGET_PAYMENT_RANGE)
}

/// First known vehicle named in the message
pub fn find_known_vehicle(message: &str) -> Option<KnownVehicle> {
    let lowered = message.to_lowercase();
    KNOWN_VEHICLES
        .iter()
        .find(|vehicle| lowered.contains(vehicle.phrase))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_parse_brl_number() {
        assert!(approx(parse_brl_number("15.000,50").unwrap(), 15000.50));
        assert!(approx(parse_brl_number("1.000.000").unwrap(), 1_000_000.0));
        assert!(approx(parse_brl_number("900").unwrap(), 900.0));
        assert!(parse_brl_number("").is_none());
    }

    #[test]
    fn test_down_payment_currency_first() {
        let value = extract_down_payment("entrada de R$ 15.000,50").unwrap();
        assert!(approx(value, 15000.50));
    }

    #[test]
    fn test_down_payment_trailing_form() {
        let value = extract_down_payment("tenho r$ 20.000 de entrada").unwrap();
        assert!(approx(value, 20000.0));
    }

    #[test]
    fn test_down_payment_in_reais() {
        let value = extract_down_payment("simular fiat argo com 20.000 reais de entrada em 48x").unwrap();
        assert!(approx(value, 20000.0));
        let value = extract_down_payment("dou 15000 reais entrada").unwrap();
        assert!(approx(value, 15000.0));
    }

    #[test]
    fn test_down_payment_out_of_range_is_absent() {
        assert_eq!(extract_down_payment("entrada de R$ 500"), None);
        assert_eq!(extract_down_payment("entrada de R$ 2.000.000"), None);
        assert_eq!(extract_down_payment("sem entrada"), None);
    }

    #[test]
    fn test_installments() {
        assert_eq!(extract_installment_count("em 48x"), Some(48));
        assert_eq!(extract_installment_count("36 parcelas"), Some(36));
        assert_eq!(extract_installment_count("pagar em 24 vezes"), Some(24));
    }

    #[test]
    fn test_installments_default() {
        assert_eq!(extract_installments("simular 60"), 60);
        assert_eq!(extract_installment_count("200x"), None);
        assert_eq!(extract_installments("200x"), DEFAULT_INSTALLMENTS);
        assert_eq!(extract_installments("em 6x"), DEFAULT_INSTALLMENTS);
    }

    #[test]
    fn test_installments_skip_invalid_capture() {
        // first pattern captures 200, a later one finds 48
        assert_eq!(extract_installment_count("200x não, quero 48 parcelas"), Some(48));
    }

    #[test]
    fn test_target_payment() {
        assert!(approx(extract_target_payment("parcela de R$ 1.500").unwrap(), 1500.0));
        assert!(approx(extract_target_payment("900 reais de parcela").unwrap(), 900.0));
        assert!(approx(extract_target_payment("R$ 2.300,00 de parcela").unwrap(), 2300.0));
        assert_eq!(extract_target_payment("parcela de R$ 100"), None);
        assert_eq!(extract_target_payment("parcela de R$ 9.000"), None);
    }

    #[test]
    fn test_known_vehicle_priority() {
        let vehicle = find_known_vehicle("Chevrolet Onix ou Fiat Argo?").unwrap();
        assert_eq!(vehicle.brand, "Chevrolet");
        assert!(find_known_vehicle("Jeep Compass").is_none());
    }

    #[test]
    fn test_from_message() {
        let params = ExtractedParameters::from_message(
            "Simular Fiat Argo com entrada de R$ 20.000 em 48x",
        );
        assert_eq!(params.vehicle_brand(), Some("Fiat"));
        assert_eq!(params.vehicle_model(), Some("Argo"));
        assert!(approx(params.down_payment_or_default(), 20000.0));
        assert_eq!(params.installments_or_default(), 48);
        assert_eq!(params.target_monthly_payment, None);
    }

    #[test]
    fn test_defaults_when_absent() {
        let params = ExtractedParameters::from_message("simular fiat argo com entrada");
        assert!(approx(params.down_payment_or_default(), 0.0));
        assert_eq!(params.installments_or_default(), 60);
    }
}
