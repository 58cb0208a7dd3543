//! Response Formatting
//!
//! Renders lookup rows and quotes into the chat answer. Sections always come
//! out in the same order: vehicle identity, then price, consumption, power
//! and tax, then the financing figures. Currency uses two decimals and fuel
//! consumption one.

use std::fmt::Write;

use crate::model::{FinancingOffer, FinancingQuote, VehicleRecord};

pub const NO_VEHICLES_FOUND: &str = "❌ Nenhum veículo encontrado com os critérios especificados.";

pub const NO_FINANCING_FOUND: &str = "❌ Nenhuma opção de financiamento encontrada.";

pub const HELP_MESSAGE: &str = r#"💡 **Olá! Sou seu consultor automotivo com acesso à nossa base de dados exclusiva.**

🔍 **Posso te ajudar com:**
• "carro barato" - veículos até R$ 100.000
• "carro mais caro" - veículos premium
• "simular [modelo] com entrada de R$ [valor] em [parcelas]x"
• "parcela de R$ [valor] no [modelo]" - entrada necessária para a parcela desejada
• "financiamento" - melhores taxas disponíveis

📊 **Todas as informações são baseadas em dados reais da nossa concessionária:**
✅ Preços atualizados dos veículos
✅ Taxas de financiamento dos bancos parceiros
✅ Especificações técnicas completas
✅ Custos de IPVA

❓ **Como posso te ajudar hoje?**"#;

/// Everything an answer can be built from
#[derive(Clone, Debug, PartialEq)]
pub enum Answer {
    /// Vehicle list (cheap or expensive)
    Vehicles(Vec<VehicleRecord>),

    /// Best financing offers
    Offers(Vec<FinancingOffer>),

    /// Forward simulation, with the vehicle closest to the simulated price
    Installment {
        vehicle: Option<VehicleRecord>,
        quote: FinancingQuote,
    },

    /// Down payment needed for a target monthly payment
    RequiredDownPayment {
        vehicle_name: String,
        quote: FinancingQuote,
    },

    Help,
}

impl Answer {
    pub fn render(&self) -> String {
        match self {
            Self::Vehicles(rows) => format_vehicle_list(rows),
            Self::Offers(rows) => format_financing_offers(rows),
            Self::Installment { vehicle, quote } => format_installment_quote(vehicle.as_ref(), quote),
            Self::RequiredDownPayment { vehicle_name, quote } => {
                format_down_payment_quote(vehicle_name, quote)
            }
            Self::Help => HELP_MESSAGE.to_string(),
        }
    }
}

fn push_vehicle_block(out: &mut String, vehicle: &VehicleRecord) {
    let _ = writeln!(out, "🚘 **{} ({})**", vehicle.display_name(), vehicle.color);
    let _ = writeln!(out, "📅 Ano: {} | {}", vehicle.model_year, vehicle.body_type);
    let _ = writeln!(out, "⛽ Combustível: {}", vehicle.fuel_type);
    let _ = writeln!(out, "💰 Preço: R$ {:.2}", vehicle.price);
    let _ = writeln!(
        out,
        "⛽ Consumo: {:.1} (cidade) / {:.1} (estrada) km/l",
        vehicle.urban_consumption, vehicle.highway_consumption
    );
    let _ = writeln!(out, "⚡ Potência: {} cv", vehicle.horsepower);
    let _ = writeln!(out, "🏛️ IPVA anual: R$ {:.2}", vehicle.annual_tax);
}

/// Vehicle list answer; an empty list yields [`NO_VEHICLES_FOUND`]
pub fn format_vehicle_list(vehicles: &[VehicleRecord]) -> String {
    if vehicles.is_empty() {
        return NO_VEHICLES_FOUND.to_string();
    }

    let mut out = String::from("💡 **Baseado em nossa base de dados:**\n\n");
    for vehicle in vehicles {
        push_vehicle_block(&mut out, vehicle);
        out.push('\n');
    }
    out.push_str("❓ Gostaria de simular o financiamento para algum desses veículos? Informe o prazo desejado!");
    out
}

/// Financing offers answer; an empty list yields [`NO_FINANCING_FOUND`]
pub fn format_financing_offers(offers: &[FinancingOffer]) -> String {
    if offers.is_empty() {
        return NO_FINANCING_FOUND.to_string();
    }

    let mut out = String::from("💡 **Melhores opções de financiamento:**\n\n");
    for offer in offers {
        let _ = writeln!(out, "🏦 **{} - {}**", offer.bank, offer.offer_type);
        let _ = writeln!(
            out,
            "💸 Taxa: {:.2}% ao mês / {:.2}% ao ano",
            offer.monthly_rate, offer.annual_rate
        );
        let _ = writeln!(out, "📅 Parcelas: {}", offer.installment_count);
        let _ = writeln!(out, "💰 Entrada: R$ {:.2}", offer.down_payment);
        let _ = writeln!(out, "💰 Valor parcela: R$ {:.2}", offer.installment_value);
        let _ = writeln!(out, "💵 Valor total: R$ {:.2}", offer.total_value);
        if !offer.notes.trim().is_empty() {
            let _ = writeln!(out, "📝 {}", offer.notes.trim());
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

fn push_rate_lines(out: &mut String, quote: &FinancingQuote, rate_label: &str) {
    if let Some(bank) = &quote.bank {
        let _ = writeln!(out, "🏦 **Banco com melhor taxa: {bank}**");
    }
    let _ = writeln!(
        out,
        "📊 {rate_label}: {:.2}% ao ano ({:.2}% ao mês)",
        quote.annual_rate * 100.0,
        quote.monthly_rate * 100.0
    );
}

/// Forward simulation answer
pub fn format_installment_quote(vehicle: Option<&VehicleRecord>, quote: &FinancingQuote) -> String {
    let mut out = String::from("💡 **Simulação de financiamento baseada em nossa base de dados:**\n\n");

    if let Some(vehicle) = vehicle {
        out.push_str("🚘 **Veículo Selecionado:**\n");
        let _ = writeln!(out, "Marca: {}", vehicle.brand);
        let _ = writeln!(out, "Modelo: {}", vehicle.model);
        let _ = writeln!(out, "Versão: {}", vehicle.trim);
        let _ = writeln!(out, "Cor: {}", vehicle.color);
        let _ = writeln!(out, "Ano: {}", vehicle.model_year);
        let _ = writeln!(out, "Preço: R$ {:.2}", vehicle.price);
        let _ = writeln!(
            out,
            "Consumo: {:.1} (cidade) / {:.1} (estrada) km/l",
            vehicle.urban_consumption, vehicle.highway_consumption
        );
        let _ = writeln!(out, "Potência: {} cv", vehicle.horsepower);
        let _ = writeln!(out, "IPVA anual: R$ {:.2}", vehicle.annual_tax);
        out.push('\n');
    }

    out.push_str("💰 **Detalhes do Financiamento:**\n");
    let _ = writeln!(out, "🚘 Valor do veículo: R$ {:.2}", quote.vehicle_price);
    let _ = writeln!(out, "💰 Entrada: R$ {:.2}", quote.down_payment);
    let _ = writeln!(out, "💵 Valor financiado: R$ {:.2}", quote.principal);
    push_rate_lines(&mut out, quote, "Taxa de juros");
    let _ = writeln!(out, "📅 Número de parcelas: {:.0}", quote.installments);
    let _ = writeln!(out, "💸 Valor da parcela: R$ {:.2}", quote.monthly_payment);
    let _ = writeln!(out, "💵 Valor total a pagar: R$ {:.2}", quote.total_paid);
    let _ = write!(out, "💲 Total de juros: R$ {:.2}", quote.total_interest);
    out
}

/// Target-payment answer
pub fn format_down_payment_quote(vehicle_name: &str, quote: &FinancingQuote) -> String {
    let mut out = String::from("💡 **Cálculo baseado em nossa base de dados:**\n\n");
    let _ = writeln!(out, "🚘 **Veículo: {vehicle_name}**");
    let _ = writeln!(out, "💰 Valor do veículo: R$ {:.2}", quote.vehicle_price);
    let _ = writeln!(out, "💸 Parcela desejada: R$ {:.2}", quote.monthly_payment);
    let _ = writeln!(out, "📅 Prazo: {:.0} parcelas\n", quote.installments);

    out.push_str("💰 **Resultado do Cálculo:**\n");
    if quote.down_payment > 0.0 {
        let _ = writeln!(out, "💵 **Entrada necessária: R$ {:.2}**", quote.down_payment);
    } else {
        out.push_str("💵 **Entrada necessária: R$ 0.00** (não é preciso dar entrada)\n");
    }
    let _ = writeln!(out, "💳 Valor financiado: R$ {:.2}", quote.principal);
    push_rate_lines(&mut out, quote, "Taxa");
    let _ = writeln!(out, "💵 Total a pagar: R$ {:.2}", quote.total_paid);
    let _ = write!(out, "💸 Total de juros: R$ {:.2}", quote.total_interest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use crate::amortization::{compute_installment, compute_required_down_payment};
    use crate::model::VEHICLE_STATUS_AVAILABLE;

    fn argo() -> VehicleRecord {
        VehicleRecord {
            brand: "Fiat".into(),
            model: "Argo".into(),
            trim: "Drive 1.3".into(),
            price: dec!(89990),
            body_type: "Novo".into(),
            status: VEHICLE_STATUS_AVAILABLE.into(),
            urban_consumption: 12.64,
            highway_consumption: 14.1,
            horsepower: 107,
            annual_tax: dec!(3599.6),
            model_year: 2024,
            color: "Branco".into(),
            fuel_type: "Flex".into(),
        }
    }

    #[test]
    fn test_empty_lists_use_fixed_messages() {
        assert_eq!(format_vehicle_list(&[]), NO_VEHICLES_FOUND);
        assert_eq!(format_financing_offers(&[]), NO_FINANCING_FOUND);
        assert_eq!(Answer::Vehicles(Vec::new()).render(), NO_VEHICLES_FOUND);
    }

    #[test]
    fn test_vehicle_block_order_and_precision() {
        let text = format_vehicle_list(&[argo()]);
        let identity = text.find("🚘 **Fiat Argo Drive 1.3 (Branco)**").unwrap();
        let price = text.find("💰 Preço: R$ 89990.00").unwrap();
        let consumption = text.find("⛽ Consumo: 12.6 (cidade) / 14.1 (estrada) km/l").unwrap();
        let power = text.find("⚡ Potência: 107 cv").unwrap();
        let tax = text.find("🏛️ IPVA anual: R$ 3599.60").unwrap();
        assert!(identity < price && price < consumption && consumption < power && power < tax);
    }

    #[test]
    fn test_offer_notes_are_optional() {
        let offer = FinancingOffer {
            bank: "Banco do Brasil".into(),
            offer_type: "CDC".into(),
            monthly_rate: 1.29,
            annual_rate: 16.62,
            installment_count: 48,
            down_payment: dec!(20000),
            installment_value: dec!(2015.5),
            total_value: dec!(116744),
            notes: String::new(),
            approved: true,
        };
        let text = format_financing_offers(&[offer]);
        assert!(text.contains("🏦 **Banco do Brasil - CDC**"));
        assert!(text.contains("💸 Taxa: 1.29% ao mês / 16.62% ao ano"));
        assert!(text.contains("💰 Valor parcela: R$ 2015.50"));
        assert!(!text.contains("📝"));
    }

    #[test]
    fn test_installment_quote_sections() {
        let quote = compute_installment(89_990.0, 20_000.0, 48.0, 0.12)
            .unwrap()
            .with_bank("Itaú Unibanco");
        let text = format_installment_quote(Some(&argo()), &quote);

        let vehicle = text.find("🚘 **Veículo Selecionado:**").unwrap();
        let details = text.find("💰 **Detalhes do Financiamento:**").unwrap();
        assert!(vehicle < details);
        assert!(text.contains("💵 Valor financiado: R$ 69990.00"));
        assert!(text.contains("🏦 **Banco com melhor taxa: Itaú Unibanco**"));
        assert!(text.contains("📊 Taxa de juros: 12.00% ao ano (1.00% ao mês)"));
        assert!(text.contains("📅 Número de parcelas: 48"));
    }

    #[test]
    fn test_installment_quote_without_vehicle() {
        let quote = compute_installment(100_000.0, 0.0, 60.0, 0.0).unwrap();
        let text = format_installment_quote(None, &quote);
        assert!(!text.contains("Veículo Selecionado"));
        assert!(text.contains("💸 Valor da parcela: R$ 1666.67"));
        assert!(!text.contains("Banco com melhor taxa"));
    }

    #[test]
    fn test_down_payment_quote_zero_entry() {
        let quote = compute_required_down_payment(50_000.0, 5_000.0, 60.0, 0.12)
            .unwrap()
            .with_bank("Santander");
        let text = format_down_payment_quote("Fiat Argo Drive 1.3", &quote);
        assert!(text.contains("🚘 **Veículo: Fiat Argo Drive 1.3**"));
        assert!(text.contains("não é preciso dar entrada"));
        assert!(!text.contains("-"));
    }

    #[test]
    fn test_help_is_non_empty() {
        assert!(Answer::Help.render().contains("carro barato"));
    }
}
