use crate::entities::{
    BillBreakdownLine, BillLineKind, TaxBreakdown, TaxCalculation, TaxCurrency, VehicleCategory,
    VehicleInfo, Weight,
};

use super::number_to_words::number_to_words;

// Tariffs (USD).
pub const TARIFF_UP_TO_10_CV: f64 = 58.70;
pub const TARIFF_11_TO_15_CV: f64 = 64.50;
pub const TARIFF_ABOVE_15_CV: f64 = 70.10;
pub const TARIFF_TOURISTIQUE_LIGHT: f64 = 58.70;
pub const TARIFF_UTILITAIRE_HEAVY_LIGHT_LOAD: f64 = 64.50;
pub const TARIFF_UTILITAIRE_HEAVY_HEAVY_LOAD: f64 = 68.20;

/// Weight (tonnes) above which a heavy utility vehicle pays the higher rate.
pub const HEAVY_LOAD_THRESHOLD: f64 = 10.0;

// Fixed bank fee, split into stamp duty and tax.
pub const BANK_FEE: f64 = 4.00;
pub const TIMBRE: f64 = 3.45;
pub const TAXE: f64 = 0.55;

const DENOMINATIONS: [u32; 6] = [50, 20, 10, 5, 2, 1];

/// Computes the vignette tax for a vehicle.
///
/// Never fails: a non-finite fiscal power is treated as 0 CV and lands in
/// the lowest tier, the same as a negative one.
pub fn calculate_tax(
    fiscal_power: f64,
    vehicle_category: &str,
    weight: Option<Weight>,
) -> TaxCalculation {
    let cv = if fiscal_power.is_finite() {
        fiscal_power
    } else {
        0.0
    };
    let weight = weight.unwrap_or_default();
    settle(tariff(cv, &VehicleCategory::from_label(vehicle_category), weight))
}

/// Bank-slip figures behind a stored breakdown.
pub fn stored_tax(tax: &TaxBreakdown) -> TaxCalculation {
    settle(tax.base_rate)
}

fn settle(base: f64) -> TaxCalculation {
    let rounded_base = base.ceil();
    let total_amount = rounded_base + BANK_FEE;

    TaxCalculation {
        total_amount,
        credit_amount: base,
        rounded_base,
        bank_fee: BANK_FEE,
        timbre: TIMBRE,
        taxe: TAXE,
        text_amount: amount_text(total_amount),
        bill_breakdown: bill_breakdown(rounded_base),
    }
}

/// Tax for a captured vehicle, reading CV and tonnes out of the free-text
/// fields.
pub fn calculate_vehicle_tax(vehicle: &VehicleInfo) -> TaxCalculation {
    calculate_tax(
        vehicle.fiscal_power_cv(),
        vehicle.category.label(),
        Some(vehicle.weight_tonnes()),
    )
}

/// Stored form of a calculation. The FC amount is the bank-slip total at the
/// given rate.
pub(crate) fn tax_breakdown(tax: &TaxCalculation, exchange_rate: f64) -> TaxBreakdown {
    TaxBreakdown {
        base_rate: tax.credit_amount,
        currency: TaxCurrency::Usd,
        total_amount_fc: (tax.total_amount * exchange_rate * 100.0).round() / 100.0,
        total_amount_usd: Some(tax.total_amount),
        exchange_rate: Some(exchange_rate),
    }
}

fn tariff(cv: f64, category: &VehicleCategory, weight: Weight) -> f64 {
    match category {
        VehicleCategory::TouristiqueLight => TARIFF_TOURISTIQUE_LIGHT,
        VehicleCategory::UtilitaireHeavy => {
            if weight.0 > HEAVY_LOAD_THRESHOLD {
                TARIFF_UTILITAIRE_HEAVY_HEAVY_LOAD
            } else {
                TARIFF_UTILITAIRE_HEAVY_LIGHT_LOAD
            }
        }
        _ if cv <= 10.0 => TARIFF_UP_TO_10_CV,
        _ if cv <= 15.0 => TARIFF_11_TO_15_CV,
        _ => TARIFF_ABOVE_15_CV,
    }
}

/// Greedy split of the rounded base into bills, followed by the fee line.
fn bill_breakdown(rounded_base: f64) -> Vec<BillBreakdownLine> {
    let mut remaining = rounded_base.max(0.0) as u32;
    let mut lines: Vec<BillBreakdownLine> = DENOMINATIONS
        .iter()
        .filter_map(|&d| {
            let count = remaining / d;
            remaining %= d;
            (count > 0).then(|| BillBreakdownLine {
                denomination: d as f64,
                count,
                subtotal: (d * count) as f64,
                kind: BillLineKind::Cash,
            })
        })
        .collect();
    lines.push(BillBreakdownLine {
        denomination: BANK_FEE,
        count: 1,
        subtotal: BANK_FEE,
        kind: BillLineKind::Fee,
    });
    lines
}

/// Wording used on the bank slips for the usual totals; anything else goes
/// through the generic converter.
fn amount_text(total: f64) -> String {
    let total = total.round() as i64;
    match total {
        63 => "soixante trois".to_string(),
        69 => "soixante neuf".to_string(),
        73 => "soixante treize".to_string(),
        75 => "soixante quinze".to_string(),
        other => number_to_words(other),
    }
}
