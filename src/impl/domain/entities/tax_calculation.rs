use serde_derive::{Deserialize, Serialize};

/// Money breakdown for one vignette, in USD.
///
/// `credit_amount` is the unrounded tariff (shown on the payer receipt), while
/// `rounded_base` and `total_amount` are what the bank slip carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxCalculation {
    pub total_amount: f64,
    pub credit_amount: f64,
    pub rounded_base: f64,
    pub bank_fee: f64,
    pub timbre: f64,
    pub taxe: f64,
    pub text_amount: String,
    pub bill_breakdown: Vec<BillBreakdownLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BillLineKind {
    Cash,
    Fee,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillBreakdownLine {
    pub denomination: f64,
    pub count: u32,
    pub subtotal: f64,
    pub kind: BillLineKind,
}

impl TaxCalculation {
    /// Lines counted towards the rounded base (fee line excluded).
    pub fn cash_lines(&self) -> impl Iterator<Item = &BillBreakdownLine> {
        self.bill_breakdown
            .iter()
            .filter(|l| l.kind == BillLineKind::Cash)
    }
}

/// Vehicle weight in tonnes.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Weight(pub f64);

impl Weight {
    pub fn tonnes(t: f64) -> Self {
        Self(t)
    }
}

impl From<f64> for Weight {
    fn from(t: f64) -> Self {
        Self(t)
    }
}
