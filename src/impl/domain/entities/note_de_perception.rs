use chrono::{DateTime, Utc};
use serde_derive::Serialize;

use super::vehicle_category::VehicleCategory;

/// Payment notice derived from a declaration. Never stored on its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDePerception {
    pub id: String,
    pub declaration_id: String,
    pub taxpayer: NoteTaxpayer,
    pub vehicle: NoteVehicle,
    pub bank_details: BankDetails,
    pub payment: NotePayment,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteTaxpayer {
    pub name: String,
    pub nif: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteVehicle {
    pub chassis: String,
    pub plate: String,
    pub category: VehicleCategory,
    pub fiscal_power: String,
    pub weight: String,
    pub genre: Option<String>,
    pub marque: Option<String>,
    pub modele: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    pub reserved_box: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePayment {
    #[serde(rename = "principalTaxUSD")]
    pub principal_tax_usd: f64,
    #[serde(rename = "totalAmountFC")]
    pub total_amount_fc: f64,
}
