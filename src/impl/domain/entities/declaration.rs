use chrono::{DateTime, Utc};
use iso_currency::Currency;
use serde::{Deserializer, Serializer};
use serde_derive::{Deserialize, Serialize};

use super::vehicle_category::VehicleCategory;
use crate::domain::logic::tax_rules::{calculate_vehicle_tax, tax_breakdown};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclarationStatus {
    #[serde(rename = "Payée")]
    Payee,
    #[serde(rename = "En attente")]
    EnAttente,
    #[serde(rename = "Facturée")]
    Facturee,
    #[serde(rename = "Annulée")]
    Annulee,
}

impl DeclarationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DeclarationStatus::Payee => "Payée",
            DeclarationStatus::EnAttente => "En attente",
            DeclarationStatus::Facturee => "Facturée",
            DeclarationStatus::Annulee => "Annulée",
        }
    }
}

impl std::fmt::Display for DeclarationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TaxpayerType {
    PersonnePhysique,
    PersonneMorale,
    /// Legacy rows had the type wiped to "N/A".
    #[default]
    Unspecified,
}

impl TaxpayerType {
    pub fn label(&self) -> &'static str {
        match self {
            TaxpayerType::PersonnePhysique => "Personne Physique",
            TaxpayerType::PersonneMorale => "Personne Morale",
            TaxpayerType::Unspecified => "N/A",
        }
    }

    pub fn from_label(label: &str) -> Self {
        let lower = label.trim().to_lowercase();
        if lower.contains("moral") {
            TaxpayerType::PersonneMorale
        } else if lower.contains("physique") {
            TaxpayerType::PersonnePhysique
        } else {
            TaxpayerType::Unspecified
        }
    }
}

impl serde::Serialize for TaxpayerType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> serde::Deserialize<'de> for TaxpayerType {
    fn deserialize<D>(deserializer: D) -> Result<TaxpayerType, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        Ok(TaxpayerType::from_label(&s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInfo {
    pub category: VehicleCategory,
    pub plate: String,
    pub chassis: String,
    /// As captured, e.g. "11 CV".
    pub fiscal_power: String,
    /// As captured, e.g. "1 tonnes".
    #[serde(default)]
    pub weight: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marque: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modele: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub couleur: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annee: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxCurrency {
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "FC")]
    Fc,
}

impl TaxCurrency {
    pub fn iso(&self) -> Currency {
        match self {
            TaxCurrency::Usd => Currency::USD,
            TaxCurrency::Fc => Currency::CDF,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBreakdown {
    /// Unrounded tariff in USD (the credit amount).
    pub base_rate: f64,
    pub currency: TaxCurrency,
    #[serde(rename = "totalAmountFC")]
    pub total_amount_fc: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount_usd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Taxpayer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nif: String,
    #[serde(default)]
    pub address: String,
    #[serde(rename = "type", default)]
    pub kind: TaxpayerType,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationMeta {
    #[serde(default)]
    pub system_id: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ndp_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Declaration {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: DeclarationStatus,
    pub vehicle: VehicleInfo,
    pub tax: TaxBreakdown,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxpayer: Option<Taxpayer>,
    #[serde(default)]
    pub meta: DeclarationMeta,
}

/// Partial update; `None` fields are left untouched. The tax is not
/// patchable: it follows the vehicle.
#[derive(Debug, Clone, Default)]
pub struct DeclarationPatch {
    pub status: Option<DeclarationStatus>,
    pub vehicle: Option<VehicleInfo>,
    pub taxpayer: Option<Taxpayer>,
    pub meta: Option<DeclarationMeta>,
}

impl Declaration {
    pub(crate) fn apply(
        mut self,
        patch: DeclarationPatch,
        exchange_rate: f64,
        now: DateTime<Utc>,
    ) -> Self {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(vehicle) = patch.vehicle {
            self.tax = tax_breakdown(&calculate_vehicle_tax(&vehicle), exchange_rate);
            self.vehicle = vehicle;
        }
        if let Some(taxpayer) = patch.taxpayer {
            self.taxpayer = Some(taxpayer);
        }
        if let Some(meta) = patch.meta {
            self.meta = meta;
        }
        self.updated_at = now;
        self
    }
}

/// Input captured by the declaration form (or one import row).
#[derive(Debug, Clone, Default)]
pub struct DeclarationForm {
    pub taxpayer_type: TaxpayerType,
    pub name: String,
    pub nif: String,
    pub address: String,
    pub city: String,
    pub category: String,
    pub plate: String,
    pub chassis: String,
    pub fiscal_power: String,
    pub weight: String,
    pub marque: String,
    pub modele: String,
    pub couleur: String,
    pub annee: String,
    pub status: Option<DeclarationStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_french_labels_on_the_wire() {
        let json = serde_json::to_string(&DeclarationStatus::EnAttente).unwrap();
        assert_eq!(json, "\"En attente\"");
        let back: DeclarationStatus = serde_json::from_str("\"Payée\"").unwrap();
        assert_eq!(back, DeclarationStatus::Payee);
    }

    #[test]
    fn taxpayer_type_reads_legacy_values() {
        assert_eq!(TaxpayerType::from_label("PERSONNE MORALE"), TaxpayerType::PersonneMorale);
        assert_eq!(TaxpayerType::from_label("Personne Physique"), TaxpayerType::PersonnePhysique);
        assert_eq!(TaxpayerType::from_label("N/A"), TaxpayerType::Unspecified);
        assert_eq!(TaxpayerType::from_label("moral"), TaxpayerType::PersonneMorale);
        assert_eq!(TaxpayerType::default(), TaxpayerType::Unspecified);
    }

    #[test]
    fn meta_keeps_unknown_keys() {
        let meta: DeclarationMeta = serde_json::from_value(serde_json::json!({
            "systemId": "SYS-1",
            "reference": "REF-1",
            "importedFrom": "batch-3"
        }))
        .unwrap();
        assert_eq!(meta.system_id, "SYS-1");
        assert_eq!(meta.ndp_id, None);
        assert_eq!(meta.extra.get("importedFrom"), Some(&serde_json::json!("batch-3")));
    }
}
