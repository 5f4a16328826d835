use chrono::{DateTime, Utc};
use fractic_server_error::ServerError;
use serde_derive::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    domain::logic::sanitizer::{contains_taxpayer_type_label, scrub_value},
    entities::{Declaration, DeclarationMeta, DeclarationStatus, Taxpayer, TaxpayerType},
    errors::{InvalidStoredRecord, SerializationFailed},
};

/// The `declarations` table has no taxpayer column; the taxpayer travels in
/// the meta bag under this key.
const TAXPAYER_KEY: &str = "taxpayerData";
/// Older rows captured through the manual form.
const LEGACY_TAXPAYER_KEY: &str = "manualTaxpayer";

const UNKNOWN_TAXPAYER: &str = "Inconnu";

/// One row of the hosted `declarations` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclarationRowModel {
    pub id: String,
    pub status: DeclarationStatus,
    #[serde(rename = "createdAt", alias = "created_at")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt", alias = "updated_at")]
    pub updated_at: DateTime<Utc>,
    pub vehicle: Value,
    pub tax: Value,
    #[serde(default)]
    pub meta: Value,
}

/// One row of the `receipt_logs` audit table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptLogModel {
    pub reference_number: String,
    pub qr_code_content: String,
    pub full_receipt_data: Value,
    pub created_at: DateTime<Utc>,
}

fn to_value<T: serde::Serialize>(what: &str, v: &T) -> Result<Value, ServerError> {
    serde_json::to_value(v).map_err(|e| SerializationFailed::with_debug(what, &e))
}

impl DeclarationRowModel {
    /// Row for a declaration, with free-text fields scrubbed.
    pub fn from_declaration(declaration: &Declaration) -> Result<Self, ServerError> {
        let mut meta = to_value("meta", &declaration.meta)?;
        if let (Some(taxpayer), Value::Object(map)) = (&declaration.taxpayer, &mut meta) {
            map.insert(TAXPAYER_KEY.to_string(), to_value("taxpayer", taxpayer)?);
        }
        let mut row = Self {
            id: declaration.id.clone(),
            status: declaration.status,
            created_at: declaration.created_at,
            updated_at: declaration.updated_at,
            vehicle: to_value("vehicle", &declaration.vehicle)?,
            tax: to_value("tax", &declaration.tax)?,
            meta,
        };
        row.scrub();
        Ok(row)
    }

    pub(crate) fn scrub(&mut self) {
        let dirty = [&self.vehicle, &self.tax, &self.meta]
            .into_iter()
            .any(contains_taxpayer_type_label);
        if !dirty {
            return;
        }
        debug!(id = %self.id, "scrubbing taxpayer-type labels from free text");
        scrub_value(&mut self.vehicle);
        scrub_value(&mut self.tax);
        scrub_value(&mut self.meta);
    }

    pub fn into_declaration(self) -> Result<Declaration, ServerError> {
        let id = self.id;
        let invalid = |what: &str, e: &serde_json::Error| {
            InvalidStoredRecord::with_debug(&id, what, e)
        };

        let mut meta_map = match self.meta {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let taxpayer = take_taxpayer(&mut meta_map);
        let meta: DeclarationMeta =
            serde_json::from_value(Value::Object(meta_map)).map_err(|e| invalid("meta", &e))?;

        Ok(Declaration {
            vehicle: serde_json::from_value(self.vehicle).map_err(|e| invalid("vehicle", &e))?,
            tax: serde_json::from_value(self.tax).map_err(|e| invalid("tax", &e))?,
            id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            status: self.status,
            taxpayer: Some(taxpayer),
            meta,
        })
    }
}

/// Pulls the taxpayer out of the meta bag, current key first.
fn take_taxpayer(meta: &mut Map<String, Value>) -> Taxpayer {
    let current = meta.remove(TAXPAYER_KEY);
    let legacy = meta.remove(LEGACY_TAXPAYER_KEY);
    [current, legacy]
        .into_iter()
        .flatten()
        .find_map(|v| serde_json::from_value::<Taxpayer>(v).ok())
        .unwrap_or_else(|| Taxpayer {
            name: UNKNOWN_TAXPAYER.to_string(),
            nif: String::new(),
            address: String::new(),
            kind: TaxpayerType::Unspecified,
        })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::logic::declaration_generator::DeclarationGenerator;

    #[test]
    fn taxpayer_is_stored_inside_meta() {
        let declaration = DeclarationGenerator::new(2355.0).generate(4);
        let row = DeclarationRowModel::from_declaration(&declaration).unwrap();
        assert_eq!(
            row.meta[TAXPAYER_KEY]["name"],
            json!(declaration.taxpayer.as_ref().unwrap().name)
        );
        assert_eq!(row.into_declaration().unwrap(), declaration);
    }

    #[test]
    fn free_text_is_scrubbed_on_write() {
        let mut declaration = DeclarationGenerator::new(2355.0).generate(1);
        declaration.vehicle.genre = Some("Personne Morale".to_string());
        if let Some(t) = declaration.taxpayer.as_mut() {
            t.address = "PERSONNE PHYSIQUE, Gombe".to_string();
        }
        let row = DeclarationRowModel::from_declaration(&declaration).unwrap();
        assert_eq!(row.vehicle["genre"], json!("N/A"));
        assert_eq!(row.meta[TAXPAYER_KEY]["address"], json!("Gombe"));
        assert_eq!(row.meta[TAXPAYER_KEY]["type"], json!("Personne Morale"));
    }

    #[test]
    fn legacy_row_shapes_are_read() {
        let row: DeclarationRowModel = serde_json::from_value(json!({
            "id": "DECL-2026-B9ED80",
            "status": "Facturée",
            "created_at": "2026-01-20T10:00:00Z",
            "updated_at": "2026-01-20T10:00:00Z",
            "vehicle": {
                "category": "Véhicule utilitaire",
                "plate": "1234BA01",
                "chassis": "JNX1",
                "fiscalPower": "12 CV",
                "weight": "2 tonnes",
                "type": "N/A"
            },
            "tax": { "baseRate": 64.5, "currency": "USD", "totalAmountFC": 162495.0 },
            "meta": {
                "systemId": "MANUAL-9100",
                "reference": "REF-2026-9100",
                "manualTaxpayer": { "name": "JOSUAH KITONA", "nif": "KN19371612", "address": "Makala" }
            }
        }))
        .unwrap();
        let declaration = row.into_declaration().unwrap();
        let taxpayer = declaration.taxpayer.unwrap();
        assert_eq!(taxpayer.name, "JOSUAH KITONA");
        assert_eq!(taxpayer.kind, TaxpayerType::Unspecified);
        assert_eq!(declaration.meta.system_id, "MANUAL-9100");
        assert!(declaration.meta.extra.is_empty());
    }

    #[test]
    fn missing_taxpayer_defaults_to_unknown() {
        let mut row =
            DeclarationRowModel::from_declaration(&DeclarationGenerator::new(2355.0).generate(2))
                .unwrap();
        row.meta = Value::Null;
        let declaration = row.into_declaration().unwrap();
        assert_eq!(declaration.taxpayer.unwrap().name, UNKNOWN_TAXPAYER);
    }

    #[test]
    fn undecodable_vehicle_is_an_error() {
        let mut row =
            DeclarationRowModel::from_declaration(&DeclarationGenerator::new(2355.0).generate(2))
                .unwrap();
        row.vehicle = json!("not a vehicle");
        assert!(row.into_declaration().is_err());
    }
}
