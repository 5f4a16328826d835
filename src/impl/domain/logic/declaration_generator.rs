use chrono::{DateTime, Duration, TimeZone as _, Utc};

use crate::entities::{
    BankDetails, Declaration, DeclarationMeta, DeclarationStatus, NoteDePerception, NotePayment,
    NoteTaxpayer, NoteVehicle, Taxpayer, TaxpayerType, VehicleCategory, VehicleInfo, Weight,
};

use super::{
    id_generator::{generate_declaration_id, generate_note_id, sequence_or_zero},
    tax_rules::{calculate_tax, tax_breakdown},
};

const CATEGORIES: [VehicleCategory; 8] = [
    VehicleCategory::Motocycle,
    VehicleCategory::Utilitaire,
    VehicleCategory::Touristique,
    VehicleCategory::Tracteur,
    VehicleCategory::Remorque,
    VehicleCategory::TransportPublic,
    VehicleCategory::ImmatriculeIt,
    VehicleCategory::Exonere,
];

const TAXPAYER_TYPES: [TaxpayerType; 2] =
    [TaxpayerType::PersonnePhysique, TaxpayerType::PersonneMorale];

const CITIES: [&str; 5] = ["Kinshasa", "Lubumbashi", "Goma", "Matadi", "Kisangani"];
const COMMUNES: [&str; 6] = [
    "Gombe",
    "Kintambo",
    "Ngaliema",
    "Limete",
    "Makala",
    "Bandalungwa",
];

const REMITTER_NAMES: [&str; 15] = [
    "MUKENDI", "KABONGO", "ILUNGA", "MBUYI", "KALALA", "NGOY", "KASONGO", "LUKUSA", "MWAMBA",
    "NSIMBA", "MAKIESE", "LUTETE", "KIALA", "TSHIBANDA", "MAVUNGU",
];
const PHONE_PREFIXES: [&str; 7] = ["81", "82", "84", "85", "89", "97", "99"];

const BORDEREAU_BASE: u64 = 39383;

fn pick<T>(list: &[T], seed: u64) -> &T {
    &list[(seed % list.len() as u64) as usize]
}

/// 2026-01-01T10:00Z shifted by `sequence % 365` days.
fn stable_date(sequence: u64) -> DateTime<Utc> {
    let base = Utc
        .with_ymd_and_hms(2026, 1, 1, 10, 0, 0)
        .single()
        .expect("hardcoded base date should be valid");
    base + Duration::days((sequence % 365) as i64)
}

/// Synthesises demo declarations. Output depends only on the sequence and
/// the exchange rate.
pub struct DeclarationGenerator {
    exchange_rate: f64,
}

impl DeclarationGenerator {
    pub fn new(exchange_rate: f64) -> Self {
        Self { exchange_rate }
    }

    pub fn generate(&self, sequence: u64) -> Declaration {
        let kind = *pick(&TAXPAYER_TYPES, sequence);
        let category = pick(&CATEGORIES, sequence).clone();
        let cv = 10 + sequence % 20;
        let tonnes = 1 + sequence % 5;
        let tax = calculate_tax(
            cv as f64,
            category.label(),
            Some(Weight::tonnes(tonnes as f64)),
        );
        let created_at = stable_date(sequence);

        Declaration {
            id: generate_declaration_id(sequence),
            created_at,
            updated_at: created_at,
            status: if sequence % 3 == 0 {
                DeclarationStatus::Payee
            } else {
                DeclarationStatus::Facturee
            },
            vehicle: VehicleInfo {
                category,
                plate: format!(
                    "{}BA{}{}",
                    1000 + sequence,
                    sequence % 10,
                    (sequence / 10) % 10
                ),
                chassis: format!("JNX{}00{}XYZ", sequence, 2026 + sequence),
                fiscal_power: format!("{} CV", cv),
                weight: format!("{} tonnes", tonnes),
                marque: None,
                modele: None,
                genre: None,
                couleur: None,
                annee: None,
            },
            tax: tax_breakdown(&tax, self.exchange_rate),
            taxpayer: Some(Taxpayer {
                name: match kind {
                    TaxpayerType::PersonneMorale => format!("ENTREPRISE {} SARL", sequence),
                    _ => format!("CITOYEN {} KITONA", sequence),
                },
                nif: format!("A{}K", sequence + 90000),
                address: format!(
                    "{} Av. Des Poids Lourds, {}, {}",
                    sequence * 12 + 1,
                    pick(&COMMUNES, sequence),
                    pick(&CITIES, sequence)
                ),
                kind,
            }),
            meta: DeclarationMeta {
                system_id: format!("SYS-{:X}", sequence),
                reference: format!("REF-{}", 20260000 + sequence),
                ndp_id: Some(generate_note_id(sequence)),
                extra: Default::default(),
            },
        }
    }
}

/// Payment notice for a declaration. Uses the stored NDP id when there is
/// one, else derives it from the declaration's sequence.
pub fn generate_note(declaration: &Declaration) -> NoteDePerception {
    let id = declaration
        .meta
        .ndp_id
        .clone()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| generate_note_id(sequence_or_zero(&declaration.id)));

    let taxpayer = declaration.taxpayer.as_ref();
    let non_empty = |s: Option<&String>| s.filter(|s| !s.trim().is_empty()).cloned();
    let kind = taxpayer.map(|t| t.kind).unwrap_or_default();

    NoteDePerception {
        id,
        declaration_id: declaration.id.clone(),
        taxpayer: NoteTaxpayer {
            name: non_empty(taxpayer.map(|t| &t.name)).unwrap_or_else(|| match kind {
                TaxpayerType::PersonneMorale => "ENTREPRISE SARL".to_string(),
                _ => "CONTRIBUABLE".to_string(),
            }),
            nif: non_empty(taxpayer.map(|t| &t.nif)).unwrap_or_else(|| "N/A".to_string()),
            address: non_empty(taxpayer.map(|t| &t.address)).unwrap_or_else(|| "N/A".to_string()),
        },
        vehicle: NoteVehicle {
            chassis: declaration.vehicle.chassis.clone(),
            plate: declaration.vehicle.plate.clone(),
            category: declaration.vehicle.category.clone(),
            fiscal_power: declaration.vehicle.fiscal_power.clone(),
            weight: declaration.vehicle.weight.clone(),
            genre: declaration.vehicle.genre.clone(),
            marque: declaration.vehicle.marque.clone(),
            modele: declaration.vehicle.modele.clone(),
        },
        bank_details: BankDetails { reserved_box: true },
        payment: NotePayment {
            principal_tax_usd: declaration.tax.base_rate,
            total_amount_fc: declaration.tax.total_amount_fc,
        },
        generated_at: declaration.created_at,
    }
}

pub(crate) fn bordereau_number(sequence: u64) -> u64 {
    BORDEREAU_BASE + sequence % 10000
}

/// "FIRST LAST / +243 PP XXX XXXX", stable for a given sequence.
pub(crate) fn remitter(sequence: u64) -> String {
    let first = pick(&REMITTER_NAMES, sequence);
    let last = pick(&REMITTER_NAMES, sequence.wrapping_mul(7));
    let digits = sequence.wrapping_mul(7919).wrapping_add(1_000_003) % 10_000_000;
    format!(
        "{} {} / +243 {} {:03} {:04}",
        first,
        last,
        pick(&PHONE_PREFIXES, sequence),
        digits / 10_000,
        digits % 10_000
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic() {
        let g = DeclarationGenerator::new(2355.0);
        assert_eq!(g.generate(42), g.generate(42));
    }

    #[test]
    fn generated_fields_follow_the_sequence() {
        let d = DeclarationGenerator::new(2355.0).generate(12);
        assert_eq!(d.id, "DECL-2026-B9ED82");
        assert_eq!(d.vehicle.plate, "1012BA21");
        assert_eq!(d.vehicle.chassis, "JNX12002038XYZ");
        assert_eq!(d.vehicle.fiscal_power, "22 CV");
        assert_eq!(d.vehicle.weight, "3 tonnes");
        assert_eq!(d.vehicle.category, VehicleCategory::Remorque);
        assert_eq!(d.status, DeclarationStatus::Payee);
        assert_eq!(d.meta.system_id, "SYS-C");
        assert_eq!(d.meta.reference, "REF-20260012");
        assert_eq!(d.created_at, stable_date(12));
        // 22 CV is in the top tier.
        assert!((d.tax.base_rate - 70.10).abs() < 1e-9);
        let taxpayer = d.taxpayer.unwrap();
        assert_eq!(taxpayer.kind, TaxpayerType::PersonnePhysique);
        assert_eq!(taxpayer.name, "CITOYEN 12 KITONA");
        assert_eq!(taxpayer.nif, "A90012K");
    }

    #[test]
    fn statuses_cycle() {
        let g = DeclarationGenerator::new(2355.0);
        assert_eq!(g.generate(3).status, DeclarationStatus::Payee);
        assert_eq!(g.generate(4).status, DeclarationStatus::Facturee);
    }

    #[test]
    fn note_prefers_stored_ndp_id() {
        let mut d = DeclarationGenerator::new(2355.0).generate(5);
        d.meta.ndp_id = Some("NDP-2026-CUSTOM".to_string());
        assert_eq!(generate_note(&d).id, "NDP-2026-CUSTOM");
    }

    #[test]
    fn note_derives_id_from_sequence() {
        let mut d = DeclarationGenerator::new(2355.0).generate(5);
        d.meta.ndp_id = None;
        assert_eq!(generate_note(&d).id, generate_note_id(5));
        d.id = "MANUAL-1".to_string();
        assert_eq!(generate_note(&d).id, generate_note_id(0));
    }

    #[test]
    fn note_falls_back_on_taxpayer_placeholders() {
        let mut d = DeclarationGenerator::new(2355.0).generate(1);
        d.taxpayer = Some(Taxpayer {
            name: " ".to_string(),
            nif: String::new(),
            address: String::new(),
            kind: TaxpayerType::PersonneMorale,
        });
        let note = generate_note(&d);
        assert_eq!(note.taxpayer.name, "ENTREPRISE SARL");
        assert_eq!(note.taxpayer.nif, "N/A");
        assert_eq!(note.taxpayer.address, "N/A");

        d.taxpayer = None;
        assert_eq!(generate_note(&d).taxpayer.name, "CONTRIBUABLE");
    }

    #[test]
    fn note_carries_payment_amounts() {
        let d = DeclarationGenerator::new(2355.0).generate(7);
        let note = generate_note(&d);
        assert_eq!(note.payment.principal_tax_usd, d.tax.base_rate);
        assert_eq!(note.payment.total_amount_fc, d.tax.total_amount_fc);
        assert_eq!(note.generated_at, d.created_at);
        assert!(note.bank_details.reserved_box);
    }

    #[test]
    fn remitter_is_stable() {
        assert_eq!(remitter(9), remitter(9));
        assert!(remitter(9).contains("/ +243 "));
        assert_eq!(bordereau_number(12345), 39383 + 2345);
    }
}
