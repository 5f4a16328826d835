use std::collections::HashMap;

use csv::StringRecord;

use crate::entities::{DeclarationForm, DeclarationStatus, TaxpayerType};

/// Logical columns of a declaration import sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ImportColumn {
    Nom,
    Nif,
    Adresse,
    Plaque,
    Chassis,
    Marque,
    Modele,
    PuissanceCv,
    Categorie,
    Couleur,
    Annee,
    Status,
    Poids,
    TypeContribuable,
}

impl ImportColumn {
    const ALL: [ImportColumn; 14] = [
        ImportColumn::Nom,
        ImportColumn::Nif,
        ImportColumn::Adresse,
        ImportColumn::Plaque,
        ImportColumn::Chassis,
        ImportColumn::Marque,
        ImportColumn::Modele,
        ImportColumn::PuissanceCv,
        ImportColumn::Categorie,
        ImportColumn::Couleur,
        ImportColumn::Annee,
        ImportColumn::Status,
        ImportColumn::Poids,
        ImportColumn::TypeContribuable,
    ];

    pub(crate) fn code(&self) -> &'static str {
        match self {
            ImportColumn::Nom => "NOM",
            ImportColumn::Nif => "NIF",
            ImportColumn::Adresse => "ADRESSE",
            ImportColumn::Plaque => "PLAQUE",
            ImportColumn::Chassis => "CHASSIS",
            ImportColumn::Marque => "MARQUE",
            ImportColumn::Modele => "MODELE",
            ImportColumn::PuissanceCv => "PUISSANCE_CV",
            ImportColumn::Categorie => "CATEGORIE",
            ImportColumn::Couleur => "COULEUR",
            ImportColumn::Annee => "ANNEE",
            ImportColumn::Status => "STATUS",
            ImportColumn::Poids => "POIDS",
            ImportColumn::TypeContribuable => "TYPE_CONTRIBUABLE",
        }
    }

    /// Substrings accepted in free-form headers, tried after exact codes.
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            ImportColumn::Nom => &[
                "propriétaire",
                "proprietaire",
                "client",
                "societe",
                "société",
                "nom",
                "contribuable",
            ],
            ImportColumn::Nif => &["nif", "impot", "idnat"],
            ImportColumn::Adresse => &["adresse", "address", "domicile", "ville"],
            ImportColumn::Plaque => &["plaque", "immatriculation", "numero"],
            ImportColumn::Chassis => &["chassis", "châssis", "vin", "serie"],
            ImportColumn::Marque => &["marque", "brand"],
            ImportColumn::Modele => &["modèle", "modele", "model"],
            ImportColumn::PuissanceCv => &["cv", "puissance", "chevaux", "fiscal"],
            ImportColumn::Categorie => &["catégorie", "categorie", "genre"],
            ImportColumn::Couleur => &["couleur", "color"],
            ImportColumn::Annee => &["année", "annee", "year"],
            ImportColumn::Status => &["status", "statut", "etat", "état"],
            ImportColumn::Poids => &["poids", "weight", "tonnage"],
            ImportColumn::TypeContribuable => &["type"],
        }
    }
}

fn normalize_header(h: &str) -> String {
    h.trim().to_lowercase().replace(['_', ' '], "")
}

/// Column positions resolved from a sheet's header row.
#[derive(Debug, Clone, Default)]
pub(crate) struct ImportHeader {
    positions: HashMap<ImportColumn, usize>,
}

impl ImportHeader {
    /// Exact codes win over aliases, and a header is never claimed twice.
    pub(crate) fn resolve(headers: &StringRecord) -> Self {
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
        let mut positions = HashMap::new();
        let mut claimed = vec![false; normalized.len()];

        for column in ImportColumn::ALL {
            let code = normalize_header(column.code());
            if let Some(i) = normalized.iter().position(|h| *h == code) {
                positions.insert(column, i);
                claimed[i] = true;
            }
        }
        for column in ImportColumn::ALL {
            if positions.contains_key(&column) {
                continue;
            }
            let found = normalized.iter().enumerate().position(|(i, h)| {
                !claimed[i] && column.aliases().iter().any(|alias| h.contains(alias))
            });
            if let Some(i) = found {
                positions.insert(column, i);
                claimed[i] = true;
            }
        }
        Self { positions }
    }

    pub(crate) fn has(&self, column: ImportColumn) -> bool {
        self.positions.contains_key(&column)
    }

    pub(crate) fn row(&self, line: usize, record: &StringRecord) -> ImportRowModel {
        let get = |column: ImportColumn| -> String {
            self.positions
                .get(&column)
                .and_then(|&i| record.get(i))
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        };
        ImportRowModel {
            line,
            nom: get(ImportColumn::Nom),
            nif: get(ImportColumn::Nif),
            adresse: get(ImportColumn::Adresse),
            plaque: get(ImportColumn::Plaque),
            chassis: get(ImportColumn::Chassis),
            marque: get(ImportColumn::Marque),
            modele: get(ImportColumn::Modele),
            puissance_cv: get(ImportColumn::PuissanceCv),
            categorie: get(ImportColumn::Categorie),
            couleur: get(ImportColumn::Couleur),
            annee: get(ImportColumn::Annee),
            status: get(ImportColumn::Status),
            poids: get(ImportColumn::Poids),
            type_contribuable: get(ImportColumn::TypeContribuable),
        }
    }
}

/// One data line of an import sheet, as read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportRowModel {
    /// 1-based, header excluded.
    pub line: usize,
    pub nom: String,
    pub nif: String,
    pub adresse: String,
    pub plaque: String,
    pub chassis: String,
    pub marque: String,
    pub modele: String,
    pub puissance_cv: String,
    pub categorie: String,
    pub couleur: String,
    pub annee: String,
    pub status: String,
    pub poids: String,
    pub type_contribuable: String,
}

fn or_default(s: String, default: &str) -> String {
    if s.is_empty() {
        default.to_string()
    } else {
        s
    }
}

impl ImportRowModel {
    pub(crate) fn is_blank(&self) -> bool {
        *self
            == Self {
                line: self.line,
                ..Default::default()
            }
    }

    pub fn is_valid(&self) -> bool {
        !self.plaque.is_empty() && !self.chassis.is_empty()
    }

    /// Reason the row cannot be imported, if any.
    pub fn missing_fields(&self) -> Option<String> {
        if self.is_valid() {
            return None;
        }
        let missing: Vec<&str> = [("PLAQUE", &self.plaque), ("CHASSIS", &self.chassis)]
            .into_iter()
            .filter(|(_, v)| v.is_empty())
            .map(|(k, _)| k)
            .collect();
        (!missing.is_empty()).then(|| format!("missing {}", missing.join(", ")))
    }

    pub fn into_form(self) -> DeclarationForm {
        DeclarationForm {
            taxpayer_type: TaxpayerType::from_label(&self.type_contribuable),
            status: Some(import_status(&self.status)),
            name: or_default(self.nom, "INCONNU"),
            nif: or_default(self.nif, "N/A"),
            address: or_default(self.adresse, "KINSHASA"),
            city: String::new(),
            category: self.categorie,
            plate: self.plaque,
            chassis: self.chassis,
            fiscal_power: or_default(self.puissance_cv, "0"),
            weight: self.poids,
            marque: self.marque,
            modele: self.modele,
            couleur: self.couleur,
            annee: self.annee,
        }
    }
}

/// Imported batches are settled unless the sheet says otherwise.
fn import_status(raw: &str) -> DeclarationStatus {
    let lower = raw.to_lowercase();
    if lower.contains("attente") {
        DeclarationStatus::EnAttente
    } else if lower.contains("factur") {
        DeclarationStatus::Facturee
    } else if lower.contains("annul") {
        DeclarationStatus::Annulee
    } else {
        DeclarationStatus::Payee
    }
}
