use crate::entities::{Declaration, NoteDePerception, PortalConfig, TaxCurrency};

use super::utils::{centered, field, format_amount_fr, format_number, rule, short_date, short_time};

const WIDTH: usize = 72;
const LABEL_WIDTH: usize = 22;

/// Which half of the récépissé is being printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptCopy {
    Banque,
    Contribuable,
}

impl ReceiptCopy {
    fn label(&self) -> &'static str {
        match self {
            ReceiptCopy::Banque => "BANQUE",
            ReceiptCopy::Contribuable => "CONTRIBUABLE",
        }
    }
}

pub(crate) struct ReceiptPrinter;

impl ReceiptPrinter {
    pub(crate) fn new() -> Self {
        Self
    }

    /// Both copies, bank copy first, separated by a cut line.
    pub(crate) fn print_receipt(
        &self,
        declaration: &Declaration,
        note: &NoteDePerception,
        config: &PortalConfig,
    ) -> String {
        let mut out = String::new();
        self.print_copy(&mut out, ReceiptCopy::Banque, declaration, note, config);
        out.push('\n');
        centered(&mut out, "- - - - - - - - - - COUPER ICI - - - - - - - - - -", WIDTH);
        out.push('\n');
        self.print_copy(&mut out, ReceiptCopy::Contribuable, declaration, note, config);
        out
    }

    pub(crate) fn print_copy(
        &self,
        out: &mut String,
        copy: ReceiptCopy,
        declaration: &Declaration,
        note: &NoteDePerception,
        config: &PortalConfig,
    ) {
        let line = |out: &mut String, label: &str, value: &str| {
            field(out, label, value, LABEL_WIDTH, WIDTH)
        };

        rule(out, '=', WIDTH);
        centered(out, &format!("RÉCÉPISSÉ - {}", copy.label()), WIDTH);
        centered(
            out,
            &format!("Vignette Automobile | Exercice {}", config.fiscal_year),
            WIDTH,
        );
        rule(out, '=', WIDTH);
        out.push_str("N° DE RÉFÉRENCE (À MENTIONNER AU PAIEMENT)\n");
        out.push_str(&format!("    {}\n", note.id));
        line(
            out,
            "Date Création",
            &format!(
                "{} {}",
                short_date(note.generated_at),
                short_time(note.generated_at)
            ),
        );
        line(out, "Déclaration", &note.declaration_id);
        out.push('\n');

        out.push_str("CONTRIBUABLE\n");
        rule(out, '-', WIDTH);
        line(out, "Noms/Raison Sociale", &note.taxpayer.name);
        line(out, "N° Impôt/NIF", &note.taxpayer.nif);
        line(out, "Adresse", &note.taxpayer.address);
        out.push('\n');

        out.push_str("VÉHICULE & TAXATION\n");
        rule(out, '-', WIDTH);
        line(out, "Chassis", &note.vehicle.chassis);
        line(out, "Plaque", &note.vehicle.plate);
        line(out, "Marque/Type", &marque_type(note));
        line(out, "Usage", note.vehicle.category.label());
        line(out, "Puissance", or_na(&note.vehicle.fiscal_power));
        line(out, "Poids", or_na(&note.vehicle.weight));
        out.push('\n');

        out.push_str("DÉTAIL DU PAIEMENT\n");
        rule(out, '-', WIDTH);
        line(
            out,
            "Taxe Principale (USD)",
            &format_number(note.payment.principal_tax_usd, TaxCurrency::Usd),
        );
        line(
            out,
            "MONTANT TOTAL DÛ",
            &format_amount_fr(note.payment.total_amount_fc, TaxCurrency::Fc),
        );
        line(out, "Statut", declaration.status.label());
        out.push('\n');

        if note.bank_details.reserved_box {
            out.push_str(&format!("+{}+\n", "-".repeat(WIDTH - 2)));
            out.push_str(&format!(
                "|{:^inner$}|\n",
                "CADRE RÉSERVÉ À LA BANQUE",
                inner = WIDTH - 2
            ));
            for _ in 0..3 {
                out.push_str(&format!("|{}|\n", " ".repeat(WIDTH - 2)));
            }
            out.push_str(&format!("+{}+\n", "-".repeat(WIDTH - 2)));
        }
        line(out, "Scan pour vérifier", &config.verify_url(&declaration.id));
        rule(out, '=', WIDTH);
    }
}

fn or_na(s: &str) -> &str {
    if s.trim().is_empty() {
        "N/A"
    } else {
        s
    }
}

fn marque_type(note: &NoteDePerception) -> String {
    let parts: Vec<&str> = [&note.vehicle.marque, &note.vehicle.modele]
        .into_iter()
        .flatten()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if parts.is_empty() {
        "N/A".to_string()
    } else {
        parts.join(" ")
    }
}
