use crate::{
    domain::logic::{
        declaration_generator::{bordereau_number, generate_note, remitter},
        id_generator::sequence_or_zero,
        tax_rules::stored_tax,
        utils::first_name_upper,
    },
    entities::{BillLineKind, Declaration, PortalConfig, TaxCurrency},
};

use super::utils::{format_amount, format_number, long_date, rule, short_time};

const WIDTH: usize = 64;

pub(crate) struct BordereauPrinter;

impl BordereauPrinter {
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) fn print_bordereau(&self, declaration: &Declaration, config: &PortalConfig) -> String {
        let sequence = sequence_or_zero(&declaration.id);
        let tax = stored_tax(&declaration.tax);
        let note = generate_note(declaration);
        let owner = declaration
            .taxpayer
            .as_ref()
            .map(|t| first_name_upper(&t.name))
            .unwrap_or_else(|| first_name_upper(""));
        let usd = |amount: f64| format_amount(amount, TaxCurrency::Usd);
        let bank = &config.bank;

        let mut out = String::new();
        rule(&mut out, '=', WIDTH);
        out.push_str(&format!(
            "{:<30}{:>34}\n",
            "VILLE DE KINSHASA",
            format!("BORDEREAU N° {}", bordereau_number(sequence))
        ));
        out.push_str(&format!("{:<30}{:>34}\n", "KINSHASA / GOMBE", bank.account));
        rule(&mut out, '=', WIDTH);
        out.push_str(&format!(
            "Date : {}   Heure : {}\n",
            long_date(declaration.created_at),
            short_time(declaration.created_at)
        ));
        out.push_str(&format!("Agence  : {}\n", bank.agency));
        out.push_str(&format!("Caisse  : {}\n", bank.cashier_desk));
        out.push_str("Devise  : USD  DOLLAR USA\n");
        rule(&mut out, '-', WIDTH);
        out.push_str(&format!("Nom du remettant : {}\n", remitter(sequence)));
        out.push_str(&format!("Motif            : {} / {}\n", owner, note.id));
        rule(&mut out, '-', WIDTH);

        out.push_str(&format!("Montant versement : {:>16}\n", usd(tax.rounded_base)));
        out.push_str(&format!("Timbre ...........: {:>16}\n", usd(tax.timbre)));
        out.push_str(&format!("Taxe .............: {:>16}\n", usd(tax.taxe)));
        out.push_str(&format!("Frais ............: {:>16}\n", usd(tax.bank_fee)));
        rule(&mut out, '-', WIDTH);

        out.push_str(&format!("{:>10} ! {:>6} ! {:>14}\n", "Valeur", "Nombre", "Montant"));
        for line in &tax.bill_breakdown {
            let valeur = match line.kind {
                BillLineKind::Cash => format_number(line.denomination, TaxCurrency::Usd),
                BillLineKind::Fee => "Frais".to_string(),
            };
            out.push_str(&format!(
                "{:>10} ! {:>6} ! {:>14}\n",
                valeur,
                line.count,
                format_number(line.subtotal, TaxCurrency::Usd)
            ));
        }
        rule(&mut out, '-', WIDTH);
        out.push_str(&format!("Total recu : {:>16}\n", usd(tax.total_amount)));
        out.push_str(&format!("Rendu      : {:>16}\n", usd(0.0)));
        out.push('\n');
        out.push_str(&format!(
            "Nous portons au credit du compte no {} la somme de {}\n",
            bank.account,
            usd(tax.credit_amount)
        ));
        out.push_str(&format!("Soit : {} dollars américains\n", tax.text_amount));
        out.push('\n');

        out.push_str(&format!(
            "{:^19}!{:^19}!{:^19}\n",
            "CLIENT", "GUICHETIER", "GESTIONNAIRE"
        ));
        out.push_str(&format!("{:^19}!{:^19}!{:^19}\n", "", "", ""));
        out.push_str(&format!(
            "{:^19}!{:^19}!{:^19}\n",
            "", bank.teller, bank.manager
        ));
        out.push('\n');
        out.push_str(&format!("{:^width$}\n", "OPERATION EFFECTUEE", width = WIDTH));
        rule(&mut out, '=', WIDTH);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::logic::declaration_generator::DeclarationGenerator;

    #[test]
    fn slip_carries_the_bank_amounts() {
        // seq 20: 10 CV, 58.70 base, 59 rounded, 63 total.
        let d = DeclarationGenerator::new(2355.0).generate(20);
        let text = BordereauPrinter::new().print_bordereau(&d, &PortalConfig::default());

        assert!(text.contains(&format!("BORDEREAU N° {}", 39383 + 20)));
        assert!(text.contains("Montant versement :        59.00 USD"));
        assert!(text.contains("Timbre ...........:         3.45 USD"));
        assert!(text.contains("Total recu :        63.00 USD"));
        assert!(text.contains("la somme de 58.70 USD"));
        assert!(text.contains("Soit : soixante trois dollars"));
        assert!(text.contains("33000061711-79"));
        assert!(text.contains("VNGOMBA"));
    }

    #[test]
    fn bill_grid_follows_the_breakdown() {
        let d = DeclarationGenerator::new(2355.0).generate(20);
        let text = BordereauPrinter::new().print_bordereau(&d, &PortalConfig::default());
        // 59 = 50 + 5 + 2 + 2, then the fee line.
        assert!(text.contains("     50.00 !      1 !          50.00"));
        assert!(text.contains("      2.00 !      2 !           4.00"));
        assert!(text.contains("     Frais !      1 !           4.00"));
    }

    #[test]
    fn motif_uses_owner_first_name_and_note_id() {
        let d = DeclarationGenerator::new(2355.0).generate(20);
        let text = BordereauPrinter::new().print_bordereau(&d, &PortalConfig::default());
        let name = first_name_upper(&d.taxpayer.as_ref().unwrap().name);
        assert!(text.contains(&format!("Motif            : {} / {}", name, generate_note(&d).id)));
        assert!(text.contains(&format!("Nom du remettant : {}", remitter(20))));
    }
}
