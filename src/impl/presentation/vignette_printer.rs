use crate::entities::{Declaration, DeclarationStatus, PortalConfig};

use super::utils::{centered, field, rule, short_date};

const WIDTH: usize = 56;
const LABEL_WIDTH: usize = 14;

/// Vignette certificate. The QR code is printed as its payload, the
/// verification link.
pub(crate) struct VignettePrinter;

impl VignettePrinter {
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) fn print_vignette(&self, declaration: &Declaration, config: &PortalConfig) -> String {
        let vehicle = &declaration.vehicle;
        let line = |out: &mut String, label: &str, value: &str| {
            field(out, label, value, LABEL_WIDTH, WIDTH)
        };

        let mut out = String::new();
        rule(&mut out, '*', WIDTH);
        centered(&mut out, "DGRK • TAXE", WIDTH);
        centered(&mut out, "VIGNETTE AUTOMOBILE", WIDTH);
        centered(&mut out, &format!("EXERCICE {}", config.fiscal_year), WIDTH);
        rule(&mut out, '*', WIDTH);
        line(&mut out, "N°", &declaration.id);
        line(&mut out, "Plaque", or_dashes(&vehicle.plate));
        line(&mut out, "Chassis", or_dashes(&vehicle.chassis));
        line(&mut out, "Catégorie", vehicle.category.label());
        line(
            &mut out,
            "Puissance",
            &format!(
                "{} • {}",
                or_default(&vehicle.fiscal_power, "0 CV"),
                or_default(&vehicle.weight, "0 T")
            ),
        );
        if let Some(t) = &declaration.taxpayer {
            line(&mut out, "Titulaire", &t.name);
        }
        line(
            &mut out,
            "Validité",
            &format!(
                "du 01/01/{year} au 31/12/{year}",
                year = config.fiscal_year
            ),
        );
        line(&mut out, "Émise le", &short_date(declaration.created_at));
        line(
            &mut out,
            "Statut",
            match declaration.status {
                DeclarationStatus::Payee => "VALIDE",
                _ => "NON VALIDE",
            },
        );
        rule(&mut out, '-', WIDTH);
        line(&mut out, "QR", &config.verify_url(&declaration.id));
        rule(&mut out, '*', WIDTH);
        out
    }
}

fn or_default<'a>(s: &'a str, default: &'a str) -> &'a str {
    if s.trim().is_empty() {
        default
    } else {
        s
    }
}

fn or_dashes(s: &str) -> &str {
    or_default(s, "-------")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::logic::declaration_generator::DeclarationGenerator;

    fn status_line(text: &str) -> &str {
        text.lines()
            .find(|line| line.starts_with("Statut"))
            .unwrap()
    }

    #[test]
    fn certificate_shows_vehicle_and_validity() {
        let d = DeclarationGenerator::new(2355.0).generate(12);
        let text = VignettePrinter::new().print_vignette(&d, &PortalConfig::default());
        assert!(text.contains("DECL-2026-B9ED82"));
        assert!(text.contains("1012BA21"));
        assert!(text.contains("22 CV • 3 tonnes"));
        assert!(text.contains("du 01/01/2026 au 31/12/2026"));
        assert_eq!(status_line(&text), format!("{:<14} : VALIDE", "Statut"));
        assert!(!text.contains("NON VALIDE"));
        assert!(text.contains("https://tax-portal-two.vercel.app/verify/DECL-2026-B9ED82"));
    }

    #[test]
    fn unpaid_declarations_are_marked_invalid() {
        let d = DeclarationGenerator::new(2355.0).generate(13);
        let text = VignettePrinter::new().print_vignette(&d, &PortalConfig::default());
        assert_eq!(status_line(&text), format!("{:<14} : NON VALIDE", "Statut"));
    }

    #[test]
    fn validity_follows_the_configured_year() {
        let d = DeclarationGenerator::new(2355.0).generate(12);
        let config = PortalConfig {
            fiscal_year: 2027,
            ..Default::default()
        };
        let text = VignettePrinter::new().print_vignette(&d, &config);
        assert!(text.contains("EXERCICE 2027"));
        assert!(text.contains("du 01/01/2027 au 31/12/2027"));
    }
}
