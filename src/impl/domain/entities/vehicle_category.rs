use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VehicleCategory {
    VignetteAutomobile,
    Motocycle,
    Utilitaire,
    Touristique,
    TouristiqueLight,
    UtilitaireHeavy,
    Tracteur,
    Remorque,
    TransportPublic,
    ImmatriculeIt,
    Exonere,
    /// Free-form label from imports or legacy rows.
    Other(String),
}

impl VehicleCategory {
    pub fn label(&self) -> &str {
        match self {
            VehicleCategory::VignetteAutomobile => "Vignette Automobile",
            VehicleCategory::Motocycle => "Motocycle",
            VehicleCategory::Utilitaire => "Véhicule utilitaire",
            VehicleCategory::Touristique => "Véhicule touristique",
            VehicleCategory::TouristiqueLight => "touristique_light",
            VehicleCategory::UtilitaireHeavy => "utilitaire_heavy",
            VehicleCategory::Tracteur => "Véhicule tracteur",
            VehicleCategory::Remorque => "Véhicule remorque",
            VehicleCategory::TransportPublic => "Transport public",
            VehicleCategory::ImmatriculeIt => "Immatriculé IT",
            VehicleCategory::Exonere => "Exonéré",
            VehicleCategory::Other(s) => s,
        }
    }

    /// Lenient parse. Matching is case-insensitive; unknown labels are kept
    /// verbatim as `Other`.
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        match trimmed.to_lowercase().as_str() {
            "" | "vignette automobile" => VehicleCategory::VignetteAutomobile,
            "motocycle" => VehicleCategory::Motocycle,
            "véhicule utilitaire" | "vehicule utilitaire" => VehicleCategory::Utilitaire,
            "véhicule touristique" | "vehicule touristique" => VehicleCategory::Touristique,
            "touristique_light" | "touristique_ligtht" => VehicleCategory::TouristiqueLight,
            "utilitaire_heavy" => VehicleCategory::UtilitaireHeavy,
            "véhicule tracteur" | "vehicule tracteur" => VehicleCategory::Tracteur,
            "véhicule remorque" | "vehicule remorque" => VehicleCategory::Remorque,
            "transport public" => VehicleCategory::TransportPublic,
            "immatriculé it" | "immatricule it" => VehicleCategory::ImmatriculeIt,
            "exonéré" | "exonere" => VehicleCategory::Exonere,
            _ => VehicleCategory::Other(trimmed.to_string()),
        }
    }
}

impl std::fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for VehicleCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for VehicleCategory {
    fn deserialize<D>(deserializer: D) -> Result<VehicleCategory, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(VehicleCategory::from_label(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_back_to_the_same_category() {
        for c in [
            VehicleCategory::VignetteAutomobile,
            VehicleCategory::Utilitaire,
            VehicleCategory::TouristiqueLight,
            VehicleCategory::UtilitaireHeavy,
            VehicleCategory::ImmatriculeIt,
            VehicleCategory::Exonere,
        ] {
            assert_eq!(VehicleCategory::from_label(c.label()), c);
        }
    }

    #[test]
    fn misspelled_light_category_is_accepted() {
        assert_eq!(
            VehicleCategory::from_label(" Touristique_Ligtht "),
            VehicleCategory::TouristiqueLight
        );
    }

    #[test]
    fn unknown_label_is_preserved() {
        let c = VehicleCategory::from_label("Camion benne");
        assert_eq!(c, VehicleCategory::Other("Camion benne".to_string()));
        assert_eq!(c.to_string(), "Camion benne");
    }
}
