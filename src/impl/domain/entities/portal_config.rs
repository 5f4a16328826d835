use serde_derive::Deserialize;

/// Hosted Postgres reached through its PostgREST interface.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default)]
    pub api_key: String,
}

/// Fixed labels printed on the bank slip.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BankDesk {
    pub account: String,
    pub agency: String,
    pub cashier_desk: String,
    pub teller: String,
    pub manager: String,
}

impl Default for BankDesk {
    fn default() -> Self {
        Self {
            account: "33000061711-79".to_string(),
            agency: "00010 AGENCE GOMBE".to_string(),
            cashier_desk: "140 CAISSE SEC. GOMBE USD - 140".to_string(),
            teller: "VNGOMBA".to_string(),
            manager: "DIRECTEUR GENERAL".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Host used for QR verification links (`{base}/verify/{id}`).
    pub verify_base_url: String,
    /// FC per USD.
    pub exchange_rate: f64,
    pub fiscal_year: i32,
    pub bank: BankDesk,
    pub database: Option<DatabaseConfig>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            verify_base_url: "https://tax-portal-two.vercel.app".to_string(),
            exchange_rate: 2355.0,
            fiscal_year: 2026,
            bank: BankDesk::default(),
            database: None,
        }
    }
}

impl PortalConfig {
    pub fn verify_url(&self, declaration_id: &str) -> String {
        format!(
            "{}/verify/{}",
            self.verify_base_url.trim_end_matches('/'),
            declaration_id
        )
    }
}
