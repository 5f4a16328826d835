use std::fs;

use fractic_server_error::ServerError;
use ron::from_str;

use crate::{
    entities::PortalConfig,
    errors::{InvalidRon, ReadError},
};

pub(crate) trait PortalConfigRonDatasource {
    fn from_string(&self, s: &str) -> Result<PortalConfig, ServerError>;

    fn from_file<P>(&self, path: P) -> Result<PortalConfig, ServerError>
    where
        P: AsRef<std::path::Path>;
}

pub(crate) struct PortalConfigRonDatasourceImpl;

impl PortalConfigRonDatasourceImpl {
    pub(crate) fn new() -> Self {
        Self
    }
}

impl PortalConfigRonDatasource for PortalConfigRonDatasourceImpl {
    fn from_string(&self, s: &str) -> Result<PortalConfig, ServerError> {
        from_str(s).map_err(|e| InvalidRon::with_debug("PortalConfig", &e))
    }

    fn from_file<P>(&self, path: P) -> Result<PortalConfig, ServerError>
    where
        P: AsRef<std::path::Path>,
    {
        self.from_string(&fs::read_to_string(path).map_err(|e| ReadError::with_debug(&e))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_fields_keep_defaults() {
        let config = PortalConfigRonDatasourceImpl::new()
            .from_string("(exchange_rate: 2800.0, bank: (teller: \"KABONGO\"))")
            .unwrap();
        assert_eq!(config.exchange_rate, 2800.0);
        assert_eq!(config.fiscal_year, 2026);
        assert_eq!(config.bank.teller, "KABONGO");
        assert_eq!(config.bank.account, "33000061711-79");
        assert!(config.database.is_none());
    }

    #[test]
    fn database_section_is_read() {
        let config = PortalConfigRonDatasourceImpl::new()
            .from_string(
                "(database: Some((url: \"https://db.example.test/\", api_key: \"k\")))",
            )
            .unwrap();
        let db = config.database.unwrap();
        assert_eq!(db.url, "https://db.example.test/");
        assert_eq!(db.api_key, "k");
    }

    #[test]
    fn malformed_config_is_rejected() {
        assert!(PortalConfigRonDatasourceImpl::new()
            .from_string("(exchange_rate: \"lots\")")
            .is_err());
    }
}
