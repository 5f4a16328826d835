use std::fs;

use fractic_server_error::ServerError;
use tracing::warn;

use crate::{
    data::models::import_row_model::{ImportColumn, ImportHeader, ImportRowModel},
    errors::{InvalidCsv, ReadError},
};

/// Reads declaration import sheets exported as CSV.
pub(crate) trait DeclarationsCsvDatasource {
    fn from_string(&self, s: &str) -> Result<Vec<ImportRowModel>, ServerError>;

    fn from_file<P>(&self, path: P) -> Result<Vec<ImportRowModel>, ServerError>
    where
        P: AsRef<std::path::Path>;
}

pub(crate) struct DeclarationsCsvDatasourceImpl;

impl DeclarationsCsvDatasourceImpl {
    pub(crate) fn new() -> Self {
        Self
    }
}

impl DeclarationsCsvDatasource for DeclarationsCsvDatasourceImpl {
    fn from_string(&self, s: &str) -> Result<Vec<ImportRowModel>, ServerError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(s.as_bytes());
        let header =
            ImportHeader::resolve(reader.headers().map_err(|e| InvalidCsv::with_debug(&e))?);
        for column in [ImportColumn::Plaque, ImportColumn::Chassis] {
            if !header.has(column) {
                warn!(column = column.code(), "import sheet lacks a required column");
            }
        }

        reader
            .records()
            .enumerate()
            .map(|(i, r)| {
                r.map_err(|e| InvalidCsv::with_debug(&e))
                    .map(|r| header.row(i + 1, &r))
            })
            // Spreadsheet exports often end with blank lines.
            .filter(|r| !matches!(r, Ok(row) if row.is_blank()))
            .collect()
    }

    fn from_file<P>(&self, path: P) -> Result<Vec<ImportRowModel>, ServerError>
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
    fn rows_are_read_through_the_header() {
        let csv = "NOM,NIF,ADRESSE,PLAQUE,CHASSIS,PUISSANCE_CV,STATUS\n\
                   Josuah Kitona,A123K,\"12 Av. Exemple, Kinshasa\",1234BA01,JNX1,11,Payé\n\
                   ,,,5678BA02,,9,\n";
        let rows = DeclarationsCsvDatasourceImpl::new().from_string(csv).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 1);
        assert_eq!(rows[0].adresse, "12 Av. Exemple, Kinshasa");
        assert!(rows[0].is_valid());
        assert_eq!(rows[1].line, 2);
        assert!(!rows[1].is_valid());
    }

    #[test]
    fn blank_lines_are_dropped() {
        let csv = "PLAQUE,CHASSIS\n1234BA01,JNX1\n,\n";
        let rows = DeclarationsCsvDatasourceImpl::new().from_string(csv).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn short_rows_are_tolerated() {
        let csv = "PLAQUE,CHASSIS,MARQUE\n1234BA01,JNX1\n";
        let rows = DeclarationsCsvDatasourceImpl::new().from_string(csv).unwrap();
        assert_eq!(rows[0].marque, "");
    }

    #[test]
    fn sheet_without_a_chassis_column_is_read_but_not_importable() {
        let csv = "NOM,PLAQUE\nJosuah Kitona,1234BA01\n";
        let rows = DeclarationsCsvDatasourceImpl::new().from_string(csv).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].plaque, "1234BA01");
        assert_eq!(rows[0].missing_fields().as_deref(), Some("missing CHASSIS"));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        assert!(DeclarationsCsvDatasourceImpl::new()
            .from_file("/nonexistent/import.csv")
            .is_err());
    }
}
