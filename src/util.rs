use chrono::Utc;
use fractic_server_error::ServerError;

use crate::{
    data::{
        datasources::{
            declarations_datasource::DeclarationsDatasource,
            portal_config_ron_datasource::{
                PortalConfigRonDatasource as _, PortalConfigRonDatasourceImpl,
            },
        },
        repositories::declarations_repository_impl::DeclarationsRepositoryImpl,
    },
    domain::{
        logic::{declaration_generator::generate_note, tax_rules::calculate_tax},
        usecases::declaration_usecase::{DeclarationUsecase as _, DeclarationUsecaseImpl},
    },
    entities::{
        Declaration, DeclarationFilter, DeclarationForm, DeclarationPatch, ImportReport, NoteDePerception,
        PortalConfig, ReceiptCopy, TaxCalculation, Verification, Weight,
    },
    presentation::{
        bordereau_printer::BordereauPrinter, receipt_printer::ReceiptPrinter,
        vignette_printer::VignettePrinter,
    },
};

pub type Document = String;

/// Entry point: declaration store plus the printable documents, over any
/// datasource.
pub struct VignetteUtil<DS: DeclarationsDatasource> {
    declaration_usecase: DeclarationUsecaseImpl<DeclarationsRepositoryImpl<DS>>,
    config: PortalConfig,
    receipt_printer: ReceiptPrinter,
    bordereau_printer: BordereauPrinter,
    vignette_printer: VignettePrinter,
}

impl<DS: DeclarationsDatasource> VignetteUtil<DS> {
    pub fn new(datasource: DS, config: PortalConfig) -> Self {
        Self {
            declaration_usecase: DeclarationUsecaseImpl::new(datasource, config.clone()),
            config,
            receipt_printer: ReceiptPrinter::new(),
            bordereau_printer: BordereauPrinter::new(),
            vignette_printer: VignettePrinter::new(),
        }
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    pub fn calculate(
        &self,
        fiscal_power: f64,
        vehicle_category: &str,
        weight: Option<Weight>,
    ) -> TaxCalculation {
        calculate_tax(fiscal_power, vehicle_category, weight)
    }

    pub async fn create(&self, form: DeclarationForm) -> Result<Declaration, ServerError> {
        self.declaration_usecase.create(form, Utc::now()).await
    }

    pub async fn get(&self, id: &str) -> Result<Declaration, ServerError> {
        self.declaration_usecase.get(id).await
    }

    pub async fn list(&self) -> Result<Vec<Declaration>, ServerError> {
        self.declaration_usecase.list().await
    }

    /// Date windows are counted back from the current Kinshasa day.
    pub async fn list_filtered(
        &self,
        filter: &DeclarationFilter,
    ) -> Result<Vec<Declaration>, ServerError> {
        self.declaration_usecase
            .list_filtered(filter, Utc::now())
            .await
    }

    pub async fn update(
        &self,
        id: &str,
        patch: DeclarationPatch,
    ) -> Result<Declaration, ServerError> {
        self.declaration_usecase.update(id, patch, Utc::now()).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ServerError> {
        self.declaration_usecase.delete(id).await
    }

    pub async fn preview(&self, id: &str) -> Result<Declaration, ServerError> {
        self.declaration_usecase.preview(id).await
    }

    pub async fn note(&self, id: &str) -> Result<NoteDePerception, ServerError> {
        self.declaration_usecase.note(id).await
    }

    pub async fn verify(&self, id: &str) -> Result<Verification, ServerError> {
        self.declaration_usecase.verify(id).await
    }

    pub async fn import_csv(&self, content: &str) -> Result<ImportReport, ServerError> {
        self.declaration_usecase.import_csv(content, Utc::now()).await
    }

    pub async fn import_csv_file<P>(&self, path: P) -> Result<ImportReport, ServerError>
    where
        P: AsRef<std::path::Path> + Send,
    {
        self.declaration_usecase
            .import_csv_file(path, Utc::now())
            .await
    }

    pub async fn receipt(&self, id: &str) -> Result<Document, ServerError> {
        Ok(self.render_receipt(&self.get(id).await?))
    }

    pub async fn bordereau(&self, id: &str) -> Result<Document, ServerError> {
        Ok(self.render_bordereau(&self.get(id).await?))
    }

    pub async fn vignette(&self, id: &str) -> Result<Document, ServerError> {
        Ok(self.render_vignette(&self.get(id).await?))
    }

    /// Both receipt copies for a declaration already at hand (stored or
    /// previewed).
    pub fn render_receipt(&self, declaration: &Declaration) -> Document {
        self.receipt_printer
            .print_receipt(declaration, &generate_note(declaration), &self.config)
    }

    pub fn render_receipt_copy(&self, declaration: &Declaration, copy: ReceiptCopy) -> Document {
        let mut out = String::new();
        self.receipt_printer.print_copy(
            &mut out,
            copy,
            declaration,
            &generate_note(declaration),
            &self.config,
        );
        out
    }

    pub fn render_bordereau(&self, declaration: &Declaration) -> Document {
        self.bordereau_printer
            .print_bordereau(declaration, &self.config)
    }

    pub fn render_vignette(&self, declaration: &Declaration) -> Document {
        self.vignette_printer
            .print_vignette(declaration, &self.config)
    }
}

impl PortalConfig {
    pub fn from_ron_str(s: &str) -> Result<Self, ServerError> {
        PortalConfigRonDatasourceImpl::new().from_string(s)
    }

    pub fn from_ron_file<P>(path: P) -> Result<Self, ServerError>
    where
        P: AsRef<std::path::Path>,
    {
        PortalConfigRonDatasourceImpl::new().from_file(path)
    }
}
