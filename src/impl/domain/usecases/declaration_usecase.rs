use std::ops::Range;

use async_trait::async_trait;
use chrono::{DateTime, Datelike as _, Utc};
use fractic_server_error::ServerError;
use futures::{stream, StreamExt as _};
use rand::Rng as _;
use tracing::{info, warn};

use crate::{
    data::{
        datasources::{
            declarations_csv_datasource::{DeclarationsCsvDatasource, DeclarationsCsvDatasourceImpl},
            declarations_datasource::DeclarationsDatasource,
        },
        models::import_row_model::ImportRowModel,
        repositories::declarations_repository_impl::DeclarationsRepositoryImpl,
    },
    domain::{
        logic::{
            business_calendar::BusinessCalendar,
            declaration_generator::{generate_note, DeclarationGenerator},
            id_generator::{declaration_sequence, generate_declaration_id, generate_note_id},
            tax_rules::{calculate_vehicle_tax, tax_breakdown},
            utils::parse_leading_number,
        },
        repositories::declarations_repository::DeclarationsRepository,
    },
    entities::{
        Declaration, DeclarationFilter, DeclarationForm, DeclarationMeta, DeclarationPatch,
        DeclarationStatus, FailedRow, ImportReport, NoteDePerception, PortalConfig, SkippedRow, Taxpayer,
        VehicleCategory, VehicleInfo, Verification,
    },
    errors::{DeclarationIdExhausted, DeclarationNotFound, MissingDeclarationField},
};

/// Random sequences for hand-made declarations, clear of the demo range.
const MANUAL_SEQUENCES: Range<u64> = 9000..19000;
/// Bulk imports draw from their own, much wider range.
const IMPORT_SEQUENCES: Range<u64> = 100_000..1_000_000;
const MAX_ID_ATTEMPTS: u32 = 8;
const IMPORT_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SequenceSpace {
    Manual,
    Import,
}

impl SequenceSpace {
    fn range(self) -> Range<u64> {
        match self {
            SequenceSpace::Manual => MANUAL_SEQUENCES,
            SequenceSpace::Import => IMPORT_SEQUENCES,
        }
    }

    fn system_prefix(self) -> &'static str {
        match self {
            SequenceSpace::Manual => "MANUAL",
            SequenceSpace::Import => "IMPORT",
        }
    }
}

#[async_trait]
pub trait DeclarationUsecase: Send + Sync {
    async fn create(
        &self,
        form: DeclarationForm,
        now: DateTime<Utc>,
    ) -> Result<Declaration, ServerError>;

    async fn get(&self, id: &str) -> Result<Declaration, ServerError>;

    async fn list(&self) -> Result<Vec<Declaration>, ServerError>;

    /// Declarations matching the query text, created within the window
    /// counted back from `now`.
    async fn list_filtered(
        &self,
        filter: &DeclarationFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<Declaration>, ServerError>;

    /// A new vehicle always comes with a recomputed tax.
    async fn update(
        &self,
        id: &str,
        patch: DeclarationPatch,
        now: DateTime<Utc>,
    ) -> Result<Declaration, ServerError>;

    async fn delete(&self, id: &str) -> Result<(), ServerError>;

    /// Stored record, or the synthetic one behind a well-formed id.
    async fn preview(&self, id: &str) -> Result<Declaration, ServerError>;

    async fn note(&self, id: &str) -> Result<NoteDePerception, ServerError>;

    async fn verify(&self, id: &str) -> Result<Verification, ServerError>;

    async fn import_csv(
        &self,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<ImportReport, ServerError>;

    async fn import_csv_file<P>(
        &self,
        path: P,
        now: DateTime<Utc>,
    ) -> Result<ImportReport, ServerError>
    where
        P: AsRef<std::path::Path> + Send;
}

pub(crate) struct DeclarationUsecaseImpl<R: DeclarationsRepository> {
    repository: R,
    config: PortalConfig,
    calendar: BusinessCalendar,
    generator: DeclarationGenerator,
    csv_datasource: DeclarationsCsvDatasourceImpl,
}

impl<DS: DeclarationsDatasource> DeclarationUsecaseImpl<DeclarationsRepositoryImpl<DS>> {
    pub(crate) fn new(datasource: DS, config: PortalConfig) -> Self {
        Self::with_repository(DeclarationsRepositoryImpl::new(datasource, config.clone()), config)
    }
}

impl<R: DeclarationsRepository> DeclarationUsecaseImpl<R> {
    pub(crate) fn with_repository(repository: R, config: PortalConfig) -> Self {
        Self {
            repository,
            generator: DeclarationGenerator::new(config.exchange_rate),
            calendar: BusinessCalendar::default(),
            csv_datasource: DeclarationsCsvDatasourceImpl::new(),
            config,
        }
    }

    async fn create_in(
        &self,
        form: DeclarationForm,
        now: DateTime<Utc>,
        space: SequenceSpace,
    ) -> Result<Declaration, ServerError> {
        for (field, value) in [
            ("name", &form.name),
            ("nif", &form.nif),
            ("plate", &form.plate),
            ("chassis", &form.chassis),
        ] {
            if value.trim().is_empty() {
                return Err(MissingDeclarationField::new(field));
            }
        }

        let vehicle = vehicle_from_form(&form);
        let tax = tax_breakdown(&calculate_vehicle_tax(&vehicle), self.config.exchange_rate);
        let timestamp = self.calendar.now_or_business_hours(now);
        let taxpayer = Taxpayer {
            name: form.name.trim().to_string(),
            nif: form.nif.trim().to_uppercase(),
            address: join_address(&form.address, &form.city),
            kind: form.taxpayer_type,
        };

        for _ in 0..MAX_ID_ATTEMPTS {
            let sequence = random_sequence(space.range());
            let id = generate_declaration_id(sequence);
            if self.repository.find_by_id(&id).await?.is_some() {
                warn!(id = %id, "declaration id already taken, drawing again");
                continue;
            }
            let declaration = Declaration {
                id,
                created_at: timestamp,
                updated_at: timestamp,
                status: form.status.unwrap_or(DeclarationStatus::Payee),
                vehicle: vehicle.clone(),
                tax: tax.clone(),
                taxpayer: Some(taxpayer.clone()),
                meta: DeclarationMeta {
                    system_id: format!("{}-{}", space.system_prefix(), sequence),
                    reference: format!("REF-{}-{}", now.year(), sequence),
                    ndp_id: Some(generate_note_id(sequence)),
                    extra: Default::default(),
                },
            };
            match self.repository.save(&declaration).await? {
                Some(stored) => return Ok(stored),
                None => warn!(id = %declaration.id, "declaration id claimed on save, drawing again"),
            }
        }
        Err(DeclarationIdExhausted::new(MAX_ID_ATTEMPTS))
    }

    async fn import_rows(&self, rows: Vec<ImportRowModel>, now: DateTime<Utc>) -> ImportReport {
        let mut report = ImportReport::default();
        let mut valid = Vec::new();
        for row in rows {
            match row.missing_fields() {
                Some(reason) => report.skipped.push(SkippedRow {
                    line: row.line,
                    plate: row.plaque.clone(),
                    reason,
                }),
                None => valid.push(row),
            }
        }

        let outcomes: Vec<_> = stream::iter(valid)
            .map(|row| async move {
                let (line, plate) = (row.line, row.plaque.clone());
                let outcome = self
                    .create_in(row.into_form(), now, SequenceSpace::Import)
                    .await;
                (line, plate, outcome)
            })
            .buffered(IMPORT_CONCURRENCY)
            .collect()
            .await;
        for (line, plate, outcome) in outcomes {
            match outcome {
                Ok(declaration) => report.imported.push(declaration.id),
                Err(e) => {
                    warn!(line, plate = %plate, error = %e, "import row failed");
                    report.failed.push(FailedRow {
                        line,
                        plate,
                        error: e.to_string(),
                    });
                }
            }
        }
        info!(
            imported = report.imported.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "import finished"
        );
        report
    }
}

#[async_trait]
impl<R: DeclarationsRepository> DeclarationUsecase for DeclarationUsecaseImpl<R> {
    async fn create(
        &self,
        form: DeclarationForm,
        now: DateTime<Utc>,
    ) -> Result<Declaration, ServerError> {
        self.create_in(form, now, SequenceSpace::Manual).await
    }

    async fn get(&self, id: &str) -> Result<Declaration, ServerError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| DeclarationNotFound::new(id))
    }

    async fn list(&self) -> Result<Vec<Declaration>, ServerError> {
        self.repository.list().await
    }

    async fn list_filtered(
        &self,
        filter: &DeclarationFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<Declaration>, ServerError> {
        Ok(self
            .repository
            .list()
            .await?
            .into_iter()
            .filter(|declaration| filter.matches(declaration, now))
            .collect())
    }

    async fn update(
        &self,
        id: &str,
        patch: DeclarationPatch,
        now: DateTime<Utc>,
    ) -> Result<Declaration, ServerError> {
        self.repository.update(id, patch, now).await
    }

    async fn delete(&self, id: &str) -> Result<(), ServerError> {
        if self.repository.delete(id).await? {
            Ok(())
        } else {
            Err(DeclarationNotFound::new(id))
        }
    }

    async fn preview(&self, id: &str) -> Result<Declaration, ServerError> {
        if let Some(stored) = self.repository.find_by_id(id).await? {
            return Ok(stored);
        }
        declaration_sequence(id)
            .map(|sequence| self.generator.generate(sequence))
            .ok_or_else(|| DeclarationNotFound::new(id))
    }

    async fn note(&self, id: &str) -> Result<NoteDePerception, ServerError> {
        Ok(generate_note(&self.get(id).await?))
    }

    async fn verify(&self, id: &str) -> Result<Verification, ServerError> {
        let declaration = self.get(id).await?;
        Ok(Verification {
            verify_url: self.config.verify_url(&declaration.id),
            valid: declaration.status == DeclarationStatus::Payee,
            declaration,
        })
    }

    async fn import_csv(
        &self,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<ImportReport, ServerError> {
        let rows = self.csv_datasource.from_string(content)?;
        Ok(self.import_rows(rows, now).await)
    }

    async fn import_csv_file<P>(
        &self,
        path: P,
        now: DateTime<Utc>,
    ) -> Result<ImportReport, ServerError>
    where
        P: AsRef<std::path::Path> + Send,
    {
        let rows = self.csv_datasource.from_file(path)?;
        Ok(self.import_rows(rows, now).await)
    }
}

// Kept out of async fns so the thread-local RNG is never held across an await.
fn random_sequence(range: Range<u64>) -> u64 {
    rand::thread_rng().gen_range(range)
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn join_address(address: &str, city: &str) -> String {
    match (address.trim(), city.trim()) {
        (a, "") => a.to_string(),
        ("", c) => c.to_string(),
        (a, c) => format!("{}, {}", a, c),
    }
}

/// Bare numbers get their unit; anything else is kept as typed.
fn with_unit(raw: &str, unit: &str) -> String {
    let raw = raw.trim();
    if !raw.is_empty() && raw.replace(',', ".").parse::<f64>().is_ok() {
        format!("{} {}", raw, unit)
    } else {
        raw.to_string()
    }
}

fn vehicle_from_form(form: &DeclarationForm) -> VehicleInfo {
    let fiscal_power = match parse_leading_number(&form.fiscal_power) {
        Some(_) => with_unit(&form.fiscal_power, "CV"),
        None => "0 CV".to_string(),
    };
    VehicleInfo {
        category: VehicleCategory::from_label(&form.category),
        plate: form.plate.trim().to_uppercase(),
        chassis: form.chassis.trim().to_uppercase(),
        fiscal_power,
        weight: with_unit(&form.weight, "tonnes"),
        marque: non_empty(&form.marque),
        modele: non_empty(&form.modele),
        genre: None,
        couleur: non_empty(&form.couleur),
        annee: non_empty(&form.annee),
    }
}
