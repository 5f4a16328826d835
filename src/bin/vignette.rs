//! Command-line front end for the vignette declaration desk.
//!
//! Declarations are kept in a local JSON file unless the configuration names
//! a hosted database.
//!
//! Usage:
//!   vignette tax --cv 12
//!   vignette tax --cv 8 --category utilitaire_heavy --weight "15 tonnes"
//!   vignette list --query 1234BA --period week
//!   vignette create --name "Josuah Kitona" --nif A1234K --plate 1234BA01 \
//!     --chassis JNX1 --cv 11 --city Kinshasa
//!   vignette receipt DECL-2026-B9F0A1
//!   RUST_LOG=debug vignette --config portal.ron import batch.csv

use std::{path::PathBuf, process::ExitCode, sync::Arc};

use clap::{Parser, Subcommand, ValueEnum};
use fractic_server_error::ServerError;
use tracing::{error, info};

use vignette_tax::{
    datasources::{
        DeclarationsDatasource, DeclarationsJsonFileDatasource, DeclarationsRestDatasource,
    },
    entities::{
        DateWindow, Declaration, DeclarationFilter, DeclarationForm, DeclarationStatus,
        PortalConfig, ReceiptCopy, TaxpayerType, Weight,
    },
    util::VignetteUtil,
};

#[derive(Parser, Debug)]
#[command(name = "vignette")]
#[command(about = "Vehicle tax (vignette) declarations, receipts and bank slips")]
struct Cli {
    /// Portal configuration (RON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Local store used when no hosted database is configured
    #[arg(long, global = true, default_value = "vignette-store.json")]
    store: PathBuf,

    /// Key for the hosted database, overrides the configured one
    #[arg(long, global = true, env = "VIGNETTE_DB_KEY", hide_env_values = true)]
    db_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the tax for a vehicle without storing anything
    Tax {
        #[arg(long)]
        cv: f64,
        #[arg(long, default_value = "")]
        category: String,
        /// Tonnes, bare or as captured ("15", "1,5 T", "10 tonnes")
        #[arg(long)]
        weight: Option<Weight>,
    },
    /// Capture a new declaration
    Create(CreateArgs),
    /// List stored declarations, newest first
    List {
        /// Part of an id, a plate or a taxpayer name
        #[arg(long)]
        query: Option<String>,
        #[arg(long, value_enum, default_value = "all")]
        period: PeriodArg,
    },
    /// Show one stored declaration
    Show { id: String },
    /// Show a stored declaration, or the demo one behind a well-formed id
    Preview {
        id: String,
        /// Also print the receipt
        #[arg(long)]
        receipt: bool,
    },
    /// Print the récépissé
    Receipt {
        id: String,
        /// Print a single copy
        #[arg(long, value_enum)]
        copy: Option<CopyArg>,
    },
    /// Print the bank deposit slip
    Bordereau { id: String },
    /// Print the vignette certificate
    Vignette { id: String },
    /// Check whether a declaration carries a valid vignette
    Verify { id: String },
    /// Import declarations from a CSV sheet
    Import { path: PathBuf },
    /// Delete a stored declaration
    Delete { id: String },
}

#[derive(clap::Args, Debug)]
struct CreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    nif: String,
    #[arg(long, default_value = "")]
    address: String,
    #[arg(long, default_value = "")]
    city: String,
    #[arg(long = "type", value_enum, default_value = "physique")]
    taxpayer_type: TaxpayerTypeArg,
    #[arg(long, default_value = "Vignette Automobile")]
    category: String,
    #[arg(long)]
    plate: String,
    #[arg(long)]
    chassis: String,
    /// Fiscal power, e.g. "11" or "11 CV"
    #[arg(long)]
    cv: String,
    /// Weight, e.g. "2" or "2 tonnes"
    #[arg(long, default_value = "")]
    weight: String,
    #[arg(long, default_value = "")]
    marque: String,
    #[arg(long, default_value = "")]
    modele: String,
    #[arg(long, default_value = "")]
    couleur: String,
    #[arg(long, default_value = "")]
    annee: String,
    #[arg(long, value_enum)]
    status: Option<StatusArg>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TaxpayerTypeArg {
    Physique,
    Morale,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StatusArg {
    Payee,
    EnAttente,
    Facturee,
    Annulee,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PeriodArg {
    All,
    Today,
    Yesterday,
    Week,
    Month,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CopyArg {
    Banque,
    Contribuable,
}

impl From<TaxpayerTypeArg> for TaxpayerType {
    fn from(arg: TaxpayerTypeArg) -> Self {
        match arg {
            TaxpayerTypeArg::Physique => TaxpayerType::PersonnePhysique,
            TaxpayerTypeArg::Morale => TaxpayerType::PersonneMorale,
        }
    }
}

impl From<StatusArg> for DeclarationStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Payee => DeclarationStatus::Payee,
            StatusArg::EnAttente => DeclarationStatus::EnAttente,
            StatusArg::Facturee => DeclarationStatus::Facturee,
            StatusArg::Annulee => DeclarationStatus::Annulee,
        }
    }
}

impl From<PeriodArg> for DateWindow {
    fn from(arg: PeriodArg) -> Self {
        match arg {
            PeriodArg::All => DateWindow::All,
            PeriodArg::Today => DateWindow::Today,
            PeriodArg::Yesterday => DateWindow::Yesterday,
            PeriodArg::Week => DateWindow::Week,
            PeriodArg::Month => DateWindow::Month,
        }
    }
}

impl From<CopyArg> for ReceiptCopy {
    fn from(arg: CopyArg) -> Self {
        match arg {
            CopyArg::Banque => ReceiptCopy::Banque,
            CopyArg::Contribuable => ReceiptCopy::Contribuable,
        }
    }
}

impl From<CreateArgs> for DeclarationForm {
    fn from(args: CreateArgs) -> Self {
        DeclarationForm {
            taxpayer_type: args.taxpayer_type.into(),
            name: args.name,
            nif: args.nif,
            address: args.address,
            city: args.city,
            category: args.category,
            plate: args.plate,
            chassis: args.chassis,
            fiscal_power: args.cv,
            weight: args.weight,
            marque: args.marque,
            modele: args.modele,
            couleur: args.couleur,
            annee: args.annee,
            status: args.status.map(Into::into),
        }
    }
}

fn load_config(cli: &Cli) -> Result<PortalConfig, ServerError> {
    let mut config = match &cli.config {
        Some(path) => PortalConfig::from_ron_file(path)?,
        None => PortalConfig::default(),
    };
    if let (Some(db), Some(key)) = (config.database.as_mut(), &cli.db_key) {
        db.api_key = key.clone();
    }
    Ok(config)
}

fn datasource(
    cli: &Cli,
    config: &PortalConfig,
) -> Result<Arc<dyn DeclarationsDatasource>, ServerError> {
    match &config.database {
        Some(db) => {
            info!(url = %db.url, "using hosted database");
            Ok(Arc::new(DeclarationsRestDatasource::new(db)?))
        }
        None => {
            info!(path = %cli.store.display(), "using local store");
            Ok(Arc::new(DeclarationsJsonFileDatasource::new(&cli.store)))
        }
    }
}

fn summary(d: &Declaration) -> String {
    format!(
        "{:<18} {:<10} {:<12} {:<10} {:>14.2} FC  {}",
        d.id,
        d.created_at.format("%Y-%m-%d"),
        d.vehicle.plate,
        d.status.label(),
        d.tax.total_amount_fc,
        d.taxpayer.as_ref().map(|t| t.name.as_str()).unwrap_or("-"),
    )
}

fn details(d: &Declaration) -> String {
    serde_json::to_string_pretty(d).unwrap_or_else(|_| summary(d))
}

async fn run(cli: Cli) -> Result<(), ServerError> {
    let config = load_config(&cli)?;
    let util = VignetteUtil::new(datasource(&cli, &config)?, config);

    match cli.command {
        Command::Tax {
            cv,
            category,
            weight,
        } => {
            let tax = util.calculate(cv, &category, weight);
            println!("Base (crédit)  : {:.2} USD", tax.credit_amount);
            println!("Base arrondie  : {:.2} USD", tax.rounded_base);
            println!(
                "Frais bancaires: {:.2} USD (timbre {:.2} + taxe {:.2})",
                tax.bank_fee, tax.timbre, tax.taxe
            );
            println!("Total          : {:.2} USD ({})", tax.total_amount, tax.text_amount);
            println!(
                "Total FC       : {:.2} FC",
                tax.total_amount * util.config().exchange_rate
            );
            for line in tax.cash_lines() {
                println!("  {:>5.0} x {}", line.denomination, line.count);
            }
        }
        Command::Create(args) => {
            let declaration = util.create(args.into()).await?;
            println!("{}", summary(&declaration));
        }
        Command::List { query, period } => {
            let filter = DeclarationFilter {
                query,
                window: period.into(),
            };
            for declaration in util.list_filtered(&filter).await? {
                println!("{}", summary(&declaration));
            }
        }
        Command::Show { id } => println!("{}", details(&util.get(&id).await?)),
        Command::Preview { id, receipt } => {
            let declaration = util.preview(&id).await?;
            println!("{}", details(&declaration));
            if receipt {
                println!("{}", util.render_receipt(&declaration));
            }
        }
        Command::Receipt { id, copy } => match copy {
            Some(copy) => {
                println!("{}", util.render_receipt_copy(&util.get(&id).await?, copy.into()))
            }
            None => println!("{}", util.receipt(&id).await?),
        },
        Command::Bordereau { id } => println!("{}", util.bordereau(&id).await?),
        Command::Vignette { id } => println!("{}", util.vignette(&id).await?),
        Command::Verify { id } => {
            let verification = util.verify(&id).await?;
            println!(
                "{} : {} ({})",
                verification.declaration.id,
                if verification.valid {
                    "VALIDE"
                } else {
                    "NON VALIDE"
                },
                verification.declaration.status
            );
            println!("{}", verification.verify_url);
        }
        Command::Import { path } => {
            let report = util.import_csv_file(&path).await?;
            for id in &report.imported {
                println!("imported  {}", id);
            }
            for row in &report.skipped {
                println!("skipped   line {} ({}): {}", row.line, row.plate, row.reason);
            }
            for row in &report.failed {
                println!("failed    line {} ({}): {}", row.line, row.plate, row.error);
            }
        }
        Command::Delete { id } => {
            util.delete(&id).await?;
            println!("deleted {}", id);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
