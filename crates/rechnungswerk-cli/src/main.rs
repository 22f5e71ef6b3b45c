// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rechnungswerk CLI — render invoices from JSON and inspect ESR data.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use rechnungswerk_core::esr::{parse_account, parse_reference};
use rechnungswerk_core::{Invoice, InvoiceConfig, PaymentSlip};
use rechnungswerk_document::{InvoiceGenerator, PdfReader};

#[derive(Parser)]
#[command(name = "rechnungswerk", about = "Invoice PDFs with Swiss payment slips", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an invoice described in JSON to PDF
    Render {
        /// Invoice JSON file
        #[arg(short, long)]
        invoice: PathBuf,

        /// Layout configuration JSON file (defaults apply when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Validate a postal account (VV-XXX-P) and print its encoded form
    Account {
        account: String,
    },

    /// Print the coding line of an orange payment slip
    CodingLine {
        /// Postal account, e.g. 01-162-8
        #[arg(long)]
        account: String,

        /// Amount in francs with two decimals, e.g. 3949.75
        #[arg(long)]
        amount: Decimal,

        /// Reference number, up to 27 digits; spaces are ignored
        #[arg(long)]
        reference: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            invoice,
            config,
            output,
        } => {
            let config = match config {
                Some(path) => InvoiceConfig::from_json_file(&path)
                    .with_context(|| format!("failed to load configuration {}", path.display()))?,
                None => InvoiceConfig::default(),
            };
            let json = std::fs::read_to_string(&invoice)
                .with_context(|| format!("failed to read invoice {}", invoice.display()))?;
            let invoice: Invoice = serde_json::from_str(&json).context("invalid invoice JSON")?;

            let generator = InvoiceGenerator::new(config).context("invalid configuration")?;
            generator
                .write_to_file(&invoice, &output)
                .with_context(|| format!("failed to render {:?}", invoice.title))?;

            let pages = PdfReader::open(&output)?.page_count();
            tracing::info!(pages, output = %output.display(), "Invoice rendered");
            println!("Rendered {} page(s) → {}", pages, output.display());
        }

        Commands::Account { account } => {
            let encoded = parse_account(&account).with_context(|| format!("invalid account {account:?}"))?;
            println!("{}", encoded.as_str());
        }

        Commands::CodingLine {
            account,
            amount,
            reference,
        } => {
            let reference = parse_reference(&reference).context("invalid reference")?;
            let slip = PaymentSlip::post(Vec::new(), reference, amount, account, Vec::new())
                .context("invalid payment slip")?;
            println!("{}", slip.coding_line());
            println!("Reference: {}", slip.reference_display_text());
        }
    }

    Ok(())
}
