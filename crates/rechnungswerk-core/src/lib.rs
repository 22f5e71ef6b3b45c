// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rechnungswerk — Core types, configuration, error definitions, and ESR
// payment-slip encoding shared across all crates.

pub mod config;
pub mod error;
pub mod esr;
pub mod types;

pub use config::InvoiceConfig;
pub use error::{RechnungswerkError, Result};
pub use esr::PaymentSlip;
pub use types::*;
