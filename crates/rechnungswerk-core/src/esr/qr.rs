// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Data handed to an external QR-bill generator, and the generator contract.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::RechnungswerkError;

/// Currency printed on QR bills.
pub const QR_BILL_CURRENCY: &str = "CHF";

/// Language of the QR-bill labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    De,
    Fr,
    It,
    Rm,
    En,
}

/// Structured postal address of a creditor or debtor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrAddress {
    pub name: String,
    pub street: String,
    pub house_number: String,
    pub postal_code: String,
    pub town: String,
    /// ISO 3166-1 alpha-2 country code.
    pub country_code: String,
}

/// Everything a QR-bill generator needs to draw the payment part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrBill {
    pub account: String,
    pub amount: Decimal,
    pub currency: String,
    pub reference: String,
    pub unstructured_message: Option<String>,
    pub creditor: QrAddress,
    pub debtor: QrAddress,
    pub language: Language,
}

/// Validation failure reported by a QR-bill generator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("QR bill field {field:?} is invalid: {message_key}")]
pub struct QrBillValidationError {
    /// Name of the offending field.
    pub field: String,
    /// Message key describing the problem, as defined by the generator.
    pub message_key: String,
}

impl From<QrBillValidationError> for RechnungswerkError {
    fn from(err: QrBillValidationError) -> Self {
        Self::QrBill {
            field: err.field,
            key: err.message_key,
        }
    }
}

/// Renders a QR bill to an image.
///
/// Symbol encoding and the payment-part graphics are left to implementors.
pub trait QrBillGenerator: Send + Sync {
    /// Render `bill` as PNG bytes covering the whole payment part.
    fn render_png(&self, bill: &QrBill) -> Result<Vec<u8>, QrBillValidationError>;
}
