// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Rechnungswerk.

use rust_decimal::Decimal;
use thiserror::Error;

/// Top-level error type for all Rechnungswerk operations.
#[derive(Debug, Error)]
pub enum RechnungswerkError {
    // -- Account validation --
    #[error("account must have the form VV-XXX-P, got {0:?}")]
    InvalidAccountFormat(String),

    #[error("unsupported article code {0:?}, only 01 is supported")]
    UnsupportedArticleCode(String),

    #[error("order number {0:?} is longer than 6 digits")]
    OrderNumberTooLong(String),

    #[error("order number {0:?} is not numeric")]
    InvalidOrderNumber(String),

    #[error("check digit {found:?} is invalid, expected {expected}")]
    InvalidCheckDigit { expected: u8, found: String },

    #[error("not a decimal digit: {0:?}")]
    NotADigit(char),

    // -- Slip validation --
    #[error("amount must have exactly 2 fractional digits, got scale {0}")]
    AmountScale(u32),

    #[error("amount {0} cannot be printed on a payment slip")]
    AmountOutOfRange(Decimal),

    #[error("bank slips allow at most 2 payee lines, got {0}")]
    TooManyPayeeLines(usize),

    // -- QR bill --
    #[error("QR bill field {field:?} is invalid: {key}")]
    QrBill { field: String, key: String },

    #[error("invoice carries a QR slip but no QR bill generator is configured")]
    QrBillGeneratorMissing,

    // -- Rendering --
    #[error("layout failed: {0}")]
    Layout(String),

    #[error("{context}: {source}")]
    Generation {
        context: String,
        #[source]
        source: Box<RechnungswerkError>,
    },

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RechnungswerkError {
    /// Wrap `self` as a fatal generation failure, unless it already is one.
    pub fn into_generation(self, context: impl Into<String>) -> Self {
        match self {
            already @ Self::Generation { .. } => already,
            other => Self::Generation {
                context: context.into(),
                source: Box::new(other),
            },
        }
    }

    /// True for errors raised while validating slip input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidAccountFormat(_)
                | Self::UnsupportedArticleCode(_)
                | Self::OrderNumberTooLong(_)
                | Self::InvalidOrderNumber(_)
                | Self::InvalidCheckDigit { .. }
                | Self::NotADigit(_)
                | Self::AmountScale(_)
                | Self::AmountOutOfRange(_)
                | Self::TooManyPayeeLines(_)
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, RechnungswerkError>;
