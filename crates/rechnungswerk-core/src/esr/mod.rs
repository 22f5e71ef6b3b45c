// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ESR module — check digits, account encoding, coding lines, and the payment
// slip variants (post, bank, dummy, QR bill).

pub mod account;
pub mod checksum;
pub mod qr;
pub mod slip;

pub use account::{EncodedAccount, coding_line, parse_account};
pub use checksum::{carry, check_digit};
pub use qr::{Language, QrAddress, QrBill, QrBillGenerator, QrBillValidationError};
pub use slip::{
    DUMMY_PLACEHOLDER, EsrFields, PaymentSlip, QrFields, SlipSpec, SlipVariant, parse_reference,
};
