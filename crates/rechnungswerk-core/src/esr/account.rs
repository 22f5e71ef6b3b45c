// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ESR participant accounts and the machine-readable coding line.

use std::fmt;

use super::checksum::check_digit;
use crate::error::{RechnungswerkError, Result};

/// The only article code accepted on orange payment slips.
pub const ARTICLE_CODE: &str = "01";
/// Maximum number of digits of the order number part of an account.
const ORDER_NUMBER_DIGITS: usize = 6;
/// Width of the zero-padded reference number on the coding line.
pub const REFERENCE_DIGITS: usize = 27;
/// Largest franc amount that fits the 8-digit amount field.
pub const MAX_FRANCS: u64 = 99_999_999;

/// A validated participant account in its 9-digit encoded form.
///
/// `01-162-8` encodes as `010001628`: the article code, the order number
/// zero-padded to 6 digits, and the check digit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedAccount(String);

impl EncodedAccount {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EncodedAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate an account of the form `VV-XXX-P` and encode it.
///
/// Each kind of malformed input maps to its own error variant so callers
/// can tell the user which part of the account is wrong.
pub fn parse_account(account: &str) -> Result<EncodedAccount> {
    let parts: Vec<&str> = account.split('-').collect();
    let [article, order, check] = parts.as_slice() else {
        return Err(RechnungswerkError::InvalidAccountFormat(account.to_string()));
    };

    if *article != ARTICLE_CODE {
        return Err(RechnungswerkError::UnsupportedArticleCode(article.to_string()));
    }
    if order.len() > ORDER_NUMBER_DIGITS {
        return Err(RechnungswerkError::OrderNumberTooLong(order.to_string()));
    }
    if order.is_empty() || !order.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RechnungswerkError::InvalidOrderNumber(order.to_string()));
    }

    let body = format!("{ARTICLE_CODE}{order:0>width$}", width = ORDER_NUMBER_DIGITS);
    let expected = check_digit(&body)?;
    match check.parse::<u8>() {
        Ok(found) if found == expected => Ok(EncodedAccount(format!("{body}{expected}"))),
        _ => Err(RechnungswerkError::InvalidCheckDigit {
            expected,
            found: check.to_string(),
        }),
    }
}

/// Build the coding line printed in the OCR band of the slip.
///
/// Layout: `01`, francs as 8 digits, rappen as 2 digits, the check digit
/// over those 12 characters, `>`, the reference zero-padded to 27 digits,
/// `+ `, the encoded account, and a closing `>`.
pub fn coding_line(
    francs: u64,
    rappen: u32,
    reference: u128,
    account: &EncodedAccount,
) -> Result<String> {
    if francs > MAX_FRANCS || rappen > 99 {
        return Err(RechnungswerkError::Layout(format!(
            "amount {francs}.{rappen:02} does not fit the coding line"
        )));
    }
    let amount = format!("{ARTICLE_CODE}{francs:08}{rappen:02}");
    let amount_check = check_digit(&amount)?;
    Ok(format!(
        "{amount}{amount_check}>{reference:0>width$}+ {account}>",
        width = REFERENCE_DIGITS
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(raw: &str) -> EncodedAccount {
        parse_account(raw).unwrap()
    }

    #[test]
    fn encodes_valid_account() {
        assert_eq!(account("01-162-8").as_str(), "010001628");
        assert_eq!(account("01-000162-8").as_str(), "010001628");
    }

    #[test]
    fn each_malformed_part_has_its_own_error() {
        assert!(matches!(
            parse_account("01-162"),
            Err(RechnungswerkError::InvalidAccountFormat(_))
        ));
        assert!(matches!(
            parse_account("01-1-6-2"),
            Err(RechnungswerkError::InvalidAccountFormat(_))
        ));
        assert!(matches!(
            parse_account("02-162-8"),
            Err(RechnungswerkError::UnsupportedArticleCode(code)) if code == "02"
        ));
        assert!(matches!(
            parse_account("01-1234567-8"),
            Err(RechnungswerkError::OrderNumberTooLong(_))
        ));
        assert!(matches!(
            parse_account("01-16x-8"),
            Err(RechnungswerkError::InvalidOrderNumber(_))
        ));
        assert!(matches!(
            parse_account("01-162-7"),
            Err(RechnungswerkError::InvalidCheckDigit { expected: 8, .. })
        ));
        assert!(matches!(
            parse_account("01-162-x"),
            Err(RechnungswerkError::InvalidCheckDigit { .. })
        ));
    }

    #[test]
    fn coding_line_matches_reference_slip() {
        let line = coding_line(3949, 75, 120000000000234478943216899, &account("01-162-8")).unwrap();
        assert_eq!(line, "0100003949753>120000000000234478943216899+ 010001628>");
    }

    #[test]
    fn coding_line_pads_short_reference() {
        let line = coding_line(1, 5, 1236, &account("01-162-8")).unwrap();
        assert!(line.contains(">000000000000000000000001236+ "));
        assert_eq!(line.len(), "0100003949753>".len() + 27 + "+ 010001628>".len());
    }
}
