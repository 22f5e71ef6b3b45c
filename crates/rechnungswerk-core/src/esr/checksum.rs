// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recursive modulo-10 check digit used on ESR payment slips.

use crate::error::{RechnungswerkError, Result};

/// Carry transition table of the recursive modulo-10 scheme.
const CARRY_TABLE: [u8; 10] = [0, 9, 4, 6, 8, 2, 7, 1, 3, 5];

/// Fold `digits` through the carry table and return the final carry.
///
/// A digit string that already ends in its own check digit folds to 0.
pub fn carry(digits: &str) -> Result<u8> {
    digits.chars().try_fold(0u8, |carry, ch| {
        let digit = ch.to_digit(10).ok_or(RechnungswerkError::NotADigit(ch))? as u8;
        Ok(CARRY_TABLE[usize::from((carry + digit) % 10)])
    })
}

/// Compute the check digit for a string of decimal digits.
///
/// ```
/// use rechnungswerk_core::esr::check_digit;
///
/// assert_eq!(check_digit("01000162").unwrap(), 8);
/// ```
pub fn check_digit(digits: &str) -> Result<u8> {
    Ok((10 - carry(digits)?) % 10)
}
