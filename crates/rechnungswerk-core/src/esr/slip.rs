// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Payment slip model: one immutable slip per invoice, in one of four variants.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::account::{EncodedAccount, MAX_FRANCS, REFERENCE_DIGITS, coding_line, parse_account};
use super::qr::{Language, QR_BILL_CURRENCY, QrAddress, QrBill};
use crate::error::{RechnungswerkError, Result};

/// Text printed in every field of a dummy slip.
pub const DUMMY_PLACEHOLDER: &str = "XXXXXXX";
/// Maximum number of payee lines on a bank slip.
pub const MAX_BANK_PAYEE_LINES: usize = 2;
/// Amounts are printed in francs and rappen, so exactly two decimals.
const AMOUNT_SCALE: u32 = 2;
/// Digits per group in the human-readable reference.
const REFERENCE_GROUP: usize = 5;

/// Name, address, and account lines shared by the orange slip variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EsrFields {
    pub account: EncodedAccount,
    /// "Einbezahlt von": the paying party.
    pub payer: Vec<String>,
    /// "Einzahlung für": the receiving party, or its bank on bank slips.
    pub payee: Vec<String>,
}

/// Parties and options of a QR bill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrFields {
    pub creditor: QrAddress,
    pub debtor: QrAddress,
    pub additional_text: Option<String>,
    pub language: Language,
}

/// The closed set of slip kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlipVariant {
    /// Orange slip payable at the post office.
    Post(EsrFields),
    /// Orange slip of a bank, adding the final beneficiary ("zugunsten von").
    Bank {
        fields: EsrFields,
        beneficiary: Vec<String>,
    },
    /// Placeholder slip that shows where the real one goes.
    Dummy,
    /// Swiss QR bill, rendered by an external generator.
    Qr(QrFields),
}

impl SlipVariant {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Post(_) => "post",
            Self::Bank { .. } => "bank",
            Self::Dummy => "dummy",
            Self::Qr(_) => "qr",
        }
    }
}

/// A validated payment slip.
///
/// All input is checked at construction, so every accessor is infallible
/// and the coding line can always be produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SlipSpec", into = "SlipSpec")]
pub struct PaymentSlip {
    reference: u128,
    amount: Decimal,
    account: String,
    variant: SlipVariant,
}

impl PaymentSlip {
    /// An orange post-office slip.
    pub fn post(
        payee: Vec<String>,
        reference: u128,
        amount: Decimal,
        account: impl Into<String>,
        payer: Vec<String>,
    ) -> Result<Self> {
        let account = account.into();
        validate_amount(amount)?;
        let fields = EsrFields {
            account: parse_account(&account)?,
            payer,
            payee,
        };
        Ok(Self {
            reference,
            amount,
            account,
            variant: SlipVariant::Post(fields),
        })
    }

    /// An orange bank slip. The payee names the bank and has at most two lines.
    pub fn bank(
        payee: Vec<String>,
        beneficiary: Vec<String>,
        reference: u128,
        amount: Decimal,
        account: impl Into<String>,
        payer: Vec<String>,
    ) -> Result<Self> {
        let account = account.into();
        validate_amount(amount)?;
        let encoded = parse_account(&account)?;
        if payee.len() > MAX_BANK_PAYEE_LINES {
            return Err(RechnungswerkError::TooManyPayeeLines(payee.len()));
        }
        Ok(Self {
            reference,
            amount,
            account,
            variant: SlipVariant::Bank {
                fields: EsrFields {
                    account: encoded,
                    payer,
                    payee,
                },
                beneficiary,
            },
        })
    }

    /// A placeholder slip. Every text field reads [`DUMMY_PLACEHOLDER`].
    pub fn dummy() -> Self {
        Self {
            reference: 0,
            amount: Decimal::new(0, AMOUNT_SCALE),
            account: DUMMY_PLACEHOLDER.to_string(),
            variant: SlipVariant::Dummy,
        }
    }

    /// A QR bill. `account` is the QR-IBAN of the creditor.
    pub fn qr(
        creditor: QrAddress,
        reference: u128,
        amount: Decimal,
        account: impl Into<String>,
        debtor: QrAddress,
        additional_text: Option<String>,
        language: Option<Language>,
    ) -> Result<Self> {
        validate_amount(amount)?;
        Ok(Self {
            reference,
            amount,
            account: account.into(),
            variant: SlipVariant::Qr(QrFields {
                creditor,
                debtor,
                additional_text,
                language: language.unwrap_or_default(),
            }),
        })
    }

    // -- Raw values -----------------------------------------------------------

    pub fn reference(&self) -> u128 {
        self.reference
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn variant(&self) -> &SlipVariant {
        &self.variant
    }

    pub fn is_dummy(&self) -> bool {
        matches!(self.variant, SlipVariant::Dummy)
    }

    /// Whole francs of the amount.
    pub fn amount_francs(&self) -> u64 {
        // Range checked at construction.
        self.amount.trunc().to_u64().unwrap_or_default()
    }

    /// Rappen (hundredths) of the amount.
    pub fn amount_rappen(&self) -> u32 {
        (self.amount.fract() * Decimal::ONE_HUNDRED)
            .to_u32()
            .unwrap_or_default()
    }

    // -- Printed texts --------------------------------------------------------

    /// Francs zero-padded to the 8 digits of the coding line.
    pub fn amount_francs_text(&self) -> String {
        if self.is_dummy() {
            return String::new();
        }
        format!("{:08}", self.amount_francs())
    }

    /// Francs as printed in the amount boxes.
    pub fn amount_francs_display(&self) -> String {
        if self.is_dummy() {
            return String::new();
        }
        self.amount_francs().to_string()
    }

    /// Rappen as two digits.
    pub fn amount_rappen_text(&self) -> String {
        if self.is_dummy() {
            return String::new();
        }
        format!("{:02}", self.amount_rappen())
    }

    /// Reference in groups of five digits counted from the right.
    pub fn reference_display_text(&self) -> String {
        if self.is_dummy() {
            return DUMMY_PLACEHOLDER.to_string();
        }
        group_digits(&self.reference.to_string(), REFERENCE_GROUP)
    }

    /// Reference as printed on the receipt part.
    pub fn reference_receipt_text(&self) -> String {
        if self.is_dummy() {
            return DUMMY_PLACEHOLDER.to_string();
        }
        self.reference.to_string()
    }

    /// Reference zero-padded to 27 digits.
    pub fn reference_padded(&self) -> String {
        if self.is_dummy() {
            return DUMMY_PLACEHOLDER.to_string();
        }
        format!("{:0>width$}", self.reference, width = REFERENCE_DIGITS)
    }

    /// Account as printed in both account boxes.
    pub fn account_display(&self) -> &str {
        &self.account
    }

    pub fn payer_lines(&self) -> Vec<String> {
        match &self.variant {
            SlipVariant::Post(fields) | SlipVariant::Bank { fields, .. } => fields.payer.clone(),
            SlipVariant::Dummy => placeholder_lines(),
            SlipVariant::Qr(_) => Vec::new(),
        }
    }

    pub fn payee_lines(&self) -> Vec<String> {
        match &self.variant {
            SlipVariant::Post(fields) | SlipVariant::Bank { fields, .. } => fields.payee.clone(),
            SlipVariant::Dummy => placeholder_lines(),
            SlipVariant::Qr(_) => Vec::new(),
        }
    }

    /// Final beneficiary; only bank slips carry one.
    pub fn beneficiary_lines(&self) -> Vec<String> {
        match &self.variant {
            SlipVariant::Bank { beneficiary, .. } => beneficiary.clone(),
            _ => Vec::new(),
        }
    }

    /// Machine-readable line for the OCR band.
    ///
    /// QR bills carry no coding line and yield an empty string.
    pub fn coding_line(&self) -> String {
        match &self.variant {
            SlipVariant::Post(fields) | SlipVariant::Bank { fields, .. } => coding_line(
                self.amount_francs(),
                self.amount_rappen(),
                self.reference,
                &fields.account,
            )
            // Amount and account were validated at construction.
            .unwrap_or_default(),
            SlipVariant::Dummy => DUMMY_PLACEHOLDER.to_string(),
            SlipVariant::Qr(_) => String::new(),
        }
    }

    /// Data handed to a QR-bill generator, for QR slips only.
    pub fn qr_bill(&self) -> Option<QrBill> {
        let SlipVariant::Qr(fields) = &self.variant else {
            return None;
        };
        Some(QrBill {
            account: self.account.clone(),
            amount: self.amount,
            currency: QR_BILL_CURRENCY.to_string(),
            reference: self.reference.to_string(),
            unstructured_message: fields.additional_text.clone(),
            creditor: fields.creditor.clone(),
            debtor: fields.debtor.clone(),
            language: fields.language,
        })
    }
}

fn validate_amount(amount: Decimal) -> Result<()> {
    if amount.scale() != AMOUNT_SCALE {
        return Err(RechnungswerkError::AmountScale(amount.scale()));
    }
    let max = Decimal::from(MAX_FRANCS + 1);
    if amount.is_sign_negative() || amount >= max {
        return Err(RechnungswerkError::AmountOutOfRange(amount));
    }
    Ok(())
}

fn placeholder_lines() -> Vec<String> {
    vec![DUMMY_PLACEHOLDER.to_string(); 2]
}

/// Insert a space between every `size` digits, counted from the right.
fn group_digits(digits: &str, size: usize) -> String {
    let lead = digits.len() % size;
    let mut out = String::with_capacity(digits.len() + digits.len() / size);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && index >= lead && (index - lead) % size == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

// -- Serialized form ----------------------------------------------------------

/// Unvalidated slip input as it appears in JSON invoices.
///
/// References are strings because JSON numbers cannot hold 27 digits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SlipSpec {
    Post {
        payee: Vec<String>,
        reference: String,
        amount: Decimal,
        account: String,
        payer: Vec<String>,
    },
    Bank {
        payee: Vec<String>,
        beneficiary: Vec<String>,
        reference: String,
        amount: Decimal,
        account: String,
        payer: Vec<String>,
    },
    Dummy,
    Qr {
        creditor: QrAddress,
        reference: String,
        amount: Decimal,
        account: String,
        debtor: QrAddress,
        #[serde(default)]
        additional_text: Option<String>,
        #[serde(default)]
        language: Option<Language>,
    },
}

/// Parse a printed reference: 1 to 27 digits, whitespace ignored.
pub fn parse_reference(reference: &str) -> Result<u128> {
    let digits: String = reference.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.is_empty()
        || digits.len() > REFERENCE_DIGITS
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(RechnungswerkError::Config(format!(
            "reference {reference:?} must consist of 1 to {REFERENCE_DIGITS} digits"
        )));
    }
    digits
        .parse()
        .map_err(|_| RechnungswerkError::Config(format!("reference {reference:?} is not a number")))
}

impl TryFrom<SlipSpec> for PaymentSlip {
    type Error = RechnungswerkError;

    fn try_from(spec: SlipSpec) -> Result<Self> {
        match spec {
            SlipSpec::Post {
                payee,
                reference,
                amount,
                account,
                payer,
            } => Self::post(payee, parse_reference(&reference)?, amount, account, payer),
            SlipSpec::Bank {
                payee,
                beneficiary,
                reference,
                amount,
                account,
                payer,
            } => Self::bank(
                payee,
                beneficiary,
                parse_reference(&reference)?,
                amount,
                account,
                payer,
            ),
            SlipSpec::Dummy => Ok(Self::dummy()),
            SlipSpec::Qr {
                creditor,
                reference,
                amount,
                account,
                debtor,
                additional_text,
                language,
            } => Self::qr(
                creditor,
                parse_reference(&reference)?,
                amount,
                account,
                debtor,
                additional_text,
                language,
            ),
        }
    }
}

impl From<PaymentSlip> for SlipSpec {
    fn from(slip: PaymentSlip) -> Self {
        let reference = slip.reference.to_string();
        match slip.variant {
            SlipVariant::Post(fields) => Self::Post {
                payee: fields.payee,
                reference,
                amount: slip.amount,
                account: slip.account,
                payer: fields.payer,
            },
            SlipVariant::Bank {
                fields,
                beneficiary,
            } => Self::Bank {
                payee: fields.payee,
                beneficiary,
                reference,
                amount: slip.amount,
                account: slip.account,
                payer: fields.payer,
            },
            SlipVariant::Dummy => Self::Dummy,
            SlipVariant::Qr(fields) => Self::Qr {
                creditor: fields.creditor,
                reference,
                amount: slip.amount,
                account: slip.account,
                debtor: fields.debtor,
                additional_text: fields.additional_text,
                language: Some(fields.language),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const REFERENCE: u128 = 120000000000234478943216899;

    fn post_slip(reference: u128) -> PaymentSlip {
        PaymentSlip::post(
            vec!["Kita Kinderland".into(), "3000 Bern".into()],
            reference,
            dec!(3949.75),
            "01-162-8",
            vec!["Hans Muster".into(), "Musterweg 1".into()],
        )
        .unwrap()
    }

    fn address(name: &str) -> QrAddress {
        QrAddress {
            name: name.into(),
            street: "Nussbaumstrasse".into(),
            house_number: "21".into(),
            postal_code: "3000".into(),
            town: "Bern".into(),
            country_code: "CH".into(),
        }
    }

    #[test]
    fn amount_is_split_into_francs_and_rappen() {
        let slip = post_slip(REFERENCE);
        assert_eq!(slip.amount_francs(), 3949);
        assert_eq!(slip.amount_rappen(), 75);
        assert_eq!(slip.amount_francs_text(), "00003949");
        assert_eq!(slip.amount_francs_display(), "3949");
        assert_eq!(slip.amount_rappen_text(), "75");
    }

    #[test]
    fn reference_texts() {
        let slip = post_slip(REFERENCE);
        assert_eq!(slip.reference_display_text(), "12 00000 00000 23447 89432 16899");
        assert_eq!(slip.reference_receipt_text(), "120000000000234478943216899");

        let short = post_slip(1236);
        assert_eq!(short.reference_display_text(), "1236");
        assert_eq!(short.reference_padded(), "000000000000000000000001236");
        assert_eq!(post_slip(12345).reference_display_text(), "12345");
        assert_eq!(post_slip(123456).reference_display_text(), "1 23456");
    }

    #[test]
    fn post_slip_coding_line() {
        assert_eq!(
            post_slip(REFERENCE).coding_line(),
            "0100003949753>120000000000234478943216899+ 010001628>"
        );
    }

    #[test]
    fn amount_scale_must_be_two() {
        let err = PaymentSlip::post(vec![], 1, dec!(10.5), "01-162-8", vec![]).unwrap_err();
        assert!(matches!(err, RechnungswerkError::AmountScale(1)));
        let err = PaymentSlip::post(vec![], 1, dec!(10.500), "01-162-8", vec![]).unwrap_err();
        assert!(matches!(err, RechnungswerkError::AmountScale(3)));
    }

    #[test]
    fn amount_must_fit_the_slip() {
        let err = PaymentSlip::post(vec![], 1, dec!(-1.00), "01-162-8", vec![]).unwrap_err();
        assert!(matches!(err, RechnungswerkError::AmountOutOfRange(_)));
        let err =
            PaymentSlip::post(vec![], 1, dec!(100000000.00), "01-162-8", vec![]).unwrap_err();
        assert!(matches!(err, RechnungswerkError::AmountOutOfRange(_)));
    }

    #[test]
    fn invalid_account_is_rejected_at_construction() {
        let err = PaymentSlip::post(vec![], 1, dec!(1.00), "01-162-9", vec![]).unwrap_err();
        assert!(matches!(err, RechnungswerkError::InvalidCheckDigit { .. }));
    }

    #[test]
    fn bank_slip_limits_payee_lines() {
        let err = PaymentSlip::bank(
            vec!["Bank".into(), "Filiale".into(), "3000 Bern".into()],
            vec!["Kita".into()],
            1,
            dec!(1.00),
            "01-162-8",
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, RechnungswerkError::TooManyPayeeLines(3)));

        let slip = PaymentSlip::bank(
            vec!["Bank".into(), "3000 Bern".into()],
            vec!["Kita Kinderland".into()],
            1,
            dec!(1.00),
            "01-162-8",
            vec![],
        )
        .unwrap();
        assert_eq!(slip.beneficiary_lines(), vec!["Kita Kinderland".to_string()]);
    }

    #[test]
    fn dummy_slip_shows_placeholders_only() {
        let slip = PaymentSlip::dummy();
        assert_eq!(slip.reference_display_text(), DUMMY_PLACEHOLDER);
        assert_eq!(slip.reference_receipt_text(), DUMMY_PLACEHOLDER);
        assert_eq!(slip.reference_padded(), DUMMY_PLACEHOLDER);
        assert_eq!(slip.coding_line(), DUMMY_PLACEHOLDER);
        assert_eq!(slip.account_display(), DUMMY_PLACEHOLDER);
        assert_eq!(slip.amount_francs_display(), "");
        assert_eq!(slip.amount_rappen_text(), "");
        assert!(slip.payer_lines().iter().all(|l| l == DUMMY_PLACEHOLDER));
    }

    #[test]
    fn qr_slip_builds_bill_data() {
        let slip = PaymentSlip::qr(
            address("Kita Kinderland"),
            210000000003139471430009017,
            dec!(199.95),
            "CH4431999123000889012",
            address("Hans Muster"),
            Some("Januar".into()),
            None,
        )
        .unwrap();
        let bill = slip.qr_bill().unwrap();
        assert_eq!(bill.currency, "CHF");
        assert_eq!(bill.language, Language::De);
        assert_eq!(bill.reference, "210000000003139471430009017");
        assert_eq!(slip.coding_line(), "");
        assert!(post_slip(1).qr_bill().is_none());
    }

    #[test]
    fn deserializes_through_validation() {
        let json = r#"{
            "type": "post",
            "payee": ["Kita Kinderland"],
            "reference": "12 00000 00000 23447 89432 16899",
            "amount": "3949.75",
            "account": "01-162-8",
            "payer": ["Hans Muster"]
        }"#;
        let slip: PaymentSlip = serde_json::from_str(json).unwrap();
        assert_eq!(slip.reference(), REFERENCE);

        let broken = json.replace("01-162-8", "01-162-7");
        assert!(serde_json::from_str::<PaymentSlip>(&broken).is_err());
    }

    #[test]
    fn references_are_limited_to_27_digits() {
        assert_eq!(parse_reference("12 00000 00000 23447 89432 16899").unwrap(), REFERENCE);
        assert_eq!(parse_reference("1236").unwrap(), 1236);
        assert!(parse_reference(&"1".repeat(27)).is_ok());
        assert!(matches!(
            parse_reference(&"1".repeat(28)),
            Err(RechnungswerkError::Config(_))
        ));
        assert!(parse_reference("").is_err());
        assert!(parse_reference("12a4").is_err());
    }
}
