use std::path::Path;

use anyhow::Context;
use rand::Rng;
use tracing::{debug, info};

use crate::models::{
    ContractType, CustomerRecord, InternetService, PaymentMethod, SupplementalAttributes, YesNo,
};

/// Data lines read after the header; anything past this is dropped.
pub const MAX_DATA_ROWS: usize = 1000;
/// Size of the batch generated when no line of the input is usable.
pub const SYNTHETIC_BATCH_SIZE: usize = 500;

/// Payment methods drawn when a parsed row leaves the column empty.
const BACKFILL_PAYMENT_METHODS: [PaymentMethod; 3] = [
    PaymentMethod::ElectronicCheck,
    PaymentMethod::CreditCard,
    PaymentMethod::BankTransfer,
];

/// Reads an input file, replacing invalid UTF-8 sequences instead of failing.
pub fn read_csv_text(path: &Path) -> anyhow::Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Turns raw comma-delimited text into customer records.
///
/// The header only decides how many fields a line needs to be accepted;
/// columns are read by position. Missing or unparsable values are replaced
/// with random draws, and if no line is accepted at all the whole result is
/// replaced by [`synthesize_batch`]. This never fails.
pub fn normalize<R: Rng + ?Sized>(raw_text: &str, rng: &mut R) -> Vec<CustomerRecord> {
    let mut lines = raw_text.split('\n');
    let header_width = lines.next().map(|header| split_fields(header).len()).unwrap_or(0);

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (offset, line) in lines.take(MAX_DATA_ROWS).enumerate() {
        let row_number = offset + 1;
        let fields = split_fields(line);
        if fields.len() < header_width {
            skipped += 1;
            debug!(
                row = row_number,
                fields = fields.len(),
                expected = header_width,
                "skipping short line"
            );
            continue;
        }
        records.push(record_from_fields(&fields, row_number, rng));
    }

    if records.is_empty() {
        info!(
            skipped,
            count = SYNTHETIC_BATCH_SIZE,
            "no usable rows in input, generating synthetic dataset"
        );
        return synthesize_batch(SYNTHETIC_BATCH_SIZE, rng);
    }

    info!(records = records.len(), skipped, "processed customer records");
    records
}

/// Generates `count` fully random customers with sequential `CUST_` ids.
pub fn synthesize_batch<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<CustomerRecord> {
    (1..=count)
        .map(|index| CustomerRecord {
            customer_id: synthetic_id(index),
            tenure: random_tenure(rng),
            monthly_charges: random_monthly_charges(rng),
            total_charges: random_total_charges(rng),
            contract_type: pick(&ContractType::KNOWN, rng),
            payment_method: pick(&PaymentMethod::KNOWN, rng),
            internet_service: pick(&InternetService::KNOWN, rng),
            tech_support: yes_with(0.5, rng),
            streaming_tv: yes_with(0.4, rng),
            paperless_billing: yes_with(0.6, rng),
            multiple_lines: yes_with(0.5, rng),
            supplemental: Some(SupplementalAttributes {
                online_security: yes_with(0.5, rng),
                device_protection: yes_with(0.4, rng),
                senior: yes_with(0.2, rng),
                partner: yes_with(0.5, rng),
                dependents: yes_with(0.3, rng),
            }),
        })
        .collect()
}

fn split_fields(line: &str) -> Vec<String> {
    line.split(',')
        .map(|value| value.trim().replace('"', ""))
        .collect()
}

fn record_from_fields<R: Rng + ?Sized>(
    fields: &[String],
    row_number: usize,
    rng: &mut R,
) -> CustomerRecord {
    let field = |index: usize| fields.get(index).map(String::as_str).unwrap_or("");

    let customer_id = match field(0) {
        "" => synthetic_id(row_number),
        id => id.to_string(),
    };
    let tenure = parse_number(field(1)).unwrap_or_else(|| random_tenure(rng));
    let monthly_charges = parse_number(field(2)).unwrap_or_else(|| random_monthly_charges(rng));
    let total_charges = parse_number(field(3)).unwrap_or_else(|| random_total_charges(rng));
    let contract_type = match field(4) {
        "" => pick(&ContractType::KNOWN, rng),
        label => ContractType::from_label(label),
    };
    let payment_method = match field(5) {
        "" => pick(&BACKFILL_PAYMENT_METHODS, rng),
        label => PaymentMethod::from_label(label),
    };
    let internet_service = match field(6) {
        "" => pick(&InternetService::KNOWN, rng),
        label => InternetService::from_label(label),
    };

    CustomerRecord {
        customer_id,
        tenure,
        monthly_charges,
        total_charges,
        contract_type,
        payment_method,
        internet_service,
        tech_support: yes_with(0.5, rng),
        streaming_tv: yes_with(0.4, rng),
        paperless_billing: yes_with(0.6, rng),
        multiple_lines: yes_with(0.5, rng),
        supplemental: None,
    }
}

/// Reads the leading number of `value`, ignoring any trailing text.
/// Values without one, and non-finite or zero values, count as missing.
fn parse_number(value: &str) -> Option<f64> {
    numeric_prefix(value)
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite() && *number != 0.0)
}

fn numeric_prefix(value: &str) -> &str {
    let bytes = value.as_bytes();
    let digits_from = |start: usize| {
        start
            + bytes[start..]
                .iter()
                .take_while(|byte| byte.is_ascii_digit())
                .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let integer_end = digits_from(end);
    let mut has_digits = integer_end > end;
    end = integer_end;

    if bytes.get(end) == Some(&b'.') {
        let fraction_end = digits_from(end + 1);
        has_digits |= fraction_end > end + 1;
        end = fraction_end;
    }
    if !has_digits {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let exponent_end = digits_from(exponent);
        if exponent_end > exponent {
            end = exponent_end;
        }
    }

    &value[..end]
}

fn synthetic_id(index: usize) -> String {
    format!("CUST_{index:04}")
}

fn random_tenure<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    f64::from(rng.gen_range(1u32..=72))
}

fn random_monthly_charges<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(20.0..120.0)
}

fn random_total_charges<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(200.0..8200.0)
}

fn pick<T: Clone, R: Rng + ?Sized>(options: &[T], rng: &mut R) -> T {
    options[rng.gen_range(0..options.len())].clone()
}

fn yes_with<R: Rng + ?Sized>(probability: f64, rng: &mut R) -> YesNo {
    if rng.gen_bool(probability) {
        YesNo::Yes
    } else {
        YesNo::No
    }
}
