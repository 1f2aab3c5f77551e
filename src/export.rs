use std::io::Write;

use anyhow::Context;
use serde::Serialize;

use crate::models::{
    ChurnAnalysis, ChurnPrediction, CustomerRecord, SupplementalAttributes, YesNo,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictionRow<'a> {
    user_id: &'a str,
    churn_probability: f64,
    risk_level: &'static str,
    tenure: f64,
    monthly_charges: f64,
    total_charges: f64,
    contract_type: &'a str,
    payment_method: &'a str,
    internet_service: &'a str,
    tech_support: &'static str,
}

/// The first seven columns are in the order `ingest::normalize` reads them.
#[derive(Serialize)]
struct CustomerRow<'a> {
    #[serde(rename = "customerID")]
    customer_id: &'a str,
    tenure: f64,
    #[serde(rename = "MonthlyCharges")]
    monthly_charges: f64,
    #[serde(rename = "TotalCharges")]
    total_charges: f64,
    #[serde(rename = "Contract")]
    contract_type: &'a str,
    #[serde(rename = "PaymentMethod")]
    payment_method: &'a str,
    #[serde(rename = "InternetService")]
    internet_service: &'a str,
    #[serde(rename = "TechSupport")]
    tech_support: &'static str,
    #[serde(rename = "StreamingTV")]
    streaming_tv: &'static str,
    #[serde(rename = "PaperlessBilling")]
    paperless_billing: &'static str,
    #[serde(rename = "MultipleLines")]
    multiple_lines: &'static str,
    /// Left empty for parsed rows, which carry no supplemental attributes.
    #[serde(rename = "OnlineSecurity")]
    online_security: Option<&'static str>,
    #[serde(rename = "DeviceProtection")]
    device_protection: Option<&'static str>,
    #[serde(rename = "SeniorCitizen")]
    senior: Option<&'static str>,
    #[serde(rename = "Partner")]
    partner: Option<&'static str>,
    #[serde(rename = "Dependents")]
    dependents: Option<&'static str>,
}

pub fn write_predictions_csv<W: Write>(
    writer: W,
    predictions: &[ChurnPrediction],
) -> anyhow::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for prediction in predictions {
        let features = &prediction.features;
        csv_writer
            .serialize(PredictionRow {
                user_id: &prediction.user_id,
                churn_probability: prediction.churn_probability,
                risk_level: prediction.risk_level.as_str(),
                tenure: features.tenure,
                monthly_charges: features.monthly_charges,
                total_charges: features.total_charges,
                contract_type: features.contract_type.as_str(),
                payment_method: features.payment_method.as_str(),
                internet_service: features.internet_service.as_str(),
                tech_support: features.tech_support.as_str(),
            })
            .with_context(|| format!("failed to write prediction for {}", prediction.user_id))?;
    }

    csv_writer.flush().context("failed to flush predictions")?;
    Ok(())
}

pub fn write_customers_csv<W: Write>(writer: W, records: &[CustomerRecord]) -> anyhow::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for record in records {
        let supplemental = record.supplemental.as_ref();
        let extra = |attribute: fn(&SupplementalAttributes) -> YesNo| {
            supplemental.map(|attributes| attribute(attributes).as_str())
        };
        csv_writer
            .serialize(CustomerRow {
                customer_id: &record.customer_id,
                tenure: record.tenure,
                monthly_charges: record.monthly_charges,
                total_charges: record.total_charges,
                contract_type: record.contract_type.as_str(),
                payment_method: record.payment_method.as_str(),
                internet_service: record.internet_service.as_str(),
                tech_support: record.tech_support.as_str(),
                streaming_tv: record.streaming_tv.as_str(),
                paperless_billing: record.paperless_billing.as_str(),
                multiple_lines: record.multiple_lines.as_str(),
                online_security: extra(|attributes| attributes.online_security),
                device_protection: extra(|attributes| attributes.device_protection),
                senior: extra(|attributes| attributes.senior),
                partner: extra(|attributes| attributes.partner),
                dependents: extra(|attributes| attributes.dependents),
            })
            .with_context(|| format!("failed to write customer {}", record.customer_id))?;
    }

    csv_writer.flush().context("failed to flush customers")?;
    Ok(())
}

pub fn write_analysis_json<W: Write>(mut writer: W, analysis: &ChurnAnalysis) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut writer, analysis).context("failed to serialize analysis")?;
    writer.flush().context("failed to flush analysis")?;
    Ok(())
}
