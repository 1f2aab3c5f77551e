use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::models::{ChurnAnalysis, ChurnPrediction, RiskLevel, RiskSummary};

pub fn summarize(predictions: &[ChurnPrediction]) -> RiskSummary {
    let mut summary = RiskSummary {
        total: predictions.len(),
        high: 0,
        medium: 0,
        low: 0,
        average_probability: 0.0,
    };

    let mut total_probability = 0.0;
    for prediction in predictions {
        match prediction.risk_level {
            RiskLevel::High => summary.high += 1,
            RiskLevel::Medium => summary.medium += 1,
            RiskLevel::Low => summary.low += 1,
        }
        total_probability += prediction.churn_probability;
    }

    if summary.total > 0 {
        summary.average_probability = total_probability / summary.total as f64;
    }
    summary
}

/// Highest churn probabilities first; ties keep their input order.
pub fn top_risk(predictions: &[ChurnPrediction], limit: usize) -> Vec<&ChurnPrediction> {
    let mut ranked: Vec<&ChurnPrediction> = predictions.iter().collect();
    ranked.sort_by(|a, b| {
        b.churn_probability
            .partial_cmp(&a.churn_probability)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(limit);
    ranked
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

pub fn build_report(
    source_label: &str,
    generated_at: DateTime<Utc>,
    analysis: &ChurnAnalysis,
) -> String {
    let summary = summarize(&analysis.predictions);
    let metrics = &analysis.metrics;

    let mut output = String::new();

    let _ = writeln!(output, "# Customer Churn Risk Report");
    let _ = writeln!(
        output,
        "Generated from {} at {}",
        source_label,
        generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Overview");
    let _ = writeln!(output, "- Total customers: {}", summary.total);
    let _ = writeln!(output, "- High risk: {}", summary.high);
    let _ = writeln!(
        output,
        "- Average churn risk: {}",
        percent(summary.average_probability)
    );
    let _ = writeln!(output, "- Model AUC-ROC: {}", percent(metrics.auc));

    let _ = writeln!(output);
    let _ = writeln!(output, "## Risk Distribution");

    if summary.total == 0 {
        let _ = writeln!(output, "No customers were scored.");
    } else {
        for (level, count) in [
            (RiskLevel::High, summary.high),
            (RiskLevel::Medium, summary.medium),
            (RiskLevel::Low, summary.low),
        ] {
            let share = count as f64 / summary.total as f64;
            let _ = writeln!(
                output,
                "- {}: {} customers ({})",
                level.as_str(),
                count,
                percent(share)
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Model Metrics");
    let _ = writeln!(output, "- Accuracy: {}", percent(metrics.accuracy));
    let _ = writeln!(output, "- AUC-ROC: {}", percent(metrics.auc));
    let _ = writeln!(output, "- Precision: {}", percent(metrics.precision));
    let _ = writeln!(output, "- Recall: {}", percent(metrics.recall));

    let _ = writeln!(output);
    let _ = writeln!(output, "## Feature Importance");
    for entry in &analysis.feature_importance {
        let _ = writeln!(output, "- {}: {:.3}", entry.feature, entry.importance);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Highest Risk Customers");

    let top = top_risk(&analysis.predictions, 10);
    if top.is_empty() {
        let _ = writeln!(output, "No customers were scored.");
    } else {
        for prediction in top {
            let features = &prediction.features;
            let _ = writeln!(
                output,
                "- {} ({}) churn risk {} | tenure {:.0} months, {:.2}/month, {}, {}",
                prediction.user_id,
                prediction.risk_level.as_str(),
                percent(prediction.churn_probability),
                features.tenure,
                features.monthly_charges,
                features.contract_type.as_str(),
                features.payment_method.as_str()
            );
        }
    }

    output
}
