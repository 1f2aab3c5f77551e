use rand::Rng;
use tracing::info;

use crate::models::{
    ChurnAnalysis, ChurnPrediction, ContractType, CustomerRecord, FeatureImportance,
    ModelMetrics, PaymentMethod, PredictionFeatures, RiskLevel, YesNo,
};

const BASE_PROBABILITY: f64 = 0.30;
const NOISE_AMPLITUDE: f64 = 0.15;

pub const HIGH_RISK_THRESHOLD: f64 = 0.70;
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.40;

/// Display name and `[low, high)` draw range of each importance entry, in output order.
pub const FEATURE_IMPORTANCE_RANGES: [(&str, f64, f64); 8] = [
    ("Tenure", 0.25, 0.35),
    ("Monthly Charges", 0.20, 0.25),
    ("Contract Type", 0.15, 0.20),
    ("Total Charges", 0.12, 0.15),
    ("Payment Method", 0.10, 0.13),
    ("Tech Support", 0.08, 0.10),
    ("Internet Service", 0.06, 0.08),
    ("Paperless Billing", 0.04, 0.06),
];

/// Scores every record and attaches batch-level placeholder metrics.
///
/// Each prediction depends only on its own record and its own noise draw.
/// Metrics and importances are drawn after all predictions and never look at them.
pub fn score<R: Rng + ?Sized>(records: &[CustomerRecord], rng: &mut R) -> ChurnAnalysis {
    let predictions: Vec<ChurnPrediction> = records
        .iter()
        .map(|record| score_customer(record, rng))
        .collect();
    let metrics = synthesize_metrics(rng);
    let feature_importance = synthesize_feature_importance(rng);

    info!(
        predictions = predictions.len(),
        auc = metrics.auc,
        "generated churn predictions"
    );

    ChurnAnalysis {
        predictions,
        metrics,
        feature_importance,
    }
}

pub fn score_customer<R: Rng + ?Sized>(record: &CustomerRecord, rng: &mut R) -> ChurnPrediction {
    let noise = rng.gen_range(-NOISE_AMPLITUDE..NOISE_AMPLITUDE);
    let churn_probability = (base_probability(record) + noise).clamp(0.0, 1.0);

    ChurnPrediction {
        user_id: record.customer_id.clone(),
        churn_probability,
        risk_level: risk_level(churn_probability),
        features: PredictionFeatures {
            tenure: record.tenure,
            monthly_charges: record.monthly_charges,
            total_charges: record.total_charges,
            contract_type: record.contract_type.clone(),
            payment_method: record.payment_method.clone(),
            internet_service: record.internet_service.clone(),
            tech_support: record.tech_support,
        },
    }
}

/// Deterministic part of the churn probability, before noise and clamping.
pub fn base_probability(record: &CustomerRecord) -> f64 {
    let mut probability = BASE_PROBABILITY;
    probability += (72.0 - record.tenure) / 100.0;
    probability += (record.monthly_charges - 50.0) / 200.0;

    probability += match record.contract_type {
        ContractType::MonthToMonth => 0.20,
        ContractType::TwoYear => -0.15,
        _ => 0.0,
    };

    if record.payment_method == PaymentMethod::ElectronicCheck {
        probability += 0.10;
    }
    if record.tech_support == YesNo::No {
        probability += 0.10;
    }

    probability
}

pub fn risk_level(probability: f64) -> RiskLevel {
    if probability >= HIGH_RISK_THRESHOLD {
        RiskLevel::High
    } else if probability >= MEDIUM_RISK_THRESHOLD {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

pub fn synthesize_metrics<R: Rng + ?Sized>(rng: &mut R) -> ModelMetrics {
    ModelMetrics {
        accuracy: rng.gen_range(0.82..0.90),
        auc: rng.gen_range(0.85..0.95),
        precision: rng.gen_range(0.78..0.90),
        recall: rng.gen_range(0.75..0.90),
    }
}

pub fn synthesize_feature_importance<R: Rng + ?Sized>(rng: &mut R) -> Vec<FeatureImportance> {
    FEATURE_IMPORTANCE_RANGES
        .iter()
        .map(|&(feature, low, high)| FeatureImportance {
            feature: feature.to_string(),
            importance: rng.gen_range(low..high),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InternetService;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn customer(
        tenure: f64,
        monthly_charges: f64,
        contract_type: ContractType,
        payment_method: PaymentMethod,
        tech_support: YesNo,
    ) -> CustomerRecord {
        CustomerRecord {
            customer_id: "CUST_0001".to_string(),
            tenure,
            monthly_charges,
            total_charges: 1200.0,
            contract_type,
            payment_method,
            internet_service: InternetService::Dsl,
            tech_support,
            streaming_tv: YesNo::No,
            paperless_billing: YesNo::Yes,
            multiple_lines: YesNo::No,
            supplemental: None,
        }
    }

    #[test]
    fn long_tenure_two_year_contract_has_low_base() {
        let record = customer(
            72.0,
            50.0,
            ContractType::TwoYear,
            PaymentMethod::CreditCard,
            YesNo::Yes,
        );
        assert!((base_probability(&record) - 0.15).abs() < 1e-9);
    }

    #[test]
    fn worst_case_customer_clamps_to_one() {
        let record = customer(
            1.0,
            150.0,
            ContractType::MonthToMonth,
            PaymentMethod::ElectronicCheck,
            YesNo::No,
        );
        assert!((base_probability(&record) - 1.91).abs() < 1e-9);

        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let prediction = score_customer(&record, &mut rng);
            assert_eq!(prediction.churn_probability, 1.0);
            assert_eq!(prediction.risk_level, RiskLevel::High);
        }
    }

    #[test]
    fn very_long_tenure_clamps_to_zero() {
        let record = customer(
            400.0,
            20.0,
            ContractType::TwoYear,
            PaymentMethod::BankTransfer,
            YesNo::Yes,
        );
        let prediction = score_customer(&record, &mut StdRng::seed_from_u64(5));
        assert_eq!(prediction.churn_probability, 0.0);
        assert_eq!(prediction.risk_level, RiskLevel::Low);
    }

    #[test]
    fn one_year_and_unknown_contracts_get_no_adjustment() {
        let one_year = customer(
            72.0,
            50.0,
            ContractType::OneYear,
            PaymentMethod::CreditCard,
            YesNo::Yes,
        );
        let unknown = customer(
            72.0,
            50.0,
            ContractType::Other("Weekly".to_string()),
            PaymentMethod::CreditCard,
            YesNo::Yes,
        );
        assert!((base_probability(&one_year) - 0.30).abs() < 1e-9);
        assert!((base_probability(&unknown) - 0.30).abs() < 1e-9);
    }

    #[test]
    fn risk_levels_follow_thresholds() {
        assert_eq!(risk_level(0.0), RiskLevel::Low);
        assert_eq!(risk_level(0.399), RiskLevel::Low);
        assert_eq!(risk_level(0.40), RiskLevel::Medium);
        assert_eq!(risk_level(0.699), RiskLevel::Medium);
        assert_eq!(risk_level(0.70), RiskLevel::High);
        assert_eq!(risk_level(1.0), RiskLevel::High);
    }

    #[test]
    fn noise_stays_within_amplitude() {
        let record = customer(
            40.0,
            60.0,
            ContractType::OneYear,
            PaymentMethod::MailedCheck,
            YesNo::Yes,
        );
        let base = base_probability(&record);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let prediction = score_customer(&record, &mut rng);
            assert!((prediction.churn_probability - base).abs() <= NOISE_AMPLITUDE);
            assert_eq!(prediction.risk_level, risk_level(prediction.churn_probability));
        }
    }

    #[test]
    fn prediction_projects_display_features() {
        let record = customer(
            12.0,
            80.0,
            ContractType::MonthToMonth,
            PaymentMethod::ElectronicCheck,
            YesNo::No,
        );
        let prediction = score_customer(&record, &mut StdRng::seed_from_u64(1));

        assert_eq!(prediction.user_id, record.customer_id);
        assert_eq!(prediction.features.tenure, 12.0);
        assert_eq!(prediction.features.monthly_charges, 80.0);
        assert_eq!(prediction.features.total_charges, 1200.0);
        assert_eq!(prediction.features.contract_type, ContractType::MonthToMonth);
        assert_eq!(prediction.features.internet_service, InternetService::Dsl);
        assert_eq!(prediction.features.tech_support, YesNo::No);
    }

    #[test]
    fn score_preserves_order_and_cardinality() {
        let records: Vec<CustomerRecord> = (0..25)
            .map(|index| {
                let mut record = customer(
                    f64::from(index + 1),
                    55.0,
                    ContractType::OneYear,
                    PaymentMethod::CreditCard,
                    YesNo::Yes,
                );
                record.customer_id = format!("ID{index}");
                record
            })
            .collect();

        let mut rng = StdRng::seed_from_u64(9);
        let first = score(&records, &mut rng);
        let second = score(&records, &mut rng);

        for analysis in [&first, &second] {
            assert_eq!(analysis.predictions.len(), records.len());
            assert_eq!(analysis.feature_importance.len(), 8);
            for (prediction, record) in analysis.predictions.iter().zip(&records) {
                assert_eq!(prediction.user_id, record.customer_id);
                assert!((0.0..=1.0).contains(&prediction.churn_probability));
            }
        }
    }

    #[test]
    fn empty_batch_still_gets_metrics_and_importances() {
        let analysis = score(&[], &mut StdRng::seed_from_u64(2));

        assert!(analysis.predictions.is_empty());
        assert!((0.85..0.95).contains(&analysis.metrics.auc));
        assert_eq!(analysis.feature_importance.len(), 8);
    }

    #[test]
    fn metrics_stay_in_their_ranges() {
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..100 {
            let metrics = synthesize_metrics(&mut rng);
            assert!((0.82..0.90).contains(&metrics.accuracy));
            assert!((0.85..0.95).contains(&metrics.auc));
            assert!((0.78..0.90).contains(&metrics.precision));
            assert!((0.75..0.90).contains(&metrics.recall));
        }
    }

    #[test]
    fn feature_importance_has_fixed_names_and_ranges() {
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..100 {
            let importances = synthesize_feature_importance(&mut rng);
            assert_eq!(importances.len(), FEATURE_IMPORTANCE_RANGES.len());
            for (entry, (name, low, high)) in importances.iter().zip(FEATURE_IMPORTANCE_RANGES) {
                assert_eq!(entry.feature, name);
                assert!(entry.importance >= low && entry.importance < high);
            }
        }
    }
}
