use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractType {
    MonthToMonth,
    OneYear,
    TwoYear,
    /// Unrecognized label carried through verbatim from the source row.
    Other(String),
}

impl ContractType {
    pub const KNOWN: [ContractType; 3] = [
        ContractType::MonthToMonth,
        ContractType::OneYear,
        ContractType::TwoYear,
    ];

    pub fn from_label(label: &str) -> Self {
        match label {
            "Month-to-month" => ContractType::MonthToMonth,
            "One year" => ContractType::OneYear,
            "Two year" => ContractType::TwoYear,
            other => ContractType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ContractType::MonthToMonth => "Month-to-month",
            ContractType::OneYear => "One year",
            ContractType::TwoYear => "Two year",
            ContractType::Other(label) => label,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentMethod {
    ElectronicCheck,
    CreditCard,
    BankTransfer,
    MailedCheck,
    Other(String),
}

impl PaymentMethod {
    pub const KNOWN: [PaymentMethod; 4] = [
        PaymentMethod::ElectronicCheck,
        PaymentMethod::CreditCard,
        PaymentMethod::BankTransfer,
        PaymentMethod::MailedCheck,
    ];

    pub fn from_label(label: &str) -> Self {
        match label {
            "Electronic check" => PaymentMethod::ElectronicCheck,
            "Credit card" => PaymentMethod::CreditCard,
            "Bank transfer" => PaymentMethod::BankTransfer,
            "Mailed check" => PaymentMethod::MailedCheck,
            other => PaymentMethod::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PaymentMethod::ElectronicCheck => "Electronic check",
            PaymentMethod::CreditCard => "Credit card",
            PaymentMethod::BankTransfer => "Bank transfer",
            PaymentMethod::MailedCheck => "Mailed check",
            PaymentMethod::Other(label) => label,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternetService {
    Dsl,
    FiberOptic,
    No,
    Other(String),
}

impl InternetService {
    pub const KNOWN: [InternetService; 3] = [
        InternetService::Dsl,
        InternetService::FiberOptic,
        InternetService::No,
    ];

    pub fn from_label(label: &str) -> Self {
        match label {
            "DSL" => InternetService::Dsl,
            "Fiber optic" => InternetService::FiberOptic,
            "No" => InternetService::No,
            other => InternetService::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            InternetService::Dsl => "DSL",
            InternetService::FiberOptic => "Fiber optic",
            InternetService::No => "No",
            InternetService::Other(label) => label,
        }
    }
}

macro_rules! serialize_as_label {
    ($($ty:ty),+) => {
        $(
            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.serialize_str(self.as_str())
                }
            }
        )+
    };
}

serialize_as_label!(ContractType, PaymentMethod, InternetService);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn as_str(self) -> &'static str {
        match self {
            YesNo::Yes => "Yes",
            YesNo::No => "No",
        }
    }
}

/// Extra attributes only present on records from a fully synthetic batch.
#[derive(Debug, Clone, PartialEq)]
pub struct SupplementalAttributes {
    pub online_security: YesNo,
    pub device_protection: YesNo,
    pub senior: YesNo,
    pub partner: YesNo,
    pub dependents: YesNo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerRecord {
    pub customer_id: String,
    pub tenure: f64,
    pub monthly_charges: f64,
    pub total_charges: f64,
    pub contract_type: ContractType,
    pub payment_method: PaymentMethod,
    pub internet_service: InternetService,
    pub tech_support: YesNo,
    pub streaming_tv: YesNo,
    pub paperless_billing: YesNo,
    pub multiple_lines: YesNo,
    pub supplemental: Option<SupplementalAttributes>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

/// The seven source fields retained alongside a prediction for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionFeatures {
    pub tenure: f64,
    pub monthly_charges: f64,
    pub total_charges: f64,
    pub contract_type: ContractType,
    pub payment_method: PaymentMethod,
    pub internet_service: InternetService,
    pub tech_support: YesNo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChurnPrediction {
    pub user_id: String,
    pub churn_probability: f64,
    pub risk_level: RiskLevel,
    pub features: PredictionFeatures,
}

/// Synthetic quality-indicator placeholders; not derived from any predictions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelMetrics {
    pub accuracy: f64,
    pub auc: f64,
    pub precision: f64,
    pub recall: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChurnAnalysis {
    pub predictions: Vec<ChurnPrediction>,
    pub metrics: ModelMetrics,
    pub feature_importance: Vec<FeatureImportance>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiskSummary {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub average_probability: f64,
}
