//! Transaction record model and request validation
//!
//! Two shapes are accepted on the wire:
//! - [`TransactionRecord`]: a single scoring request, every field required and non-null
//! - [`PartialTransaction`]: one row of a batch, where every value except `User_ID`
//!   may be `null` and is imputed by the feature encoder

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use validator::Validate;

// ============================================================================
// FIELD TABLE
// ============================================================================

pub const USER_ID: &str = "User_ID";
pub const TRANSACTION_AMOUNT: &str = "Transaction_Amount";
pub const TRANSACTION_TYPE: &str = "Transaction_Type";
pub const TIME_OF_TRANSACTION: &str = "Time_of_Transaction";
pub const DEVICE_USED: &str = "Device_Used";
pub const LOCATION: &str = "Location";
pub const PREVIOUS_FRAUDULENT_TRANSACTIONS: &str = "Previous_Fraudulent_Transactions";
pub const ACCOUNT_AGE: &str = "Account_Age";
pub const NUMBER_OF_TRANSACTIONS_LAST_24H: &str = "Number_of_Transactions_Last_24H";
pub const PAYMENT_METHOD: &str = "Payment_Method";

/// Minutes in a day; `Time_of_Transaction` must be below this
pub const MINUTES_PER_DAY: f64 = 1440.0;

/// JSON type expected for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Real,
    Text,
}

impl FieldKind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            FieldKind::Integer => whole_number(value).is_some(),
            FieldKind::Real => value.is_number(),
            FieldKind::Text => value.is_string(),
        }
    }

    fn expected(self) -> &'static str {
        match self {
            FieldKind::Integer => "entier attendu",
            FieldKind::Real => "nombre attendu",
            FieldKind::Text => "chaîne attendue",
        }
    }
}

/// Wire name, struct field name and type of one transaction field
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub member: &'static str,
    pub kind: FieldKind,
    /// Whether a batch row may carry `null` for this field
    pub imputable: bool,
}

const fn field(name: &'static str, member: &'static str, kind: FieldKind, imputable: bool) -> FieldSpec {
    FieldSpec { name, member, kind, imputable }
}

/// All transaction fields, in declaration order.
/// Validation reports the first failing field in this order.
pub const TRANSACTION_FIELDS: [FieldSpec; 10] = [
    field(USER_ID, "user_id", FieldKind::Integer, false),
    field(TRANSACTION_AMOUNT, "transaction_amount", FieldKind::Real, true),
    field(TRANSACTION_TYPE, "transaction_type", FieldKind::Text, true),
    field(TIME_OF_TRANSACTION, "time_of_transaction", FieldKind::Real, true),
    field(DEVICE_USED, "device_used", FieldKind::Text, true),
    field(LOCATION, "location", FieldKind::Text, true),
    field(PREVIOUS_FRAUDULENT_TRANSACTIONS, "previous_fraudulent_transactions", FieldKind::Integer, true),
    field(ACCOUNT_AGE, "account_age", FieldKind::Integer, true),
    field(NUMBER_OF_TRANSACTIONS_LAST_24H, "number_of_transactions_last_24h", FieldKind::Integer, true),
    field(PAYMENT_METHOD, "payment_method", FieldKind::Text, true),
];

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// Structured validation failure: which field, and why
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Prefix the field path, e.g. `transactions[2].Location`
    pub fn within(self, parent: &str) -> Self {
        Self {
            field: format!("{}.{}", parent, self.field),
            reason: self.reason,
        }
    }

    fn from_report(report: validator::ValidationErrors) -> Self {
        let field_errors = report.field_errors();

        for spec in TRANSACTION_FIELDS.iter() {
            for (key, errors) in field_errors.iter() {
                let key: &str = key.as_ref();
                if key != spec.member && key != spec.name {
                    continue;
                }
                let reason = errors
                    .first()
                    .map(|e| match &e.message {
                        Some(message) => message.to_string(),
                        None => e.code.to_string(),
                    })
                    .unwrap_or_else(|| "valeur invalide".to_string());
                return Self::new(spec.name, reason);
            }
        }

        Self::new("body", report.to_string())
    }
}

// ============================================================================
// SINGLE RECORD
// ============================================================================

/// A fully specified transaction, as submitted to `POST /predire`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TransactionRecord {
    #[serde(rename = "User_ID")]
    pub user_id: i64,

    #[serde(rename = "Transaction_Amount")]
    #[validate(range(min = 0.0, message = "doit être positif ou nul"))]
    pub transaction_amount: f64,

    #[serde(rename = "Transaction_Type")]
    pub transaction_type: String,

    /// Minutes since midnight
    #[serde(rename = "Time_of_Transaction")]
    #[validate(range(min = 0.0, exclusive_max = 1440.0, message = "doit être dans [0, 1440)"))]
    pub time_of_transaction: f64,

    #[serde(rename = "Device_Used")]
    pub device_used: String,

    #[serde(rename = "Location")]
    pub location: String,

    #[serde(rename = "Previous_Fraudulent_Transactions")]
    #[validate(range(min = 0, message = "doit être positif ou nul"))]
    pub previous_fraudulent_transactions: i64,

    /// Months
    #[serde(rename = "Account_Age")]
    #[validate(range(min = 0, message = "doit être positif ou nul"))]
    pub account_age: i64,

    #[serde(rename = "Number_of_Transactions_Last_24H")]
    #[validate(range(min = 0, message = "doit être positif ou nul"))]
    pub number_of_transactions_last_24h: i64,

    #[serde(rename = "Payment_Method")]
    pub payment_method: String,
}

impl TransactionRecord {
    /// Validate a request body and build the record.
    ///
    /// Extra keys are ignored. Missing keys, `null` values, wrong JSON types and
    /// out-of-range values are rejected with the offending field name.
    pub fn from_json(mut value: Value) -> Result<Self, ValidationError> {
        check_fields(as_object(&mut value)?, false)?;

        let record: Self = serde_json::from_value(value)
            .map_err(|e| ValidationError::new("body", e.to_string()))?;
        record.validate().map_err(ValidationError::from_report)?;

        Ok(record)
    }
}

// ============================================================================
// BATCH ROW
// ============================================================================

/// One row of a batch request; `None` marks a value to impute
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct PartialTransaction {
    #[serde(rename = "User_ID")]
    pub user_id: i64,

    #[serde(rename = "Transaction_Amount")]
    #[validate(range(min = 0.0, message = "doit être positif ou nul"))]
    pub transaction_amount: Option<f64>,

    #[serde(rename = "Transaction_Type")]
    pub transaction_type: Option<String>,

    #[serde(rename = "Time_of_Transaction")]
    #[validate(range(min = 0.0, exclusive_max = 1440.0, message = "doit être dans [0, 1440)"))]
    pub time_of_transaction: Option<f64>,

    #[serde(rename = "Device_Used")]
    pub device_used: Option<String>,

    #[serde(rename = "Location")]
    pub location: Option<String>,

    #[serde(rename = "Previous_Fraudulent_Transactions")]
    #[validate(range(min = 0, message = "doit être positif ou nul"))]
    pub previous_fraudulent_transactions: Option<i64>,

    #[serde(rename = "Account_Age")]
    #[validate(range(min = 0, message = "doit être positif ou nul"))]
    pub account_age: Option<i64>,

    #[serde(rename = "Number_of_Transactions_Last_24H")]
    #[validate(range(min = 0, message = "doit être positif ou nul"))]
    pub number_of_transactions_last_24h: Option<i64>,

    #[serde(rename = "Payment_Method")]
    pub payment_method: Option<String>,
}

impl PartialTransaction {
    /// Validate one batch row. Keys must be present; imputable values may be `null`.
    pub fn from_json(mut value: Value) -> Result<Self, ValidationError> {
        check_fields(as_object(&mut value)?, true)?;

        let row: Self = serde_json::from_value(value)
            .map_err(|e| ValidationError::new("body", e.to_string()))?;
        row.validate().map_err(ValidationError::from_report)?;

        Ok(row)
    }
}

impl From<&TransactionRecord> for PartialTransaction {
    fn from(record: &TransactionRecord) -> Self {
        Self {
            user_id: record.user_id,
            transaction_amount: Some(record.transaction_amount),
            transaction_type: Some(record.transaction_type.clone()),
            time_of_transaction: Some(record.time_of_transaction),
            device_used: Some(record.device_used.clone()),
            location: Some(record.location.clone()),
            previous_fraudulent_transactions: Some(record.previous_fraudulent_transactions),
            account_age: Some(record.account_age),
            number_of_transactions_last_24h: Some(record.number_of_transactions_last_24h),
            payment_method: Some(record.payment_method.clone()),
        }
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn as_object(value: &mut Value) -> Result<&mut Map<String, Value>, ValidationError> {
    value
        .as_object_mut()
        .ok_or_else(|| ValidationError::new("body", "objet JSON attendu"))
}

/// Integer value of a JSON number, including floats with no fractional part (`12.0`)
fn whole_number(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
        .map(|f| f as i64)
}

/// Presence, nullability and JSON type checks, in field order.
/// Whole-number floats in integer fields are rewritten as integers.
fn check_fields(object: &mut Map<String, Value>, allow_null: bool) -> Result<(), ValidationError> {
    for spec in TRANSACTION_FIELDS.iter() {
        match object.get_mut(spec.name) {
            None => return Err(ValidationError::new(spec.name, "champ requis manquant")),
            Some(Value::Null) if allow_null && spec.imputable => continue,
            Some(Value::Null) => return Err(ValidationError::new(spec.name, "valeur requise, null reçu")),
            Some(value) if !spec.kind.accepts(&*value) => {
                return Err(ValidationError::new(
                    spec.name,
                    format!("type invalide, {}", spec.kind.expected()),
                ));
            }
            Some(value) => {
                if spec.kind == FieldKind::Integer && !value.is_i64() {
                    if let Some(n) = whole_number(value) {
                        *value = Value::from(n);
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn sample_json() -> Value {
    serde_json::json!({
        "User_ID": 1,
        "Transaction_Amount": 250.0,
        "Transaction_Type": "purchase",
        "Time_of_Transaction": 600.0,
        "Device_Used": "mobile",
        "Location": "Abidjan",
        "Previous_Fraudulent_Transactions": 0,
        "Account_Age": 12,
        "Number_of_Transactions_Last_24H": 3,
        "Payment_Method": "card"
    })
}
