//! Feature Encoder - transaction rows to classifier input
//!
//! Reproduces the training-time preprocessing:
//! 1. numeric nulls → mean of that column over the batch
//! 2. categorical nulls → `"unknown"`
//! 3. one-hot expansion, column name `<Field>_<value>`
//! 4. reconcile with the training schema: absent columns are 0, columns the
//!    schema does not name are dropped, order follows the schema
//!
//! Encoding never fails. An unseen categorical value simply sets no column.

use crate::models::transaction::{
    PartialTransaction, TransactionRecord, ACCOUNT_AGE, DEVICE_USED, LOCATION,
    NUMBER_OF_TRANSACTIONS_LAST_24H, PAYMENT_METHOD, PREVIOUS_FRAUDULENT_TRANSACTIONS,
    TIME_OF_TRANSACTION, TRANSACTION_AMOUNT, TRANSACTION_TYPE, USER_ID,
};

use super::schema::TrainingSchema;

/// Replacement for a missing categorical value
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Separator between field name and value in one-hot column names
pub const ONE_HOT_SEPARATOR: &str = "_";

/// Numeric fields subject to mean imputation
pub const NUMERIC_FIELDS: [&str; 5] = [
    TRANSACTION_AMOUNT,
    TIME_OF_TRANSACTION,
    PREVIOUS_FRAUDULENT_TRANSACTIONS,
    ACCOUNT_AGE,
    NUMBER_OF_TRANSACTIONS_LAST_24H,
];

/// Fields expanded to one-hot columns
pub const CATEGORICAL_FIELDS: [&str; 4] = [TRANSACTION_TYPE, DEVICE_USED, LOCATION, PAYMENT_METHOD];

/// Encoded row, laid out exactly as the training schema
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of a named column
    pub fn get(&self, schema: &TrainingSchema, column: &str) -> Option<f64> {
        schema.position(column).and_then(|idx| self.values.get(idx).copied())
    }
}

/// One-hot column name for a categorical value
pub fn one_hot_column(field: &str, value: &str) -> String {
    format!("{}{}{}", field, ONE_HOT_SEPARATOR, value)
}

/// Encode a single, fully specified record
pub fn encode(record: &TransactionRecord, schema: &TrainingSchema) -> FeatureVector {
    let row = PartialTransaction::from(record);
    encode_batch(std::slice::from_ref(&row), schema)
        .pop()
        .unwrap_or_else(|| FeatureVector { values: vec![0.0; schema.len()] })
}

/// Encode a batch; null numeric values take the batch column mean.
///
/// A column with no value anywhere in the batch stays `NaN`, which the
/// classifier treats as missing.
pub fn encode_batch(rows: &[PartialTransaction], schema: &TrainingSchema) -> Vec<FeatureVector> {
    let means: Vec<f64> = NUMERIC_FIELDS
        .iter()
        .enumerate()
        .map(|(idx, _)| column_mean(rows.iter().map(|row| numeric_values(row)[idx])))
        .collect();

    let numeric_slots: Vec<Option<usize>> = NUMERIC_FIELDS.iter().map(|f| schema.position(f)).collect();
    let user_id_slot = schema.position(USER_ID);

    rows.iter()
        .map(|row| {
            let mut values = vec![0.0; schema.len()];

            if let Some(slot) = user_id_slot {
                values[slot] = row.user_id as f64;
            }

            for (idx, value) in numeric_values(row).into_iter().enumerate() {
                if let Some(slot) = numeric_slots[idx] {
                    values[slot] = value.unwrap_or(means[idx]);
                }
            }

            for (field, value) in CATEGORICAL_FIELDS.iter().zip(categorical_values(row)) {
                let value = value.unwrap_or(UNKNOWN_CATEGORY);
                if let Some(slot) = schema.position(&one_hot_column(field, value)) {
                    values[slot] = 1.0;
                }
            }

            FeatureVector { values }
        })
        .collect()
}

// ============================================================================
// HELPERS
// ============================================================================

/// Numeric values in `NUMERIC_FIELDS` order
fn numeric_values(row: &PartialTransaction) -> [Option<f64>; 5] {
    [
        row.transaction_amount,
        row.time_of_transaction,
        row.previous_fraudulent_transactions.map(|v| v as f64),
        row.account_age.map(|v| v as f64),
        row.number_of_transactions_last_24h.map(|v| v as f64),
    ]
}

/// Categorical values in `CATEGORICAL_FIELDS` order
fn categorical_values(row: &PartialTransaction) -> [Option<&str>; 4] {
    [
        row.transaction_type.as_deref(),
        row.device_used.as_deref(),
        row.location.as_deref(),
        row.payment_method.as_deref(),
    ]
}

fn column_mean(values: impl Iterator<Item = Option<f64>>) -> f64 {
    let (sum, count) = values
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::sample_json;

    fn schema() -> TrainingSchema {
        TrainingSchema::new(
            [
                "User_ID",
                "Transaction_Amount",
                "Time_of_Transaction",
                "Previous_Fraudulent_Transactions",
                "Account_Age",
                "Number_of_Transactions_Last_24H",
                "Transaction_Type_purchase",
                "Transaction_Type_withdrawal",
                "Device_Used_desktop",
                "Device_Used_mobile",
                "Device_Used_unknown",
                "Location_Abidjan",
                "Payment_Method_card",
                "Payment_Method_mobile money",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        )
        .unwrap()
    }

    fn record() -> TransactionRecord {
        TransactionRecord::from_json(sample_json()).unwrap()
    }

    #[test]
    fn test_vector_matches_schema() {
        let schema = schema();
        let vector = encode(&record(), &schema);

        assert_eq!(vector.len(), schema.len());
        assert_eq!(
            vector.as_slice(),
            &[1.0, 250.0, 600.0, 0.0, 12.0, 3.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0]
        );
    }

    #[test]
    fn test_unseen_category_is_all_zero() {
        let schema = schema();
        let mut record = record();
        record.payment_method = "crypto".to_string();
        record.location = "Bouaké".to_string();

        let vector = encode(&record, &schema);
        assert_eq!(vector.len(), schema.len());
        assert_eq!(vector.get(&schema, "Payment_Method_card"), Some(0.0));
        assert_eq!(vector.get(&schema, "Payment_Method_mobile money"), Some(0.0));
        assert_eq!(vector.get(&schema, "Location_Abidjan"), Some(0.0));
        assert_eq!(vector.get(&schema, "Payment_Method_crypto"), None);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let schema = schema();
        let record = record();
        assert_eq!(encode(&record, &schema), encode(&record, &schema));
    }

    #[test]
    fn test_schema_columns_not_produced_are_zero() {
        let schema = TrainingSchema::new(vec![
            "Payment_Method_card".to_string(),
            "Transaction_ID".to_string(),
            "Account_Age".to_string(),
        ])
        .unwrap();

        let vector = encode(&record(), &schema);
        assert_eq!(vector.as_slice(), &[1.0, 0.0, 12.0]);
    }

    #[test]
    fn test_batch_mean_imputation() {
        let schema = schema();
        let base = PartialTransaction::from(&record());

        let mut first = base.clone();
        first.transaction_amount = Some(100.0);
        let mut second = base.clone();
        second.transaction_amount = Some(300.0);
        let mut third = base;
        third.transaction_amount = None;
        third.device_used = None;

        let vectors = encode_batch(&[first, second, third], &schema);
        assert_eq!(vectors.len(), 3);
        assert_eq!(vectors[2].get(&schema, "Transaction_Amount"), Some(200.0));
        assert_eq!(vectors[2].get(&schema, "Device_Used_unknown"), Some(1.0));
        assert_eq!(vectors[2].get(&schema, "Device_Used_mobile"), Some(0.0));
    }

    #[test]
    fn test_all_missing_column_is_nan() {
        let schema = schema();
        let mut row = PartialTransaction::from(&record());
        row.account_age = None;

        let vectors = encode_batch(&[row], &schema);
        let age = vectors[0].get(&schema, "Account_Age").unwrap();
        assert!(age.is_nan());
    }

    #[test]
    fn test_single_record_equals_batch_of_one() {
        let schema = schema();
        let record = record();
        let batch = encode_batch(&[PartialTransaction::from(&record)], &schema);
        assert_eq!(batch[0], encode(&record, &schema));
    }

    #[test]
    fn test_empty_batch() {
        assert!(encode_batch(&[], &schema()).is_empty());
    }
}
