//! Sample transaction dataset read by the dashboard

use std::fs::File;
use std::io::Read;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::DashboardError;

/// One CSV row; empty cells become `None`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SampleTransaction {
    #[serde(rename = "Transaction_ID")]
    pub transaction_id: String,
    #[serde(rename = "User_ID")]
    pub user_id: i64,
    #[serde(rename = "Transaction_Amount")]
    pub transaction_amount: Option<f64>,
    #[serde(rename = "Transaction_Type")]
    pub transaction_type: Option<String>,
    #[serde(rename = "Time_of_Transaction")]
    pub time_of_transaction: Option<f64>,
    #[serde(rename = "Device_Used")]
    pub device_used: Option<String>,
    #[serde(rename = "Location")]
    pub location: Option<String>,
    #[serde(rename = "Previous_Fraudulent_Transactions")]
    pub previous_fraudulent_transactions: Option<i64>,
    #[serde(rename = "Account_Age")]
    pub account_age: Option<i64>,
    #[serde(rename = "Number_of_Transactions_Last_24H")]
    pub number_of_transactions_last_24h: Option<i64>,
    #[serde(rename = "Payment_Method")]
    pub payment_method: Option<String>,
    /// Ground-truth label, never sent to the API
    #[serde(rename = "Fraudulent", default, skip_serializing)]
    pub fraudulent: Option<i64>,
}

impl SampleTransaction {
    /// Request body for scoring; empty cells become `null`
    pub fn payload(&self) -> Result<Value, DashboardError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Headline fields shown before scoring
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        fn show<T: ToString>(value: &Option<T>) -> String {
            value.as_ref().map(T::to_string).unwrap_or_else(|| "-".to_string())
        }

        vec![
            ("ID de transaction", self.transaction_id.clone()),
            ("Montant de la transaction", show(&self.transaction_amount)),
            ("Mode de paiement", show(&self.payment_method)),
            ("Localisation", show(&self.location)),
            ("Appareil utilisé", show(&self.device_used)),
            ("Âge du compte", show(&self.account_age)),
        ]
    }
}

#[derive(Debug, Clone, Default)]
pub struct SampleDataset {
    rows: Vec<SampleTransaction>,
}

impl SampleDataset {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DashboardError> {
        let file = File::open(path.as_ref())?;
        let dataset = Self::from_reader(file)?;
        tracing::debug!(path = %path.as_ref().display(), rows = dataset.len(), "Sample dataset loaded");
        Ok(dataset)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DashboardError> {
        let rows = csv::Reader::from_reader(reader)
            .deserialize()
            .collect::<Result<Vec<SampleTransaction>, csv::Error>>()?;
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Exact, whitespace-trimmed match on `Transaction_ID`
    pub fn find(&self, transaction_id: &str) -> Option<&SampleTransaction> {
        let wanted = transaction_id.trim();
        self.rows.iter().find(|row| row.transaction_id == wanted)
    }

    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&SampleTransaction> {
        self.rows.choose(rng)
    }
}

#[cfg(test)]
pub(crate) const SAMPLE_CSV: &str = "\
Transaction_ID,User_ID,Transaction_Amount,Transaction_Type,Time_of_Transaction,Device_Used,Location,Previous_Fraudulent_Transactions,Account_Age,Number_of_Transactions_Last_24H,Payment_Method,Fraudulent
T1,4174,1292.76,ATM Withdrawal,16.0,Tablet,San Francisco,0,119,13,Debit Card,0
T2,4507,1554.58,ATM Withdrawal,13.0,Mobile,New York,4,79,3,Credit Card,0
T3,1860,2395.02,ATM Withdrawal,,Mobile,,3,115,9,Debit Card,1
";
