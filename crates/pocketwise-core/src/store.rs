//! In-memory transaction store
//!
//! The store is built once from a serialized source and is read-only afterwards,
//! so it can be shared behind an `Arc` without locking. Every query returns
//! owned copies; callers never see the internal vector.
//!
//! Loading goes through a [`ValidationPolicy`]:
//! - `Lenient` accepts records that break the category or amount-sign rules
//!   (logging each one) and skips records whose date or type cannot be parsed.
//! - `Strict` fails on the first invalid record.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::models::{Transaction, TransactionRecord, TransactionType};

/// Dataset compiled into the binary, used when no source path is configured
const EMBEDDED_TRANSACTIONS: &str = include_str!("../../../data/transactions.json");

/// How invalid records are treated at load time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationPolicy {
    #[default]
    Lenient,
    Strict,
}

/// Outcome of loading a source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Records held by the store
    pub loaded: usize,
    /// Records dropped because their date or type could not be parsed
    pub skipped: usize,
    /// Records kept despite a category or amount-sign violation
    pub flagged: usize,
}

/// Immutable collection of validated transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionStore {
    transactions: Vec<Transaction>,
    report: LoadReport,
}

impl TransactionStore {
    /// Create a store from already-typed transactions
    pub fn new(transactions: Vec<Transaction>) -> Self {
        let report = LoadReport {
            loaded: transactions.len(),
            ..Default::default()
        };
        Self {
            transactions,
            report,
        }
    }

    /// Validate raw records into a store
    pub fn from_records(records: Vec<TransactionRecord>, policy: ValidationPolicy) -> Result<Self> {
        let mut transactions = Vec::with_capacity(records.len());
        let mut report = LoadReport::default();

        for (index, record) in records.into_iter().enumerate() {
            let tx = match Transaction::try_from(record) {
                Ok(tx) => tx,
                Err(e) if policy == ValidationPolicy::Strict => {
                    warn!(index, error = %e, "Rejecting transaction source");
                    return Err(e);
                }
                Err(e) => {
                    warn!(index, error = %e, "Skipping unreadable transaction record");
                    report.skipped += 1;
                    continue;
                }
            };

            if let Err(e) = tx.validate() {
                if policy == ValidationPolicy::Strict {
                    warn!(index, error = %e, "Rejecting transaction source");
                    return Err(e);
                }
                warn!(
                    index,
                    category = %tx.category,
                    amount = tx.amount,
                    error = %e,
                    "Accepting transaction that failed validation"
                );
                report.flagged += 1;
            }

            transactions.push(tx);
        }

        report.loaded = transactions.len();
        debug!(?report, "Transaction records validated");

        Ok(Self {
            transactions,
            report,
        })
    }

    /// Load from a JSON array of records
    pub fn from_json(data: &str, policy: ValidationPolicy) -> Result<Self> {
        let records: Vec<TransactionRecord> = serde_json::from_str(data)?;
        Self::from_records(records, policy)
    }

    /// Load from CSV with a `date,amount,category,description,type` header
    pub fn from_csv<R: Read>(reader: R, policy: ValidationPolicy) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let records = csv_reader
            .deserialize()
            .collect::<std::result::Result<Vec<TransactionRecord>, _>>()?;

        Self::from_records(records, policy)
    }

    /// Load from a file, picking the format from its extension
    pub fn load(path: &Path, policy: ValidationPolicy) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        let store = match extension.as_deref() {
            Some("csv") => Self::from_csv(std::fs::File::open(path)?, policy)?,
            Some("json") | None => Self::from_json(&std::fs::read_to_string(path)?, policy)?,
            Some(other) => {
                return Err(Error::InvalidData(format!(
                    "Unsupported transaction source format: {}",
                    other
                )))
            }
        };

        info!(
            path = %path.display(),
            loaded = store.report.loaded,
            skipped = store.report.skipped,
            flagged = store.report.flagged,
            "Loaded transactions"
        );
        Ok(store)
    }

    /// Load the dataset compiled into the binary
    pub fn embedded(policy: ValidationPolicy) -> Result<Self> {
        let store = Self::from_json(EMBEDDED_TRANSACTIONS, policy)?;
        info!(loaded = store.report.loaded, "Loaded embedded transactions");
        Ok(store)
    }

    /// Summary of how the source was loaded
    pub fn load_report(&self) -> LoadReport {
        self.report
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// All transactions
    pub fn get_all(&self) -> Result<Vec<Transaction>> {
        if self.transactions.is_empty() {
            return Err(Error::NoTransactions);
        }
        Ok(self.transactions.clone())
    }

    /// Transactions with `start <= date <= end`
    pub fn get_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Transaction>> {
        if start > end {
            return Err(Error::InvalidDateRange);
        }
        self.filter(|tx| tx.date >= start && tx.date <= end)
    }

    pub fn get_by_type(&self, tx_type: TransactionType) -> Result<Vec<Transaction>> {
        self.filter(|tx| tx.tx_type == tx_type)
    }

    pub fn get_by_category(&self, category: &str) -> Result<Vec<Transaction>> {
        self.filter(|tx| tx.category == category)
    }

    /// Earliest and latest transaction dates
    pub fn get_date_range(&self) -> Result<(NaiveDate, NaiveDate)> {
        date_bounds(&self.transactions).ok_or(Error::NoTransactions)
    }

    fn filter<F>(&self, predicate: F) -> Result<Vec<Transaction>>
    where
        F: Fn(&Transaction) -> bool,
    {
        let filtered: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|tx| predicate(tx))
            .cloned()
            .collect();

        if filtered.is_empty() {
            return Err(Error::NoTransactions);
        }
        Ok(filtered)
    }
}

/// Min and max dates of a slice, `None` when empty
pub fn date_bounds(transactions: &[Transaction]) -> Option<(NaiveDate, NaiveDate)> {
    let min = transactions.iter().map(|tx| tx.date).min()?;
    let max = transactions.iter().map(|tx| tx.date).max()?;
    Some((min, max))
}
