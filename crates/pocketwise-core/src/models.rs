//! Domain models for Pocketwise

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Wire format for calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Round a monetary or percentage figure to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| Error::InvalidDate)
}

/// Transaction type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(Error::InvalidType),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    /// Positive for income, negative for expenses
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.tx_type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.tx_type == TransactionType::Expense
    }

    pub fn absolute_amount(&self) -> f64 {
        self.amount.abs()
    }

    /// Zero-padded `YYYY-MM` key used for monthly aggregation
    pub fn year_month(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }

    /// Check the rules that a typed transaction can still violate
    pub fn validate(&self) -> Result<()> {
        if self.category.trim().is_empty() {
            return Err(Error::InvalidCategory);
        }
        if !self.amount.is_finite() {
            return Err(Error::InvalidAmount);
        }
        match self.tx_type {
            TransactionType::Income if self.amount < 0.0 => Err(Error::InvalidAmount),
            TransactionType::Expense if self.amount > 0.0 => Err(Error::InvalidAmount),
            _ => Ok(()),
        }
    }
}

/// A transaction as it appears in the serialized source, before validation
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionRecord {
    #[serde(default)]
    pub date: String,
    pub amount: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub tx_type: String,
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = Error;

    /// Convert the structural fields. Category and sign rules are left to
    /// [`Transaction::validate`] so callers can choose how strict to be.
    /// A non-finite amount (`NaN`, `inf`) is unusable and fails here.
    fn try_from(record: TransactionRecord) -> Result<Self> {
        let date = parse_date(&record.date)?;
        let tx_type = record.tx_type.parse()?;
        if !record.amount.is_finite() {
            return Err(Error::InvalidAmount);
        }
        Ok(Transaction {
            date,
            amount: record.amount,
            category: record.category,
            description: record.description,
            tx_type,
        })
    }
}

/// Inclusive calendar span covered by a set of transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Inclusive count of calendar months spanned
    pub months: u32,
}

impl Period {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            months: months_between(start, end),
        }
    }
}

/// Inclusive month count, e.g. Jan to Feb is 2
pub fn months_between(start: NaiveDate, end: NaiveDate) -> u32 {
    let years = end.year() - start.year();
    let months = end.month() as i32 - start.month() as i32;
    (years * 12 + months + 1).max(0) as u32
}

/// Aggregated figures for a single category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDetail {
    pub total: f64,
    pub count: usize,
    pub percentage: f64,
}

/// High-level financial metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_savings: f64,
    pub savings_rate: f64,
}

impl FinancialSummary {
    /// Build from raw totals, rounding every field
    pub fn from_totals(total_income: f64, total_expenses: f64) -> Self {
        let total_income = round2(total_income);
        let total_expenses = round2(total_expenses);
        let net_savings = round2(total_income - total_expenses);
        let savings_rate = if total_income > 0.0 {
            round2(net_savings / total_income * 100.0)
        } else {
            0.0
        };

        Self {
            total_income,
            total_expenses,
            net_savings,
            savings_rate,
        }
    }
}

/// Category-wise breakdown with an overall summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub income: BTreeMap<String, CategoryDetail>,
    pub expenses: BTreeMap<String, CategoryDetail>,
    pub summary: FinancialSummary,
    pub period: Period,
}

/// Timeline bucket size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Monthly,
    Weekly,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Weekly => "weekly",
        }
    }

    /// Zero-padded bucket key, so lexicographic order is chronological
    pub fn key_for(&self, date: NaiveDate) -> String {
        match self {
            Self::Monthly => date.format("%Y-%m").to_string(),
            Self::Weekly => date.format("%G-W%V").to_string(),
        }
    }
}

impl std::str::FromStr for Granularity {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monthly" | "month" => Ok(Self::Monthly),
            "weekly" | "week" => Ok(Self::Weekly),
            _ => Err(Error::InvalidData(format!("Unknown aggregation: {}", s))),
        }
    }
}

/// Income and expenses for a single period bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub period: String,
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
}

/// Ordered time series of income vs expenses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineResponse {
    pub timeline: Vec<TimelinePoint>,
    pub aggregation: Granularity,
}

/// Transactions with metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<Transaction>,
    pub count: usize,
    pub period: Period,
}

/// A request for financial advice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceRequest {
    /// Free-form tag such as "general", "savings" or "budgeting"
    #[serde(default = "default_context")]
    pub context: String,
    /// Scope the advice to a single category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

fn default_context() -> String {
    "general".to_string()
}

impl Default for AdviceRequest {
    fn default() -> Self {
        Self {
            context: default_context(),
            category: None,
        }
    }
}

impl AdviceRequest {
    /// Focus category, ignoring blank values
    pub fn focus_category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// Which path produced a piece of advice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdviceSource {
    /// Text generated by the external model
    Model,
    /// Deterministic rule-based fallback
    Heuristic,
}

/// Generated financial advice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceResponse {
    pub advice: String,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub source: AdviceSource,
}
