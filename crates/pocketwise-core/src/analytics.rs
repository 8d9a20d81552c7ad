//! Analytics engine
//!
//! Derives category breakdowns, timelines and filtered transaction views from
//! the store. Nothing is cached; every call recomputes from the snapshot.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{
    round2, CategoryDetail, CategorySummary, FinancialSummary, Granularity, Period, TimelinePoint,
    TimelineResponse, Transaction, TransactionType, TransactionsResponse,
};
use crate::store::{date_bounds, TransactionStore};

#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    store: Arc<TransactionStore>,
}

/// Filters for [`AnalyticsEngine::find_transactions`]; unset fields match everything
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Inclusive date range
    pub range: Option<(NaiveDate, NaiveDate)>,
    pub tx_type: Option<TransactionType>,
    pub category: Option<String>,
}

impl TransactionFilter {
    pub fn is_empty(&self) -> bool {
        self.range.is_none() && self.tx_type.is_none() && self.category.is_none()
    }

    fn matches(&self, t: &Transaction) -> bool {
        self.range
            .map_or(true, |(start, end)| t.date >= start && t.date <= end)
            && self.tx_type.map_or(true, |ty| t.tx_type == ty)
            && self.category.as_deref().map_or(true, |c| t.category == c)
    }
}

/// Running totals for one category before rounding
#[derive(Default)]
struct CategoryAccumulator {
    total: f64,
    count: usize,
}

/// Running totals for one timeline bucket
#[derive(Default)]
struct PeriodAccumulator {
    income: f64,
    expenses: f64,
}

impl AnalyticsEngine {
    pub fn new(store: Arc<TransactionStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &TransactionStore {
        &self.store
    }

    /// Category-wise breakdown of income and expenses with overall figures
    pub fn get_category_summary(&self) -> Result<CategorySummary> {
        let transactions = self.store.get_all()?;

        let mut income: BTreeMap<String, CategoryAccumulator> = BTreeMap::new();
        let mut expenses: BTreeMap<String, CategoryAccumulator> = BTreeMap::new();
        // Income is summed signed, matching the timeline
        let mut total_income = 0.0;
        let mut total_expenses = 0.0;

        for tx in &transactions {
            let bucket = match tx.tx_type {
                TransactionType::Income => {
                    total_income += tx.amount;
                    &mut income
                }
                TransactionType::Expense => {
                    total_expenses += tx.absolute_amount();
                    &mut expenses
                }
            };
            let entry = bucket.entry(tx.category.clone()).or_default();
            entry.total += tx.absolute_amount();
            entry.count += 1;
        }

        let (start, end) = date_bounds(&transactions).ok_or(Error::NoTransactions)?;

        debug!(
            income_categories = income.len(),
            expense_categories = expenses.len(),
            "Computed category summary"
        );

        Ok(CategorySummary {
            income: finish_categories(income),
            expenses: finish_categories(expenses),
            summary: FinancialSummary::from_totals(total_income, total_expenses),
            period: Period::new(start, end),
        })
    }

    /// Monthly income vs expenses, ascending by month
    pub fn get_timeline(&self) -> Result<TimelineResponse> {
        self.get_timeline_with(Granularity::Monthly)
    }

    /// Income vs expenses bucketed by month or ISO week
    pub fn get_timeline_with(&self, granularity: Granularity) -> Result<TimelineResponse> {
        let transactions = self.store.get_all()?;

        let mut buckets: BTreeMap<String, PeriodAccumulator> = BTreeMap::new();
        for tx in &transactions {
            let entry = buckets.entry(granularity.key_for(tx.date)).or_default();
            match tx.tx_type {
                TransactionType::Income => entry.income += tx.amount,
                TransactionType::Expense => entry.expenses += tx.absolute_amount(),
            }
        }

        let timeline = buckets
            .into_iter()
            .map(|(period, acc)| TimelinePoint {
                period,
                income: round2(acc.income),
                expenses: round2(acc.expenses),
                net: round2(acc.income - acc.expenses),
            })
            .collect();

        Ok(TimelineResponse {
            timeline,
            aggregation: granularity,
        })
    }

    /// All transactions with the span of the data as the period
    pub fn get_transactions(&self) -> Result<TransactionsResponse> {
        with_data_period(self.store.get_all()?)
    }

    /// Transactions within an inclusive range; the period echoes the request
    pub fn get_transactions_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TransactionsResponse> {
        let transactions = self.store.get_by_date_range(start, end)?;
        Ok(TransactionsResponse {
            count: transactions.len(),
            transactions,
            period: Period::new(start, end),
        })
    }

    pub fn get_transactions_by_type(&self, tx_type: TransactionType) -> Result<TransactionsResponse> {
        with_data_period(self.store.get_by_type(tx_type)?)
    }

    pub fn get_transactions_by_category(&self, category: &str) -> Result<TransactionsResponse> {
        with_data_period(self.store.get_by_category(category)?)
    }

    /// Transactions matching every filter that is set
    ///
    /// With a date range the period echoes the request, as in
    /// [`get_transactions_by_date_range`](Self::get_transactions_by_date_range);
    /// otherwise it spans the matching data.
    pub fn find_transactions(&self, filter: &TransactionFilter) -> Result<TransactionsResponse> {
        let response = match (filter.range, filter.tx_type, filter.category.as_deref()) {
            (Some((start, end)), _, _) => self.get_transactions_by_date_range(start, end)?,
            (None, Some(tx_type), _) => self.get_transactions_by_type(tx_type)?,
            (None, None, Some(category)) => self.get_transactions_by_category(category)?,
            (None, None, None) => return self.get_transactions(),
        };

        let TransactionsResponse {
            mut transactions,
            period,
            ..
        } = response;
        transactions.retain(|t| filter.matches(t));
        debug!(matched = transactions.len(), ?filter, "Filtered transactions");

        if filter.range.is_some() {
            if transactions.is_empty() {
                return Err(Error::NoTransactions);
            }
            return Ok(TransactionsResponse {
                count: transactions.len(),
                transactions,
                period,
            });
        }
        with_data_period(transactions)
    }
}

/// Round category totals and compute each one's share of the side's absolute total
fn finish_categories(
    accumulators: BTreeMap<String, CategoryAccumulator>,
) -> BTreeMap<String, CategoryDetail> {
    let type_total: f64 = accumulators.values().map(|acc| acc.total).sum();
    accumulators
        .into_iter()
        .map(|(category, acc)| {
            let percentage = if type_total > 0.0 {
                acc.total / type_total * 100.0
            } else {
                0.0
            };
            let detail = CategoryDetail {
                total: round2(acc.total),
                count: acc.count,
                percentage: round2(percentage),
            };
            (category, detail)
        })
        .collect()
}

fn with_data_period(transactions: Vec<Transaction>) -> Result<TransactionsResponse> {
    let (start, end) = date_bounds(&transactions).ok_or(Error::NoTransactions)?;
    Ok(TransactionsResponse {
        count: transactions.len(),
        transactions,
        period: Period::new(start, end),
    })
}
