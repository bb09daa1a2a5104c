//! Aggregator: monthly buckets and per-category totals
//!
//! Month buckets cover a contiguous window ending at the reference month, with
//! every month present even when it has no records, so that downstream
//! month-over-month math never sees gaps. Category totals are independent of
//! the window; they carry a per-bucket series for the window as well.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{
    format_money, BreakdownSlice, CategoryTotal, MonthBucket, Record, RecordKind,
    NO_DATA_CATEGORY, OTHER_CATEGORY,
};

/// A contiguous run of calendar months ending at a reference month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthWindow {
    /// Months since year 0 of the first month (year * 12 + month - 1)
    first: i64,
    len: usize,
}

impl MonthWindow {
    /// Window of `window_months` months before `now`'s month, plus that month
    pub fn ending_at(now: NaiveDate, window_months: u32) -> Self {
        let last = month_index(now);
        Self {
            first: last - i64::from(window_months),
            len: window_months as usize + 1,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Position of a date's month inside the window
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        let offset = month_index(date) - self.first;
        usize::try_from(offset).ok().filter(|i| *i < self.len)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.index_of(date).is_some()
    }

    /// (year, month) for each position, oldest first
    pub fn months(&self) -> impl Iterator<Item = (i32, u32)> + '_ {
        (0..self.len as i64).map(move |i| year_month(self.first + i))
    }

    /// (year, month) `steps` months after the last month of the window
    pub fn month_after(&self, steps: u32) -> (i32, u32) {
        year_month(self.first + self.len as i64 - 1 + i64::from(steps))
    }
}

fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

fn year_month(index: i64) -> (i32, u32) {
    (index.div_euclid(12) as i32, index.rem_euclid(12) as u32 + 1)
}

/// Expense change between the last two month buckets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthChange {
    pub previous: f64,
    pub current: f64,
    pub percent: f64,
}

/// Output of one aggregation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregates {
    pub window: MonthWindow,
    /// Exactly `window.len()` buckets, oldest first
    pub months: Vec<MonthBucket>,
    pub categories: BTreeMap<String, CategoryTotal>,
    /// Most common currency code among the records, if any declare one
    pub currency: Option<String>,
}

impl Aggregates {
    /// Format an amount in the records' currency
    pub fn money(&self, amount: f64) -> String {
        format_money(amount, self.currency.as_deref())
    }

    /// Income across the window
    pub fn total_income(&self) -> f64 {
        self.months.iter().map(|m| m.income).sum()
    }

    /// Expenses across the window
    pub fn total_expenses(&self) -> f64 {
        self.months.iter().map(|m| m.expenses).sum()
    }

    /// Whether any expense record with a usable amount exists, dated or not
    pub fn has_expense_activity(&self) -> bool {
        self.categories.values().any(|c| c.count > 0)
    }

    /// Grand total of all category spending
    pub fn category_spend(&self) -> f64 {
        self.categories.values().map(|c| c.total).sum()
    }

    /// Largest category by total, ties broken by name
    pub fn top_category(&self) -> Option<&CategoryTotal> {
        // BTreeMap iterates in name order; keep the first of equal totals
        self.categories
            .values()
            .filter(|c| c.total > 0.0)
            .fold(None, |best: Option<&CategoryTotal>, c| match best {
                Some(b) if b.total >= c.total => Some(b),
                _ => Some(c),
            })
    }

    /// Change from the previous month's expenses to the current month's.
    /// None when there is no previous month or it had no spending.
    pub fn month_over_month(&self) -> Option<MonthChange> {
        let [.., previous, current] = self.months.as_slice() else {
            return None;
        };
        if previous.expenses <= 0.0 {
            return None;
        }
        Some(MonthChange {
            previous: previous.expenses,
            current: current.expenses,
            percent: (current.expenses - previous.expenses) / previous.expenses * 100.0,
        })
    }
}

/// Group records into month buckets and category totals
pub fn aggregate(records: &[Record], window_months: u32, now: NaiveDate) -> Aggregates {
    let window = MonthWindow::ending_at(now, window_months);
    let mut months: Vec<MonthBucket> = window
        .months()
        .map(|(year, month)| MonthBucket::new(year, month))
        .collect();
    let mut categories: BTreeMap<String, CategoryTotal> = BTreeMap::new();
    let mut outside_window = 0usize;

    for record in records {
        let slot = record.date().and_then(|d| window.index_of(d));

        if let Some(i) = slot {
            match record.kind {
                RecordKind::Income => months[i].income += record.amount,
                RecordKind::Expense => months[i].expenses += record.amount,
            }
        } else {
            outside_window += 1;
        }

        if record.kind != RecordKind::Expense || !record.valid_amount {
            continue;
        }

        let entry = categories
            .entry(record.category.clone())
            .or_insert_with(|| CategoryTotal::new(record.category.clone(), window.len()));
        entry.total += record.amount;
        entry.count += 1;
        if entry.color.is_none() {
            entry.color = record.color.clone();
        }
        if let Some(i) = slot {
            entry.monthly[i] += record.amount;
        }
    }

    debug!(
        records = records.len(),
        buckets = months.len(),
        categories = categories.len(),
        outside_window,
        "Aggregated records"
    );

    Aggregates {
        window,
        months,
        categories,
        currency: dominant_currency(records),
    }
}

/// Most frequent currency code, ties broken by code
fn dominant_currency(records: &[Record]) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for code in records.iter().filter_map(|r| r.currency.as_deref()) {
        *counts.entry(code).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .fold(None, |best: Option<(&str, usize)>, (code, n)| match best {
            Some((_, m)) if m >= n => best,
            _ => Some((code, n)),
        })
        .map(|(code, _)| code.to_string())
}

/// Display breakdown of spending by category.
///
/// Categories below `significance_threshold` (a 0-1 share of total spend) are
/// merged into "Other", listed last. With no spending at all the breakdown is a
/// single "No Data" slice of value 1, a chart placeholder rather than an amount.
pub fn breakdown(
    categories: &BTreeMap<String, CategoryTotal>,
    significance_threshold: f64,
) -> Vec<BreakdownSlice> {
    let grand_total: f64 = categories.values().map(|c| c.total).sum();
    if grand_total <= 0.0 {
        return vec![BreakdownSlice {
            name: NO_DATA_CATEGORY.to_string(),
            value: 1.0,
            percentage: 100.0,
            color: None,
        }];
    }

    let cutoff = grand_total * significance_threshold;
    let mut slices = Vec::new();
    let mut other_total = 0.0;

    for category in categories.values() {
        if category.total > 0.0 && category.total >= cutoff {
            slices.push(BreakdownSlice {
                name: category.name.clone(),
                value: category.total,
                percentage: category.total / grand_total * 100.0,
                color: category.color.clone(),
            });
        } else {
            other_total += category.total;
        }
    }

    slices.sort_by(|a, b| {
        b.value
            .total_cmp(&a.value)
            .then_with(|| a.name.cmp(&b.name))
    });

    if other_total > 0.0 {
        if let Some(existing) = slices.iter().position(|s| s.name == OTHER_CATEGORY) {
            let mut other = slices.remove(existing);
            other.value += other_total;
            other.percentage = other.value / grand_total * 100.0;
            slices.push(other);
        } else {
            slices.push(BreakdownSlice {
                name: OTHER_CATEGORY.to_string(),
                value: other_total,
                percentage: other_total / grand_total * 100.0,
                color: None,
            });
        }
    }

    slices
}
