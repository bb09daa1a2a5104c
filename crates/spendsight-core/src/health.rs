//! Financial health score
//!
//! Combines the savings rate and the expense-to-income ratio into a score in
//! 0..=100 with a qualitative status band.

use crate::models::{HealthScore, HealthStatus};

/// Savings rate (percent) that earns the full savings component
const FULL_SAVINGS_RATE: f64 = 30.0;

/// Expense ratio (percent) at which the ratio component reaches zero
const ZERO_SCORE_EXPENSE_RATIO: f64 = 120.0;

const SAVINGS_WEIGHT: f64 = 0.6;
const RATIO_WEIGHT: f64 = 0.4;

/// Score a period's income and expenses.
///
/// Without positive income both percentages are 0 and the score is 0.
pub fn compute_health_score(total_income: f64, total_expenses: f64) -> HealthScore {
    let expenses = if total_expenses.is_finite() {
        total_expenses.max(0.0)
    } else {
        0.0
    };

    if !total_income.is_finite() || total_income <= 0.0 {
        return HealthScore {
            score: 0,
            status: HealthStatus::from_score(0),
            savings_rate_percent: 0.0,
            expense_to_income_ratio_percent: 0.0,
        };
    }

    let savings_rate_percent = (total_income - expenses) / total_income * 100.0;
    let expense_to_income_ratio_percent = expenses / total_income * 100.0;

    let savings_component = (savings_rate_percent / FULL_SAVINGS_RATE * 100.0).clamp(0.0, 100.0);
    let ratio_component = ((ZERO_SCORE_EXPENSE_RATIO - expense_to_income_ratio_percent)
        / ZERO_SCORE_EXPENSE_RATIO
        * 100.0)
        .clamp(0.0, 100.0);

    let composite = SAVINGS_WEIGHT * savings_component + RATIO_WEIGHT * ratio_component;
    let score = composite.round().clamp(0.0, 100.0) as u8;

    HealthScore {
        score,
        status: HealthStatus::from_score(score),
        savings_rate_percent,
        expense_to_income_ratio_percent,
    }
}
