//! Trend and forecast module
//!
//! Extrapolates next-period spending from the average month-over-month
//! growth rate of the (gap-free) monthly expense series:
//! - Overall trend and prediction for the next month
//! - Per-category direction from each category's two most recent active months
//! - Multi-month projections whose confidence decays with distance

use std::collections::BTreeMap;

use tracing::debug;

use crate::aggregate::Aggregates;
use crate::config::ForecastConfig;
use crate::models::{
    month_label, CategoryPrediction, Confidence, ForecastResult, ProjectedPeriod, Trend,
};

/// Percent change from each period to the next. A zero previous value
/// contributes 0% rather than dividing by zero.
pub fn growth_rates(series: &[f64]) -> Vec<f64> {
    series
        .windows(2)
        .map(|pair| {
            let (previous, current) = (pair[0], pair[1]);
            if previous == 0.0 {
                0.0
            } else {
                (current - previous) / previous * 100.0
            }
        })
        .collect()
}

/// Mean of the period-over-period growth rates (0 with fewer than two periods)
pub fn average_growth_rate(series: &[f64]) -> f64 {
    let rates = growth_rates(series);
    if rates.is_empty() {
        return 0.0;
    }
    rates.iter().sum::<f64>() / rates.len() as f64
}

/// Confidence tier for a history with `active_periods` months of spending
pub fn confidence_for(active_periods: usize, config: &ForecastConfig) -> Confidence {
    if active_periods >= config.high_confidence_periods {
        Confidence::High
    } else if active_periods >= config.medium_confidence_periods {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

/// Forecast next-period spending from the aggregated window
pub fn forecast(aggregates: &Aggregates, config: &ForecastConfig) -> ForecastResult {
    let series: Vec<f64> = aggregates.months.iter().map(|m| m.expenses).collect();

    let avg_growth_rate_percent = average_growth_rate(&series);
    let trend = Trend::from_rate(avg_growth_rate_percent);
    let last = series.last().copied().unwrap_or(0.0);
    let factor = 1.0 + avg_growth_rate_percent / 100.0;
    let predicted_amount = (last * factor).max(0.0);

    let active_periods = series.iter().filter(|v| **v > 0.0).count();
    let confidence = confidence_for(active_periods, config);

    let category_predictions: BTreeMap<String, CategoryPrediction> = aggregates
        .categories
        .values()
        .filter_map(|category| {
            predict_category(&category.monthly).map(|p| (category.name.clone(), p))
        })
        .collect();

    let mut projections = Vec::with_capacity(config.periods as usize);
    let mut amount = last;
    let mut step_confidence = confidence;
    for step in 1..=config.periods {
        amount = (amount * factor).max(0.0);
        if step > 1 {
            step_confidence = step_confidence.decayed();
        }
        let (year, month) = aggregates.window.month_after(step);
        projections.push(ProjectedPeriod {
            year,
            month,
            label: month_label(month).to_string(),
            amount,
            confidence: step_confidence,
        });
    }

    debug!(
        avg_growth_rate = avg_growth_rate_percent,
        trend = trend.as_str(),
        confidence = confidence.as_str(),
        active_periods,
        categories = category_predictions.len(),
        "Forecast computed"
    );

    ForecastResult {
        predicted_amount,
        trend,
        avg_growth_rate_percent,
        confidence,
        category_predictions,
        projections,
    }
}

/// Direction of one category from its two most recent months with spending.
/// None when the category has fewer than two such months.
fn predict_category(monthly: &[f64]) -> Option<CategoryPrediction> {
    let mut active = monthly.iter().rev().copied().filter(|v| *v > 0.0);
    let current = active.next()?;
    let previous = active.next()?;

    let change = growth_rates(&[previous, current])[0];
    Some(CategoryPrediction {
        trend: Trend::from_rate(change),
        predicted_change_percent: change,
    })
}
