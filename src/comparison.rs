use crate::models::SummaryMetrics;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChangeIndicator {
    pub percent: f64,
    pub is_improvement: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SummaryChanges {
    pub income: Option<ChangeIndicator>,
    pub expenses: Option<ChangeIndicator>,
    pub profit: Option<ChangeIndicator>,
}

impl SummaryChanges {
    pub fn between(previous: Option<&SummaryMetrics>, current: &SummaryMetrics) -> Self {
        let Some(previous) = previous else {
            return Self::default();
        };
        Self {
            income: compute_change(previous.total_income, current.total_income, true),
            // rising costs are bad
            expenses: compute_change(previous.total_costs, current.total_costs, false),
            profit: compute_change(previous.net_profit, current.net_profit, true),
        }
    }
}

pub fn compute_change(
    old_value: f64,
    new_value: f64,
    positive_is_improvement: bool,
) -> Option<ChangeIndicator> {
    if old_value == 0.0 || !old_value.is_finite() || !new_value.is_finite() {
        return None;
    }

    let percent = (new_value - old_value) / old_value * 100.0;
    let is_improvement = if positive_is_improvement {
        percent >= 0.0
    } else {
        percent < 0.0
    };

    Some(ChangeIndicator {
        percent,
        is_improvement,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_or_invalid_baseline_has_no_change() {
        assert_eq!(compute_change(0.0, 100.0, true), None);
        assert_eq!(compute_change(f64::NAN, 100.0, true), None);
        assert_eq!(compute_change(100.0, f64::INFINITY, true), None);
    }

    #[test]
    fn polarity_decides_improvement() {
        let up = compute_change(100.0, 150.0, true).unwrap();
        assert_eq!(up.percent, 50.0);
        assert!(up.is_improvement);

        let costs_up = compute_change(100.0, 150.0, false).unwrap();
        assert_eq!(costs_up.percent, 50.0);
        assert!(!costs_up.is_improvement);

        let costs_down = compute_change(200.0, 100.0, false).unwrap();
        assert_eq!(costs_down.percent, -50.0);
        assert!(costs_down.is_improvement);
    }

    #[test]
    fn unchanged_value_counts_as_improvement_when_positive_is_good() {
        let flat = compute_change(80.0, 80.0, true).unwrap();
        assert_eq!(flat.percent, 0.0);
        assert!(flat.is_improvement);
        assert!(!compute_change(80.0, 80.0, false).unwrap().is_improvement);
    }

    #[test]
    fn changes_need_a_previous_summary() {
        let current = SummaryMetrics {
            total_income: 1200.0,
            total_costs: 300.0,
            net_profit: 900.0,
        };
        assert_eq!(SummaryChanges::between(None, &current), SummaryChanges::default());

        let previous = SummaryMetrics {
            total_income: 1000.0,
            total_costs: 400.0,
            net_profit: 0.0,
        };
        let changes = SummaryChanges::between(Some(&previous), &current);
        assert!(changes.income.unwrap().is_improvement);
        assert!(changes.expenses.unwrap().is_improvement);
        assert_eq!(changes.profit, None);
    }
}
