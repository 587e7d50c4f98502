use crate::models::{DailyRecord, MonthlyRecord, Series};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    Mobile,
    #[default]
    Desktop,
}

pub const MONTH_NAMES: [&str; 12] = [
    "يناير", "فبراير", "مارس", "أبريل", "مايو", "يونيو", "يوليو", "أغسطس", "سبتمبر", "أكتوبر",
    "نوفمبر", "ديسمبر",
];

const SHORT_MONTH_NAMES: [&str; 12] = [
    "ينا", "فبر", "مار", "أبر", "ماي", "يون", "يول", "أغس", "سبت", "أكت", "نوف", "ديس",
];

pub fn short_month_name(name: &str) -> Option<&'static str> {
    MONTH_NAMES
        .iter()
        .position(|full| *full == name)
        .map(|index| SHORT_MONTH_NAMES[index])
}

/// One output point per record, in input order. Months are never folded
/// into yearly buckets; multi-year ranges carry the year in the label.
pub fn normalize_monthly(records: &[MonthlyRecord], mode: DisplayMode) -> Series {
    let multi_year = match (records.first(), records.last()) {
        (Some(first), Some(last)) => records.len() > 1 && first.year != last.year,
        _ => false,
    };

    let mut series = Series {
        labels: Vec::with_capacity(records.len()),
        income: Vec::with_capacity(records.len()),
        expenses: Vec::with_capacity(records.len()),
        net: None,
    };

    for record in records {
        let name = match mode {
            DisplayMode::Mobile => short_month_name(&record.month).unwrap_or(record.month.as_str()),
            DisplayMode::Desktop => record.month.as_str(),
        };
        let label = if multi_year {
            format!("{name} {}", record.year)
        } else {
            name.to_string()
        };

        series.labels.push(label);
        series.income.push(coerce_amount(&record.income));
        series.expenses.push(coerce_amount(&record.expenses));
    }

    series
}

pub fn normalize_daily(records: &[DailyRecord]) -> Series {
    let mut labels = Vec::with_capacity(records.len());
    let mut income = Vec::with_capacity(records.len());
    let mut expenses = Vec::with_capacity(records.len());
    let mut net = Vec::with_capacity(records.len());

    for record in records {
        let day_income = coerce_amount(&record.income);
        let day_expenses = coerce_amount(&record.expenses);
        labels.push(record.day.to_string());
        income.push(day_income);
        expenses.push(day_expenses);
        net.push(day_income - day_expenses);
    }

    Series {
        labels,
        income,
        expenses,
        net: Some(net),
    }
}

/// Loose JSON amount to a plottable number. Missing, null and non-numeric
/// values become 0; negative amounts are a source error and are clamped.
pub fn coerce_amount(value: &Value) -> f64 {
    let number = parse_amount(value);
    if number < 0.0 {
        warn!("negative amount {number} in breakdown data, clamping to 0");
        return 0.0;
    }
    number
}

/// Like `coerce_amount` but keeps the sign; summary profit can be negative.
pub fn coerce_signed(value: &Value) -> f64 {
    parse_amount(value)
}

fn parse_amount(value: &Value) -> f64 {
    let number = match value {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => text.trim().parse::<f64>().unwrap_or(0.0),
        Value::Bool(flag) => f64::from(u8::from(*flag)),
        _ => 0.0,
    };
    if number.is_finite() { number } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn month(name: &str, year: i32, income: Value, expenses: Value) -> MonthlyRecord {
        MonthlyRecord {
            month: name.to_string(),
            year,
            income,
            expenses,
        }
    }

    #[test]
    fn multi_year_labels_carry_the_year() {
        let records = vec![
            month("يناير", 2023, json!(10), json!(5)),
            month("فبراير", 2024, json!(20), json!(5)),
        ];
        let series = normalize_monthly(&records, DisplayMode::Desktop);
        assert_eq!(series.labels, vec!["يناير 2023", "فبراير 2024"]);
    }

    #[test]
    fn single_year_labels_are_bare_month_names() {
        let records = vec![
            month("يناير", 2023, json!(10), json!(5)),
            month("فبراير", 2023, json!(20), json!(5)),
        ];
        let series = normalize_monthly(&records, DisplayMode::Desktop);
        assert_eq!(series.labels, vec!["يناير", "فبراير"]);
        assert_eq!(series.net, None);
    }

    #[test]
    fn mobile_abbreviation_composes_with_year() {
        let records = vec![
            month("ديسمبر", 2023, json!(1), json!(1)),
            month("يناير", 2024, json!(1), json!(1)),
        ];
        let series = normalize_monthly(&records, DisplayMode::Mobile);
        assert_eq!(series.labels, vec!["ديس 2023", "ينا 2024"]);

        let single = normalize_monthly(&records[1..], DisplayMode::Mobile);
        assert_eq!(single.labels, vec!["ينا"]);
    }

    #[test]
    fn unknown_month_names_pass_through_on_mobile() {
        let records = vec![month("Sept", 2024, json!(1), json!(0))];
        let series = normalize_monthly(&records, DisplayMode::Mobile);
        assert_eq!(series.labels, vec!["Sept"]);
    }

    #[test]
    fn thirty_months_stay_thirty_points() {
        let records: Vec<MonthlyRecord> = (0..30)
            .map(|index| {
                month(
                    MONTH_NAMES[index % 12],
                    2022 + (index / 12) as i32,
                    json!(100),
                    json!(50),
                )
            })
            .collect();
        let series = normalize_monthly(&records, DisplayMode::Desktop);
        assert_eq!(series.len(), records.len());
        assert_eq!(series.income.len(), records.len());
        assert_eq!(series.expenses.len(), records.len());
        assert_eq!(series.labels[0], "يناير 2022");
        assert_eq!(series.labels[29], "يونيو 2024");
    }

    #[test]
    fn amounts_are_coerced_never_nan() {
        let records = vec![
            month("مارس", 2024, json!("1250.50"), Value::Null),
            month("أبريل", 2024, json!("n/a"), json!({"total": 3})),
        ];
        let series = normalize_monthly(&records, DisplayMode::Desktop);
        assert_eq!(series.income, vec![1250.5, 0.0]);
        assert_eq!(series.expenses, vec![0.0, 0.0]);
        assert!(series.plotted_values().all(f64::is_finite));
    }

    #[test]
    fn daily_series_labels_days_and_derives_net() {
        let records = vec![
            DailyRecord {
                day: 1,
                income: json!(300),
                expenses: json!(120.5),
                net: Value::Null,
            },
            DailyRecord {
                day: 2,
                income: Value::Null,
                expenses: json!("40"),
                net: json!(999),
            },
        ];
        let series = normalize_daily(&records);
        assert_eq!(series.labels, vec!["1", "2"]);
        assert_eq!(series.income, vec![300.0, 0.0]);
        assert_eq!(series.expenses, vec![120.5, 40.0]);
        assert_eq!(series.net, Some(vec![179.5, -40.0]));
    }

    #[test]
    fn negative_amounts_are_clamped() {
        assert_eq!(coerce_amount(&json!(-15)), 0.0);
        assert_eq!(coerce_signed(&json!(-15)), -15.0);
        assert_eq!(coerce_signed(&json!("-2.5")), -2.5);
    }

    #[test]
    fn summary_and_breakdown_coerce_alike() {
        for value in [json!(true), json!(false), json!("12.5"), json!("NaN"), json!([1])] {
            assert_eq!(coerce_amount(&value), coerce_signed(&value), "{value}");
        }
        assert_eq!(coerce_signed(&json!(true)), 1.0);
    }

    #[test]
    fn empty_input_gives_empty_series() {
        assert!(normalize_monthly(&[], DisplayMode::Mobile).is_empty());
        assert!(normalize_daily(&[]).is_empty());
    }
}
