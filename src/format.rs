use crate::bounds::AxisBounds;
use crate::models::{AxisTick, SummaryMetrics, SummaryText};
use crate::period::DateRange;
use crate::series::{DisplayMode, MONTH_NAMES};
use chrono::{Datelike, NaiveDate};
use csv::WriterBuilder;

const CURRENCY_SUFFIX: &str = "د.م";

pub fn format_currency(amount: f64) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{cents} {CURRENCY_SUFFIX}")
}

/// Axis tick label. Mobile screens get compact `12k` style ticks.
pub fn format_axis_tick(value: f64, mode: DisplayMode) -> String {
    match mode {
        DisplayMode::Desktop => format_currency(value),
        DisplayMode::Mobile => {
            let value = if value.is_finite() { value } else { 0.0 };
            if value >= 1000.0 {
                format!("{:.0}k", value / 1000.0)
            } else {
                format!("{value:.0}")
            }
        }
    }
}

/// Evenly spaced gridline labels across the suggested axis range.
pub fn axis_ticks(bounds: &AxisBounds, mode: DisplayMode) -> Vec<AxisTick> {
    let steps: u32 = match mode {
        DisplayMode::Mobile => 4,
        DisplayMode::Desktop => 6,
    };
    let span = bounds.suggested_max - bounds.suggested_min;
    (0..=steps)
        .map(|step| {
            let value = bounds.suggested_min + span * f64::from(step) / f64::from(steps);
            AxisTick {
                value,
                label: format_axis_tick(value, mode),
            }
        })
        .collect()
}

pub fn summary_text(summary: &SummaryMetrics) -> SummaryText {
    SummaryText {
        total_income: format_currency(summary.total_income),
        total_costs: format_currency(summary.total_costs),
        net_profit: format_currency(summary.net_profit),
    }
}

pub fn format_date_arabic(date: NaiveDate) -> String {
    let month = MONTH_NAMES[date.month0() as usize];
    format!("{} {month} {}", date.day(), date.year())
}

pub fn period_text(range: &DateRange) -> String {
    format!(
        "من {} إلى {}",
        format_date_arabic(range.start()),
        format_date_arabic(range.end())
    )
}

pub fn export_filename(range: &DateRange) -> String {
    format!(
        "financial_report_{}_{}.csv",
        range.start_key(),
        range.end_key()
    )
}

/// Summary export. Title and period lines are single-field records, so the
/// writer runs in flexible mode.
pub fn export_csv(range: &DateRange, summary: &SummaryMetrics) -> Result<Vec<u8>, csv::Error> {
    let mut writer = WriterBuilder::new().flexible(true).from_writer(Vec::new());

    writer.write_record(["التقرير المالي"])?;
    writer.write_record([format!(
        "الفترة: من {} إلى {}",
        range.start_key(),
        range.end_key()
    )])?;
    writer.write_record(["الملخص"])?;
    writer.write_record(["إجمالي الإيرادات".to_string(), summary.total_income.to_string()])?;
    writer.write_record(["إجمالي المصروفات".to_string(), summary.total_costs.to_string()])?;
    writer.write_record(["صافي الربح".to_string(), summary.net_profit.to_string()])?;

    writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))
}
