use crate::bounds::AxisBounds;
use crate::comparison::SummaryChanges;
use crate::period::Granularity;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DailyRecord {
    #[serde(default)]
    pub day: u32,
    #[serde(default)]
    pub income: Value,
    #[serde(default)]
    pub expenses: Value,
    #[serde(default)]
    pub net: Value,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct MonthlyRecord {
    #[serde(default)]
    pub month: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub income: Value,
    #[serde(default)]
    pub expenses: Value,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub total_income: f64,
    pub total_costs: f64,
    pub net_profit: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSummary {
    #[serde(default)]
    pub total_income: Value,
    #[serde(default)]
    pub total_costs: Value,
    #[serde(default)]
    pub net_profit: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FinancialReport {
    pub summary: RawSummary,
    #[serde(default)]
    pub income: Value,
    #[serde(default)]
    pub expenses: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    pub labels: Vec<String>,
    pub income: Vec<f64>,
    pub expenses: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net: Option<Vec<f64>>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Every plotted value; the axis is shared by income and expenses.
    pub fn plotted_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.income.iter().chain(self.expenses.iter()).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ChartState {
    Ready {
        series: Series,
        axis_bounds: AxisBounds,
        axis_ticks: Vec<AxisTick>,
    },
    Empty {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodInfo {
    pub start: String,
    pub end: String,
    pub text: String,
    pub granularity: Granularity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTick {
    pub value: f64,
    pub label: String,
}

/// Summary amounts rendered as currency strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryText {
    pub total_income: String,
    pub total_costs: String,
    pub net_profit: String,
}

/// One line of the income or expense detail tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub quantity: String,
    pub amount: f64,
    pub amount_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportDetails {
    pub income: Vec<DetailRow>,
    pub expenses: Vec<DetailRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportPayload {
    pub period: PeriodInfo,
    pub chart: ChartState,
    pub summary: SummaryMetrics,
    pub summary_text: SummaryText,
    pub changes: SummaryChanges,
    pub details: ReportDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IncomeByCategory {
    #[serde(default)]
    pub month: Vec<f64>,
    #[serde(default)]
    pub subscription: Vec<f64>,
    #[serde(default)]
    pub assurance: Vec<f64>,
    #[serde(default)]
    pub jawaz: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChartData {
    #[serde(default)]
    pub chart_labels: Vec<String>,
    #[serde(default)]
    pub chart_data: IncomeByCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnpaidTrainer {
    pub trainer_id: u64,
    pub trainer_name: String,
    #[serde(default)]
    pub last_payment_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryStatus {
    pub label: String,
    #[serde(default)]
    pub total_unpaid_trainers: u64,
    #[serde(default)]
    pub unpaid_trainers: Vec<UnpaidTrainer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaidTodayEntry {
    pub trainer_name: String,
    pub payment_date: String,
    pub payment_category: String,
    pub payment_amount: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnpaidTotal {
    pub label: String,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardOverview {
    pub chart: ChartData,
    pub payment_status: BTreeMap<String, CategoryStatus>,
    pub unpaid_totals: Vec<UnpaidTotal>,
    pub paid_today: Vec<PaidTodayEntry>,
}

#[derive(Debug, Deserialize)]
pub struct DeactivateRequest {
    #[serde(default)]
    pub trainer_ids: Vec<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeactivateResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct QuickPeriodResponse {
    pub start: String,
    pub end: String,
    pub text: String,
    pub granularity: Granularity,
}
