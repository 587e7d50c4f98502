use crate::bounds::compute_bounds;
use crate::comparison::SummaryChanges;
use crate::details::report_details;
use crate::errors::{FetchError, ReportError};
use crate::format::{axis_ticks, period_text, summary_text};
use crate::models::{ChartState, FinancialReport, PeriodInfo, ReportPayload, Series, SummaryMetrics};
use crate::period::{DateRange, Granularity};
use crate::series::{DisplayMode, coerce_signed, normalize_daily, normalize_monthly};
use crate::source::ReportSource;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

const EMPTY_DAILY_MESSAGE: &str = "لا توجد بيانات يومية لعرضها";
const EMPTY_MONTHLY_MESSAGE: &str = "لا توجد بيانات لعرضها";

/// Builds render-ready financial reports for one dashboard view.
///
/// The only state kept between loads is the last committed summary, used to
/// compute percent changes. Each load takes a ticket; a load whose ticket is
/// no longer the newest when it finishes is dropped as `Superseded`.
pub struct ReportOrchestrator<S> {
    source: S,
    previous_summary: Mutex<Option<SummaryMetrics>>,
    generation: AtomicU64,
}

impl<S: ReportSource> ReportOrchestrator<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            previous_summary: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    pub fn previous_summary(&self) -> Option<SummaryMetrics> {
        *self.slot()
    }

    pub async fn load_report(
        &self,
        range: DateRange,
        mode: DisplayMode,
    ) -> Result<ReportPayload, ReportError> {
        let ticket = self.begin();
        let granularity = Granularity::for_range(&range);
        debug!("loading report {range} ({granularity:?}), ticket {ticket}");

        let (series, report) = tokio::try_join!(
            self.fetch_series(&range, granularity, mode),
            self.source.financial_report(&range)
        )
        .inspect_err(|err| warn!("report load for {range} failed: {err}"))?;

        let chart = chart_state(series, granularity, mode);
        let summary = summary_metrics(&report);
        let changes = self.commit(ticket, summary)?;

        info!("report {range} loaded ({granularity:?})");
        Ok(ReportPayload {
            period: PeriodInfo {
                start: range.start_key(),
                end: range.end_key(),
                text: period_text(&range),
                granularity,
            },
            chart,
            summary_text: summary_text(&summary),
            summary,
            changes,
            details: report_details(&report.income, &report.expenses),
        })
    }

    async fn fetch_series(
        &self,
        range: &DateRange,
        granularity: Granularity,
        mode: DisplayMode,
    ) -> Result<Series, FetchError> {
        match granularity {
            Granularity::Daily => {
                let records = self.source.daily_breakdown(range).await?;
                Ok(normalize_daily(&records))
            }
            Granularity::Monthly => {
                let records = self.source.monthly_breakdown(range).await?;
                Ok(normalize_monthly(&records, mode))
            }
        }
    }

    fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Only the newest ticket may commit. If the newest load fails, older
    /// loads still in flight are dropped too and the baseline stays put.
    fn commit(&self, ticket: u64, summary: SummaryMetrics) -> Result<SummaryChanges, ReportError> {
        let mut previous = self.slot();
        if self.generation.load(Ordering::SeqCst) != ticket {
            debug!("dropping stale report result, ticket {ticket}");
            return Err(ReportError::Superseded);
        }
        let changes = SummaryChanges::between(previous.as_ref(), &summary);
        *previous = Some(summary);
        Ok(changes)
    }

    fn slot(&self) -> MutexGuard<'_, Option<SummaryMetrics>> {
        self.previous_summary
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

struct ViewTable<S> {
    views: HashMap<String, (Arc<ReportOrchestrator<S>>, u64)>,
    uses: u64,
}

/// One orchestrator per dashboard view, so views never share a comparison
/// baseline or supersede each other's loads. The least recently used view is
/// evicted once `capacity` views exist.
pub struct ReportViews<S> {
    source: S,
    capacity: usize,
    table: Mutex<ViewTable<S>>,
}

impl<S: ReportSource + Clone> ReportViews<S> {
    pub fn new(source: S, capacity: usize) -> Self {
        Self {
            source,
            capacity: capacity.max(1),
            table: Mutex::new(ViewTable {
                views: HashMap::new(),
                uses: 0,
            }),
        }
    }

    pub fn view(&self, id: &str) -> Arc<ReportOrchestrator<S>> {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        table.uses += 1;
        let uses = table.uses;

        if !table.views.contains_key(id) && table.views.len() >= self.capacity {
            let oldest = table
                .views
                .iter()
                .min_by_key(|(_, (_, last_used))| *last_used)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                debug!("evicting report view {oldest}");
                table.views.remove(&oldest);
            }
        }

        let entry = table
            .views
            .entry(id.to_string())
            .or_insert_with(|| (Arc::new(ReportOrchestrator::new(self.source.clone())), uses));
        entry.1 = uses;
        Arc::clone(&entry.0)
    }

    pub fn len(&self) -> usize {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .views
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Summary for an export; no view's comparison baseline is touched.
    pub async fn summary_for(&self, range: &DateRange) -> Result<SummaryMetrics, ReportError> {
        let report = self.source.financial_report(range).await?;
        Ok(summary_metrics(&report))
    }
}

fn chart_state(series: Series, granularity: Granularity, mode: DisplayMode) -> ChartState {
    if series.is_empty() {
        let message = match granularity {
            Granularity::Daily => EMPTY_DAILY_MESSAGE,
            Granularity::Monthly => EMPTY_MONTHLY_MESSAGE,
        };
        return ChartState::Empty {
            message: message.to_string(),
        };
    }

    let axis_bounds = compute_bounds(series.plotted_values());
    ChartState::Ready {
        axis_ticks: axis_ticks(&axis_bounds, mode),
        series,
        axis_bounds,
    }
}

fn summary_metrics(report: &FinancialReport) -> SummaryMetrics {
    SummaryMetrics {
        total_income: coerce_signed(&report.summary.total_income),
        total_costs: coerce_signed(&report.summary.total_costs),
        net_profit: coerce_signed(&report.summary.net_profit),
    }
}
