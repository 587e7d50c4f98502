use crate::errors::{AppError, FetchError};
use crate::models::{CategoryStatus, DashboardOverview, DeactivateResponse, UnpaidTotal};
use crate::source::ApiClient;
use std::collections::BTreeMap;
use tracing::info;

/// Chart data, payment status and today's payments, fetched together.
/// Any one failing fails the whole overview.
pub async fn load_overview(client: &ApiClient) -> Result<DashboardOverview, FetchError> {
    let (chart, payment_status, paid_today) = tokio::try_join!(
        client.chart_data(),
        client.payment_status(),
        client.paid_today()
    )?;

    Ok(DashboardOverview {
        unpaid_totals: unpaid_totals(&payment_status),
        chart,
        payment_status,
        paid_today,
    })
}

pub fn unpaid_totals(status: &BTreeMap<String, CategoryStatus>) -> Vec<UnpaidTotal> {
    status
        .values()
        .map(|category| UnpaidTotal {
            label: category.label.clone(),
            total: category.total_unpaid_trainers,
        })
        .collect()
}

pub async fn deactivate_trainers(
    client: &ApiClient,
    trainer_ids: &[u64],
    csrf_token: Option<&str>,
) -> Result<DeactivateResponse, AppError> {
    if trainer_ids.is_empty() {
        return Err(AppError::bad_request("no trainers selected"));
    }
    let token = csrf_token
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::bad_request("missing CSRF token"))?;

    let response = client.bulk_deactivate(trainer_ids, token).await?;
    info!("deactivated {} trainers", trainer_ids.len());
    Ok(response)
}
