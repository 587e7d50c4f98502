use crate::errors::FetchError;
use crate::models::{
    CategoryStatus, ChartData, DailyRecord, DeactivateResponse, FinancialReport, MonthlyRecord,
    PaidTodayEntry,
};
use crate::period::DateRange;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::future::Future;
use tracing::{debug, warn};

pub const DAILY_BREAKDOWN: &str = "daily-breakdown";
pub const MONTHLY_BREAKDOWN: &str = "monthly-breakdown";
pub const FINANCIAL_REPORT: &str = "financial-report";
pub const CHART_DATA: &str = "chart-data";
pub const PAYMENT_STATUS: &str = "payment-status";
pub const PAID_TODAY: &str = "paid-today";
pub const BULK_DEACTIVATE: &str = "bulk-deactivate";

pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Where the report engine reads its numbers from. One attempt per call;
/// an empty breakdown is a valid answer, not an error.
pub trait ReportSource {
    fn daily_breakdown(
        &self,
        range: &DateRange,
    ) -> impl Future<Output = Result<Vec<DailyRecord>, FetchError>> + Send;

    fn monthly_breakdown(
        &self,
        range: &DateRange,
    ) -> impl Future<Output = Result<Vec<MonthlyRecord>, FetchError>> + Send;

    fn financial_report(
        &self,
        range: &DateRange,
    ) -> impl Future<Output = Result<FinancialReport, FetchError>> + Send;
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(format!("gym_dashboard/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn chart_data(&self) -> Result<ChartData, FetchError> {
        let body = self.get(CHART_DATA, &[]).await?;
        decode(CHART_DATA, body)
    }

    pub async fn payment_status(&self) -> Result<BTreeMap<String, CategoryStatus>, FetchError> {
        let body = self.get(PAYMENT_STATUS, &[]).await?;
        Ok(take_field(PAYMENT_STATUS, body, "payment_status")?.unwrap_or_default())
    }

    pub async fn paid_today(&self) -> Result<Vec<PaidTodayEntry>, FetchError> {
        let body = self.get(PAID_TODAY, &[]).await?;
        Ok(take_field(PAID_TODAY, body, "paid_today")?.unwrap_or_default())
    }

    pub async fn bulk_deactivate(
        &self,
        trainer_ids: &[u64],
        csrf_token: &str,
    ) -> Result<DeactivateResponse, FetchError> {
        let response = self
            .http
            .post(self.url(BULK_DEACTIVATE))
            .header(CSRF_HEADER, csrf_token)
            .json(&serde_json::json!({ "trainer_ids": trainer_ids }))
            .send()
            .await
            .map_err(|err| FetchError::new(BULK_DEACTIVATE, err.to_string()))?;

        let body = read_json(BULK_DEACTIVATE, response).await?;
        let body = check_envelope(BULK_DEACTIVATE, body)?;
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(DeactivateResponse {
            success: true,
            message,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}/", self.base_url)
    }

    async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Value, FetchError> {
        debug!("GET {endpoint} {query:?}");
        let response = self
            .http
            .get(self.url(endpoint))
            .header("X-Requested-With", "XMLHttpRequest")
            .query(query)
            .send()
            .await
            .map_err(|err| FetchError::new(endpoint, err.to_string()))?;

        let body = read_json(endpoint, response).await?;
        check_envelope(endpoint, body)
    }

    async fn get_range(&self, endpoint: &str, range: &DateRange) -> Result<Value, FetchError> {
        let query = [("start", range.start_key()), ("end", range.end_key())];
        self.get(endpoint, &query).await
    }
}

impl ReportSource for ApiClient {
    async fn daily_breakdown(&self, range: &DateRange) -> Result<Vec<DailyRecord>, FetchError> {
        let body = self.get_range(DAILY_BREAKDOWN, range).await?;
        Ok(take_field(DAILY_BREAKDOWN, body, "daily_data")?.unwrap_or_default())
    }

    async fn monthly_breakdown(&self, range: &DateRange) -> Result<Vec<MonthlyRecord>, FetchError> {
        let body = self.get_range(MONTHLY_BREAKDOWN, range).await?;
        Ok(take_field(MONTHLY_BREAKDOWN, body, "monthly_data")?.unwrap_or_default())
    }

    async fn financial_report(&self, range: &DateRange) -> Result<FinancialReport, FetchError> {
        let body = self.get_range(FINANCIAL_REPORT, range).await?;
        decode(FINANCIAL_REPORT, body)
    }
}

async fn read_json(endpoint: &str, response: reqwest::Response) -> Result<Value, FetchError> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        warn!("{endpoint} answered HTTP {}", status.as_u16());
        // Error bodies may still carry the backend's `error` message.
        let reason = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        return Err(FetchError::new(endpoint, reason));
    }

    response
        .json::<Value>()
        .await
        .map_err(|err| FetchError::new(endpoint, format!("invalid JSON: {err}")))
}

/// Folds the two backend shapes (bare payload, or payload with a `success`
/// flag) into one result.
pub fn check_envelope(endpoint: &str, body: Value) -> Result<Value, FetchError> {
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        let reason = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("request failed");
        return Err(FetchError::new(endpoint, reason));
    }
    Ok(body)
}

fn take_field<T: DeserializeOwned>(
    endpoint: &str,
    mut body: Value,
    field: &str,
) -> Result<Option<T>, FetchError> {
    match body.get_mut(field).map(Value::take) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => decode(endpoint, value).map(Some),
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, value: Value) -> Result<T, FetchError> {
    serde_json::from_value(value)
        .map_err(|err| FetchError::new(endpoint, format!("unexpected payload: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn explicit_failure_flag_becomes_fetch_error() {
        let err = check_envelope(FINANCIAL_REPORT, json!({"success": false, "error": "no org"}))
            .unwrap_err();
        assert_eq!(err.endpoint, FINANCIAL_REPORT);
        assert_eq!(err.reason, "no org");

        let default_reason =
            check_envelope(DAILY_BREAKDOWN, json!({"success": false})).unwrap_err();
        assert_eq!(default_reason.reason, "request failed");
    }

    #[test]
    fn payloads_with_and_without_success_flag_are_accepted() {
        assert!(check_envelope(MONTHLY_BREAKDOWN, json!({"monthly_data": []})).is_ok());
        assert!(check_envelope(MONTHLY_BREAKDOWN, json!({"success": true, "monthly_data": []})).is_ok());
    }

    #[test]
    fn missing_breakdown_field_is_an_empty_result() {
        let records: Option<Vec<MonthlyRecord>> =
            take_field(MONTHLY_BREAKDOWN, json!({"success": true}), "monthly_data").unwrap();
        assert!(records.is_none());

        let records: Option<Vec<DailyRecord>> = take_field(
            DAILY_BREAKDOWN,
            json!({"daily_data": [{"day": 3, "income": "12.5", "expenses": 2, "net": 10.5}]}),
            "daily_data",
        )
        .unwrap();
        let records = records.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].day, 3);
    }

    #[test]
    fn malformed_payload_names_the_endpoint() {
        let err = take_field::<Vec<MonthlyRecord>>(
            MONTHLY_BREAKDOWN,
            json!({"monthly_data": "oops"}),
            "monthly_data",
        )
        .unwrap_err();
        assert_eq!(err.endpoint, MONTHLY_BREAKDOWN);
        assert!(err.reason.starts_with("unexpected payload"));
    }

    #[test]
    fn urls_keep_the_trailing_slash() {
        let client = ApiClient::new("http://127.0.0.1:8000/api/").unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8000/api");
        assert_eq!(client.url(DAILY_BREAKDOWN), "http://127.0.0.1:8000/api/daily-breakdown/");
    }
}
