use crate::report::ReportViews;
use crate::source::ApiClient;
use std::sync::Arc;

const MAX_VIEWS: usize = 256;

#[derive(Clone)]
pub struct AppState {
    pub client: ApiClient,
    pub reports: Arc<ReportViews<ApiClient>>,
}

impl AppState {
    pub fn new(client: ApiClient) -> Self {
        Self {
            reports: Arc::new(ReportViews::new(client.clone(), MAX_VIEWS)),
            client,
        }
    }
}
