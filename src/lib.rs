pub mod app;
pub mod bounds;
pub mod comparison;
pub mod config;
pub mod dashboard;
pub mod details;
pub mod errors;
pub mod format;
pub mod handlers;
pub mod models;
pub mod period;
pub mod report;
pub mod series;
pub mod source;
pub mod state;
pub mod ui;

pub use app::router;
pub use config::Settings;
pub use report::{ReportOrchestrator, ReportViews};
pub use source::{ApiClient, ReportSource};
pub use state::AppState;
