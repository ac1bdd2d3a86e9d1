//! Incident and ticket analytics
//!
//! CSV-backed records, derived metrics, and insight text for the dashboard.

pub mod assistant;
pub mod dashboard;
pub mod insights;
pub mod metrics;
pub mod models;
pub mod repository;

pub use assistant::{Assistant, TextGenerator};
pub use dashboard::Dashboard;
pub use models::{CyberIncident, ItTicket, Record};
pub use repository::CsvRepository;
