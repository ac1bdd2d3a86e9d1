//! Incident and ticket records
//!
//! Column names follow the snake_case CSV layout; the display-style headers
//! written by older exports ("Ticket ID", "Status", ...) are accepted on read.

use serde::{Deserialize, Serialize};

/// A row the CSV repository can address by id and move between statuses.
pub trait Record {
    fn id(&self) -> String;
    fn set_status(&mut self, status: &str);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CyberIncident {
    #[serde(alias = "Incident ID")]
    pub incident_id: u64,
    #[serde(alias = "Timestamp")]
    pub timestamp: String,
    #[serde(alias = "Severity")]
    pub severity: String,
    #[serde(alias = "Category")]
    pub category: String,
    #[serde(alias = "Status")]
    pub status: String,
    #[serde(alias = "Description")]
    pub description: String,
}

impl Record for CyberIncident {
    fn id(&self) -> String {
        self.incident_id.to_string()
    }

    fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItTicket {
    #[serde(alias = "Ticket ID")]
    pub ticket_id: String,
    #[serde(alias = "Priority")]
    pub priority: String,
    #[serde(alias = "Description")]
    pub description: String,
    #[serde(alias = "Status")]
    pub status: String,
    #[serde(alias = "Assigned To")]
    pub assigned_to: String,
    #[serde(alias = "Created At")]
    pub created_at: String,
    #[serde(alias = "Resolution Time (hrs)")]
    pub resolution_time_hours: Option<f64>,
}

impl Record for ItTicket {
    fn id(&self) -> String {
        self.ticket_id.clone()
    }

    fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}
