//! Dashboard queries
//!
//! Loads both tables and renders the summaries the protocol layer sends back.

use std::path::PathBuf;

use super::assistant::{Assistant, incident_prompt};
use super::insights::{assess_incidents, assess_tickets, incident_signals};
use super::metrics::{distribution, incident_kpis, risk_level, ticket_kpis, ticket_trend};
use super::models::{CyberIncident, ItTicket};
use super::repository::CsvRepository;
use crate::error::AnalyticsError;

pub struct Dashboard {
    pub incidents: CsvRepository<CyberIncident>,
    pub tickets: CsvRepository<ItTicket>,
    assistant: Assistant,
}

impl Dashboard {
    pub fn new(
        incidents_path: impl Into<PathBuf>,
        tickets_path: impl Into<PathBuf>,
        assistant: Assistant,
    ) -> Self {
        Self {
            incidents: CsvRepository::new(incidents_path),
            tickets: CsvRepository::new(tickets_path),
            assistant,
        }
    }

    /// One-line incident KPI summary with the risk level, the number of
    /// distinct categories and the severity, status and category breakdowns.
    pub fn incident_summary(&self) -> Result<String, AnalyticsError> {
        let incidents = self.incidents.load_all()?;
        let kpis = incident_kpis(&incidents);
        let by_category = distribution(&incidents, |i| i.category.as_str());
        let mut summary = format!(
            "total={} open={} critical={} resolution_rate={:.2} risk={} categories={}",
            kpis.total,
            kpis.open,
            kpis.critical,
            kpis.resolution_rate,
            risk_level(&incidents),
            by_category.len()
        );

        let breakdowns = [
            ("severity", distribution(&incidents, |i| i.severity.as_str())),
            ("status", distribution(&incidents, |i| i.status.as_str())),
            ("category", by_category),
        ];
        for (name, counts) in &breakdowns {
            if !counts.is_empty() {
                summary.push_str(&format!(" {}={}", name, render_counts(counts)));
            }
        }
        Ok(summary)
    }

    /// One-line ticket KPI summary with the monthly trend.
    pub fn ticket_summary(&self) -> Result<String, AnalyticsError> {
        let tickets = self.tickets.load_all()?;
        let kpis = ticket_kpis(&tickets);
        let mut summary = format!(
            "open={} in_progress={} resolved={} closed={}",
            kpis.open, kpis.in_progress, kpis.resolved, kpis.closed
        );

        let trend = ticket_trend(&tickets);
        if !trend.is_empty() {
            summary.push_str(" trend=");
            summary.push_str(&render_counts(&trend));
        }
        Ok(summary)
    }

    /// Incident assessment, signals, ticket assessment and assistant comment.
    pub fn insights(&self) -> Result<Vec<String>, AnalyticsError> {
        let incidents = self.incidents.load_all()?;
        let tickets = self.tickets.load_all()?;

        let mut lines = assess_incidents(&incidents).lines();
        lines.extend(incident_signals(&incidents));
        lines.extend(assess_tickets(&tickets).lines());

        let prompt = incident_prompt(&incident_kpis(&incidents), risk_level(&incidents));
        lines.push(self.assistant.generate(&prompt));
        Ok(lines)
    }
}

fn render_counts(counts: &[(String, usize)]) -> String {
    counts
        .iter()
        .map(|(key, count)| format!("{}:{}", key.replace(' ', "_"), count))
        .collect::<Vec<_>>()
        .join(",")
}
