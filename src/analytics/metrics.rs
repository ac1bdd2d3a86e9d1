//! Derived metrics over incidents and tickets

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::models::{CyberIncident, ItTicket};

pub const STATUS_OPEN: &str = "Open";
pub const STATUS_IN_PROGRESS: &str = "In Progress";
pub const STATUS_RESOLVED: &str = "Resolved";
pub const STATUS_CLOSED: &str = "Closed";

pub const SEVERITY_CRITICAL: &str = "Critical";
pub const SEVERITY_HIGH: &str = "High";

pub const PRIORITY_HIGH: &str = "High";

#[derive(Debug, Clone, PartialEq)]
pub struct IncidentKpis {
    pub total: usize,
    pub open: usize,
    pub critical: usize,
    pub resolved: usize,
    /// Percentage of resolved incidents, rounded to two decimals.
    pub resolution_rate: f64,
}

pub fn incident_kpis(incidents: &[CyberIncident]) -> IncidentKpis {
    let total = incidents.len();
    let open = count_status(incidents, STATUS_OPEN);
    let critical = count_severity(incidents, SEVERITY_CRITICAL);
    let resolved = count_status(incidents, STATUS_RESOLVED);

    let resolution_rate = if total > 0 {
        (resolved as f64 / total as f64 * 10_000.0).round() / 100.0
    } else {
        0.0
    };

    IncidentKpis {
        total,
        open,
        critical,
        resolved,
        resolution_rate,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

/// Weighted score: three points per critical, two per high, one per open.
pub fn risk_points(incidents: &[CyberIncident]) -> usize {
    count_severity(incidents, SEVERITY_CRITICAL) * 3
        + count_severity(incidents, SEVERITY_HIGH) * 2
        + count_status(incidents, STATUS_OPEN)
}

pub fn risk_level(incidents: &[CyberIncident]) -> RiskLevel {
    match risk_points(incidents) {
        points if points > 15 => RiskLevel::High,
        points if points > 7 => RiskLevel::Medium,
        _ => RiskLevel::Low,
    }
}

/// Counts values of `key`, ordered by count descending then value.
pub fn distribution<T, F>(items: &[T], key: F) -> Vec<(String, usize)>
where
    F: Fn(&T) -> &str,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for item in items {
        *counts.entry(key(item)).or_default() += 1;
    }

    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketKpis {
    pub open: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub closed: usize,
}

pub fn ticket_kpis(tickets: &[ItTicket]) -> TicketKpis {
    let count = |status: &str| tickets.iter().filter(|t| t.status == status).count();
    TicketKpis {
        open: count(STATUS_OPEN),
        in_progress: count(STATUS_IN_PROGRESS),
        resolved: count(STATUS_RESOLVED),
        closed: count(STATUS_CLOSED),
    }
}

pub fn high_priority_tickets(tickets: &[ItTicket]) -> usize {
    tickets.iter().filter(|t| t.priority == PRIORITY_HIGH).count()
}

/// Tickets opened per `YYYY-MM`, oldest first. Unparseable dates are dropped.
pub fn ticket_trend(tickets: &[ItTicket]) -> Vec<(String, usize)> {
    let mut months: BTreeMap<String, usize> = BTreeMap::new();
    for date in tickets.iter().filter_map(|t| parse_date(&t.created_at)) {
        *months.entry(date.format("%Y-%m").to_string()).or_default() += 1;
    }
    months.into_iter().collect()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }

    ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"]
        .into_iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

fn count_status(incidents: &[CyberIncident], status: &str) -> usize {
    incidents.iter().filter(|i| i.status == status).count()
}

fn count_severity(incidents: &[CyberIncident], severity: &str) -> usize {
    incidents.iter().filter(|i| i.severity == severity).count()
}
