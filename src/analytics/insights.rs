//! Deterministic insight text
//!
//! Threshold rules over aggregate counts. Nothing here calls out; see
//! `assistant` for the optional generated commentary.

use super::metrics::{
    SEVERITY_CRITICAL, SEVERITY_HIGH, STATUS_OPEN, high_priority_tickets, ticket_kpis,
};
use super::models::{CyberIncident, ItTicket};

pub const NO_INCIDENT_DATA: &str = "No incident data available for analysis.";
pub const NO_INCIDENT_SIGNALS: &str = "No incidents available for intelligent analysis.";

const INCIDENT_RECOMMENDATION: &str = "Prioritize critical incidents, improve monitoring, \
     and conduct regular security audits to reduce future risks.";
const TICKET_RECOMMENDATION: &str =
    "Prioritize high-priority tickets and balance workload across support teams.";

/// Open incidents above this count indicate a response backlog.
const BACKLOG_THRESHOLD: usize = 5;
/// Critical incidents at or above this count raise a concentration warning.
const CRITICAL_CONCENTRATION: usize = 3;
const TICKET_LOAD_THRESHOLD: usize = 10;
const TICKET_RISK_THRESHOLD: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum IncidentReport {
    NoData,
    Assessment(IncidentAssessment),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncidentAssessment {
    pub risk_level: String,
    pub risk_reason: String,
    pub operational_health: String,
    pub operations_reason: String,
    pub recommendation: String,
}

impl IncidentReport {
    pub fn lines(&self) -> Vec<String> {
        match self {
            IncidentReport::NoData => vec![NO_INCIDENT_DATA.to_string()],
            IncidentReport::Assessment(a) => vec![
                format!("{}: {}", a.risk_level, a.risk_reason),
                format!("{}: {}", a.operational_health, a.operations_reason),
                format!("Recommendation: {}", a.recommendation),
            ],
        }
    }
}

pub fn assess_incidents(incidents: &[CyberIncident]) -> IncidentReport {
    if incidents.is_empty() {
        return IncidentReport::NoData;
    }

    let high_risk = incidents
        .iter()
        .filter(|i| i.severity == SEVERITY_HIGH || i.severity == SEVERITY_CRITICAL)
        .count();

    let (risk_level, risk_reason) = if high_risk > 0 {
        (
            "High Risk Environment".to_string(),
            format!(
                "{high_risk} high or critical incidents detected. \
                 Immediate attention and mitigation strategies are recommended."
            ),
        )
    } else {
        (
            "Low Risk Environment".to_string(),
            "No high or critical incidents detected. Current security posture is stable."
                .to_string(),
        )
    };

    let open = incidents.iter().filter(|i| i.status == STATUS_OPEN).count();
    let (operational_health, operations_reason) = if open > BACKLOG_THRESHOLD {
        (
            "Backlog Detected",
            "A significant number of incidents remain open, indicating potential response delays.",
        )
    } else {
        (
            "Operationally Healthy",
            "Incident response appears timely with manageable open cases.",
        )
    };

    IncidentReport::Assessment(IncidentAssessment {
        risk_level,
        risk_reason,
        operational_health: operational_health.to_string(),
        operations_reason: operations_reason.to_string(),
        recommendation: INCIDENT_RECOMMENDATION.to_string(),
    })
}

/// Short warnings raised by the incident mix, or a single all-clear.
pub fn incident_signals(incidents: &[CyberIncident]) -> Vec<String> {
    if incidents.is_empty() {
        return vec![NO_INCIDENT_SIGNALS.to_string()];
    }

    let mut signals = Vec::new();

    let critical = incidents
        .iter()
        .filter(|i| i.severity == SEVERITY_CRITICAL)
        .count();
    if critical >= CRITICAL_CONCENTRATION {
        signals.push(
            "A high concentration of critical incidents has been detected. \
             This indicates elevated organisational risk."
                .to_string(),
        );
    }

    let open = incidents.iter().filter(|i| i.status == STATUS_OPEN).count();
    if open * 2 > incidents.len() {
        signals.push(
            "More than half of incidents remain open, \
             suggesting possible delays in incident response."
                .to_string(),
        );
    }

    if signals.is_empty() {
        signals.push(
            "Current incident levels appear stable with no immediate risk indicators."
                .to_string(),
        );
    }
    signals
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketReport {
    pub load: String,
    pub risk: String,
    pub recommendation: String,
}

impl TicketReport {
    pub fn lines(&self) -> Vec<String> {
        vec![
            self.load.clone(),
            self.risk.clone(),
            format!("Recommendation: {}", self.recommendation),
        ]
    }
}

pub fn assess_tickets(tickets: &[ItTicket]) -> TicketReport {
    let open = ticket_kpis(tickets).open;
    let high_priority = high_priority_tickets(tickets);

    let load = if open > TICKET_LOAD_THRESHOLD {
        "High operational workload detected."
    } else {
        "Operational workload is under control."
    };

    let risk = if high_priority > TICKET_RISK_THRESHOLD {
        "Critical support risk due to many high-priority tickets."
    } else {
        "Support risk level is normal."
    };

    TicketReport {
        load: load.to_string(),
        risk: risk.to_string(),
        recommendation: TICKET_RECOMMENDATION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident(severity: &str, status: &str) -> CyberIncident {
        CyberIncident {
            incident_id: 0,
            timestamp: String::new(),
            severity: severity.into(),
            category: "Malware".into(),
            status: status.into(),
            description: String::new(),
        }
    }

    fn ticket(priority: &str, status: &str) -> ItTicket {
        ItTicket {
            ticket_id: String::new(),
            priority: priority.into(),
            description: String::new(),
            status: status.into(),
            assigned_to: String::new(),
            created_at: String::new(),
            resolution_time_hours: None,
        }
    }

    #[test]
    fn empty_incidents_report_no_data() {
        assert_eq!(assess_incidents(&[]), IncidentReport::NoData);
        assert_eq!(assess_incidents(&[]).lines(), vec![NO_INCIDENT_DATA]);
        assert_eq!(incident_signals(&[]), vec![NO_INCIDENT_SIGNALS]);
    }

    #[test]
    fn high_severity_raises_risk() {
        let report = assess_incidents(&[incident("Critical", "Resolved"), incident("Low", "Open")]);
        let IncidentReport::Assessment(a) = report else {
            panic!("expected an assessment");
        };
        assert_eq!(a.risk_level, "High Risk Environment");
        assert!(a.risk_reason.starts_with("1 high or critical"));
        assert_eq!(a.operational_health, "Operationally Healthy");
    }

    #[test]
    fn many_open_incidents_flag_backlog() {
        let incidents: Vec<_> = (0..6).map(|_| incident("Low", "Open")).collect();
        let IncidentReport::Assessment(a) = assess_incidents(&incidents) else {
            panic!("expected an assessment");
        };
        assert_eq!(a.risk_level, "Low Risk Environment");
        assert_eq!(a.operational_health, "Backlog Detected");
    }

    #[test]
    fn signals_fire_on_thresholds() {
        let mut incidents: Vec<_> = (0..3).map(|_| incident("Critical", "Open")).collect();
        incidents.push(incident("Low", "Resolved"));
        let signals = incident_signals(&incidents);
        assert_eq!(signals.len(), 2);
        assert!(signals[0].contains("critical incidents"));
        assert!(signals[1].contains("More than half"));
    }

    #[test]
    fn exactly_half_open_is_stable() {
        let incidents = vec![incident("Low", "Open"), incident("Low", "Resolved")];
        let signals = incident_signals(&incidents);
        assert_eq!(signals.len(), 1);
        assert!(signals[0].contains("stable"));
    }

    #[test]
    fn ticket_thresholds() {
        let calm = assess_tickets(&[ticket("High", "Open")]);
        assert_eq!(calm.load, "Operational workload is under control.");
        assert_eq!(calm.risk, "Support risk level is normal.");

        let busy: Vec<_> = (0..11).map(|_| ticket("High", "Open")).collect();
        let report = assess_tickets(&busy);
        assert_eq!(report.load, "High operational workload detected.");
        assert_eq!(
            report.risk,
            "Critical support risk due to many high-priority tickets."
        );
        assert_eq!(report.lines().len(), 3);
    }
}
