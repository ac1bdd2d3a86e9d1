//! Optional generated commentary
//!
//! Text generation is an injected collaborator. When none is configured, or
//! the one configured fails, the assistant answers with fixed local text.

use log::warn;

use super::metrics::{IncidentKpis, RiskLevel};
use crate::error::AssistantError;

pub const SIMULATED_RESPONSE: &str = "AI Assistant (Simulated): Based on current data trends, \
     focus should be placed on reducing high-severity incidents and improving response times.";

/// Produces free text for a prompt, e.g. by calling a hosted language model.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String, AssistantError>;
}

#[derive(Default)]
pub struct Assistant {
    generator: Option<Box<dyn TextGenerator>>,
}

impl Assistant {
    /// An assistant that always uses the local fallback.
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn with_generator(generator: impl TextGenerator + 'static) -> Self {
        Self {
            generator: Some(Box::new(generator)),
        }
    }

    pub fn is_offline(&self) -> bool {
        self.generator.is_none()
    }

    pub fn generate(&self, prompt: &str) -> String {
        let Some(generator) = &self.generator else {
            return SIMULATED_RESPONSE.to_string();
        };

        match generator.generate(prompt) {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!("Text generator returned an empty response, using fallback");
                SIMULATED_RESPONSE.to_string()
            }
            Err(e) => {
                warn!("{}, using fallback", e);
                SIMULATED_RESPONSE.to_string()
            }
        }
    }
}

/// Prompt summarising the incident picture for the text generator.
pub fn incident_prompt(kpis: &IncidentKpis, risk: RiskLevel) -> String {
    format!(
        "You are a cybersecurity analyst. There are {} incidents: {} open, {} critical, \
         {} resolved ({}% resolution rate). Overall risk is {}. \
         Give one short recommendation.",
        kpis.total, kpis.open, kpis.critical, kpis.resolved, kpis.resolution_rate, risk
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl TextGenerator for Echo {
        fn generate(&self, prompt: &str) -> Result<String, AssistantError> {
            Ok(format!("echo: {prompt}"))
        }
    }

    struct Down;

    impl TextGenerator for Down {
        fn generate(&self, _prompt: &str) -> Result<String, AssistantError> {
            Err(AssistantError::Unavailable("no api key".into()))
        }
    }

    struct Blank;

    impl TextGenerator for Blank {
        fn generate(&self, _prompt: &str) -> Result<String, AssistantError> {
            Ok("   ".into())
        }
    }

    #[test]
    fn offline_assistant_uses_fallback() {
        let assistant = Assistant::offline();
        assert!(assistant.is_offline());
        assert_eq!(assistant.generate("anything"), SIMULATED_RESPONSE);
    }

    #[test]
    fn generator_output_is_passed_through() {
        let assistant = Assistant::with_generator(Echo);
        assert!(!assistant.is_offline());
        assert_eq!(assistant.generate("hi"), "echo: hi");
    }

    #[test]
    fn failing_or_blank_generator_falls_back() {
        assert_eq!(Assistant::with_generator(Down).generate("hi"), SIMULATED_RESPONSE);
        assert_eq!(Assistant::with_generator(Blank).generate("hi"), SIMULATED_RESPONSE);
    }

    #[test]
    fn prompt_mentions_the_numbers() {
        let kpis = IncidentKpis {
            total: 4,
            open: 2,
            critical: 1,
            resolved: 2,
            resolution_rate: 50.0,
        };
        let prompt = incident_prompt(&kpis, RiskLevel::Medium);
        assert!(prompt.contains("4 incidents"));
        assert!(prompt.contains("50% resolution rate"));
        assert!(prompt.contains("MEDIUM"));
    }
}
