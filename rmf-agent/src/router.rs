//! Two-stage persona routing.
//!
//! 1. **Keyword stage**: the lowercased question is scanned for trigger
//!    substrings, persona by persona in priority order. No backend call.
//! 2. **Classifier stage**: the chat model is asked for exactly one persona
//!    identifier. The reply is accepted if it contains a known identifier
//!    (first match in catalog order); anything else, including a backend
//!    error or timeout, falls back to [`PersonaId::DEFAULT`].
//!
//! [`PersonaRouter::route`] therefore always yields a persona.

use std::sync::Arc;
use std::time::Duration;

use rmf_core::{ChatModel, CompletionRequest};
use tracing::{info, warn};

use crate::persona::{PersonaCatalog, PersonaId};
use crate::prompt::router_instruction;

/// Default classifier timeout.
pub const DEFAULT_ROUTER_TIMEOUT: Duration = Duration::from_secs(15);

const STANDARD_KEYWORDS: &[(PersonaId, &[&str])] = &[
    (
        PersonaId::AuditSpecialist,
        &["audit", "evidence", "artifact", "assessment", "poam", "ssp", "finding", "examine", "interview"],
    ),
    (
        PersonaId::RiskSpecialist,
        &[
            "risk", "impact", "fips", "threat", "vulnerability", "likelihood", "cia",
            "confidentiality", "integrity", "availability", "categorize",
        ],
    ),
    (
        PersonaId::ComplianceSpecialist,
        &[
            "fedramp", "cmmc", "iso", "soc", "hipaa", "mapping", "crosswalk", "compliance",
            "inherited", "authorization boundary", "continuous monitoring",
        ],
    ),
    (
        PersonaId::PmAgent,
        &[
            "roadmap", "prioritize", "priority", "stakeholder", "budget", "timeline", "phase",
            "milestone", "business case", "executive", "board", "quick win", "roi", "strategy",
            "plan",
        ],
    ),
    (
        PersonaId::QaAgent,
        &[
            "test case", "test plan", "test coverage", "validation", "regression",
            "acceptance test", "smoke test", "test strategy", "test automation", "qa",
            "quality assurance", "defect", "bug report",
        ],
    ),
    (
        PersonaId::DevsecopsAgent,
        &[
            "cicd", "ci/cd", "pipeline", "sast", "dast", "container security", "docker security",
            "kubernetes security", "infrastructure as code", "iac", "devsecops", "shift left",
            "code scanning", "dependency scanning", "supply chain",
        ],
    ),
];

/// Ordered persona → lowercase trigger substrings.
#[derive(Debug, Clone)]
pub struct KeywordTable {
    entries: Vec<(PersonaId, Vec<String>)>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl KeywordTable {
    /// The built-in table. Priority: audit, risk, compliance, PM, QA, DevSecOps.
    pub fn standard() -> Self {
        Self::new(STANDARD_KEYWORDS.iter().map(|(id, triggers)| (*id, triggers.iter().copied())))
    }

    /// Build a table from `(persona, triggers)` pairs in priority order.
    /// Triggers are lowercased.
    pub fn new<I, T, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (PersonaId, T)>,
        T: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|(id, triggers)| {
                (id, triggers.into_iter().map(|t| t.as_ref().to_lowercase()).collect())
            })
            .collect();
        Self { entries }
    }

    /// The first persona (in priority order) with a trigger in `question`,
    /// together with the trigger that matched.
    pub fn find(&self, question: &str) -> Option<(PersonaId, &str)> {
        let lowered = question.to_lowercase();
        self.entries.iter().find_map(|(id, triggers)| {
            triggers.iter().find(|t| lowered.contains(t.as_str())).map(|t| (*id, t.as_str()))
        })
    }
}

/// Why the classifier stage fell back to the default persona.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    Timeout,
    BackendError(String),
    /// The reply named no known persona.
    Unrecognized(String),
}

/// The stage that produced a routing decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteStage {
    Keyword { trigger: String },
    Classifier,
    Fallback { reason: FallbackReason },
}

impl RouteStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteStage::Keyword { .. } => "keyword",
            RouteStage::Classifier => "classifier",
            RouteStage::Fallback { .. } => "fallback",
        }
    }
}

/// A routing decision. Always names a persona.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub persona: PersonaId,
    pub stage: RouteStage,
}

/// Routes questions to personas. Stateless across requests.
pub struct PersonaRouter {
    model: Arc<dyn ChatModel>,
    catalog: &'static PersonaCatalog,
    keywords: KeywordTable,
    instruction: String,
    timeout: Duration,
}

impl PersonaRouter {
    /// A router using the standard catalog and keyword table, classifying with `model`.
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        let catalog = PersonaCatalog::standard();
        Self {
            model,
            catalog,
            keywords: KeywordTable::standard(),
            instruction: router_instruction(catalog),
            timeout: DEFAULT_ROUTER_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn catalog(&self) -> &'static PersonaCatalog {
        self.catalog
    }

    /// Pick a persona for `question`. Never fails.
    pub async fn route(&self, question: &str) -> Route {
        if let Some((persona, trigger)) = self.keywords.find(question) {
            info!(persona = %persona, stage = "keyword", trigger, "routed question");
            return Route { persona, stage: RouteStage::Keyword { trigger: trigger.to_string() } };
        }

        let route = self.classify(question).await;
        match &route.stage {
            RouteStage::Fallback { reason } => {
                warn!(persona = %route.persona, stage = "fallback", reason = ?reason, "classifier fell back to default persona");
            }
            stage => info!(persona = %route.persona, stage = stage.as_str(), "routed question"),
        }
        route
    }

    async fn classify(&self, question: &str) -> Route {
        let request = CompletionRequest::new(self.instruction.as_str())
            .with_user(question)
            .with_temperature(0.0);

        let reason = match tokio::time::timeout(self.timeout, self.model.complete(request)).await {
            Err(_) => FallbackReason::Timeout,
            Ok(Err(e)) => FallbackReason::BackendError(e.to_string()),
            Ok(Ok(reply)) => match self.match_reply(&reply) {
                Some(persona) => return Route { persona, stage: RouteStage::Classifier },
                None => FallbackReason::Unrecognized(reply.trim().to_string()),
            },
        };

        Route { persona: PersonaId::DEFAULT, stage: RouteStage::Fallback { reason } }
    }

    /// First catalog persona whose identifier appears in `reply`.
    fn match_reply(&self, reply: &str) -> Option<PersonaId> {
        let reply = reply.trim();
        self.catalog.iter().map(|p| p.id).find(|id| reply.contains(id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audit_outranks_risk() {
        let table = KeywordTable::standard();
        assert_eq!(
            table.find("Audit the risk register"),
            Some((PersonaId::AuditSpecialist, "audit"))
        );
    }

    #[test]
    fn every_persona_has_reachable_triggers() {
        let table = KeywordTable::standard();
        let cases = [
            ("I need audit evidence for my assessment", PersonaId::AuditSpecialist, "audit"),
            ("What is the risk impact of this vulnerability?", PersonaId::RiskSpecialist, "risk"),
            ("How do I map to fedramp?", PersonaId::ComplianceSpecialist, "fedramp"),
            ("Create a roadmap for our executive stakeholder", PersonaId::PmAgent, "roadmap"),
            (
                "Create a test case with full test coverage for validation",
                PersonaId::QaAgent,
                "test case",
            ),
            ("How to add SAST to CI/CD pipeline?", PersonaId::DevsecopsAgent, "ci/cd"),
        ];
        for (question, persona, trigger) in cases {
            assert_eq!(table.find(question), Some((persona, trigger)), "{question}");
        }
    }

    #[test]
    fn priority_order_breaks_ties() {
        let table = KeywordTable::standard();
        assert_eq!(table.find("FedRAMP risk"), Some((PersonaId::RiskSpecialist, "risk")));
        assert_eq!(
            table.find("FedRAMP roadmap"),
            Some((PersonaId::ComplianceSpecialist, "fedramp"))
        );
        // "plan" belongs to PM, which outranks QA's "test plan"
        assert_eq!(table.find("Write a test plan"), Some((PersonaId::PmAgent, "plan")));
        assert_eq!(
            table.find("A regression in the pipeline"),
            Some((PersonaId::QaAgent, "regression"))
        );
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let table = KeywordTable::standard();
        assert_eq!(table.find("Our CI/CD setup"), Some((PersonaId::DevsecopsAgent, "ci/cd")));
        assert_eq!(table.find("FedRAMP Moderate"), Some((PersonaId::ComplianceSpecialist, "fedramp")));
        assert_eq!(table.find("What is AC-2?"), None);
    }

    #[test]
    fn custom_tables_are_lowercased() {
        let table = KeywordTable::new([(PersonaId::QaAgent, ["Smoke"])]);
        assert_eq!(table.find("a SMOKE run"), Some((PersonaId::QaAgent, "smoke")));
    }
}
