//! The fixed persona catalog.
//!
//! Personas are process-wide, immutable configuration. Each one pairs an
//! identifier with a display name and an instruction template containing a
//! `{context}` placeholder.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::prompt::{persona_instruction, render_instruction};

/// Identifier of a specialist persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PersonaId {
    NistSpecialist,
    AuditSpecialist,
    RiskSpecialist,
    ComplianceSpecialist,
    PmAgent,
    QaAgent,
    DevsecopsAgent,
}

impl PersonaId {
    /// Every persona in catalog order. The classifier prefers earlier entries.
    pub const ALL: [PersonaId; 7] = [
        PersonaId::NistSpecialist,
        PersonaId::AuditSpecialist,
        PersonaId::RiskSpecialist,
        PersonaId::ComplianceSpecialist,
        PersonaId::PmAgent,
        PersonaId::QaAgent,
        PersonaId::DevsecopsAgent,
    ];

    /// The persona used whenever routing cannot decide.
    pub const DEFAULT: PersonaId = PersonaId::NistSpecialist;

    pub fn as_str(&self) -> &'static str {
        match self {
            PersonaId::NistSpecialist => "NIST_SPECIALIST",
            PersonaId::AuditSpecialist => "AUDIT_SPECIALIST",
            PersonaId::RiskSpecialist => "RISK_SPECIALIST",
            PersonaId::ComplianceSpecialist => "COMPLIANCE_SPECIALIST",
            PersonaId::PmAgent => "PM_AGENT",
            PersonaId::QaAgent => "QA_AGENT",
            PersonaId::DevsecopsAgent => "DEVSECOPS_AGENT",
        }
    }

    fn index(self) -> usize {
        match self {
            PersonaId::NistSpecialist => 0,
            PersonaId::AuditSpecialist => 1,
            PersonaId::RiskSpecialist => 2,
            PersonaId::ComplianceSpecialist => 3,
            PersonaId::PmAgent => 4,
            PersonaId::QaAgent => 5,
            PersonaId::DevsecopsAgent => 6,
        }
    }

    fn display_name(self) -> &'static str {
        match self {
            PersonaId::NistSpecialist => "NIST Controls Specialist",
            PersonaId::AuditSpecialist => "Audit & Assessment Specialist",
            PersonaId::RiskSpecialist => "Risk & Impact Specialist",
            PersonaId::ComplianceSpecialist => "Compliance Mapping Specialist",
            PersonaId::PmAgent => "Product Manager Agent",
            PersonaId::QaAgent => "QA & Test Strategy Specialist",
            PersonaId::DevsecopsAgent => "DevSecOps & Pipeline Security Specialist",
        }
    }

    fn role(self) -> &'static str {
        match self {
            PersonaId::NistSpecialist => {
                "You are a Senior NIST RMF & SP 800-53 Rev.5 Consultant. \
                 Reference Control IDs, enhancements, and RMF steps."
            }
            PersonaId::AuditSpecialist => {
                "You are an Audit & Assessment Specialist (NIST SP 800-53A). \
                 List evidence artifacts, test procedures, and remediation steps."
            }
            PersonaId::RiskSpecialist => {
                "You are a Risk & FIPS 199/200 Specialist. \
                 Analyze CIA impact levels with concrete examples and tailoring guidance."
            }
            PersonaId::ComplianceSpecialist => {
                "You are a Compliance Mapping Specialist. \
                 Map NIST 800-53 to FedRAMP, CMMC, ISO 27001, SOC 2, HIPAA."
            }
            PersonaId::PmAgent => {
                "You are a PM & Strategic Advisor for NIST compliance. \
                 Frame compliance as business value, prioritize by effort-vs-impact."
            }
            PersonaId::QaAgent => {
                "You are a QA & Test Strategy Specialist for NIST 800-53 compliance. \
                 Design test cases, validation criteria, test coverage matrices, \
                 and control testing methodology aligned with SP 800-53A."
            }
            PersonaId::DevsecopsAgent => {
                "You are a DevSecOps & Pipeline Security Specialist. \
                 Advise on CI/CD hardening, SAST/DAST integration, container security, \
                 infrastructure-as-code compliance, and shift-left security practices."
            }
        }
    }
}

impl fmt::Display for PersonaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PersonaId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PersonaId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("unknown persona '{s}'"))
    }
}

/// A specialist response style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    pub id: PersonaId,
    pub name: &'static str,
    /// Instruction template with a `{context}` placeholder.
    pub instruction: String,
}

impl Persona {
    /// The system instruction with `context` substituted.
    pub fn render(&self, context: &str) -> String {
        render_instruction(&self.instruction, context)
    }
}

/// Read-only lookup from [`PersonaId`] to [`Persona`].
#[derive(Debug)]
pub struct PersonaCatalog {
    personas: [Persona; 7],
}

static STANDARD: LazyLock<PersonaCatalog> = LazyLock::new(|| PersonaCatalog {
    personas: PersonaId::ALL.map(|id| Persona {
        id,
        name: id.display_name(),
        instruction: persona_instruction(id.role()),
    }),
});

impl PersonaCatalog {
    /// The built-in catalog, initialized on first use.
    pub fn standard() -> &'static PersonaCatalog {
        &STANDARD
    }

    /// Every persona is present, so lookup cannot fail.
    pub fn get(&self, id: PersonaId) -> &Persona {
        &self.personas[id.index()]
    }

    /// Personas in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Persona> {
        self.personas.iter()
    }
}
