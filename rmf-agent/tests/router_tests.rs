//! Routing decisions with a scripted classifier.

use std::sync::Arc;
use std::time::Duration;

use rmf_agent::{FallbackReason, PersonaId, PersonaRouter, RouteStage};
use rmf_model::{MockChatModel, MockReply};

#[tokio::test]
async fn keyword_match_skips_the_classifier() {
    let classifier = Arc::new(MockChatModel::failing("backend offline"));
    let router = PersonaRouter::new(classifier.clone());

    let route = router.route("Which audit evidence proves AC-2 is in place?").await;

    assert_eq!(route.persona, PersonaId::AuditSpecialist);
    assert_eq!(route.stage, RouteStage::Keyword { trigger: "audit".to_string() });
    assert_eq!(classifier.calls(), 0);
}

#[tokio::test]
async fn classifier_reply_is_matched_by_substring() {
    let classifier = Arc::new(MockChatModel::new("Category: 'PM_AGENT'\n"));
    let router = PersonaRouter::new(classifier.clone());

    let route = router.route("What is AC-2?").await;

    assert_eq!(route.persona, PersonaId::PmAgent);
    assert_eq!(route.stage, RouteStage::Classifier);
    let request = &classifier.requests()[0];
    assert_eq!(request.temperature, Some(0.0));
    assert!(request.system.contains("- QA_AGENT: QA & Test Strategy Specialist"));
}

#[tokio::test]
async fn first_catalog_id_wins_when_several_appear() {
    let classifier = Arc::new(MockChatModel::new("QA_AGENT or RISK_SPECIALIST"));
    let router = PersonaRouter::new(classifier);

    let route = router.route("What is AC-2?").await;

    assert_eq!(route.persona, PersonaId::RiskSpecialist);
}

#[tokio::test]
async fn unrecognized_reply_falls_back_to_default() {
    let router = PersonaRouter::new(Arc::new(MockChatModel::new("  banana  ")));

    let route = router.route("What is AC-2?").await;

    assert_eq!(route.persona, PersonaId::DEFAULT);
    assert_eq!(
        route.stage,
        RouteStage::Fallback { reason: FallbackReason::Unrecognized("banana".to_string()) }
    );
}

#[tokio::test]
async fn backend_error_falls_back_to_default() {
    let classifier =
        Arc::new(MockChatModel::new("unused").with_script([MockReply::fail("503 Service Unavailable")]));
    let router = PersonaRouter::new(classifier);

    let route = router.route("What is AC-2?").await;

    assert_eq!(route.persona, PersonaId::NistSpecialist);
    assert!(matches!(
        route.stage,
        RouteStage::Fallback { reason: FallbackReason::BackendError(ref m) } if m.contains("503")
    ));
}

#[tokio::test(start_paused = true)]
async fn slow_classifier_times_out_to_default() {
    let classifier =
        Arc::new(MockChatModel::new("AUDIT_SPECIALIST").with_delay(Duration::from_secs(60)));
    let router = PersonaRouter::new(classifier.clone()).with_timeout(Duration::from_secs(15));

    let route = router.route("What is AC-2?").await;

    assert_eq!(route.persona, PersonaId::NistSpecialist);
    assert_eq!(route.stage, RouteStage::Fallback { reason: FallbackReason::Timeout });
    assert_eq!(classifier.calls(), 1);
}
