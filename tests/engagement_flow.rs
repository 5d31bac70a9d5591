//! End-to-end engagement flow tests against the orchestrator, the
//! in-memory store, and a scripted responder.

use std::sync::Arc;

use futures::future::join_all;

use honeypot_agent::adapters::{
    InMemorySessionStore, MockPersonaResponder, SessionStoreConfig,
};
use honeypot_agent::application::{OrchestratorConfig, SessionOrchestrator};
use honeypot_agent::domain::foundation::{CoreError, SessionId, Timestamp};

fn orchestrator_with_store(store: Arc<InMemorySessionStore>) -> SessionOrchestrator {
    SessionOrchestrator::new(
        store,
        Arc::new(MockPersonaResponder::new()),
        None,
        OrchestratorConfig::default(),
    )
}

fn orchestrator() -> SessionOrchestrator {
    orchestrator_with_store(Arc::new(InMemorySessionStore::with_defaults()))
}

#[tokio::test]
async fn full_scam_message_extracts_every_category() {
    let orchestrator = orchestrator();

    let outcome = orchestrator
        .handle(
            SessionId::new("wire-1"),
            "Your account is blocked! Pay to raj@upi or call 9876543210. \
             Visit http://scam.example/pay",
            Timestamp::now(),
        )
        .await
        .unwrap();

    assert!(outcome.scam_detected);
    assert_eq!(outcome.intelligence.upi_ids(), &["raj@upi"]);
    assert_eq!(outcome.intelligence.phone_numbers(), &["9876543210"]);
    assert_eq!(
        outcome.intelligence.phishing_links(),
        &["http://scam.example/pay"]
    );
    assert!(outcome
        .intelligence
        .suspicious_keywords()
        .contains(&"blocked".to_string()));
    // The digits of the phone number must not double as an account.
    assert!(outcome.intelligence.bank_accounts().is_empty());
}

#[tokio::test]
async fn intelligence_accumulates_across_turns_without_duplicates() {
    let orchestrator = orchestrator();
    let id = SessionId::new("wire-2");

    orchestrator
        .handle(id.clone(), "pay raj@upi immediately", Timestamp::now())
        .await
        .unwrap();
    let second = orchestrator
        .handle(
            id.clone(),
            "I said raj@upi, also try backup@ybl",
            Timestamp::now(),
        )
        .await
        .unwrap();

    assert_eq!(second.intelligence.upi_ids(), &["raj@upi", "backup@ybl"]);
}

#[tokio::test]
async fn concurrent_turns_on_one_session_lose_nothing() {
    let store = Arc::new(InMemorySessionStore::with_defaults());
    let orchestrator = Arc::new(orchestrator_with_store(Arc::clone(&store)));
    let id = SessionId::new("hot-session");

    let turns = (0..12).map(|i| {
        let orchestrator = Arc::clone(&orchestrator);
        let id = id.clone();
        async move {
            orchestrator
                .handle(id, &format!("send money to handle{i}@upi"), Timestamp::now())
                .await
                .unwrap()
        }
    });
    join_all(turns).await;

    let session = store.get_or_create(&id).await;
    // Every turn appends a counterpart message and an agent reply.
    assert_eq!(session.messages().len(), 24);
    assert_eq!(session.intelligence().upi_ids().len(), 12);
    assert!(session.scam_detected());
}

#[tokio::test]
async fn sessions_are_isolated() {
    let orchestrator = orchestrator();

    let flagged = orchestrator
        .handle(SessionId::new("scam"), "urgent: share your otp", Timestamp::now())
        .await
        .unwrap();
    let clean = orchestrator
        .handle(SessionId::new("clean"), "see you at dinner", Timestamp::now())
        .await
        .unwrap();

    assert!(flagged.scam_detected);
    assert!(!clean.scam_detected);
    assert!(clean.intelligence.is_empty());
}

#[tokio::test]
async fn idle_session_restarts_clean_on_next_message() {
    let store = Arc::new(InMemorySessionStore::new(SessionStoreConfig {
        idle_window_secs: 0,
        ..SessionStoreConfig::default()
    }));
    let orchestrator = orchestrator_with_store(Arc::clone(&store));
    let id = SessionId::new("sleepy");

    orchestrator
        .handle(id.clone(), "pay to raj@upi", Timestamp::now())
        .await
        .unwrap();

    // A zero-second window makes any follow-up arrive "late".
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    let outcome = orchestrator
        .handle(id.clone(), "hello again", Timestamp::now())
        .await
        .unwrap();

    assert!(!outcome.scam_detected);
    assert!(outcome.intelligence.is_empty());
}

#[tokio::test]
async fn empty_message_is_rejected_without_side_effects() {
    let store = Arc::new(InMemorySessionStore::with_defaults());
    let orchestrator = orchestrator_with_store(Arc::clone(&store));

    let result = orchestrator
        .handle(SessionId::new("ghost"), "\t  \n", Timestamp::now())
        .await;

    assert!(matches!(result, Err(CoreError::InvalidInput { .. })));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn reset_then_resubmit_reproduces_the_original_verdict() {
    let orchestrator = orchestrator();
    let id = SessionId::new("replay");
    let text = "KYC expired! Verify at http://phish.example/kyc";

    let first = orchestrator
        .handle(id.clone(), text, Timestamp::now())
        .await
        .unwrap();
    orchestrator.reset(&id).await.unwrap();
    let second = orchestrator
        .handle(id, text, Timestamp::now())
        .await
        .unwrap();

    assert_eq!(first.scam_detected, second.scam_detected);
    assert_eq!(first.intelligence, second.intelligence);
    assert!(second.scam_detected);
}
