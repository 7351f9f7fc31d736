//! Tests for dispatch module

use super::*;
use crate::catalog::{names, Catalog, Modality, Pricing, ProviderDescriptor};
use crate::cost::UsageAggregator;
use crate::error::{Error, VendorError};
use crate::router::SelectionResult;
use crate::test_support::{default_selector, full_catalog};
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};
use tokio_util::sync::CancellationToken;

fn dispatcher_for(catalog: Catalog) -> Dispatcher {
    let catalog = Arc::new(catalog);
    let usage = Arc::new(UsageAggregator::new(&catalog));
    Dispatcher::new(catalog, usage, &DispatcherConfig::default()).unwrap()
}

/// Agency/standard routes to openai; the cheapest other text provider is groq
fn openai_selection() -> SelectionResult {
    default_selector()
        .select_text_provider("agency", "standard", Some("email"), 1000.0, None)
        .unwrap()
}

fn request() -> GenerationRequest {
    GenerationRequest::new("Write a subject line for our spring sale", 256)
}

#[tokio::test]
async fn test_primary_success() {
    let mut dispatcher = dispatcher_for(full_catalog());
    let openai = Arc::new(MockClient::text("Spring into savings", 2_000));
    let groq = Arc::new(MockClient::text("unused", 10));
    dispatcher.register(names::OPENAI, openai.clone());
    dispatcher.register(names::GROQ, groq.clone());

    let selection = openai_selection();
    let result = assert_ok!(dispatcher.execute(&selection, &request()).await);

    assert_eq!(result.provider_used, names::OPENAI);
    assert!(!result.fallback_used);
    assert!(result.cost_impact.is_none());
    assert_eq!(
        result.content,
        GeneratedContent::Text("Spring into savings".to_string())
    );
    assert!((result.cost - selection.unit_cost * 2.0).abs() < 1e-12);
    assert_eq!(openai.calls(), 1);
    assert_eq!(groq.calls(), 0);

    let records = dispatcher.usage().records().await;
    assert_eq!(records.len(), 1);
    assert!(records[0].success);
    assert_eq!(records[0].units, 2_000);
}

#[tokio::test]
async fn test_fallback_after_primary_failure() {
    let mut dispatcher = dispatcher_for(full_catalog());
    let openai = Arc::new(MockClient::failing(VendorError::Status {
        status: 503,
        message: "overloaded".to_string(),
    }));
    let groq = Arc::new(MockClient::text("Fresh deals inside", 1_000));
    dispatcher.register(names::OPENAI, openai.clone());
    dispatcher.register(names::GROQ, groq.clone());

    let selection = openai_selection();
    let result = assert_ok!(dispatcher.execute(&selection, &request()).await);

    assert!(result.fallback_used);
    assert_eq!(result.provider_used, names::GROQ);
    assert_eq!(openai.calls(), 1);
    assert_eq!(groq.calls(), 1);

    let groq_cost = full_catalog().get(names::GROQ).unwrap().unit_cost;
    let impact = result.cost_impact.unwrap();
    assert!((impact - (groq_cost - selection.unit_cost)).abs() < 1e-12);
    assert!((result.cost - groq_cost).abs() < 1e-12);

    let records = dispatcher.usage().records().await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].provider, names::OPENAI);
    assert!(!records[0].success);
    assert_eq!(records[1].provider, names::GROQ);
    assert!(records[1].success);
}

#[tokio::test]
async fn test_both_attempts_fail() {
    let mut dispatcher = dispatcher_for(full_catalog());
    dispatcher.register(
        names::OPENAI,
        Arc::new(MockClient::failing(VendorError::RateLimit)),
    );
    dispatcher.register(
        names::GROQ,
        Arc::new(MockClient::failing(VendorError::Network("reset".to_string()))),
    );

    let error = assert_err!(dispatcher.execute(&openai_selection(), &request()).await);
    match error {
        Error::ProviderExhausted {
            primary,
            fallback,
            source,
        } => {
            assert_eq!(primary, names::OPENAI);
            assert_eq!(fallback.as_deref(), Some(names::GROQ));
            assert_eq!(source, VendorError::Network("reset".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }

    let records = dispatcher.usage().records().await;
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| !r.success));
}

#[tokio::test]
async fn test_never_more_than_two_calls() {
    let mut dispatcher = dispatcher_for(full_catalog());
    let clients: Vec<(&str, Arc<MockClient>)> = [
        names::GROQ,
        names::GEMINI,
        names::DEEPSEEK,
        names::OPENAI,
        names::ANTHROPIC,
    ]
    .into_iter()
    .map(|name| (name, Arc::new(MockClient::failing(VendorError::RateLimit))))
    .collect();
    for (name, client) in &clients {
        dispatcher.register(*name, client.clone());
    }

    assert!(dispatcher.execute(&openai_selection(), &request()).await.is_err());

    let total: usize = clients.iter().map(|(_, c)| c.calls()).sum();
    assert_eq!(total, 2);
}

#[tokio::test]
async fn test_no_fallback_available() {
    let catalog = Catalog::new(
        vec![ProviderDescriptor::new(
            "solo",
            3,
            Pricing::Tokens {
                input_per_1m: 1.0,
                output_per_1m: 2.0,
            },
            true,
        )],
        &[Modality::Text],
    )
    .unwrap();
    let solo = catalog.get("solo").unwrap().clone();
    let mut dispatcher = dispatcher_for(catalog);
    dispatcher.register("solo", Arc::new(MockClient::failing(VendorError::RateLimit)));

    let selection = SelectionResult {
        provider: solo.name.clone(),
        modality: solo.modality,
        quality: solo.quality,
        unit_cost: solo.unit_cost,
        tier: crate::router::SubscriptionTier::Pro,
        detail: crate::router::TaskDetail::Text {
            complexity: crate::router::TaskComplexity::Standard,
            content_type: None,
            input_cost_per_1m: 1.0,
            output_cost_per_1m: 2.0,
        },
        warning: None,
        suggestion: None,
    };

    let error = assert_err!(dispatcher.execute(&selection, &request()).await);
    assert!(matches!(
        error,
        Error::ProviderExhausted { fallback: None, source: VendorError::RateLimit, .. }
    ));
    assert_eq!(dispatcher.usage().records().await.len(), 1);
}

#[tokio::test]
async fn test_missing_client_counts_as_failure() {
    let mut dispatcher = dispatcher_for(full_catalog());
    let groq = Arc::new(MockClient::text("ok", 100));
    dispatcher.register(names::GROQ, groq.clone());
    assert!(!dispatcher.has_client(names::OPENAI));

    let result = assert_ok!(dispatcher.execute(&openai_selection(), &request()).await);
    assert!(result.fallback_used);
    assert_eq!(groq.calls(), 1);

    let records = dispatcher.usage().records().await;
    assert_eq!(records.len(), 2);
    assert!(!records[0].success);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_triggers_fallback() {
    let catalog = Arc::new(full_catalog());
    let usage = Arc::new(UsageAggregator::new(&catalog));
    let mut dispatcher =
        Dispatcher::new(catalog, usage, &DispatcherConfig { timeout_ms: 50 }).unwrap();
    dispatcher.register(
        names::OPENAI,
        Arc::new(MockClient::text("late", 10).with_delay(Duration::from_secs(30))),
    );
    dispatcher.register(names::GROQ, Arc::new(MockClient::text("on time", 10)));

    let result = assert_ok!(dispatcher.execute(&openai_selection(), &request()).await);
    assert_eq!(result.provider_used, names::GROQ);

    let records = dispatcher.usage().records().await;
    assert!(!records[0].success);
    assert!(records[0].latency_seconds >= 0.05);
}

#[test]
fn test_zero_timeout_rejected() {
    let catalog = Arc::new(full_catalog());
    let usage = Arc::new(UsageAggregator::new(&catalog));
    let result = Dispatcher::new(catalog, usage, &DispatcherConfig { timeout_ms: 0 });
    assert!(matches!(result, Err(Error::Configuration(_))));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_primary_skips_fallback() {
    let mut dispatcher = dispatcher_for(full_catalog());
    let openai = Arc::new(MockClient::text("slow", 10).with_delay(Duration::from_secs(10)));
    let groq = Arc::new(MockClient::text("fallback", 10));
    dispatcher.register(names::OPENAI, openai.clone());
    dispatcher.register(names::GROQ, groq.clone());

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let error = assert_err!(
        dispatcher
            .execute_with_cancel(&openai_selection(), &request(), &cancel)
            .await
    );
    assert!(matches!(error, Error::Cancelled));
    assert_eq!(openai.calls(), 1);
    assert_eq!(groq.calls(), 0);

    let records = dispatcher.usage().records().await;
    assert_eq!(records.len(), 1);
    assert!(!records[0].success);
}

#[tokio::test]
async fn test_already_cancelled_makes_no_call() {
    let mut dispatcher = dispatcher_for(full_catalog());
    let openai = Arc::new(MockClient::text("unused", 10));
    dispatcher.register(names::OPENAI, openai.clone());

    let cancel = CancellationToken::new();
    cancel.cancel();
    let error = assert_err!(
        dispatcher
            .execute_with_cancel(&openai_selection(), &request(), &cancel)
            .await
    );
    assert!(matches!(error, Error::Cancelled));
    assert_eq!(openai.calls(), 0);
    assert!(dispatcher.usage().records().await.is_empty());
}

#[tokio::test]
async fn test_image_fallback_uses_image_provider() {
    let mut dispatcher = dispatcher_for(full_catalog());
    dispatcher.register(
        names::FLUX_PRO,
        Arc::new(MockClient::failing(VendorError::InvalidResponse(
            "no images".to_string(),
        ))),
    );
    dispatcher.register(
        names::FLUX_SCHNELL,
        Arc::new(MockClient::images(vec![
            "https://cdn.example/a.png".to_string(),
            "https://cdn.example/b.png".to_string(),
        ])),
    );

    let selection = default_selector()
        .select_image_provider("pro", "hero", 100.0, None)
        .unwrap();
    assert_eq!(selection.provider, names::FLUX_PRO);

    let result = assert_ok!(
        dispatcher
            .execute(&selection, &GenerationRequest::new("sunlit storefront", 2))
            .await
    );
    assert_eq!(result.provider_used, names::FLUX_SCHNELL);
    assert_eq!(result.units, 2);
    assert!((result.cost - 0.006).abs() < 1e-12);
}

#[tokio::test]
async fn test_selection_provenance_carried_through() {
    let mut dispatcher = dispatcher_for(full_catalog());
    dispatcher.register(names::DEEPSEEK, Arc::new(MockClient::text("copy", 500)));

    let selection = default_selector()
        .select_text_provider("pro", "complex", None, 10.0, None)
        .unwrap();
    assert!(selection.warning.is_some());

    let result = assert_ok!(dispatcher.execute(&selection, &request()).await);
    assert_eq!(result.warning, selection.warning);
    assert!(result.suggestion.is_none());
}

#[tokio::test]
async fn test_with_automocked_client() {
    let mut primary = MockProviderClient::new();
    primary
        .expect_generate()
        .times(1)
        .returning(|_| Err(VendorError::Timeout(1_000)));

    let mut fallback = MockProviderClient::new();
    fallback.expect_generate().times(1).returning(|req| {
        Ok(GenerationOutput {
            content: GeneratedContent::Text(format!("echo: {}", req.prompt)),
            units: 42,
        })
    });

    let mut dispatcher = dispatcher_for(full_catalog());
    dispatcher.register(names::OPENAI, Arc::new(primary));
    dispatcher.register(names::GROQ, Arc::new(fallback));

    let result = assert_ok!(dispatcher.execute(&openai_selection(), &request()).await);
    assert_eq!(
        result.content,
        GeneratedContent::Text(
            "echo: Write a subject line for our spring sale".to_string()
        )
    );
    assert_eq!(result.units, 42);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_executions_record_every_attempt() {
    let mut dispatcher = dispatcher_for(full_catalog());
    dispatcher.register(
        names::OPENAI,
        Arc::new(MockClient::failing(VendorError::RateLimit)),
    );
    dispatcher.register(names::GROQ, Arc::new(MockClient::text("ok", 100)));
    let dispatcher = Arc::new(dispatcher);
    let selection = Arc::new(openai_selection());

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..50 {
        let dispatcher = Arc::clone(&dispatcher);
        let selection = Arc::clone(&selection);
        tasks.spawn(async move { dispatcher.execute(&selection, &request()).await });
    }
    while let Some(joined) = tasks.join_next().await {
        assert!(joined.unwrap().is_ok());
    }

    let records = dispatcher.usage().records().await;
    assert_eq!(records.len(), 100);
    let mut ids: Vec<u64> = records.iter().map(|r| r.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 100);

    let summary = dispatcher.usage().get_cost_summary().await;
    let groq_cost = full_catalog().get(names::GROQ).unwrap().cost_for(100);
    assert!((summary.total_cost - groq_cost * 50.0).abs() < 1e-9);
}
