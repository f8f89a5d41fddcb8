use std::sync::Arc;
use std::time::Duration;

use adapters::{AdScript, InMemory, ScriptedAdProvider};
use application::ports::in_::AdGateService;
use application::ports::out_::AdOutcome;
use domain::{AdGate, RetryPolicy, UnlockReason};

fn service(script: Vec<AdScript>) -> (Arc<ScriptedAdProvider>, Arc<InMemory>, AdGateService) {
    let provider = Arc::new(ScriptedAdProvider::new(script));
    let timer = Arc::new(InMemory::new());
    let service = AdGateService::new(provider.clone(), timer.clone(), RetryPolicy::default(), "premium_gate");
    (provider, timer, service)
}

#[tokio::test]
async fn test_reward_unlocks_on_first_attempt() {
    let (provider, timer, service) = service(vec![AdScript::Shown(AdOutcome::Rewarded)]);

    let gate = service.unlock(AdGate::Locked).await;

    assert_eq!(gate, AdGate::Unlocked(UnlockReason::Rewarded));
    assert_eq!(provider.get_requests(), vec!["premium_gate".to_string()]);
    assert!(timer.get_sleeps().is_empty());
}

#[tokio::test]
async fn test_failed_requests_are_retried_with_backoff() {
    // Arrange
    let (provider, timer, service) = service(vec![
        AdScript::NoFill,
        AdScript::ShowFailed,
        AdScript::Shown(AdOutcome::Rewarded),
    ]);

    // Act
    let gate = service.unlock(AdGate::Locked).await;

    // Assert
    assert_eq!(gate, AdGate::Unlocked(UnlockReason::Rewarded));
    assert_eq!(provider.get_requests().len(), 3);
    assert_eq!(timer.get_sleeps(), vec![Duration::from_secs(2), Duration::from_secs(2)]);
}

#[tokio::test]
async fn test_exhausted_retries_open_the_gate() {
    let (provider, timer, service) = service(vec![AdScript::Unavailable, AdScript::NoFill, AdScript::NoFill]);

    let gate = service.unlock(AdGate::Locked).await;

    assert_eq!(gate, AdGate::Unlocked(UnlockReason::ProviderUnavailable));
    assert_eq!(provider.get_requests().len(), 3);
    // No sleep after the final attempt
    assert_eq!(timer.get_sleeps().len(), 2);
}

#[tokio::test]
async fn test_dismissed_ad_keeps_gate_locked() {
    let (provider, _timer, service) = service(vec![AdScript::Shown(AdOutcome::Dismissed)]);

    let gate = service.unlock(AdGate::Locked).await;

    assert_eq!(gate, AdGate::Locked);
    assert_eq!(provider.get_requests().len(), 1);
}

#[tokio::test]
async fn test_unlocked_gate_skips_the_ad() {
    let (provider, _timer, service) = service(vec![]);

    let gate = service.unlock(AdGate::Unlocked(UnlockReason::Free)).await;

    assert_eq!(gate, AdGate::Unlocked(UnlockReason::Free));
    assert!(provider.get_requests().is_empty());
}

#[tokio::test]
async fn test_bypass_unlocks_without_requests() {
    let (provider, _timer, service) = service(vec![]);

    assert_eq!(service.bypass(AdGate::Locked), AdGate::Unlocked(UnlockReason::Bypassed));
    assert!(provider.get_requests().is_empty());
}
