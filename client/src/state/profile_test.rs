use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::*;

// =============================================================
// Helpers
// =============================================================

#[derive(Default)]
struct MockProfileApi {
    fetches: Mutex<VecDeque<Result<Option<HealthProfile>, ApiError>>>,
    saves: Mutex<VecDeque<Result<HealthProfile, ApiError>>>,
    saved_bodies: Mutex<Vec<HealthProfile>>,
}

impl MockProfileApi {
    fn with_fetch(result: Result<Option<HealthProfile>, ApiError>) -> Self {
        let api = Self::default();
        api.fetches.lock().unwrap().push_back(result);
        api
    }

    fn push_save(&self, result: Result<HealthProfile, ApiError>) {
        self.saves.lock().unwrap().push_back(result);
    }
}

#[async_trait]
impl ProfileApi for MockProfileApi {
    async fn fetch_profile(&self) -> Result<Option<HealthProfile>, ApiError> {
        self.fetches.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }

    async fn save_profile(&self, profile: &HealthProfile) -> Result<HealthProfile, ApiError> {
        self.saved_bodies.lock().unwrap().push(profile.clone());
        self.saves.lock().unwrap().pop_front().unwrap_or_else(|| Ok(profile.clone()))
    }
}

fn profile(age: Option<u32>, gender: Option<&str>, allergies: Option<&str>) -> HealthProfile {
    HealthProfile { age, gender: gender.map(str::to_owned), allergies: allergies.map(str::to_owned) }
}

// =============================================================
// refresh
// =============================================================

#[tokio::test]
async fn unauthorized_means_no_profile_and_no_error() {
    let store = ProfileStore::new(MockProfileApi::with_fetch(Err(ApiError::Unauthorized)));
    store.init().await;
    assert_eq!(store.state(), ProfileState { profile: None, loading: false, error: None });
}

#[tokio::test]
async fn refresh_after_signed_out_bootstrap_loads_profile() {
    let api = MockProfileApi::with_fetch(Err(ApiError::Unauthorized));
    api.fetches.lock().unwrap().push_back(Ok(Some(profile(Some(28), Some("male"), None))));
    let store = ProfileStore::new(api);

    store.init().await;
    assert_eq!(store.state().profile, None);

    store.refresh().await;
    let state = store.state();
    assert_eq!(state.profile, Some(profile(Some(28), Some("male"), None)));
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn server_error_is_reported() {
    let err = ApiError::Status { status: 500, message: "Failed (500)".into() };
    let store = ProfileStore::new(MockProfileApi::with_fetch(Err(err)));
    store.init().await;
    let state = store.state();
    assert_eq!(state.error.as_deref(), Some("Failed (500)"));
    assert!(!state.loading);
}

#[tokio::test]
async fn server_error_keeps_cached_profile() {
    let api = MockProfileApi::with_fetch(Ok(Some(profile(Some(30), None, None))));
    api.fetches
        .lock()
        .unwrap()
        .push_back(Err(ApiError::Status { status: 503, message: "Failed (503)".into() }));
    let store = ProfileStore::new(api);

    store.init().await;
    store.refresh().await;

    let state = store.state();
    assert_eq!(state.profile, Some(profile(Some(30), None, None)));
    assert_eq!(state.error.as_deref(), Some("Failed (503)"));
}

#[tokio::test]
async fn transport_error_is_treated_as_no_profile() {
    let store = ProfileStore::new(MockProfileApi::with_fetch(Err(ApiError::Transport("offline".into()))));
    store.init().await;
    let state = store.state();
    assert_eq!(state.profile, None);
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn refresh_clears_previous_error() {
    let api = MockProfileApi::with_fetch(Err(ApiError::Status { status: 500, message: "Failed (500)".into() }));
    api.fetches.lock().unwrap().push_back(Ok(Some(profile(Some(41), Some("male"), None))));
    let store = ProfileStore::new(api);

    store.init().await;
    assert!(store.state().error.is_some());
    store.refresh().await;

    let state = store.state();
    assert_eq!(state.error, None);
    assert_eq!(state.profile, Some(profile(Some(41), Some("male"), None)));
}

// =============================================================
// update_local
// =============================================================

#[tokio::test]
async fn update_local_merges_without_network() {
    let existing = profile(Some(30), Some("female"), None);
    let store = ProfileStore::new(MockProfileApi::with_fetch(Ok(Some(existing))));
    store.init().await;

    store.update_local(&ProfilePatch { allergies: Some("peanuts".into()), ..ProfilePatch::default() });

    assert_eq!(store.state().profile, Some(profile(Some(30), Some("female"), Some("peanuts"))));
    assert!(store.inner.api.saved_bodies.lock().unwrap().is_empty());
}

#[test]
fn update_local_creates_profile_when_absent() {
    let store = ProfileStore::new(MockProfileApi::default());
    store.update_local(&ProfilePatch { age: Some(25), ..ProfilePatch::default() });
    assert_eq!(store.state().profile, Some(profile(Some(25), None, None)));
}

// =============================================================
// save
// =============================================================

#[tokio::test]
async fn save_first_profile_adopts_server_copy() {
    let store = ProfileStore::new(MockProfileApi::with_fetch(Err(ApiError::Unauthorized)));
    store.init().await;
    assert_eq!(store.state().profile, None);

    let server_copy = profile(Some(30), Some("female"), Some("peanuts"));
    store.inner.api.push_save(Ok(server_copy.clone()));
    let patch = ProfilePatch { age: Some(30), gender: Some("female".into()), allergies: Some(" peanuts ".into()) };

    let saved = store.save(&patch).await.unwrap();

    assert_eq!(saved, server_copy);
    assert_eq!(store.state().profile, Some(server_copy));
    assert_eq!(store.state().error, None);
    let sent = store.inner.api.saved_bodies.lock().unwrap().clone();
    assert_eq!(sent, vec![profile(Some(30), Some("female"), Some(" peanuts "))]);
}

#[tokio::test]
async fn save_sends_merged_profile() {
    let store = ProfileStore::new(MockProfileApi::with_fetch(Ok(Some(profile(Some(30), Some("female"), None)))));
    store.init().await;

    store.save(&ProfilePatch { allergies: Some("shellfish".into()), ..ProfilePatch::default() }).await.unwrap();

    let sent = store.inner.api.saved_bodies.lock().unwrap().clone();
    assert_eq!(sent, vec![profile(Some(30), Some("female"), Some("shellfish"))]);
}

#[tokio::test]
async fn save_failure_records_error_and_keeps_profile() {
    let existing = profile(Some(30), None, None);
    let store = ProfileStore::new(MockProfileApi::with_fetch(Ok(Some(existing.clone()))));
    store.init().await;
    store.inner.api.push_save(Err(ApiError::Status { status: 400, message: "Invalid age".into() }));

    let err = store.save(&ProfilePatch { age: Some(200), ..ProfilePatch::default() }).await.unwrap_err();

    assert_eq!(err.to_string(), "Invalid age");
    let state = store.state();
    assert_eq!(state.profile, Some(existing));
    assert_eq!(state.error.as_deref(), Some("Invalid age"));
    assert!(!state.loading);
}

// =============================================================
// dispose
// =============================================================

#[tokio::test]
async fn disposed_store_ignores_updates() {
    let store = ProfileStore::new(MockProfileApi::with_fetch(Ok(Some(profile(Some(30), None, None)))));
    store.dispose();

    store.init().await;
    store.update_local(&ProfilePatch { age: Some(31), ..ProfilePatch::default() });

    assert_eq!(store.state(), ProfileState::default());
}
