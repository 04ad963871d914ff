use super::*;
use crate::net::types::User;

fn user() -> User {
    User { id: "u1".to_owned(), email: "a@b.com".to_owned(), first_name: None, last_name: None, created_at: None }
}

fn state(user: Option<User>, loading: bool, initialized: bool) -> SessionState {
    SessionState { user, loading, initialized }
}

fn signed_out() -> SessionState {
    state(None, false, true)
}

// =============================================================
// decide
// =============================================================

#[test]
fn loading_renders_placeholder_regardless_of_user() {
    assert_eq!(decide(&state(None, true, true), true), GuardDecision::RenderLoading);
    assert_eq!(decide(&state(Some(user()), true, true), true), GuardDecision::RenderLoading);
}

#[test]
fn uninitialized_store_counts_as_loading() {
    assert_eq!(decide(&state(None, false, false), true), GuardDecision::RenderLoading);
}

#[test]
fn signed_out_on_protected_route_redirects() {
    assert_eq!(decide(&signed_out(), true), GuardDecision::Redirect);
}

#[test]
fn public_route_renders_children_when_signed_out() {
    assert_eq!(decide(&signed_out(), false), GuardDecision::RenderChildren);
}

#[test]
fn signed_in_renders_children() {
    assert_eq!(decide(&state(Some(user()), false, true), true), GuardDecision::RenderChildren);
}

// =============================================================
// redirect_url
// =============================================================

#[test]
fn redirect_url_encodes_location() {
    assert_eq!(redirect_url("/login", "/settings"), "/login?redirect=%2Fsettings");
    assert_eq!(redirect_url("/login", "/meals?day=mon&x=1"), "/login?redirect=%2Fmeals%3Fday%3Dmon%26x%3D1");
}

#[test]
fn redirect_url_defaults_to_dashboard() {
    assert_eq!(redirect_url("/login", ""), "/login?redirect=%2Fdashboard");
}

#[test]
fn redirect_url_appends_to_existing_query() {
    assert_eq!(redirect_url("/login?mode=signin", "/x"), "/login?mode=signin&redirect=%2Fx");
}

// =============================================================
// RouteGuard
// =============================================================

#[test]
fn no_redirect_while_loading() {
    let mut guard = RouteGuard::default();
    for _ in 0..3 {
        let step = guard.observe(&state(None, true, false), "/dashboard");
        assert_eq!(step.decision, GuardDecision::RenderLoading);
        assert_eq!(step.redirect, None);
    }
    assert_eq!(guard.episode(), GuardEpisode::Open);
}

#[test]
fn redirects_exactly_once_across_rerenders() {
    let mut guard = RouteGuard::new(GuardConfig::default());
    let redirects: Vec<_> = (0..5).filter_map(|_| guard.observe(&signed_out(), "/dashboard").redirect).collect();
    assert_eq!(redirects, vec!["/login?redirect=%2Fdashboard".to_owned()]);
    assert_eq!(guard.episode(), GuardEpisode::Redirected);
}

#[test]
fn loading_between_renders_does_not_reopen_episode() {
    let mut guard = RouteGuard::default();
    assert!(guard.observe(&signed_out(), "/a").redirect.is_some());
    assert!(guard.observe(&state(None, true, true), "/a").redirect.is_none());
    assert!(guard.observe(&signed_out(), "/a").redirect.is_none());
}

#[test]
fn user_appearing_reopens_episode() {
    let mut guard = RouteGuard::default();
    assert!(guard.observe(&signed_out(), "/a").redirect.is_some());

    let step = guard.observe(&state(Some(user()), false, true), "/a");
    assert_eq!(step.decision, GuardDecision::RenderChildren);
    assert_eq!(guard.episode(), GuardEpisode::Open);

    let again = guard.observe(&signed_out(), "/b");
    assert_eq!(again.redirect.as_deref(), Some("/login?redirect=%2Fb"));
}

#[test]
fn custom_redirect_target() {
    let mut guard = RouteGuard::new(GuardConfig { redirect_to: "/signin".into(), require_auth: true });
    let step = guard.observe(&signed_out(), "/settings");
    assert_eq!(step.redirect.as_deref(), Some("/signin?redirect=%2Fsettings"));
}

#[test]
fn public_guard_never_redirects() {
    let mut guard = RouteGuard::new(GuardConfig { require_auth: false, ..GuardConfig::default() });
    let step = guard.observe(&signed_out(), "/login");
    assert_eq!(step.decision, GuardDecision::RenderChildren);
    assert_eq!(step.redirect, None);
}
