use super::*;

#[test]
fn default_points_at_local_api() {
    let config = ClientConfig::default();
    assert_eq!(config.api_base, "http://localhost:3001");
    assert_eq!(config.login_path, "/login");
}

#[test]
fn runtime_value_wins_over_compiled() {
    assert_eq!(resolve_api_base(Some("http://rt:1"), Some("http://ct:2")), "http://rt:1");
}

#[test]
fn compiled_value_used_when_runtime_missing_or_blank() {
    assert_eq!(resolve_api_base(None, Some("http://ct:2")), "http://ct:2");
    assert_eq!(resolve_api_base(Some("  "), Some("http://ct:2")), "http://ct:2");
}

#[test]
fn falls_back_to_default() {
    assert_eq!(resolve_api_base(None, None), DEFAULT_API_BASE);
    assert_eq!(resolve_api_base(Some(""), Some("")), DEFAULT_API_BASE);
}

#[test]
fn with_api_base_strips_trailing_slash() {
    let config = ClientConfig::default().with_api_base(" https://api.example.com/ ");
    assert_eq!(config.api_base, "https://api.example.com");
}

#[test]
fn with_login_path_overrides_default() {
    let config = ClientConfig::default().with_login_path("/signin");
    assert_eq!(config.login_path, "/signin");
}
