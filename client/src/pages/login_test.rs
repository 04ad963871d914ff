use super::*;

#[test]
fn validate_login_input_trims_email_and_requires_both() {
    assert_eq!(
        validate_login_input("  a@b.com ", "secret123"),
        Ok(("a@b.com".to_owned(), "secret123".to_owned()))
    );
    assert_eq!(validate_login_input("   ", "secret123"), Err("Enter email and password."));
    assert_eq!(validate_login_input("a@b.com", ""), Err("Enter email and password."));
}

#[test]
fn validate_register_input_builds_request() {
    let request = validate_register_input(" Test ", "User", " x@y.com", "secret123").unwrap();
    assert_eq!(
        request,
        RegisterRequest {
            first_name: "Test".to_owned(),
            last_name: "User".to_owned(),
            email: "x@y.com".to_owned(),
            password: "secret123".to_owned(),
        }
    );
}

#[test]
fn validate_register_input_requires_all_fields() {
    assert_eq!(validate_register_input("", "User", "x@y.com", "secret123"), Err("All fields are required."));
    assert_eq!(validate_register_input("Test", "  ", "x@y.com", "secret123"), Err("All fields are required."));
}

#[test]
fn validate_register_input_enforces_password_length() {
    assert_eq!(
        validate_register_input("Test", "User", "x@y.com", "12345"),
        Err("Password must be at least 6 characters.")
    );
    assert!(validate_register_input("Test", "User", "x@y.com", "123456").is_ok());
}

#[test]
fn return_target_accepts_local_paths() {
    assert_eq!(return_target(Some("/settings")), "/settings");
    assert_eq!(return_target(Some("/meals?day=mon")), "/meals?day=mon");
}

#[test]
fn return_target_rejects_external_or_missing() {
    assert_eq!(return_target(None), "/dashboard");
    assert_eq!(return_target(Some("")), "/dashboard");
    assert_eq!(return_target(Some("https://evil.example")), "/dashboard");
    assert_eq!(return_target(Some("//evil.example")), "/dashboard");
}
