use super::*;

fn with_url(url: &str) -> AgoraConfig {
    let mut config = AgoraConfig::default();
    config.server.url = url.into();
    config
}

#[test]
fn default_config_is_valid() {
    assert!(validate(&AgoraConfig::default()).is_ok());
}

#[test]
fn http_and_https_urls_are_valid() {
    assert!(validate(&with_url("http://localhost:3000")).is_ok());
    assert!(validate(&with_url("https://agora.example.org/api")).is_ok());
}

#[test]
fn other_schemes_are_rejected() {
    let err = validate(&with_url("ws://localhost:3000")).unwrap_err();
    assert!(err.to_string().contains("server.url"));
}

#[test]
fn url_without_host_is_rejected() {
    let err = validate(&with_url("https://")).unwrap_err();
    assert!(err.to_string().contains("server.url"));
}

#[test]
fn urls_the_client_cannot_use_are_rejected() {
    for url in [
        "http://h?x=1",
        "http://chat.example.org#home",
        "http://chat example.org",
    ] {
        assert!(validate(&with_url(url)).is_err(), "{url} should be rejected");
    }
}

#[test]
fn completed_onboarding_needs_a_server() {
    let mut config = AgoraConfig::default();
    config.onboarding.completed = true;
    let err = validate(&config).unwrap_err();
    assert!(err.to_string().contains("onboarding.completed"));
}

#[test]
fn long_status_message_is_rejected() {
    let mut config = AgoraConfig::default();
    config.presence.status_message = "x".repeat(300);
    assert!(validate(&config).is_err());
}

#[test]
fn errors_are_collected() {
    let mut config = with_url("gopher://old");
    config.presence.status_message = "x".repeat(300);
    let msg = validate(&config).unwrap_err().to_string();
    assert!(msg.contains("server.url"));
    assert!(msg.contains("presence.status_message"));
    assert!(msg.contains("; "));
}
