use super::common::*;
use sfconnect_session::{CancellationToken, ErrorKind};
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_login_sends_soap_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(login_path()))
        .and(header("SOAPAction", "\"\""))
        .and(header("Content-Type", "text/xml; charset=utf-8"))
        .and(body_string_contains(
            "<username>integration@example.com</username>",
        ))
        .and(body_string_contains("<password>s3cret&amp;TOKEN</password>"))
        .and(body_string_contains(r#"<login xmlns="urn:enterprise.soap.sforce.com">"#))
        .respond_with(ResponseTemplate::new(200).set_body_string(login_body(&server, "00Dxx!tok")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(options(&server));
    client.log_in(&CancellationToken::new()).await.unwrap();

    assert!(client.is_logged_in());
}

#[tokio::test]
async fn test_login_failure_carries_fault() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(login_path()))
        .respond_with(ResponseTemplate::new(500).set_body_string(
            "<soapenv:Fault><faultcode>INVALID_LOGIN</faultcode><faultstring>INVALID_LOGIN: Invalid username, password, security token; or user locked out.</faultstring></soapenv:Fault>",
        ))
        .mount(&server)
        .await;

    let client = client(options(&server));
    let err = client.log_in(&CancellationToken::new()).await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert!(err.to_string().contains("INVALID_LOGIN"));
    assert!(!err.to_string().contains("s3cret"));
    assert!(!client.is_logged_in());
}

#[tokio::test]
async fn test_login_response_without_session_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(login_path()))
        .respond_with(ResponseTemplate::new(200).set_body_string("<loginResponse/>"))
        .mount(&server)
        .await;

    let client = client(options(&server));
    let err = client.log_in(&CancellationToken::new()).await.unwrap_err();

    assert!(matches!(err.kind, ErrorKind::MalformedLoginResponse(_)));
}

#[tokio::test]
async fn test_concurrent_login_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(login_path()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(login_body(&server, "00Dxx!tok"))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client(options(&server));
    let cancel = CancellationToken::new();

    let (first, second) = tokio::join!(client.log_in(&cancel), client.log_in(&cancel));

    let lost = match (first, second) {
        (Ok(()), Err(err)) | (Err(err), Ok(())) => err,
        other => panic!("expected exactly one login to succeed, got {:?}", other),
    };
    assert!(matches!(lost.kind, ErrorKind::LoginInProgress));
    assert!(client.is_logged_in());
}

#[tokio::test]
async fn test_cancelled_login_returns_quietly() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(login_path()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(login_body(&server, "00Dxx!tok"))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = client(options(&server));
    let cancel = CancellationToken::new();

    let (result, _) = tokio::join!(client.log_in(&cancel), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();
    });

    assert!(result.is_ok());
    assert!(!client.is_logged_in());
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/oauth2/revoke"))
        .and(query_param("token", "00Dxx!tok"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server, options(&server)).await;
    client.log_out(&CancellationToken::new()).await.unwrap();
}

#[tokio::test]
async fn test_logout_failure_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/oauth2/revoke"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string(r#"{"error":"unsupported_token_type"}"#),
        )
        .mount(&server)
        .await;

    let client = logged_in_client(&server, options(&server)).await;
    let err = client.log_out(&CancellationToken::new()).await.unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert!(err.to_string().contains("unsupported_token_type"));
}

#[tokio::test]
async fn test_unreachable_login_host() {
    let options = sfconnect::ConnectorOptions::new(USERNAME, PASSWORD)
        .with_login_url("http://127.0.0.1:1");
    let client = client(options);

    let err = client.log_in(&CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Transport(_)));
}

#[tokio::test]
async fn test_sequential_logins_are_allowed() {
    let server = MockServer::start().await;
    mount_login(&server, "00Dxx!tok").await;

    let client = client(options(&server));
    let cancel = CancellationToken::new();

    client.log_in(&cancel).await.unwrap();
    client.log_in(&cancel).await.unwrap();
    assert!(client.is_logged_in());
}
