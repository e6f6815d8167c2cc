use sfconnect::{ConnectorOptions, SessionClient, SfHttpClient};
use sfconnect_session::CancellationToken;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_VERSION: &str = "62.0";
pub const USERNAME: &str = "integration@example.com";
pub const PASSWORD: &str = "s3cret&TOKEN";

pub fn login_path() -> String {
    format!("/services/Soap/c/{}/", API_VERSION)
}

pub fn query_path() -> String {
    format!("/services/data/v{}/query/", API_VERSION)
}

pub fn collections_path() -> String {
    format!("/services/data/v{}/composite/sobjects", API_VERSION)
}

/// SOAP login response naming the mock server as the session endpoint.
pub fn login_body(server: &MockServer, token: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns="urn:enterprise.soap.sforce.com"><soapenv:Body><loginResponse><result><passwordExpired>false</passwordExpired><serverUrl>{}/services/Soap/c/{}/00Dxx0000001gPL</serverUrl><sessionId>{}</sessionId><userId>005xx000001SvzgAAC</userId></result></loginResponse></soapenv:Body></soapenv:Envelope>"#,
        server.uri(),
        API_VERSION,
        token
    )
}

pub fn options(server: &MockServer) -> ConnectorOptions {
    ConnectorOptions::new(USERNAME, PASSWORD)
        .with_api_version(API_VERSION)
        .with_login_url(server.uri())
}

/// A client with its own connection pool.
pub fn client(options: ConnectorOptions) -> SessionClient {
    let transport = SfHttpClient::default_client().expect("client should build");
    SessionClient::with_transport(options, transport)
}

pub async fn mount_login(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path(login_path()))
        .and(header("SOAPAction", "\"\""))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(login_body(server, token))
                .insert_header("Content-Type", "text/xml; charset=utf-8"),
        )
        .mount(server)
        .await;
}

/// Mount a login and return a client that has logged in with token `tok`.
pub async fn logged_in_client(server: &MockServer, options: ConnectorOptions) -> SessionClient {
    mount_login(server, "00Dxx!tok").await;
    let client = client(options);
    client
        .log_in(&CancellationToken::new())
        .await
        .expect("login should succeed");
    client
}
