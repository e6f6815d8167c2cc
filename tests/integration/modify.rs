use super::common::*;
use serde_json::{json, Value};
use sfconnect_session::{CancellationToken, DataModificationType, ErrorKind, SObjectRecord};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Answers a collections POST with one successful result per submitted record.
struct EchoIds;

impl Respond for EchoIds {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
        let results: Vec<Value> = body["records"]
            .as_array()
            .map(|records| {
                records
                    .iter()
                    .map(|record| {
                        json!({
                            "id": format!("001{}", record["Name"].as_str().unwrap_or_default()),
                            "success": true,
                            "errors": []
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();
        ResponseTemplate::new(200).set_body_json(results)
    }
}

fn accounts(count: usize) -> Vec<SObjectRecord> {
    (0..count)
        .map(|i| SObjectRecord::new("Account").with_field("Name", format!("{:05}", i)))
        .collect()
}

#[tokio::test]
async fn test_insert_is_chunked_by_200() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(collections_path()))
        .and(header("Authorization", "Bearer 00Dxx!tok"))
        .and(body_partial_json(json!({"allOrNone": false})))
        .respond_with(EchoIds)
        .expect(3)
        .mount(&server)
        .await;

    let client = logged_in_client(&server, options(&server)).await;
    let results = client
        .modify_data(
            &accounts(401),
            DataModificationType::Insert,
            false,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(results.len(), 401);
    assert!(results.iter().all(|r| r.success));
    assert_eq!(results[0].id.as_deref(), Some("00100000"));
    assert_eq!(results[400].id.as_deref(), Some("00100400"));

    let requests = server.received_requests().await.unwrap();
    let chunk_sizes: Vec<usize> = requests
        .iter()
        .filter(|r| r.url.path() == collections_path())
        .map(|r| {
            let body: Value = serde_json::from_slice(&r.body).unwrap();
            body["records"].as_array().unwrap().len()
        })
        .collect();
    assert_eq!(chunk_sizes, vec![200, 200, 1]);
}

#[tokio::test]
async fn test_update_uses_configured_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path(collections_path()))
        .and(body_partial_json(json!({"allOrNone": true})))
        .respond_with(EchoIds)
        .expect(3)
        .mount(&server)
        .await;

    let options = options(&server).with_all_or_none(true).with_batch_size(10);
    let client = logged_in_client(&server, options).await;
    let records: Vec<SObjectRecord> = accounts(25)
        .into_iter()
        .enumerate()
        .map(|(i, record)| record.with_id(format!("001{:05}", i)))
        .collect();

    let results = client
        .modify_data_default(
            &records,
            DataModificationType::Update,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(results.len(), 25);
}

#[tokio::test]
async fn test_delete_sends_ids_in_query() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(collections_path()))
        .and(query_param("ids", "001A,001B"))
        .and(query_param("allOrNone", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "001A", "success": true, "errors": []},
            {"id": "001B", "success": false, "errors": [
                {"statusCode": "ENTITY_IS_DELETED", "message": "entity is deleted", "fields": []}
            ]}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server, options(&server)).await;
    let records = vec![json!({"Id": "001A"}), json!({"Id": "001B"})];
    let results = client
        .modify_data(
            &records,
            DataModificationType::Delete,
            false,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert!(results[0].success);
    assert!(!results[1].success);
    assert_eq!(results[1].errors[0].status_code, "ENTITY_IS_DELETED");
}

#[tokio::test]
async fn test_failed_chunk_stops_the_batch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(collections_path()))
        .respond_with(EchoIds)
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(collections_path()))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!([
            {"message": "Session expired or invalid", "errorCode": "INVALID_SESSION_ID"}
        ])))
        .mount(&server)
        .await;

    let client = logged_in_client(&server, options(&server).with_batch_size(2)).await;
    let err = client
        .modify_data(
            &accounts(6),
            DataModificationType::Insert,
            false,
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("INVALID_SESSION_ID"));

    let posts = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == collections_path())
        .count();
    assert_eq!(posts, 2);
}

#[tokio::test]
async fn test_empty_batch_sends_nothing() {
    let server = MockServer::start().await;
    let client = logged_in_client(&server, options(&server)).await;

    let results = client
        .modify_data::<SObjectRecord>(
            &[],
            DataModificationType::Insert,
            false,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert!(results.is_empty());
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_full_session_lifecycle() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(query_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalSize": 2,
            "done": true,
            "records": [
                {"attributes": {"type": "Account"}, "Id": "001A", "Name": "Acme"},
                {"attributes": {"type": "Account"}, "Id": "001B", "Name": "Globex"}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(collections_path()))
        .and(query_param("ids", "001A,001B"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "001A", "success": true, "errors": []},
            {"id": "001B", "success": true, "errors": []}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/oauth2/revoke"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server, options(&server)).await;
    let cancel = CancellationToken::new();

    let accounts: Vec<SObjectRecord> = client.query_data("SELECT Id FROM Account", &cancel).await.unwrap();
    let results = client
        .modify_data(&accounts, DataModificationType::Delete, false, &cancel)
        .await
        .unwrap();
    client.log_out(&cancel).await.unwrap();

    assert_eq!(results.len(), 2);
    assert!(matches!(
        "merge".parse::<DataModificationType>().unwrap_err().kind,
        ErrorKind::UnsupportedOperation(_)
    ));
}
