use diary_sync::api::{ApiClient, DocumentSource, PageQuery, TitleFilter};
use diary_sync::fetch::{collect_pages, fetch_tree};
use diary_sync::BlockKind;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn paragraph(id: &str, text: &str, has_children: bool) -> serde_json::Value {
    serde_json::json!({
        "object": "block",
        "id": id,
        "type": "paragraph",
        "has_children": has_children,
        "paragraph": {"rich_text": [{"type": "text", "plain_text": text}]}
    })
}

#[tokio::test]
async fn test_query_pages_follows_cursor() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/databases/db1/query"))
        .and(header("Authorization", "Bearer test_token"))
        .and(header("Notion-Version", "2022-06-28"))
        .and(body_partial_json(serde_json::json!({"start_cursor": "c2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "object": "list",
            "results": [{"object": "page", "id": "p2", "properties": {}}],
            "has_more": false,
            "next_cursor": null
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/databases/db1/query"))
        .and(body_partial_json(serde_json::json!({
            "page_size": 100,
            "filter": {"property": "タイトル", "title": {"contains": "3行日記"}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "object": "list",
            "results": [{"object": "page", "id": "p1", "properties": {}}],
            "has_more": true,
            "next_cursor": "c2"
        })))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();

    // Run blocking client in a blocking context
    let result = tokio::task::spawn_blocking(move || {
        let client = ApiClient::new("test_token".into(), Some(uri))
            .unwrap()
            .disable_throttle();
        let query = PageQuery {
            database_id: "db1".into(),
            title_filter: Some(TitleFilter {
                property: "タイトル".into(),
                contains: "3行日記".into(),
            }),
        };
        collect_pages(&client, &query)
    })
    .await
    .unwrap();

    let pages = result.unwrap();
    let ids: Vec<&str> = pages.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p2"]);
}

#[tokio::test]
async fn test_fetch_tree_over_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/blocks/page1/children"))
        .and(query_param("page_size", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "object": "list",
            "results": [paragraph("A", "parent", true), paragraph("B", "sibling", false)],
            "has_more": false,
            "next_cursor": null
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/blocks/A/children"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "object": "list",
            "results": [
                {"object": "block", "id": "A1", "type": "divider", "has_children": false, "divider": {}}
            ],
            "has_more": false,
            "next_cursor": null
        })))
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let result = tokio::task::spawn_blocking(move || {
        let client = ApiClient::new("test_token".into(), Some(uri))
            .unwrap()
            .disable_throttle();
        fetch_tree(&client, "page1")
    })
    .await
    .unwrap();

    let blocks = result.unwrap();
    let ids: Vec<&str> = blocks.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "A1", "B"]);
    assert_eq!(blocks[1].kind, BlockKind::Divider);
}

#[tokio::test]
async fn test_children_cursor_passed_as_query_param() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/blocks/page1/children"))
        .and(query_param("start_cursor", "next-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [paragraph("b2", "two", false)],
            "has_more": false,
            "next_cursor": null
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/blocks/page1/children"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [paragraph("b1", "one", false)],
            "has_more": true,
            "next_cursor": "next-1"
        })))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let result = tokio::task::spawn_blocking(move || {
        let client = ApiClient::new("test_token".into(), Some(uri))
            .unwrap()
            .disable_throttle();
        fetch_tree(&client, "page1")
    })
    .await
    .unwrap();

    let ids: Vec<String> = result.unwrap().into_iter().map(|b| b.id).collect();
    assert_eq!(ids, vec!["b1", "b2"]);
}

#[tokio::test]
async fn test_api_error_handling() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/pages/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string(
            r#"{"object":"error","status":404,"code":"object_not_found"}"#,
        ))
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let result = tokio::task::spawn_blocking(move || {
        let client = ApiClient::new("bad_token".into(), Some(uri))
            .unwrap()
            .disable_throttle();
        client.retrieve_page("missing")
    })
    .await
    .unwrap();

    match result {
        Err(diary_sync::Error::Api {
            status, endpoint, ..
        }) => {
            assert_eq!(status, 404);
            assert_eq!(endpoint, "/v1/pages/missing");
        }
        other => panic!("Expected API error, got {:?}", other.map(|p| p.id)),
    }
}

#[tokio::test]
async fn test_malformed_json_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/pages/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let result = tokio::task::spawn_blocking(move || {
        let client = ApiClient::new("t".into(), Some(uri))
            .unwrap()
            .disable_throttle();
        client.retrieve_page("p1")
    })
    .await
    .unwrap();

    assert!(matches!(result, Err(diary_sync::Error::Parse(_))));
}
