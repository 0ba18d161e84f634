use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use crate::catalog::{BookRecord, Catalog, PopularBooks};
use crate::constants::FOLIO_STATUS_HEADER;
use crate::gateway::create_router_with_state;
use crate::gateway::error::GatewayError;
use crate::gateway::handler::parse_usize_param;
use crate::gateway::state::HandlerState;
use crate::search::SearchError;
use crate::similarity::{PivotIndex, SimilarityIndex, SimilarityMatrix};
use crate::snapshot::Snapshot;

fn book(title: &str, author: &str) -> BookRecord {
    BookRecord::new(title, author, format!("http://covers/{}.jpg", title))
}

fn test_snapshot() -> Snapshot {
    let mut rows = vec![
        book("1984", "George Orwell").with_ratings(400, 8.5),
        book("Animal Farm", "George Orwell").with_ratings(300, 7.9),
        book("Emma", "Jane Austen"),
        book("Persuasion", "Jane Austen"),
    ];
    for i in 0..25 {
        rows.push(book(&format!("Atlas {:02}", i), "Cartographer"));
    }

    let pivot = PivotIndex::new(vec!["1984".to_string(), "Animal Farm".to_string()])
        .expect("unique titles");
    let matrix =
        SimilarityMatrix::from_rows(vec![vec![1.0, 0.8], vec![0.8, 1.0]]).expect("valid matrix");
    let index = SimilarityIndex::new(pivot, matrix).expect("sizes agree");

    let popular = PopularBooks::from_records(
        (1..=6)
            .map(|i| book(&format!("Popular {}", i), "Various").with_ratings(500, 9.0))
            .collect(),
    );

    Snapshot::from_parts(Catalog::new(rows), index, popular)
}

fn test_router() -> Router {
    let state = HandlerState::new(&test_snapshot(), 50);
    create_router_with_state(state, &[])
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, String, serde_json::Value) {
    let response: Response = router.oneshot(request).await.expect("request failed");
    let status = response.status();
    let folio_status = response
        .headers()
        .get(FOLIO_STATUS_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, folio_status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn data_titles(json: &serde_json::Value, field: &str) -> Vec<String> {
    json["data"]
        .as_array()
        .expect("data array")
        .iter()
        .map(|b| b[field].as_str().expect("title").to_string())
        .collect()
}

#[tokio::test]
async fn test_healthz() {
    let (status, folio_status, json) = send(test_router(), get("/healthz")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(folio_status, "ok");
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_ready_reports_snapshot() {
    let snapshot = test_snapshot();
    let router = create_router_with_state(HandlerState::from_snapshot(&snapshot), &[]);

    let (status, folio_status, json) = send(router, get("/ready")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(folio_status, "ready");
    assert_eq!(json["books"], 29);
    assert_eq!(json["pivot_titles"], 2);
    assert_eq!(json["popular"], 6);
    assert_eq!(json["fingerprint"], snapshot.fingerprint.to_hex());
}

#[tokio::test]
async fn test_popular_shape() {
    let (status, _, json) = send(test_router(), get("/api/popular")).await;

    assert_eq!(status, StatusCode::OK);
    let first = &json["data"][0];
    assert_eq!(first["book_name"], "Popular 1");
    assert_eq!(first["author"], "Various");
    assert_eq!(first["image"], "http://covers/Popular 1.jpg");
    assert_eq!(first["votes"], 500);
    assert_eq!(first["rating"], 9.0);
    assert_eq!(json["data"].as_array().map(Vec::len), Some(6));
}

#[tokio::test]
async fn test_books_sorted_by_title() {
    let (status, _, json) = send(test_router(), get("/api/books")).await;

    assert_eq!(status, StatusCode::OK);
    let titles = data_titles(&json, "Book-Title");
    assert_eq!(titles.len(), 29);
    assert_eq!(titles[0], "1984");
    assert_eq!(titles[1], "Animal Farm");
    assert_eq!(titles[2], "Atlas 00");
}

#[tokio::test]
async fn test_recommend_similar() {
    let request = post_json(
        "/api/recommend_books",
        serde_json::json!({"user_input": " 1984 "}),
    );
    let (status, folio_status, json) = send(test_router(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(folio_status, "similar");
    assert_eq!(json["source"], "similar");
    assert!(json.get("message").is_none());
    assert_eq!(
        json["data"],
        serde_json::json!([["Animal Farm", "George Orwell", "http://covers/Animal Farm.jpg"]])
    );
}

#[tokio::test]
async fn test_recommend_fallback_popular() {
    let request = post_json(
        "/api/recommend_books",
        serde_json::json!({"user_input": "Emma"}),
    );
    let (status, folio_status, json) = send(test_router(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(folio_status, "fallback_popular");
    assert_eq!(json["source"], "popular");
    assert_eq!(json["data"].as_array().map(Vec::len), Some(5));
    assert!(
        json["message"]
            .as_str()
            .is_some_and(|m| m.contains("\"Emma\""))
    );
}

#[tokio::test]
async fn test_recommend_fallback_author() {
    let request = post_json(
        "/api/recommend_books",
        serde_json::json!({"user_input": "Atlas 07"}),
    );
    let (status, folio_status, json) = send(test_router(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(folio_status, "fallback_author");
    assert_eq!(json["source"], "author");
    let rows = json["data"].as_array().expect("rows");
    assert_eq!(rows.len(), 5);
    assert!(rows.iter().all(|r| r[1] == "Cartographer"));
}

#[tokio::test]
async fn test_recommend_not_found() {
    let request = post_json(
        "/api/recommend_books",
        serde_json::json!({"user_input": "Nonexistent Book XYZ"}),
    );
    let (status, folio_status, json) = send(test_router(), request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(folio_status, "not_found");
    assert_eq!(json["data"], serde_json::json!([]));
    assert!(
        json["error"]
            .as_str()
            .is_some_and(|m| m.contains("Nonexistent Book XYZ"))
    );
}

#[tokio::test]
async fn test_recommend_rejects_blank_input() {
    for body in [
        serde_json::json!({"user_input": "   "}),
        serde_json::json!({}),
    ] {
        let request = post_json("/api/recommend_books", body);
        let (status, folio_status, json) = send(test_router(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(folio_status, "invalid_request");
        assert_eq!(json["code"], 400);
        assert!(
            json["error"]
                .as_str()
                .is_some_and(|m| m.contains("Please enter a book title."))
        );
        assert_eq!(json["error"], "Please enter a book title.");
    }
}

#[tokio::test]
async fn test_recommend_rejects_malformed_json() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/recommend_books")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"user_input\": "))
        .expect("request");
    let (status, folio_status, json) = send(test_router(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(folio_status, "invalid_request");
    assert_eq!(json["code"], 400);
}

#[tokio::test]
async fn test_search_books_by_letter_and_keyword() {
    let request = post_json(
        "/api/search_books",
        serde_json::json!({"letter": "A", "keyword": "farm"}),
    );
    let (status, folio_status, json) = send(test_router(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(folio_status, "ok");
    assert_eq!(data_titles(&json, "Book-Title"), vec!["Animal Farm"]);
}

#[tokio::test]
async fn test_search_books_author_keyword() {
    let request = post_json(
        "/api/search_books",
        serde_json::json!({"keyword": "austen", "letter": "all"}),
    );
    let (_, _, json) = send(test_router(), request).await;

    assert_eq!(data_titles(&json, "Book-Title"), vec!["Emma", "Persuasion"]);
}

#[tokio::test]
async fn test_search_books_rejects_multi_char_letter() {
    let request = post_json("/api/search_books", serde_json::json!({"letter": "AB"}));
    let (status, folio_status, json) = send(test_router(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(folio_status, "invalid_request");
    assert!(json["error"].as_str().is_some_and(|m| m.contains("AB")));
}

#[tokio::test]
async fn test_search_suggestions() {
    let (status, _, json) = send(test_router(), get("/api/search_suggestions?q=atlas")).await;
    assert_eq!(status, StatusCode::OK);
    let books = json["books"].as_array().expect("books");
    assert_eq!(books.len(), 10);
    assert_eq!(books[0]["title"], "Atlas 00");
    assert_eq!(books[0]["image"], "http://covers/Atlas 00.jpg");

    let (_, _, json) = send(test_router(), get("/api/search_suggestions?q=a")).await;
    assert_eq!(json["books"], serde_json::json!([]));

    let (_, _, json) = send(test_router(), get("/api/search_suggestions")).await;
    assert_eq!(json["books"], serde_json::json!([]));
}

#[tokio::test]
async fn test_load_more_pages_are_contiguous() {
    let (status, _, first) = send(
        test_router(),
        get("/api/load_more_books?offset=0&limit=20&letter=A"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["total_books"], 26);
    assert_eq!(first["has_more"], true);

    let (_, _, second) = send(
        test_router(),
        get("/api/load_more_books?offset=20&limit=20&letter=A"),
    )
    .await;
    assert_eq!(second["has_more"], false);

    let (_, _, whole) = send(
        test_router(),
        get("/api/load_more_books?offset=0&limit=40&letter=A"),
    )
    .await;

    let mut joined = data_titles(&first, "Book-Title");
    joined.extend(data_titles(&second, "Book-Title"));
    assert_eq!(joined, data_titles(&whole, "Book-Title"));
    assert_eq!(joined.len(), 26);
}

#[tokio::test]
async fn test_load_more_defaults() {
    let (status, _, json) = send(test_router(), get("/api/load_more_books")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().map(Vec::len), Some(20));
    assert_eq!(json["total_books"], 29);
    assert_eq!(json["has_more"], true);
}

#[tokio::test]
async fn test_list_rows_use_dataset_column_names() {
    for request in [
        get("/api/books"),
        get("/api/load_more_books?limit=1"),
        post_json("/api/search_books", serde_json::json!({"keyword": "1984"})),
    ] {
        let (status, _, json) = send(test_router(), request).await;

        assert_eq!(status, StatusCode::OK);
        let first = &json["data"][0];
        assert_eq!(first["Book-Title"], "1984");
        assert_eq!(first["Book-Author"], "George Orwell");
        assert_eq!(first["Image-URL-M"], "http://covers/1984.jpg");
        assert!(first.get("title").is_none());
    }
}

#[tokio::test]
async fn test_load_more_rejects_bad_params() {
    for uri in [
        "/api/load_more_books?offset=abc",
        "/api/load_more_books?limit=-1",
        "/api/load_more_books?limit=0",
        "/api/load_more_books?limit=51",
        "/api/load_more_books?letter=xyz",
    ] {
        let (status, folio_status, json) = send(test_router(), get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(folio_status, "invalid_request", "{}", uri);
        assert_eq!(json["code"], 400, "{}", uri);
    }
}

#[tokio::test]
async fn test_cors_layer_answers_preflight() {
    let state = HandlerState::new(&test_snapshot(), 50);
    let router = create_router_with_state(state, &["http://localhost:3000".to_string()]);

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/recommend_books")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .expect("request");
    let response = router.oneshot(request).await.expect("request failed");

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:3000")
    );
}

#[test]
fn test_parse_usize_param() {
    assert_eq!(parse_usize_param("offset", None, 7).ok(), Some(7));
    assert_eq!(parse_usize_param("offset", Some(" 12 "), 0).ok(), Some(12));
    assert!(matches!(
        parse_usize_param("offset", Some(""), 0),
        Err(GatewayError::InvalidRequest(_))
    ));
}

#[test]
fn test_gateway_error_display() {
    let err = GatewayError::from(SearchError::ZeroLimit);
    assert_eq!(
        err.to_string(),
        "invalid request: limit must be greater than zero"
    );

    let err = GatewayError::InvalidRequest("Please enter a book title.".to_string());
    assert_eq!(err.to_string(), "Please enter a book title.");
}
