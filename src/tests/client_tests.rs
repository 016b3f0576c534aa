// src/tests/client_tests.rs
use crate::errors::ExportError;
use crate::export::paginate;
use crate::listings::Row;
use crate::reverb::{PageSource, ReverbClient};
use crate::tests::utils::StubServer;
use std::net::TcpListener;
use std::time::Duration;

fn client() -> ReverbClient {
    ReverbClient::new("test-token", Duration::from_secs(5)).unwrap()
}

#[test]
fn sends_hal_headers_and_decodes_page() {
    let server = StubServer::start(vec![(
        200,
        r#"{"listings":[{"sku":"A1"}],"_links":{"next":{"href":"/api/my/listings?page=2"}}}"#
            .to_string(),
    )]);
    let base = server.base_url.clone();
    let url = format!("{base}/api/my/listings?state=all");

    let page = client().fetch_page(&url).unwrap();
    let requests = server.finish();

    assert_eq!(page.listings.len(), 1);
    assert_eq!(
        page.next,
        Some(format!("{base}/api/my/listings?page=2"))
    );

    let request = requests[0].to_ascii_lowercase();
    assert!(request.starts_with("get /api/my/listings?state=all http/1.1"));
    assert!(request.contains("content-type: application/hal+json"));
    assert!(request.contains("accept: application/hal+json"));
    assert!(request.contains("accept-version: 3.0"));
    assert!(request.contains("authorization: bearer test-token"));
}

#[test]
fn non_success_status_is_http_error_with_body() {
    let server = StubServer::start(vec![(401, r#"{"message":"unauthorized"}"#.to_string())]);
    let url = format!("{}/api/my/listings", server.base_url);

    let err = client().fetch_page(&url).unwrap_err();
    server.finish();

    match err {
        ExportError::Http { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, r#"{"message":"unauthorized"}"#);
        }
        other => panic!("expected HTTP error, got {other:?}"),
    }
}

#[test]
fn html_body_is_decode_error() {
    let server = StubServer::start(vec![(200, "<html>maintenance</html>".to_string())]);
    let url = format!("{}/api/my/listings", server.base_url);

    let err = client().fetch_page(&url).unwrap_err();
    server.finish();

    assert!(matches!(err, ExportError::Decode(_)), "{err:?}");
}

#[test]
fn closed_port_is_transport_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let err = client()
        .fetch_page(&format!("http://127.0.0.1:{port}/api/my/listings"))
        .unwrap_err();

    assert!(matches!(err, ExportError::Transport(_)), "{err:?}");
}

#[test]
fn live_client_follows_relative_links_to_the_end() {
    let server = StubServer::start(vec![
        (
            200,
            r#"{"listings":[{"sku":"a"},{"sku":"b"}],"_links":{"next":{"href":"/page2"}}}"#
                .to_string(),
        ),
        (200, r#"{"listings":[{"sku":"c"}],"_links":{}}"#.to_string()),
    ]);
    let start = format!("{}/page1", server.base_url);
    let mut rows: Vec<Row> = Vec::new();

    let summary = paginate(&mut client(), &mut rows, &start, Duration::ZERO).unwrap();
    let requests = server.finish();

    assert_eq!(summary.pages, 2);
    assert_eq!(summary.rows, 3);
    assert!(requests[0].starts_with("GET /page1 "));
    assert!(requests[1].starts_with("GET /page2 "));
}
