use mockito::Matcher;
use newsdigest::models::Query;
use newsdigest::news::newsdata::NewsdataClient;
use newsdigest::news::{FetchError, NewsSource};

fn query(categories: Vec<&str>) -> Query {
    Query::new(
        "climate policy",
        categories.into_iter().map(str::to_string),
        "en",
        10,
    )
    .expect("valid query")
}

#[tokio::test]
async fn test_fetch_sends_filters_and_decodes() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/api/1/latest")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("apikey".into(), "test-key".into()),
            Matcher::UrlEncoded("q".into(), "climate policy".into()),
            Matcher::UrlEncoded("category".into(), "business,technology".into()),
            Matcher::UrlEncoded("language".into(), "en".into()),
            Matcher::UrlEncoded("size".into(), "10".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "status": "success",
                "totalResults": 2,
                "results": [
                    {
                        "title": "Carbon tax passes",
                        "link": "https://example.com/carbon",
                        "description": "Lawmakers agree.",
                        "content": "Full text of the carbon tax story.",
                        "source_name": "Example Times"
                    },
                    {
                        "title": "Emissions targets",
                        "description": "Targets revised."
                    }
                ],
                "nextPage": null
            }"#,
        )
        .create_async()
        .await;

    let client = NewsdataClient::new(format!("{}/api/1/latest", server.url()), "test-key")
        .expect("client");
    let articles = client
        .fetch(&query(vec!["business", "technology"]))
        .await
        .expect("fetch");

    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].title, "Carbon tax passes");
    assert_eq!(articles[0].source_name, "Example Times");
    assert_eq!(articles[0].link.as_deref(), Some("https://example.com/carbon"));
    assert_eq!(articles[1].source_name, "Unknown Source");
    assert_eq!(articles[1].content, None);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_omits_empty_category_filter() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/api/1/latest")
        .match_query(Matcher::Regex(
            "^apikey=k&q=climate(\\+|%20)policy&language=en&size=10$".into(),
        ))
        .with_status(200)
        .with_body(r#"{"status": "success", "results": []}"#)
        .create_async()
        .await;

    let client = NewsdataClient::new(format!("{}/api/1/latest", server.url()), "k")
        .expect("client");
    let articles = client.fetch(&query(vec![])).await.expect("fetch");

    assert!(articles.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_non_success_status() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/api/1/latest")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "error", "results": {"message": "API key invalid"}}"#)
        .create_async()
        .await;

    let client = NewsdataClient::new(format!("{}/api/1/latest", server.url()), "bad-key")
        .expect("client");
    let err = client
        .fetch(&query(vec!["business"]))
        .await
        .expect_err("401 must fail");

    match err {
        FetchError::Status { status, body } => {
            assert_eq!(status.as_u16(), 401);
            assert!(body.contains("API key invalid"));
        }
        other => panic!("expected status error, got {:?}", other),
    }

    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_error_envelope_with_ok_status() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/api/1/latest")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"status": "error", "results": {"message": "Rate limit exceeded"}}"#)
        .create_async()
        .await;

    let client = NewsdataClient::new(format!("{}/api/1/latest", server.url()), "k")
        .expect("client");
    let err = client.fetch(&query(vec!["science"])).await.expect_err("must fail");

    assert!(matches!(err, FetchError::Api(ref m) if m == "Rate limit exceeded"));
}

#[tokio::test]
async fn test_fetch_transport_failure() {
    // nothing listens on the discard port
    let client = NewsdataClient::with_timeout("http://127.0.0.1:9/api/1/latest", "k", Some(2))
        .expect("client");
    let err = client.fetch(&query(vec![])).await.expect_err("must fail");

    assert!(matches!(err, FetchError::Transport(_)));
}
