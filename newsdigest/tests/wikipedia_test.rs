use mockito::Matcher;
use newsdigest::lookup::wikipedia::WikipediaClient;
use newsdigest::lookup::{LookupOutcome, TopicLookup};

fn search_body(titles: &[&str]) -> String {
    let hits: Vec<serde_json::Value> = titles
        .iter()
        .map(|t| serde_json::json!({ "ns": 0, "title": t, "snippet": "" }))
        .collect();
    serde_json::json!({ "batchcomplete": "", "query": { "search": hits } }).to_string()
}

#[tokio::test]
async fn test_lookup_found() {
    let mut server = mockito::Server::new_async().await;

    let search = server
        .mock("GET", "/w/api.php")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("action".into(), "query".into()),
            Matcher::UrlEncoded("list".into(), "search".into()),
            Matcher::UrlEncoded("srsearch".into(), "climate change".into()),
            Matcher::UrlEncoded("srlimit".into(), "6".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(search_body(&["Climate change", "Climate change mitigation"]))
        .create_async()
        .await;

    let summary = server
        .mock("GET", "/api/rest_v1/page/summary/Climate_change")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "type": "standard",
                "title": "Climate change",
                "extract": "Present-day climate change includes global warming.",
                "content_urls": {"desktop": {"page": "https://en.wikipedia.org/wiki/Climate_change"}}
            }"#,
        )
        .create_async()
        .await;

    let client = WikipediaClient::new(&server.url(), 5, None).expect("client");
    let outcome = client.lookup("climate change").await.expect("lookup");

    assert_eq!(
        outcome,
        LookupOutcome::Found {
            title: "Climate change".into(),
            summary: "Present-day climate change includes global warming.".into(),
            url: Some("https://en.wikipedia.org/wiki/Climate_change".into()),
        }
    );

    search.assert_async().await;
    summary.assert_async().await;
}

#[tokio::test]
async fn test_lookup_ambiguous_caps_candidates() {
    let mut server = mockito::Server::new_async().await;

    let _search = server
        .mock("GET", "/w/api.php")
        .match_query(Matcher::UrlEncoded("srsearch".into(), "mercury".into()))
        .with_status(200)
        .with_body(search_body(&[
            "Mercury",
            "Mercury (planet)",
            "Mercury (element)",
            "Freddie Mercury",
            "Mercury (mythology)",
            "Mercury Records",
            "Project Mercury",
        ]))
        .create_async()
        .await;

    let _summary = server
        .mock("GET", "/api/rest_v1/page/summary/Mercury")
        .with_status(200)
        .with_body(r#"{"type": "disambiguation", "title": "Mercury", "extract": "Mercury may refer to:"}"#)
        .create_async()
        .await;

    let client = WikipediaClient::new(&server.url(), 5, None).expect("client");
    let outcome = client.lookup("mercury").await.expect("lookup");

    match outcome {
        LookupOutcome::Ambiguous { candidates } => {
            assert_eq!(
                candidates,
                vec![
                    "Mercury (planet)",
                    "Mercury (element)",
                    "Freddie Mercury",
                    "Mercury (mythology)",
                    "Mercury Records",
                ]
            );
        }
        other => panic!("expected ambiguous, got {:?}", other),
    }
}

#[tokio::test]
async fn test_lone_disambiguation_page_is_not_found() {
    let mut server = mockito::Server::new_async().await;

    let _search = server
        .mock("GET", "/w/api.php")
        .match_query(Matcher::UrlEncoded("srsearch".into(), "mercury".into()))
        .with_status(200)
        .with_body(search_body(&["Mercury"]))
        .create_async()
        .await;

    let _summary = server
        .mock("GET", "/api/rest_v1/page/summary/Mercury")
        .with_status(200)
        .with_body(r#"{"type": "disambiguation", "title": "Mercury", "extract": "Mercury may refer to:"}"#)
        .create_async()
        .await;

    let client = WikipediaClient::new(&server.url(), 5, None).expect("client");
    assert_eq!(
        client.lookup("mercury").await.expect("lookup"),
        LookupOutcome::NotFound
    );
}

#[tokio::test]
async fn test_lookup_no_search_hits() {
    let mut server = mockito::Server::new_async().await;

    let _search = server
        .mock("GET", "/w/api.php")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(search_body(&[]))
        .create_async()
        .await;

    let client = WikipediaClient::new(&server.url(), 5, None).expect("client");
    let outcome = client.lookup("qwxzv unknown").await.expect("lookup");

    assert_eq!(outcome, LookupOutcome::NotFound);
}

#[tokio::test]
async fn test_lookup_missing_page() {
    let mut server = mockito::Server::new_async().await;

    let _search = server
        .mock("GET", "/w/api.php")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(search_body(&["Ghost"]))
        .create_async()
        .await;

    let _summary = server
        .mock("GET", "/api/rest_v1/page/summary/Ghost")
        .with_status(404)
        .create_async()
        .await;

    let client = WikipediaClient::new(&server.url(), 5, None).expect("client");
    assert_eq!(
        client.lookup("ghost").await.expect("lookup"),
        LookupOutcome::NotFound
    );
}

#[tokio::test]
async fn test_lookup_search_server_error() {
    let mut server = mockito::Server::new_async().await;

    let _search = server
        .mock("GET", "/w/api.php")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let client = WikipediaClient::new(&server.url(), 5, None).expect("client");
    let err = client.lookup("anything").await.expect_err("500 must fail");

    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_blank_query_is_not_found() {
    let client = WikipediaClient::new("http://127.0.0.1:9", 5, None).expect("client");
    assert_eq!(client.lookup("   ").await.expect("lookup"), LookupOutcome::NotFound);
}
