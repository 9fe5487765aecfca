use cns_headlines::{ApiCredentials, NewsSources};
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn credentials() -> ApiCredentials {
    ApiCredentials {
        gnews_api_key: "gnews-key".to_owned(),
        newsdata_api_key: "newsdata-key".to_owned(),
    }
}

fn sources_for(server: &MockServer) -> NewsSources {
    let gnews = Url::parse(&format!("{}/gnews/search", server.uri())).unwrap();
    let newsdata = Url::parse(&format!("{}/newsdata/news", server.uri())).unwrap();
    NewsSources::with_endpoints(credentials(), gnews, newsdata).unwrap()
}

/// Headline comfortably above the 30-char substance threshold.
fn long_title(tag: &str, index: usize) -> String {
    format!("{} crypto headline {:02} with plenty of substance", tag, index)
}

fn titles_body(key: &str, titles: &[String]) -> serde_json::Value {
    let articles: Vec<_> = titles.iter().map(|title| json!({ "title": title })).collect();
    json!({ key: articles })
}

async fn mount_gnews(server: &MockServer, body: serde_json::Value, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/gnews/search"))
        .and(query_param("q", "cryptocurrency"))
        .and(query_param("lang", "en"))
        .and(query_param("country", "us"))
        .and(query_param("token", "gnews-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_newsdata(server: &MockServer, body: serde_json::Value, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/newsdata/news"))
        .and(query_param("apikey", "newsdata-key"))
        .and(query_param("q", "cryptocurrency"))
        .and(query_param("language", "en"))
        .and(query_param("country", "us"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn primary_satisfying_the_limit_skips_the_secondary() {
    let server = MockServer::start().await;

    let titles: Vec<_> = (0..40).map(|it| long_title("gnews", it)).collect();
    mount_gnews(&server, titles_body("articles", &titles), 1).await;
    mount_newsdata(&server, titles_body("results", &[]), 0).await;

    let headlines = sources_for(&server).fetch_live("cryptocurrency", 30).await;

    assert_eq!(headlines.len(), 30);
    assert_eq!(headlines, titles[..30]);
}

#[tokio::test]
async fn secondary_fills_the_quota_preserving_arrival_order() {
    let server = MockServer::start().await;

    let primary: Vec<_> = (0..5).map(|it| long_title("gnews", it)).collect();
    let secondary: Vec<_> = (0..10).map(|it| long_title("newsdata", it)).collect();
    mount_gnews(&server, titles_body("articles", &primary), 1).await;
    mount_newsdata(&server, titles_body("results", &secondary), 1).await;

    let headlines = sources_for(&server).fetch_live("cryptocurrency", 30).await;

    assert_eq!(headlines.len(), 15);
    assert_eq!(headlines[..5], primary[..]);
    assert_eq!(headlines[5..], secondary[..]);
}

#[tokio::test]
async fn short_and_missing_titles_are_skipped() {
    let server = MockServer::start().await;

    let substantive = long_title("gnews", 0);
    let body = json!({
        "articles": [
            { "title": "BTC up" },
            { "title": null },
            { "url": "https://example.com/no-title" },
            { "title": substantive.clone() },
            // exactly 30 chars, the filter keeps strictly longer ones only
            { "title": "123456789012345678901234567890" },
        ]
    });
    mount_gnews(&server, body, 1).await;
    mount_newsdata(&server, titles_body("results", &[]), 1).await;

    let headlines = sources_for(&server).fetch_live("cryptocurrency", 30).await;

    assert_eq!(headlines, vec![substantive]);
    assert!(headlines.iter().all(|it| it.chars().count() > 30));
}

#[tokio::test]
async fn failing_sources_degrade_to_an_empty_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gnews/search"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/newsdata/news"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let headlines = sources_for(&server).fetch_live("cryptocurrency", 30).await;

    assert!(headlines.is_empty());
}

#[tokio::test]
async fn malformed_body_counts_as_that_source_failing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gnews/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("definitely not json"))
        .expect(1)
        .mount(&server)
        .await;
    let secondary: Vec<_> = (0..3).map(|it| long_title("newsdata", it)).collect();
    mount_newsdata(&server, titles_body("results", &secondary), 1).await;

    let headlines = sources_for(&server).fetch_live("cryptocurrency", 30).await;

    assert_eq!(headlines, secondary);
}

#[tokio::test]
async fn zero_limit_queries_no_source_at_all() {
    let server = MockServer::start().await;

    mount_gnews(&server, titles_body("articles", &[]), 0).await;
    mount_newsdata(&server, titles_body("results", &[]), 0).await;

    let headlines = sources_for(&server).fetch_live("cryptocurrency", 0).await;

    assert!(headlines.is_empty());
}
