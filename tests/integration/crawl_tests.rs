//! Integration tests for the crawler
//!
//! These tests use wiremock to stand up both the crawled site and the
//! Ollama API, and run full crawls end-to-end into a temporary CSV file.

use sitesum::config::Config;
use sitesum::crawler::run_crawl;
use sitesum::output::{read_records, PageRecord};
use sitesum::state::CrawlState;
use sitesum::summarizer::{NO_MEANINGFUL_CONTENT, SUMMARY_FAILED};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FILLER: &str = "This paragraph has more than enough words to be worth summarizing.";

/// Creates a test configuration pointing at the mock site and mock Ollama
fn create_test_config(start_url: &str, ollama: &str, output: &Path, max_pages: u32) -> Config {
    let mut config = Config::default();
    config.crawl.start_url = start_url.to_string();
    config.crawl.max_pages = max_pages;
    config.crawl.output_path = output.display().to_string();
    config.crawl.politeness_delay_ms = 0;
    config.fetcher.timeout_secs = 5;
    config.summarizer.endpoint = ollama.to_string();
    config.summarizer.timeout_secs = 5;
    config
}

/// Builds a page with a title, one paragraph of filler and the given links
fn page(title: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body><p>{} {}</p>{}</body></html>",
        title, title, FILLER, anchors
    )
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Starts an Ollama mock that answers every generation with `summary`
async fn start_ollama(summary: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "model": "llama3.2:1b",
            "response": summary,
            "done": true
        })))
        .mount(&server)
        .await;
    server
}

fn output_in(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("results.csv")
}

/// Paths the site was asked for, in arrival order
async fn requested_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .expect("request recording is enabled")
        .into_iter()
        .map(|request| request.url.path().to_string())
        .collect()
}

fn record_for<'a>(records: &'a [PageRecord], site: &MockServer, route: &str) -> &'a PageRecord {
    let url = format!("{}{}", site.uri(), route);
    records
        .iter()
        .find(|record| record.url == url)
        .unwrap_or_else(|| panic!("no record for {}", url))
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let site = MockServer::start().await;
    let ollama = start_ollama("A page about testing.").await;
    let temp_dir = TempDir::new().unwrap();
    let output = output_in(&temp_dir);

    mount_page(&site, "/", page("Home", &["/page1", "/page2"])).await;
    mount_page(&site, "/page1", page("Page One", &["/"])).await;
    mount_page(&site, "/page2", page("Page Two", &["/page1"])).await;

    let config = create_test_config(&format!("{}/", site.uri()), &ollama.uri(), &output, 10);
    let report = run_crawl(config, None).await.unwrap();

    assert_eq!(report.outcome, CrawlState::Completed);
    assert_eq!(report.pages_visited, 3);
    assert_eq!(report.records_written, 3);
    assert_eq!(report.fetch_failures, 0);
    assert_eq!(report.output, output.display().to_string());

    let records = read_records(&output).unwrap();
    assert_eq!(records.len(), 3);

    let home = record_for(&records, &site, "/");
    assert_eq!(home.title, "Home");
    assert_eq!(home.summary, "A page about testing.");
    assert!(home.content.contains(FILLER));
    assert_eq!(
        home.links,
        format!("{0}/page1, {0}/page2", site.uri())
    );
}

#[tokio::test]
async fn test_output_header_row() {
    let site = MockServer::start().await;
    let ollama = start_ollama("Summary.").await;
    let temp_dir = TempDir::new().unwrap();
    let output = output_in(&temp_dir);

    mount_page(&site, "/", page("Home", &[])).await;

    let config = create_test_config(&site.uri(), &ollama.uri(), &output, 5);
    run_crawl(config, None).await.unwrap();

    let contents = std::fs::read_to_string(&output).unwrap();
    let first_line = contents.lines().next().unwrap();
    assert_eq!(first_line, "URL,Title,Summary,Content,Links");
}

#[tokio::test]
async fn test_breadth_first_order() {
    let site = MockServer::start().await;
    let ollama = start_ollama("Summary.").await;
    let temp_dir = TempDir::new().unwrap();
    let output = output_in(&temp_dir);

    // A's child is discovered before B and C are visited but must wait
    mount_page(&site, "/", page("Seed", &["/a", "/b", "/c"])).await;
    mount_page(&site, "/a", page("A", &["/a/deep"])).await;
    mount_page(&site, "/b", page("B", &[])).await;
    mount_page(&site, "/c", page("C", &[])).await;
    mount_page(&site, "/a/deep", page("Deep", &[])).await;

    let config = create_test_config(&format!("{}/", site.uri()), &ollama.uri(), &output, 10);
    run_crawl(config, None).await.unwrap();

    assert_eq!(
        requested_paths(&site).await,
        vec!["/", "/a", "/b", "/c", "/a/deep"]
    );

    let records = read_records(&output).unwrap();
    let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Seed", "A", "B", "C", "Deep"]);
}

#[tokio::test]
async fn test_no_duplicate_visits() {
    let site = MockServer::start().await;
    let ollama = start_ollama("Summary.").await;
    let temp_dir = TempDir::new().unwrap();
    let output = output_in(&temp_dir);

    // Cycles, repeated links, and a fragment-only variant of the same page
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page(
            "Home",
            &["/loop", "/loop", "/loop#section", "/"],
        )))
        .expect(1)
        .mount(&site)
        .await;
    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page("Loop", &["/", "/loop"])))
        .expect(1)
        .mount(&site)
        .await;

    let config = create_test_config(&format!("{}/", site.uri()), &ollama.uri(), &output, 10);
    let report = run_crawl(config, None).await.unwrap();

    assert_eq!(report.outcome, CrawlState::Completed);
    assert_eq!(report.pages_visited, 2);
    assert_eq!(read_records(&output).unwrap().len(), 2);
}

#[tokio::test]
async fn test_off_domain_links_not_followed() {
    let site = MockServer::start().await;
    let ollama = start_ollama("Summary.").await;
    let temp_dir = TempDir::new().unwrap();
    let output = output_in(&temp_dir);

    let port = url::Url::parse(&site.uri()).unwrap().port().unwrap();
    // Same server, but "localhost" is a different domain from "127.0.0.1"
    let other_host = format!("http://localhost:{}/elsewhere", port);
    let other_port = "http://127.0.0.1:1/unreachable".to_string();

    mount_page(
        &site,
        "/",
        page(
            "Home",
            &[
                "/inside",
                other_host.as_str(),
                other_port.as_str(),
                "mailto:someone@example.com",
                "javascript:void(0)",
            ],
        ),
    )
    .await;
    mount_page(&site, "/inside", page("Inside", &[])).await;
    Mock::given(method("GET"))
        .and(path("/elsewhere"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page("Elsewhere", &[])))
        .expect(0)
        .mount(&site)
        .await;

    let config = create_test_config(&format!("{}/", site.uri()), &ollama.uri(), &output, 10);
    let report = run_crawl(config, None).await.unwrap();

    assert_eq!(report.pages_visited, 2);
    assert_eq!(report.fetch_failures, 0);

    // Off-domain links are neither crawled nor listed in the record
    let records = read_records(&output).unwrap();
    let home = record_for(&records, &site, "/");
    assert_eq!(home.links, format!("{}/inside", site.uri()));
}

#[tokio::test]
async fn test_page_budget_respected() {
    let site = MockServer::start().await;
    let ollama = start_ollama("Summary.").await;
    let temp_dir = TempDir::new().unwrap();
    let output = output_in(&temp_dir);

    mount_page(&site, "/", page("Home", &["/1", "/2", "/3", "/4", "/5"])).await;
    for i in 1..=5 {
        mount_page(&site, &format!("/{}", i), page(&format!("Page {}", i), &[])).await;
    }

    let config = create_test_config(&format!("{}/", site.uri()), &ollama.uri(), &output, 3);
    let report = run_crawl(config, None).await.unwrap();

    assert_eq!(report.outcome, CrawlState::BudgetExhausted);
    assert_eq!(report.pages_visited, 3);
    assert_eq!(requested_paths(&site).await, vec!["/", "/1", "/2"]);
    assert_eq!(read_records(&output).unwrap().len(), 3);
}

#[tokio::test]
async fn test_http_error_skips_page() {
    let site = MockServer::start().await;
    let ollama = start_ollama("Summary.").await;
    let temp_dir = TempDir::new().unwrap();
    let output = output_in(&temp_dir);

    mount_page(&site, "/", page("Home", &["/broken", "/missing", "/ok"])).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string(page("Oops", &["/hidden"])))
        .mount(&site)
        .await;
    mount_page(&site, "/ok", page("Ok", &[])).await;
    Mock::given(method("GET"))
        .and(path("/hidden"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page("Hidden", &[])))
        .expect(0)
        .mount(&site)
        .await;

    let config = create_test_config(&format!("{}/", site.uri()), &ollama.uri(), &output, 10);
    let report = run_crawl(config, None).await.unwrap();

    // Unmatched /missing is a 404 from wiremock
    assert_eq!(report.outcome, CrawlState::Completed);
    assert_eq!(report.pages_visited, 4);
    assert_eq!(report.fetch_failures, 2);
    assert_eq!(report.records_written, 2);

    let records = read_records(&output).unwrap();
    let urls: Vec<&str> = records.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![format!("{}/", site.uri()), format!("{}/ok", site.uri())]
    );
}

#[tokio::test]
async fn test_short_page_not_sent_to_summarizer() {
    let site = MockServer::start().await;
    let ollama = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let output = output_in(&temp_dir);

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": "should not be used"
        })))
        .expect(0)
        .mount(&ollama)
        .await;

    mount_page(
        &site,
        "/",
        "<html><head></head><body><p>Tiny</p></body></html>".to_string(),
    )
    .await;

    let config = create_test_config(&site.uri(), &ollama.uri(), &output, 5);
    run_crawl(config, None).await.unwrap();

    let records = read_records(&output).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "No title");
    assert_eq!(records[0].summary, NO_MEANINGFUL_CONTENT);
    assert_eq!(records[0].content, "Tiny");
    assert_eq!(records[0].links, "");
}

#[tokio::test]
async fn test_summarizer_request_and_failure() {
    let site = MockServer::start().await;
    let ollama = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let output = output_in(&temp_dir);

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(serde_json::json!({
            "model": "mistral",
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .expect(2)
        .mount(&ollama)
        .await;

    mount_page(&site, "/", page("Home", &["/next"])).await;
    mount_page(&site, "/next", page("Next", &[])).await;

    let mut config = create_test_config(&format!("{}/", site.uri()), &ollama.uri(), &output, 5);
    config.summarizer.model = sitesum::config::SummaryModel::Mistral;
    let report = run_crawl(config, None).await.unwrap();

    // Summarizer failures degrade the record, they do not stop the crawl
    assert_eq!(report.outcome, CrawlState::Completed);
    assert_eq!(report.records_written, 2);

    let records = read_records(&output).unwrap();
    assert!(records.iter().all(|r| r.summary == SUMMARY_FAILED));
}

#[tokio::test]
async fn test_multiline_summary_collapsed() {
    let site = MockServer::start().await;
    let ollama = start_ollama("First line.\n\nSecond line.\n").await;
    let temp_dir = TempDir::new().unwrap();
    let output = output_in(&temp_dir);

    mount_page(&site, "/", page("Home", &[])).await;

    let config = create_test_config(&site.uri(), &ollama.uri(), &output, 5);
    run_crawl(config, None).await.unwrap();

    let records = read_records(&output).unwrap();
    assert_eq!(records[0].summary, "First line. Second line.");
}

#[tokio::test]
async fn test_links_field_capped_at_ten() {
    let site = MockServer::start().await;
    let ollama = start_ollama("Summary.").await;
    let temp_dir = TempDir::new().unwrap();
    let output = output_in(&temp_dir);

    // 15 same-domain links; the off-domain one is not counted
    let mut hrefs: Vec<String> = (0..15).map(|i| format!("/p{}", i)).collect();
    hrefs.insert(3, "https://external.invalid/x".to_string());
    let href_refs: Vec<&str> = hrefs.iter().map(String::as_str).collect();
    mount_page(&site, "/", page("Home", &href_refs)).await;

    let config = create_test_config(&site.uri(), &ollama.uri(), &output, 1);
    let report = run_crawl(config, None).await.unwrap();

    assert_eq!(report.pages_visited, 1);

    let records = read_records(&output).unwrap();
    let links = &records[0].links;
    let base = site.uri();
    assert!(links.starts_with(&format!("{0}/p0, {0}/p1, {0}/p2, {0}/p3", base)));
    assert!(links.ends_with(&format!("{}/p9 and 5 more", base)));
    assert!(!links.contains("/p10"));
    assert!(!links.contains("external.invalid"));
}

#[tokio::test]
async fn test_shutdown_signal_cancels_crawl() {
    let site = MockServer::start().await;
    let ollama = start_ollama("Summary.").await;
    let temp_dir = TempDir::new().unwrap();
    let output = output_in(&temp_dir);

    mount_page(&site, "/", page("Home", &["/a", "/b"])).await;
    mount_page(&site, "/a", page("A", &[])).await;
    mount_page(&site, "/b", page("B", &[])).await;

    let (tx, rx) = tokio::sync::watch::channel(false);
    tx.send(true).unwrap();

    let config = create_test_config(&format!("{}/", site.uri()), &ollama.uri(), &output, 10);
    let report = run_crawl(config, Some(rx)).await.unwrap();

    // The page in flight finishes before the signal is observed
    assert_eq!(report.outcome, CrawlState::Cancelled);
    assert_eq!(report.pages_visited, 1);
    assert_eq!(read_records(&output).unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_start_url_fails_before_crawling() {
    let temp_dir = TempDir::new().unwrap();
    let output = output_in(&temp_dir);

    let config = create_test_config("ftp://example.com/", "http://127.0.0.1:1", &output, 5);
    assert!(run_crawl(config, None).await.is_err());
    assert!(!output.exists());
}

#[tokio::test]
async fn test_zero_budget_rejected_before_crawling() {
    let site = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let output = output_in(&temp_dir);

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page("Home", &[])))
        .expect(0)
        .mount(&site)
        .await;

    let config = create_test_config(&site.uri(), "http://127.0.0.1:1", &output, 0);
    assert!(run_crawl(config, None).await.is_err());
    assert!(!output.exists());
}
