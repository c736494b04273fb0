//! End-to-end render passes against loopback HTTP and on-disk feeds.

mod common;

use std::fs;

use material_feed::core::config::Config;
use material_feed::logger::jsonl::{EventType, JsonlSink, MemorySink, Severity};
use material_feed::render::{EMPTY_FEED_MESSAGE, FETCH_FAILED_MESSAGE, FeedRenderer, RenderOutcome};
use material_feed::view::{Document, ViewIds};

fn renderer_for(source: &str) -> FeedRenderer {
    let mut config = Config::default();
    config.feed.source = source.to_string();
    FeedRenderer::from_config(&config)
}

fn page() -> Document {
    Document::page("Material News", &ViewIds::default())
}

#[test]
fn http_feed_renders_lines_and_status() {
    let (url, server) = common::serve(200, common::SAMPLE_FEED, 1);
    let mut doc = page();
    let mut sink = MemorySink::default();

    let outcome = renderer_for(&url).render(&mut doc, &mut sink).expect("render");
    server.join().expect("server thread");

    let RenderOutcome::Rendered {
        lines,
        last_updated,
    } = outcome
    else {
        panic!("expected rendered outcome");
    };
    assert_eq!(
        lines,
        [
            "2025-01-01T00:00:00Z — Example City, EX — Explosion; 3 killed; 5 injured. Sources: Reuters, AP ▪▪▪▫▫",
            "n/a — Unknown location — Wildfire spreads north Sources:  ▪▪▪▪▪",
        ]
    );
    assert_eq!(last_updated.as_deref(), Some("2025-01-02T08:00:00Z"));
    assert_eq!(
        doc.text_of("last-updated").as_deref(),
        Some("2025-01-02T08:00:00Z")
    );
    assert_eq!(sink.events(), [EventType::RenderStart, EventType::RenderComplete]);
}

#[test]
fn non_success_status_shows_failure_message_and_logs() {
    for status in [404_u16, 500] {
        let (url, server) = common::serve(status, "{\"error\":\"nope\"}", 1);
        let mut doc = page();
        let mut sink = MemorySink::default();

        let outcome = renderer_for(&url).render(&mut doc, &mut sink).expect("render");
        server.join().expect("server thread");

        let RenderOutcome::Failed(error) = outcome else {
            panic!("expected failure for HTTP {status}");
        };
        assert_eq!(error.status(), Some(status));
        assert_eq!(
            doc.text_of("event-container").as_deref(),
            Some(FETCH_FAILED_MESSAGE)
        );
        assert_eq!(doc.text_of("last-updated").as_deref(), Some("unknown"));

        let logged = sink
            .entries
            .iter()
            .find(|entry| entry.event == EventType::FetchFailed)
            .expect("diagnostic logged");
        assert_eq!(logged.severity, Severity::Critical);
        assert_eq!(logged.error_code.as_deref(), Some("MF-2001"));
        assert_eq!(logged.source.as_deref(), Some(url.as_str()));
    }
}

#[test]
fn invalid_json_body_is_a_failure() {
    let (url, server) = common::serve(200, "<html>oops</html>", 1);
    let mut doc = page();
    let outcome = renderer_for(&url)
        .render(&mut doc, &mut MemorySink::default())
        .expect("render");
    server.join().expect("server thread");

    assert!(outcome.is_failed());
    assert_eq!(
        doc.text_of("event-container").as_deref(),
        Some(FETCH_FAILED_MESSAGE)
    );
}

#[test]
fn empty_and_non_array_feeds_show_placeholder() {
    for body in ["[]", "{\"events\": []}", "null"] {
        let (url, server) = common::serve(200, body, 1);
        let mut doc = page();
        let outcome = renderer_for(&url)
            .render(&mut doc, &mut MemorySink::default())
            .expect("render");
        server.join().expect("server thread");

        assert!(matches!(outcome, RenderOutcome::Empty), "body {body}");
        assert_eq!(
            doc.text_of("event-container").as_deref(),
            Some(EMPTY_FEED_MESSAGE)
        );
        assert_eq!(doc.text_of("last-updated").as_deref(), Some("unknown"));
    }
}

#[test]
fn connection_refused_is_a_failure() {
    // Bind then drop to get a port nothing listens on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .expect("probe port")
        .port();
    let mut doc = page();
    let mut sink = MemorySink::default();
    let outcome = renderer_for(&format!("http://127.0.0.1:{port}/events.json"))
        .render(&mut doc, &mut sink)
        .expect("render");

    let RenderOutcome::Failed(error) = outcome else {
        panic!("expected failure");
    };
    assert_eq!(error.code(), "MF-2002");
    assert_eq!(
        doc.text_of("event-container").as_deref(),
        Some(FETCH_FAILED_MESSAGE)
    );
}

#[test]
fn repeated_http_renders_are_idempotent() {
    let (url, server) = common::serve(200, common::SAMPLE_FEED, 2);
    let renderer = renderer_for(&url);
    let mut doc = page();

    renderer
        .render(&mut doc, &mut MemorySink::default())
        .expect("first render");
    let first = doc.to_html();
    renderer
        .render(&mut doc, &mut MemorySink::default())
        .expect("second render");
    server.join().expect("server thread");

    assert_eq!(doc.to_html(), first);
    assert_eq!(
        doc.element("event-container")
            .expect("container")
            .children()
            .len(),
        2
    );
}

#[test]
fn relative_file_source_resolves_against_base_dir() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("events.json"), common::SAMPLE_FEED).expect("write feed");

    let mut config = Config::default();
    config.feed.base_dir = dir.path().to_path_buf();
    let mut doc = page();
    let outcome = FeedRenderer::from_config(&config)
        .render(&mut doc, &mut MemorySink::default())
        .expect("render");
    assert_eq!(outcome.label(), "rendered");

    let html = doc.to_html();
    assert!(html.contains("<div class=\"event-line\">2025-01-01T00:00:00Z — Example City, EX"));
    assert!(html.contains("<span id=\"last-updated\">2025-01-02T08:00:00Z</span>"));
}

#[test]
fn failures_reach_the_jsonl_diagnostics_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log_path = dir.path().join("diag.jsonl");
    let (url, server) = common::serve(503, "", 1);

    {
        let mut sink = JsonlSink::open(&log_path);
        let mut doc = page();
        renderer_for(&url).render(&mut doc, &mut sink).expect("render");
    }
    server.join().expect("server thread");

    let contents = fs::read_to_string(&log_path).expect("read diagnostics");
    let entries: Vec<serde_json::Value> = contents
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["event"], "render_start");
    assert_eq!(entries[1]["event"], "fetch_failed");
    assert_eq!(entries[1]["severity"], "critical");
    assert!(
        entries[1]["error_message"]
            .as_str()
            .is_some_and(|m| m.contains("503"))
    );
}

#[test]
fn custom_view_ids_are_honored() {
    let (url, server) = common::serve(200, r#"[{"headline":"X","updated_at":"2024-06-01T00:00:00Z"}]"#, 1);
    let mut config = Config::default();
    config.feed.source = url;
    config.view.container_id = "feed".to_string();
    config.view.status_id = "stamp".to_string();

    let mut doc = Document::page(&config.view.title, &config.view.ids());
    FeedRenderer::from_config(&config)
        .render(&mut doc, &mut MemorySink::default())
        .expect("render");
    server.join().expect("server thread");

    assert_eq!(
        doc.text_of("feed").as_deref(),
        Some("n/a — Unknown location — X Sources:  ▫▫▫▫▫")
    );
    assert_eq!(doc.text_of("stamp").as_deref(), Some("2024-06-01T00:00:00Z"));
}
