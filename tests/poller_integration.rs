use std::sync::Arc;
use std::time::Duration;

use attackwatch::{load_page, DashboardPoller, HttpSource, Page, PollFailure, SnapshotSource};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const LOADED: &str = r#"{
    "attack_stats": {"SQL Injection": 4, "DDoS": 9},
    "attack_chart": "iVBORw0KGgo=",
    "malicious_ips": [
        {"ip": "192.168.1.10", "threat_level": "high", "first_detected": "2024-06-01 10:00:00", "attack_type": "DDoS"},
        {"ip": "10.0.0.7", "threat_level": "low", "first_detected": "2024-06-01 10:05:00", "attack_type": "XSS"}
    ]
}"#;

const UPDATED: &str = r#"{
    "attack_stats": {"SQL Injection": 5, "DDoS": 12, "Brute Force": 1},
    "attack_chart": "AAAA",
    "malicious_ips": [{"ip": "172.16.0.99", "threat_level": "medium"}]
}"#;

/// Serve canned responses in order, repeating the last one, and return the
/// base URL.
async fn serve(responses: Vec<(&'static str, &'static str)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut next = 0;
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let (status, body) = responses[next.min(responses.len() - 1)];
            next += 1;

            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            socket.shutdown().await.ok();
        }
    });

    format!("http://{}", addr)
}

fn http_source(base: String) -> Arc<dyn SnapshotSource> {
    Arc::new(HttpSource::builder().base_url(base).build().unwrap())
}

#[tokio::test]
async fn poll_updates_counters_and_chart_only() {
    let base = serve(vec![("200 OK", LOADED), ("200 OK", UPDATED)]).await;
    let source = http_source(base);
    let page = Page::dashboard().into_shared();

    load_page(source.as_ref(), &page).await.unwrap();
    assert_eq!(page.lock().table.len(), 2);

    let poller = DashboardPoller::new(source, page.clone());
    poller.poll().await.unwrap();

    let page = page.lock();
    let counters = page.counters.as_ref().unwrap();
    let labels: Vec<_> = counters.items().iter().map(|i| i.label.as_str()).collect();
    assert_eq!(labels, ["Brute Force", "DDoS", "SQL Injection"]);
    assert_eq!(counters.items()[1].count, 12);
    assert_eq!(
        page.chart.as_ref().unwrap().src(),
        "data:image/png;base64,AAAA"
    );

    // Table rows and their click bindings come from the page load
    assert_eq!(page.table.len(), 2);
    assert_eq!(page.table.rows()[0].first_cell(), Some("192.168.1.10"));
}

#[tokio::test]
async fn rows_stay_clickable_after_polls() {
    let base = serve(vec![("200 OK", LOADED), ("200 OK", UPDATED)]).await;
    let source = http_source(base);
    let page = Page::dashboard().into_shared();

    load_page(source.as_ref(), &page).await.unwrap();
    let poller = DashboardPoller::new(source, page.clone());
    poller.poll().await.unwrap();
    poller.poll().await.unwrap();

    let mut page = page.lock();
    assert_eq!(page.click_row(1).as_deref(), Some("10.0.0.7"));
    assert_eq!(page.ip_input_value(), Some("10.0.0.7"));
}

#[tokio::test]
async fn failed_poll_leaves_page_unchanged() {
    let base = serve(vec![
        ("200 OK", LOADED),
        ("500 Internal Server Error", "oops"),
        ("200 OK", "not json"),
    ])
    .await;
    let source = http_source(base);
    let page = Page::dashboard().into_shared();

    load_page(source.as_ref(), &page).await.unwrap();
    let before = page.lock().clone();

    let poller = DashboardPoller::new(source, page.clone());
    assert!(matches!(poller.poll().await, Err(PollFailure::Http(_))));
    assert!(matches!(poller.poll().await, Err(PollFailure::Parse(_))));

    assert_eq!(*page.lock(), before);
    let stats = poller.stats();
    assert_eq!(stats.polls, 2);
    assert_eq!(stats.failures, 2);
    assert!(stats.last_success.is_none());
}

#[tokio::test]
async fn failed_load_leaves_page_empty() {
    let base = serve(vec![("503 Service Unavailable", "")]).await;
    let source = http_source(base);
    let page = Page::dashboard().into_shared();

    assert!(load_page(source.as_ref(), &page).await.is_err());

    let page = page.lock();
    assert!(page.table.is_empty());
    assert!(page.counters.as_ref().unwrap().is_empty());
}

#[tokio::test]
async fn failed_reload_drops_earlier_data() {
    let base = serve(vec![("200 OK", LOADED), ("503 Service Unavailable", "")]).await;
    let source = http_source(base);
    let page = Page::dashboard().into_shared();

    load_page(source.as_ref(), &page).await.unwrap();
    assert_eq!(page.lock().counters.as_ref().unwrap().len(), 2);

    assert!(load_page(source.as_ref(), &page).await.is_err());

    let page = page.lock();
    assert!(page.table.is_empty());
    assert!(page.counters.as_ref().unwrap().is_empty());
    assert_eq!(page.chart.as_ref().unwrap().src(), "");
}

#[tokio::test]
async fn trigger_polls_without_waiting_for_the_timer() {
    let base = serve(vec![("200 OK", UPDATED)]).await;
    let source = http_source(base);
    let page = Page::dashboard().into_shared();

    let mut poller =
        DashboardPoller::new(source, page.clone()).with_period(Duration::from_secs(3600));
    poller.start();
    assert!(poller.trigger());

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while poller.stats().polls == 0 && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    poller.stop();

    assert_eq!(poller.stats().polls, 1);
    assert_eq!(page.lock().counters.as_ref().unwrap().len(), 3);
    assert!(!poller.is_running());
}
