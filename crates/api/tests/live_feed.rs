//! The live public list follows changes made through the API.

mod common;

use std::time::Duration;

use common::{author_grant, build_test_app, create_inquiry, delete_grant, submission};
use wonders_api::feed::{FeedSnapshot, FeedSubscription};

async fn next(feed: &mut FeedSubscription) -> FeedSnapshot {
    tokio::time::timeout(Duration::from_secs(2), feed.changed())
        .await
        .expect("feed should deliver a snapshot")
        .expect("feed should still be running")
}

#[tokio::test]
async fn test_feed_follows_submissions_and_deletes() {
    let app = build_test_app();
    let mut feed = FeedSubscription::start(app.state.inquiries.clone(), &app.event_bus).await;
    assert!(feed.current().inquiries.is_empty());

    let created = create_inquiry(&app.router, submission("Live one", true)).await;
    let snapshot = next(&mut feed).await;
    assert_eq!(snapshot.inquiries.len(), 1);
    assert_eq!(snapshot.inquiries[0].title, "Live one");

    let id = created["id"].as_str().unwrap();
    let grant = author_grant(&app.router, id, "alice@example.com", None).await;
    delete_grant(&app.router, &format!("/api/v1/wonders/{id}"), &grant).await;

    let snapshot = next(&mut feed).await;
    assert!(snapshot.inquiries.is_empty());
}

#[tokio::test]
async fn test_private_submissions_do_not_reach_the_feed() {
    let app = build_test_app();
    let mut feed = FeedSubscription::start(app.state.inquiries.clone(), &app.event_bus).await;
    let start_version = feed.current().version;

    create_inquiry(&app.router, submission("Private", false)).await;
    create_inquiry(&app.router, submission("Public", true)).await;

    // Only the public submission triggers a refresh.
    let snapshot = next(&mut feed).await;
    assert_eq!(snapshot.version, start_version + 1);
    let titles: Vec<&str> = snapshot.inquiries.iter().map(|v| v.title.as_str()).collect();
    assert_eq!(titles, ["Public"]);
}

#[tokio::test]
async fn test_closing_the_feed_releases_its_subscription() {
    let app = build_test_app();
    let feed = FeedSubscription::start(app.state.inquiries.clone(), &app.event_bus).await;
    assert_eq!(app.event_bus.subscriber_count(), 1);

    feed.close();
    tokio::time::timeout(Duration::from_secs(2), async {
        while app.event_bus.subscriber_count() > 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("feed task should stop after close");
}
