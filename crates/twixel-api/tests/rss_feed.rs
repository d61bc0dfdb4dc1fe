mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{Duration, Utc};

use common::{TestApp, body_text};

fn feed_request(host: Option<&str>, forwarded: Option<&str>) -> Request<Body> {
    let mut builder = Request::get("/twixes.rss");
    if let Some(host) = host {
        builder = builder.header(header::HOST, host);
    }
    if let Some(forwarded) = forwarded {
        builder = builder.header("x-forwarded-host", forwarded);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn feed_lists_newest_first_with_absolute_links() {
    let app = TestApp::new();
    let author = app.create_user("kody");
    let t0 = Utc::now();
    let older = app.create_twix(author, "Il vecchio", t0);
    let newer = app.create_twix(author, "Il nuovo", t0 + Duration::minutes(1));

    let response = app.send(feed_request(Some("localhost:3000"), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/xml");
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "public, max-age=600, s-maxage=86400"
    );

    let xml = body_text(response).await;
    assert_eq!(xml.matches("<item>").count(), 2);
    let newer_link = format!("<link>http://localhost:3000/twixes/{newer}</link>");
    let older_link = format!("<link>http://localhost:3000/twixes/{older}</link>");
    assert!(xml.find(&newer_link).unwrap() < xml.find(&older_link).unwrap());
    assert!(xml.contains("<author><![CDATA[kody]]></author>"));
}

#[tokio::test]
async fn forwarded_host_wins_and_uses_https() {
    let app = TestApp::new();
    let author = app.create_user("kody");
    let id = app.create_twix(author, "Dietro il proxy", Utc::now());

    let xml = body_text(
        app.send(feed_request(Some("internal:8080"), Some("twixel.example")))
            .await,
    )
    .await;
    assert!(xml.contains(&format!("<guid>https://twixel.example/twixes/{id}</guid>")));
    assert!(!xml.contains("internal:8080"));
}

#[tokio::test]
async fn feed_is_capped_at_one_hundred() {
    let app = TestApp::new();
    let author = app.create_user("kody");
    let t0 = Utc::now();
    for i in 0..105 {
        app.create_twix(author, &format!("twix {i}"), t0 + Duration::seconds(i));
    }

    let xml = body_text(app.send(feed_request(Some("localhost"), None)).await).await;
    assert_eq!(xml.matches("<item>").count(), 100);
    // the five oldest fall off
    assert!(!xml.contains("<![CDATA[twix 4]]>"));
    assert!(xml.contains("<![CDATA[twix 5]]>"));
}

#[tokio::test]
async fn cdata_breaking_titles_are_escaped() {
    let app = TestApp::new();
    let author = app.create_user("kody");
    app.create_twix(author, "fine]]><script>", Utc::now());

    let xml = body_text(app.send(feed_request(Some("localhost"), None)).await).await;
    assert!(xml.contains("<title><![CDATA[fine]]]]><![CDATA[><script>]]></title>"));
    assert!(xml.contains("A funny twix called fine]]&gt;&lt;script&gt;"));
}

#[tokio::test]
async fn missing_host_is_a_server_error() {
    let app = TestApp::new();
    let response = app.send(feed_request(None, None)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
