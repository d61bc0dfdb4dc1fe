use std::fmt::{self, Write};

use anyhow::Context;
use axum::{
    extract::State,
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
};

use twixel_types::models::FeedTwix;

use crate::auth::{AppState, with_db};
use crate::error::AppError;

/// Most recent twixes included in the feed.
pub const FEED_LEN: u32 = 100;

const CACHE_CONTROL: &str = "public, max-age=600, s-maxage=86400";

/// GET /twixes.rss
pub async fn feed(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
    let host = request_host(&headers)
        .ok_or_else(|| anyhow::anyhow!("Could not determine domain URL."))?
        .to_string();

    let twixes = with_db(&state, |db| db.recent_twixes_with_authors(FEED_LEN)).await?;
    let body = render_feed(&base_url(&host), &twixes).context("failed to render RSS feed")?;

    Ok((
        [
            (header::CACHE_CONTROL, CACHE_CONTROL),
            (header::CONTENT_TYPE, "application/xml"),
        ],
        body,
    )
        .into_response())
}

/// `X-Forwarded-Host` wins over `Host` so the feed links survive a proxy.
pub fn request_host(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("x-forwarded-host")
        .or_else(|| headers.get(header::HOST))
        .and_then(|v| v.to_str().ok())
        .filter(|h| !h.is_empty())
}

pub fn base_url(host: &str) -> String {
    let protocol = if host.contains("localhost") { "http" } else { "https" };
    format!("{protocol}://{host}")
}

/// Splits every `]]>` so the text can sit inside a CDATA section.
pub fn escape_cdata(s: &str) -> String {
    s.replace("]]>", "]]]]><![CDATA[>")
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    out
}

/// RSS 2.0 document for `twixes`, which must already be newest first.
pub fn render_feed(base: &str, twixes: &[FeedTwix]) -> Result<String, fmt::Error> {
    let twixes_url = format!("{base}/twixes");
    let mut xml = String::new();

    writeln!(xml, r#"<rss xmlns:blogChannel="{twixes_url}" version="2.0">"#)?;
    writeln!(xml, "  <channel>")?;
    writeln!(xml, "    <title>Remix Twixes</title>")?;
    writeln!(xml, "    <link>{twixes_url}</link>")?;
    writeln!(xml, "    <description>Some funny twixes</description>")?;
    writeln!(xml, "    <language>en-us</language>")?;
    writeln!(xml, "    <generator>Kody the Koala</generator>")?;
    writeln!(xml, "    <ttl>40</ttl>")?;

    for entry in twixes {
        let twix = &entry.twix;
        let link = format!("{twixes_url}/{}", twix.id);
        writeln!(xml, "    <item>")?;
        writeln!(xml, "      <title><![CDATA[{}]]></title>", escape_cdata(&twix.title))?;
        writeln!(
            xml,
            "      <description><![CDATA[A funny twix called {}]]></description>",
            escape_html(&twix.title)
        )?;
        writeln!(
            xml,
            "      <author><![CDATA[{}]]></author>",
            escape_cdata(&entry.twixester_username)
        )?;
        writeln!(
            xml,
            "      <pubDate>{}</pubDate>",
            twix.created_at.format("%a, %d %b %Y %H:%M:%S GMT")
        )?;
        writeln!(xml, "      <link>{link}</link>")?;
        writeln!(xml, "      <guid>{link}</guid>")?;
        writeln!(xml, "    </item>")?;
    }

    writeln!(xml, "  </channel>")?;
    xml.push_str("</rss>");
    Ok(xml)
}
