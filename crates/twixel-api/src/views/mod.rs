//! HTML rendering. Every page is a pure function of loader/action data;
//! maud escapes all interpolated text.

pub mod home;
pub mod login;
pub mod twixes;

use axum::http::StatusCode;
use maud::{DOCTYPE, Markup, html};

/// Per-page `<title>` and meta description.
pub struct Meta {
    pub title: String,
    pub description: String,
}

impl Meta {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn site() -> Self {
        Self::new("Twixes", "Il Twitter di Voxel!")
    }
}

pub fn document(meta: &Meta, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="it" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width,initial-scale=1";
                title { (meta.title) }
                meta name="description" content=(meta.description);
                link rel="alternate" type="application/rss+xml" title="Twixel" href="/twixes.rss";
            }
            body { (body) }
        }
    }
}

/// Bare message box used inside catch and error boundaries.
pub fn error_container(message: &str) -> Markup {
    html! {
        div class="error-container" { (message) }
    }
}

/// Top-level page for errors thrown outside any route layout.
pub fn error_page(status: StatusCode, message: &str) -> Markup {
    let heading = format!("{} {}", status.as_u16(), status.canonical_reason().unwrap_or("Error"));
    document(
        &Meta::new(heading.clone(), message),
        html! {
            div class="w-screen h-screen bg-purple-100 flex flex-col items-center justify-center p-4" {
                div class="bg-white rounded-lg border shadow p-8 w-full max-w-sm" {
                    h1 class="text-2xl font-bold text-purple-700 mb-2" { (heading) }
                    (error_container(message))
                    a href="/" class="underline text-purple-700" { "Homepage" }
                }
            }
        },
    )
}
