use maud::{Markup, html};

use super::{Meta, document};

pub fn page() -> Markup {
    document(
        &Meta::site(),
        html! {
            div class="w-screen h-screen bg-purple-100 flex flex-col items-center justify-center p-4" {
                div class="p-8 w-full max-w-sm" {
                    h1 class="text-center text-5xl lg:text-7xl font-bold text-purple-700 mb-2" { "Twixel" }
                    nav class="w-full" {
                        ul class="flex items-center justify-center" {
                            li class="mr-4 rounded-full bg-white px-1 shadow border" {
                                a href="/twixes" { "Read Twixes" }
                            }
                            li class="rounded-full bg-white px-1 shadow border" {
                                a href="/twixes.rss" { "Feed RSS" }
                            }
                        }
                    }
                }
            }
        },
    )
}
