use maud::{Markup, PreEscaped, html};

use twixel_types::api::{MIN_CONTENT_LEN, MIN_TITLE_LEN, NewTwixActionData};
use twixel_types::models::{Twix, TwixListItem, User};

use super::{Meta, document};

/// Shell shared by every `/twixes*` page: header, sidebar with the newest
/// twixes, and the routed content.
pub fn layout(meta: &Meta, user: Option<&User>, items: &[TwixListItem], outlet: Markup) -> Markup {
    document(
        meta,
        html! {
            div class="w-screen min-h-screen bg-purple-100" {
                header class="bg-white p-4" {
                    div class="flex items-center justify-between mx-auto max-w-screen-2xl" {
                        h1 class="home-link" {
                            a href="/" title="Remix Twixes" aria-label="Remix Twixes" {
                                span class="text-2xl font-bold text-purple-700" { "Twixel" }
                            }
                        }
                        @if let Some(user) = user {
                            div class="flex items-center" {
                                span { "Hi " (user.username) }
                                form action="/logout" method="post" {
                                    button type="submit" class="underline font-medium ml-2 pl-2 border-l" { "Logout" }
                                }
                            }
                        } @else {
                            a href="/login" { "Login" }
                        }
                    }
                }
                main class="max-w-screen-xl h-full mx-auto mt-8" {
                    div class="lg:flex" {
                        div class="w-full lg:w-1/2 flex-none px-4" {
                            a class="bg-white hover:bg-gray-100 text-purple-700 rounded-md px-4 py-2 w-full block text-center border shadow" href="/twixes" {
                                "Get a random twix"
                            }
                            p class="my-4" { "Here are a few more twixes to check out:" }
                            ul {
                                @for item in items {
                                    li {
                                        a href=(format!("/twixes/{}", item.id)) class="block mb-4 bg-white w-full rounded-md p-4 shadow border hover:bg-gray-100" {
                                            (item.title)
                                        }
                                    }
                                }
                            }
                            a href="/twixes/new" class="bg-purple-700 text-white rounded-md px-4 py-2 w-full block text-center" {
                                "Add your own"
                            }
                        }
                        div class="lg:ml-2 flex-1 p-4 lg:p-0" { (outlet) }
                    }
                }
            }
        },
    )
}

fn panel(body: Markup) -> Markup {
    html! {
        div class="bg-white shadow border rounded-md p-4" { (body) }
    }
}

pub fn random_twix(twix: &Twix) -> Markup {
    panel(html! {
        p class="opacity-50 font-medium mb-2" { "Here's a random twix:" }
        p class="text-xl lg:text-2xl" { (twix.content) }
        a href=(format!("/twixes/{}", twix.id)) class="my-4 border-t border-b py-4 block underline" {
            "\"" (twix.title) "\" Permalink"
        }
    })
}

/// A single twix. `permalink` is `None` for a twix that has not been saved
/// yet; `can_delete` greys out the delete button while the owner still sees it.
pub fn twix_display(
    title: &str,
    content: &str,
    permalink: Option<&str>,
    is_owner: bool,
    can_delete: bool,
) -> Markup {
    html! {
        div {
            p class="opacity-50 font-medium mb-2" { "Here's your hilarious twix:" }
            p class="text-xl lg:text-2xl" data-slot="content" { (content) }
            @if let Some(href) = permalink {
                a href=(href) class="my-4 border-t border-b py-4 block underline" { (title) " Permalink" }
            } @else {
                span class="my-4 border-t border-b py-4 block underline" data-slot="title" { (title) " Permalink" }
            }
            @if is_owner {
                form method="post" {
                    input type="hidden" name="_method" value="delete";
                    button type="submit" class="bg-gray-100 rounded-md px-4 py-2" disabled[!can_delete] { "Delete" }
                }
            }
        }
    }
}

pub fn twix_detail(twix: &Twix, is_owner: bool) -> Markup {
    let permalink = format!("/twixes/{}", twix.id);
    panel(twix_display(&twix.title, &twix.content, Some(&permalink), is_owner, true))
}

/// Swaps the form for the pending twix while a valid submission is in flight.
fn pending_script() -> String {
    format!(
        r#"(function () {{
  var form = document.getElementById("new-twix-form");
  var template = document.getElementById("pending-twix");
  if (!form || !template) return;
  form.addEventListener("submit", function () {{
    var title = form.elements.title.value;
    var content = form.elements.content.value;
    if (Array.from(title).length < {MIN_TITLE_LEN} || Array.from(content).length < {MIN_CONTENT_LEN}) return;
    var pending = template.content.cloneNode(true);
    pending.querySelector("[data-slot=title]").textContent = title + " Permalink";
    pending.querySelector("[data-slot=content]").textContent = content;
    var panel = form.closest("[data-panel]");
    panel.firstElementChild.hidden = true;
    form.hidden = true;
    panel.appendChild(pending);
  }});
}})();"#
    )
}

pub fn new_twix_form(data: Option<&NewTwixActionData>) -> Markup {
    let fields = data.and_then(|d| d.fields.as_ref());
    let title_error = data.and_then(|d| d.field_errors.as_ref()).and_then(|e| e.title.as_deref());
    let content_error = data.and_then(|d| d.field_errors.as_ref()).and_then(|e| e.content.as_deref());
    let form_error = data.and_then(|d| d.form_error.as_deref());

    html! {
        div class="bg-white rounded-md shadow border p-4" data-panel {
            p class="opacity-50 font-medium mb-2" { "Crea il tuo twix" }
            form id="new-twix-form" method="post" action="/twixes/new" {
                div class="mb-4" {
                    label class="flex flex-col" {
                        "Titolo: "
                        input type="text" name="title"
                            value=[fields.map(|f| f.title.as_str())]
                            aria-invalid=[title_error.map(|_| "true")]
                            aria-errormessage=[title_error.map(|_| "name-error")]
                            class="shadow border rounded-md w-full px-4 py-2";
                    }
                    @if let Some(message) = title_error {
                        p class="text-red-500 text-xs font-medium" role="alert" id="name-error" { (message) }
                    }
                }
                div class="mb-4" {
                    label class="flex flex-col" {
                        "Content: "
                        textarea name="content"
                            aria-invalid=[content_error.map(|_| "true")]
                            aria-errormessage=[content_error.map(|_| "content-error")]
                            class="shadow border rounded-md w-full px-4 py-2" {
                            @if let Some(f) = fields { (f.content) }
                        }
                    }
                    @if let Some(message) = content_error {
                        p class="text-red-500 text-xs font-medium" role="alert" id="content-error" { (message) }
                    }
                }
                @if let Some(message) = form_error {
                    p class="text-red-500 text-xs font-medium" role="alert" { (message) }
                }
                div {
                    button type="submit" class="w-full text-center px-4 py-2 bg-gray-100 font-medium rounded-md hover:bg-gray-200" {
                        "Aggiungi"
                    }
                }
            }
            template id="pending-twix" {
                (twix_display("", "", None, true, false))
            }
            script { (PreEscaped(pending_script())) }
        }
    }
}

pub fn login_required() -> Markup {
    html! {
        div class="bg-white p-4 border shadow rounded-md" {
            p { "Devi prima fare login per creare nuovi Twixel" }
            a class="px-4 py-2 bg-purple-700 text-white font-medium rounded-md inline-block mt-4" href="/login" { "Login" }
        }
    }
}
