use maud::{Markup, html};

use twixel_types::api::LoginActionData;

use super::{Meta, document};

pub fn page(redirect_to: Option<&str>, data: Option<&LoginActionData>) -> Markup {
    let fields = data.and_then(|d| d.fields.as_ref());
    let field_errors = data.and_then(|d| d.field_errors.as_ref());
    let form_error = data.and_then(|d| d.form_error.as_deref());

    let login_type = fields.map(|f| f.login_type.as_str()).unwrap_or("login");
    let username = fields.map(|f| f.username.as_str());
    let username_error = field_errors.and_then(|e| e.username.as_deref());
    let password_error = field_errors.and_then(|e| e.password.as_deref());

    document(
        &Meta::site(),
        html! {
            div class="w-screen h-screen bg-purple-100 flex flex-col items-center justify-center p-4" {
                div class="bg-white rounded-lg border shadow p-8 w-full max-w-sm" {
                    h1 class="text-4xl font-bold text-purple-700 mb-2" { "Login" }
                    form method="post" action="/login" {
                        input type="hidden" name="redirectTo" value=[redirect_to];
                        fieldset class="py-2 border-t border-b mb-2" {
                            legend class="sr-only" { "Login o Registrazione?" }
                            label {
                                input type="radio" name="loginType" value="login" checked[login_type != "register"];
                                " Login"
                            }
                            label class="pl-2" {
                                input type="radio" name="loginType" value="register" checked[login_type == "register"];
                                " Iscriviti"
                            }
                        }
                        div {
                            label for="username-input" { "Username" }
                            input type="text" id="username-input" name="username"
                                value=[username]
                                aria-invalid=[username_error.map(|_| "true")]
                                aria-errormessage=[username_error.map(|_| "username-error")]
                                class="border shadow rounded w-full px-4 py-2 mb-2";
                            @if let Some(message) = username_error {
                                p class="text-red-500 text-xs" role="alert" id="username-error" { (message) }
                            }
                        }
                        div {
                            label for="password-input" { "Password" }
                            input type="password" id="password-input" name="password"
                                aria-invalid=[password_error.map(|_| "true")]
                                aria-errormessage=[password_error.map(|_| "password-error")]
                                class="border shadow rounded w-full px-4 py-2";
                            @if let Some(message) = password_error {
                                p class="text-red-500 text-xs" role="alert" id="password-error" { (message) }
                            }
                        }
                        div id="form-error-message" {
                            @if let Some(message) = form_error {
                                p class="text-red-500 text-xs" role="alert" { (message) }
                            }
                        }
                        button type="submit" class="mt-4 bg-purple-700 rounded-md shadow px-3 py-2 w-full text-center text-white" {
                            "Continua"
                        }
                    }
                }
                div class="bg-white rounded-lg border shadow p-4 w-full max-w-sm mt-4" {
                    ul class="flex items-center justify-between underline text-purple-700" {
                        li { a href="/" { "Homepage" } }
                        li { a href="/twixes" { "Twixes" } }
                    }
                }
            }
        },
    )
}
