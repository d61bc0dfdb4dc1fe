use maud::Markup;

use crate::views;

/// GET /
pub async fn index() -> Markup {
    views::home::page()
}
