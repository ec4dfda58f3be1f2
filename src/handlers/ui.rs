use axum::response::Html;

/// The single-page UI. Embedded at compile time so the binary is
/// self-contained.
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}
