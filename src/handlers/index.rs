use axum::response::Html;

/// GET /
pub async fn index() -> Html<&'static str> {
    Html("<h1>Code challenge</h1>")
}
