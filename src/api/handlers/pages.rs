use axum::http::header;
use axum::response::{Html, IntoResponse};

const REGISTER_FORM: &str = include_str!("../../../static/RegisterForm.html");
const SEARCH_FORM: &str = include_str!("../../../static/SearchForm.html");
const DOCS_PAGE: &str = include_str!("../../../static/docs.html");
const OPENAPI_SPEC: &str = include_str!("../../../static/openapi.yaml");

/// GET /RegisterForm.html
pub async fn register_form() -> Html<&'static str> {
    Html(REGISTER_FORM)
}

/// GET /SearchForm.html
pub async fn search_form() -> Html<&'static str> {
    Html(SEARCH_FORM)
}

/// GET /docs: Swagger UI bound to the bundled description.
pub async fn docs() -> Html<&'static str> {
    Html(DOCS_PAGE)
}

/// GET /docs/openapi.yaml
pub async fn openapi_spec() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/yaml")], OPENAPI_SPEC)
}
