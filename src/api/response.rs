use axum::async_trait;
use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

// ============================================================================
// Plain-text status bodies
// ============================================================================

pub const CREATED: &str = "Created";
pub const UPDATED: &str = "Updated";
pub const DELETED: &str = "Deleted";
pub const NOT_FOUND: &str = "Not found";
pub const SERVER_ERROR: &str = "Server Error";
pub const PAYLOAD_TOO_LARGE: &str = "Payload Too Large";

// ============================================================================
// Unified error type for handlers
// ============================================================================

/// Handler failure, rendered as a short plain-text body.
///
/// `Internal` carries the cause for the server log only; the client always
/// receives the fixed `Server Error` text.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound,
    PayloadTooLarge,
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(reason) => (
                StatusCode::BAD_REQUEST,
                format!("Bad Request: {reason}"),
            )
                .into_response(),
            ApiError::NotFound => (StatusCode::NOT_FOUND, NOT_FOUND).into_response(),
            ApiError::PayloadTooLarge => {
                (StatusCode::PAYLOAD_TOO_LARGE, PAYLOAD_TOO_LARGE).into_response()
            }
            ApiError::Internal(cause) => {
                tracing::error!(error = %cause, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR).into_response()
            }
        }
    }
}

impl ApiError {
    pub fn bad_request(reason: impl Into<String>) -> Self {
        ApiError::BadRequest(reason.into())
    }

    pub fn internal(cause: impl std::fmt::Display) -> Self {
        ApiError::Internal(cause.to_string())
    }

    pub fn invalid_id() -> Self {
        ApiError::bad_request("invalid id format")
    }
}

impl From<crate::storage::DatabaseError> for ApiError {
    fn from(e: crate::storage::DatabaseError) -> Self {
        ApiError::internal(e)
    }
}

// ============================================================================
// Item identifiers
// ============================================================================

/// Parse an item id. Only plain decimal digits are accepted.
pub fn parse_item_id(raw: &str) -> Result<i64, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::invalid_id());
    }
    raw.parse::<i64>().map_err(|_| ApiError::invalid_id())
}

/// Path extractor for `/inventory/:id`; malformed ids are a 400, never a 500.
pub struct ItemId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for ItemId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &S,
    ) -> Result<Self, ApiError> {
        let axum::extract::Path(raw) =
            axum::extract::Path::<String>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::invalid_id())?;
        parse_item_id(&raw).map(ItemId)
    }
}

/// An id supplied in a request body, either as a JSON number or as text
/// (HTML forms always send text).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawId {
    Number(i64),
    Text(String),
    Invalid,
}

impl RawId {
    pub fn parse(&self) -> Result<i64, ApiError> {
        match self {
            RawId::Number(n) if *n >= 0 => Ok(*n),
            RawId::Text(s) => parse_item_id(s),
            _ => Err(ApiError::invalid_id()),
        }
    }
}

impl<'de> Deserialize<'de> for RawId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(i64),
            Text(String),
            Other(serde::de::IgnoredAny),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Number(n) => RawId::Number(n),
            Repr::Text(s) => RawId::Text(s),
            Repr::Other(_) => RawId::Invalid,
        })
    }
}

// ============================================================================
// Custom extractors (reject with plain-text ApiError)
// ============================================================================

/// JSON body where an empty body stands for `T::default()`.
///
/// A non-empty body still needs a JSON Content-Type.
pub struct JsonOrDefault<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonOrDefault<T>
where
    T: DeserializeOwned + Default + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, ApiError> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|ct| ct.parse::<mime_guess::mime::Mime>().ok())
            .is_some_and(|mime| {
                mime.type_().as_str() == "application"
                    && (mime.subtype().as_str() == "json"
                        || mime.suffix().is_some_and(|s| s.as_str() == "json"))
            });

        let body = Bytes::from_request(req, state).await.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ApiError::PayloadTooLarge
            } else {
                ApiError::bad_request("failed to read request body")
            }
        })?;

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonOrDefault(T::default()));
        }
        if !is_json {
            return Err(ApiError::bad_request(
                "missing Content-Type: application/json header",
            ));
        }

        Json::<T>::from_bytes(&body)
            .map(|Json(value)| JsonOrDefault(value))
            .map_err(json_rejection)
    }
}

/// Accepts either a JSON body or an urlencoded form, chosen by Content-Type.
pub struct JsonOrForm<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    T: DeserializeOwned + Send + 'static,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, ApiError> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            match Form::<T>::from_request(req, state).await {
                Ok(Form(value)) => Ok(JsonOrForm(value)),
                Err(rejection) => Err(form_rejection(rejection)),
            }
        } else {
            match Json::<T>::from_request(req, state).await {
                Ok(Json(value)) => Ok(JsonOrForm(value)),
                Err(rejection) => Err(json_rejection(rejection)),
            }
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    let message = match rejection {
        JsonRejection::JsonDataError(err) => format!("invalid request body: {}", err.body_text()),
        JsonRejection::JsonSyntaxError(_) => "malformed JSON in request body".into(),
        JsonRejection::MissingJsonContentType(_) => {
            "missing Content-Type: application/json header".into()
        }
        _ => "failed to read request body".into(),
    };
    ApiError::bad_request(message)
}

fn form_rejection(rejection: FormRejection) -> ApiError {
    ApiError::bad_request(format!("invalid form body: {}", rejection.body_text()))
}
