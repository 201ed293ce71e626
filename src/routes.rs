//! HTTP routes for the translation collection (`/`) and its items (`/:id`).
//!
//! Methods a route does not support answer 405 with an `Allow` header and
//! never reach the service.

use crate::error::AppError;
use crate::service::TranslationService;
use crate::store::{Cursor, TranslationRecord};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{
        header::{ACCEPT, CONTENT_TYPE, HOST},
        HeaderMap, StatusCode,
    },
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const COLLECTION_ALLOW: &str = "GET, POST";
pub const ITEM_ALLOW: &str = "GET";

/// Shared state for route handlers
#[derive(Clone)]
pub struct AppState {
    pub service: TranslationService,
    /// Overrides the scheme and host used in `self` and `next` links.
    pub public_base_url: Option<String>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            get(list_translations)
                .post(create_translation)
                .fallback(collection_method_not_allowed),
        )
        .route(
            "/:id",
            get(get_translation).fallback(item_method_not_allowed),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct CreatedResponse {
    id: i64,
    #[serde(rename = "self")]
    self_link: String,
}

#[derive(Debug, Serialize)]
struct ListedTranslation {
    #[serde(flatten)]
    record: TranslationRecord,
    #[serde(rename = "self")]
    self_link: String,
}

#[derive(Debug, Serialize)]
struct ListResponse {
    items: Vec<ListedTranslation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next: Option<String>,
}

#[derive(Debug, Serialize)]
struct TranslationResponse {
    id: i64,
    text: String,
    source: String,
    target: String,
    translation: String,
    #[serde(rename = "self")]
    self_link: String,
}

#[derive(Debug, Deserialize)]
struct ListParams {
    cursor: Option<String>,
}

async fn create_translation(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let declares_json = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(is_json_media_type);
    if !declares_json {
        return Err(AppError::UnsupportedMediaType);
    }

    let body: Value = serde_json::from_slice(&body).map_err(|_| AppError::MalformedBody)?;
    let [text, source, target] = required_fields(&body, ["text", "source", "target"])?;

    let id = state.service.create_translation(text, source, target).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id,
            self_link: item_url(&base_url(&state, &headers), id),
        }),
    ))
}

async fn list_translations(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>, AppError> {
    let cursor = params.cursor.map(Cursor::new);
    let page = state.service.list_translations(cursor.as_ref()).await?;

    let base = base_url(&state, &headers);
    let items = page
        .items
        .into_iter()
        .map(|record| ListedTranslation {
            self_link: item_url(&base, record.id),
            record,
        })
        .collect();
    let next = page.next_cursor.map(|cursor| {
        format!("{}/?cursor={}", base, urlencoding::encode(cursor.as_str()))
    });

    Ok(Json(ListResponse { items, next }))
}

async fn get_translation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<TranslationResponse>, AppError> {
    let id: i64 = id.parse().map_err(|_| AppError::NotFound)?;
    let record = state.service.get_translation(id).await?;

    if !accepts_json(&headers) {
        return Err(AppError::NotAcceptable);
    }

    Ok(Json(TranslationResponse {
        id: record.id,
        self_link: item_url(&base_url(&state, &headers), record.id),
        text: record.text,
        source: record.source,
        target: record.target,
        translation: record.translated,
    }))
}

async fn collection_method_not_allowed() -> AppError {
    AppError::MethodNotAllowed {
        allow: COLLECTION_ALLOW,
    }
}

async fn item_method_not_allowed() -> AppError {
    AppError::MethodNotAllowed { allow: ITEM_ALLOW }
}

/// Pull the named fields out of a JSON object body.
///
/// Absence is reported before null: a body missing one field and nulling
/// another is a `MissingField`. A body that is not an object has no fields.
fn required_fields<'a, const N: usize>(
    body: &'a Value,
    names: [&str; N],
) -> Result<[&'a Value; N], AppError> {
    static NULL: Value = Value::Null;

    let object = body.as_object().ok_or(AppError::MissingField)?;
    let mut fields = [&NULL; N];
    for (slot, name) in fields.iter_mut().zip(names) {
        *slot = object.get(name).ok_or(AppError::MissingField)?;
    }

    if fields.iter().any(|value| value.is_null()) {
        return Err(AppError::NullField);
    }

    Ok(fields)
}

/// True for `application/json`, with or without parameters such as charset.
fn is_json_media_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|media| media.trim().eq_ignore_ascii_case("application/json"))
}

/// Whether the `Accept` header admits a JSON response.
///
/// No header means anything is acceptable. Otherwise the most specific range
/// matching JSON decides (`application/json`, then `application/*`, then
/// `*/*`), and it admits JSON only with a `q` above zero.
fn accepts_json(headers: &HeaderMap) -> bool {
    let mut values = headers
        .get_all(ACCEPT)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .peekable();

    if values.peek().is_none() {
        return true;
    }

    let mut best: Option<(u8, f32)> = None;
    for range in values.flat_map(|v| v.split(',')) {
        let mut parts = range.split(';');
        let media = parts.next().unwrap_or("").trim();
        let specificity = if media.eq_ignore_ascii_case("application/json") {
            2
        } else if media.eq_ignore_ascii_case("application/*") {
            1
        } else if media == "*/*" {
            0
        } else {
            continue;
        };
        let quality = parts.find_map(quality_param).unwrap_or(1.0);

        best = match best {
            Some((s, q)) if s > specificity || (s == specificity && q >= quality) => Some((s, q)),
            _ => Some((specificity, quality)),
        };
    }

    best.is_some_and(|(_, quality)| quality > 0.0)
}

/// Value of a `q=` media range parameter; the name is case-insensitive.
fn quality_param(param: &str) -> Option<f32> {
    let (name, value) = param.split_once('=')?;
    if !name.trim().eq_ignore_ascii_case("q") {
        return None;
    }
    value.trim().parse().ok()
}

/// Scheme and host that links are built from, without a trailing slash.
fn base_url(state: &AppState, headers: &HeaderMap) -> String {
    if let Some(base) = &state.public_base_url {
        return base.trim_end_matches('/').to_string();
    }

    let proto = first_value(headers, "x-forwarded-proto").unwrap_or("http");
    let host = first_value(headers, "x-forwarded-host")
        .or_else(|| first_value(headers, HOST.as_str()))
        .unwrap_or("localhost");

    format!("{}://{}", proto, host)
}

/// First comma-separated entry of a header, as proxies may append to them.
fn first_value<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn item_url(base: &str, id: i64) -> String {
    format!("{}/{}", base, id)
}
