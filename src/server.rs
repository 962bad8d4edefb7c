//! HTTP surface: the quote submission endpoint and its JSON responses.

use crate::db::{QuoteStore, StorageError};
use crate::i18n::{translate, Language, MessageKey};
use crate::quote::{QuoteForm, QuoteRequest};
use crate::submission_log::{SubmissionLog, SubmissionRecord, SubmissionStatus};
use crate::validation::FieldError;
use axum::{
    async_trait,
    extract::{ConnectInfo, Form, FromRequest, Multipart, Query, Request, State},
    http::{
        header::{ALLOW, CONTENT_TYPE, USER_AGENT},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

pub const SUBMIT_QUOTE_PATH: &str = "/submit_quote";

const JSON_UTF8: &str = "application/json; charset=utf-8";

/// Shared handles for request handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn QuoteStore>,
    pub submission_log: Arc<SubmissionLog>,
}

impl AppState {
    pub fn new(store: Arc<dyn QuoteStore>, submission_log: Arc<SubmissionLog>) -> Self {
        Self {
            store,
            submission_log,
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            SUBMIT_QUOTE_PATH,
            post(submit_quote).fallback(method_not_allowed),
        )
        .route("/health", get(|| async { "OK" }))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ==================== Errors ====================

/// Every way a submission can end without a stored row.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("invalid {}", .0.field())]
    Invalid(#[from] FieldError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SubmitError {
    pub fn status(&self) -> StatusCode {
        match self {
            SubmitError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            SubmitError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            SubmitError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message_key(&self) -> MessageKey {
        match self {
            SubmitError::MethodNotAllowed => MessageKey::MethodNotAllowed,
            SubmitError::Invalid(field) => field.message_key(),
            SubmitError::Storage(storage) => storage.message_key(),
        }
    }

    /// Localized response. Never includes the underlying error text.
    pub fn into_reply(self, language: Language) -> QuoteReply {
        QuoteReply::failure(self.status(), self.message_key(), language)
    }
}

// ==================== Response ====================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

/// `{success, message}` JSON with an explicit UTF-8 content type.
#[derive(Debug, Clone)]
pub struct QuoteReply {
    pub status: StatusCode,
    pub body: ApiResponse,
}

impl QuoteReply {
    pub fn success(language: Language) -> Self {
        Self {
            status: StatusCode::OK,
            body: ApiResponse {
                success: true,
                message: translate(MessageKey::Success, language).to_string(),
            },
        }
    }

    pub fn failure(status: StatusCode, key: MessageKey, language: Language) -> Self {
        Self {
            status,
            body: ApiResponse {
                success: false,
                message: translate(key, language).to_string(),
            },
        }
    }
}

impl IntoResponse for QuoteReply {
    fn into_response(self) -> Response {
        match serde_json::to_string(&self.body) {
            Ok(json) => (
                self.status,
                [(CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8))],
                json,
            )
                .into_response(),
            Err(e) => {
                error!("Failed to serialize response: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    error!("Request handler panicked: {}", detail);

    QuoteReply::failure(
        StatusCode::INTERNAL_SERVER_ERROR,
        MessageKey::GenericError,
        Language::canonical(),
    )
    .into_response()
}

// ==================== Request Parsing ====================

#[derive(Debug, Default, Deserialize)]
pub struct LanguageQuery {
    pub language: Option<String>,
}

impl LanguageQuery {
    fn resolve(query: Option<Query<LanguageQuery>>) -> Option<Language> {
        query
            .and_then(|Query(q)| q.language)
            .map(|value| Language::from_request_value(Some(&value)))
    }
}

/// Accepts urlencoded and multipart bodies.
///
/// A body that cannot be read becomes an empty form, which then fails
/// validation on the first field.
#[async_trait]
impl<S> FromRequest<S> for QuoteForm
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.starts_with("multipart/form-data"))
            .unwrap_or(false);

        if is_multipart {
            return match Multipart::from_request(req, state).await {
                Ok(multipart) => Ok(read_multipart(multipart).await),
                Err(e) => {
                    debug!("Unreadable multipart body: {}", e);
                    Ok(QuoteForm::default())
                }
            };
        }

        // Decoded as pairs so a repeated key keeps its last value, as multipart does
        match Form::<Vec<(String, String)>>::from_request(req, state).await {
            Ok(Form(pairs)) => Ok(pairs.into_iter().collect()),
            Err(e) => {
                debug!("Unreadable form body: {}", e);
                Ok(QuoteForm::default())
            }
        }
    }
}

async fn read_multipart(mut multipart: Multipart) -> QuoteForm {
    let mut form = QuoteForm::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                debug!("Stopped reading multipart body: {}", e);
                break;
            }
        };

        // File uploads are not part of the quote form
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        match field.text().await {
            Ok(value) => form.set_field(&name, value),
            Err(e) => {
                debug!("Failed to read multipart field {}: {}", name, e);
                break;
            }
        }
    }

    form
}

// ==================== Handlers ====================

/// Request context kept for the submission log.
struct ClientInfo {
    ip: Option<String>,
    user_agent: Option<String>,
}

async fn submit_quote(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    query: Option<Query<LanguageQuery>>,
    headers: HeaderMap,
    form: QuoteForm,
) -> QuoteReply {
    let language = form
        .language()
        .or_else(|| LanguageQuery::resolve(query))
        .unwrap_or_default();

    let client = ClientInfo {
        ip: connect_info.map(|ConnectInfo(addr)| addr.ip().to_string()),
        user_agent: headers
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned),
    };

    match process_submission(&state, &form, language, client).await {
        Ok(_) => QuoteReply::success(language),
        Err(e) => e.into_reply(language),
    }
}

async fn process_submission(
    state: &AppState,
    form: &QuoteForm,
    language: Language,
    client: ClientInfo,
) -> Result<u64, SubmitError> {
    let quote = form.validate().map_err(|field| {
        debug!("Rejected quote request: invalid {}", field.field());
        field
    })?;

    let record = SubmissionRecord::new(&quote, language, client.ip, client.user_agent);
    store_quote(state, &quote, record).await
}

async fn store_quote(
    state: &AppState,
    quote: &QuoteRequest,
    record: SubmissionRecord,
) -> Result<u64, SubmitError> {
    match state.store.save(quote).await {
        Ok(id) => {
            info!(
                "✓ Stored quote request #{} ({}, source: {})",
                id,
                quote.service,
                if quote.source_page.is_empty() { "-" } else { quote.source_page.as_str() }
            );
            state
                .submission_log
                .record(SubmissionStatus::Stored, &record)
                .await;
            Ok(id)
        }
        Err(e) => {
            error!("Failed to store quote request: {}", e);
            state
                .submission_log
                .record(e.log_status(), &record.with_error(&e))
                .await;
            Err(e.into())
        }
    }
}

async fn method_not_allowed(query: Option<Query<LanguageQuery>>) -> Response {
    let language = LanguageQuery::resolve(query).unwrap_or_default();
    warn!("Rejected non-POST request to {}", SUBMIT_QUOTE_PATH);

    let mut response = SubmitError::MethodNotAllowed
        .into_reply(language)
        .into_response();
    response
        .headers_mut()
        .insert(ALLOW, HeaderValue::from_static("POST"));
    response
}
