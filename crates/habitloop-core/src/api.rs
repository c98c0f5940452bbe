//! HTTP-shaped request handler for the habit collection.
//!
//! The handler is transport-agnostic: a host (web server, IPC bridge, test)
//! turns its request into an [`ApiRequest`], calls [`handle`], and writes the
//! returned [`ApiResponse`] back. Paths may carry an `/api` prefix and a
//! query string, both ignored.
//!
//! | method | path                              | success |
//! |--------|-----------------------------------|---------|
//! | GET    | `/habits`                         | 200     |
//! | POST   | `/habits`                         | 201     |
//! | GET    | `/habits/{id}`                    | 200     |
//! | DELETE | `/habits/{id}`                    | 204     |
//! | PUT    | `/habits/{id}/progress/{date}`    | 200     |

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::CoreError;
use crate::habit::{parse_day, HabitDraft};
use crate::storage::HabitStore;
use crate::tracker::HabitTracker;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiRequest {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    /// `None` for 204 responses.
    pub body: Option<Value>,
}

impl ApiResponse {
    fn json(status: u16, body: impl Serialize) -> Self {
        match serde_json::to_value(body) {
            Ok(body) => Self {
                status,
                body: Some(body),
            },
            Err(e) => ApiError::new(format!("failed to encode response: {e}")).into_response(500),
        }
    }

    fn no_content() -> Self {
        Self {
            status: 204,
            body: None,
        }
    }

    pub fn status_line(&self) -> &'static str {
        match self.status {
            200 => "200 OK",
            201 => "201 Created",
            204 => "204 No Content",
            400 => "400 Bad Request",
            404 => "404 Not Found",
            405 => "405 Method Not Allowed",
            _ => "500 Internal Server Error",
        }
    }
}

/// Error payload: `{ "message": ..., "field": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
        }
    }

    fn into_response(self, status: u16) -> ApiResponse {
        ApiResponse {
            status,
            body: Some(json!(self)),
        }
    }
}

impl From<&CoreError> for ApiResponse {
    fn from(err: &CoreError) -> Self {
        match err {
            CoreError::Validation(v) => ApiError {
                message: v.to_string(),
                field: v.field().map(str::to_string),
            }
            .into_response(400),
            CoreError::NotFound { .. } => ApiError::new(err.to_string()).into_response(404),
            _ => {
                tracing::error!("api request failed: {err}");
                ApiError::new(err.to_string()).into_response(500)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProgressBody {
    completed: bool,
}

enum Route<'p> {
    Habits,
    Habit(&'p str),
    Progress(&'p str, &'p str),
}

fn route(path: &str) -> Option<Route<'_>> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.first() == Some(&"api") {
        segments.remove(0);
    }
    match segments.as_slice() {
        ["habits"] => Some(Route::Habits),
        ["habits", id] => Some(Route::Habit(*id)),
        ["habits", id, "progress", date] => Some(Route::Progress(*id, *date)),
        _ => None,
    }
}

/// Dispatch one request against `tracker`. Never fails; errors become
/// 4xx/5xx responses.
pub fn handle<S: HabitStore>(
    tracker: &mut HabitTracker<S>,
    request: &ApiRequest,
    today: NaiveDate,
) -> ApiResponse {
    let method = request.method.to_ascii_uppercase();
    tracing::debug!(%method, path = %request.path, "api request");

    let Some(route) = route(&request.path) else {
        return ApiError::new(format!("no route for {}", request.path)).into_response(404);
    };

    match (route, method.as_str()) {
        (Route::Habits, "GET") => ApiResponse::json(200, tracker.habits().collect::<Vec<_>>()),
        (Route::Habits, "POST") => {
            let draft: HabitDraft = match parse_body(request) {
                Ok(draft) => draft,
                Err(resp) => return resp,
            };
            match tracker.create(draft, today) {
                Ok(habit) => ApiResponse::json(201, habit),
                Err(e) => ApiResponse::from(&e),
            }
        }
        (Route::Habit(id), "GET") => match tracker.get(id) {
            Some(habit) => ApiResponse::json(200, habit),
            None => ApiResponse::from(&CoreError::NotFound { id: id.to_string() }),
        },
        (Route::Habit(id), "DELETE") => match tracker.delete(id) {
            Ok(_) => ApiResponse::no_content(),
            Err(e) => ApiResponse::from(&e),
        },
        (Route::Progress(id, raw_date), "PUT") => {
            let Some(date) = parse_day(raw_date) else {
                return ApiError {
                    message: format!("invalid date: {raw_date}"),
                    field: Some("date".into()),
                }
                .into_response(400);
            };
            let body: ProgressBody = match parse_body(request) {
                Ok(body) => body,
                Err(resp) => return resp,
            };
            match tracker.set_progress(id, date, body.completed) {
                Ok(habit) => ApiResponse::json(200, habit),
                Err(e) => ApiResponse::from(&e),
            }
        }
        (_, other) => ApiError::new(format!("method {other} not allowed")).into_response(405),
    }
}

fn parse_body<T: for<'de> Deserialize<'de>>(request: &ApiRequest) -> Result<T, ApiResponse> {
    let raw = request.body.as_deref().unwrap_or_default();
    serde_json::from_str(raw)
        .map_err(|e| ApiError::new(format!("invalid request body: {e}")).into_response(400))
}
