//! Presentation seam and the centralized error page.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use serde_json::json;

use crate::error::{AppError, ErrorReport};

/// View name rendered for every error response.
pub const ERROR_VIEW: &str = "error";

/// Renders a named view with a data payload into an HTML document.
pub trait ViewRenderer: Send + Sync {
    fn render(&self, view: &str, data: &serde_json::Value) -> anyhow::Result<String>;
}

/// Render `view` with `data` as an HTML response.
pub fn render_page<T: serde::Serialize>(
    renderer: &dyn ViewRenderer,
    view: &str,
    data: &T,
) -> Result<Response, AppError> {
    let data = serde_json::to_value(data)
        .map_err(|e| anyhow::anyhow!("failed to serialize data for view '{view}': {e}"))?;
    let html = renderer.render(view, &data)?;
    Ok(Html(html).into_response())
}

/// State for [`render_error_pages`].
#[derive(Clone)]
pub struct ErrorPages {
    renderer: Arc<dyn ViewRenderer>,
    expose_details: bool,
}

impl ErrorPages {
    pub fn new(renderer: Arc<dyn ViewRenderer>, expose_details: bool) -> Self {
        Self {
            renderer,
            expose_details,
        }
    }

    fn render(&self, report: &ErrorReport) -> Response {
        let reason = report.status.canonical_reason().unwrap_or("Error");
        let message = if self.expose_details {
            report.message.as_str()
        } else {
            reason
        };
        let data = json!({
            "title": reason,
            "status": report.status.as_u16(),
            "message": message,
            "detail": if self.expose_details {
                json!({
                    "code": report.code,
                    "trace_id": report.trace_id,
                    "timestamp": report.timestamp
                })
            } else {
                serde_json::Value::Null
            },
        });

        match self.renderer.render(ERROR_VIEW, &data) {
            Ok(html) => (report.status, Html(html)).into_response(),
            Err(err) => {
                tracing::error!(error = %err, "failed to render error view");
                (report.status, message.to_string()).into_response()
            }
        }
    }
}

/// Middleware turning every [`AppError`] response, and the bare response of
/// a timed-out request, into the rendered error view.
pub async fn render_error_pages(
    State(pages): State<ErrorPages>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if let Some(report) = response.extensions().get::<ErrorReport>() {
        return pages.render(report);
    }
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        return pages.render(&AppError::timeout("Request timed out").report());
    }
    response
}

/// Fallback for unmatched routes.
pub async fn not_found_fallback() -> AppError {
    AppError::not_found("Not Found")
}
