//! HTTP surface: the upload route, the static upload page and response
//! rendering.
//!
//! The router answers 405 to non-POST methods on `/upload` by construction;
//! every pipeline failure maps to a 500 whose body is the error's display
//! text. Success renders the HTML fragment the upload page injects.

use std::sync::Arc;

use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use gist_drop_core::contract::VersionControl;
use gist_drop_core::error::{Error, InputError};
use gist_drop_core::git::GitCli;
use gist_drop_core::publish::{publish, IncomingFile, PublishReport};

use crate::config::Config;

/// Combined multipart payload ceiling: 32 MiB.
pub const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Shared state behind the upload handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub vcs: Arc<dyn VersionControl>,
}

impl AppState {
    /// Production wiring: the git CLI driver under the configured deadline.
    pub fn new(config: Config) -> Self {
        let vcs = Arc::new(GitCli::new(config.git_timeout));
        Self {
            config: Arc::new(config),
            vcs,
        }
    }

    /// Wiring with an injected port implementation, for tests.
    pub fn with_vcs(config: Config, vcs: Arc<dyn VersionControl>) -> Self {
        Self {
            config: Arc::new(config),
            vcs,
        }
    }
}

/// Builds the application router: `POST /upload` plus the static fallback
/// serving the upload page.
pub fn router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();
    Router::new()
        .route(
            "/upload",
            post(upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Pipeline failure carried to the HTTP edge. Everything is a 500; the only
/// 4xx the service produces is the router-level 405.
pub struct AppError(Error);

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "upload failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string()).into_response()
    }
}

fn form_parse_error(detail: String) -> AppError {
    AppError(InputError::FormParse(detail).into())
}

/// `POST /upload`: extract every part named `file`, run the publish
/// pipeline, render the success fragment.
async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Html<String>, AppError> {
    let mut multipart = multipart.map_err(|rejection| form_parse_error(rejection.body_text()))?;

    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e: MultipartError| form_parse_error(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        // A `file` part without a filename is a plain form value, not an upload.
        let Some(filename) = field.file_name().map(ToOwned::to_owned) else {
            continue;
        };
        let content = field
            .bytes()
            .await
            .map_err(|e| form_parse_error(e.body_text()))?;
        files.push(IncomingFile {
            name: filename,
            content: content.to_vec(),
        });
    }

    let report = publish(&state.config.publish, state.vcs.as_ref(), &files).await?;
    info!(
        commit = %report.commit,
        files = report.files.len(),
        "upload published"
    );

    let view_url = state.config.publish.remote.view_url();
    Ok(Html(success_fragment(&view_url, &report)))
}

/// The fragment the upload page injects: a gist view link and one direct
/// link per published file, in upload order.
fn success_fragment(view_url: &str, report: &PublishReport) -> String {
    let mut html = format!(
        "<div class=\"success\">\n  Files uploaded successfully! \
         <a href=\"{}\" target=\"_blank\">View Gist</a><br><br>\n  Direct links:<br>\n",
        escape_html(view_url)
    );
    for file in &report.files {
        html.push_str(&format!(
            "  <a href=\"{}\" target=\"_blank\">{}</a><br>\n",
            escape_html(&file.raw_url),
            escape_html(&file.filename)
        ));
    }
    html.push_str("</div>");
    html
}

/// Filenames pass validation with `<`, `>` and `"` in them, so every value
/// interpolated into the fragment is escaped for both text and attribute
/// positions.
fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
