//! Page view, edit and save endpoints.

use std::sync::Arc;

use axum::Form;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Response};
use fw_wiki::Title;
use serde::Deserialize;

use crate::error::ServerError;
use crate::handlers::found;
use crate::state::AppState;

/// Body of POST /save/{title}.
#[derive(Debug, Deserialize)]
pub(crate) struct SaveForm {
    /// New page body. A missing field saves an empty page.
    #[serde(default)]
    body: String,
}

fn parse_title(raw: &str) -> Result<Title, ServerError> {
    Title::parse(raw).map_err(|source| ServerError::InvalidTitle {
        path: raw.to_owned(),
        source,
    })
}

/// Handle GET /view/{title}.
///
/// Missing or unreadable pages redirect to the edit form.
pub(crate) async fn view_page(
    State(state): State<Arc<AppState>>,
    Path(raw): Path<String>,
) -> Result<Response, ServerError> {
    let title = parse_title(&raw)?;

    match state.wiki.view(&title) {
        Ok(page) => Ok(Html(state.templates.render_view(&page)?).into_response()),
        Err(err) => {
            tracing::debug!(title = %title, error = %err, "Page not viewable, redirecting to editor");
            Ok(found(&title.edit_path()))
        }
    }
}

/// Handle GET /edit/{title}.
pub(crate) async fn edit_page(
    State(state): State<Arc<AppState>>,
    Path(raw): Path<String>,
) -> Result<Html<String>, ServerError> {
    let title = parse_title(&raw)?;
    let page = state.wiki.edit(&title);
    Ok(Html(state.templates.render_edit(&page)?))
}

/// Handle POST /save/{title}.
///
/// Saves the page, links its title across the wiki and redirects to the
/// view page. Link failures are logged but don't fail the request.
pub(crate) async fn save_page(
    State(state): State<Arc<AppState>>,
    Path(raw): Path<String>,
    Form(form): Form<SaveForm>,
) -> Result<Response, ServerError> {
    let title = parse_title(&raw)?;
    let wiki = Arc::clone(&state.wiki);

    let outcome = tokio::task::spawn_blocking(move || wiki.save(title, form.body)).await??;

    Ok(found(&outcome.page.title().view_path()))
}
