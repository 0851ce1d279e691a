use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::{
    error::{AppError, HtmlError},
    repository,
    state::AppState,
};

pub async fn get_receipt(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> Result<Response, HtmlError> {
    let not_found = || AppError::NotFound("Comprovante não encontrado".into());

    if !repository::transaction::receipt_exists(&state.db, &file).await? {
        return Err(not_found().into());
    }

    let data = match state.storage.load_receipt(&file).await {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!("receipt {file} is referenced but unreadable: {e}");
            return Err(not_found().into());
        },
    };

    Ok((
        [
            (header::CONTENT_TYPE, storage::content_type(&file)),
            (header::CACHE_CONTROL, "private, max-age=86400"),
        ],
        data,
    )
        .into_response())
}
