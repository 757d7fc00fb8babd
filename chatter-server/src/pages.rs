use std::sync::Arc;

use axum::Form;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use chatter_common::ChatterError;
use chatter_pipeline::RawQuery;

use crate::AppState;
use crate::templates::{render_form, render_results};

pub(crate) async fn form_page() -> Html<String> {
    Html(render_form(&RawQuery::default(), None))
}

pub(crate) async fn form_submit(
    State(state): State<Arc<AppState>>,
    Form(query): Form<RawQuery>,
) -> Response {
    match state.pipeline.run(&query, true).await {
        Ok(report) => Html(render_results(&query, &report)).into_response(),
        Err(ChatterError::Validation(e)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(render_form(&query, Some(&e.to_string()))),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "form request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render_form(&query, Some(&e.to_string()))),
            )
                .into_response()
        }
    }
}
