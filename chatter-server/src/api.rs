use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chatter_common::ChatterError;
use chatter_pipeline::{RawQuery, SummaryOutcome};
use serde::{Deserialize, Serialize};

use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub summary: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

fn error(status: StatusCode, message: impl ToString) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}

pub(crate) async fn summarize(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RawQuery>, JsonRejection>,
) -> Response {
    let query = match body {
        Ok(Json(query)) => query,
        Err(JsonRejection::JsonDataError(e)) => {
            return error(StatusCode::UNPROCESSABLE_ENTITY, e.body_text());
        }
        Err(rejection) => return error(rejection.status(), rejection.body_text()),
    };
    let report = match state.pipeline.run(&query, true).await {
        Ok(report) => report,
        Err(ChatterError::Validation(e)) => return error(StatusCode::UNPROCESSABLE_ENTITY, e),
        Err(e) => {
            tracing::error!(error = %e, "summarize request failed");
            return error(StatusCode::INTERNAL_SERVER_ERROR, e);
        }
    };

    let warnings = report.warning_messages();
    match report.summary {
        SummaryOutcome::Done(summary) => Json(SummarizeResponse {
            summary: summary.plain_text(),
            warnings,
        })
        .into_response(),
        SummaryOutcome::Failed(e) => error(StatusCode::BAD_GATEWAY, e),
        SummaryOutcome::Skipped => error(StatusCode::INTERNAL_SERVER_ERROR, "summary was not produced"),
    }
}
