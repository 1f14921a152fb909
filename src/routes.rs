//! Axum handlers for the three read endpoints.
//!
//! Validation happens entirely up front: the normalizer, sort resolver and
//! pagination calculator all run before any store access, and their failures
//! are merged so the client sees every offending parameter at once.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{FromRequestParts, Query, State},
    http::request::Parts,
    routing::get,
};
use chrono::Utc;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::facets::{self, FacetToggles, FilterOptionsData};
use crate::filtering::{self, PageSpec, RawParams, sort};
use crate::models::{ApiResponse, ApplicationListData};
use crate::stats::{self, StatsData};
use crate::store::ApplicationStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ApplicationStore>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn ApplicationStore>) -> Self {
        Self { store }
    }
}

/// Authenticated identity, installed as a request extension by the auth
/// middleware that owns session handling. Missing extension means 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub Uuid);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .copied()
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

/// Build the read-side router for job applications.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/job-applications", get(list_applications))
        .route("/job-applications/filter-options", get(get_filter_options))
        .route("/job-applications/stats", get(get_stats))
        .with_state(state)
}

async fn list_applications(
    CurrentUser(user_id): CurrentUser,
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ApiResponse<ApplicationListData>>, ApiError> {
    let params = RawParams::new(&pairs);

    let spec_res = filtering::normalize(user_id, &pairs);
    let sort_res = sort::resolve(params.first("sortBy"), params.first("sortOrder"));
    let page_res = PageSpec::from_raw(params.first("page"), params.first("limit"));

    let (spec, sort, page) = match (spec_res, sort_res, page_res) {
        (Ok(spec), Ok(sort), Ok(page)) => (spec, sort, page),
        (spec_res, sort_res, page_res) => {
            let mut errors = Vec::new();
            if let Err(e) = spec_res {
                errors.extend(e);
            }
            if let Err(e) = sort_res {
                errors.push(e);
            }
            if let Err(e) = page_res {
                errors.extend(e);
            }
            return Err(ApiError::validation(errors));
        }
    };

    let predicate = filtering::compile(&spec, Utc::now());

    // Rows and total have no ordering dependency; issue them together.
    let (rows, total) = tokio::try_join!(
        state
            .store
            .find_many(&predicate, &sort, page.skip(), page.limit),
        state.store.count(&predicate),
    )?;

    tracing::debug!(total, page = page.page, "listed job applications");

    Ok(Json(ApiResponse::ok(ApplicationListData {
        job_applications: rows,
        pagination: page.metadata(total),
    })))
}

async fn get_filter_options(
    CurrentUser(user_id): CurrentUser,
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ApiResponse<FilterOptionsData>>, ApiError> {
    let toggles =
        FacetToggles::from_raw(&RawParams::new(&pairs)).map_err(ApiError::validation)?;
    let data = facets::filter_options(state.store.as_ref(), user_id, toggles).await?;
    Ok(Json(ApiResponse::ok(data)))
}

async fn get_stats(
    CurrentUser(user_id): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<StatsData>>, ApiError> {
    let data = stats::stats(state.store.as_ref(), user_id).await?;
    Ok(Json(ApiResponse::ok(data)))
}
