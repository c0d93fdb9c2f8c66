//! Ordered collection routes.
//!
//! Every collection shares one set of handlers; the `{collection}` segment
//! picks the record type and the handler body runs against it.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::instrument;

use agency_core::{
    Category, Client, Collection, Direction, GalleryItem, JobListing, PortfolioItem, RecordId,
    Service, TeamMember, group_by_category,
};

use crate::db::{OrderedCollection, PgRecord, RecordStore};
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Run `$body` with `$record` aliased to the record type of `$collection`.
macro_rules! with_record_type {
    ($collection:expr, $record:ident => $body:expr) => {
        match $collection {
            Collection::Team => {
                type $record = TeamMember;
                $body
            }
            Collection::Categories => {
                type $record = Category;
                $body
            }
            Collection::Services => {
                type $record = Service;
                $body
            }
            Collection::Clients => {
                type $record = Client;
                $body
            }
            Collection::Portfolio => {
                type $record = PortfolioItem;
                $body
            }
            Collection::Gallery => {
                type $record = GalleryItem;
                $body
            }
            Collection::Careers => {
                type $record = JobListing;
                $body
            }
        }
    };
}

/// Build the collection router.
pub fn router<S: RecordStore>() -> Router<AppState<S>> {
    Router::new()
        // Public read
        .route("/api/content/team/grouped", get(team_grouped::<S>))
        .route("/api/content/{collection}", get(list::<S>))
        // Admin
        .route("/api/admin/collections/{collection}", post(create::<S>))
        .route(
            "/api/admin/collections/{collection}/{id}",
            put(update::<S>).delete(remove::<S>),
        )
        .route(
            "/api/admin/collections/{collection}/{id}/move",
            post(move_record::<S>),
        )
        .route(
            "/api/admin/collections/{collection}/{id}/position",
            put(set_position::<S>),
        )
}

// =============================================================================
// Request Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub direction: Direction,
}

#[derive(Debug, Deserialize)]
pub struct PositionRequest {
    pub order_index: i32,
}

fn parse_collection(slug: &str) -> Result<Collection, AppError> {
    slug.parse().map_err(AppError::NotFound)
}

fn decode<R: PgRecord>(body: JsonValue) -> Result<R, AppError> {
    serde_json::from_value(body)
        .map_err(|e| AppError::BadRequest(format!("invalid {} record: {e}", R::COLLECTION)))
}

// =============================================================================
// Handlers
// =============================================================================

/// List a collection in display order.
#[instrument(skip(state))]
async fn list<S: RecordStore>(
    State(state): State<AppState<S>>,
    Path(collection): Path<String>,
) -> Result<Response, AppError> {
    let collection = parse_collection(&collection)?;
    with_record_type!(collection, R => {
        let items = OrderedCollection::<S, R>::new(state.store()).list().await?;
        Ok(Json(items).into_response())
    })
}

/// Team members bucketed by category.
#[instrument(skip(state))]
async fn team_grouped<S: RecordStore>(
    State(state): State<AppState<S>>,
) -> Result<Response, AppError> {
    let members = OrderedCollection::<S, TeamMember>::new(state.store())
        .list()
        .await?;
    let categories = OrderedCollection::<S, Category>::new(state.store())
        .list()
        .await?;
    Ok(Json(group_by_category(&members, &categories)).into_response())
}

/// Append a record at the tail of a collection.
#[instrument(skip(state, _admin, body))]
async fn create<S: RecordStore>(
    State(state): State<AppState<S>>,
    _admin: RequireAdmin,
    Path(collection): Path<String>,
    Json(body): Json<JsonValue>,
) -> Result<Response, AppError> {
    let collection = parse_collection(&collection)?;
    with_record_type!(collection, R => {
        let record = decode::<R>(body)?;
        let stored = OrderedCollection::<S, R>::new(state.store()).append(record).await?;
        Ok((StatusCode::CREATED, Json(stored)).into_response())
    })
}

/// Replace a record's fields.
#[instrument(skip(state, _admin, body))]
async fn update<S: RecordStore>(
    State(state): State<AppState<S>>,
    _admin: RequireAdmin,
    Path((collection, id)): Path<(String, RecordId)>,
    Json(body): Json<JsonValue>,
) -> Result<Response, AppError> {
    let collection = parse_collection(&collection)?;
    with_record_type!(collection, R => {
        let record = decode::<R>(body)?;
        let stored = OrderedCollection::<S, R>::new(state.store()).update(id, record).await?;
        Ok(Json(stored).into_response())
    })
}

/// Delete a record.
#[instrument(skip(state, _admin))]
async fn remove<S: RecordStore>(
    State(state): State<AppState<S>>,
    _admin: RequireAdmin,
    Path((collection, id)): Path<(String, RecordId)>,
) -> Result<StatusCode, AppError> {
    let collection = parse_collection(&collection)?;
    with_record_type!(collection, R => {
        OrderedCollection::<S, R>::new(state.store()).remove(id).await?;
    });
    Ok(StatusCode::NO_CONTENT)
}

/// Move a record one step and return the reordered list.
#[instrument(skip(state, _admin))]
async fn move_record<S: RecordStore>(
    State(state): State<AppState<S>>,
    _admin: RequireAdmin,
    Path((collection, id)): Path<(String, RecordId)>,
    Json(request): Json<MoveRequest>,
) -> Result<Response, AppError> {
    let collection = parse_collection(&collection)?;
    with_record_type!(collection, R => {
        let items = OrderedCollection::<S, R>::new(state.store())
            .reorder(id, request.direction)
            .await?;
        Ok(Json(items).into_response())
    })
}

/// Put a record at an explicit `order_index`.
#[instrument(skip(state, _admin))]
async fn set_position<S: RecordStore>(
    State(state): State<AppState<S>>,
    _admin: RequireAdmin,
    Path((collection, id)): Path<(String, RecordId)>,
    Json(request): Json<PositionRequest>,
) -> Result<Response, AppError> {
    let collection = parse_collection(&collection)?;
    with_record_type!(collection, R => {
        let stored = OrderedCollection::<S, R>::new(state.store())
            .set_order_index(id, request.order_index)
            .await?;
        Ok(Json(stored).into_response())
    })
}
