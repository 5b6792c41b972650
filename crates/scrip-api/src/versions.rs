//! Handlers for the audit-trail endpoints.
//!
//! The log is append-only: `PUT /versions` and `DELETE /versions/{id}` stay
//! routed for older clients but always answer 501.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use scrip_cache::CacheStore;
use scrip_core::{
  store::{CodeStore, VersionStore},
  version::{NewObjectVersion, ObjectVersion},
};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

// ─── Reads ────────────────────────────────────────────────────────────────────

/// `GET /versions` — the whole log, newest-first.
pub async fn list<S, C>(
  State(state): State<AppState<S, C>>,
) -> Result<Json<Vec<ObjectVersion>>, ApiError>
where
  S: CodeStore + VersionStore + 'static,
  C: CacheStore + 'static,
{
  let versions = state.versions.all().await.map_err(ApiError::from_engine)?;
  Ok(Json(versions))
}

/// `GET /versions/object/{object_id}` — records for one object, any type or
/// tenant.
pub async fn by_object_id<S, C>(
  State(state): State<AppState<S, C>>,
  Path(object_id): Path<Uuid>,
) -> Result<Json<Vec<ObjectVersion>>, ApiError>
where
  S: CodeStore + VersionStore + 'static,
  C: CacheStore + 'static,
{
  let versions = state
    .versions
    .by_object_id(object_id)
    .await
    .map_err(ApiError::from_engine)?;
  Ok(Json(versions))
}

/// `GET /versions/of/{object_type}/{tenant_id}/{object_id}` — records for
/// one fully-qualified object identity.
pub async fn by_object<S, C>(
  State(state): State<AppState<S, C>>,
  Path((object_type, tenant_id, object_id)): Path<(String, Uuid, Uuid)>,
) -> Result<Json<Vec<ObjectVersion>>, ApiError>
where
  S: CodeStore + VersionStore + 'static,
  C: CacheStore + 'static,
{
  let versions = state
    .versions
    .by_object(&object_type, tenant_id, object_id)
    .await
    .map_err(ApiError::from_engine)?;
  Ok(Json(versions))
}

// ─── Append ───────────────────────────────────────────────────────────────────

/// `POST /versions` — append a record by hand. Promo-code mutations audit
/// themselves; this covers other object types.
pub async fn append<S, C>(
  State(state): State<AppState<S, C>>,
  Json(body): Json<NewObjectVersion>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CodeStore + VersionStore + 'static,
  C: CacheStore + 'static,
{
  let stored = state
    .versions
    .append(body)
    .await
    .map_err(ApiError::from_engine)?;
  Ok((StatusCode::CREATED, Json(stored)))
}

// ─── Legacy slots ─────────────────────────────────────────────────────────────

/// `PUT /versions` — always 501.
pub async fn update_one<S, C>(
  State(state): State<AppState<S, C>>,
  Json(body): Json<ObjectVersion>,
) -> Result<Json<ObjectVersion>, ApiError>
where
  S: CodeStore + VersionStore + 'static,
  C: CacheStore + 'static,
{
  let updated = state.versions.update(body).await?;
  Ok(Json(updated))
}

/// `DELETE /versions/{id}` — always 501.
pub async fn delete_one<S, C>(
  State(state): State<AppState<S, C>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: CodeStore + VersionStore + 'static,
  C: CacheStore + 'static,
{
  state.versions.delete(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
