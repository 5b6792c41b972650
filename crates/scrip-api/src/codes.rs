//! Handlers for the promo-code endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/codes` | Active codes, newest-updated-first |
//! | `POST`   | `/codes` | 201 with the stored record |
//! | `GET`    | `/codes/{id}` | Served through the cache; 404 if not active |
//! | `PUT`    | `/codes/{id}` | Sparse body; absent fields keep their value |
//! | `DELETE` | `/codes/{id}` | Soft delete; 204 even if the id is unknown |
//! | `POST`   | `/codes/{id}/deactivate` | 204, or 404 for an unknown id |
//! | `POST`   | `/redeem/{code}` | 200 with the decremented record |
//! | `GET`    | `/availability/{code}` | Remaining uses of an active code |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use scrip_cache::CacheStore;
use scrip_core::{
  code::{CodeStatus, NewPromoCode, PromoCode},
  patch::PromoCodePatch,
  store::{CodeStore, VersionStore},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Actor recorded when a mutating request names nobody.
const DEFAULT_ACTOR: &str = "system";

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /codes`
pub async fn list<S, C>(
  State(state): State<AppState<S, C>>,
) -> Result<Json<Vec<PromoCode>>, ApiError>
where
  S: CodeStore + VersionStore + 'static,
  C: CacheStore + 'static,
{
  let codes = state
    .engine
    .active_codes()
    .await
    .map_err(ApiError::from_engine)?;
  Ok(Json(codes))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:           String,
  pub code:           String,
  pub max_uses:       u32,
  /// Defaults to `max_uses` when absent.
  pub remaining_uses: Option<u32>,
  /// Defaults to `active` when absent.
  pub status:         Option<CodeStatus>,
  pub tenant_id:      Uuid,
  pub created_by:     String,
}

/// `POST /codes`
pub async fn create<S, C>(
  State(state): State<AppState<S, C>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CodeStore + VersionStore + 'static,
  C: CacheStore + 'static,
{
  let input = NewPromoCode {
    name:           body.name,
    code:           body.code,
    remaining_uses: body.remaining_uses.unwrap_or(body.max_uses),
    max_uses:       body.max_uses,
    status:         body.status.unwrap_or(CodeStatus::Active),
    tenant_id:      body.tenant_id,
    created_by:     body.created_by,
  };

  let stored = state
    .engine
    .create(input)
    .await
    .map_err(ApiError::from_engine)?;
  Ok((StatusCode::CREATED, Json(stored)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /codes/{id}`
pub async fn get_one<S, C>(
  State(state): State<AppState<S, C>>,
  Path(id): Path<Uuid>,
) -> Result<Json<PromoCode>, ApiError>
where
  S: CodeStore + VersionStore + 'static,
  C: CacheStore + 'static,
{
  let code = state
    .engine
    .code_by_id(id)
    .await
    .map_err(ApiError::from_engine)?
    .ok_or_else(|| ApiError::NotFound(format!("promo code {id} not found")))?;
  Ok(Json(code))
}

// ─── Update ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub name:           Option<String>,
  pub code:           Option<String>,
  pub remaining_uses: Option<u32>,
  pub max_uses:       Option<u32>,
  pub status:         Option<CodeStatus>,
  pub updated_by:     Option<String>,
}

/// `PUT /codes/{id}` — sparse update; only fields present in the body change.
pub async fn update_one<S, C>(
  State(state): State<AppState<S, C>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<PromoCode>, ApiError>
where
  S: CodeStore + VersionStore + 'static,
  C: CacheStore + 'static,
{
  // Tenancy is fixed at creation; the API never re-homes a record.
  let patch = PromoCodePatch {
    id,
    name: body.name,
    code: body.code,
    remaining_uses: body.remaining_uses,
    max_uses: body.max_uses,
    status: body.status,
    tenant_id: None,
    updated_by: body.updated_by,
  };

  let merged = state
    .engine
    .update(patch)
    .await
    .map_err(ApiError::from_engine)?;
  Ok(Json(merged))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ActorBody {
  pub updated_by: Option<String>,
}

/// `DELETE /codes/{id}` — soft delete. Responds 204 whether or not the id
/// exists; deleting an absent record is a no-op, not a fault.
pub async fn delete_one<S, C>(
  State(state): State<AppState<S, C>>,
  Path(id): Path<Uuid>,
  body: Option<Json<ActorBody>>,
) -> Result<StatusCode, ApiError>
where
  S: CodeStore + VersionStore + 'static,
  C: CacheStore + 'static,
{
  let actor = actor_from(body);
  state
    .engine
    .delete(id, &actor)
    .await
    .map_err(ApiError::from_engine)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Deactivate ───────────────────────────────────────────────────────────────

/// `POST /codes/{id}/deactivate`
pub async fn deactivate_one<S, C>(
  State(state): State<AppState<S, C>>,
  Path(id): Path<Uuid>,
  body: Option<Json<ActorBody>>,
) -> Result<StatusCode, ApiError>
where
  S: CodeStore + VersionStore + 'static,
  C: CacheStore + 'static,
{
  let actor = actor_from(body);
  let done = state
    .engine
    .deactivate(id, &actor)
    .await
    .map_err(ApiError::from_engine)?;
  if done {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("promo code {id} not found")))
  }
}

fn actor_from(body: Option<Json<ActorBody>>) -> String {
  body
    .and_then(|Json(b)| b.updated_by)
    .unwrap_or_else(|| DEFAULT_ACTOR.to_owned())
}

// ─── Redeem ───────────────────────────────────────────────────────────────────

/// `POST /redeem/{code}` — burn one use. 400 when the code is exhausted,
/// 404 when no active code matches.
pub async fn redeem<S, C>(
  State(state): State<AppState<S, C>>,
  Path(code): Path<String>,
) -> Result<Json<PromoCode>, ApiError>
where
  S: CodeStore + VersionStore + 'static,
  C: CacheStore + 'static,
{
  let after = state
    .engine
    .redeem(&code)
    .await
    .map_err(ApiError::from_engine)?;
  Ok(Json(after))
}

// ─── Availability ─────────────────────────────────────────────────────────────

/// `GET /availability/{code}`
pub async fn availability<S, C>(
  State(state): State<AppState<S, C>>,
  Path(code): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: CodeStore + VersionStore + 'static,
  C: CacheStore + 'static,
{
  let remaining = state
    .engine
    .check_availability(&code)
    .await
    .map_err(ApiError::from_engine)?
    .ok_or_else(|| ApiError::NotFound(format!("promo code {code:?} not found")))?;
  Ok(Json(json!({ "code": code, "remaining_uses": remaining })))
}
