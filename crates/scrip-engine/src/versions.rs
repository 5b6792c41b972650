//! [`VersionLog`] — read surface over the append-only audit trail.

use std::sync::Arc;

use scrip_core::{
  store::VersionStore,
  version::{NewObjectVersion, ObjectVersion},
};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Thin service over a [`VersionStore`]. Exists so the HTTP layer depends on
/// services rather than on storage traits directly.
pub struct VersionLog<S> {
  store: Arc<S>,
}

impl<S: VersionStore> VersionLog<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Append a record by hand. The promo-code mutations write their own audit
  /// records; this path covers other object types.
  pub async fn append(
    &self,
    input: NewObjectVersion,
  ) -> Result<ObjectVersion, S::Error> {
    self.store.append_version(input).await.map_err(Error::Store)
  }

  pub async fn all(&self) -> Result<Vec<ObjectVersion>, S::Error> {
    self.store.all_versions().await.map_err(Error::Store)
  }

  pub async fn by_object(
    &self,
    object_type: &str,
    object_tenant: Uuid,
    object_id: Uuid,
  ) -> Result<Vec<ObjectVersion>, S::Error> {
    self
      .store
      .versions_by_object(object_type, object_tenant, object_id)
      .await
      .map_err(Error::Store)
  }

  pub async fn by_object_id(
    &self,
    object_id: Uuid,
  ) -> Result<Vec<ObjectVersion>, S::Error> {
    self
      .store
      .versions_by_object_id(object_id)
      .await
      .map_err(Error::Store)
  }

  /// Legacy slot; always refuses.
  pub async fn update(
    &self,
    version: ObjectVersion,
  ) -> scrip_core::Result<ObjectVersion> {
    self.store.update_version(version).await
  }

  /// Legacy slot; always refuses.
  pub async fn delete(&self, id: Uuid) -> scrip_core::Result<bool> {
    self.store.delete_version(id).await
  }
}
