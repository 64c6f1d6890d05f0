//! Mutation controller: create/update/delete and optimistic field patches.
//!
//! Two write styles are supported:
//!
//! - **Optimistic** ([`MutationController::patch_field`]): the new value is
//!   written into the held row first, then sent. A failed write restores the
//!   exact pre-patch row.
//! - **Refresh-after-write** (`create`, `update`, `remove`): local rows are
//!   never touched directly. A confirmed write triggers exactly one
//!   [`ListDataController::reload`] so totals and server-side ordering stay
//!   right.
//!
//! Every outcome is published as a [`Notification`]. A per-identifier
//! [`InFlight`] lock rejects a second mutation of the same id while the first
//! is outstanding.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use validator::Validate;

use super::in_flight::{InFlight, InFlightGuard};
use super::list_controller::ListDataController;
use crate::domain::{MutationRequest, Notification, OptimisticPatch, ResourceId};
use crate::error::SyncError;
use crate::fetch::{Fetcher, WriteMethod, envelope};
use crate::format::capitalize;
use crate::resource::{IdPlacement, UpdateMethod};

/// Write-side companion of a [`ListDataController`].
pub struct MutationController {
    list: Arc<ListDataController>,
    fetcher: Arc<dyn Fetcher>,
    in_flight: InFlight,
}

impl fmt::Debug for MutationController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutationController")
            .field("resource", &self.list.resource().name)
            .field("in_flight", &self.in_flight.len())
            .finish_non_exhaustive()
    }
}

impl MutationController {
    /// Creates a controller writing to the same resource and through the same
    /// fetcher as `list`.
    #[must_use]
    pub fn new(list: Arc<ListDataController>) -> Self {
        let fetcher = list.fetcher();
        Self {
            list,
            fetcher,
            in_flight: InFlight::new(),
        }
    }

    /// The list this controller refreshes and patches.
    #[must_use]
    pub const fn list(&self) -> &Arc<ListDataController> {
        &self.list
    }

    /// Returns `true` while a mutation for `id` is in flight. The UI uses
    /// this to disable further actions on the row.
    #[must_use]
    pub fn is_pending(&self, id: &ResourceId) -> bool {
        self.in_flight.is_busy(id)
    }

    /// Optimistically sets `field` of row `id` to `value`, then sends the
    /// change.
    ///
    /// On success a `"<Field> updated to <value> successfully!"` notification
    /// is published. On failure the row is restored to its exact pre-patch
    /// value and a `"Failed to update <field>: <reason>"` notification is
    /// published. Rows not in the current page are written remotely without a
    /// local patch.
    ///
    /// # Errors
    ///
    /// - [`SyncError::UnsupportedOperation`] if the resource has no patch
    ///   endpoint.
    /// - [`SyncError::Busy`] if a mutation for `id` is already in flight.
    /// - The transport or logical failure of the write.
    pub async fn patch_field(
        &self,
        id: &ResourceId,
        field: &str,
        value: Value,
    ) -> Result<(), SyncError> {
        let action = format!("update {field}");
        let resource = self.list.resource();
        let path = resource
            .endpoint(resource.endpoints.patch_field.as_ref(), "patch", Some(id))
            .map_err(|e| self.reject(&action, e))?;
        let _guard = self.acquire(id, &action)?;

        let request = MutationRequest::single_field(id.clone(), field, value.clone());
        let mut patch = OptimisticPatch::new(request.clone());
        let snapshot = self.list.apply_patch(id, &request.patch).await;
        if snapshot.is_none() {
            tracing::debug!(resource_id = %id, "row not in current page; patching remotely only");
        }
        patch.applied(snapshot);

        tracing::info!(
            resource = %resource.name,
            resource_id = %id,
            mutation_id = %request.id,
            field,
            "patch applied locally"
        );

        let result = self
            .fetcher
            .send(WriteMethod::Patch, &path, Some(Value::Object(request.patch)))
            .await
            .and_then(envelope::ensure_success);

        match result {
            Ok(_) => {
                patch.confirm();
                tracing::info!(mutation_id = %request.id, phase = ?patch.phase(), "patch confirmed");
                self.list.notifier().publish(Notification::success(format!(
                    "{} updated to {} successfully!",
                    capitalize(field),
                    display_value(&value)
                )));
                Ok(())
            }
            Err(err) => {
                let restored = match patch.roll_back() {
                    Some(snapshot) => self.list.restore_row(snapshot).await,
                    None => false,
                };
                tracing::warn!(
                    mutation_id = %request.id,
                    resource_id = %id,
                    error = %err,
                    restored,
                    "patch rolled back"
                );
                self.list
                    .notifier()
                    .publish(Notification::failure(&action, &err));
                Err(err)
            }
        }
    }

    /// Creates a record from a raw JSON payload, then reloads the list.
    ///
    /// # Errors
    ///
    /// - [`SyncError::UnsupportedOperation`] if the resource cannot be
    ///   created.
    /// - The transport or logical failure of the write.
    pub async fn create(&self, payload: Value) -> Result<(), SyncError> {
        let resource = self.list.resource();
        let action = format!("create {}", resource.label);
        let path = resource
            .endpoint(resource.endpoints.create.as_ref(), "create", None)
            .map_err(|e| self.reject(&action, e))?;

        let result = self.write(WriteMethod::Post, &path, Some(payload)).await;
        self.settle(&action, "created", result).await
    }

    /// Validates `draft` and creates it. Nothing is sent if validation fails.
    ///
    /// # Errors
    ///
    /// [`SyncError::Validation`] for an invalid draft, otherwise as
    /// [`MutationController::create`].
    pub async fn create_draft<D>(&self, draft: &D) -> Result<(), SyncError>
    where
        D: Validate + Serialize + Sync,
    {
        let action = format!("create {}", self.list.resource().label);
        let payload = self.validated(&action, draft)?;
        self.create(payload).await
    }

    /// Updates record `id` with `payload`, then reloads the list.
    ///
    /// The id goes into the path or into the body under the id field,
    /// depending on the resource configuration.
    ///
    /// # Errors
    ///
    /// - [`SyncError::UnsupportedOperation`] if the resource cannot be
    ///   updated.
    /// - [`SyncError::Busy`] if a mutation for `id` is already in flight.
    /// - [`SyncError::Validation`] if the id must go in the body and
    ///   `payload` is not a JSON object.
    /// - The transport or logical failure of the write.
    pub async fn update(&self, id: &ResourceId, payload: Value) -> Result<(), SyncError> {
        let resource = self.list.resource();
        let action = format!("update {}", resource.label);
        let path = resource
            .endpoint(resource.endpoints.update.as_ref(), "update", Some(id))
            .map_err(|e| self.reject(&action, e))?;
        let body = match resource.id_placement {
            IdPlacement::Path => payload,
            IdPlacement::Body => {
                let Value::Object(mut fields) = payload else {
                    return Err(self.reject(
                        &action,
                        SyncError::Validation("update payload must be an object".into()),
                    ));
                };
                fields.insert(resource.id_field.clone(), Value::String(id.to_string()));
                Value::Object(fields)
            }
        };
        let method = match resource.update_method {
            UpdateMethod::Put => WriteMethod::Put,
            UpdateMethod::Patch => WriteMethod::Patch,
        };
        let _guard = self.acquire(id, &action)?;

        let result = self.write(method, &path, Some(body)).await;
        self.settle(&action, "updated", result).await
    }

    /// Validates `draft` and updates record `id` with it.
    ///
    /// # Errors
    ///
    /// [`SyncError::Validation`] for an invalid draft, otherwise as
    /// [`MutationController::update`].
    pub async fn update_draft<D>(&self, id: &ResourceId, draft: &D) -> Result<(), SyncError>
    where
        D: Validate + Serialize + Sync,
    {
        let action = format!("update {}", self.list.resource().label);
        let payload = self.validated(&action, draft)?;
        self.update(id, payload).await
    }

    /// Deletes record `id`, then reloads the list.
    ///
    /// Removing an id the server no longer knows reports the server's failure
    /// and leaves rows and total as they were.
    ///
    /// # Errors
    ///
    /// - [`SyncError::UnsupportedOperation`] if the resource cannot be
    ///   deleted.
    /// - [`SyncError::Busy`] if a mutation for `id` is already in flight.
    /// - The transport or logical failure of the write.
    pub async fn remove(&self, id: &ResourceId) -> Result<(), SyncError> {
        let resource = self.list.resource();
        let action = format!("delete {}", resource.label);
        let path = resource
            .endpoint(resource.endpoints.delete.as_ref(), "delete", Some(id))
            .map_err(|e| self.reject(&action, e))?;
        let _guard = self.acquire(id, &action)?;

        let result = self.write(WriteMethod::Delete, &path, None).await;
        self.settle(&action, "deleted", result).await
    }

    async fn write(
        &self,
        method: WriteMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, SyncError> {
        tracing::info!(
            resource = %self.list.resource().name,
            method = method.as_str(),
            path,
            "sending mutation"
        );
        self.fetcher
            .send(method, path, body)
            .await
            .and_then(envelope::ensure_success)
    }

    /// Publishes the outcome of a refresh-after-write mutation and reloads on
    /// success.
    async fn settle(
        &self,
        action: &str,
        past_tense: &str,
        result: Result<Value, SyncError>,
    ) -> Result<(), SyncError> {
        let resource = self.list.resource();
        match result {
            Ok(_) => {
                tracing::info!(resource = %resource.name, action, "mutation confirmed");
                self.list.notifier().publish(Notification::success(format!(
                    "{} {past_tense} successfully!",
                    capitalize(&resource.label)
                )));
                if let Err(err) = self.list.reload().await {
                    tracing::debug!(resource = %resource.name, error = %err, "refresh after mutation failed");
                }
                Ok(())
            }
            Err(err) => {
                tracing::warn!(resource = %resource.name, action, error = %err, "mutation failed");
                self.list
                    .notifier()
                    .publish(Notification::failure(action, &err));
                Err(err)
            }
        }
    }

    fn acquire(&self, id: &ResourceId, action: &str) -> Result<InFlightGuard, SyncError> {
        self.in_flight
            .try_acquire(id)
            .ok_or_else(|| self.reject(action, SyncError::Busy(id.clone())))
    }

    fn validated<D: Validate + Serialize>(
        &self,
        action: &str,
        draft: &D,
    ) -> Result<Value, SyncError> {
        draft
            .validate()
            .map_err(|e| self.reject(action, SyncError::from(e)))?;
        serde_json::to_value(draft)
            .map_err(|e| self.reject(action, SyncError::Validation(e.to_string())))
    }

    /// Notifies about a mutation refused before any request was sent.
    fn reject(&self, action: &str, err: SyncError) -> SyncError {
        tracing::debug!(resource = %self.list.resource().name, action, error = %err, "mutation rejected");
        self.list
            .notifier()
            .publish(Notification::failure(action, &err));
        err
    }
}

/// Renders a patched value for a notification: strings without quotes.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
