//! Per-resource configuration.
//!
//! The backend names its endpoints and response fields differently for each
//! resource (`message` vs `data` vs `campaigns` for the rows array). A
//! [`ResourceConfig`] captures those differences so the controllers stay
//! generic. Endpoint templates may contain an `{id}` placeholder.

use serde::Serialize;

use crate::domain::{ResourceId, Sort};
use crate::error::SyncError;

/// Placeholder substituted with the resource id in endpoint templates.
pub const ID_PLACEHOLDER: &str = "{id}";

/// HTTP method used for updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UpdateMethod {
    /// Full replacement.
    Put,
    /// Partial update.
    Patch,
}

/// Where the identifier goes on update requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IdPlacement {
    /// Substituted into the `{id}` placeholder of the path.
    Path,
    /// Inserted into the JSON body under the id field.
    Body,
}

/// Where rows and total live in a list response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingShape {
    /// Field holding the array of records.
    pub rows_field: String,
    /// Field holding the full matching-set size. `None` means the response
    /// is unpaginated and the total is the row count.
    pub total_field: Option<String>,
}

/// Endpoint templates, relative to the API base URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Endpoints {
    /// List endpoint (`GET`).
    pub list: String,
    /// Create endpoint (`POST`).
    pub create: Option<String>,
    /// Update endpoint (`PUT`/`PATCH`).
    pub update: Option<String>,
    /// Delete endpoint (`DELETE`).
    pub delete: Option<String>,
    /// Single-field status change endpoint (`PATCH`).
    pub patch_field: Option<String>,
}

/// Complete description of one backend resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceConfig {
    /// Plural name used in logs (e.g. `"campaigns"`).
    pub name: String,
    /// Singular label used in notifications (e.g. `"campaign"`).
    pub label: String,
    /// Endpoint templates.
    pub endpoints: Endpoints,
    /// Response shape of the list endpoint.
    pub listing: ListingShape,
    /// Identifier field inside each record.
    pub id_field: String,
    /// Update method.
    pub update_method: UpdateMethod,
    /// Identifier placement on updates.
    pub id_placement: IdPlacement,
    /// Whether the list endpoint takes `page`/`limit`.
    pub paginated: bool,
    /// Sort applied when the caller does not choose one.
    pub default_sort: Option<Sort>,
}

impl ResourceConfig {
    /// Creates a read-only, unpaginated resource listing `rows_field` from
    /// `list_path`. Use the `with_*` builders to add the rest.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        list_path: impl Into<String>,
        rows_field: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            endpoints: Endpoints {
                list: list_path.into(),
                ..Endpoints::default()
            },
            listing: ListingShape {
                rows_field: rows_field.into(),
                total_field: None,
            },
            id_field: "_id".to_string(),
            update_method: UpdateMethod::Put,
            id_placement: IdPlacement::Path,
            paginated: false,
            default_sort: None,
        }
    }

    /// Marks the list as paginated with the total under `total_field`.
    #[must_use]
    pub fn paginated(mut self, total_field: impl Into<String>) -> Self {
        self.paginated = true;
        self.listing.total_field = Some(total_field.into());
        self
    }

    /// Sets the create endpoint.
    #[must_use]
    pub fn with_create(mut self, path: impl Into<String>) -> Self {
        self.endpoints.create = Some(path.into());
        self
    }

    /// Sets the update endpoint, method, and id placement.
    #[must_use]
    pub fn with_update(
        mut self,
        path: impl Into<String>,
        method: UpdateMethod,
        placement: IdPlacement,
    ) -> Self {
        self.endpoints.update = Some(path.into());
        self.update_method = method;
        self.id_placement = placement;
        self
    }

    /// Sets the delete endpoint.
    #[must_use]
    pub fn with_delete(mut self, path: impl Into<String>) -> Self {
        self.endpoints.delete = Some(path.into());
        self
    }

    /// Sets the single-field patch endpoint.
    #[must_use]
    pub fn with_patch_field(mut self, path: impl Into<String>) -> Self {
        self.endpoints.patch_field = Some(path.into());
        self
    }

    /// Sets the identifier field.
    #[must_use]
    pub fn with_id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = field.into();
        self
    }

    /// Sets the default sort.
    #[must_use]
    pub fn with_default_sort(mut self, sort: Sort) -> Self {
        self.default_sort = Some(sort);
        self
    }

    /// Resolves an optional endpoint for `operation`, substituting `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::UnsupportedOperation`] if the endpoint is not
    /// configured.
    pub fn endpoint(
        &self,
        template: Option<&String>,
        operation: &'static str,
        id: Option<&ResourceId>,
    ) -> Result<String, SyncError> {
        let template = template.ok_or_else(|| SyncError::UnsupportedOperation {
            resource: self.name.clone(),
            operation,
        })?;
        Ok(resolve_template(template, id))
    }

    /// Advertiser listing (read-only, paginated, rows under `message`).
    #[must_use]
    pub fn advertisers() -> Self {
        Self::new(
            "advertisers",
            "advertiser",
            "/admin/analytics/adv/getAll",
            "message",
        )
        .paginated("total")
    }

    /// Campaign listing with single-field status changes.
    #[must_use]
    pub fn campaigns() -> Self {
        Self::new("campaigns", "campaign", "/admin/campaign/getAll", "campaigns")
            .paginated("total")
            .with_patch_field("/admin/campaign/status/update/{id}")
    }

    /// Plan configuration with full create/update/delete.
    #[must_use]
    pub fn plans() -> Self {
        Self::new("plans", "plan", "/admin/plan/getAll", "data")
            .with_create("/admin/plan/create")
            .with_update("/admin/plan/update/{id}", UpdateMethod::Put, IdPlacement::Path)
            .with_delete("/admin/plan/delete/{id}")
    }

    /// Reward configuration; updates carry the id in the body.
    #[must_use]
    pub fn rewards() -> Self {
        Self::new("rewards", "reward", "/admin/reward/getAll", "data")
            .with_create("/admin/reward/create")
            .with_update("/admin/reward/update", UpdateMethod::Put, IdPlacement::Body)
            .with_delete("/admin/reward/delete/{id}")
    }

    /// Every bundled list resource.
    #[must_use]
    pub fn builtin() -> Vec<Self> {
        vec![
            Self::advertisers(),
            Self::campaigns(),
            Self::plans(),
            Self::rewards(),
        ]
    }
}

/// Substitutes `id` into the `{id}` placeholder. Templates without a
/// placeholder are returned unchanged.
#[must_use]
pub fn resolve_template(template: &str, id: Option<&ResourceId>) -> String {
    match id {
        Some(id) if template.contains(ID_PLACEHOLDER) => {
            template.replace(ID_PLACEHOLDER, id.as_str())
        }
        _ => template.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn resolves_id_placeholder() {
        let id = ResourceId::from("p1");
        assert_eq!(
            resolve_template("/admin/plan/update/{id}", Some(&id)),
            "/admin/plan/update/p1"
        );
        assert_eq!(
            resolve_template("/admin/reward/update", Some(&id)),
            "/admin/reward/update"
        );
    }

    #[test]
    fn missing_endpoint_is_unsupported() {
        let cfg = ResourceConfig::advertisers();
        let result = cfg.endpoint(cfg.endpoints.create.as_ref(), "create", None);
        let Err(SyncError::UnsupportedOperation { resource, operation }) = result else {
            panic!("expected unsupported operation");
        };
        assert_eq!(resource, "advertisers");
        assert_eq!(operation, "create");
    }

    #[test]
    fn builtin_shapes_match_backend() {
        let campaigns = ResourceConfig::campaigns();
        assert!(campaigns.paginated);
        assert_eq!(campaigns.listing.rows_field, "campaigns");
        assert_eq!(campaigns.listing.total_field.as_deref(), Some("total"));

        let advertisers = ResourceConfig::advertisers();
        assert_eq!(advertisers.listing.rows_field, "message");

        let rewards = ResourceConfig::rewards();
        assert!(!rewards.paginated);
        assert_eq!(rewards.id_placement, IdPlacement::Body);
        assert_eq!(rewards.listing.total_field, None);

        assert_eq!(ResourceConfig::builtin().len(), 4);
    }
}
