//! Mutation requests and the optimistic patch lifecycle.
//!
//! An optimistic patch moves through
//! `Pending → Applied → {Confirmed | RolledBack}`. The snapshot taken when
//! the patch is applied is the only thing needed to undo it.

use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{Record, ResourceId};

/// A change requested by the user against one resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MutationRequest {
    /// Correlation id used in logs.
    pub id: Uuid,
    /// Target resource.
    pub resource_id: ResourceId,
    /// Changed fields.
    pub patch: Map<String, Value>,
}

impl MutationRequest {
    /// Creates a request for `resource_id` with the given changed fields.
    #[must_use]
    pub fn new(resource_id: ResourceId, patch: Map<String, Value>) -> Self {
        Self {
            id: Uuid::new_v4(),
            resource_id,
            patch,
        }
    }

    /// Creates a request that changes a single field.
    #[must_use]
    pub fn single_field(resource_id: ResourceId, field: &str, value: Value) -> Self {
        let mut patch = Map::new();
        patch.insert(field.to_string(), value);
        Self::new(resource_id, patch)
    }
}

/// Pre-mutation copy of one row, plus the list revision it was taken from.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSnapshot {
    /// Identifier of the row.
    pub resource_id: ResourceId,
    /// The row exactly as it was before the patch.
    pub row: Record,
    /// List revision at snapshot time. A later full load bumps the revision,
    /// after which restoring the snapshot would overwrite fresher data.
    pub revision: u64,
}

/// Lifecycle phase of an optimistic patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationPhase {
    /// Created, not yet visible locally.
    Pending,
    /// Written into local rows, remote write outstanding.
    Applied,
    /// Remote write succeeded; snapshot discarded.
    Confirmed,
    /// Remote write failed; snapshot restored.
    RolledBack,
}

/// One optimistic patch and its undo information.
#[derive(Debug, Clone)]
pub struct OptimisticPatch {
    request: MutationRequest,
    phase: MutationPhase,
    snapshot: Option<RowSnapshot>,
}

impl OptimisticPatch {
    /// Starts a patch in the `Pending` phase.
    #[must_use]
    pub const fn new(request: MutationRequest) -> Self {
        Self {
            request,
            phase: MutationPhase::Pending,
            snapshot: None,
        }
    }

    /// The underlying request.
    #[must_use]
    pub const fn request(&self) -> &MutationRequest {
        &self.request
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> MutationPhase {
        self.phase
    }

    /// Records that the patch is now visible locally. `snapshot` is `None`
    /// when the row was not in the current page; there is then nothing to
    /// restore.
    pub fn applied(&mut self, snapshot: Option<RowSnapshot>) {
        self.snapshot = snapshot;
        self.phase = MutationPhase::Applied;
    }

    /// The remote write succeeded; the snapshot is dropped.
    pub fn confirm(&mut self) {
        self.snapshot = None;
        self.phase = MutationPhase::Confirmed;
    }

    /// The remote write failed; hands back the snapshot to restore.
    pub fn roll_back(&mut self) -> Option<RowSnapshot> {
        self.phase = MutationPhase::RolledBack;
        self.snapshot.take()
    }
}
