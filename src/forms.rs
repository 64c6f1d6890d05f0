//! Client-side form drafts.
//!
//! Drafts are validated with `validator` before anything is sent; a failed
//! validation becomes [`crate::error::SyncError::Validation`] and never
//! reaches the fetcher. The serialized form is the request body.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Reward types accepted by the backend.
pub const REWARD_TYPES: [&str; 4] = ["Install", "Review", "Refferal", "ReviewRef"];

/// Plan type that requires an install count.
pub const PLAN_TYPE_CPI: &str = "cpi";

/// Plan type that requires a review count.
pub const PLAN_TYPE_REVIEW: &str = "review";

/// Body of plan create/update requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_plan_counts"))]
pub struct PlanDraft {
    /// `cpi` or `review`.
    pub plan_type: String,
    /// Free-text description.
    #[validate(length(min = 1, message = "is required"))]
    pub plan_description: String,
    /// Price of the plan.
    #[validate(range(exclusive_min = 0.0, message = "must be greater than 0"))]
    pub plan_amount: f64,
    /// Install count, for `cpi` plans.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installs: Option<u32>,
    /// Review count, for `review` plans.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<u32>,
}

impl PlanDraft {
    /// Cost-per-install plan.
    #[must_use]
    pub fn cpi(description: impl Into<String>, amount: f64, installs: u32) -> Self {
        Self {
            plan_type: PLAN_TYPE_CPI.to_string(),
            plan_description: description.into(),
            plan_amount: amount,
            installs: Some(installs),
            reviews: None,
        }
    }

    /// Review plan.
    #[must_use]
    pub fn review(description: impl Into<String>, amount: f64, reviews: u32) -> Self {
        Self {
            plan_type: PLAN_TYPE_REVIEW.to_string(),
            plan_description: description.into(),
            plan_amount: amount,
            installs: None,
            reviews: Some(reviews),
        }
    }
}

fn validate_plan_counts(draft: &PlanDraft) -> Result<(), ValidationError> {
    let (count, field) = match draft.plan_type.as_str() {
        PLAN_TYPE_CPI => (draft.installs, "installs"),
        PLAN_TYPE_REVIEW => (draft.reviews, "reviews"),
        _ => {
            return Err(ValidationError::new("plan_type")
                .with_message(format!("plan type must be `{PLAN_TYPE_CPI}` or `{PLAN_TYPE_REVIEW}`").into()));
        }
    };
    match count {
        Some(n) if n > 0 => Ok(()),
        _ => Err(ValidationError::new(field).with_message(
            format!("{field} must be greater than 0 for {} plans", draft.plan_type).into(),
        )),
    }
}

/// Body of reward create/update requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_reward_type"))]
pub struct RewardDraft {
    /// One of [`REWARD_TYPES`].
    pub reward_type: String,
    /// Reward amount.
    #[validate(range(exclusive_min = 0.0, message = "must be greater than 0"))]
    pub amount: f64,
}

fn validate_reward_type(draft: &RewardDraft) -> Result<(), ValidationError> {
    if REWARD_TYPES.contains(&draft.reward_type.as_str()) {
        Ok(())
    } else {
        Err(ValidationError::new("reward_type")
            .with_message(format!("unknown reward type `{}`", draft.reward_type).into()))
    }
}

/// Admin credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Account email.
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    /// Account password.
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
