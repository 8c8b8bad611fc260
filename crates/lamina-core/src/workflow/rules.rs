//! Static per-step-kind completion rules.
//!
//! Each step kind carries a fixed quality gate: a set of checklist keys
//! that must all be `true` under `collected_data.checklist`, and a minimum
//! number of attached photos. Evaluation is a pure function over the draft
//! and returns the exact unmet condition names, so a failed advance can be
//! surfaced with actionable detail.

use serde_json::{Map, Value};

use crate::models::StepKind;

/// Completion rule for one step kind.
#[derive(Debug, Clone, Copy)]
pub struct StepRule {
    /// Checklist keys that must all be `true` in `collected_data.checklist`
    pub required_checklist: &'static [&'static str],
    /// Minimum number of photos attached to the step
    pub min_photos: usize,
}

const INSPECTION_RULE: StepRule = StepRule {
    required_checklist: &["exterior_inspected", "damage_recorded"],
    min_photos: 2,
};

const PREPARATION_RULE: StepRule = StepRule {
    required_checklist: &["surface_cleaned", "surface_degreased"],
    min_photos: 1,
};

const INSTALLATION_RULE: StepRule = StepRule {
    required_checklist: &["film_applied", "edges_sealed"],
    min_photos: 2,
};

const FINALIZATION_RULE: StepRule = StepRule {
    required_checklist: &["final_inspection_passed", "customer_notified"],
    min_photos: 3,
};

/// The completion rule for a step kind.
pub fn rule_for(kind: StepKind) -> StepRule {
    match kind {
        StepKind::Inspection => INSPECTION_RULE,
        StepKind::Preparation => PREPARATION_RULE,
        StepKind::Installation => INSTALLATION_RULE,
        StepKind::Finalization => FINALIZATION_RULE,
    }
}

/// Name of the photo-count condition in unmet condition lists.
pub const MIN_PHOTOS_CONDITION: &str = "min_photos";

/// Evaluates a draft against a rule.
///
/// Returns the unmet condition names: `checklist.<key>` for each required
/// checklist key that is missing or not `true`, plus [`MIN_PHOTOS_CONDITION`]
/// when the photo count is below the minimum. An empty vector means the
/// step may be completed.
pub fn evaluate(
    rule: &StepRule,
    collected_data: &Map<String, Value>,
    photo_count: usize,
) -> Vec<String> {
    let checklist = collected_data.get("checklist").and_then(Value::as_object);

    let mut unmet = Vec::new();
    for key in rule.required_checklist {
        let satisfied = checklist
            .and_then(|c| c.get(*key))
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if !satisfied {
            unmet.push(format!("checklist.{key}"));
        }
    }

    if photo_count < rule.min_photos {
        unmet.push(MIN_PHOTOS_CONDITION.to_string());
    }

    unmet
}
