//! Sub-step expansion.
//!
//! A step's maneuvers can be shown as a nested list. Whether that list
//! is offered depends on the step and on the host's policy for indoor
//! steps; whether it is currently shown is a per-step open flag.

use serde::{Deserialize, Serialize};

use crate::route::{Maneuver, RouteContext, Step};
use crate::translations::{format_distance, format_duration, UnitSystem};

/// Host policy for sub-step visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstepPolicy {
    /// Never offer sub-steps for steps inside a building.
    pub hide_indoor_substeps: bool,
}

/// True if the step has maneuvers worth surfacing under the policy.
pub fn has_expandable_substeps(step: &Step, policy: SubstepPolicy) -> bool {
    if step.steps.is_empty() {
        return false;
    }
    !(policy.hide_indoor_substeps && step.route_context == RouteContext::InsideBuilding)
}

/// Open/closed state of one step's sub-step list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubstepState {
    open: bool,
}

impl SubstepState {
    pub fn is_open(self) -> bool {
        self.open
    }

    pub fn toggled(self) -> Self {
        SubstepState { open: !self.open }
    }

    pub fn opened() -> Self {
        SubstepState { open: true }
    }

    pub fn closed() -> Self {
        SubstepState { open: false }
    }
}

/// Render-ready maneuver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubstepDescriptor {
    pub instructions: Option<String>,
    pub maneuver: Option<String>,
    pub distance_text: String,
    pub duration_text: String,
}

pub fn describe_substeps(maneuvers: &[Maneuver], units: UnitSystem) -> Vec<SubstepDescriptor> {
    maneuvers
        .iter()
        .map(|m| SubstepDescriptor {
            instructions: m.instructions.clone(),
            maneuver: m.maneuver.clone(),
            distance_text: format_distance(m.distance.value, units),
            duration_text: format_duration(m.duration.value),
        })
        .collect()
}
