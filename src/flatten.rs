//! Flattening of multi-leg routes into one addressable step sequence.

use serde::Serialize;

use crate::route::{Route, Step};

/// A step tagged with the leg and step it came from.
///
/// The indices are assigned once by [`flatten`] and never change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatStep {
    original_leg_index: usize,
    original_step_index: usize,
    step: Step,
}

impl FlatStep {
    pub fn original_leg_index(&self) -> usize {
        self.original_leg_index
    }

    pub fn original_step_index(&self) -> usize {
        self.original_step_index
    }

    pub fn step(&self) -> &Step {
        &self.step
    }

    /// True if this step sits at the given (leg, step) coordinate.
    pub fn is_at(&self, leg_index: usize, step_index: usize) -> bool {
        self.original_leg_index == leg_index && self.original_step_index == step_index
    }
}

/// Concatenate every leg's steps in route order.
///
/// Empty legs contribute nothing; an empty route yields an empty list.
pub fn flatten(route: &Route) -> Vec<FlatStep> {
    route
        .legs
        .iter()
        .enumerate()
        .flat_map(|(leg_index, leg)| {
            leg.steps
                .iter()
                .enumerate()
                .map(move |(step_index, step)| FlatStep {
                    original_leg_index: leg_index,
                    original_step_index: step_index,
                    step: step.clone(),
                })
        })
        .collect()
}

/// Flat index of the step at (leg, step), if it exists.
pub fn position_of(steps: &[FlatStep], leg_index: usize, step_index: usize) -> Option<usize> {
    steps.iter().position(|s| s.is_at(leg_index, step_index))
}
