//! Render descriptors for the host UI.
//!
//! Each flat step becomes one descriptor. Headings depend on the step
//! shown before, so the list is built in a single pass that carries the
//! previous step forward.

use serde::Serialize;

use crate::error::{NavError, Result};
use crate::flatten::{flatten, FlatStep};
use crate::heading::{
    resolve_heading, transit_detail, travel_mode_indicator, HeadingContext, Icon, TransitDetail,
    TravelModeIndicator,
};
use crate::navigator::NavigatorConfig;
use crate::route::parse_route;
use crate::substeps::{
    describe_substeps, has_expandable_substeps, SubstepDescriptor, SubstepPolicy,
};
use crate::translations::{format_distance, format_duration, TranslationSet, UnitSystem};

/// Everything the host needs to draw one step.
///
/// `heading` is `None` while a translation it needs is missing; the
/// host shows nothing for the step until then.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepDescriptor {
    /// Leg the step belongs to in the loaded route.
    pub leg_index: usize,
    /// Position of the step within its leg.
    pub step_index: usize,
    /// Action text shown as the step title.
    pub heading: Option<String>,
    /// Action icon next to the heading.
    pub icon_id: Option<Icon>,
    /// Travel-mode icon and line style of the timeline segment.
    pub travel_mode: TravelModeIndicator,
    /// Line details, only for TRANSIT steps.
    pub transit: Option<TransitDetail>,
    pub distance_text: String,
    pub duration_text: String,
    /// Maneuvers listed when the step is expanded.
    pub sub_steps: Vec<SubstepDescriptor>,
    /// Whether the host should offer the expand control.
    pub is_expandable: bool,
    /// Sub-step list currently shown.
    pub is_open: bool,
    /// The navigator's current step.
    pub is_active: bool,
}

impl StepDescriptor {
    pub fn is_renderable(&self) -> bool {
        self.heading.is_some()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DescribeOptions<'a> {
    pub heading: HeadingContext<'a>,
    pub policy: SubstepPolicy,
    pub units: UnitSystem,
}

/// Describe one step against the step shown before it.
pub fn describe_step(
    current: &FlatStep,
    previous: Option<&FlatStep>,
    opts: &DescribeOptions<'_>,
) -> StepDescriptor {
    let step = current.step();
    let heading = resolve_heading(step, previous.map(FlatStep::step), &opts.heading);

    StepDescriptor {
        leg_index: current.original_leg_index(),
        step_index: current.original_step_index(),
        icon_id: heading.as_ref().and_then(|h| h.icon),
        heading: heading.map(|h| h.text),
        travel_mode: travel_mode_indicator(step),
        transit: transit_detail(step, opts.heading.translations),
        distance_text: format_distance(step.distance.value, opts.units),
        duration_text: format_duration(step.duration.value),
        sub_steps: describe_substeps(&step.steps, opts.units),
        is_expandable: has_expandable_substeps(step, opts.policy),
        is_open: false,
        is_active: false,
    }
}

/// Describe the whole sequence, each step against its flat predecessor.
pub fn describe_steps(steps: &[FlatStep], opts: &DescribeOptions<'_>) -> Vec<StepDescriptor> {
    steps
        .iter()
        .scan(None, |previous: &mut Option<&FlatStep>, current| {
            let descriptor = describe_step(current, *previous, opts);
            *previous = Some(current);
            Some(descriptor)
        })
        .collect()
}

/// Describe a serialized route and return the descriptors as JSON.
///
/// Stateless convenience for hosts that only need the step list. Any
/// malformed input fails the whole call.
pub fn describe_route_json(route: &str, translations: &str, config: &str) -> Result<String> {
    let route = parse_route(route)?;
    let translations = TranslationSet::from_json(translations)?;
    let config = NavigatorConfig::from_json(config)?;

    let opts = DescribeOptions {
        heading: HeadingContext {
            translations: &translations,
            origin_label: config.origin_label.as_deref().unwrap_or_default(),
        },
        policy: config.substep_policy(),
        units: config.unit_system,
    };

    let list = describe_steps(&flatten(&route), &opts);
    serde_json::to_string(&list).map_err(NavError::Serialize)
}
