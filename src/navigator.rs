//! Step-by-step navigation state machine.
//!
//! Holds the flattened steps of the current trip and the pointer to the
//! active one. All mutations go through `&mut self`, so callers sharing a
//! navigator across threads wrap it in a lock and every transition sees
//! the step that was really active before it.
//!
//! Every pointer change records the step it left. That step, not the
//! flat predecessor, is what the active heading is resolved against.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::describe::{describe_steps, DescribeOptions, StepDescriptor};
use crate::error::{NavError, Result};
use crate::flatten::{flatten, position_of, FlatStep};
use crate::heading::{resolve_heading, Heading, HeadingContext};
use crate::renderer::{
    route_bounds, MapRenderer, Padding, RendererCommand, RendererSync, RouteVersion, StepFocus,
    SyncReport,
};
use crate::route::{parse_route, totals, Route, Totals};
use crate::substeps::{has_expandable_substeps, SubstepPolicy, SubstepState};
use crate::translations::{TranslationSet, UnitSystem};

/// Host configuration for a navigator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    pub unit_system: UnitSystem,
    pub hide_indoor_substeps: bool,
    /// Label of the trip origin, shown as the first step's heading.
    pub origin_label: Option<String>,
}

impl NavigatorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| NavError::MalformedInput {
            what: "navigator config",
            source,
        })
    }

    pub fn substep_policy(&self) -> SubstepPolicy {
        SubstepPolicy {
            hide_indoor_substeps: self.hide_indoor_substeps,
        }
    }
}

/// Where the active step sits in the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    First,
    Middle,
    Last,
    /// The only step: first and last at once.
    Only,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "position", rename_all = "snake_case")]
pub enum NavigatorState {
    Idle,
    Ready(Position),
}

/// (leg, step) coordinate of a flat step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActiveStepPointer {
    pub leg_index: usize,
    pub step_index: usize,
}

impl ActiveStepPointer {
    fn of(step: &FlatStep) -> Self {
        ActiveStepPointer {
            leg_index: step.original_leg_index(),
            step_index: step.original_step_index(),
        }
    }
}

/// User interaction with a step or one of its sub-steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavigationEvent {
    pub leg_index: usize,
    pub step_index: usize,
    pub maneuver_index: Option<usize>,
}

/// Notifications delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NavigatorEvent {
    RouteLoaded {
        version: RouteVersion,
        step_count: usize,
    },
    RouteCleared,
    ActiveStepChanged {
        from: Option<ActiveStepPointer>,
        to: ActiveStepPointer,
    },
    StepClicked(NavigationEvent),
    SubstepsToggled {
        leg_index: usize,
        step_index: usize,
        open: bool,
    },
}

pub type Subscriber = Box<dyn FnMut(&NavigatorEvent) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// The last pointer change, as flat indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Transition {
    from: Option<usize>,
    to: usize,
}

struct Trip {
    steps: Vec<FlatStep>,
    transition: Transition,
    substeps: Vec<SubstepState>,
}

impl Trip {
    fn active(&self) -> usize {
        self.transition.to
    }

    fn last(&self) -> usize {
        self.steps.len() - 1
    }
}

pub struct Navigator {
    config: NavigatorConfig,
    translations: TranslationSet,
    route: Option<Route>,
    trip: Option<Trip>,
    sync: RendererSync,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl Navigator {
    pub fn new(config: NavigatorConfig) -> Self {
        Navigator {
            config,
            translations: TranslationSet::default(),
            route: None,
            trip: None,
            sync: RendererSync::new(),
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Replace the translation set. Takes effect on the next descriptor query.
    pub fn set_translations(&mut self, translations: TranslationSet) {
        self.translations = translations;
    }

    pub fn set_origin_label(&mut self, label: Option<String>) {
        self.config.origin_label = label;
    }

    pub fn subscribe(&mut self, subscriber: Subscriber) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, subscriber));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    fn emit(&mut self, event: NavigatorEvent) {
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&event);
        }
    }

    /// Load a new trip, replacing any current one.
    ///
    /// The pointer starts at the first step. A route whose legs carry no
    /// steps is kept for its totals and bounds, but leaves the navigator
    /// idle. Renderer commands still queued for the previous route are
    /// dropped.
    pub fn load_route(&mut self, route: Route, padding: Padding) {
        let version = self.sync.version().next();
        self.sync.begin_route(version);

        let steps = flatten(&route);
        let step_count = steps.len();

        if let Some(bounds) = route_bounds(&route) {
            self.sync.queue(RendererCommand::FitBounds { bounds, padding });
        }

        self.trip = if steps.is_empty() {
            None
        } else {
            let substeps = vec![SubstepState::closed(); steps.len()];
            let trip = Trip {
                steps,
                transition: Transition { from: None, to: 0 },
                substeps,
            };
            self.sync
                .queue(RendererCommand::SetCurrentStep(focus(&trip.steps, 0)));
            Some(trip)
        };
        self.route = Some(route);

        info!("route {} loaded with {step_count} step(s)", version.0);
        self.emit(NavigatorEvent::RouteLoaded {
            version,
            step_count,
        });
    }

    /// Parse and load a serialized route. A malformed route leaves the
    /// current trip untouched.
    pub fn load_route_json(&mut self, json: &str, padding: Padding) -> Result<()> {
        let route = parse_route(json)?;
        self.load_route(route, padding);
        Ok(())
    }

    /// End the trip.
    pub fn clear_route(&mut self) {
        let version = self.sync.version().next();
        self.sync.begin_route(version);
        let had_route = self.route.take().is_some();
        self.trip = None;
        if had_route {
            info!("route cleared");
            self.emit(NavigatorEvent::RouteCleared);
        }
    }

    pub fn route_version(&self) -> RouteVersion {
        self.sync.version()
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    pub fn steps(&self) -> &[FlatStep] {
        match &self.trip {
            Some(trip) => &trip.steps,
            None => &[],
        }
    }

    pub fn state(&self) -> NavigatorState {
        let Some(trip) = &self.trip else {
            return NavigatorState::Idle;
        };

        let active = trip.active();
        let position = match (active == 0, active == trip.last()) {
            (true, true) => Position::Only,
            (true, false) => Position::First,
            (false, true) => Position::Last,
            (false, false) => Position::Middle,
        };
        NavigatorState::Ready(position)
    }

    pub fn can_go_next(&self) -> bool {
        matches!(
            self.state(),
            NavigatorState::Ready(Position::First | Position::Middle)
        )
    }

    pub fn can_go_previous(&self) -> bool {
        matches!(
            self.state(),
            NavigatorState::Ready(Position::Middle | Position::Last)
        )
    }

    pub fn active_index(&self) -> Option<usize> {
        self.trip.as_ref().map(Trip::active)
    }

    pub fn active_pointer(&self) -> Option<ActiveStepPointer> {
        self.active_step().map(ActiveStepPointer::of)
    }

    pub fn active_step(&self) -> Option<&FlatStep> {
        self.trip.as_ref().map(|t| &t.steps[t.active()])
    }

    /// The step that was active before the last pointer change.
    pub fn left_step(&self) -> Option<&FlatStep> {
        let trip = self.trip.as_ref()?;
        trip.transition.from.map(|i| &trip.steps[i])
    }

    pub fn is_active(&self, step: &FlatStep) -> bool {
        self.active_pointer()
            .is_some_and(|p| step.is_at(p.leg_index, p.step_index))
    }

    /// Advance one step. Returns false at the last step.
    pub fn next(&mut self) -> bool {
        let Some(target) = self
            .trip
            .as_ref()
            .filter(|t| t.active() < t.last())
            .map(|t| t.active() + 1)
        else {
            return false;
        };
        self.move_to(target)
    }

    /// Go back one step. Returns false at the first step.
    pub fn previous(&mut self) -> bool {
        let Some(target) = self
            .trip
            .as_ref()
            .filter(|t| t.active() > 0)
            .map(|t| t.active() - 1)
        else {
            return false;
        };
        self.move_to(target)
    }

    /// Jump to a flat index.
    pub fn jump_to(&mut self, flat_index: usize) -> Result<bool> {
        let len = self.steps().len();
        if flat_index >= len {
            return Err(NavError::IndexOutOfRange {
                index: flat_index,
                len,
            });
        }
        Ok(self.move_to(flat_index))
    }

    /// Make the step at (leg, step) active.
    ///
    /// Fails without touching state when the pair names no step.
    /// Selecting the already active step is a no-op returning false.
    pub fn set_active_step(&mut self, leg_index: usize, step_index: usize) -> Result<bool> {
        let target = self.resolve(leg_index, step_index)?;
        Ok(self.move_to(target))
    }

    /// Handle a click on a step or one of its maneuvers.
    pub fn click_step(
        &mut self,
        leg_index: usize,
        step_index: usize,
        maneuver_index: Option<usize>,
    ) -> Result<()> {
        let target = self.resolve(leg_index, step_index)?;

        if let Some(maneuver) = maneuver_index {
            let maneuvers = self.steps()[target].step().steps.len();
            if maneuver >= maneuvers {
                return Err(NavError::ManeuverOutOfRange {
                    leg: leg_index,
                    step: step_index,
                    maneuver,
                });
            }
        }

        self.emit(NavigatorEvent::StepClicked(NavigationEvent {
            leg_index,
            step_index,
            maneuver_index,
        }));
        self.move_to(target);
        Ok(())
    }

    fn resolve(&self, leg_index: usize, step_index: usize) -> Result<usize> {
        position_of(self.steps(), leg_index, step_index).ok_or(NavError::OutOfRange {
            leg: leg_index,
            step: step_index,
        })
    }

    fn move_to(&mut self, target: usize) -> bool {
        let Some(trip) = self.trip.as_mut() else {
            return false;
        };

        let from = trip.active();
        if from == target {
            return false;
        }

        trip.substeps[from] = SubstepState::closed();
        trip.transition = Transition {
            from: Some(from),
            to: target,
        };

        let event = NavigatorEvent::ActiveStepChanged {
            from: Some(ActiveStepPointer::of(&trip.steps[from])),
            to: ActiveStepPointer::of(&trip.steps[target]),
        };
        let command = RendererCommand::SetCurrentStep(focus(&trip.steps, target));

        debug!("active step {from} -> {target}");
        self.sync.queue(command);
        self.emit(event);
        true
    }

    fn heading_context(&self) -> HeadingContext<'_> {
        HeadingContext {
            translations: &self.translations,
            origin_label: self.config.origin_label.as_deref().unwrap_or_default(),
        }
    }

    /// Heading of the active step, resolved against the step active
    /// immediately before it.
    pub fn active_heading(&self) -> Option<Heading> {
        let current = self.active_step()?;
        let previous = self.left_step();
        resolve_heading(
            current.step(),
            previous.map(FlatStep::step),
            &self.heading_context(),
        )
    }

    /// Render descriptors for every step of the trip.
    ///
    /// The active step carries the same heading as `active_heading`, so
    /// after a jump it reads against the step left behind. All other
    /// steps read against their flat predecessor.
    pub fn descriptors(&self) -> Vec<StepDescriptor> {
        let Some(trip) = &self.trip else {
            return Vec::new();
        };

        let opts = DescribeOptions {
            heading: self.heading_context(),
            policy: self.config.substep_policy(),
            units: self.config.unit_system,
        };

        let mut list = describe_steps(&trip.steps, &opts);
        for (i, descriptor) in list.iter_mut().enumerate() {
            descriptor.is_active = i == trip.active();
            descriptor.is_open = descriptor.is_expandable && trip.substeps[i].is_open();
        }

        if let Some(active) = list.get_mut(trip.active()) {
            let heading = self.active_heading();
            active.icon_id = heading.as_ref().and_then(|h| h.icon);
            active.heading = heading.map(|h| h.text);
        }
        list
    }

    pub fn has_expandable_substeps(&self, leg_index: usize, step_index: usize) -> Result<bool> {
        let index = self.resolve(leg_index, step_index)?;
        Ok(has_expandable_substeps(
            self.steps()[index].step(),
            self.config.substep_policy(),
        ))
    }

    /// Flip the sub-step list of a step. Emits exactly one toggle event.
    pub fn toggle_substeps(&mut self, leg_index: usize, step_index: usize) -> Result<bool> {
        let index = self.resolve(leg_index, step_index)?;
        let state = self.substep_state(index)?.toggled();
        Ok(self.store_substeps(index, state))
    }

    /// Open the active step's sub-steps.
    pub fn open_substeps(&mut self) -> Result<()> {
        self.set_active_substeps(SubstepState::opened())
    }

    /// Close the active step's sub-steps.
    pub fn close_substeps(&mut self) -> Result<()> {
        self.set_active_substeps(SubstepState::closed())
    }

    fn set_active_substeps(&mut self, state: SubstepState) -> Result<()> {
        let index = self.active_index().ok_or(NavError::NoRoute)?;
        if self.substep_state(index)? != state {
            self.store_substeps(index, state);
        }
        Ok(())
    }

    fn substep_state(&self, index: usize) -> Result<SubstepState> {
        let trip = self.trip.as_ref().ok_or(NavError::NoRoute)?;
        Ok(trip.substeps[index])
    }

    fn store_substeps(&mut self, index: usize, state: SubstepState) -> bool {
        let Some(trip) = self.trip.as_mut() else {
            return false;
        };
        trip.substeps[index] = state;
        let pointer = ActiveStepPointer::of(&trip.steps[index]);

        self.emit(NavigatorEvent::SubstepsToggled {
            leg_index: pointer.leg_index,
            step_index: pointer.step_index,
            open: state.is_open(),
        });
        state.is_open()
    }

    pub fn is_substeps_open(&self, leg_index: usize, step_index: usize) -> Result<bool> {
        let index = self.resolve(leg_index, step_index)?;
        Ok(self.substep_state(index)?.is_open())
    }

    /// Trip-wide totals, recomputed from the route's legs.
    pub fn totals(&self) -> Option<Totals> {
        self.route.as_ref().map(totals)
    }

    pub fn pending_renderer_commands(&self) -> usize {
        self.sync.pending_len()
    }

    /// Deliver queued renderer commands for the current route.
    pub fn sync_renderer(&mut self, renderer: &mut dyn MapRenderer) -> SyncReport {
        self.sync.flush(renderer)
    }
}

fn focus(steps: &[FlatStep], flat_index: usize) -> StepFocus {
    let step = &steps[flat_index];
    StepFocus {
        flat_index,
        leg_index: step.original_leg_index(),
        step_index: step.original_step_index(),
        geometry: step.step().geometry.clone(),
    }
}
