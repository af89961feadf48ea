//! Map renderer synchronization.
//!
//! Pointer changes and route loads are turned into commands for the
//! external map renderer. Commands are queued with the version of the
//! route they belong to and delivered on `flush`; commands from a route
//! that has since been replaced are dropped instead of being applied to
//! the new route's geometry.
//!
//! Renderer failures are logged and swallowed. Navigation state is never
//! rolled back because a map update failed.

use std::collections::VecDeque;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::RendererError;
use crate::route::{Location, Route};

/// Fit-bounds padding in screen units, chosen by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub fn uniform(value: f64) -> Self {
        Padding {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

/// Geographic bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    fn around(p: &Location) -> Self {
        Bounds {
            south: p.lat,
            west: p.lng,
            north: p.lat,
            east: p.lng,
        }
    }

    fn extend(self, p: &Location) -> Self {
        Bounds {
            south: self.south.min(p.lat),
            west: self.west.min(p.lng),
            north: self.north.max(p.lat),
            east: self.east.max(p.lng),
        }
    }
}

/// Bounding box of every leg and step position of the route.
///
/// Returns None for a route without legs.
pub fn route_bounds(route: &Route) -> Option<Bounds> {
    let points = route.legs.iter().flat_map(|leg| {
        [&leg.start_location, &leg.end_location]
            .into_iter()
            .chain(leg.steps.iter().flat_map(|step| {
                [&step.start_location, &step.end_location]
                    .into_iter()
                    .chain(step.geometry.iter())
            }))
    });

    points.fold(None, |acc: Option<Bounds>, p| {
        Some(match acc {
            Some(b) => b.extend(p),
            None => Bounds::around(p),
        })
    })
}

/// The step a renderer should highlight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepFocus {
    pub flat_index: usize,
    pub leg_index: usize,
    pub step_index: usize,
    pub geometry: Vec<Location>,
}

/// A single call against the map renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RendererCommand {
    FitBounds { bounds: Bounds, padding: Padding },
    SetCurrentStep(StepFocus),
}

/// External map renderer.
pub trait MapRenderer {
    fn set_current_step(&mut self, focus: &StepFocus) -> Result<(), RendererError>;

    fn fit_bounds(&mut self, bounds: &Bounds, padding: &Padding) -> Result<(), RendererError>;
}

/// Identity of a loaded route. Bumped on every load and clear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RouteVersion(pub u64);

impl RouteVersion {
    pub fn next(self) -> Self {
        RouteVersion(self.0 + 1)
    }
}

/// Outcome of a flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub delivered: usize,
    pub failed: usize,
    pub discarded: usize,
}

#[derive(Debug)]
struct Pending {
    version: RouteVersion,
    command: RendererCommand,
}

/// Queue of renderer commands keyed by route version.
#[derive(Debug, Default)]
pub struct RendererSync {
    version: RouteVersion,
    pending: VecDeque<Pending>,
}

impl RendererSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(&self) -> RouteVersion {
        self.version
    }

    /// Switch to a new route, dropping everything queued for older ones.
    pub fn begin_route(&mut self, version: RouteVersion) {
        let before = self.pending.len();
        self.pending.retain(|p| p.version == version);
        let dropped = before - self.pending.len();
        if dropped > 0 {
            debug!("dropped {dropped} renderer command(s) of a replaced route");
        }
        self.version = version;
    }

    /// Queue a command for the current route.
    ///
    /// Only the latest step focus matters, so a new `SetCurrentStep`
    /// replaces one still pending. `FitBounds` keeps its place.
    pub fn queue(&mut self, command: RendererCommand) {
        if matches!(command, RendererCommand::SetCurrentStep(_)) {
            let version = self.version;
            self.pending.retain(|p| {
                p.version != version || !matches!(p.command, RendererCommand::SetCurrentStep(_))
            });
        }
        self.pending.push_back(Pending {
            version: self.version,
            command,
        });
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Deliver queued commands for the current route in order.
    pub fn flush(&mut self, renderer: &mut dyn MapRenderer) -> SyncReport {
        let mut report = SyncReport::default();

        while let Some(Pending { version, command }) = self.pending.pop_front() {
            if version != self.version {
                debug!("discarding renderer command for route {}", version.0);
                report.discarded += 1;
                continue;
            }

            let result = match &command {
                RendererCommand::FitBounds { bounds, padding } => {
                    renderer.fit_bounds(bounds, padding)
                }
                RendererCommand::SetCurrentStep(focus) => renderer.set_current_step(focus),
            };

            match result {
                Ok(()) => report.delivered += 1,
                Err(err) => {
                    warn!("{err}");
                    report.failed += 1;
                }
            }
        }

        report
    }
}

/// Renderer that records commands instead of drawing.
///
/// Used where the real renderer lives across a process or language
/// boundary and receives the commands as data.
#[derive(Debug, Default)]
pub struct CommandBuffer {
    commands: Vec<RendererCommand>,
}

impl CommandBuffer {
    pub fn take(&mut self) -> Vec<RendererCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl MapRenderer for CommandBuffer {
    fn set_current_step(&mut self, focus: &StepFocus) -> Result<(), RendererError> {
        self.commands
            .push(RendererCommand::SetCurrentStep(focus.clone()));
        Ok(())
    }

    fn fit_bounds(&mut self, bounds: &Bounds, padding: &Padding) -> Result<(), RendererError> {
        self.commands.push(RendererCommand::FitBounds {
            bounds: *bounds,
            padding: *padding,
        });
        Ok(())
    }
}
