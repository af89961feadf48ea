//! Route data model.
//!
//! Mirrors the leg/step/maneuver shape returned by the directions
//! service. Routes usually cross the host boundary as JSON, so the
//! parse functions here are the only place serialized input enters
//! the core. Parsing fails fast: a step is never rendered from
//! partially decoded data.

use serde::{Deserialize, Serialize};

use crate::error::{NavError, Result};

/// A geographic position, optionally tied to a building floor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "zLevel", default, skip_serializing_if = "Option::is_none")]
    pub z_level: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_name: Option<String>,
}

/// A measured quantity with the service's own display text.
///
/// `value` is meters for distances and seconds for durations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub value: f64,
}

/// How a step is travelled.
///
/// Values the core does not know are kept verbatim so they can be shown
/// to the user instead of failing the whole route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TravelMode {
    Walking,
    Driving,
    Bicycling,
    Transit,
    Other(String),
}

impl From<String> for TravelMode {
    fn from(value: String) -> Self {
        match value.as_str() {
            "WALKING" => TravelMode::Walking,
            "DRIVING" => TravelMode::Driving,
            "BICYCLING" => TravelMode::Bicycling,
            "TRANSIT" => TravelMode::Transit,
            _ => TravelMode::Other(value),
        }
    }
}

impl From<TravelMode> for String {
    fn from(mode: TravelMode) -> Self {
        match mode {
            TravelMode::Walking => "WALKING".into(),
            TravelMode::Driving => "DRIVING".into(),
            TravelMode::Bicycling => "BICYCLING".into(),
            TravelMode::Transit => "TRANSIT".into(),
            TravelMode::Other(value) => value,
        }
    }
}

/// Whether a step happens indoors or outdoors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RouteContext {
    InsideBuilding,
    Outside,
    Other(String),
}

impl From<String> for RouteContext {
    fn from(value: String) -> Self {
        match value.as_str() {
            "InsideBuilding" => RouteContext::InsideBuilding,
            "Outside" => RouteContext::Outside,
            _ => RouteContext::Other(value),
        }
    }
}

impl From<RouteContext> for String {
    fn from(context: RouteContext) -> Self {
        match context {
            RouteContext::InsideBuilding => "InsideBuilding".into(),
            RouteContext::Outside => "Outside".into(),
            RouteContext::Other(value) => value,
        }
    }
}

/// Vertical circulation feature on a walking step.
///
/// Plain road classes ("footway", "residential", ...) land in `Other`
/// and do not affect the heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Highway {
    Steps,
    Ladder,
    Escalator,
    WheelchairRamp,
    WheelchairLift,
    Elevator,
    Other(String),
}

impl From<String> for Highway {
    fn from(value: String) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "STEPS" => Highway::Steps,
            "LADDER" => Highway::Ladder,
            "ESCALATOR" => Highway::Escalator,
            "WHEELCHAIRRAMP" => Highway::WheelchairRamp,
            "WHEELCHAIRLIFT" => Highway::WheelchairLift,
            "ELEVATOR" => Highway::Elevator,
            _ => Highway::Other(value),
        }
    }
}

impl From<Highway> for String {
    fn from(highway: Highway) -> Self {
        match highway {
            Highway::Steps => "STEPS".into(),
            Highway::Ladder => "LADDER".into(),
            Highway::Escalator => "ESCALATOR".into(),
            Highway::WheelchairRamp => "WHEELCHAIRRAMP".into(),
            Highway::WheelchairLift => "WHEELCHAIRLIFT".into(),
            Highway::Elevator => "ELEVATOR".into(),
            Highway::Other(value) => value,
        }
    }
}

/// Display name of a building or venue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildingRef {
    #[serde(rename = "buildingInfo", default)]
    pub info: PlaceInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VenueRef {
    #[serde(rename = "venueInfo", default)]
    pub info: PlaceInfo,
}

/// Building/venue a step starts or ends in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<BuildingRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<VenueRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default)]
    pub vehicle: Vehicle,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitStop {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

/// Public transport details of a TRANSIT step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitInformation {
    #[serde(default)]
    pub line: TransitLine,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headsign: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_stops: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_stop: Option<TransitStop>,
}

/// A granular instruction inside a step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Maneuver {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maneuver: Option<String>,
    #[serde(default)]
    pub distance: TextValue,
    #[serde(default)]
    pub duration: TextValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_location: Option<Location>,
}

/// A contiguous instruction unit within a leg, tied to one travel mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub distance: TextValue,
    #[serde(default)]
    pub duration: TextValue,
    pub start_location: Location,
    /// Carries the destination floor for level changes.
    pub end_location: Location,
    /// Polyline the renderer highlights while the step is active.
    #[serde(default)]
    pub geometry: Vec<Location>,
    /// Stairs, elevator and the like. Decides level-change headings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highway: Option<Highway>,
    pub route_context: RouteContext,
    pub travel_mode: TravelMode,
    /// Service instruction text, used for driving and transit headings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// Step ends at a parking spot.
    #[serde(default)]
    pub parking: bool,
    /// Name of the parking spot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Building or venue the step starts in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_context: Option<StepContext>,
    /// Building or venue the step ends in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_context: Option<StepContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transit_information: Option<TransitInformation>,
    /// Maneuvers shown as the expandable sub-step list.
    #[serde(default)]
    pub steps: Vec<Maneuver>,
}

impl Step {
    /// Instruction text of the first maneuver, if it has any.
    pub fn first_maneuver_instructions(&self) -> Option<&str> {
        self.steps
            .first()
            .and_then(|m| m.instructions.as_deref())
            .filter(|text| !text.trim().is_empty())
    }
}

/// One origin-to-destination segment of a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub distance: TextValue,
    pub duration: TextValue,
    pub start_location: Location,
    pub end_location: Location,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// A complete multi-leg route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub legs: Vec<Leg>,
}

/// Trip-wide distance (meters) and time (seconds).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub total_distance: f64,
    pub total_time: f64,
}

/// Sum distance and duration over every leg of the route.
///
/// Always recomputed from the legs, so repeated calls after a route
/// update never accumulate.
pub fn totals(route: &Route) -> Totals {
    route.legs.iter().fold(Totals::default(), |acc, leg| Totals {
        total_distance: acc.total_distance + leg.distance.value,
        total_time: acc.total_time + leg.duration.value,
    })
}

/// Parse a serialized route.
pub fn parse_route(json: &str) -> Result<Route> {
    serde_json::from_str(json).map_err(|source| NavError::MalformedInput {
        what: "route",
        source,
    })
}

/// Parse a serialized list of steps.
pub fn parse_steps(json: &str) -> Result<Vec<Step>> {
    serde_json::from_str(json).map_err(|source| NavError::MalformedInput {
        what: "steps",
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{leg, walking};

    const TWO_STEP_ROUTE: &str = r##"{
  "legs": [{
    "distance": { "text": "420 m", "value": 420 },
    "duration": { "text": "3 min", "value": 150 },
    "start_location": { "lat": 57.05, "lng": 9.92, "zLevel": 0, "floor_name": "G" },
    "end_location": { "lat": 57.06, "lng": 9.93 },
    "steps": [
      {
        "distance": { "value": 20 },
        "duration": { "value": 15 },
        "start_location": { "lat": 57.05, "lng": 9.92 },
        "end_location": { "lat": 57.051, "lng": 9.921, "floor_name": "2" },
        "highway": "steps",
        "route_context": "InsideBuilding",
        "travel_mode": "WALKING",
        "start_context": { "building": { "buildingInfo": { "name": "Tower A" } } },
        "steps": [{ "instructions": "Go up the stairs" }]
      },
      {
        "distance": { "value": 400 },
        "duration": { "value": 135 },
        "start_location": { "lat": 57.051, "lng": 9.921 },
        "end_location": { "lat": 57.06, "lng": 9.93 },
        "route_context": "Outside",
        "travel_mode": "TRANSIT",
        "transit_information": {
          "line": { "short_name": "2A", "color": "#ff0000", "vehicle": { "type": "BUS" } },
          "headsign": "Centrum",
          "num_stops": 3,
          "arrival_stop": { "name": "Banegården" }
        }
      }
    ]
  }]
}"##;

    #[test]
    fn parse_full_route() {
        let route = parse_route(TWO_STEP_ROUTE).unwrap();

        assert_eq!(route.legs.len(), 1);
        let steps = &route.legs[0].steps;
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].highway, Some(Highway::Steps));
        assert_eq!(steps[0].route_context, RouteContext::InsideBuilding);
        assert_eq!(steps[0].end_location.floor_name.as_deref(), Some("2"));
        assert_eq!(steps[0].first_maneuver_instructions(), Some("Go up the stairs"));
        assert_eq!(route.legs[0].start_location.z_level, Some(0.0));

        let name = steps[0]
            .start_context
            .as_ref()
            .and_then(|c| c.building.as_ref())
            .and_then(|b| b.info.name.as_deref());
        assert_eq!(name, Some("Tower A"));

        let transit = steps[1].transit_information.as_ref().unwrap();
        assert_eq!(steps[1].travel_mode, TravelMode::Transit);
        assert_eq!(transit.line.vehicle.kind.as_deref(), Some("BUS"));
        assert_eq!(transit.line.color.as_deref(), Some("#ff0000"));
        assert_eq!(transit.num_stops, Some(3));
    }

    #[test]
    fn unknown_travel_mode_is_kept() {
        let json = r#"[{
            "start_location": { "lat": 0, "lng": 0 },
            "end_location": { "lat": 0, "lng": 0 },
            "route_context": "Somewhere",
            "travel_mode": "TELEPORT"
        }]"#;
        let steps = parse_steps(json).unwrap();

        assert_eq!(steps[0].travel_mode, TravelMode::Other("TELEPORT".into()));
        assert_eq!(steps[0].route_context, RouteContext::Other("Somewhere".into()));
        assert!(steps[0].steps.is_empty());
    }

    #[test]
    fn malformed_route_fails_fast() {
        let err = parse_route("{ \"legs\": [ { \"distance\": ").unwrap_err();
        assert!(matches!(err, NavError::MalformedInput { what: "route", .. }));
    }

    #[test]
    fn step_missing_travel_mode_is_malformed() {
        let json = r#"[{
            "start_location": { "lat": 0, "lng": 0 },
            "end_location": { "lat": 0, "lng": 0 },
            "route_context": "Outside"
        }]"#;
        assert!(matches!(
            parse_steps(json),
            Err(NavError::MalformedInput { what: "steps", .. })
        ));
    }

    #[test]
    fn empty_route_parses() {
        let route = parse_route("{}").unwrap();
        assert!(route.legs.is_empty());
    }

    #[test]
    fn serialization_keeps_wire_names() {
        let route = parse_route(TWO_STEP_ROUTE).unwrap();
        let value = serde_json::to_value(&route).unwrap();

        let step = &value["legs"][0]["steps"][0];
        assert_eq!(step["highway"], "STEPS");
        assert_eq!(step["travel_mode"], "WALKING");
        assert_eq!(step["start_context"]["building"]["buildingInfo"]["name"], "Tower A");
        assert_eq!(value["legs"][0]["start_location"]["zLevel"], 0.0);
    }

    #[test]
    fn totals_sum_all_legs() {
        let route = Route {
            legs: vec![
                leg(120.0, 60.0, vec![walking()]),
                leg(300.0, 90.0, vec![walking(), walking()]),
            ],
        };

        let t = totals(&route);
        assert_eq!(t.total_distance, 420.0);
        assert_eq!(t.total_time, 150.0);

        // Recomputed, not accumulated
        assert_eq!(totals(&route), t);
    }

    #[test]
    fn totals_of_empty_route() {
        assert_eq!(totals(&Route::default()), Totals::default());
    }
}
