//! Synthetic routes and translations shared by the unit tests.

use crate::route::{
    BuildingRef, Highway, Leg, Location, Maneuver, PlaceInfo, Route, RouteContext, Step,
    StepContext, TextValue, TransitInformation, TransitLine, TransitStop, TravelMode, Vehicle,
    VenueRef,
};
use crate::translations::TranslationSet;

pub fn loc(lat: f64, lng: f64) -> Location {
    Location {
        lat,
        lng,
        z_level: None,
        floor_name: None,
    }
}

pub fn step(mode: TravelMode, context: RouteContext) -> Step {
    Step {
        distance: TextValue {
            text: None,
            value: 10.0,
        },
        duration: TextValue {
            text: None,
            value: 8.0,
        },
        start_location: loc(57.0, 9.0),
        end_location: loc(57.001, 9.001),
        geometry: vec![loc(57.0, 9.0), loc(57.001, 9.001)],
        highway: None,
        route_context: context,
        travel_mode: mode,
        instructions: None,
        parking: false,
        label: None,
        start_context: None,
        end_context: None,
        transit_information: None,
        steps: Vec::new(),
    }
}

pub fn walking() -> Step {
    step(TravelMode::Walking, RouteContext::Outside)
}

pub fn indoor() -> Step {
    step(TravelMode::Walking, RouteContext::InsideBuilding)
}

pub fn with_highway(mut s: Step, highway: Highway, floor: &str) -> Step {
    s.highway = Some(highway);
    s.end_location.floor_name = Some(floor.to_string());
    s
}

pub fn with_maneuvers(mut s: Step, instructions: &[&str]) -> Step {
    s.steps = instructions
        .iter()
        .map(|text| Maneuver {
            instructions: Some(text.to_string()),
            distance: TextValue {
                text: None,
                value: 5.0,
            },
            ..Maneuver::default()
        })
        .collect();
    s
}

pub fn building(name: &str) -> StepContext {
    StepContext {
        building: Some(BuildingRef {
            info: PlaceInfo {
                name: Some(name.to_string()),
            },
        }),
        venue: None,
    }
}

pub fn venue(name: &str) -> StepContext {
    StepContext {
        building: None,
        venue: Some(VenueRef {
            info: PlaceInfo {
                name: Some(name.to_string()),
            },
        }),
    }
}

pub fn transit(vehicle: Option<&str>, arrival: Option<&str>) -> Step {
    let mut s = step(TravelMode::Transit, RouteContext::Outside);
    s.transit_information = Some(TransitInformation {
        line: TransitLine {
            short_name: Some("2A".into()),
            color: Some("#ff0000".into()),
            text_color: Some("#ffffff".into()),
            vehicle: Vehicle {
                kind: vehicle.map(str::to_string),
            },
        },
        headsign: Some("Centrum".into()),
        num_stops: Some(4),
        arrival_stop: arrival.map(|name| TransitStop {
            name: Some(name.to_string()),
            location: None,
        }),
    });
    s
}

pub fn leg(distance: f64, duration: f64, steps: Vec<Step>) -> Leg {
    Leg {
        distance: TextValue {
            text: None,
            value: distance,
        },
        duration: TextValue {
            text: None,
            value: duration,
        },
        start_location: loc(57.0, 9.0),
        end_location: loc(57.01, 9.01),
        steps,
    }
}

/// Route with legs of the given sizes, all outdoor walking steps.
pub fn route_of(sizes: &[usize]) -> Route {
    Route {
        legs: sizes
            .iter()
            .map(|&n| leg(100.0, 60.0, (0..n).map(|_| walking()).collect()))
            .collect(),
    }
}

pub fn english() -> TranslationSet {
    TranslationSet::from_pairs([
        ("walk", "Walk"),
        ("drive", "Drive"),
        ("bike", "Bike"),
        ("park", "Park"),
        ("at", "at"),
        ("takeStaircaseToLevel", "Take staircase to level"),
        ("takeLadderToLevel", "Take ladder to level"),
        ("takeEscalatorToLevel", "Take escalator to level"),
        ("takeWheelchairRampToLevel", "Take wheelchair ramp to level"),
        ("takeWheelchairLiftToLevel", "Take wheelchair lift to level"),
        ("takeElevatorToLevel", "Take elevator to level"),
        ("exit", "Exit"),
        ("enter", "Enter"),
        ("building", "Building"),
        ("venue", "Venue"),
        ("rideTheBus", "Ride the bus"),
        ("stops", "stops"),
    ])
}
