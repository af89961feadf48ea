//! Heading resolution for route steps.
//!
//! Turns a step, the step before it and the host's translations into
//! the heading text and action icon shown for that step. The decision
//! depends on travel mode, vertical circulation features and indoor/
//! outdoor transitions; the first matching rule wins.
//!
//! Resolution returns `None` when a translation the chosen rule needs is
//! missing. Callers render nothing for such a step until translations
//! arrive.

use serde::Serialize;

use crate::route::{Highway, RouteContext, Step, StepContext, TravelMode};
use crate::translations::{TranslationKey, TranslationSet};

/// Icon identifiers understood by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Car,
    Bike,
    Walk,
    Park,
    Stairs,
    Ladder,
    Escalator,
    WheelchairRamp,
    WheelchairLift,
    Elevator,
    Exit,
    Enter,
    TransitStop,
    Circle,
    Boat,
    Bus,
    Railway,
    Train,
    Subway,
    Transit,
}

impl Icon {
    pub fn as_str(self) -> &'static str {
        match self {
            Icon::Car => "car",
            Icon::Bike => "bike",
            Icon::Walk => "walk",
            Icon::Park => "park",
            Icon::Stairs => "stairs",
            Icon::Ladder => "ladder",
            Icon::Escalator => "escalator",
            Icon::WheelchairRamp => "wheelchair-ramp",
            Icon::WheelchairLift => "wheelchair-lift",
            Icon::Elevator => "elevator",
            Icon::Exit => "exit",
            Icon::Enter => "enter",
            Icon::TransitStop => "transit-stop",
            Icon::Circle => "circle",
            Icon::Boat => "boat",
            Icon::Bus => "bus",
            Icon::Railway => "railway",
            Icon::Train => "train",
            Icon::Subway => "subway",
            Icon::Transit => "transit",
        }
    }
}

/// Heading text and action icon of a step.
///
/// `icon` is `None` only for travel modes the core does not know.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heading {
    pub text: String,
    pub icon: Option<Icon>,
}

impl Heading {
    fn new(text: impl Into<String>, icon: Icon) -> Self {
        Heading {
            text: text.into(),
            icon: Some(icon),
        }
    }
}

/// Inputs the resolver reads besides the steps themselves.
#[derive(Debug, Clone, Copy)]
pub struct HeadingContext<'a> {
    pub translations: &'a TranslationSet,
    /// Name of the trip origin, shown on the first step.
    pub origin_label: &'a str,
}

impl HeadingContext<'_> {
    fn translate(&self, key: TranslationKey) -> Option<&str> {
        self.translations.get(key)
    }
}

/// Resolve the heading of `current`, given the step shown before it.
pub fn resolve_heading(
    current: &Step,
    previous: Option<&Step>,
    ctx: &HeadingContext<'_>,
) -> Option<Heading> {
    match &current.travel_mode {
        TravelMode::Driving => {
            default_text(current, TranslationKey::Drive, ctx).map(|t| Heading::new(t, Icon::Car))
        }
        TravelMode::Bicycling => {
            default_text(current, TranslationKey::Bike, ctx).map(|t| Heading::new(t, Icon::Bike))
        }
        TravelMode::Walking => walking_heading(current, previous, ctx),
        TravelMode::Transit => transit_heading(current, ctx),
        TravelMode::Other(mode) => Some(Heading {
            text: format!("Unknown travel mode: {mode}"),
            icon: None,
        }),
    }
}

/// First maneuver instruction, else the translated mode verb.
fn default_text(step: &Step, verb: TranslationKey, ctx: &HeadingContext<'_>) -> Option<String> {
    match step.first_maneuver_instructions() {
        Some(text) => Some(text.to_string()),
        None => ctx.translate(verb).map(str::to_string),
    }
}

fn walk(step: &Step, ctx: &HeadingContext<'_>) -> Option<Heading> {
    default_text(step, TranslationKey::Walk, ctx).map(|t| Heading::new(t, Icon::Walk))
}

fn walking_heading(
    current: &Step,
    previous: Option<&Step>,
    ctx: &HeadingContext<'_>,
) -> Option<Heading> {
    if current.parking {
        let park = ctx.translate(TranslationKey::Park)?;
        let text = match current.label.as_deref().filter(|l| !l.is_empty()) {
            Some(label) => format!("{park} {} {label}", ctx.translate(TranslationKey::At)?),
            None => park.to_string(),
        };
        return Some(Heading::new(text, Icon::Park));
    }

    if let Some((key, icon)) = current.highway.as_ref().and_then(level_change) {
        let floor = current.end_location.floor_name.as_deref().unwrap_or_default();
        return Some(Heading::new(join(ctx.translate(key)?, floor), icon));
    }

    let Some(previous) = previous else {
        return Some(origin(ctx));
    };

    use RouteContext::{InsideBuilding, Outside};
    match (&previous.route_context, &current.route_context) {
        (InsideBuilding, Outside) => {
            let exit = ctx.translate(TranslationKey::Exit)?;
            let place = place_annotation(current.start_context.as_ref(), ctx)?;
            Some(Heading::new(join(exit, &place), Icon::Exit))
        }
        (InsideBuilding, InsideBuilding) => walk(current, ctx),
        (Outside, Outside) if previous.travel_mode == TravelMode::Transit => {
            match arrival_stop_name(previous) {
                Some(stop) => Some(Heading::new(stop, Icon::TransitStop)),
                None => walk(current, ctx),
            }
        }
        (Outside, Outside) => walk(current, ctx),
        (Outside, InsideBuilding) => {
            let enter = ctx.translate(TranslationKey::Enter)?;
            let place = place_annotation(current.end_context.as_ref(), ctx)?;
            Some(Heading::new(join(enter, &place), Icon::Enter))
        }
        _ => Some(origin(ctx)),
    }
}

fn origin(ctx: &HeadingContext<'_>) -> Heading {
    Heading::new(ctx.origin_label, Icon::Circle)
}

fn level_change(highway: &Highway) -> Option<(TranslationKey, Icon)> {
    match highway {
        Highway::Steps => Some((TranslationKey::TakeStaircaseToLevel, Icon::Stairs)),
        Highway::Ladder => Some((TranslationKey::TakeLadderToLevel, Icon::Ladder)),
        Highway::Escalator => Some((TranslationKey::TakeEscalatorToLevel, Icon::Escalator)),
        Highway::WheelchairRamp => Some((
            TranslationKey::TakeWheelchairRampToLevel,
            Icon::WheelchairRamp,
        )),
        Highway::WheelchairLift => Some((
            TranslationKey::TakeWheelchairLiftToLevel,
            Icon::WheelchairLift,
        )),
        Highway::Elevator => Some((TranslationKey::TakeElevatorToLevel, Icon::Elevator)),
        Highway::Other(_) => None,
    }
}

fn arrival_stop_name(step: &Step) -> Option<&str> {
    step.transit_information
        .as_ref()?
        .arrival_stop
        .as_ref()?
        .name
        .as_deref()
        .filter(|name| !name.is_empty())
}

/// "<name> Building" or "<name> Venue", empty when the context names neither.
///
/// `None` means the needed suffix translation is missing.
fn place_annotation(context: Option<&StepContext>, ctx: &HeadingContext<'_>) -> Option<String> {
    let Some(context) = context else {
        return Some(String::new());
    };

    let building = context.building.as_ref().and_then(|b| b.info.name.as_deref());
    let venue = context.venue.as_ref().and_then(|v| v.info.name.as_deref());

    match (building, venue) {
        (Some(name), _) => Some(format!("{name} {}", ctx.translate(TranslationKey::Building)?)),
        (None, Some(name)) => Some(format!("{name} {}", ctx.translate(TranslationKey::Venue)?)),
        (None, None) => Some(String::new()),
    }
}

fn join(head: &str, tail: &str) -> String {
    if tail.is_empty() {
        head.to_string()
    } else {
        format!("{head} {tail}")
    }
}

fn transit_heading(current: &Step, ctx: &HeadingContext<'_>) -> Option<Heading> {
    let text = match current.instructions.as_deref().filter(|t| !t.trim().is_empty()) {
        Some(text) => text.to_string(),
        None => ctx.translate(TranslationKey::RideTheBus)?.to_string(),
    };
    Some(Heading::new(text, vehicle_icon(vehicle_kind(current))))
}

fn vehicle_kind(step: &Step) -> Option<&str> {
    step.transit_information
        .as_ref()
        .and_then(|t| t.line.vehicle.kind.as_deref())
}

/// Icon for a transit vehicle type. Unknown or missing types map to `Transit`.
pub fn vehicle_icon(kind: Option<&str>) -> Icon {
    match kind.map(str::to_ascii_lowercase).as_deref() {
        Some("boat" | "ferry") => Icon::Boat,
        Some("bus" | "intercity_bus" | "trolleybus") => Icon::Bus,
        Some("railway" | "rail") => Icon::Railway,
        Some("train" | "heavy_rail" | "commuter_train" | "high_speed_train") => Icon::Train,
        Some("subway" | "metro_rail") => Icon::Subway,
        _ => Icon::Transit,
    }
}

/// How the route line of a step is drawn next to its mode icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    Solid,
    Dotted,
}

/// Travel-mode icon shown beside the step, separate from the action icon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TravelModeIndicator {
    pub icon: Option<Icon>,
    pub line_style: LineStyle,
}

pub fn travel_mode_indicator(step: &Step) -> TravelModeIndicator {
    let icon = if step.transit_information.is_some() {
        Some(vehicle_icon(vehicle_kind(step)))
    } else {
        match step.travel_mode {
            TravelMode::Walking => Some(Icon::Walk),
            TravelMode::Driving => Some(Icon::Car),
            TravelMode::Bicycling => Some(Icon::Bike),
            TravelMode::Transit => Some(Icon::Transit),
            TravelMode::Other(_) => None,
        }
    };

    let line_style = if step.travel_mode == TravelMode::Transit {
        LineStyle::Solid
    } else {
        LineStyle::Dotted
    };

    TravelModeIndicator { icon, line_style }
}

/// Line and direction details rendered under a TRANSIT heading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitDetail {
    /// Short line name, e.g. "2A".
    pub line_name: Option<String>,
    /// Line badge background as sent by the service.
    pub color: Option<String>,
    /// Line badge text color.
    pub text_color: Option<String>,
    /// Direction the vehicle is heading.
    pub headsign: Option<String>,
    pub num_stops: Option<u32>,
    /// Number of stops with the translated "stops" suffix.
    pub stops_text: Option<String>,
    /// Vehicle icon.
    pub icon: Icon,
}

pub fn transit_detail(step: &Step, translations: &TranslationSet) -> Option<TransitDetail> {
    if step.travel_mode != TravelMode::Transit {
        return None;
    }
    let info = step.transit_information.as_ref()?;

    let stops_text = info.num_stops.and_then(|n| {
        translations
            .get(TranslationKey::Stops)
            .map(|stops| format!("{n} {stops}"))
    });

    Some(TransitDetail {
        line_name: info.line.short_name.clone(),
        color: info.line.color.clone(),
        text_color: info.line.text_color.clone(),
        headsign: info.headsign.clone(),
        num_stops: info.num_stops,
        stops_text,
        icon: vehicle_icon(info.line.vehicle.kind.as_deref()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{
        building, english, indoor, step, transit, venue, walking, with_highway, with_maneuvers,
    };
    use crate::route::TravelMode;

    fn resolve(current: &Step, previous: Option<&Step>) -> Heading {
        let translations = english();
        let ctx = HeadingContext {
            translations: &translations,
            origin_label: "Main Entrance",
        };
        resolve_heading(current, previous, &ctx).unwrap()
    }

    fn assert_heading(h: &Heading, text: &str, icon: Icon) {
        assert_eq!(h.text, text);
        assert_eq!(h.icon, Some(icon));
    }

    #[test]
    fn driving_uses_first_maneuver() {
        let s = with_maneuvers(
            step(TravelMode::Driving, RouteContext::Outside),
            &["Head north on Vesterbro", "Turn left"],
        );
        assert_heading(&resolve(&s, None), "Head north on Vesterbro", Icon::Car);
    }

    #[test]
    fn driving_and_biking_fall_back_to_verb() {
        let drive = step(TravelMode::Driving, RouteContext::Outside);
        let bike = step(TravelMode::Bicycling, RouteContext::Outside);
        assert_heading(&resolve(&drive, None), "Drive", Icon::Car);
        assert_heading(&resolve(&bike, Some(&drive)), "Bike", Icon::Bike);
    }

    #[test]
    fn walking_parking_with_label() {
        let mut s = walking();
        s.parking = true;
        s.label = Some("Lot B".into());
        assert_heading(&resolve(&s, None), "Park at Lot B", Icon::Park);

        s.label = None;
        assert_heading(&resolve(&s, None), "Park", Icon::Park);
    }

    #[test]
    fn walking_parking_beats_highway() {
        let mut s = with_highway(walking(), Highway::Steps, "2");
        s.parking = true;
        assert_heading(&resolve(&s, None), "Park", Icon::Park);
    }

    #[test]
    fn walking_vertical_circulation() {
        let cases = [
            (Highway::Steps, "Take staircase to level 2", Icon::Stairs),
            (Highway::Ladder, "Take ladder to level 2", Icon::Ladder),
            (Highway::Escalator, "Take escalator to level 2", Icon::Escalator),
            (
                Highway::WheelchairRamp,
                "Take wheelchair ramp to level 2",
                Icon::WheelchairRamp,
            ),
            (
                Highway::WheelchairLift,
                "Take wheelchair lift to level 2",
                Icon::WheelchairLift,
            ),
            (Highway::Elevator, "Take elevator to level 2", Icon::Elevator),
        ];

        for (highway, text, icon) in cases {
            let s = with_highway(indoor(), highway, "2");
            // Highway wins regardless of the previous step
            assert_heading(&resolve(&s, Some(&walking())), text, icon);
        }
    }

    #[test]
    fn walking_plain_highway_is_ignored() {
        let s = with_highway(walking(), Highway::Other("footway".into()), "G");
        assert_heading(&resolve(&s, Some(&walking())), "Walk", Icon::Walk);
    }

    #[test]
    fn walking_exit_building() {
        let mut s = walking();
        s.start_context = Some(building("Tower A"));
        assert_heading(&resolve(&s, Some(&indoor())), "Exit Tower A Building", Icon::Exit);
    }

    #[test]
    fn walking_exit_venue_and_unnamed() {
        let mut s = walking();
        s.start_context = Some(venue("Harbour Campus"));
        assert_heading(&resolve(&s, Some(&indoor())), "Exit Harbour Campus Venue", Icon::Exit);

        s.start_context = None;
        assert_heading(&resolve(&s, Some(&indoor())), "Exit", Icon::Exit);
    }

    #[test]
    fn walking_inside_to_inside() {
        let s = with_maneuvers(indoor(), &["Walk past the reception"]);
        assert_heading(&resolve(&s, Some(&indoor())), "Walk past the reception", Icon::Walk);
        assert_heading(&resolve(&indoor(), Some(&indoor())), "Walk", Icon::Walk);
    }

    #[test]
    fn walking_after_transit_names_arrival_stop() {
        let bus = transit(Some("BUS"), Some("Banegården"));
        assert_heading(&resolve(&walking(), Some(&bus)), "Banegården", Icon::TransitStop);
    }

    #[test]
    fn walking_after_transit_without_stop_walks() {
        let bus = transit(Some("BUS"), None);
        assert_heading(&resolve(&walking(), Some(&bus)), "Walk", Icon::Walk);
    }

    #[test]
    fn walking_outside_to_outside() {
        let s = with_maneuvers(walking(), &["Cross the square"]);
        assert_heading(&resolve(&s, Some(&walking())), "Cross the square", Icon::Walk);
    }

    #[test]
    fn walking_enter_building() {
        let mut s = indoor();
        s.end_context = Some(building("Tower B"));
        assert_heading(&resolve(&s, Some(&walking())), "Enter Tower B Building", Icon::Enter);

        s.end_context = Some(venue("Expo"));
        assert_heading(&resolve(&s, Some(&walking())), "Enter Expo Venue", Icon::Enter);
    }

    #[test]
    fn walking_first_step_shows_origin() {
        assert_heading(&resolve(&walking(), None), "Main Entrance", Icon::Circle);
    }

    #[test]
    fn walking_origin_label_may_be_empty() {
        let translations = english();
        let ctx = HeadingContext {
            translations: &translations,
            origin_label: "",
        };
        let h = resolve_heading(&walking(), None, &ctx).unwrap();
        assert_heading(&h, "", Icon::Circle);
    }

    #[test]
    fn walking_unknown_context_falls_back_to_origin() {
        let odd = step(TravelMode::Walking, RouteContext::Other("Tunnel".into()));
        assert_heading(&resolve(&walking(), Some(&odd)), "Main Entrance", Icon::Circle);
    }

    #[test]
    fn transit_heading_and_icon() {
        let mut s = transit(Some("SUBWAY"), None);
        assert_heading(&resolve(&s, None), "Ride the bus", Icon::Subway);

        s.instructions = Some("Metro towards Lufthavnen".into());
        assert_heading(&resolve(&s, None), "Metro towards Lufthavnen", Icon::Subway);
    }

    #[test]
    fn vehicle_lookup() {
        assert_eq!(vehicle_icon(Some("BOAT")), Icon::Boat);
        assert_eq!(vehicle_icon(Some("bus")), Icon::Bus);
        assert_eq!(vehicle_icon(Some("RAILWAY")), Icon::Railway);
        assert_eq!(vehicle_icon(Some("TRAIN")), Icon::Train);
        assert_eq!(vehicle_icon(Some("SUBWAY")), Icon::Subway);
        assert_eq!(vehicle_icon(Some("GONDOLA_LIFT")), Icon::Transit);
        assert_eq!(vehicle_icon(None), Icon::Transit);
    }

    #[test]
    fn unknown_travel_mode() {
        let s = step(TravelMode::Other("TELEPORT".into()), RouteContext::Outside);
        let h = resolve(&s, None);
        assert_eq!(h.text, "Unknown travel mode: TELEPORT");
        assert_eq!(h.icon, None);
    }

    #[test]
    fn missing_translation_yields_nothing() {
        let translations = TranslationSet::from_pairs([("walk", "Walk")]);
        let ctx = HeadingContext {
            translations: &translations,
            origin_label: "",
        };

        let stairs = with_highway(indoor(), Highway::Steps, "1");
        assert_eq!(resolve_heading(&stairs, None, &ctx), None);

        let mut exit = walking();
        exit.start_context = Some(building("Tower A"));
        assert_eq!(resolve_heading(&exit, Some(&indoor()), &ctx), None);

        // Rules that need only present keys still resolve
        let h = resolve_heading(&walking(), Some(&walking()), &ctx).unwrap();
        assert_eq!(h.text, "Walk");
    }

    #[test]
    fn maneuver_text_needs_no_translation() {
        let empty = TranslationSet::default();
        let ctx = HeadingContext {
            translations: &empty,
            origin_label: "",
        };
        let s = with_maneuvers(step(TravelMode::Driving, RouteContext::Outside), &["Go"]);
        assert_eq!(resolve_heading(&s, None, &ctx).unwrap().text, "Go");
    }

    #[test]
    fn indicator_line_style() {
        let bus = travel_mode_indicator(&transit(Some("BUS"), None));
        assert_eq!(bus.icon, Some(Icon::Bus));
        assert_eq!(bus.line_style, LineStyle::Solid);

        let walk = travel_mode_indicator(&walking());
        assert_eq!(walk.icon, Some(Icon::Walk));
        assert_eq!(walk.line_style, LineStyle::Dotted);

        let drive = travel_mode_indicator(&step(TravelMode::Driving, RouteContext::Outside));
        assert_eq!(drive.icon, Some(Icon::Car));
        assert_eq!(drive.line_style, LineStyle::Dotted);
    }

    #[test]
    fn transit_detail_fields() {
        let s = transit(Some("FERRY"), Some("Nyhavn"));
        let detail = transit_detail(&s, &english()).unwrap();

        assert_eq!(detail.line_name.as_deref(), Some("2A"));
        assert_eq!(detail.color.as_deref(), Some("#ff0000"));
        assert_eq!(detail.headsign.as_deref(), Some("Centrum"));
        assert_eq!(detail.stops_text.as_deref(), Some("4 stops"));
        assert_eq!(detail.icon, Icon::Boat);

        assert!(transit_detail(&walking(), &english()).is_none());
    }

    #[test]
    fn icon_ids_match_wire_names() {
        assert_eq!(Icon::WheelchairRamp.as_str(), "wheelchair-ramp");
        assert_eq!(
            serde_json::to_value(Icon::TransitStop).unwrap(),
            serde_json::json!("transit-stop")
        );
    }
}
