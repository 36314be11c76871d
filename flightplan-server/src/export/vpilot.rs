//! vPilot `.vfp` flight plan file.

use quick_xml::Writer;
use quick_xml::events::{BytesStart, Event};

use crate::plan::Plan;

use super::{Export, ExportError, text};

/// `(attribute, plan field)` pairs copied as text.
const MAPPING: [(&str, &str); 9] = [
    ("FlightType", "type"),
    ("Equipment", "equipment"),
    ("CruiseAltitude", "cruise_altitude"),
    ("CruiseSpeed", "cruise_speed"),
    ("DepartureAirport", "departure"),
    ("DestinationAirport", "destination"),
    ("AlternateAirport", "alternate"),
    ("Remarks", "remarks"),
    ("EquipmentSuffix", "equipment_suffix"),
];

const DEFAULT_FLIGHT_TYPE: &str = "IFR";

/// Render a single `<FlightPlan .../>` element. The file is named after the
/// departure and destination, e.g. `EGLLKJFK.vfp`.
pub(super) fn render(plan: &Plan) -> Result<Export, ExportError> {
    let departure = plan.required_str("departure")?;
    let destination = plan.required_str("destination")?;

    let mut attributes: Vec<(&str, String)> = MAPPING
        .iter()
        .map(|(attr, key)| {
            let value = match text(plan, key) {
                v if v.is_empty() && *attr == "FlightType" => DEFAULT_FLIGHT_TYPE.to_string(),
                v => v,
            };
            (*attr, value)
        })
        .collect();

    attributes.push((
        "Route",
        plan.route().map(ToString::to_string).unwrap_or_default(),
    ));

    if let Some(time) = plan.time_field("departure_time")? {
        attributes.push(("DepartureTime", time.to_hhmm()));
    }
    if let Some(time) = plan.time_field("air_time")? {
        attributes.push(("EnrouteHours", time.hours.to_string()));
        attributes.push(("EnrouteMinutes", time.minutes.to_string()));
    }
    if let Some(time) = plan.time_field("fuel_endurance")? {
        attributes.push(("FuelHours", time.hours.to_string()));
        attributes.push(("FuelMinutes", time.minutes.to_string()));
    }

    let mut element = BytesStart::new("FlightPlan");
    for (attr, value) in &attributes {
        element.push_attribute((*attr, value.as_str()));
    }

    let mut writer = Writer::new(Vec::new());
    writer
        .write_event(Event::Empty(element))
        .map_err(|e| ExportError::Xml(e.to_string()))?;
    let contents =
        String::from_utf8(writer.into_inner()).map_err(|e| ExportError::Xml(e.to_string()))?;

    Ok(Export::File {
        file_name: format!("{departure}{destination}.vfp"),
        contents,
    })
}
