//! VATSIM prefile URL.

use reqwest::Url;

use crate::parser::HoursMinutes;
use crate::plan::Plan;
use crate::settings::Settings;

use super::{Export, ExportError, text};

const PREFILE_URL: &str = "https://cert.vatsim.net/fp/file.php";

/// Build the prefile URL. Departure and destination must be present; any
/// other absent field is sent empty.
pub(super) fn render(plan: &Plan, settings: &Settings) -> Result<Export, ExportError> {
    let departure = plan.required_str("departure")?;
    let destination = plan.required_str("destination")?;

    let aircraft = ["aircraft", "equipment_suffix"]
        .into_iter()
        .map(|key| text(plan, key))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    let departure_time = plan
        .time_field("departure_time")?
        .map(|t| t.to_hhmm())
        .unwrap_or_default();
    let air_time = plan.time_field("air_time")?;
    let block_time = plan.time_field("block_time")?;

    let params: [(&str, String); 15] = [
        ("2", text(plan, "callsign")),
        ("3", aircraft),
        ("4", text(plan, "cruise_speed")),
        ("5", departure.to_string()),
        ("6", departure_time),
        ("7", text(plan, "cruise_altitude")),
        ("8", plan.route_to_str(true, false)),
        ("9", destination.to_string()),
        ("10a", hours(air_time)),
        ("10b", minutes(air_time)),
        ("11", text(plan, "remarks")),
        ("12a", hours(block_time)),
        ("12b", minutes(block_time)),
        ("13", text(plan, "alternate")),
        ("14", plan.pilot(settings, Some(" "))),
    ];

    let url =
        Url::parse_with_params(PREFILE_URL, &params).map_err(|e| ExportError::Url(e.to_string()))?;

    Ok(Export::Url {
        url: url.to_string(),
    })
}

fn hours(time: Option<HoursMinutes>) -> String {
    time.map(|t| t.hours.to_string()).unwrap_or_default()
}

fn minutes(time: Option<HoursMinutes>) -> String {
    time.map(|t| t.minutes.to_string()).unwrap_or_default()
}
