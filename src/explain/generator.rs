//! Canned explanation text for outlier points.
//!
//! A fixed decision tree over the deviation sign and size, the recorded
//! temperature and the day of week picks one template, which is returned as
//! a list of chunks so the HTTP layer can stream them one at a time.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::explain::error::ExplainError;
use crate::explain::format::{format_grouped, format_percent, format_temperature, pluralize_days};
use crate::models::chart::SelectedPoint;
use crate::models::region::Region;

const COLD_SNAP_F: f64 = 32.0;
const HEATING_PIVOT_F: f64 = 45.0;
const MILD_F: f64 = 60.0;
const COMPARISON_COLD_F: f64 = 35.0;
const COMPARISON_HOT_F: f64 = 85.0;
const SIGNIFICANT_DIVERGENCE_PCT: f64 = 10.0;
const MODERATE_DIVERGENCE_PCT: f64 = 5.0;

/// Input of the explanation generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainRequest {
    pub date: NaiveDate,
    #[serde(default)]
    pub actual: f64,
    pub predicted: f64,
    pub state: Region,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub is_comparison_point: bool,
    #[serde(default)]
    pub comparison_predicted: Option<f64>,
    #[serde(default)]
    pub days_difference: Option<i64>,
}

impl ExplainRequest {
    /// Build a request from a selected point; `None` when the point lacks the
    /// values its explanation needs.
    pub fn from_selected(point: &SelectedPoint, region: Region) -> Option<Self> {
        if !point.is_explainable() {
            return None;
        }
        Some(Self {
            date: point.date,
            actual: point.actual.unwrap_or(0.0),
            predicted: point.predicted?,
            state: region,
            temperature: point.temperature,
            is_comparison_point: point.is_comparison_point,
            comparison_predicted: point.comparison_predicted,
            days_difference: point.days_difference,
        })
    }
}

/// Produce the explanation chunks for a point
pub fn generate_explanation(request: &ExplainRequest) -> Result<Vec<String>, ExplainError> {
    if request.predicted == 0.0 {
        return Err(ExplainError::ZeroForecast { date: request.date });
    }

    if request.is_comparison_point {
        if let Some(comparison) = request.comparison_predicted {
            return Ok(comparison_explanation(request, comparison));
        }
    }

    Ok(standard_explanation(request))
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn standard_explanation(request: &ExplainRequest) -> Vec<String> {
    let ExplainRequest {
        date,
        actual,
        predicted,
        state,
        temperature,
        ..
    } = request;
    let region = state.display_name();
    let deviation = (actual - predicted) / predicted * 100.0;
    let pct = format_percent(deviation.abs());
    let higher = deviation > 0.0;
    let gap = format_grouped((actual - predicted).abs());

    match *temperature {
        Some(temp) if higher && temp < COLD_SNAP_F => vec![
            format!("On {date}, electricity demand in {region} came in {pct}% above the forecast. "),
            format!(
                "A cold front pushed temperatures down to {}, well below the expected range. ",
                format_temperature(temp)
            ),
            "Heating load climbed sharply across homes and businesses. ".to_string(),
            "The forecast did not anticipate the sudden drop, ".to_string(),
            format!("so it came up {gap} MWh short. "),
            format!("Past cold snaps in {region} have pushed demand 15-25% above baseline."),
        ],
        _ if higher && is_weekend(*date) => vec![
            format!("Demand on {date} ran {pct}% above the forecast. "),
            "That stands out on a weekend, when load is normally lighter. ".to_string(),
            "A large public event, a holiday weekend at home, ".to_string(),
            "or an industrial site running extra shifts could explain it. ".to_string(),
            format!("Weekend forecasts for {region} may need recalibrating for periodic spikes like this."),
        ],
        _ if higher => {
            let weather = match *temperature {
                Some(temp) => format!(
                    "The recorded {} was {} than expected, ",
                    format_temperature(temp),
                    if temp < HEATING_PIVOT_F { "colder" } else { "warmer" }
                ),
                None => "Temperatures differed from the prediction, ".to_string(),
            };
            let load = match *temperature {
                Some(temp) if temp < HEATING_PIVOT_F => "heating",
                _ => "cooling",
            };
            vec![
                format!("Actual demand on {date} beat the forecast by {pct}% in {region}. "),
                "Several factors likely combined. ".to_string(),
                weather,
                format!("which raised {load} demand. "),
                "Industrial consumption also looks higher than usual for the period.".to_string(),
            ]
        }
        Some(temp) if temp > MILD_F => vec![
            format!("Demand on {date} fell {pct}% short of the forecast. "),
            format!(
                "Mild weather at {} cut heating needs across {region}. ",
                format_temperature(temp)
            ),
            "The forecast assumed cooler conditions and overstated heating load. ".to_string(),
            "Errors in the temperature outlook weigh more heavily ".to_string(),
            "during seasonal transitions like this one.".to_string(),
        ],
        _ => {
            let weather = match *temperature {
                Some(temp) => format!("At a recorded {}, ", format_temperature(temp)),
                None => "Given the weather on the day, ".to_string(),
            };
            vec![
                format!(
                    "On {date}, demand in {region} was {pct}% {} forecast. ",
                    if higher { "above" } else { "below" }
                ),
                format!("The {gap} MWh gap is outside the 10% confidence band. "),
                weather,
                "likely contributors are shifting industrial load, ".to_string(),
                "variable output from distributed generation, ".to_string(),
                "and changes in consumer behaviour. ".to_string(),
                "Continued model tuning should tighten accuracy in similar conditions.".to_string(),
            ]
        }
    }
}

fn comparison_explanation(request: &ExplainRequest, comparison: f64) -> Vec<String> {
    let region = request.state.display_name();
    let date = request.date;
    let days = request.days_difference.unwrap_or(0);
    let diff = comparison - request.predicted;
    let pct_value = (diff / request.predicted * 100.0).abs();
    let pct = format_percent(pct_value);
    let direction = if diff > 0.0 { "higher" } else { "lower" };
    let amount = format_grouped(diff.abs());

    let mut chunks = vec![format!(
        "Comparing two forecasts for {date} in {region}, made {days} {} apart: ",
        pluralize_days(days)
    )];

    if pct_value > SIGNIFICANT_DIVERGENCE_PCT {
        chunks.extend([
            format!("the comparison run departs from the primary run by {pct}% "),
            format!("({direction} by {amount} MWh). "),
            format!("A gap this wide over {days} days points to a real change in model inputs, "),
            "such as revised weather outlooks, new demand baselines or updated capacity assumptions. "
                .to_string(),
        ]);
    } else if pct_value > MODERATE_DIVERGENCE_PCT {
        chunks.extend([
            format!("the comparison run is {pct}% {direction} than the primary run "),
            format!("(a {amount} MWh difference). "),
            format!("Over {days} days between runs, moderate drift like this usually follows "),
            "shifting weather predictions, new industrial schedules or revised renewable estimates. "
                .to_string(),
        ]);
    } else {
        chunks.extend([
            format!("the two runs differ by {pct}% "),
            format!("({amount} MWh {direction} in the comparison). "),
            format!("That is ordinary variation for a {days}-day gap between runs. "),
        ]);
    }

    if let Some(temp) = request.temperature {
        chunks.push(format!(
            "The recorded {} on this date ",
            format_temperature(temp)
        ));
        chunks.push(
            if temp < COMPARISON_COLD_F {
                "means cold conditions, where heating estimates make forecasts more sensitive. "
            } else if temp > COMPARISON_HOT_F {
                "means hot conditions, where cooling load adds forecast uncertainty. "
            } else {
                "is moderate, so temperature is unlikely to be the main source of divergence. "
            }
            .to_string(),
        );
    }

    chunks.push(format!(
        "Uncertainty grows with lead time: the earlier run was made {days} {} sooner ",
        pluralize_days(days)
    ));
    chunks.push("with less accurate inputs, which accounts for this level of divergence.".to_string());

    chunks
}
