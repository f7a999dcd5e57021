use std::ops::RangeInclusive;
use std::path::PathBuf;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;

pub mod store;

pub const CUSTOMER_TYPES: [&str; 2] = ["Loyal Customer", "Disloyal Customer"];
pub const FLIGHT_DISTANCE_RANGE: RangeInclusive<u32> = 500..=2500;
pub const DELAY_RANGE_MINUTES: RangeInclusive<u32> = 0..=60;

/// Rating sums below this are labeled neutral or dissatisfied.
pub const SATISFACTION_THRESHOLD: i64 = 60;
pub const SATISFIED: &str = "satisfied";
pub const NEUTRAL_OR_DISSATISFIED: &str = "neutral or dissatisfied";

/// Column order of the survey CSV, matching the test dataset layout.
pub const SURVEY_HEADER: [&str; 25] = [
    "",
    "id",
    "Gender",
    "Customer Type",
    "Age",
    "Type of Travel",
    "Class",
    "Flight Distance",
    "Inflight wifi service",
    "Departure/Arrival time convenient",
    "Ease of Online booking",
    "Gate location",
    "Food and drink",
    "Online boarding",
    "Seat comfort",
    "Inflight entertainment",
    "On-board service",
    "Leg room service",
    "Baggage handling",
    "Checkin service",
    "Inflight service",
    "Cleanliness",
    "Departure Delay in Minutes",
    "Arrival Delay in Minutes",
    "satisfaction",
];

#[derive(Debug, thiserror::Error)]
pub enum SurveyError {
    #[error("rating {field} is not an integer: {value:?}")]
    InvalidRating { field: &'static str, value: String },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Submitted form; absent fields are written as empty cells.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SurveyForm {
    pub id: Option<String>,
    pub gender: Option<String>,
    pub age: Option<String>,
    #[serde(rename = "travelType")]
    pub travel_type: Option<String>,
    pub class: Option<String>,
    pub wifi: Option<String>,
    #[serde(rename = "timeConvenient")]
    pub time_convenient: Option<String>,
    pub booking: Option<String>,
    #[serde(rename = "gateLocation")]
    pub gate_location: Option<String>,
    #[serde(rename = "foodDrink")]
    pub food_drink: Option<String>,
    #[serde(rename = "onlineBoarding")]
    pub online_boarding: Option<String>,
    #[serde(rename = "seatComfort")]
    pub seat_comfort: Option<String>,
    pub entertainment: Option<String>,
    pub onboard: Option<String>,
    pub legroom: Option<String>,
    pub baggage: Option<String>,
    pub checkin: Option<String>,
    pub inflight: Option<String>,
    #[serde(rename = "Cleanliness")]
    pub cleanliness: Option<String>,
}

impl SurveyForm {
    /// The fourteen service ratings in header order, keyed by form field.
    pub fn ratings(&self) -> [(&'static str, Option<&str>); 14] {
        [
            ("wifi", self.wifi.as_deref()),
            ("timeConvenient", self.time_convenient.as_deref()),
            ("booking", self.booking.as_deref()),
            ("gateLocation", self.gate_location.as_deref()),
            ("foodDrink", self.food_drink.as_deref()),
            ("onlineBoarding", self.online_boarding.as_deref()),
            ("seatComfort", self.seat_comfort.as_deref()),
            ("entertainment", self.entertainment.as_deref()),
            ("onboard", self.onboard.as_deref()),
            ("legroom", self.legroom.as_deref()),
            ("baggage", self.baggage.as_deref()),
            ("checkin", self.checkin.as_deref()),
            ("inflight", self.inflight.as_deref()),
            ("Cleanliness", self.cleanliness.as_deref()),
        ]
    }
}

/// Fields the form does not collect, drawn uniformly at random.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticFields {
    pub customer_type: &'static str,
    pub flight_distance: u32,
    pub departure_delay: u32,
    pub arrival_delay: u32,
}

impl SyntheticFields {
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            customer_type: CUSTOMER_TYPES.choose(rng).copied().unwrap_or(CUSTOMER_TYPES[0]),
            flight_distance: rng.gen_range(FLIGHT_DISTANCE_RANGE),
            departure_delay: rng.gen_range(DELAY_RANGE_MINUTES),
            arrival_delay: rng.gen_range(DELAY_RANGE_MINUTES),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyRow {
    pub fields: Vec<String>,
}

impl SurveyRow {
    pub fn build(form: &SurveyForm, synthetic: &SyntheticFields) -> Result<Self, SurveyError> {
        let ratings = form.ratings();

        let mut rating_sum = 0i64;
        let mut rating_cells = Vec::with_capacity(ratings.len());
        for &(field, value) in &ratings {
            let raw = value.unwrap_or("");
            let trimmed = raw.trim();
            let parsed = trimmed
                .parse::<i64>()
                .map_err(|_| SurveyError::InvalidRating {
                    field,
                    value: raw.to_string(),
                })?;
            rating_sum += parsed;
            rating_cells.push(trimmed.to_string());
        }
        let satisfaction = satisfaction_label(rating_sum);

        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let mut fields = Vec::with_capacity(SURVEY_HEADER.len());
        fields.push("0".to_string());
        fields.push(text(&form.id));
        fields.push(text(&form.gender));
        fields.push(synthetic.customer_type.to_string());
        fields.push(text(&form.age));
        fields.push(text(&form.travel_type));
        fields.push(text(&form.class));
        fields.push(synthetic.flight_distance.to_string());
        fields.extend(rating_cells);
        fields.push(synthetic.departure_delay.to_string());
        fields.push(synthetic.arrival_delay.to_string());
        fields.push(satisfaction.to_string());

        debug_assert_eq!(fields.len(), SURVEY_HEADER.len());
        Ok(Self { fields })
    }

    pub fn satisfaction(&self) -> &str {
        self.fields.last().map(String::as_str).unwrap_or("")
    }
}

pub fn satisfaction_label(rating_sum: i64) -> &'static str {
    if rating_sum < SATISFACTION_THRESHOLD {
        NEUTRAL_OR_DISSATISFIED
    } else {
        SATISFIED
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/survey/tests.rs"]
mod tests;
