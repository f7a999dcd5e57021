use rand::SeedableRng;
use rand::rngs::StdRng;

use super::store::SurveyStore;
use super::*;
use crate::test_support::make_temp_dir;

fn form_with_ratings(ratings: [&str; 14]) -> SurveyForm {
    let r = |i: usize| Some(ratings[i].to_string());
    SurveyForm {
        id: Some("42".to_string()),
        gender: Some("Male".to_string()),
        age: Some("35".to_string()),
        travel_type: Some("Business travel".to_string()),
        class: Some("Eco Plus".to_string()),
        wifi: r(0),
        time_convenient: r(1),
        booking: r(2),
        gate_location: r(3),
        food_drink: r(4),
        online_boarding: r(5),
        seat_comfort: r(6),
        entertainment: r(7),
        onboard: r(8),
        legroom: r(9),
        baggage: r(10),
        checkin: r(11),
        inflight: r(12),
        cleanliness: r(13),
    }
}

fn synthetic() -> SyntheticFields {
    SyntheticFields {
        customer_type: "Loyal Customer",
        flight_distance: 1200,
        departure_delay: 5,
        arrival_delay: 12,
    }
}

#[test]
fn test_row_follows_header_order() {
    let form = form_with_ratings(["1", "2", "3", "4", "5", "0", "1", "2", "3", "4", "5", "0", "1", "2"]);
    let row = SurveyRow::build(&form, &synthetic()).unwrap();
    assert_eq!(row.fields.len(), SURVEY_HEADER.len());

    let field = |name: &str| {
        let idx = SURVEY_HEADER.iter().position(|h| *h == name).unwrap();
        row.fields[idx].as_str()
    };
    assert_eq!(row.fields[0], "0");
    assert_eq!(field("id"), "42");
    assert_eq!(field("Customer Type"), "Loyal Customer");
    assert_eq!(field("Class"), "Eco Plus");
    assert_eq!(field("Flight Distance"), "1200");
    assert_eq!(field("Inflight wifi service"), "1");
    assert_eq!(field("Online boarding"), "0");
    assert_eq!(field("Cleanliness"), "2");
    assert_eq!(field("Departure Delay in Minutes"), "5");
    assert_eq!(field("Arrival Delay in Minutes"), "12");
    // sum is 33
    assert_eq!(row.satisfaction(), NEUTRAL_OR_DISSATISFIED);
}

#[test]
fn test_satisfaction_threshold() {
    assert_eq!(satisfaction_label(59), NEUTRAL_OR_DISSATISFIED);
    assert_eq!(satisfaction_label(60), SATISFIED);

    // 12 * 5 = 60
    let form = form_with_ratings(["5", "5", "5", "5", "5", "5", "5", "5", "5", "5", "5", "5", "0", "0"]);
    let row = SurveyRow::build(&form, &synthetic()).unwrap();
    assert_eq!(row.satisfaction(), SATISFIED);

    let form = form_with_ratings(["5", "5", "5", "5", "5", "5", "5", "5", "5", "5", "5", "4", "0", "0"]);
    let row = SurveyRow::build(&form, &synthetic()).unwrap();
    assert_eq!(row.satisfaction(), NEUTRAL_OR_DISSATISFIED);
}

#[test]
fn test_invalid_or_missing_rating() {
    let mut form = form_with_ratings(["3"; 14]);
    form.seat_comfort = Some("great".to_string());
    let err = SurveyRow::build(&form, &synthetic()).unwrap_err();
    assert!(matches!(err, SurveyError::InvalidRating { field: "seatComfort", .. }));

    let mut form = form_with_ratings(["3"; 14]);
    form.baggage = None;
    assert!(SurveyRow::build(&form, &synthetic()).is_err());
}

#[test]
fn test_ratings_are_stored_trimmed() {
    let mut form = form_with_ratings(["3"; 14]);
    form.wifi = Some(" 4".to_string());
    form.cleanliness = Some("5 ".to_string());
    let row = SurveyRow::build(&form, &synthetic()).unwrap();
    assert_eq!(row.fields[8], "4");
    assert_eq!(row.fields[21], "5");
}

#[test]
fn test_missing_text_fields_are_empty_cells() {
    let mut form = form_with_ratings(["3"; 14]);
    form.gender = None;
    form.age = None;
    let row = SurveyRow::build(&form, &synthetic()).unwrap();
    assert_eq!(row.fields[2], "");
    assert_eq!(row.fields[4], "");
}

#[test]
fn test_synthetic_draws_stay_in_range() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let s = SyntheticFields::draw(&mut rng);
        assert!(CUSTOMER_TYPES.contains(&s.customer_type));
        assert!(FLIGHT_DISTANCE_RANGE.contains(&s.flight_distance));
        assert!(DELAY_RANGE_MINUTES.contains(&s.departure_delay));
        assert!(DELAY_RANGE_MINUTES.contains(&s.arrival_delay));
    }
}

#[test]
fn test_form_field_names() {
    let form: SurveyForm = serde_json::from_str(
        r#"{"travelType": "Personal Travel", "onlineBoarding": "4", "Cleanliness": "2"}"#,
    )
    .unwrap();
    assert_eq!(form.travel_type.as_deref(), Some("Personal Travel"));
    assert_eq!(form.online_boarding.as_deref(), Some("4"));
    assert_eq!(form.cleanliness.as_deref(), Some("2"));
    assert_eq!(form.wifi, None);
}

#[test]
fn test_store_writes_header_once_and_appends() {
    let dir = make_temp_dir();
    let path = dir.join("nested").join("survey.csv");
    let store = SurveyStore::open(&path).unwrap();
    let header = std::fs::read_to_string(&path).unwrap();
    assert_eq!(header.lines().count(), 1);
    assert!(header.starts_with(",id,Gender,Customer Type,"));
    assert!(header.trim_end().ends_with(",satisfaction"));

    let row = SurveyRow::build(&form_with_ratings(["3"; 14]), &synthetic()).unwrap();
    store.append(&row).unwrap();
    store.append(&row).unwrap();

    // reopening keeps existing content
    let reopened = SurveyStore::open(&path).unwrap();
    assert_eq!(reopened.path(), path.as_path());

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], row.fields.join(","));
    assert_eq!(lines[1].split(',').count(), 25);
}
