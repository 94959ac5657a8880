//! Firestore documents
//!
//! The REST API of Firestore represents every field as a typed value (`{"stringValue": "..."}`).
//! Workouts are stored as flat documents in the `workouts` collection, usernames in the
//! `usernames` collection.

use std::{collections::BTreeMap, str::FromStr};

use activeflow_domain as domain;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::rest::RestError;

pub const WORKOUTS: &str = "workouts";
pub const USERNAMES: &str = "usernames";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    NullValue(()),
    BooleanValue(bool),
    IntegerValue(#[serde(with = "integer")] i64),
    DoubleValue(f64),
    TimestampValue(String),
    StringValue(String),
    ArrayValue(ArrayValue),
    MapValue(MapValue),
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayValue {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Value>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapValue {
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

impl Value {
    fn as_str(&self) -> Option<&str> {
        match self {
            Value::StringValue(value) | Value::TimestampValue(value) => Some(value),
            _ => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Value::IntegerValue(value) => Some(*value as f64),
            Value::DoubleValue(value) => Some(*value),
            Value::StringValue(value) => value.trim().replace(',', ".").parse().ok(),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::StringValue(value.to_string())
    }
}

impl From<&domain::TagList> for Value {
    fn from(value: &domain::TagList) -> Self {
        Value::ArrayValue(ArrayValue {
            values: value.iter().map(|tag| Value::from(tag.as_str())).collect(),
        })
    }
}

/// Firestore encodes 64-bit integers as strings.
mod integer {
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Integer {
            Number(i64),
            Text(String),
        }

        match Integer::deserialize(deserializer)? {
            Integer::Number(value) => Ok(value),
            Integer::Text(value) => value.parse().map_err(de::Error::custom),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

impl Document {
    /// The last segment of the document name.
    #[must_use]
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or_default()
    }

    fn insert(&mut self, key: &str, value: impl Into<Option<Value>>) {
        if let Some(value) = value.into() {
            self.fields.insert(key.to_string(), value);
        }
    }

    fn string(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    fn number(&self, key: &str) -> Option<f64> {
        self.fields.get(key).and_then(Value::as_f64)
    }

    /// A tag list stored either as array of strings or as comma-separated string.
    fn tags(&self, key: &str) -> domain::TagList {
        match self.fields.get(key) {
            Some(Value::ArrayValue(array)) => {
                domain::TagList::from_items(array.values.iter().filter_map(Value::as_str))
            }
            Some(Value::StringValue(value)) => domain::TagList::parse(value),
            _ => domain::TagList::default(),
        }
    }

    fn required_string(&self, key: &'static str) -> Result<&str, DecodeError> {
        self.string(key).ok_or(DecodeError::MissingField(key))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn distance(&self) -> Option<f32> {
        self.number("distance")
            .filter(|d| d.is_finite() && *d > 0.0)
            .map(|d| d as f32)
    }

    fn is_blank(&self, key: &str) -> bool {
        match self.fields.get(key) {
            None | Some(Value::NullValue(())) => true,
            Some(Value::StringValue(value)) => value.trim().is_empty(),
            Some(_) => false,
        }
    }

    /// A positive number rounded to the nearest whole number.
    ///
    /// Older documents may contain fractional values. Values that are not positive or cannot be
    /// parsed are `None`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn count(&self, key: &str) -> Option<u32> {
        self.number(key)
            .map(f64::round)
            .filter(|value| *value >= 1.0 && *value <= f64::from(u32::MAX))
            .map(|value| value as u32)
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum DecodeError {
    #[error("missing field {0}")]
    MissingField(&'static str),
    #[error("invalid field {0}")]
    InvalidField(&'static str),
}

impl From<DecodeError> for RestError {
    fn from(value: DecodeError) -> Self {
        RestError::Deserialization(value.to_string())
    }
}

#[derive(Debug, Deserialize)]
pub struct RunQueryResponseItem {
    #[serde(default)]
    pub document: Option<Document>,
}

pub fn encode_workout(owner: &domain::UserID, workout: &domain::NewWorkout) -> Document {
    let mut document = Document::default();
    let activity = &workout.activity;
    let tags = |tags: Option<&domain::TagList>| tags.map(Value::from);

    document.insert("userId", Value::from(owner.as_str()));
    document.insert(
        "type",
        Value::StringValue(activity.workout_type().to_string()),
    );
    document.insert(
        "date",
        Value::StringValue(domain::canonical_timestamp(&workout.timestamp)),
    );
    document.insert(
        "duration_minutes",
        Value::IntegerValue(i64::from(*workout.duration)),
    );
    document.insert("details", workout.details.as_deref().map(Value::from));
    document.insert("location", activity.location().map(Value::from));
    document.insert("start_location", activity.start_location().map(Value::from));
    document.insert("end_location", activity.end_location().map(Value::from));
    document.insert(
        "distance",
        activity
            .distance_km()
            .map(|d| Value::DoubleValue(f64::from(d))),
    );
    document.insert(
        "calories_burned",
        activity
            .calories_burned()
            .map(|c| Value::IntegerValue(i64::from(c))),
    );
    document.insert("main_muscles", tags(activity.main_muscles()));
    document.insert("poses", tags(activity.poses()));
    document.insert("equipment_used", tags(activity.equipment_used()));

    document
}

pub fn decode_workout(document: &Document) -> Result<domain::Workout, DecodeError> {
    let workout_type = domain::WorkoutType::from_str(document.required_string("type")?)
        .map_err(|_| DecodeError::InvalidField("type"))?;
    let timestamp = domain::parse_local_timestamp(document.required_string("date")?, &Utc)
        .map_err(|_| DecodeError::InvalidField("date"))?;
    let duration = match document.count("duration_minutes") {
        Some(d) => domain::Minutes::new(d)
            .map_err(|_| DecodeError::InvalidField("duration_minutes"))?,
        None if document.is_blank("duration_minutes") => {
            return Err(DecodeError::MissingField("duration_minutes"));
        }
        None => return Err(DecodeError::InvalidField("duration_minutes")),
    };

    let location = document.string("location").map(ToString::to_string);
    let activity = match workout_type {
        domain::WorkoutType::Gym => domain::Activity::Gym {
            location,
            main_muscles: document.tags("main_muscles"),
        },
        domain::WorkoutType::Running => domain::Activity::Running {
            start_location: document.string("start_location").map(ToString::to_string),
            end_location: document.string("end_location").map(ToString::to_string),
            distance_km: document.distance(),
            calories_burned: document.count("calories_burned"),
        },
        domain::WorkoutType::Calisthenics => domain::Activity::Calisthenics { location },
        domain::WorkoutType::Functional => domain::Activity::Functional {
            location,
            calories_burned: document.count("calories_burned"),
            equipment_used: document.tags("equipment_used"),
        },
        domain::WorkoutType::Yoga => domain::Activity::Yoga {
            location,
            poses: document.tags("poses"),
        },
    };

    Ok(domain::Workout {
        id: document.id().into(),
        owner_id: document.required_string("userId")?.into(),
        timestamp,
        duration,
        details: document.string("details").map(ToString::to_string),
        activity,
    })
}

pub fn encode_username(user: &domain::User) -> Document {
    let mut document = Document::default();
    document.insert("uid", Value::from(user.id.as_str()));
    document.insert("email", Value::from(user.email.as_str()));
    document
}

pub fn decode_username(document: &Document) -> Result<domain::UserID, DecodeError> {
    Ok(document.required_string("uid")?.into())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::tests::data::{GYM_WORKOUT, RUNNING_WORKOUT, USER};

    fn document(fields: serde_json::Value) -> Document {
        serde_json::from_value(json!({
            "name": "projects/activeflow/databases/(default)/documents/workouts/abc123",
            "fields": fields,
            "createTime": "2024-01-01T10:00:01.123456Z",
            "updateTime": "2024-01-01T10:00:01.123456Z"
        }))
        .unwrap()
    }

    #[rstest]
    #[case(json!({"nullValue": null}), Value::NullValue(()))]
    #[case(json!({"booleanValue": true}), Value::BooleanValue(true))]
    #[case(json!({"integerValue": "45"}), Value::IntegerValue(45))]
    #[case(json!({"integerValue": 45}), Value::IntegerValue(45))]
    #[case(json!({"doubleValue": 5.5}), Value::DoubleValue(5.5))]
    #[case(json!({"stringValue": "chest"}), Value::StringValue("chest".to_string()))]
    #[case(
        json!({"timestampValue": "2024-01-01T10:00:00Z"}),
        Value::TimestampValue("2024-01-01T10:00:00Z".to_string())
    )]
    #[case(
        json!({"arrayValue": {"values": [{"stringValue": "a"}, {"integerValue": "1"}]}}),
        Value::ArrayValue(ArrayValue {
            values: vec![Value::StringValue("a".to_string()), Value::IntegerValue(1)]
        })
    )]
    #[case(json!({"arrayValue": {}}), Value::ArrayValue(ArrayValue::default()))]
    #[case(
        json!({"mapValue": {"fields": {"a": {"booleanValue": false}}}}),
        Value::MapValue(MapValue {
            fields: BTreeMap::from([("a".to_string(), Value::BooleanValue(false))])
        })
    )]
    fn test_value_deserialize(#[case] json: serde_json::Value, #[case] expected: Value) {
        assert_eq!(serde_json::from_value::<Value>(json).unwrap(), expected);
    }

    #[test]
    fn test_value_serialize_integer_as_string() {
        assert_eq!(
            serde_json::to_value(Value::IntegerValue(300)).unwrap(),
            json!({"integerValue": "300"})
        );
        assert_eq!(
            serde_json::to_value(Value::NullValue(())).unwrap(),
            json!({"nullValue": null})
        );
    }

    #[test]
    fn test_document_id() {
        assert_eq!(document(json!({})).id(), "abc123");
        assert_eq!(Document::default().id(), "");
    }

    #[test]
    fn test_encode_workout() {
        let new_workout = domain::NewWorkout {
            timestamp: GYM_WORKOUT.timestamp,
            duration: GYM_WORKOUT.duration,
            details: None,
            activity: GYM_WORKOUT.activity.clone(),
        };

        assert_eq!(
            serde_json::to_value(encode_workout(&USER.id, &new_workout)).unwrap(),
            json!({
                "fields": {
                    "userId": {"stringValue": USER.id.as_str()},
                    "type": {"stringValue": "gym"},
                    "date": {"stringValue": "2024-01-01T10:00:00.000Z"},
                    "duration_minutes": {"integerValue": "45"},
                    "main_muscles": {"arrayValue": {"values": [
                        {"stringValue": "chest"},
                        {"stringValue": "arms"}
                    ]}}
                }
            })
        );
    }

    #[test]
    fn test_encode_workout_omits_absent_fields() {
        let new_workout = domain::NewWorkout {
            timestamp: RUNNING_WORKOUT.timestamp,
            duration: RUNNING_WORKOUT.duration,
            details: RUNNING_WORKOUT.details.clone(),
            activity: domain::Activity::Running {
                start_location: None,
                end_location: None,
                distance_km: Some(10.5),
                calories_burned: None,
            },
        };

        let document = encode_workout(&USER.id, &new_workout);

        assert_eq!(
            document.fields.keys().collect::<Vec<_>>(),
            vec!["date", "details", "distance", "duration_minutes", "type", "userId"]
        );
        assert_eq!(document.fields["distance"], Value::DoubleValue(10.5));
    }

    #[test]
    fn test_decode_workout() {
        let document = document(json!({
            "userId": {"stringValue": "uid-alice"},
            "type": {"stringValue": "running"},
            "date": {"stringValue": "2024-01-03T07:00:00.000Z"},
            "duration_minutes": {"integerValue": "30"},
            "details": {"stringValue": "Morning run"},
            "start_location": {"stringValue": "Park"},
            "end_location": {"stringValue": "Lake"},
            "distance": {"integerValue": "5"},
            "calories_burned": {"doubleValue": 300.0},
            "main_muscles": {"stringValue": "legs"}
        }));

        let workout = decode_workout(&document).unwrap();

        assert_eq!(workout.id, domain::WorkoutID::from("abc123"));
        assert_eq!(
            workout,
            domain::Workout {
                id: workout.id.clone(),
                ..RUNNING_WORKOUT.clone()
            }
        );
    }

    #[test]
    fn test_decode_workout_legacy_fields() {
        let document = document(json!({
            "userId": {"stringValue": "uid-alice"},
            "type": {"stringValue": "Functional Workout"},
            "date": {"timestampValue": "2024-02-01T08:00:00Z"},
            "duration_minutes": {"stringValue": "40"},
            "location": {"stringValue": ""},
            "calories_burned": {"stringValue": ""},
            "equipment_used": {"stringValue": "kettlebell, rope"},
            "distance": {"stringValue": "3"}
        }));

        let workout = decode_workout(&document).unwrap();

        assert_eq!(
            workout.timestamp,
            Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap()
        );
        assert_eq!(*workout.duration, 40);
        assert_eq!(
            workout.activity,
            domain::Activity::Functional {
                location: None,
                calories_burned: None,
                equipment_used: domain::TagList::from_items(["kettlebell", "rope"]),
            }
        );
    }

    #[rstest]
    #[case::string(json!({"stringValue": "45.5"}), 46)]
    #[case::string_with_comma(json!({"stringValue": "44,2"}), 44)]
    #[case::double(json!({"doubleValue": 29.9}), 30)]
    fn test_decode_workout_fractional_count(
        #[case] value: serde_json::Value,
        #[case] expected: u32,
    ) {
        let document = document(json!({
            "userId": {"stringValue": "uid-alice"},
            "type": {"stringValue": "functional"},
            "date": {"stringValue": "2024-01-01T10:00:00.000Z"},
            "duration_minutes": value.clone(),
            "calories_burned": value
        }));

        let workout = decode_workout(&document).unwrap();

        assert_eq!(*workout.duration, expected);
        assert_eq!(workout.activity.calories_burned(), Some(expected));
    }

    #[rstest]
    #[case(json!({"stringValue": "a lot"}))]
    #[case(json!({"stringValue": "-20"}))]
    #[case(json!({"integerValue": "0"}))]
    #[case(json!({"booleanValue": true}))]
    fn test_decode_workout_invalid_calories_are_absent(#[case] calories: serde_json::Value) {
        let document = document(json!({
            "userId": {"stringValue": "uid-alice"},
            "type": {"stringValue": "running"},
            "date": {"stringValue": "2024-01-03T07:00:00.000Z"},
            "duration_minutes": {"integerValue": "30"},
            "calories_burned": calories
        }));

        let workout = decode_workout(&document).unwrap();

        assert_eq!(workout.activity.calories_burned(), None);
    }

    #[test]
    fn test_decode_workout_tag_list_representations_are_equal() {
        let fields = |poses: serde_json::Value| {
            json!({
                "userId": {"stringValue": "uid-alice"},
                "type": {"stringValue": "yoga"},
                "date": {"stringValue": "2024-01-01T10:00:00.000Z"},
                "duration_minutes": {"integerValue": "60"},
                "poses": poses
            })
        };

        assert_eq!(
            decode_workout(&document(fields(json!({"stringValue": "downward dog, cobra"}))))
                .unwrap(),
            decode_workout(&document(fields(json!({"arrayValue": {"values": [
                {"stringValue": "downward dog"},
                {"stringValue": "cobra"}
            ]}}))))
            .unwrap()
        );
    }

    #[rstest]
    #[case(json!({}), DecodeError::MissingField("type"))]
    #[case(
        json!({"type": {"stringValue": "swimming"}}),
        DecodeError::InvalidField("type")
    )]
    #[case(
        json!({"type": {"stringValue": "gym"}, "date": {"stringValue": "2024-01-01T10:00:00Z"}}),
        DecodeError::MissingField("duration_minutes")
    )]
    #[case(
        json!({
            "type": {"stringValue": "gym"},
            "date": {"stringValue": "2024-01-01T10:00:00Z"},
            "duration_minutes": {"integerValue": "0"}
        }),
        DecodeError::InvalidField("duration_minutes")
    )]
    #[case(
        json!({
            "type": {"stringValue": "gym"},
            "date": {"stringValue": "2024-01-01T10:00:00Z"},
            "duration_minutes": {"stringValue": "-45.5"}
        }),
        DecodeError::InvalidField("duration_minutes")
    )]
    #[case(
        json!({
            "type": {"stringValue": "gym"},
            "date": {"stringValue": "2024-01-01T10:00:00Z"},
            "duration_minutes": {"stringValue": "  "}
        }),
        DecodeError::MissingField("duration_minutes")
    )]
    #[case(
        json!({
            "type": {"stringValue": "gym"},
            "date": {"stringValue": "2024-01-01T10:00:00Z"},
            "duration_minutes": {"integerValue": "45"}
        }),
        DecodeError::MissingField("userId")
    )]
    fn test_decode_workout_error(#[case] fields: serde_json::Value, #[case] expected: DecodeError) {
        assert_eq!(decode_workout(&document(fields)), Err(expected));
    }

    #[test]
    fn test_username_document() {
        let document = encode_username(&USER);

        assert_eq!(
            serde_json::to_value(&document).unwrap(),
            json!({
                "fields": {
                    "email": {"stringValue": "alice@example.com"},
                    "uid": {"stringValue": "uid-alice"}
                }
            })
        );
        assert_eq!(decode_username(&document), Ok(USER.id.clone()));
    }

    #[test]
    fn test_run_query_response() {
        let items: Vec<RunQueryResponseItem> = serde_json::from_value(json!([
            {"readTime": "2024-01-01T10:00:00Z"}
        ]))
        .unwrap();

        assert!(items[0].document.is_none());
    }
}
