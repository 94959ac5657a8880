use std::{convert::Infallible, fmt, str::FromStr};

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeDelta, TimeZone, Utc};
use derive_more::{AsRef, Deref, Display};

use crate::{CreateError, ReadError, UserID, ValidationError};

#[allow(async_fn_in_trait)]
pub trait WorkoutService {
    async fn get_workouts(&self, owner: &UserID) -> Result<Vec<Workout>, ReadError>;
    async fn get_workout(&self, owner: &UserID, id: &WorkoutID) -> Result<Workout, ReadError>;
    async fn create_workout(
        &self,
        owner: &UserID,
        workout: NewWorkout,
    ) -> Result<Workout, CreateError>;

    fn validate_workout_timestamp<Tz: TimeZone>(
        &self,
        timestamp: &str,
        tz: &Tz,
    ) -> Result<DateTime<Utc>, ValidationError> {
        parse_local_timestamp(timestamp, tz).map_err(|err| ValidationError::Other(err.into()))
    }

    fn validate_workout_duration(&self, duration: &str) -> Result<Minutes, ValidationError> {
        Minutes::parse(duration).map_err(|err| ValidationError::Other(err.into()))
    }

    fn validate_workout_distance(&self, distance: &str) -> Result<Option<f32>, ValidationError> {
        parse_distance(distance).map_err(|err| ValidationError::Other(err.into()))
    }

    fn validate_workout_calories(&self, calories: &str) -> Result<Option<u32>, ValidationError> {
        parse_calories(calories).map_err(|err| ValidationError::Other(err.into()))
    }
}

#[allow(async_fn_in_trait)]
pub trait WorkoutRepository {
    async fn read_workouts(&self, owner: &UserID) -> Result<Vec<Workout>, ReadError>;
    async fn read_workout(&self, id: &WorkoutID) -> Result<Workout, ReadError>;
    async fn create_workout(
        &self,
        owner: &UserID,
        workout: NewWorkout,
    ) -> Result<Workout, CreateError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: WorkoutID,
    pub owner_id: UserID,
    pub timestamp: DateTime<Utc>,
    pub duration: Minutes,
    pub details: Option<String>,
    pub activity: Activity,
}

impl Workout {
    #[must_use]
    pub fn workout_type(&self) -> WorkoutType {
        self.activity.workout_type()
    }
}

/// A workout that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkout {
    pub timestamp: DateTime<Utc>,
    pub duration: Minutes,
    pub details: Option<String>,
    pub activity: Activity,
}

impl NewWorkout {
    #[must_use]
    pub fn into_workout(self, id: WorkoutID, owner_id: UserID) -> Workout {
        Workout {
            id,
            owner_id,
            timestamp: self.timestamp,
            duration: self.duration,
            details: self.details,
            activity: self.activity,
        }
    }
}

#[derive(AsRef, Debug, Display, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkoutID(String);

impl WorkoutID {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WorkoutID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for WorkoutID {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl FromStr for WorkoutID {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().to_string()))
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum WorkoutType {
    Gym,
    Running,
    Calisthenics,
    #[strum(to_string = "functional", serialize = "functional workout")]
    Functional,
    Yoga,
}

impl WorkoutType {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            WorkoutType::Gym => "Gym",
            WorkoutType::Running => "Running",
            WorkoutType::Calisthenics => "Calisthenics",
            WorkoutType::Functional => "Functional",
            WorkoutType::Yoga => "Yoga",
        }
    }

    /// Font Awesome icon name.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            WorkoutType::Gym => "dumbbell",
            WorkoutType::Running => "person-running",
            WorkoutType::Calisthenics => "person",
            WorkoutType::Functional => "fire",
            WorkoutType::Yoga => "spa",
        }
    }

    /// Optional fields that are relevant for this type of workout.
    #[must_use]
    pub fn fields(self) -> &'static [WorkoutField] {
        match self {
            WorkoutType::Gym => &[WorkoutField::Location, WorkoutField::MainMuscles],
            WorkoutType::Running => &[
                WorkoutField::StartLocation,
                WorkoutField::EndLocation,
                WorkoutField::Distance,
                WorkoutField::CaloriesBurned,
            ],
            WorkoutType::Calisthenics => &[WorkoutField::Location],
            WorkoutType::Functional => &[
                WorkoutField::Location,
                WorkoutField::CaloriesBurned,
                WorkoutField::EquipmentUsed,
            ],
            WorkoutType::Yoga => &[WorkoutField::Location, WorkoutField::Poses],
        }
    }

    #[must_use]
    pub fn has_field(self, field: WorkoutField) -> bool {
        self.fields().contains(&field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumIter)]
pub enum WorkoutField {
    Location,
    StartLocation,
    EndLocation,
    Distance,
    CaloriesBurned,
    MainMuscles,
    Poses,
    EquipmentUsed,
}

impl WorkoutField {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            WorkoutField::Location => "Location",
            WorkoutField::StartLocation => "Start Location",
            WorkoutField::EndLocation => "End Location",
            WorkoutField::Distance => "Distance",
            WorkoutField::CaloriesBurned => "Calories Burned",
            WorkoutField::MainMuscles => "Main Muscles",
            WorkoutField::Poses => "Yoga Poses",
            WorkoutField::EquipmentUsed => "Equipment Used",
        }
    }
}

/// Type-specific attributes of a workout.
#[derive(Debug, Clone, PartialEq)]
pub enum Activity {
    Gym {
        location: Option<String>,
        main_muscles: TagList,
    },
    Running {
        start_location: Option<String>,
        end_location: Option<String>,
        distance_km: Option<f32>,
        calories_burned: Option<u32>,
    },
    Calisthenics {
        location: Option<String>,
    },
    Functional {
        location: Option<String>,
        calories_burned: Option<u32>,
        equipment_used: TagList,
    },
    Yoga {
        location: Option<String>,
        poses: TagList,
    },
}

impl Activity {
    /// An activity of the given type without any optional attributes.
    #[must_use]
    pub fn new(workout_type: WorkoutType) -> Self {
        match workout_type {
            WorkoutType::Gym => Activity::Gym {
                location: None,
                main_muscles: TagList::default(),
            },
            WorkoutType::Running => Activity::Running {
                start_location: None,
                end_location: None,
                distance_km: None,
                calories_burned: None,
            },
            WorkoutType::Calisthenics => Activity::Calisthenics { location: None },
            WorkoutType::Functional => Activity::Functional {
                location: None,
                calories_burned: None,
                equipment_used: TagList::default(),
            },
            WorkoutType::Yoga => Activity::Yoga {
                location: None,
                poses: TagList::default(),
            },
        }
    }

    #[must_use]
    pub fn workout_type(&self) -> WorkoutType {
        match self {
            Activity::Gym { .. } => WorkoutType::Gym,
            Activity::Running { .. } => WorkoutType::Running,
            Activity::Calisthenics { .. } => WorkoutType::Calisthenics,
            Activity::Functional { .. } => WorkoutType::Functional,
            Activity::Yoga { .. } => WorkoutType::Yoga,
        }
    }

    #[must_use]
    pub fn location(&self) -> Option<&str> {
        match self {
            Activity::Gym { location, .. }
            | Activity::Calisthenics { location }
            | Activity::Functional { location, .. }
            | Activity::Yoga { location, .. } => non_empty(location.as_deref()),
            Activity::Running { .. } => None,
        }
    }

    #[must_use]
    pub fn start_location(&self) -> Option<&str> {
        match self {
            Activity::Running { start_location, .. } => non_empty(start_location.as_deref()),
            _ => None,
        }
    }

    #[must_use]
    pub fn end_location(&self) -> Option<&str> {
        match self {
            Activity::Running { end_location, .. } => non_empty(end_location.as_deref()),
            _ => None,
        }
    }

    #[must_use]
    pub fn distance_km(&self) -> Option<f32> {
        match self {
            Activity::Running { distance_km, .. } => *distance_km,
            _ => None,
        }
    }

    #[must_use]
    pub fn calories_burned(&self) -> Option<u32> {
        match self {
            Activity::Running {
                calories_burned, ..
            }
            | Activity::Functional {
                calories_burned, ..
            } => *calories_burned,
            _ => None,
        }
    }

    #[must_use]
    pub fn main_muscles(&self) -> Option<&TagList> {
        match self {
            Activity::Gym { main_muscles, .. } if !main_muscles.is_empty() => Some(main_muscles),
            _ => None,
        }
    }

    #[must_use]
    pub fn poses(&self) -> Option<&TagList> {
        match self {
            Activity::Yoga { poses, .. } if !poses.is_empty() => Some(poses),
            _ => None,
        }
    }

    #[must_use]
    pub fn equipment_used(&self) -> Option<&TagList> {
        match self {
            Activity::Functional { equipment_used, .. } if !equipment_used.is_empty() => {
                Some(equipment_used)
            }
            _ => None,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Duration of a workout in whole minutes, always positive.
#[derive(Debug, Display, Deref, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Minutes(u32);

impl Minutes {
    pub fn new(minutes: u32) -> Result<Self, MinutesError> {
        if minutes == 0 {
            return Err(MinutesError::NotPositive);
        }
        Ok(Self(minutes))
    }

    pub fn parse(input: &str) -> Result<Self, MinutesError> {
        let input = input.trim();

        if input.is_empty() {
            return Err(MinutesError::Empty);
        }

        match input.parse::<i64>() {
            Ok(value) if value <= 0 => Err(MinutesError::NotPositive),
            Ok(value) => u32::try_from(value)
                .map_err(|_| MinutesError::Invalid)
                .and_then(Self::new),
            Err(_) => Err(MinutesError::Invalid),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MinutesError {
    #[error("Duration must not be empty")]
    Empty,
    #[error("Duration must be greater than zero")]
    NotPositive,
    #[error("Duration must be a whole number of minutes")]
    Invalid,
}

/// Ordered list of free-text tags, e.g. muscles, yoga poses or equipment.
///
/// Elements are trimmed and never empty.
#[derive(Debug, Deref, Default, Clone, PartialEq, Eq)]
pub struct TagList(Vec<String>);

impl TagList {
    /// Parse a comma-separated list.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        Self::from_items(input.split(','))
    }

    #[must_use]
    pub fn from_items<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            items
                .into_iter()
                .map(|item| item.as_ref().trim().to_string())
                .filter(|item| !item.is_empty())
                .collect(),
        )
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl fmt::Display for TagList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

impl From<&str> for TagList {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse a local date and time as entered in a `datetime-local` input.
///
/// The local time is interpreted in the given time zone, using the UTC offset in force at that
/// time. An ambiguous local time resolves to the earlier instant, a local time skipped by a
/// transition is moved forward by one hour. Timestamps with an explicit offset are accepted as
/// well.
pub fn parse_local_timestamp<Tz: TimeZone>(
    input: &str,
    tz: &Tz,
) -> Result<DateTime<Utc>, TimestampError> {
    let input = input.trim();

    if input.is_empty() {
        return Err(TimestampError::Empty);
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(input) {
        return Ok(timestamp.with_timezone(&Utc));
    }

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .and_then(|naive| {
            tz.from_local_datetime(&naive).earliest().or_else(|| {
                tz.from_local_datetime(&(naive + TimeDelta::hours(1)))
                    .earliest()
            })
        })
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .ok_or(TimestampError::Invalid)
}

/// Canonical string representation of a workout timestamp.
#[must_use]
pub fn canonical_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TimestampError {
    #[error("Date must not be empty")]
    Empty,
    #[error("Invalid date")]
    Invalid,
}

pub fn parse_distance(input: &str) -> Result<Option<f32>, NumberError> {
    let input = input.replace(',', ".");
    let input = input.trim();

    if input.is_empty() {
        return Ok(None);
    }

    match input.parse::<f32>() {
        Ok(value) if !value.is_finite() => Err(NumberError::Invalid("Distance")),
        Ok(value) if value > 0.0 => Ok(Some(value)),
        Ok(_) => Err(NumberError::NotPositive("Distance")),
        Err(_) => Err(NumberError::Invalid("Distance")),
    }
}

pub fn parse_calories(input: &str) -> Result<Option<u32>, NumberError> {
    let input = input.trim();

    if input.is_empty() {
        return Ok(None);
    }

    match input.parse::<i64>() {
        Ok(value) if value > 0 => u32::try_from(value)
            .map(Some)
            .map_err(|_| NumberError::Invalid("Calories")),
        Ok(_) => Err(NumberError::NotPositive("Calories")),
        Err(_) => Err(NumberError::Invalid("Calories")),
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum NumberError {
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
    #[error("{0} must be a number")]
    Invalid(&'static str),
}
