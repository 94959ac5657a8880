use chrono::TimeZone;

use crate::{
    Activity, CreateError, Minutes, MinutesError, NewWorkout, TagList, TimestampError, User,
    Workout, WorkoutField, WorkoutID, WorkoutService, WorkoutType, parse_calories,
    parse_distance, parse_local_timestamp,
};

pub const SUCCESS_MESSAGE: &str = "Workout added successfully!";

/// Raw user input for a new workout and the state of its submission.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WorkoutForm {
    workout_type: Option<WorkoutType>,
    timestamp: String,
    duration: String,
    details: String,
    location: String,
    start_location: String,
    end_location: String,
    distance: String,
    calories_burned: String,
    main_muscles: String,
    poses: String,
    equipment_used: String,
    state: SubmitState,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub enum SubmitState {
    #[default]
    Idle,
    Submitting,
    Submitted(WorkoutID),
    Failed(String),
}

macro_rules! input {
    ($field: ident, $setter: ident) => {
        #[must_use]
        pub fn $field(&self) -> &str {
            &self.$field
        }

        pub fn $setter(&mut self, value: impl Into<String>) {
            self.$field = value.into();
        }
    };
}

impl WorkoutForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    input!(timestamp, set_timestamp);
    input!(duration, set_duration);
    input!(details, set_details);
    input!(location, set_location);
    input!(start_location, set_start_location);
    input!(end_location, set_end_location);
    input!(distance, set_distance);
    input!(calories_burned, set_calories_burned);
    input!(main_muscles, set_main_muscles);
    input!(poses, set_poses);
    input!(equipment_used, set_equipment_used);

    #[must_use]
    pub fn workout_type(&self) -> Option<WorkoutType> {
        self.workout_type
    }

    /// Select the workout type. Inputs of fields that become hidden are kept, but ignored.
    pub fn select_type(&mut self, workout_type: Option<WorkoutType>) {
        self.workout_type = workout_type;
    }

    #[must_use]
    pub fn visible_fields(&self) -> &'static [WorkoutField] {
        self.workout_type
            .map(WorkoutType::fields)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.state == SubmitState::Submitting
    }

    /// Message to be shown for the current submission state.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match &self.state {
            SubmitState::Idle | SubmitState::Submitting => None,
            SubmitState::Submitted(_) => Some(SUCCESS_MESSAGE),
            SubmitState::Failed(message) => Some(message),
        }
    }

    /// Convert the raw input into a new workout.
    ///
    /// The local date and time is interpreted in the given time zone.
    pub fn validate<Tz: TimeZone>(&self, tz: &Tz) -> Result<NewWorkout, FormError> {
        let workout_type = self.workout_type.ok_or(FormError::MissingRequired)?;

        let timestamp = match parse_local_timestamp(&self.timestamp, tz) {
            Ok(timestamp) => timestamp,
            Err(TimestampError::Empty) => return Err(FormError::MissingRequired),
            Err(err @ TimestampError::Invalid) => return Err(FormError::Invalid(err.to_string())),
        };

        let duration = match Minutes::parse(&self.duration) {
            Ok(duration) => duration,
            Err(MinutesError::Empty | MinutesError::NotPositive) => {
                return Err(FormError::MissingRequired);
            }
            Err(err @ MinutesError::Invalid) => return Err(FormError::Invalid(err.to_string())),
        };

        let details = text(&self.details);

        let location = text(&self.location);
        let activity = match workout_type {
            WorkoutType::Gym => Activity::Gym {
                location,
                main_muscles: TagList::parse(&self.main_muscles),
            },
            WorkoutType::Running => Activity::Running {
                start_location: text(&self.start_location),
                end_location: text(&self.end_location),
                distance_km: parse_distance(&self.distance)
                    .map_err(|err| FormError::Invalid(err.to_string()))?,
                calories_burned: parse_calories(&self.calories_burned)
                    .map_err(|err| FormError::Invalid(err.to_string()))?,
            },
            WorkoutType::Calisthenics => Activity::Calisthenics { location },
            WorkoutType::Functional => Activity::Functional {
                location,
                calories_burned: parse_calories(&self.calories_burned)
                    .map_err(|err| FormError::Invalid(err.to_string()))?,
                equipment_used: TagList::parse(&self.equipment_used),
            },
            WorkoutType::Yoga => Activity::Yoga {
                location,
                poses: TagList::parse(&self.poses),
            },
        };

        Ok(NewWorkout {
            timestamp,
            duration,
            details,
            activity,
        })
    }

    /// Start a submission.
    ///
    /// Returns the workout to be created. A form which is already submitting or has been
    /// submitted is left unchanged. Any other rejection moves the form into the failed state.
    pub fn begin_submit<Tz: TimeZone>(
        &mut self,
        user: Option<&User>,
        tz: &Tz,
    ) -> Result<NewWorkout, SubmitError> {
        match self.state {
            SubmitState::Submitting => return Err(SubmitError::InProgress),
            SubmitState::Submitted(_) => return Err(SubmitError::AlreadySubmitted),
            SubmitState::Idle | SubmitState::Failed(_) => {}
        }

        let result = match user {
            None => Err(SubmitError::NotAuthenticated),
            Some(_) => self.validate(tz).map_err(SubmitError::from),
        };

        self.state = match &result {
            Ok(_) => SubmitState::Submitting,
            Err(err) => SubmitState::Failed(err.to_string()),
        };

        result
    }

    /// Complete a submission started by `begin_submit`.
    pub fn finish_submit(
        &mut self,
        result: Result<Workout, CreateError>,
    ) -> Result<Workout, SubmitError> {
        match result {
            Ok(workout) => {
                self.state = SubmitState::Submitted(workout.id.clone());
                Ok(workout)
            }
            Err(err) => {
                let err = SubmitError::Create(err);
                self.state = SubmitState::Failed(err.to_string());
                Err(err)
            }
        }
    }

    pub async fn submit<Tz: TimeZone>(
        &mut self,
        service: &impl WorkoutService,
        user: Option<&User>,
        tz: &Tz,
    ) -> Result<Workout, SubmitError> {
        let new_workout = self.begin_submit(user, tz)?;
        let Some(user) = user else {
            return Err(SubmitError::NotAuthenticated);
        };
        let result = service.create_workout(&user.id, new_workout).await;
        self.finish_submit(result)
    }
}

fn text(value: &str) -> Option<String> {
    Some(value.trim())
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FormError {
    #[error("Please fill in all required fields.")]
    MissingRequired,
    #[error("{0}")]
    Invalid(String),
}

#[derive(thiserror::Error, Debug)]
pub enum SubmitError {
    #[error("The workout is already being submitted.")]
    InProgress,
    #[error("The workout has already been submitted.")]
    AlreadySubmitted,
    #[error("You must be logged in to add a workout.")]
    NotAuthenticated,
    #[error(transparent)]
    Invalid(#[from] FormError),
    #[error("Failed to add workout. Please try again.")]
    Create(#[source] CreateError),
}
