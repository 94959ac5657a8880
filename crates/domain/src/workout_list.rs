use std::fmt;

use chrono::{DateTime, TimeZone, Utc};

use crate::{ReadError, StorageError, User, Workout, WorkoutField, WorkoutService};

pub const DATE_FORMAT: &str = "%B %-d, %Y";
pub const NO_CONNECTION_MESSAGE: &str = "No connection. Please try again later.";

#[derive(Debug, Clone, PartialEq)]
pub enum WorkoutList {
    NotAuthenticated,
    Empty,
    Loaded(Vec<Workout>),
    Offline,
    Failed(String),
}

impl WorkoutList {
    /// Fetch the workouts of the given user, most recent first.
    ///
    /// Without a user no request is issued.
    pub async fn load(service: &impl WorkoutService, user: Option<&User>) -> Self {
        let Some(user) = user else {
            return WorkoutList::NotAuthenticated;
        };

        match service.get_workouts(&user.id).await {
            Ok(workouts) if workouts.is_empty() => WorkoutList::Empty,
            Ok(mut workouts) => {
                sort_by_timestamp_desc(&mut workouts);
                WorkoutList::Loaded(workouts)
            }
            Err(ReadError::Storage(StorageError::NoConnection)) => WorkoutList::Offline,
            Err(_) => WorkoutList::Failed("Failed to load workouts. Please try again.".to_string()),
        }
    }

    #[must_use]
    pub fn workouts(&self) -> &[Workout] {
        match self {
            WorkoutList::Loaded(workouts) => workouts,
            _ => &[],
        }
    }

    /// Message to show if loading failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            WorkoutList::Offline => Some(NO_CONNECTION_MESSAGE),
            WorkoutList::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Sort workouts by timestamp in descending order, keeping the order of equal timestamps.
pub fn sort_by_timestamp_desc(workouts: &mut [Workout]) {
    workouts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailLine {
    pub label: &'static str,
    pub value: String,
}

impl fmt::Display for DetailLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.value)
    }
}

impl Workout {
    /// Label of the collapsed row.
    ///
    /// The first line of the details is used as caption if present.
    #[must_use]
    pub fn summary<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: fmt::Display,
    {
        if let Some(caption) = self
            .details
            .as_deref()
            .and_then(|details| details.lines().map(str::trim).find(|l| !l.is_empty()))
        {
            return caption.to_string();
        }
        format!("{} - {}", self.workout_type().name(), self.date(tz))
    }

    /// Calendar date in the given time zone.
    #[must_use]
    pub fn date<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: fmt::Display,
    {
        self.timestamp
            .with_timezone(tz)
            .format(DATE_FORMAT)
            .to_string()
    }

    /// Number of calendar days between the workout and `now` in the given time zone.
    #[must_use]
    pub fn days_before<Tz: TimeZone>(&self, now: DateTime<Utc>, tz: &Tz) -> i64 {
        let today = now.with_timezone(tz).date_naive();
        (today - self.timestamp.with_timezone(tz).date_naive()).num_days()
    }

    #[must_use]
    pub fn icon(&self) -> &'static str {
        self.workout_type().icon()
    }

    /// Lines of the expanded row. Absent optional attributes are omitted.
    #[must_use]
    pub fn detail_lines<Tz: TimeZone>(&self, tz: &Tz) -> Vec<DetailLine>
    where
        Tz::Offset: fmt::Display,
    {
        let mut lines = vec![
            DetailLine {
                label: "Type",
                value: self.workout_type().name().to_string(),
            },
            DetailLine {
                label: "Date",
                value: self.date(tz),
            },
            DetailLine {
                label: "Duration",
                value: format!("{} minutes", self.duration),
            },
        ];

        let activity = &self.activity;
        let optional = [
            (WorkoutField::Location, activity.location().map(str::to_string)),
            (
                WorkoutField::StartLocation,
                activity.start_location().map(str::to_string),
            ),
            (
                WorkoutField::EndLocation,
                activity.end_location().map(str::to_string),
            ),
            (
                WorkoutField::Distance,
                activity.distance_km().map(|d| format!("{d} km")),
            ),
            (
                WorkoutField::CaloriesBurned,
                activity.calories_burned().map(|c| c.to_string()),
            ),
            (
                WorkoutField::MainMuscles,
                activity.main_muscles().map(ToString::to_string),
            ),
            (WorkoutField::Poses, activity.poses().map(ToString::to_string)),
            (
                WorkoutField::EquipmentUsed,
                activity.equipment_used().map(ToString::to_string),
            ),
        ];

        lines.extend(optional.into_iter().filter_map(|(field, value)| {
            value.map(|value| DetailLine {
                label: field.label(),
                value,
            })
        }));

        if let Some(details) = self.details.as_deref().filter(|d| !d.trim().is_empty()) {
            lines.push(DetailLine {
                label: "Details",
                value: details.to_string(),
            });
        }

        lines
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::{
        Activity, Minutes, Service, TagList, WorkoutForm, WorkoutID, WorkoutType,
        tests::{
            data::{CentralEurope, GYM_WORKOUT, RUNNING_WORKOUT, USER, USER_2, YOGA_WORKOUT},
            repository::MockRepository,
        },
    };

    #[tokio::test]
    async fn test_load_without_user() {
        let service = Service::new(MockRepository::new());

        assert_eq!(
            WorkoutList::load(&service, None).await,
            WorkoutList::NotAuthenticated
        );
        assert_eq!(service.repository().read_calls(), 0);
    }

    #[tokio::test]
    async fn test_load_empty() {
        let service = Service::new(MockRepository::new());

        assert_eq!(
            WorkoutList::load(&service, Some(&*USER)).await,
            WorkoutList::Empty
        );
        assert_eq!(service.repository().read_calls(), 1);
    }

    #[tokio::test]
    async fn test_load_sorted_and_scoped_to_user() {
        let mut other = GYM_WORKOUT.clone();
        other.id = WorkoutID::from("other");
        other.owner_id = USER_2.id.clone();
        let service = Service::new(MockRepository::with_workouts(vec![
            YOGA_WORKOUT.clone(),
            GYM_WORKOUT.clone(),
            other,
            RUNNING_WORKOUT.clone(),
        ]));

        let list = WorkoutList::load(&service, Some(&*USER)).await;

        assert_eq!(
            list.workouts()
                .iter()
                .map(|w| w.id.as_str())
                .collect::<Vec<_>>(),
            vec!["running", "gym", "yoga"]
        );
        assert!(
            list.workouts()
                .windows(2)
                .all(|w| w[0].timestamp >= w[1].timestamp)
        );
    }

    #[tokio::test]
    async fn test_load_failure() {
        let repository = MockRepository::with_workouts(vec![GYM_WORKOUT.clone()]);
        repository.fail_with(StorageError::PermissionDenied);
        let service = Service::new(repository);

        assert_eq!(
            WorkoutList::load(&service, Some(&*USER)).await,
            WorkoutList::Failed("Failed to load workouts. Please try again.".to_string())
        );
    }

    #[test]
    fn test_sort_by_timestamp_desc_is_stable() {
        let mut a = GYM_WORKOUT.clone();
        a.id = WorkoutID::from("a");
        let mut b = GYM_WORKOUT.clone();
        b.id = WorkoutID::from("b");
        let mut workouts = vec![a, YOGA_WORKOUT.clone(), b, RUNNING_WORKOUT.clone()];

        sort_by_timestamp_desc(&mut workouts);

        assert_eq!(
            workouts.iter().map(|w| w.id.as_str()).collect::<Vec<_>>(),
            vec!["running", "a", "b", "yoga"]
        );
    }

    #[test]
    fn test_summary() {
        assert_eq!(GYM_WORKOUT.summary(&Utc), "Gym - January 1, 2024");

        let mut workout = GYM_WORKOUT.clone();
        workout.details = Some("\nLeg day\nSquats and lunges".to_string());
        assert_eq!(workout.summary(&Utc), "Leg day");
    }

    #[test]
    fn test_date_uses_time_zone() {
        let mut workout = GYM_WORKOUT.clone();
        workout.timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 23, 30, 0).unwrap();

        assert_eq!(workout.date(&Utc), "January 1, 2024");
        assert_eq!(
            workout.date(&FixedOffset::east_opt(3600).unwrap()),
            "January 2, 2024"
        );
    }

    #[test]
    fn test_date_uses_offset_in_force_at_timestamp() {
        let mut workout = GYM_WORKOUT.clone();

        workout.timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 22, 30, 0).unwrap();
        assert_eq!(workout.date(&CentralEurope), "January 1, 2024");

        workout.timestamp = Utc.with_ymd_and_hms(2024, 7, 1, 22, 30, 0).unwrap();
        assert_eq!(workout.date(&CentralEurope), "July 2, 2024");
    }

    #[test]
    fn test_detail_lines_gym() {
        assert_eq!(
            GYM_WORKOUT
                .detail_lines(&Utc)
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>(),
            vec![
                "Type: Gym",
                "Date: January 1, 2024",
                "Duration: 45 minutes",
                "Main Muscles: chest, arms",
            ]
        );
    }

    #[test]
    fn test_detail_lines_running() {
        let lines = RUNNING_WORKOUT.detail_lines(&Utc);

        assert_eq!(
            lines.iter().map(|l| l.label).collect::<Vec<_>>(),
            vec![
                "Type",
                "Date",
                "Duration",
                "Start Location",
                "End Location",
                "Distance",
                "Calories Burned",
                "Details",
            ]
        );
        assert_eq!(lines[5].to_string(), "Distance: 5 km");
        assert!(!lines.iter().any(|l| l.label == "Main Muscles"));
    }

    #[test]
    fn test_detail_lines_tag_list_formats() {
        let workout = |poses: TagList| Workout {
            id: WorkoutID::from("w"),
            owner_id: USER.id.clone(),
            timestamp: Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap(),
            duration: Minutes::new(60).unwrap(),
            details: None,
            activity: Activity::Yoga {
                location: None,
                poses,
            },
        };

        assert_eq!(
            workout(TagList::parse("downward dog,cobra")).detail_lines(&Utc),
            workout(TagList::from_items(["downward dog", "cobra"])).detail_lines(&Utc)
        );
    }

    #[tokio::test]
    async fn test_load_no_connection() {
        let repository = MockRepository::with_workouts(vec![GYM_WORKOUT.clone()]);
        repository.fail_with(StorageError::NoConnection);
        let service = Service::new(repository);

        let list = WorkoutList::load(&service, Some(&*USER)).await;

        assert_eq!(list, WorkoutList::Offline);
        assert_eq!(list.error(), Some(NO_CONNECTION_MESSAGE));
    }

    #[test]
    fn test_error() {
        assert_eq!(
            WorkoutList::Failed("failed".to_string()).error(),
            Some("failed")
        );
        assert_eq!(WorkoutList::Empty.error(), None);
        assert_eq!(WorkoutList::NotAuthenticated.error(), None);
        assert_eq!(WorkoutList::Loaded(vec![GYM_WORKOUT.clone()]).error(), None);
    }

    #[tokio::test]
    async fn test_submitted_workout_listed_first() {
        let mut older_gym = GYM_WORKOUT.clone();
        older_gym.id = WorkoutID::from("older-gym");
        older_gym.timestamp = Utc.with_ymd_and_hms(2023, 12, 31, 9, 0, 0).unwrap();
        let mut other_user = RUNNING_WORKOUT.clone();
        other_user.owner_id = USER_2.id.clone();
        let service = Service::new(MockRepository::with_workouts(vec![
            YOGA_WORKOUT.clone(),
            older_gym,
            other_user,
        ]));

        let mut form = WorkoutForm::new();
        form.select_type(Some(WorkoutType::Gym));
        form.set_timestamp("2024-01-01T10:00");
        form.set_duration("45");
        form.set_main_muscles("chest, arms");
        let created = form.submit(&service, Some(&*USER), &Utc).await.unwrap();

        let list = WorkoutList::load(&service, Some(&*USER)).await;
        let workouts = list.workouts();

        assert_eq!(
            workouts.iter().map(|w| w.id.as_str()).collect::<Vec<_>>(),
            vec![created.id.as_str(), "older-gym", "yoga"]
        );
        assert_eq!(workouts[0].owner_id, USER.id);
        assert_eq!(
            workouts[0].timestamp,
            Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
        );
        assert!(
            workouts[0]
                .detail_lines(&Utc)
                .iter()
                .any(|line| line.to_string() == "Main Muscles: chest, arms")
        );
    }

    #[test]
    fn test_detail_lines_date_uses_offset_in_force_at_timestamp() {
        let mut workout = GYM_WORKOUT.clone();
        workout.timestamp = Utc.with_ymd_and_hms(2024, 6, 30, 22, 30, 0).unwrap();

        assert_eq!(
            workout.detail_lines(&CentralEurope)[1],
            DetailLine {
                label: "Date",
                value: "July 1, 2024".to_string(),
            }
        );
        assert_eq!(workout.summary(&CentralEurope), "Gym - July 1, 2024");
    }

    #[rstest]
    #[case::same_day(Utc.with_ymd_and_hms(2024, 1, 1, 20, 0, 0).unwrap(), 0)]
    #[case::next_day(Utc.with_ymd_and_hms(2024, 1, 2, 8, 0, 0).unwrap(), 1)]
    #[case::after_midnight_local(Utc.with_ymd_and_hms(2024, 1, 1, 23, 30, 0).unwrap(), 1)]
    #[case::days(Utc.with_ymd_and_hms(2024, 1, 11, 12, 0, 0).unwrap(), 10)]
    fn test_days_before(#[case] now: DateTime<Utc>, #[case] expected: i64) {
        assert_eq!(GYM_WORKOUT.days_before(now, &CentralEurope), expected);
    }

    #[test]
    fn test_days_before_across_daylight_saving_change() {
        let mut workout = GYM_WORKOUT.clone();
        workout.timestamp = Utc.with_ymd_and_hms(2024, 3, 31, 22, 30, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 4, 1, 21, 30, 0).unwrap();

        assert_eq!(workout.days_before(now, &CentralEurope), 1);
        assert_eq!(
            workout.days_before(now, &FixedOffset::east_opt(2 * 3600).unwrap()),
            0
        );
    }
}
