use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::{Calendar, Component, Event, EventLike};
use tracing::warn;

use crate::models::{BranchInfo, ClassRecord};

#[derive(Clone, Debug)]
pub struct ICalExporter {
    timezone: Tz,
}

impl ICalExporter {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// Sunday opening the studio week that contains `now`.
    pub fn week_start(&self, now: chrono::DateTime<Utc>) -> NaiveDate {
        let today = now.with_timezone(&self.timezone).date_naive();
        today - Duration::days(i64::from(today.weekday().num_days_from_sunday()))
    }

    /// `classes` are expected in week order; one event each, dated within the
    /// week starting at `week_start`.
    pub fn generate(
        &self,
        classes: &[&ClassRecord],
        branch: &BranchInfo,
        week_start: NaiveDate,
        booking_url: &str,
    ) -> Vec<u8> {
        if classes.is_empty() {
            return Vec::new();
        }

        let mut calendar = Calendar::new();
        calendar.name(&format!("MA TEAM {} - לוח שיעורים", branch.name));

        for class in classes {
            let date = week_start + Duration::days(class.day.days_from_sunday());
            let (Some(start), Some(end)) = (
                self.local_to_utc(date, &class.start_time),
                self.local_to_utc(date, &class.end_time),
            ) else {
                warn!(id = %class.id, "skipping class with unrepresentable time");
                continue;
            };

            let mut event = Event::new();
            event.summary(&format!("{} ({})", class.title, class.trainer));
            event.starts(start);
            event.ends(end);
            event.location(&branch.address);
            event.description(&format!(
                "{}\nמדריך: {}\nמשתתפים: {}/{}\nהרשמה: {}",
                class.training_type.label(),
                class.trainer,
                class.current_participants,
                class.max_participants,
                booking_url
            ));
            event.uid(&format!(
                "{}-{}-studio-timetable",
                class.id,
                date.format("%Y%m%d")
            ));
            calendar.push(event);
        }

        calendar.to_string().into_bytes()
    }

    fn local_to_utc(&self, date: NaiveDate, clock: &str) -> Option<chrono::DateTime<Utc>> {
        let time = NaiveTime::parse_from_str(clock, "%H:%M").ok()?;
        self.timezone
            .from_local_datetime(&NaiveDateTime::new(date, time))
            .earliest()
            .map(|local| local.with_timezone(&Utc))
    }
}
