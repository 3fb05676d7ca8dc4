use thiserror::Error;
use url::Url;

use crate::models::{
    Branch, CapacityStatus, ClassRecord, Day, ScheduleView, ScheduledClass, SelectionState,
    TypeFilter,
};

pub const EMPTY_SCHEDULE_MESSAGE: &str =
    "לא נמצאו שיעורים העונים לקריטריונים שנבחרו. נסו לשנות את הסינון או לבחור יום אחר.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CapacityError {
    #[error("maximum participants must be positive (got {maximum}, current {current})")]
    InvalidMaximum { current: u32, maximum: u32 },
}

impl SelectionState {
    pub fn new(day: Day, branch: Branch, filter: TypeFilter) -> Self {
        Self {
            day,
            branch,
            filter,
        }
    }

    pub fn select_day(&mut self, day: Day) {
        self.day = day;
    }

    /// Only the branch changes; the type filter is kept.
    pub fn select_branch(&mut self, branch: Branch) {
        self.branch = branch;
    }

    pub fn select_filter(&mut self, filter: TypeFilter) {
        self.filter = filter;
    }

    pub fn admits(&self, record: &ClassRecord) -> bool {
        record.day == self.day
            && record.branch == self.branch
            && self.filter.matches(record.training_type)
    }
}

pub fn filter_classes<'a>(
    records: &'a [ClassRecord],
    selection: &SelectionState,
) -> Vec<&'a ClassRecord> {
    records
        .iter()
        .filter(|record| selection.admits(record))
        .collect()
}

/// Stable ascending sort on the `HH:MM` start time.
pub fn sort_by_start(classes: &mut [&ClassRecord]) {
    classes.sort_by(|a, b| a.start_time.cmp(&b.start_time));
}

/// Full at `current >= maximum`, almost full from 80% of `maximum`.
pub fn classify_capacity(current: u32, maximum: u32) -> Result<CapacityStatus, CapacityError> {
    if maximum == 0 {
        return Err(CapacityError::InvalidMaximum { current, maximum });
    }
    let status = if current >= maximum {
        CapacityStatus::Full
    } else if u64::from(current) * 5 >= u64::from(maximum) * 4 {
        CapacityStatus::AlmostFull
    } else {
        CapacityStatus::Open
    };
    Ok(status)
}

pub fn schedule_class(
    record: &ClassRecord,
    booking_url: &Url,
) -> Result<ScheduledClass, CapacityError> {
    let status = classify_capacity(record.current_participants, record.max_participants)?;
    let occupancy = u64::from(record.current_participants) * 100
        / u64::from(record.max_participants);
    Ok(ScheduledClass {
        class: record.clone(),
        status,
        status_label: status.label().to_string(),
        occupancy_percent: u32::try_from(occupancy).unwrap_or(u32::MAX),
        bookable: status != CapacityStatus::Full,
        booking_url: booking_url.clone(),
    })
}

pub fn build_schedule(
    records: &[ClassRecord],
    selection: &SelectionState,
    booking_url: &Url,
) -> Result<ScheduleView, CapacityError> {
    let mut matching = filter_classes(records, selection);
    sort_by_start(&mut matching);

    let classes = matching
        .into_iter()
        .map(|record| schedule_class(record, booking_url))
        .collect::<Result<Vec<_>, _>>()?;

    let empty_message = classes
        .is_empty()
        .then(|| EMPTY_SCHEDULE_MESSAGE.to_string());

    Ok(ScheduleView {
        selection: *selection,
        day_label: selection.day.label().to_string(),
        branch_label: selection.branch.label().to_string(),
        classes,
        empty_message,
    })
}
