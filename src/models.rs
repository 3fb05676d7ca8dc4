use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use url::Url;
use utoipa::ToSchema;

#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    #[default]
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Day {
    /// Studio week order, Sunday first.
    pub const ALL: [Day; 7] = [
        Day::Sunday,
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Sunday => "sunday",
            Day::Monday => "monday",
            Day::Tuesday => "tuesday",
            Day::Wednesday => "wednesday",
            Day::Thursday => "thursday",
            Day::Friday => "friday",
            Day::Saturday => "saturday",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Day::Sunday => "ראשון",
            Day::Monday => "שני",
            Day::Tuesday => "שלישי",
            Day::Wednesday => "רביעי",
            Day::Thursday => "חמישי",
            Day::Friday => "שישי",
            Day::Saturday => "שבת",
        }
    }

    pub fn days_from_sunday(&self) -> i64 {
        match self {
            Day::Sunday => 0,
            Day::Monday => 1,
            Day::Tuesday => 2,
            Day::Wednesday => 3,
            Day::Thursday => 4,
            Day::Friday => 5,
            Day::Saturday => 6,
        }
    }
}

impl FromStr for Day {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Day::ALL
            .into_iter()
            .find(|day| day.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("day", s))
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum Branch {
    #[default]
    TelAviv,
    Ashdod,
}

impl Branch {
    pub const ALL: [Branch; 2] = [Branch::TelAviv, Branch::Ashdod];

    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::TelAviv => "tel-aviv",
            Branch::Ashdod => "ashdod",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Branch::TelAviv => "תל אביב",
            Branch::Ashdod => "אשדוד",
        }
    }
}

impl FromStr for Branch {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Branch::ALL
            .into_iter()
            .find(|branch| branch.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("branch", s))
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum TrainingType {
    Pilates,
    Yoga,
    Functional,
}

impl TrainingType {
    pub const ALL: [TrainingType; 3] = [
        TrainingType::Pilates,
        TrainingType::Yoga,
        TrainingType::Functional,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingType::Pilates => "pilates",
            TrainingType::Yoga => "yoga",
            TrainingType::Functional => "functional",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrainingType::Pilates => "פילאטיס",
            TrainingType::Yoga => "יוגה",
            TrainingType::Functional => "פונקציונלי",
        }
    }
}

impl FromStr for TrainingType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TrainingType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("training type", s))
    }
}

impl fmt::Display for TrainingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Training-type axis of the schedule selection: every type, or exactly one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeFilter {
    #[default]
    All,
    Only(TrainingType),
}

impl TypeFilter {
    pub fn matches(&self, training_type: TrainingType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(wanted) => *wanted == training_type,
        }
    }
}

impl FromStr for TypeFilter {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(TypeFilter::All);
        }
        s.parse()
            .map(TypeFilter::Only)
            .map_err(|_| UnknownVariant::new("type filter", s))
    }
}

impl TryFrom<String> for TypeFilter {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TypeFilter> for String {
    fn from(value: TypeFilter) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::All => f.write_str("all"),
            TypeFilter::Only(kind) => f.write_str(kind.as_str()),
        }
    }
}

/// One scheduled class occurrence in the weekly timetable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct ClassRecord {
    pub id: String,
    pub day: Day,
    /// Zero-padded 24h `HH:MM`, so string order is time order.
    #[schema(example = "07:00")]
    pub start_time: String,
    #[schema(example = "08:00")]
    pub end_time: String,
    pub title: String,
    pub trainer: String,
    pub training_type: TrainingType,
    pub branch: Branch,
    pub max_participants: u32,
    pub current_participants: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum CapacityStatus {
    Full,
    AlmostFull,
    Open,
}

impl CapacityStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CapacityStatus::Full => "מלא",
            CapacityStatus::AlmostFull => "כמעט מלא",
            CapacityStatus::Open => "פתוח להרשמה",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
pub struct ScheduledClass {
    #[serde(flatten)]
    pub class: ClassRecord,
    pub status: CapacityStatus,
    pub status_label: String,
    /// `current * 100 / max`, above 100 when a class is overbooked.
    pub occupancy_percent: u32,
    pub bookable: bool,
    pub booking_url: Url,
}

/// The user's current schedule selection: one register per axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SelectionState {
    pub day: Day,
    pub branch: Branch,
    #[schema(value_type = String, example = "all")]
    pub filter: TypeFilter,
}

#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
pub struct ScheduleView {
    pub selection: SelectionState,
    pub day_label: String,
    pub branch_label: String,
    pub classes: Vec<ScheduledClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct OpeningHours {
    pub days: String,
    pub hours: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct BranchInfo {
    pub id: Branch,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub map_url: Url,
    pub opening_hours: Vec<OpeningHours>,
    pub features: Vec<String>,
    pub training_types: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct TrainingTypeInfo {
    pub id: TrainingType,
    pub title: String,
    pub description: String,
    pub benefits: Vec<String>,
}

/// Trial-class registration submitted from the contact form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct LeadForm {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub branch: Option<Branch>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub training_type: Option<TrainingType>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionState {
    Idle,
    Submitting,
    Submitted,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct SubmissionReceipt {
    pub state: SubmissionState,
    pub message: String,
}

// Missing and null required fields are left for validation to report.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// Unselected <select> options arrive as "".
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&Branch::TelAviv).unwrap(), r#""tel-aviv""#);
        assert_eq!(serde_json::to_string(&Day::Wednesday).unwrap(), r#""wednesday""#);
        assert_eq!(
            serde_json::to_string(&CapacityStatus::AlmostFull).unwrap(),
            r#""almost-full""#
        );
        assert_eq!("ashdod".parse::<Branch>().unwrap(), Branch::Ashdod);
        assert!("haifa".parse::<Branch>().is_err());
    }

    #[test]
    fn test_type_filter_parse() {
        assert_eq!("all".parse::<TypeFilter>().unwrap(), TypeFilter::All);
        assert_eq!(
            "yoga".parse::<TypeFilter>().unwrap(),
            TypeFilter::Only(TrainingType::Yoga)
        );
        assert!("boxing".parse::<TypeFilter>().is_err());

        let json = serde_json::to_string(&TypeFilter::Only(TrainingType::Pilates)).unwrap();
        assert_eq!(json, r#""pilates""#);
        let back: TypeFilter = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TypeFilter::Only(TrainingType::Pilates));
    }

    #[test]
    fn test_type_filter_matches() {
        assert!(TypeFilter::All.matches(TrainingType::Functional));
        assert!(TypeFilter::Only(TrainingType::Yoga).matches(TrainingType::Yoga));
        assert!(!TypeFilter::Only(TrainingType::Yoga).matches(TrainingType::Pilates));
    }

    #[test]
    fn test_selection_defaults() {
        let selection = SelectionState::default();
        assert_eq!(selection.day, Day::Sunday);
        assert_eq!(selection.branch, Branch::TelAviv);
        assert_eq!(selection.filter, TypeFilter::All);
    }

    #[test]
    fn test_lead_form_blank_selects() {
        let form: LeadForm = serde_json::from_str(
            r#"{"name":"Dana","phone":"050-1234567","branch":"","training_type":"yoga"}"#,
        )
        .unwrap();
        assert_eq!(form.branch, None);
        assert_eq!(form.training_type, Some(TrainingType::Yoga));

        let missing: LeadForm =
            serde_json::from_str(r#"{"name":null,"phone":"050-1234567"}"#).unwrap();
        assert_eq!(missing.name, "");
        let missing: LeadForm = serde_json::from_str(r#"{"name":"Dana"}"#).unwrap();
        assert_eq!(missing.phone, "");

        let bad = serde_json::from_str::<LeadForm>(
            r#"{"name":"Dana","phone":"050-1234567","branch":"haifa"}"#,
        );
        assert!(bad.is_err());
    }
}
