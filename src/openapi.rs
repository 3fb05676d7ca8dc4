use utoipa::OpenApi;

use crate::models::{
    Branch, BranchInfo, CapacityStatus, ClassRecord, Day, LeadForm, OpeningHours, ScheduleView,
    ScheduledClass, SelectionState, SubmissionReceipt, SubmissionState, TrainingType,
    TrainingTypeInfo,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz_live,
        crate::handlers::healthz_ready,
        crate::handlers::list_branches,
        crate::handlers::get_branch,
        crate::handlers::list_training_types,
        crate::handlers::get_schedule,
        crate::handlers::get_schedule_ical,
        crate::handlers::submit_lead
    ),
    components(schemas(
        Day,
        Branch,
        TrainingType,
        ClassRecord,
        CapacityStatus,
        ScheduledClass,
        SelectionState,
        ScheduleView,
        OpeningHours,
        BranchInfo,
        TrainingTypeInfo,
        LeadForm,
        SubmissionState,
        SubmissionReceipt
    )),
    tags(
        (name = "studio", description = "Branches and training disciplines"),
        (name = "schedule", description = "Weekly class schedule"),
        (name = "leads", description = "Trial class registration")
    ),
)]
pub struct ApiDoc;
