use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Attendance status for a single day. Stored verbatim in the `status`
/// column, parsed from request payloads via `FromStr`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, sqlx::Type, ToSchema,
)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": 1,
        "studentId": 1,
        "date": "2024-01-01",
        "status": "Present"
    })
)]
pub struct Attendance {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1)]
    pub student_id: u64,

    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "Present")]
    pub status: AttendanceStatus,
}
