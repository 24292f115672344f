//! Payment challan models. A challan is an uploaded proof-of-payment image
//! that staff verify or reject.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::student::StudentRef;

/// Review state of a challan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallanStatus {
    Pending,
    Verified,
    Rejected,
}

impl ChallanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChallanStatus::Pending => "pending",
            ChallanStatus::Verified => "verified",
            ChallanStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ChallanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which office a challan settles a due with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallanDepartment {
    Academic,
    Hostel,
}

impl ChallanDepartment {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChallanDepartment::Academic => "academic",
            ChallanDepartment::Hostel => "hostel",
        }
    }
}

impl std::fmt::Display for ChallanDepartment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One challan as served by `GET /dues/challans/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challan {
    pub id: i64,
    pub student: StudentRef,
    pub department: ChallanDepartment,
    /// URL of the uploaded proof image.
    pub image: String,
    pub amount: f64,
    pub status: ChallanStatus,
    /// Account id of the uploader, when the backend recorded one.
    pub uploaded_by: Option<i64>,
    #[serde(default)]
    pub verified_by: Option<i64>,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default)]
    pub verified_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// Inputs for the multipart `POST /dues/challans/` upload.
#[derive(Debug, Clone)]
pub struct NewChallan {
    pub student: String,
    pub department: ChallanDepartment,
    pub amount: f64,
    pub image: Vec<u8>,
    pub image_name: String,
    pub remarks: Option<String>,
}

/// Body of `PATCH /dues/challans/{id}/`.
#[derive(Debug, Clone, Serialize)]
pub struct ChallanReview {
    pub status: ChallanStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}
