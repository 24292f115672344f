//! Dues models: miscellaneous departmental dues, academic (tuition) dues,
//! hostel records, and library records.
//!
//! Decimal columns arrive from the backend as strings ("1250.00"); computed
//! aggregates arrive as JSON numbers. String amounts keep the wire value
//! exact and expose a parsed helper for display math.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::identity::UserInfo;
use super::student::StudentRef;

// ============================================================================
// Miscellaneous departmental dues (/dues/)
// ============================================================================

/// One departmental due as served by `GET /dues/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Due {
    pub id: i64,
    pub student: i64,
    pub student_details: StudentDetails,
    pub department: i64,
    #[serde(default)]
    pub department_details: Option<DepartmentDetails>,
    pub amount: String,
    pub due_date: NaiveDate,
    pub description: String,
    pub is_paid: bool,
    #[serde(default)]
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Due {
    /// Amount as a number; unparseable values count as zero.
    pub fn amount_value(&self) -> f64 {
        self.amount.parse().unwrap_or(0.0)
    }
}

/// Nested student profile inside a due record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentDetails {
    pub user: UserInfo,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub course_duration: Option<String>,
    #[serde(default)]
    pub caste: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl StudentDetails {
    /// Roll number of the student (the account username).
    pub fn roll_number(&self) -> &str {
        &self.user.username
    }
}

/// Nested department info inside a due record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentDetails {
    pub id: i64,
    pub department: String,
    #[serde(default)]
    pub designation: Option<String>,
}

/// Body of `POST /dues/`. The backend derives `created_by` from the
/// authenticated staff account.
#[derive(Debug, Clone, Serialize)]
pub struct NewDue {
    pub student: String,
    pub department: String,
    pub amount: String,
    pub due_date: NaiveDate,
    pub description: String,
}

/// Query filters accepted by `GET /dues/`.
#[derive(Debug, Clone, Default)]
pub struct DueFilter {
    pub department: Option<i64>,
    pub student: Option<i64>,
    pub is_paid: Option<bool>,
    pub created_by: Option<i64>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub due_date_before: Option<NaiveDate>,
    pub due_date_after: Option<NaiveDate>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

impl DueFilter {
    /// Render the set filters as query pairs.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(department) = self.department {
            pairs.push(("department", department.to_string()));
        }
        if let Some(student) = self.student {
            pairs.push(("student", student.to_string()));
        }
        if let Some(is_paid) = self.is_paid {
            pairs.push(("is_paid", is_paid.to_string()));
        }
        if let Some(created_by) = self.created_by {
            pairs.push(("created_by", created_by.to_string()));
        }
        if let Some(min_amount) = self.min_amount {
            pairs.push(("min_amount", min_amount.to_string()));
        }
        if let Some(max_amount) = self.max_amount {
            pairs.push(("max_amount", max_amount.to_string()));
        }
        if let Some(due_date_before) = self.due_date_before {
            pairs.push(("due_date_before", due_date_before.to_string()));
        }
        if let Some(due_date_after) = self.due_date_after {
            pairs.push(("due_date_after", due_date_after.to_string()));
        }
        if let Some(ref search) = self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(ref ordering) = self.ordering {
            pairs.push(("ordering", ordering.clone()));
        }
        pairs
    }
}

// ============================================================================
// Academic dues (/dues/academic-dues/)
// ============================================================================

/// Settlement state of an academic due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Processing,
    Unpaid,
    Paid,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Processing => write!(f, "Processing"),
            PaymentStatus::Unpaid => write!(f, "Unpaid"),
            PaymentStatus::Paid => write!(f, "Paid"),
        }
    }
}

/// Fee schedule row an academic due is assessed against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeStructure {
    pub course_name: String,
    #[serde(default)]
    pub academic_year: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub year: Option<i64>,
    pub tuition_fee: i64,
    #[serde(default)]
    pub special_fee: Option<i64>,
    #[serde(default)]
    pub other_fee: Option<i64>,
    #[serde(default)]
    pub exam_fee: Option<i64>,
}

/// One tuition/academic due per student per study year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcademicDue {
    pub id: i64,
    pub student: StudentRef,
    #[serde(default)]
    pub fee_structure: Option<FeeStructure>,
    #[serde(default)]
    pub academic_year_label: Option<String>,
    #[serde(default)]
    pub year_of_study: Option<String>,
    pub paid_by_govt: i64,
    pub paid_by_student: i64,
    pub total_amount: f64,
    pub unpaid_amount: f64,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// Payload of `GET /dues/academic-dues/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcademicDuesResponse {
    pub results: Vec<AcademicDue>,
    pub total_due_amount: f64,
}

/// Body of `PATCH /dues/academic-dues/{id}/`.
#[derive(Debug, Clone, Serialize)]
pub struct AcademicDueUpdate {
    pub paid_by_govt: i64,
    pub paid_by_student: i64,
}

// ============================================================================
// Hostel records (/dues/hostel-records/)
// ============================================================================

/// One hostel record per student per study year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostelDue {
    pub id: i64,
    pub student: StudentRef,
    pub year_of_study: String,
    pub mess_bill: i64,
    pub scholarship: i64,
    pub deposit: i64,
    #[serde(default)]
    pub remarks: Option<String>,
    pub total_amount: f64,
    pub due_amount: f64,
}

/// Body of `PATCH /dues/hostel-records/{id}/`. Only set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HostelDueUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mess_bill: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scholarship: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

// ============================================================================
// Library records (/dues/library-records/)
// ============================================================================

/// Student account as nested in library records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentAccount {
    pub id: i64,
    pub roll_number: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
}

impl StudentAccount {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// One library fine as served by `GET /dues/library-records/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryDue {
    pub id: i64,
    pub student: StudentAccount,
    pub description: String,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
}
