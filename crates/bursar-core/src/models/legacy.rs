//! Legacy academic records: dues carried over from the pre-digital ledgers,
//! keyed by roll number and batch rather than live student accounts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Student snapshot embedded in a legacy record. Fields are whatever the
/// old ledgers captured, so everything is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyStudent {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub batch: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub caste: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// One ledger entry as served by `GET /dues/legacy-academic-records/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyRecord {
    pub id: i64,
    pub student: LegacyStudent,
    pub due_amount: String,
    #[serde(default)]
    pub tc_number: Option<String>,
    #[serde(default)]
    pub tc_issued_date: Option<NaiveDate>,
    #[serde(default)]
    pub year: Option<i64>,
}

impl LegacyRecord {
    /// Due amount as a number; unparseable values count as zero.
    pub fn due_amount_value(&self) -> f64 {
        self.due_amount.parse().unwrap_or(0.0)
    }

    pub fn has_tc(&self) -> bool {
        self.tc_number.is_some()
    }
}

/// Payload of the flat legacy listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyRecordsResponse {
    pub results: Vec<LegacyRecord>,
    pub total_due_amount: f64,
}

/// Records collapsed per student. A student can appear in the ledgers under
/// several roll numbers; all of them are listed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyStudentGroup {
    pub roll_numbers: Vec<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub caste: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub dues: Vec<LegacyRecord>,
}

/// Payload of `GET /dues/legacy-academic-records/paginated_grouped/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedLegacyRecords {
    pub results: Vec<LegacyStudentGroup>,
    pub count: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub page_size: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

// ===== Statistics =====

/// Aggregates over the legacy ledgers. The per-course and per-caste keys are
/// Django ORM lookup paths and arrive verbatim in the JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyStatistics {
    pub total_records: i64,
    pub records_with_dues: i64,
    pub records_without_dues: i64,
    pub total_due_amount: f64,
    pub tc_issued_count: i64,
    pub year_statistics: Vec<YearStat>,
    pub course_statistics: Vec<CourseStat>,
    pub caste_statistics: Vec<CasteStat>,
    pub available_years: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearStat {
    pub year: i64,
    pub count: i64,
    pub total_amount: f64,
    pub avg_amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseStat {
    #[serde(rename = "student__course__name", default)]
    pub course: Option<String>,
    pub count: i64,
    pub total_amount: f64,
    pub avg_amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CasteStat {
    #[serde(rename = "student__caste", default)]
    pub caste: Option<String>,
    pub count: i64,
    pub total_amount: f64,
    pub avg_amount: f64,
}

// ===== Filters =====

/// Query filters accepted by the legacy record endpoints.
#[derive(Debug, Clone, Default)]
pub struct LegacyFilter {
    pub student_username: Option<String>,
    pub student_name: Option<String>,
    pub has_dues: Option<bool>,
    pub tc_number: Option<String>,
    pub course: Option<String>,
    pub caste: Option<String>,
    pub batch: Option<String>,
    pub year: Option<i64>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
}

impl LegacyFilter {
    /// Render the set filters as query pairs.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(ref student_username) = self.student_username {
            pairs.push(("student_username", student_username.clone()));
        }
        if let Some(ref student_name) = self.student_name {
            pairs.push(("student_name", student_name.clone()));
        }
        if let Some(has_dues) = self.has_dues {
            pairs.push(("has_dues", has_dues.to_string()));
        }
        if let Some(ref tc_number) = self.tc_number {
            pairs.push(("tc_number", tc_number.clone()));
        }
        if let Some(ref course) = self.course {
            pairs.push(("course", course.clone()));
        }
        if let Some(ref caste) = self.caste {
            pairs.push(("caste", caste.clone()));
        }
        if let Some(ref batch) = self.batch {
            pairs.push(("batch", batch.clone()));
        }
        if let Some(year) = self.year {
            pairs.push(("year", year.to_string()));
        }
        if let Some(min_amount) = self.min_amount {
            pairs.push(("min_amount", min_amount.to_string()));
        }
        if let Some(max_amount) = self.max_amount {
            pairs.push(("max_amount", max_amount.to_string()));
        }
        pairs
    }
}
