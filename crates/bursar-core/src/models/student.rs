//! Student and staff lookup models.

use serde::{Deserialize, Serialize};

/// Flat student reference embedded in challan, academic and hostel
/// payloads. The roll number comes from the account username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentRef {
    pub roll_number: String,
    pub full_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub caste: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
}

/// One row of `GET /students/search/` (capped at five matches server-side).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentSummary {
    pub roll_number: String,
    pub name: String,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub caste: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Payload of `GET /staff/profile/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffProfile {
    pub name: String,
    pub designation: String,
    pub department: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_student_search_results() {
        let json = r#"[
            {
                "roll_number": "21TU10234",
                "name": "Anita Rao",
                "course": "M.Sc. (Computer Science)",
                "caste": "OC",
                "phone_number": "9876543210"
            },
            {
                "roll_number": "21TU10235",
                "name": "Bhanu Prasad",
                "course": "M.B.A",
                "caste": "BC-B",
                "phone_number": "9876500000"
            }
        ]"#;

        let results: Vec<StudentSummary> = serde_json::from_str(json).expect("Failed to parse search results");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].roll_number, "21TU10234");
        assert_eq!(results[1].course.as_deref(), Some("M.B.A"));
    }

    #[test]
    fn test_parse_staff_profile() {
        let json = r#"{
            "name": "Suresh Kumar",
            "designation": "Librarian",
            "department": "librarian",
            "phone_number": "9123456780",
            "email": "librarian@tu.in"
        }"#;

        let profile: StaffProfile = serde_json::from_str(json).expect("Failed to parse staff profile");
        assert_eq!(profile.department, "librarian");
        assert_eq!(profile.email.as_deref(), Some("librarian@tu.in"));
    }
}
