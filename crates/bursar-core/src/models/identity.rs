//! Identity models for the signed-in user.
//!
//! `SessionIdentity` is the client-side view of whoever logged in, built
//! from the `/profile/` payload and kept alongside the tokens for the life
//! of the session.

use serde::{Deserialize, Serialize};

/// Which kind of account holds the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Staff,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Student => write!(f, "student"),
            Role::Staff => write!(f, "staff"),
        }
    }
}

/// The logged-in user, cached client-side after login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub id: i64,
    pub display_name: String,
    pub role: Role,
    pub email: Option<String>,
    pub roll_number: Option<String>,
}

impl SessionIdentity {
    /// Map a profile payload onto the identity the session carries.
    /// Students sign in with their roll number, which the backend stores
    /// as the account username.
    pub fn from_profile(profile: &ProfileResponse) -> Self {
        let user = &profile.profile.user;
        let full_name = format!("{} {}", user.first_name, user.last_name)
            .trim()
            .to_string();
        let display_name = if full_name.is_empty() {
            user.username.clone()
        } else {
            full_name
        };
        let roll_number = match profile.role {
            Role::Student => Some(user.username.clone()),
            Role::Staff => None,
        };

        Self {
            id: user.id,
            display_name,
            role: profile.role,
            email: user.email.clone(),
            roll_number,
        }
    }

    pub fn is_staff(&self) -> bool {
        self.role == Role::Staff
    }

    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }
}

/// Payload of `GET /profile/`: a role tag plus the matching profile.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResponse {
    #[serde(rename = "type")]
    pub role: Role,
    pub profile: ProfileData,
}

impl ProfileResponse {
    /// Department the profile belongs to (staff only).
    pub fn department(&self) -> Option<String> {
        self.profile.department.clone()
    }
}

/// Profile body shared by both roles. Student-only and staff-only fields
/// are optional so one type covers both payload shapes.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileData {
    pub user: UserInfo,
    // Student fields
    pub course: Option<String>,
    pub course_duration: Option<String>,
    pub caste: Option<String>,
    // Staff fields
    pub department: Option<String>,
    pub designation: Option<String>,
    // Common fields
    pub gender: Option<String>,
    pub phone_number: Option<String>,
}

/// The nested account object inside profile and dues payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub email: Option<String>,
    pub username: String,
    #[serde(default)]
    pub is_student: bool,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl UserInfo {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_profile_maps_to_identity() {
        let json = r#"{
            "type": "student",
            "profile": {
                "user": {
                    "id": 42,
                    "email": null,
                    "username": "21TU10234",
                    "is_student": true,
                    "is_staff": false,
                    "first_name": "Anita",
                    "last_name": "Rao"
                },
                "course": "M.Sc. (Computer Science)",
                "course_duration": "2 Years",
                "caste": "OC",
                "gender": "Female",
                "phone_number": "9876543210"
            }
        }"#;

        let profile: ProfileResponse = serde_json::from_str(json).expect("Failed to parse profile");
        let identity = SessionIdentity::from_profile(&profile);

        assert_eq!(identity.id, 42);
        assert_eq!(identity.role, Role::Student);
        assert_eq!(identity.display_name, "Anita Rao");
        assert_eq!(identity.roll_number.as_deref(), Some("21TU10234"));
        assert_eq!(identity.email, None);
        assert!(identity.is_student());
        assert_eq!(profile.department(), None);
    }

    #[test]
    fn test_staff_profile_maps_to_identity() {
        let json = r#"{
            "type": "staff",
            "profile": {
                "user": {
                    "id": 7,
                    "email": "librarian@tu.in",
                    "username": "librarian@tu.in",
                    "is_student": false,
                    "is_staff": true,
                    "first_name": "Suresh",
                    "last_name": "Kumar"
                },
                "department": "librarian",
                "designation": "Librarian",
                "gender": "Male",
                "phone_number": "9123456780"
            }
        }"#;

        let profile: ProfileResponse = serde_json::from_str(json).expect("Failed to parse profile");
        let identity = SessionIdentity::from_profile(&profile);

        assert_eq!(identity.role, Role::Staff);
        assert_eq!(identity.display_name, "Suresh Kumar");
        assert_eq!(identity.roll_number, None);
        assert_eq!(identity.email.as_deref(), Some("librarian@tu.in"));
        assert_eq!(profile.department().as_deref(), Some("librarian"));
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        let json = r#"{
            "type": "student",
            "profile": {
                "user": {"id": 1, "email": null, "username": "20TU00001"},
                "course": null,
                "course_duration": null,
                "caste": null,
                "department": null,
                "designation": null,
                "gender": null,
                "phone_number": null
            }
        }"#;

        let profile: ProfileResponse = serde_json::from_str(json).expect("Failed to parse profile");
        let identity = SessionIdentity::from_profile(&profile);
        assert_eq!(identity.display_name, "20TU00001");
    }

    #[test]
    fn test_role_serde_round_trip() {
        assert_eq!(serde_json::to_string(&Role::Staff).expect("serialize"), "\"staff\"");
        let parsed: Role = serde_json::from_str("\"student\"").expect("deserialize");
        assert_eq!(parsed, Role::Student);
        assert_eq!(Role::Student.to_string(), "student");
    }
}
