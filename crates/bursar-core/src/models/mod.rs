//! Data models for dues portal entities.
//!
//! This module contains all the data structures used to represent
//! portal data including:
//!
//! - `SessionIdentity`, `Role`, `ProfileResponse`: Authenticated user identity
//! - `Due`, `NewDue`, `DueFilter`: Miscellaneous departmental dues
//! - `AcademicDue`, `HostelDue`, `LibraryDue`: Per-office due ledgers
//! - `Challan`, `NewChallan`, `ChallanReview`: Payment proof uploads
//! - Legacy types: `LegacyRecord`, `LegacyStudentGroup`, `LegacyStatistics`

pub mod challan;
pub mod dues;
pub mod identity;
pub mod legacy;
pub mod student;

pub use challan::{Challan, ChallanDepartment, ChallanReview, ChallanStatus, NewChallan};
pub use dues::{
    AcademicDue, AcademicDueUpdate, AcademicDuesResponse, DepartmentDetails, Due, DueFilter,
    FeeStructure, HostelDue, HostelDueUpdate, LibraryDue, NewDue, PaymentStatus, StudentAccount,
    StudentDetails,
};
pub use identity::{ProfileData, ProfileResponse, Role, SessionIdentity, UserInfo};
pub use legacy::{
    CasteStat, CourseStat, LegacyFilter, LegacyRecord, LegacyRecordsResponse, LegacyStatistics,
    LegacyStudent, LegacyStudentGroup, PaginatedLegacyRecords, YearStat,
};
pub use student::{StaffProfile, StudentRef, StudentSummary};
