//! API client for the dues portal REST API.
//!
//! Every request goes through the session manager, which attaches the
//! access token and transparently retries once after a token refresh.

use reqwest::{multipart, Client, Response};
use serde::{de::DeserializeOwned, Serialize};

use crate::auth::{SessionManager, SessionStore};
use crate::config::Config;
use crate::models::{
    AcademicDue, AcademicDueUpdate, AcademicDuesResponse, Challan, ChallanReview, Due, DueFilter,
    HostelDue, HostelDueUpdate, LegacyFilter, LegacyRecord, LegacyRecordsResponse,
    LegacyStatistics, LegacyStudentGroup, LibraryDue, NewChallan, NewDue, PaginatedLegacyRecords,
    StaffProfile, StudentSummary,
};

use super::ApiError;

/// Portal API client.
/// Clone is cheap - reqwest::Client uses Arc internally for connection
/// pooling, and the session manager is shared the same way.
#[derive(Clone)]
pub struct PortalClient {
    client: Client,
    base_url: String,
    session: SessionManager,
}

impl PortalClient {
    /// Create a client for the portal named in the config, persisting
    /// sessions to the given store.
    pub fn new(config: &Config, store: SessionStore) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let session = SessionManager::new(client.clone(), config.api_base_url.clone(), store);

        Ok(Self {
            client,
            base_url: session.base_url().to_string(),
            session,
        })
    }

    /// The session manager behind this client (login, logout, restore).
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ===== Response handling =====

    async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(ApiError::from_status(status, &text));
        }
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Malformed response body: {}", e)))
    }

    async fn check_status(response: Response) -> Result<(), ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let text = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status, &text))
    }

    // ===== Request helpers =====

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let response = self
            .session
            .execute(|| {
                let mut request = self.client.get(&url);
                if !query.is_empty() {
                    request = request.query(query);
                }
                request
            })
            .await?;
        Self::parse_response(response).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let response = self
            .session
            .execute(|| self.client.post(&url).json(body))
            .await?;
        Self::parse_response(response).await
    }

    async fn patch_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let response = self
            .session
            .execute(|| self.client.patch(&url).json(body))
            .await?;
        Self::parse_response(response).await
    }

    // ===== Departmental dues =====

    /// Fetch dues matching the filter.
    pub async fn list_dues(&self, filter: &DueFilter) -> Result<Vec<Due>, ApiError> {
        self.get_json("/dues/", &filter.to_query()).await
    }

    /// Create a due against a student.
    pub async fn add_due(&self, due: &NewDue) -> Result<Due, ApiError> {
        self.post_json("/dues/", due).await
    }

    /// Settle a due.
    pub async fn mark_due_paid(&self, id: i64) -> Result<(), ApiError> {
        let url = self.url(&format!("/dues/{}/mark_as_paid/", id));
        let response = self.session.execute(|| self.client.post(&url)).await?;
        Self::check_status(response).await
    }

    // ===== Challans =====

    /// Fetch challans visible to the current account.
    pub async fn list_challans(&self) -> Result<Vec<Challan>, ApiError> {
        self.get_json("/dues/challans/", &[]).await
    }

    /// Upload a payment proof image. The form is rebuilt per attempt so a
    /// retry after a token refresh carries the full body again.
    pub async fn upload_challan(&self, challan: &NewChallan) -> Result<Challan, ApiError> {
        let url = self.url("/dues/challans/");
        let response = self
            .session
            .execute(|| {
                self.client
                    .post(&url)
                    .multipart(Self::challan_form(challan))
            })
            .await?;
        Self::parse_response(response).await
    }

    /// Verify or reject an uploaded challan.
    pub async fn review_challan(
        &self,
        id: i64,
        review: &ChallanReview,
    ) -> Result<Challan, ApiError> {
        self.patch_json(&format!("/dues/challans/{}/", id), review)
            .await
    }

    fn challan_form(challan: &NewChallan) -> multipart::Form {
        let image = multipart::Part::bytes(challan.image.clone())
            .file_name(challan.image_name.clone());
        let mut form = multipart::Form::new()
            .text("student", challan.student.clone())
            .text("department", challan.department.as_str())
            .text("amount", challan.amount.to_string())
            .part("image", image);
        if let Some(ref remarks) = challan.remarks {
            form = form.text("remarks", remarks.clone());
        }
        form
    }

    // ===== Academic dues =====

    /// Fetch academic dues with the running total.
    pub async fn list_academic_dues(&self) -> Result<AcademicDuesResponse, ApiError> {
        self.get_json("/dues/academic-dues/", &[]).await
    }

    /// Record a payment split against an academic due.
    pub async fn update_academic_due(
        &self,
        id: i64,
        update: &AcademicDueUpdate,
    ) -> Result<AcademicDue, ApiError> {
        self.patch_json(&format!("/dues/academic-dues/{}/", id), update)
            .await
    }

    // ===== Hostel records =====

    /// Fetch hostel records.
    pub async fn list_hostel_dues(&self) -> Result<Vec<HostelDue>, ApiError> {
        self.get_json("/dues/hostel-records/", &[]).await
    }

    /// Update the charge fields of a hostel record.
    pub async fn update_hostel_due(
        &self,
        id: i64,
        update: &HostelDueUpdate,
    ) -> Result<HostelDue, ApiError> {
        self.patch_json(&format!("/dues/hostel-records/{}/", id), update)
            .await
    }

    // ===== Library records =====

    /// Fetch library fines.
    pub async fn list_library_dues(&self) -> Result<Vec<LibraryDue>, ApiError> {
        self.get_json("/dues/library-records/", &[]).await
    }

    // ===== Legacy records =====

    /// Fetch legacy ledger entries matching the filter.
    pub async fn list_legacy_records(
        &self,
        filter: &LegacyFilter,
    ) -> Result<LegacyRecordsResponse, ApiError> {
        self.get_json("/dues/legacy-academic-records/", &filter.to_query())
            .await
    }

    /// Fetch legacy entries collapsed per student.
    pub async fn legacy_records_grouped(
        &self,
        filter: &LegacyFilter,
    ) -> Result<Vec<LegacyStudentGroup>, ApiError> {
        self.get_json(
            "/dues/legacy-academic-records/grouped_by_student/",
            &filter.to_query(),
        )
        .await
    }

    /// Fetch one page of grouped legacy entries.
    pub async fn legacy_records_paginated(
        &self,
        filter: &LegacyFilter,
        page: i64,
        page_size: i64,
    ) -> Result<PaginatedLegacyRecords, ApiError> {
        let mut query = filter.to_query();
        query.push(("page", page.to_string()));
        query.push(("page_size", page_size.to_string()));
        self.get_json("/dues/legacy-academic-records/paginated_grouped/", &query)
            .await
    }

    /// Fetch aggregates over the legacy ledgers.
    pub async fn legacy_statistics(
        &self,
        filter: &LegacyFilter,
    ) -> Result<LegacyStatistics, ApiError> {
        self.get_json("/dues/legacy-academic-records/statistics/", &filter.to_query())
            .await
    }

    /// Free-text search over legacy entries.
    pub async fn search_legacy_records(&self, query: &str) -> Result<Vec<LegacyRecord>, ApiError> {
        self.get_json(
            "/dues/legacy-academic-records/search/",
            &[("q", query.to_string())],
        )
        .await
    }

    // ===== Students and staff =====

    /// Search student accounts by roll number or name.
    pub async fn search_students(&self, query: &str) -> Result<Vec<StudentSummary>, ApiError> {
        self.get_json("/students/search/", &[("q", query.to_string())])
            .await
    }

    /// Profile of the logged-in staff member.
    pub async fn staff_profile(&self) -> Result<StaffProfile, ApiError> {
        self.get_json("/staff/profile/", &[]).await
    }
}
