//! Typed wrappers over the gateway, one method per backend endpoint.
//!
//! # Design
//! `JobBoardClient` owns a `Gateway` and adds nothing but paths, payload
//! types and debug-level tracing. Credentials are passed per call and never
//! kept. Failures are the gateway's `ApiError`s unchanged, plus
//! `Deserialization` when a 2xx body does not match the contract.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::Credential;
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::gateway::{Gateway, RequestOptions, ResponseBody};
use crate::transport::{Transport, UreqTransport};
use crate::types::{
    Application, ApplyRequest, AuthResponse, CompanyFilters, CompanySummary, Conversation,
    Education, EducationInput, EducationUpdate, Experience, ExperienceInput, ExperienceUpdate,
    HealthStatus, HiringFocus, HiringFocusInput, HiringFocusUpdate, Job, JobFilters, JobInput,
    JobUpdate, LoginRequest, Message, Page, Profile, ProfileUpdate, Review, ReviewInput,
    SendMessage, SignupRequest, WorkerFilters, WorkerSummary,
};

#[derive(Debug, Clone)]
pub struct JobBoardClient<T = UreqTransport> {
    gateway: Gateway<T>,
}

impl JobBoardClient<UreqTransport> {
    /// Client over the default blocking HTTP transport.
    pub fn from_config(config: ApiConfig) -> Self {
        Self::new(Gateway::new(config, UreqTransport::new()))
    }
}

impl<T: Transport> JobBoardClient<T> {
    pub fn new(gateway: Gateway<T>) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Gateway<T> {
        &self.gateway
    }

    // --- health & auth ---

    pub fn health(&self) -> Result<HealthStatus, ApiError> {
        self.call("/api/health/", RequestOptions::get())
    }

    pub fn signup(&self, input: &SignupRequest) -> Result<AuthResponse, ApiError> {
        self.call("/api/auth/signup/", RequestOptions::post().json(input)?)
    }

    pub fn login(&self, input: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.call("/api/auth/login/", RequestOptions::post().json(input)?)
    }

    pub fn logout(&self, credential: &Credential) -> Result<(), ApiError> {
        self.call_empty("/api/auth/logout/", RequestOptions::post().auth(credential))
    }

    // --- profile ---

    pub fn profile(&self, credential: &Credential) -> Result<Profile, ApiError> {
        self.call("/api/profile/", RequestOptions::get().auth(credential))
    }

    pub fn update_profile(
        &self,
        credential: &Credential,
        update: &ProfileUpdate,
    ) -> Result<Profile, ApiError> {
        self.call(
            "/api/profile/",
            RequestOptions::patch().auth(credential).json(update)?,
        )
    }

    pub fn list_experience(&self, credential: &Credential) -> Result<Vec<Experience>, ApiError> {
        self.call("/api/profile/experience/", RequestOptions::get().auth(credential))
    }

    pub fn add_experience(
        &self,
        credential: &Credential,
        input: &ExperienceInput,
    ) -> Result<Experience, ApiError> {
        self.call(
            "/api/profile/experience/",
            RequestOptions::post().auth(credential).json(input)?,
        )
    }

    pub fn update_experience(
        &self,
        credential: &Credential,
        id: Uuid,
        update: &ExperienceUpdate,
    ) -> Result<Experience, ApiError> {
        self.call(
            &format!("/api/profile/experience/{id}/"),
            RequestOptions::patch().auth(credential).json(update)?,
        )
    }

    pub fn delete_experience(&self, credential: &Credential, id: Uuid) -> Result<(), ApiError> {
        self.call_empty(
            &format!("/api/profile/experience/{id}/"),
            RequestOptions::delete().auth(credential),
        )
    }

    pub fn list_education(&self, credential: &Credential) -> Result<Vec<Education>, ApiError> {
        self.call("/api/profile/education/", RequestOptions::get().auth(credential))
    }

    pub fn add_education(
        &self,
        credential: &Credential,
        input: &EducationInput,
    ) -> Result<Education, ApiError> {
        self.call(
            "/api/profile/education/",
            RequestOptions::post().auth(credential).json(input)?,
        )
    }

    pub fn update_education(
        &self,
        credential: &Credential,
        id: Uuid,
        update: &EducationUpdate,
    ) -> Result<Education, ApiError> {
        self.call(
            &format!("/api/profile/education/{id}/"),
            RequestOptions::patch().auth(credential).json(update)?,
        )
    }

    pub fn delete_education(&self, credential: &Credential, id: Uuid) -> Result<(), ApiError> {
        self.call_empty(
            &format!("/api/profile/education/{id}/"),
            RequestOptions::delete().auth(credential),
        )
    }

    pub fn list_hiring_focus(&self, credential: &Credential) -> Result<Vec<HiringFocus>, ApiError> {
        self.call("/api/profile/hiring-focus/", RequestOptions::get().auth(credential))
    }

    pub fn add_hiring_focus(
        &self,
        credential: &Credential,
        input: &HiringFocusInput,
    ) -> Result<HiringFocus, ApiError> {
        self.call(
            "/api/profile/hiring-focus/",
            RequestOptions::post().auth(credential).json(input)?,
        )
    }

    pub fn update_hiring_focus(
        &self,
        credential: &Credential,
        id: Uuid,
        update: &HiringFocusUpdate,
    ) -> Result<HiringFocus, ApiError> {
        self.call(
            &format!("/api/profile/hiring-focus/{id}/"),
            RequestOptions::patch().auth(credential).json(update)?,
        )
    }

    pub fn delete_hiring_focus(&self, credential: &Credential, id: Uuid) -> Result<(), ApiError> {
        self.call_empty(
            &format!("/api/profile/hiring-focus/{id}/"),
            RequestOptions::delete().auth(credential),
        )
    }

    // --- jobs ---

    /// Jobs posted by the authenticated company.
    pub fn my_jobs(&self, credential: &Credential, page: Option<u32>) -> Result<Page<Job>, ApiError> {
        let path = with_query("/api/jobs/", &PageQuery { page })?;
        self.call(&path, RequestOptions::get().auth(credential))
    }

    pub fn create_job(&self, credential: &Credential, input: &JobInput) -> Result<Job, ApiError> {
        self.call("/api/jobs/", RequestOptions::post().auth(credential).json(input)?)
    }

    pub fn job(&self, credential: &Credential, id: Uuid) -> Result<Job, ApiError> {
        self.call(&format!("/api/jobs/{id}/"), RequestOptions::get().auth(credential))
    }

    pub fn update_job(
        &self,
        credential: &Credential,
        id: Uuid,
        update: &JobUpdate,
    ) -> Result<Job, ApiError> {
        self.call(
            &format!("/api/jobs/{id}/"),
            RequestOptions::patch().auth(credential).json(update)?,
        )
    }

    pub fn delete_job(&self, credential: &Credential, id: Uuid) -> Result<(), ApiError> {
        self.call_empty(&format!("/api/jobs/{id}/"), RequestOptions::delete().auth(credential))
    }

    /// Public listing of active jobs. A credential is optional.
    pub fn search_jobs(
        &self,
        credential: Option<&Credential>,
        filters: &JobFilters,
    ) -> Result<Page<Job>, ApiError> {
        let path = with_query("/api/jobs/public/", filters)?;
        self.call(&path, RequestOptions::get().maybe_auth(credential))
    }

    pub fn apply_to_job(
        &self,
        credential: &Credential,
        job_id: Uuid,
        input: &ApplyRequest,
    ) -> Result<Application, ApiError> {
        self.call(
            &format!("/api/jobs/{job_id}/apply/"),
            RequestOptions::post().auth(credential).json(input)?,
        )
    }

    // --- search ---

    pub fn search_workers(
        &self,
        credential: &Credential,
        filters: &WorkerFilters,
    ) -> Result<Page<WorkerSummary>, ApiError> {
        let path = with_query("/api/search/workers/", filters)?;
        self.call(&path, RequestOptions::get().auth(credential))
    }

    pub fn search_companies(
        &self,
        credential: &Credential,
        filters: &CompanyFilters,
    ) -> Result<Page<CompanySummary>, ApiError> {
        let path = with_query("/api/search/companies/", filters)?;
        self.call(&path, RequestOptions::get().auth(credential))
    }

    // --- reviews ---

    pub fn create_review(&self, credential: &Credential, input: &ReviewInput) -> Result<Review, ApiError> {
        self.call("/api/reviews/", RequestOptions::post().auth(credential).json(input)?)
    }

    pub fn reviews_for(
        &self,
        credential: Option<&Credential>,
        user_id: Uuid,
        page: Option<u32>,
    ) -> Result<Page<Review>, ApiError> {
        let path = with_query(&format!("/api/users/{user_id}/reviews/"), &PageQuery { page })?;
        self.call(&path, RequestOptions::get().maybe_auth(credential))
    }

    // --- messaging ---

    pub fn conversations(&self, credential: &Credential) -> Result<Vec<Conversation>, ApiError> {
        self.call("/api/messages/conversations/", RequestOptions::get().auth(credential))
    }

    pub fn conversation(&self, credential: &Credential, id: Uuid) -> Result<Conversation, ApiError> {
        self.call(
            &format!("/api/messages/conversations/{id}/"),
            RequestOptions::get().auth(credential),
        )
    }

    pub fn send_message(&self, credential: &Credential, input: &SendMessage) -> Result<Message, ApiError> {
        self.call("/api/messages/", RequestOptions::post().auth(credential).json(input)?)
    }

    fn call<R: DeserializeOwned>(&self, path: &str, options: RequestOptions) -> Result<R, ApiError> {
        let result = self.dispatch(path, &options).and_then(ResponseBody::decode);
        log_outcome(&options, path, &result);
        result
    }

    /// For endpoints whose success body carries nothing of interest.
    fn call_empty(&self, path: &str, options: RequestOptions) -> Result<(), ApiError> {
        let result = self.dispatch(path, &options).map(|_| ());
        log_outcome(&options, path, &result);
        result
    }

    fn dispatch(&self, path: &str, options: &RequestOptions) -> Result<ResponseBody, ApiError> {
        debug!(method = %options.method, path, "api request");
        self.gateway.request(path, options)
    }
}

#[derive(Serialize)]
struct PageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<u32>,
}

fn with_query<Q: Serialize>(path: &str, query: &Q) -> Result<String, ApiError> {
    let query = serde_qs::to_string(query).map_err(|e| ApiError::Serialization(e.to_string()))?;
    if query.is_empty() {
        Ok(path.to_string())
    } else {
        Ok(format!("{path}?{query}"))
    }
}

fn log_outcome<R>(options: &RequestOptions, path: &str, result: &Result<R, ApiError>) {
    match result {
        Ok(_) => debug!(method = %options.method, path, "api request succeeded"),
        Err(err) => warn!(
            method = %options.method,
            path,
            status = err.status(),
            error = %err,
            "api request failed"
        ),
    }
}
