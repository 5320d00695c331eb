use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::{issue_tokens, revoke_tokens, CurrentUser};
use crate::models::*;
use crate::{paginate, ApiFailure, Db, Store};

type ApiResult<T> = Result<T, ApiFailure>;

const JOB_TYPES: [&str; 5] = ["full_time", "part_time", "contract", "temporary", "internship"];

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn require(field: &str, value: &str) -> ApiResult<()> {
    if blank(value) {
        return Err(ApiFailure::field(field, "This field may not be blank."));
    }
    Ok(())
}

fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(&needle.to_lowercase()))
}

fn account(store: &Store, id: Uuid) -> ApiResult<&Account> {
    store.accounts.get(&id).ok_or_else(ApiFailure::not_found)
}

fn require_type(store: &Store, id: Uuid, wanted: AccountType, message: &str) -> ApiResult<()> {
    if account(store, id)?.user.account_type != wanted {
        return Err(ApiFailure::forbidden(message));
    }
    Ok(())
}

// --- health ---

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn ping() -> &'static str {
    "pong"
}

pub async fn debug_error() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

// --- auth ---

pub async fn signup(
    State(db): State<Db>,
    Json(input): Json<Signup>,
) -> ApiResult<(StatusCode, Json<AuthPayload>)> {
    if !input.email.contains('@') {
        return Err(ApiFailure::field("email", "Enter a valid email address."));
    }
    if input.password.len() < 8 {
        return Err(ApiFailure::field(
            "password",
            "Ensure this field has at least 8 characters.",
        ));
    }
    require("full_name", &input.full_name)?;

    let mut store = db.write().await;
    let email = input.email.trim().to_lowercase();
    if store.accounts.values().any(|a| a.user.email == email) {
        return Err(ApiFailure::field(
            "email",
            "A user with this email already exists.",
        ));
    }
    let user = User {
        id: Uuid::new_v4(),
        email,
        full_name: input.full_name.trim().to_string(),
        account_type: input.account_type,
    };
    store.accounts.insert(
        user.id,
        Account {
            user: user.clone(),
            password: input.password,
            headline: None,
            bio: None,
            location: None,
            skills: Vec::new(),
            company_name: None,
            industry: None,
            website: None,
        },
    );
    let (token, access_token) = issue_tokens(&mut store, user.id);
    Ok((
        StatusCode::CREATED,
        Json(AuthPayload {
            token,
            access_token,
            user,
        }),
    ))
}

pub async fn login(State(db): State<Db>, Json(input): Json<Login>) -> ApiResult<Json<AuthPayload>> {
    let mut store = db.write().await;
    let email = input.email.trim().to_lowercase();
    let user = store
        .accounts
        .values()
        .find(|a| a.user.email == email && a.password == input.password)
        .map(|a| a.user.clone())
        .ok_or_else(|| ApiFailure::detail(StatusCode::UNAUTHORIZED, "Invalid credentials"))?;
    let (token, access_token) = issue_tokens(&mut store, user.id);
    Ok(Json(AuthPayload {
        token,
        access_token,
        user,
    }))
}

pub async fn logout(State(db): State<Db>, CurrentUser(me): CurrentUser) -> Json<Value> {
    revoke_tokens(&mut *db.write().await, me);
    Json(json!({ "detail": "Successfully logged out." }))
}

// --- profile ---

pub async fn get_profile(State(db): State<Db>, CurrentUser(me): CurrentUser) -> ApiResult<Json<Profile>> {
    let store = db.read().await;
    Ok(Json(account(&store, me)?.profile()))
}

pub async fn update_profile(
    State(db): State<Db>,
    CurrentUser(me): CurrentUser,
    Json(patch): Json<ProfilePatch>,
) -> ApiResult<Json<Profile>> {
    if let Some(name) = &patch.full_name {
        require("full_name", name)?;
    }
    let mut store = db.write().await;
    let account = store.accounts.get_mut(&me).ok_or_else(ApiFailure::not_found)?;
    if let Some(full_name) = patch.full_name {
        account.user.full_name = full_name;
    }
    if patch.headline.is_some() {
        account.headline = patch.headline;
    }
    if patch.bio.is_some() {
        account.bio = patch.bio;
    }
    if patch.location.is_some() {
        account.location = patch.location;
    }
    if let Some(skills) = patch.skills {
        account.skills = skills;
    }
    if patch.company_name.is_some() {
        account.company_name = patch.company_name;
    }
    if patch.industry.is_some() {
        account.industry = patch.industry;
    }
    if patch.website.is_some() {
        account.website = patch.website;
    }
    let profile = account.profile();
    if let Some(name) = &profile.company_name {
        for job in store.jobs.iter_mut().filter(|j| j.company_id == me) {
            job.company_name = Some(name.clone());
        }
    }
    Ok(Json(profile))
}

// --- experience ---

pub async fn list_experience(State(db): State<Db>, CurrentUser(me): CurrentUser) -> Json<Vec<Experience>> {
    let store = db.read().await;
    Json(store.experience.iter().filter(|e| e.owner == me).cloned().collect())
}

pub async fn create_experience(
    State(db): State<Db>,
    CurrentUser(me): CurrentUser,
    Json(input): Json<NewExperience>,
) -> ApiResult<(StatusCode, Json<Experience>)> {
    require("title", &input.title)?;
    require("company", &input.company)?;
    require("start_date", &input.start_date)?;
    let entry = Experience {
        id: Uuid::new_v4(),
        owner: me,
        title: input.title,
        company: input.company,
        start_date: input.start_date,
        end_date: input.end_date,
        description: input.description,
    };
    db.write().await.experience.push(entry.clone());
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn update_experience(
    State(db): State<Db>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<ExperiencePatch>,
) -> ApiResult<Json<Experience>> {
    let mut store = db.write().await;
    let entry = store
        .experience
        .iter_mut()
        .find(|e| e.id == id && e.owner == me)
        .ok_or_else(ApiFailure::not_found)?;
    if let Some(title) = patch.title {
        require("title", &title)?;
        entry.title = title;
    }
    if let Some(company) = patch.company {
        require("company", &company)?;
        entry.company = company;
    }
    if let Some(start_date) = patch.start_date {
        entry.start_date = start_date;
    }
    if patch.end_date.is_some() {
        entry.end_date = patch.end_date;
    }
    if patch.description.is_some() {
        entry.description = patch.description;
    }
    Ok(Json(entry.clone()))
}

pub async fn delete_experience(
    State(db): State<Db>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    let before = store.experience.len();
    store.experience.retain(|e| !(e.id == id && e.owner == me));
    if store.experience.len() == before {
        return Err(ApiFailure::not_found());
    }
    Ok(StatusCode::NO_CONTENT)
}

// --- education ---

pub async fn list_education(State(db): State<Db>, CurrentUser(me): CurrentUser) -> Json<Vec<Education>> {
    let store = db.read().await;
    Json(store.education.iter().filter(|e| e.owner == me).cloned().collect())
}

pub async fn create_education(
    State(db): State<Db>,
    CurrentUser(me): CurrentUser,
    Json(input): Json<NewEducation>,
) -> ApiResult<(StatusCode, Json<Education>)> {
    require("school", &input.school)?;
    if let (Some(start), Some(end)) = (input.start_year, input.end_year) {
        if end < start {
            return Err(ApiFailure::field(
                "end_year",
                "End year must not be before start year.",
            ));
        }
    }
    let entry = Education {
        id: Uuid::new_v4(),
        owner: me,
        school: input.school,
        degree: input.degree,
        field_of_study: input.field_of_study,
        start_year: input.start_year,
        end_year: input.end_year,
    };
    db.write().await.education.push(entry.clone());
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn update_education(
    State(db): State<Db>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<EducationPatch>,
) -> ApiResult<Json<Education>> {
    let mut store = db.write().await;
    let entry = store
        .education
        .iter_mut()
        .find(|e| e.id == id && e.owner == me)
        .ok_or_else(ApiFailure::not_found)?;
    if let Some(school) = patch.school {
        require("school", &school)?;
        entry.school = school;
    }
    if patch.degree.is_some() {
        entry.degree = patch.degree;
    }
    if patch.field_of_study.is_some() {
        entry.field_of_study = patch.field_of_study;
    }
    if patch.start_year.is_some() {
        entry.start_year = patch.start_year;
    }
    if patch.end_year.is_some() {
        entry.end_year = patch.end_year;
    }
    Ok(Json(entry.clone()))
}

pub async fn delete_education(
    State(db): State<Db>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    let before = store.education.len();
    store.education.retain(|e| !(e.id == id && e.owner == me));
    if store.education.len() == before {
        return Err(ApiFailure::not_found());
    }
    Ok(StatusCode::NO_CONTENT)
}

// --- hiring focus (companies only) ---

const COMPANY_ONLY: &str = "Only company accounts can manage hiring focus.";

pub async fn list_hiring_focus(
    State(db): State<Db>,
    CurrentUser(me): CurrentUser,
) -> ApiResult<Json<Vec<HiringFocus>>> {
    let store = db.read().await;
    require_type(&store, me, AccountType::Company, COMPANY_ONLY)?;
    Ok(Json(store.hiring_focus.iter().filter(|h| h.owner == me).cloned().collect()))
}

pub async fn create_hiring_focus(
    State(db): State<Db>,
    CurrentUser(me): CurrentUser,
    Json(input): Json<NewHiringFocus>,
) -> ApiResult<(StatusCode, Json<HiringFocus>)> {
    require("role", &input.role)?;
    let mut store = db.write().await;
    require_type(&store, me, AccountType::Company, COMPANY_ONLY)?;
    let entry = HiringFocus {
        id: Uuid::new_v4(),
        owner: me,
        role: input.role,
        skills: input.skills,
        description: input.description,
    };
    store.hiring_focus.push(entry.clone());
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn update_hiring_focus(
    State(db): State<Db>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<HiringFocusPatch>,
) -> ApiResult<Json<HiringFocus>> {
    let mut store = db.write().await;
    let entry = store
        .hiring_focus
        .iter_mut()
        .find(|h| h.id == id && h.owner == me)
        .ok_or_else(ApiFailure::not_found)?;
    if let Some(role) = patch.role {
        require("role", &role)?;
        entry.role = role;
    }
    if let Some(skills) = patch.skills {
        entry.skills = skills;
    }
    if patch.description.is_some() {
        entry.description = patch.description;
    }
    Ok(Json(entry.clone()))
}

pub async fn delete_hiring_focus(
    State(db): State<Db>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    let before = store.hiring_focus.len();
    store.hiring_focus.retain(|h| !(h.id == id && h.owner == me));
    if store.hiring_focus.len() == before {
        return Err(ApiFailure::not_found());
    }
    Ok(StatusCode::NO_CONTENT)
}

// --- jobs ---

#[derive(Deserialize)]
pub struct PageQuery {
    page: Option<u32>,
}

#[derive(Deserialize)]
pub struct JobQuery {
    page: Option<u32>,
    search: Option<String>,
    location: Option<String>,
    job_type: Option<String>,
    remote: Option<bool>,
    salary_min: Option<u32>,
}

fn check_job_type(job_type: &str) -> ApiResult<()> {
    if !JOB_TYPES.contains(&job_type) {
        return Err(ApiFailure::field(
            "job_type",
            &format!("\"{job_type}\" is not a valid choice."),
        ));
    }
    Ok(())
}

fn check_salary(min: Option<u32>, max: Option<u32>) -> ApiResult<()> {
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(ApiFailure::field(
                "salary_max",
                "Maximum salary must be greater than or equal to minimum salary.",
            ));
        }
    }
    Ok(())
}

pub async fn my_jobs(
    State(db): State<Db>,
    CurrentUser(me): CurrentUser,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Page<Job>>> {
    let store = db.read().await;
    let jobs = store.jobs.iter().filter(|j| j.company_id == me).cloned().collect();
    Ok(Json(paginate(jobs, query.page)?))
}

pub async fn create_job(
    State(db): State<Db>,
    CurrentUser(me): CurrentUser,
    Json(input): Json<NewJob>,
) -> ApiResult<(StatusCode, Json<Job>)> {
    let mut store = db.write().await;
    require_type(&store, me, AccountType::Company, "Only company accounts can post jobs.")?;
    require("title", &input.title)?;
    require("description", &input.description)?;
    check_job_type(&input.job_type)?;
    check_salary(input.salary_min, input.salary_max)?;

    let company_name = account(&store, me)?.display_company_name();
    let job = Job {
        id: Uuid::new_v4(),
        company_id: me,
        company_name: Some(company_name),
        title: input.title,
        description: input.description,
        location: input.location,
        job_type: input.job_type,
        remote: input.remote,
        salary_min: input.salary_min,
        salary_max: input.salary_max,
        skills: input.skills,
        is_active: true,
    };
    store.jobs.push(job.clone());
    Ok((StatusCode::CREATED, Json(job)))
}

pub async fn public_jobs(
    State(db): State<Db>,
    _viewer: Option<CurrentUser>,
    Query(query): Query<JobQuery>,
) -> ApiResult<Json<Page<Job>>> {
    let store = db.read().await;
    let jobs = store
        .jobs
        .iter()
        .filter(|j| j.is_active)
        .filter(|j| {
            query.search.as_deref().is_none_or(|s| {
                contains_ci(Some(&j.title), s) || contains_ci(Some(&j.description), s)
            })
        })
        .filter(|j| {
            query
                .location
                .as_deref()
                .is_none_or(|l| contains_ci(j.location.as_deref(), l))
        })
        .filter(|j| query.job_type.as_deref().is_none_or(|t| j.job_type == t))
        .filter(|j| query.remote.is_none_or(|r| j.remote == r))
        .filter(|j| {
            query
                .salary_min
                .is_none_or(|min| j.salary_max.or(j.salary_min).is_some_and(|s| s >= min))
        })
        .cloned()
        .collect();
    Ok(Json(paginate(jobs, query.page)?))
}

pub async fn get_job(
    State(db): State<Db>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Job>> {
    let store = db.read().await;
    store
        .jobs
        .iter()
        .find(|j| j.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(ApiFailure::not_found)
}

pub async fn update_job(
    State(db): State<Db>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<JobPatch>,
) -> ApiResult<Json<Job>> {
    let mut store = db.write().await;
    let job = store
        .jobs
        .iter_mut()
        .find(|j| j.id == id)
        .ok_or_else(ApiFailure::not_found)?;
    if job.company_id != me {
        return Err(ApiFailure::forbidden(
            "You do not have permission to perform this action.",
        ));
    }
    if let Some(job_type) = &patch.job_type {
        check_job_type(job_type)?;
    }
    check_salary(
        patch.salary_min.or(job.salary_min),
        patch.salary_max.or(job.salary_max),
    )?;
    if let Some(title) = patch.title {
        require("title", &title)?;
        job.title = title;
    }
    if let Some(description) = patch.description {
        job.description = description;
    }
    if patch.location.is_some() {
        job.location = patch.location;
    }
    if let Some(job_type) = patch.job_type {
        job.job_type = job_type;
    }
    if let Some(remote) = patch.remote {
        job.remote = remote;
    }
    if patch.salary_min.is_some() {
        job.salary_min = patch.salary_min;
    }
    if patch.salary_max.is_some() {
        job.salary_max = patch.salary_max;
    }
    if let Some(skills) = patch.skills {
        job.skills = skills;
    }
    if let Some(is_active) = patch.is_active {
        job.is_active = is_active;
    }
    Ok(Json(job.clone()))
}

pub async fn delete_job(
    State(db): State<Db>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    let job = store
        .jobs
        .iter()
        .find(|j| j.id == id)
        .ok_or_else(ApiFailure::not_found)?;
    if job.company_id != me {
        return Err(ApiFailure::forbidden(
            "You do not have permission to perform this action.",
        ));
    }
    store.jobs.retain(|j| j.id != id);
    store.applications.retain(|a| a.job_id != id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn apply(
    State(db): State<Db>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<Uuid>,
    Json(input): Json<Apply>,
) -> ApiResult<(StatusCode, Json<Application>)> {
    let mut store = db.write().await;
    require_type(&store, me, AccountType::Worker, "Only worker accounts can apply to jobs.")?;
    let job = store
        .jobs
        .iter()
        .find(|j| j.id == id)
        .ok_or_else(ApiFailure::not_found)?;
    if !job.is_active {
        return Err(ApiFailure::detail(
            StatusCode::BAD_REQUEST,
            "This job is no longer accepting applications.",
        ));
    }
    if store.applications.iter().any(|a| a.job_id == id && a.worker_id == me) {
        return Err(ApiFailure::detail(
            StatusCode::BAD_REQUEST,
            "You have already applied to this job.",
        ));
    }
    let application = Application {
        id: Uuid::new_v4(),
        job_id: id,
        worker_id: me,
        cover_letter: input.cover_letter,
        status: "pending",
    };
    store.applications.push(application.clone());
    Ok((StatusCode::CREATED, Json(application)))
}

// --- search ---

#[derive(Deserialize)]
pub struct WorkerQuery {
    page: Option<u32>,
    q: Option<String>,
    skills: Option<String>,
    location: Option<String>,
}

#[derive(Deserialize)]
pub struct CompanyQuery {
    page: Option<u32>,
    q: Option<String>,
    industry: Option<String>,
    location: Option<String>,
}

pub async fn search_workers(
    State(db): State<Db>,
    CurrentUser(_): CurrentUser,
    Query(query): Query<WorkerQuery>,
) -> ApiResult<Json<Page<WorkerSummary>>> {
    let store = db.read().await;
    let wanted: Vec<String> = query
        .skills
        .as_deref()
        .map(|s| {
            s.split(',')
                .map(|skill| skill.trim().to_lowercase())
                .filter(|skill| !skill.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let mut workers: Vec<&Account> = store
        .accounts
        .values()
        .filter(|a| a.user.account_type == AccountType::Worker)
        .filter(|a| {
            query.q.as_deref().is_none_or(|q| {
                contains_ci(Some(&a.user.full_name), q) || contains_ci(a.headline.as_deref(), q)
            })
        })
        .filter(|a| {
            wanted
                .iter()
                .all(|w| a.skills.iter().any(|s| s.to_lowercase() == *w))
        })
        .filter(|a| {
            query
                .location
                .as_deref()
                .is_none_or(|l| contains_ci(a.location.as_deref(), l))
        })
        .collect();
    workers.sort_by(|a, b| a.user.full_name.cmp(&b.user.full_name));

    let results = workers
        .into_iter()
        .map(|a| WorkerSummary {
            id: a.user.id,
            full_name: a.user.full_name.clone(),
            headline: a.headline.clone(),
            location: a.location.clone(),
            skills: a.skills.clone(),
        })
        .collect();
    Ok(Json(paginate(results, query.page)?))
}

pub async fn search_companies(
    State(db): State<Db>,
    CurrentUser(_): CurrentUser,
    Query(query): Query<CompanyQuery>,
) -> ApiResult<Json<Page<CompanySummary>>> {
    let store = db.read().await;
    let mut companies: Vec<&Account> = store
        .accounts
        .values()
        .filter(|a| a.user.account_type == AccountType::Company)
        .filter(|a| {
            query
                .q
                .as_deref()
                .is_none_or(|q| contains_ci(Some(&a.display_company_name()), q))
        })
        .filter(|a| {
            query.industry.as_deref().is_none_or(|i| {
                a.industry
                    .as_deref()
                    .is_some_and(|own| own.eq_ignore_ascii_case(i))
            })
        })
        .filter(|a| {
            query
                .location
                .as_deref()
                .is_none_or(|l| contains_ci(a.location.as_deref(), l))
        })
        .collect();
    companies.sort_by_key(|a| a.display_company_name());

    let results = companies
        .into_iter()
        .map(|a| CompanySummary {
            id: a.user.id,
            company_name: a.display_company_name(),
            industry: a.industry.clone(),
            location: a.location.clone(),
            open_jobs: store
                .jobs
                .iter()
                .filter(|j| j.company_id == a.user.id && j.is_active)
                .count() as u32,
        })
        .collect();
    Ok(Json(paginate(results, query.page)?))
}

// --- reviews ---

pub async fn create_review(
    State(db): State<Db>,
    CurrentUser(me): CurrentUser,
    Json(input): Json<NewReview>,
) -> ApiResult<(StatusCode, Json<Review>)> {
    if !(1..=5).contains(&input.rating) {
        return Err(ApiFailure::field(
            "rating",
            "Ensure this value is between 1 and 5.",
        ));
    }
    if input.reviewee_id == me {
        return Err(ApiFailure::detail(
            StatusCode::BAD_REQUEST,
            "You cannot review yourself.",
        ));
    }
    let mut store = db.write().await;
    account(&store, input.reviewee_id)?;
    let review = Review {
        id: Uuid::new_v4(),
        reviewer_id: me,
        reviewee_id: input.reviewee_id,
        rating: input.rating,
        comment: input.comment,
    };
    store.reviews.push(review.clone());
    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn user_reviews(
    State(db): State<Db>,
    _viewer: Option<CurrentUser>,
    Path(id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Page<Review>>> {
    let store = db.read().await;
    account(&store, id)?;
    let reviews = store.reviews.iter().filter(|r| r.reviewee_id == id).cloned().collect();
    Ok(Json(paginate(reviews, query.page)?))
}

// --- messaging ---

fn conversation_view(store: &Store, thread: &Thread, with_messages: bool) -> Conversation {
    let messages: Vec<Message> = store
        .messages
        .iter()
        .filter(|m| m.conversation_id == thread.id)
        .cloned()
        .collect();
    Conversation {
        id: thread.id,
        participants: thread.participants.to_vec(),
        last_message: messages.last().cloned(),
        messages: if with_messages { messages } else { Vec::new() },
    }
}

pub async fn send_message(
    State(db): State<Db>,
    CurrentUser(me): CurrentUser,
    Json(input): Json<NewMessage>,
) -> ApiResult<(StatusCode, Json<Message>)> {
    require("body", &input.body)?;
    if input.recipient_id == me {
        return Err(ApiFailure::detail(
            StatusCode::BAD_REQUEST,
            "You cannot message yourself.",
        ));
    }
    let mut store = db.write().await;
    account(&store, input.recipient_id)?;

    let existing = store
        .threads
        .iter()
        .find(|t| t.participants.contains(&me) && t.participants.contains(&input.recipient_id))
        .map(|t| t.id);
    let conversation_id = match existing {
        Some(id) => id,
        None => {
            let thread = Thread {
                id: Uuid::new_v4(),
                participants: [me, input.recipient_id],
            };
            let id = thread.id;
            store.threads.push(thread);
            id
        }
    };
    let message = Message {
        id: Uuid::new_v4(),
        conversation_id,
        sender_id: me,
        body: input.body,
    };
    store.messages.push(message.clone());
    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn list_conversations(
    State(db): State<Db>,
    CurrentUser(me): CurrentUser,
) -> Json<Vec<Conversation>> {
    let store = db.read().await;
    Json(
        store
            .threads
            .iter()
            .filter(|t| t.participants.contains(&me))
            .map(|t| conversation_view(&store, t, false))
            .collect(),
    )
}

pub async fn get_conversation(
    State(db): State<Db>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Conversation>> {
    let store = db.read().await;
    let thread = store
        .threads
        .iter()
        .find(|t| t.id == id && t.participants.contains(&me))
        .ok_or_else(ApiFailure::not_found)?;
    Ok(Json(conversation_view(&store, thread, true)))
}
