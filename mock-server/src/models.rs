use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Worker,
    Company,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub account_type: AccountType,
}

/// Stored account: the public user plus credentials and profile fields.
#[derive(Clone, Debug)]
pub struct Account {
    pub user: User,
    pub password: String,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub skills: Vec<String>,
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
}

impl Account {
    pub fn profile(&self) -> Profile {
        Profile {
            user: self.user.clone(),
            headline: self.headline.clone(),
            bio: self.bio.clone(),
            location: self.location.clone(),
            skills: self.skills.clone(),
            company_name: self.company_name.clone(),
            industry: self.industry.clone(),
            website: self.website.clone(),
        }
    }

    pub fn display_company_name(&self) -> String {
        self.company_name
            .clone()
            .unwrap_or_else(|| self.user.full_name.clone())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Profile {
    pub user: User,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub skills: Vec<String>,
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
}

#[derive(Deserialize)]
pub struct Signup {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub account_type: AccountType,
}

#[derive(Deserialize)]
pub struct Login {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthPayload {
    pub token: String,
    pub access_token: String,
    pub user: User,
}

#[derive(Deserialize)]
pub struct ProfilePatch {
    pub full_name: Option<String>,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub skills: Option<Vec<String>>,
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Experience {
    pub id: Uuid,
    #[serde(skip)]
    pub owner: Uuid,
    pub title: String,
    pub company: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct NewExperience {
    pub title: String,
    pub company: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct ExperiencePatch {
    pub title: Option<String>,
    pub company: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Education {
    pub id: Uuid,
    #[serde(skip)]
    pub owner: Uuid,
    pub school: String,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub start_year: Option<u16>,
    pub end_year: Option<u16>,
}

#[derive(Deserialize)]
pub struct NewEducation {
    pub school: String,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub start_year: Option<u16>,
    pub end_year: Option<u16>,
}

#[derive(Deserialize)]
pub struct EducationPatch {
    pub school: Option<String>,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub start_year: Option<u16>,
    pub end_year: Option<u16>,
}

#[derive(Clone, Debug, Serialize)]
pub struct HiringFocus {
    pub id: Uuid,
    #[serde(skip)]
    pub owner: Uuid,
    pub role: String,
    pub skills: Vec<String>,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct NewHiringFocus {
    pub role: String,
    #[serde(default)]
    pub skills: Vec<String>,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct HiringFocusPatch {
    pub role: Option<String>,
    pub skills: Option<Vec<String>>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub company_id: Uuid,
    pub company_name: Option<String>,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub job_type: String,
    pub remote: bool,
    pub salary_min: Option<u32>,
    pub salary_max: Option<u32>,
    pub skills: Vec<String>,
    pub is_active: bool,
}

#[derive(Deserialize)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub job_type: String,
    #[serde(default)]
    pub remote: bool,
    pub salary_min: Option<u32>,
    pub salary_max: Option<u32>,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Deserialize)]
pub struct JobPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub remote: Option<bool>,
    pub salary_min: Option<u32>,
    pub salary_max: Option<u32>,
    pub skills: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

#[derive(Deserialize)]
pub struct Apply {
    pub cover_letter: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub worker_id: Uuid,
    pub cover_letter: Option<String>,
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct WorkerSummary {
    pub id: Uuid,
    pub full_name: String,
    pub headline: Option<String>,
    pub location: Option<String>,
    pub skills: Vec<String>,
}

#[derive(Serialize)]
pub struct CompanySummary {
    pub id: Uuid,
    pub company_name: String,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub open_jobs: u32,
}

#[derive(Deserialize)]
pub struct NewReview {
    pub reviewee_id: Uuid,
    pub rating: u8,
    pub comment: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Review {
    pub id: Uuid,
    pub reviewer_id: Uuid,
    pub reviewee_id: Uuid,
    pub rating: u8,
    pub comment: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub body: String,
}

#[derive(Clone, Debug)]
pub struct Thread {
    pub id: Uuid,
    pub participants: [Uuid; 2],
}

#[derive(Serialize)]
pub struct Conversation {
    pub id: Uuid,
    pub participants: Vec<Uuid>,
    pub last_message: Option<Message>,
    pub messages: Vec<Message>,
}

#[derive(Deserialize)]
pub struct NewMessage {
    pub recipient_id: Uuid,
    pub body: String,
}

/// Offset pagination envelope shared by every list endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: usize,
    pub next: Option<u32>,
    pub previous: Option<u32>,
    pub results: Vec<T>,
}
