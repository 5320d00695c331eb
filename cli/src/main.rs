use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;
use uuid::Uuid;

use jobboard_core::logging::init_dev_logging;
use jobboard_core::types::{
    ApplyRequest, CompanyFilters, JobFilters, JobType, LoginRequest, WorkerFilters,
};
use jobboard_core::{ApiConfig, ApiError, AuthScheme, Credential, JobBoardClient, API_URL_ENV};

#[derive(Parser)]
#[command(name = "jobboard", about = "Command-line client for the job-board API")]
struct Cli {
    /// Backend base URL
    #[arg(long, global = true, env = API_URL_ENV)]
    api_url: Option<String>,

    /// Credential for authenticated endpoints
    #[arg(long, global = true, env = "JOBBOARD_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Force the authorization scheme instead of inferring it (django | supabase)
    #[arg(long, global = true)]
    auth_scheme: Option<AuthScheme>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check that the backend is reachable
    Health,
    /// Log in and print the issued credentials
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "JOBBOARD_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Show the authenticated user's profile
    Profile,
    /// Search public job postings
    Jobs {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        location: Option<String>,
        /// full_time, part_time, contract, temporary or internship
        #[arg(long, value_parser = parse_job_type)]
        job_type: Option<JobType>,
        #[arg(long)]
        remote: Option<bool>,
        #[arg(long)]
        salary_min: Option<u32>,
        #[arg(long)]
        page: Option<u32>,
    },
    /// Apply to a job
    Apply {
        job_id: Uuid,
        #[arg(long)]
        cover_letter: Option<String>,
    },
    /// Search worker profiles
    Workers {
        #[arg(long)]
        q: Option<String>,
        /// Comma-separated; all must match
        #[arg(long)]
        skills: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        page: Option<u32>,
    },
    /// Search companies
    Companies {
        #[arg(long)]
        q: Option<String>,
        #[arg(long)]
        industry: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        page: Option<u32>,
    },
    /// List reviews left for a user
    Reviews {
        user_id: Uuid,
        #[arg(long)]
        page: Option<u32>,
    },
}

fn parse_job_type(s: &str) -> Result<JobType, String> {
    serde_json::from_value(Value::String(s.to_string())).map_err(|_| format!("unknown job type: {s}"))
}

impl Cli {
    fn credential(&self) -> Option<Credential> {
        let token = self.token.as_deref()?;
        let credential = Credential::new(token);
        Some(match self.auth_scheme {
            Some(scheme) => credential.with_scheme(scheme),
            None => credential,
        })
    }

    fn require_credential(&self) -> anyhow::Result<Credential> {
        self.credential()
            .context("this command needs --token or JOBBOARD_TOKEN")
    }
}

fn run(cli: &Cli, client: &JobBoardClient) -> anyhow::Result<Value> {
    let output = match &cli.command {
        Command::Health => serde_json::to_value(client.health()?)?,
        Command::Login { email, password } => serde_json::to_value(client.login(&LoginRequest {
            email: email.clone(),
            password: password.clone(),
        })?)?,
        Command::Profile => serde_json::to_value(client.profile(&cli.require_credential()?)?)?,
        Command::Jobs {
            search,
            location,
            job_type,
            remote,
            salary_min,
            page,
        } => {
            let filters = JobFilters {
                page: *page,
                search: search.clone(),
                location: location.clone(),
                job_type: *job_type,
                remote: *remote,
                salary_min: *salary_min,
            };
            serde_json::to_value(client.search_jobs(cli.credential().as_ref(), &filters)?)?
        }
        Command::Apply {
            job_id,
            cover_letter,
        } => {
            let request = ApplyRequest {
                cover_letter: cover_letter.clone(),
            };
            serde_json::to_value(client.apply_to_job(&cli.require_credential()?, *job_id, &request)?)?
        }
        Command::Workers {
            q,
            skills,
            location,
            page,
        } => {
            let filters = WorkerFilters {
                page: *page,
                q: q.clone(),
                skills: skills.clone(),
                location: location.clone(),
            };
            serde_json::to_value(client.search_workers(&cli.require_credential()?, &filters)?)?
        }
        Command::Companies {
            q,
            industry,
            location,
            page,
        } => {
            let filters = CompanyFilters {
                page: *page,
                q: q.clone(),
                industry: industry.clone(),
                location: location.clone(),
            };
            serde_json::to_value(client.search_companies(&cli.require_credential()?, &filters)?)?
        }
        Command::Reviews { user_id, page } => {
            serde_json::to_value(client.reviews_for(cli.credential().as_ref(), *user_id, *page)?)?
        }
    };
    Ok(output)
}

fn report(err: &anyhow::Error) {
    eprintln!("error: {err}");
    if let Some(api) = err.downcast_ref::<ApiError>() {
        if let Some(status) = api.status() {
            eprintln!("status: {status}");
        }
        if let Some(data) = api.data() {
            eprintln!("data: {data}");
        }
    }
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_dev_logging();

    let cli = Cli::parse();
    let config = match &cli.api_url {
        Some(url) => ApiConfig::new(url.clone()),
        None => ApiConfig::unset(),
    };
    let client = JobBoardClient::from_config(config);

    match run(&cli, &client) {
        Ok(value) => {
            match serde_json::to_string_pretty(&value) {
                Ok(text) => println!("{text}"),
                Err(_) => println!("{value}"),
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            report(&err);
            ExitCode::FAILURE
        }
    }
}
