use std::sync::Arc;

use clap::{Parser, Subcommand};
use client::config::ClientConfig;
use client::net::api::{ApiError, HttpApi};
use client::net::types::{ProfilePatch, RegisterRequest};
use client::state::auth::{SessionPhase, SessionState, SessionStore};
use client::state::profile::ProfileStore;
use client::util::navigation::RecordingNavigator;
use uuid::Uuid;

const FLOW_PASSWORD: &str = "TestPass123";

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("api call failed: {0}")]
    Api(#[from] ApiError),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("health check failed: HTTP {0}")]
    Health(u16),
    #[error("check failed: {0}")]
    Check(String),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "nutrivision-cli", about = "NutriVision identity API smoke-test CLI")]
struct Cli {
    #[arg(long, env = "NUTRIVISION_API_URL", default_value = "http://localhost:3001")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// `GET /healthz`.
    Ping,
    /// Print the session state a fresh client sees.
    Me,
    /// Log in and print the resulting session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "NUTRIVISION_PASSWORD")]
        password: String,
    },
    /// Register a throwaway user and walk the whole session lifecycle.
    Flow,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let config = ClientConfig::default().with_api_base(&cli.base_url);

    match cli.command {
        Command::Ping => run_ping(&config).await,
        Command::Me => run_me(&config).await,
        Command::Login { email, password } => run_login(&config, &email, &password).await,
        Command::Flow => run_flow(&config).await,
    }
}

fn session_store(config: &ClientConfig) -> Result<(SessionStore<HttpApi>, Arc<RecordingNavigator>), CliError> {
    let api = HttpApi::new(config)?;
    let navigator = Arc::new(RecordingNavigator::default());
    let store = SessionStore::with_login_path(api, navigator.clone(), &config.login_path);
    Ok((store, navigator))
}

fn print_session(state: &SessionState) -> Result<(), CliError> {
    let user = state.user.as_ref().map(serde_json::to_value).transpose()?;
    let summary = serde_json::json!({
        "phase": format!("{:?}", state.phase()),
        "user": user,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn expect_phase(state: &SessionState, expected: SessionPhase, step: &str) -> Result<(), CliError> {
    if state.phase() == expected {
        return Ok(());
    }
    Err(CliError::Check(format!("{step}: expected {expected:?}, got {:?}", state.phase())))
}

async fn run_ping(config: &ClientConfig) -> Result<(), CliError> {
    let response = reqwest::Client::new().get(format!("{}/healthz", config.api_base)).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::Health(status.as_u16()));
    }
    println!("ok");
    Ok(())
}

async fn run_me(config: &ClientConfig) -> Result<(), CliError> {
    let (session, _) = session_store(config)?;
    session.init().await;
    print_session(&session.state())
}

async fn run_login(config: &ClientConfig, email: &str, password: &str) -> Result<(), CliError> {
    let (session, _) = session_store(config)?;
    session.init().await;
    session.login(email, password).await?;
    print_session(&session.state())
}

async fn run_flow(config: &ClientConfig) -> Result<(), CliError> {
    let (session, navigator) = session_store(config)?;
    let profile = ProfileStore::new(session.api().clone());

    session.init().await;
    expect_phase(&session.state(), SessionPhase::Unauthenticated, "fresh session")?;
    eprintln!("fresh session: unauthenticated");

    let email = format!("smoke-{}@example.com", Uuid::new_v4().simple());
    session
        .register(RegisterRequest {
            first_name: "Smoke".to_owned(),
            last_name: "Test".to_owned(),
            email: email.clone(),
            password: FLOW_PASSWORD.to_owned(),
        })
        .await?;
    expect_phase(&session.state(), SessionPhase::Authenticated, "after register")?;
    eprintln!("registered and logged in: {email}");

    profile.init().await;
    if let Some(error) = profile.state().error {
        return Err(CliError::Check(format!("profile load: {error}")));
    }
    let saved = profile
        .save(&ProfilePatch { age: Some(30), gender: Some("female".to_owned()), allergies: Some("peanuts".to_owned()) })
        .await?;
    if saved.age != Some(30) {
        return Err(CliError::Check(format!("profile save: unexpected age {:?}", saved.age)));
    }
    eprintln!("profile saved");

    session.logout().await;
    if navigator.visits() != [config.login_path.clone()] {
        return Err(CliError::Check(format!("logout navigation: {:?}", navigator.visits())));
    }
    session.refresh().await;
    expect_phase(&session.state(), SessionPhase::Unauthenticated, "after logout")?;
    eprintln!("logged out");

    profile.dispose();
    session.dispose();
    println!("ok");
    Ok(())
}
