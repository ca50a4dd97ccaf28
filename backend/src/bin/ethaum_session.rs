//! Terminal client hosting a session synchronizer.
//!
//! The session and last-known profile are cached as JSON files so a
//! returning user sees their profile before the identity service answers.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use tokio::runtime::Builder;
use url::Url;

use ethaum::domain::ports::{
    FixtureIdentityProvider, FixtureProfileRepository, IdentityProvider, ProfileRepository,
    RecordingNavigator,
};
use ethaum::domain::{
    HOME_ROUTE, SessionPorts, SessionSynchronizer, SignInCredentials, SignUpOutcome, SignUpRequest,
    UserType,
};
use ethaum::inbound::http::auth::SessionResponse;
use ethaum::outbound::file_session_cache::FileSessionCache;
use ethaum::outbound::identity::GoTrueIdentityProvider;
use ethaum::outbound::persistence::{DbPool, DieselProfileRepository, PoolConfig};

const IDENTITY_TIMEOUT: Duration = Duration::from_secs(10);

/// `ethaum-session` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "ethaum-session",
    about = "Sign in to EthAum and inspect the cached session",
    version
)]
struct CliArgs {
    /// Directory holding `session.json` and `profile.json`.
    #[arg(long = "cache-dir", value_name = "path", default_value = ".ethaum")]
    cache_dir: PathBuf,
    /// GoTrue-compatible identity service. A local fixture is used when omitted.
    #[arg(long = "identity-url", value_name = "url")]
    identity_url: Option<Url>,
    /// Anonymous API key for the identity service.
    #[arg(long = "anon-key", value_name = "key", requires = "identity_url")]
    anon_key: Option<String>,
    /// Database holding profile rows. Profiles are unavailable when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Register an account and create its profile row.
    SignUp {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long = "full-name")]
        full_name: String,
        /// `startup` or `enterprise`.
        #[arg(long = "user-type")]
        user_type: String,
    },
    /// Sign in, optionally insisting on an account type.
    SignIn {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Reject accounts that cannot act as this type.
        #[arg(long = "as", value_name = "user-type")]
        expected: Option<String>,
    },
    /// Sign out and clear the cache.
    SignOut,
    /// Reconcile the cache with the identity service and print the result.
    Status,
    /// Exchange the refresh token for a new session.
    Refresh,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(run(args))
}

fn identity(args: &CliArgs) -> Result<Arc<dyn IdentityProvider>> {
    match (&args.identity_url, &args.anon_key) {
        (Some(url), Some(key)) => Ok(Arc::new(
            GoTrueIdentityProvider::new(url.clone(), key.clone(), IDENTITY_TIMEOUT)
                .wrap_err("build identity client")?,
        )),
        (Some(_), None) => Err(eyre!("--anon-key is required with --identity-url")),
        _ => Ok(Arc::new(FixtureIdentityProvider::default())),
    }
}

async fn profiles(args: &CliArgs) -> Result<Arc<dyn ProfileRepository>> {
    match &args.database_url {
        Some(url) => {
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .wrap_err("create database pool")?;
            Ok(Arc::new(DieselProfileRepository::new(
                pool,
                Arc::new(DefaultClock),
            )))
        }
        None => Ok(Arc::new(FixtureProfileRepository)),
    }
}

fn print_state(sync: &SessionSynchronizer<FileSessionCache>) -> Result<()> {
    let view = SessionResponse::from(&sync.state());
    println!(
        "{}",
        serde_json::to_string_pretty(&view).wrap_err("render session")?
    );
    Ok(())
}

/// What to show once the command and any provider events have settled.
enum Report {
    State,
    Notice(String),
}

async fn execute(
    sync: &SessionSynchronizer<FileSessionCache>,
    navigator: &RecordingNavigator,
    command: Command,
) -> Result<Report> {
    match command {
        Command::SignUp {
            email,
            password,
            full_name,
            user_type,
        } => {
            let request = SignUpRequest::try_from_parts(&email, &password, &full_name, &user_type)?;
            match sync.sign_up(&request).await? {
                SignUpOutcome::SignedIn(_) => Ok(Report::State),
                SignUpOutcome::ConfirmationRequired { email, .. } => Ok(Report::Notice(format!(
                    "Check {email} for a confirmation link, then sign in."
                ))),
            }
        }
        Command::SignIn {
            email,
            password,
            expected,
        } => {
            let credentials = SignInCredentials::try_from_parts(&email, &password)?;
            let expected = expected
                .as_deref()
                .map(str::parse::<UserType>)
                .transpose()?;
            sync.sign_in(&credentials, expected).await?;
            Ok(Report::State)
        }
        Command::SignOut => {
            let outcome = sync.sign_out().await;
            let path = navigator.last().unwrap_or_else(|| HOME_ROUTE.to_owned());
            outcome?;
            Ok(Report::Notice(format!("signed out; continue at {path}")))
        }
        Command::Status => {
            sync.initialize().await;
            Ok(Report::State)
        }
        Command::Refresh => {
            sync.initialize().await;
            if sync.refresh_session().await?.is_none() {
                return Err(eyre!("not signed in"));
            }
            Ok(Report::State)
        }
    }
}

async fn run(args: CliArgs) -> Result<()> {
    let cache = FileSessionCache::open(&args.cache_dir)
        .wrap_err_with(|| format!("open cache at {}", args.cache_dir.display()))?;
    let navigator = Arc::new(RecordingNavigator::default());
    let identity = identity(&args)?;
    let mut events = identity.subscribe();
    let ports = SessionPorts {
        identity,
        profiles: profiles(&args).await?,
        navigator: navigator.clone(),
        clock: Arc::new(DefaultClock),
    };
    let sync = SessionSynchronizer::new(ports, cache);

    // Provider events are applied while the command runs; whatever is still
    // queued afterwards is replayed so the cache matches the provider.
    let command = execute(&sync, &navigator, args.command);
    tokio::pin!(command);
    let report = tokio::select! {
        biased;
        report = &mut command => report,
        () = sync.listen(&mut events) => command.await,
    };
    sync.catch_up(&mut events).await;

    match report? {
        Report::State => print_state(&sync),
        Report::Notice(message) => {
            println!("{message}");
            Ok(())
        }
    }
}
