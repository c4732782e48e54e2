use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{FuzzySelect, Input, Password};
use dotenvy::dotenv;
use survey_client::{
    AuthContext, FileCredentialStore, LoginRequest, NewSurvey, RegisterRequest, SurveySession,
    is_valid_email,
};
use survey_client_http::{ApiClient, ClientConfig};
use survey_dialoguer_wizard::{
    DialoguerWizard, WizardError, format_dashboard, format_responses, format_stats,
};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Take surveys, view their results and manage your account from the terminal
#[derive(Parser, Debug)]
#[command(name = "survey")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the survey API
    #[arg(long, env = "SURVEY_API_URL")]
    api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "SURVEY_API_TIMEOUT_SECS", value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Where the sign-in record is kept
    #[arg(long, env = "SURVEY_AUTH_FILE")]
    auth_file: Option<PathBuf>,

    /// Disable colored prompts
    #[arg(long)]
    plain: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List published surveys
    List,
    /// Take a survey; pick one interactively if no id is given
    Take { id: Option<String> },
    /// Show response statistics and stored responses for a survey
    Results { id: String },
    /// Create a survey from a JSON file
    Create { file: PathBuf },
    /// Replace a survey with the contents of a JSON file
    Update { id: String, file: PathBuf },
    /// Show your created and answered surveys
    Dashboard,
    /// Sign in
    Login {
        /// Username or email
        #[arg(long)]
        user: Option<String>,
    },
    /// Create an account and sign in
    Register,
    /// Sign out
    Logout,
    /// Show who is signed in
    Whoami,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (if present)
    dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();

    match run(cli).await {
        Err(err) if matches!(err.downcast_ref::<WizardError>(), Some(WizardError::Cancelled)) => {
            eprintln!("Cancelled.");
            std::process::exit(130);
        }
        result => result,
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = cli.api_url {
        config = config.with_api_url(url);
    }
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    if let Some(path) = cli.auth_file {
        config = config.with_auth_file(path);
    }
    debug!(api = %config.api_url, timeout = ?config.timeout, "configured");

    let store = match &config.auth_file {
        Some(path) => FileCredentialStore::new(path),
        None => FileCredentialStore::open_default()?,
    };
    let mut auth = AuthContext::hydrate(store)?;

    let mut client = ApiClient::new(&config)?;
    client.set_token(auth.token().map(String::from));

    let wizard = if cli.plain {
        DialoguerWizard::plain()
    } else {
        DialoguerWizard::new()
    };

    match cli.command {
        Command::List => {
            let surveys = client.list_surveys().await?;
            let published: Vec<_> = surveys.iter().filter(|s| s.is_published()).collect();
            if published.is_empty() {
                println!("No surveys published yet.");
            }
            for survey in published {
                println!(
                    "{}  {} ({} question{})",
                    survey.id(),
                    survey.title(),
                    survey.len(),
                    if survey.len() == 1 { "" } else { "s" }
                );
            }
        }

        Command::Take { id } => {
            let id = match id {
                Some(id) => id,
                None => pick_survey(&client).await?,
            };
            let mut session = SurveySession::new(id);
            if let Some(user_id) = auth.user_id() {
                session = session.with_user(user_id);
            }
            let record = wizard.run(&mut session, &client).await?;
            println!("Thank you! Your response was recorded ({}).", record.id);
        }

        Command::Results { id } => {
            let survey = client.get_survey(&id).await?;
            let stats = client.survey_stats(&id).await?;
            print!("{}", format_stats(survey.title(), &stats));

            let responses = client.survey_responses(&id).await?;
            if !responses.is_empty() {
                println!();
                print!("{}", format_responses(&survey, &responses));
            }
        }

        Command::Create { file } => {
            let Some(user_id) = auth.user_id() else {
                bail!("Sign in with `survey login` before creating surveys");
            };
            let input = read_survey_file(&file, user_id)?;
            let survey = client.create_survey(&input).await?;
            println!("Created survey {} ({})", survey.title(), survey.id());
        }

        Command::Update { id, file } => {
            let Some(user_id) = auth.user_id() else {
                bail!("Sign in with `survey login` before editing surveys");
            };
            let input = read_survey_file(&file, user_id)?;
            let survey = client.update_survey(&id, &input).await?;
            println!("Updated survey {} ({})", survey.title(), survey.id());
        }

        Command::Dashboard => {
            let Some(user) = auth.user() else {
                bail!("Sign in with `survey login` to see your dashboard");
            };
            let stats = client.user_stats(&user.id).await?;
            print!("{}", format_dashboard(user.display_name(), &stats));
        }

        Command::Login { user } => {
            let theme = ColorfulTheme::default();
            let username_or_email = match user {
                Some(user) => user,
                None => Input::with_theme(&theme)
                    .with_prompt("Username or email")
                    .interact_text()?,
            };
            let password = Password::with_theme(&theme)
                .with_prompt("Password")
                .interact()?;

            let response = client
                .login(&LoginRequest {
                    username_or_email,
                    password,
                })
                .await?;
            let user = auth.sign_in(response)?;
            println!("Signed in as {}.", user.display_name());
        }

        Command::Register => {
            let theme = ColorfulTheme::default();
            let username: String = Input::with_theme(&theme)
                .with_prompt("Username")
                .interact_text()?;
            let email: String = Input::with_theme(&theme)
                .with_prompt("Email")
                .validate_with(|input: &String| {
                    if is_valid_email(input.trim()) {
                        Ok(())
                    } else {
                        Err("Invalid email")
                    }
                })
                .interact_text()?;
            let name: String = Input::with_theme(&theme)
                .with_prompt("Full name (optional)")
                .allow_empty(true)
                .interact_text()?;
            let password = Password::with_theme(&theme)
                .with_prompt("Password")
                .with_confirmation("Repeat password", "Passwords do not match")
                .interact()?;

            let response = client
                .register(&RegisterRequest {
                    username,
                    email: email.trim().to_string(),
                    password,
                    name: Some(name.trim().to_string()).filter(|n| !n.is_empty()),
                })
                .await?;
            let user = auth.sign_in(response)?;
            println!("Welcome, {}!", user.display_name());
        }

        Command::Logout => {
            let was_signed_in = auth.is_authenticated();
            auth.logout()?;
            if was_signed_in {
                println!("Signed out.");
            } else {
                println!("Not signed in.");
            }
        }

        Command::Whoami => match auth.user() {
            Some(user) => {
                println!("{} ({})", user.display_name(), user.username);
                if let Some(email) = &user.email {
                    println!("{email}");
                }
            }
            None => println!("Not signed in."),
        },
    }
    Ok(())
}

fn read_survey_file(file: &Path, user_id: &str) -> Result<NewSurvey> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read '{}'", file.display()))?;
    let mut input: NewSurvey = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse '{}'", file.display()))?;
    input.user_id = Some(user_id.to_string());
    Ok(input.normalized()?)
}

async fn pick_survey(client: &ApiClient) -> Result<String> {
    let surveys: Vec<_> = client
        .list_surveys()
        .await?
        .into_iter()
        .filter(|s| s.is_published())
        .collect();
    if surveys.is_empty() {
        bail!("No surveys published yet");
    }
    let titles: Vec<&str> = surveys.iter().map(|s| s.title()).collect();

    let choice = FuzzySelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Which survey?")
        .items(&titles)
        .default(0)
        .interact_opt()?;
    match choice.and_then(|i| surveys.get(i)) {
        Some(survey) => Ok(survey.id().to_string()),
        None => Err(WizardError::Cancelled.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(Cli::try_parse_from(["survey", "--timeout", "0", "list"]).is_err());

        let cli = Cli::try_parse_from(["survey", "--timeout", "5", "list"]).unwrap();
        assert_eq!(cli.timeout, Some(5));
    }

    #[test]
    fn parses_dashboard_and_update() {
        let cli = Cli::try_parse_from(["survey", "dashboard"]).unwrap();
        assert!(matches!(cli.command, Command::Dashboard));

        let cli = Cli::try_parse_from(["survey", "update", "s1", "lunch.json"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Update { ref id, ref file } if id == "s1" && file == Path::new("lunch.json")
        ));
    }
}
