use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use oan_seeker::config::EndpointConfig;
use oan_seeker::modules::chat::controller::BotQuery;
use oan_seeker::modules::chat::model::{ChatSession, ChatView, Message, MessageList, Sender};
use oan_seeker::modules::location::model::{find_district, find_state};
use oan_seeker::modules::weather::forecast::{daily_forecasts, ForecastWindow};
use oan_seeker::modules::weather::model::WeatherIcon;
use oan_seeker::AppState;

#[derive(Parser, Debug)]
#[command(name = "oan-seeker")]
#[command(about = "Farm advisory assistant: ask questions, check weather, browse schemes", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask the assistant a question and stream the answer
    Ask {
        /// Question text (optional when --audio is given)
        question: Option<String>,

        /// Language code for both the question and the answer
        #[arg(short, long, default_value = "en")]
        lang: String,

        /// Audio file to transcribe and ask instead of typed text
        #[arg(short, long)]
        audio: Option<PathBuf>,
    },
    /// Show the upcoming forecast for a district
    Weather {
        district: String,

        /// Number of days to show (3 or 5)
        #[arg(short, long, default_value_t = 3)]
        days: usize,

        /// Check the district against this state's district list first
        #[arg(short, long)]
        state: Option<String>,
    },
    /// List states, or the districts of one state
    Locations {
        state: Option<String>,

        #[arg(short, long, default_value = "en")]
        lang: String,
    },
    /// List government schemes
    Schemes,
}

/// Prints bot text as it streams in.
struct TerminalView {
    session: ChatSession,
    printed: String,
}

impl ChatView for TerminalView {
    fn messages_mut(&mut self) -> &mut MessageList {
        &mut self.session.messages
    }

    fn set_loading(&mut self, loading: bool) {
        self.session.loading = loading;
    }

    fn refresh(&mut self) {
        let Some(last) = self.session.messages.last() else {
            return;
        };
        if last.sender != Sender::Bot || last.is_typing_placeholder() {
            return;
        }

        // normalisation can rewrite earlier text; those updates wait for the final print
        if let Some(delta) = last.text.strip_prefix(self.printed.as_str()) {
            print!("{}", delta);
            if let Err(err) = std::io::stdout().flush() {
                tracing::warn!(error = %err, "Failed to flush streamed reply");
            }
            self.printed = last.text.clone();
        }
    }
}

async fn ask(state: &AppState, question: Option<String>, lang: String, audio: Option<PathBuf>) -> Result<()> {
    let query = match (audio, question) {
        (Some(path), _) => {
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("Failed to read audio file {}", path.display()))?;
            BotQuery::voice(STANDARD.encode(bytes), lang)
        }
        (None, Some(text)) => BotQuery::text(text, lang),
        (None, None) => return Err(anyhow!("Provide a question or --audio")),
    };

    let mut view = TerminalView {
        session: ChatSession::new(),
        printed: String::new(),
    };
    if !query.text.is_empty() {
        view.session.messages.push(Message::user(query.text.clone()));
    }

    let result = state.orchestrator.send_query(&query, &mut view).await;

    let shown = view
        .session
        .messages
        .last()
        .map(|m| m.text.clone())
        .unwrap_or_default();
    if view.printed == shown {
        println!();
    } else {
        println!("\n{}", shown);
    }

    result.map(|_| ()).map_err(Into::into)
}

/// Resolves `district` to its canonical name within `state_name`.
async fn checked_district(app: &AppState, state_name: &str, district: &str) -> Result<String> {
    let locations = app
        .locations
        .as_ref()
        .context("STATES_API_URL and DISTRICTS_API_URL must be configured to use --state")?;

    let states = locations.states("en", "").await?;
    let Some(state) = find_state(&states, state_name) else {
        bail!("Unknown state {}", state_name);
    };

    let districts = locations.districts(&state.state_id, "en", "").await?;
    match find_district(&districts, district) {
        Some(found) => Ok(found.district_name.clone()),
        None => {
            let known: Vec<&str> = districts.iter().map(|d| d.district_name.as_str()).collect();
            bail!(
                "Unknown district {} in {}; known districts: {}",
                district,
                state.state_name,
                known.join(", ")
            )
        }
    }
}

async fn locations(app: &AppState, state_name: Option<String>, lang: &str) -> Result<()> {
    let client = app
        .locations
        .as_ref()
        .context("STATES_API_URL and DISTRICTS_API_URL are not configured")?;

    let states = client.states(lang, "").await?;
    let Some(state_name) = state_name else {
        for state in &states {
            println!("{}", state.state_name);
        }
        return Ok(());
    };

    let state = find_state(&states, &state_name)
        .with_context(|| format!("Unknown state {}", state_name))?;
    for district in client.districts(&state.state_id, lang, "").await? {
        println!("{}", district.district_name);
    }

    Ok(())
}

async fn weather(state: &AppState, district: &str, days: usize, in_state: Option<String>) -> Result<()> {
    let window = ForecastWindow::from_days(days).context("--days must be 3 or 5")?;
    let client = state
        .weather
        .as_ref()
        .context("WEATHER_API_URL is not configured")?;

    let district = match in_state {
        Some(name) => checked_district(state, &name, district).await?,
        None => district.to_string(),
    };
    let district = district.as_str();

    let items = client.fetch(district).await?;
    let Some(current) = items.first() else {
        println!("No weather data for {}", district);
        return Ok(());
    };

    if !current.is_forecast_entry() {
        let desc = current.short_desc().unwrap_or("Clear");
        match current.temperature() {
            Some(t) => println!("{}: {:.0}°C, {}", current.name(), t, desc),
            None => println!("{}: {}", current.name(), desc),
        }
    }

    for day in daily_forecasts(&items, window) {
        let desc = day.forecast.short_desc().unwrap_or("Clear");
        let temperature = day.forecast.temperature();
        let icon = WeatherIcon::classify(desc, temperature);
        let reading = temperature
            .map(|t| format!("{:.0}°C", t))
            .unwrap_or_else(|| desc.to_string());

        println!("  [{:<5}] {:>6}  {}", icon.as_str(), reading, day.day_label());
    }

    Ok(())
}

async fn schemes(state: &AppState) -> Result<()> {
    let client = state
        .schemes
        .as_ref()
        .context("SEARCH_API_URL is not configured")?;

    for scheme in client.fetch().await? {
        println!("{} ({})", scheme.title, scheme.provider_name);
        if !scheme.short_desc.is_empty() {
            println!("    {}", scheme.short_desc);
        }
        if !scheme.categories.is_empty() {
            println!("    categories: {}", scheme.categories.join(", "));
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("oan_seeker=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let state = AppState::new(EndpointConfig::from_env()?);

    match args.command {
        Command::Ask {
            question,
            lang,
            audio,
        } => ask(&state, question, lang, audio).await,
        Command::Weather {
            district,
            days,
            state: in_state,
        } => weather(&state, &district, days, in_state).await,
        Command::Locations { state: name, lang } => locations(&state, name, &lang).await,
        Command::Schemes => schemes(&state).await,
    }
}
