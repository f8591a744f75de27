use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use homefeed::api::ApiClient;
use homefeed::app::{App, AppEvent};
use homefeed::comments::HttpCommentBackend;
use homefeed::config::Config;
use homefeed::feed::{FeedType, HttpFeedSource};
use homefeed::notifications::{forward_notifications, json_lines};
use homefeed::payment::{finalize_payment, PaymentApi, PaymentOutcome, PaymentParams};
use homefeed::session::{CurrentUser, Session};
use homefeed::ui;

/// Get the config directory path (~/.config/homefeed/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("homefeed"))
}

#[derive(Parser, Debug)]
#[command(name = "homefeed", about = "Terminal client for the influencer platform home feed")]
struct Args {
    /// Override the API base URL from config.toml
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Feed to open with: all or following
    #[arg(long, value_name = "TYPE", value_parser = parse_feed_type)]
    feed_type: Option<FeedType>,

    /// Read notifications from this file or pipe, one JSON object per line
    #[arg(long, value_name = "PATH")]
    notifications: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Store the current user for this terminal
    Login {
        user_id: String,
        #[arg(long)]
        username: Option<String>,
        /// User ids this account follows
        #[arg(long = "follow", value_name = "USER_ID")]
        follow: Vec<String>,
    },
    /// Forget the current user
    Logout,
    /// Print the current user
    Whoami,
    /// Confirm a payment from the checkout return URL or its query string
    ConfirmPayment { query: String },
}

fn parse_feed_type(s: &str) -> Result<FeedType, String> {
    FeedType::from_str_name(s).ok_or_else(|| format!("unknown feed type '{}' (all, following)", s))
}

/// Send logs to a file; the TUI owns stdout.
fn init_logging(config_dir: &std::path::Path) -> Result<()> {
    let log_path = config_dir.join("homefeed.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file '{}'", log_path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
    }

    // Session data is personal; keep the directory user-only
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) =
            std::fs::set_permissions(&config_dir, std::fs::Permissions::from_mode(0o700))
        {
            eprintln!(
                "Warning: failed to set permissions on {}: {}",
                config_dir.display(),
                e
            );
        }
    }

    init_logging(&config_dir)?;

    let mut config =
        Config::load(&config_dir.join("config.toml")).context("Failed to load config")?;
    if let Some(url) = args.api_url {
        config.api_base_url = url;
    }
    if let Some(feed_type) = args.feed_type {
        config.default_feed_type = feed_type;
    }

    let mut session = Session::hydrate(config_dir.join("session.json"));

    match args.command {
        Some(Command::Login {
            user_id,
            username,
            follow,
        }) => {
            let mut user = CurrentUser::new(user_id);
            user.username = username;
            user.follow = follow;
            session.set_user(Some(user)).context("Failed to save session")?;
            println!("Logged in as {}", session.user().map(|u| u.display_name()).unwrap_or("-"));
            return Ok(());
        }
        Some(Command::Logout) => {
            session.set_user(None).context("Failed to clear session")?;
            println!("Logged out.");
            return Ok(());
        }
        Some(Command::Whoami) => {
            match session.user() {
                Some(user) => println!(
                    "{} ({}), following {}",
                    user.display_name(),
                    user.user_id,
                    user.follow.len()
                ),
                None => println!("Not logged in."),
            }
            return Ok(());
        }
        Some(Command::ConfirmPayment { query }) => {
            let api = ApiClient::new(&config.api_base_url).context("Invalid API base URL")?;
            let params = PaymentParams::from_query(&query);
            let outcome =
                finalize_payment(&PaymentApi::new(api), &params, session.user_id()).await;
            return report_payment(&config, outcome);
        }
        None => {}
    }

    let api = ApiClient::new(&config.api_base_url).context("Invalid API base URL")?;
    let source = Arc::new(HttpFeedSource::new(api.clone()));
    let comments = Arc::new(HttpCommentBackend::new(api));
    let mut app = App::new(config, session, source).with_comment_backend(comments);

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    if let Some(path) = args.notifications {
        let file = tokio::fs::File::open(&path).await.with_context(|| {
            format!("Failed to open notification feed '{}'", path.display())
        })?;
        tracing::info!(path = %path.display(), "Reading notifications");
        forward_notifications(
            json_lines(tokio::io::BufReader::new(file)),
            event_tx.clone(),
            AppEvent::NotificationReceived,
        );
    }
    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}

fn report_payment(config: &Config, outcome: PaymentOutcome) -> Result<()> {
    match outcome {
        PaymentOutcome::MissingParams(missing) => {
            anyhow::bail!("Missing payment parameters: {}", missing.join(", "));
        }
        PaymentOutcome::Confirmed(receipt) => {
            println!("Payment complete.");
            for (label, value) in receipt.rows() {
                println!("  {:<16}{}", label, value);
            }
            match receipt.return_link(&config.web_base_url) {
                Ok(url) => println!("Back to your page: {}", url),
                Err(e) => tracing::warn!(error = %e, "Could not build return link"),
            }
            Ok(())
        }
        PaymentOutcome::Failed(receipt) => {
            anyhow::bail!(
                "Payment approval failed for order {}. Try again or contact support.",
                receipt.order_id
            );
        }
    }
}
