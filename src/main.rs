use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use http::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::Url;
use secrecy::Secret;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Notify;
use tracing::info;

use ticket_bridge::adapters::{
    FileKeyValueStore, InMemoryCookieJar, NetscapeCookieJar, ReqwestApiInvoker, StdoutPresenter,
};
use ticket_bridge::application::{ExtensionRuntime, RuntimeParts, Settings};
use ticket_bridge::config::{AppConfig, LoggingConfig};
use ticket_bridge::ports::{CookieJar, OverlayPresenter, OverlayView, PipelineEvent};

#[derive(Parser, Debug)]
#[command(version, about = "Fetch supplementary ticket details for help-desk ticket pages")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Pretty-print rendered views.
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a ticket page and render its details once the page settles.
    Fetch { url: String },
    /// Follow page addresses read from stdin, one per line.
    Watch,
    /// Run the pipeline now for the ticket in the given address.
    Invoke { url: String },
    /// Show the ticket the control panel sees for an address.
    Status { url: String },
    /// Feed a request's cookie header to the credential observer.
    Capture(CaptureArgs),
    /// Show which tier currently provides the credential.
    Credential,
    /// Probe the configured endpoint.
    TestEndpoint,
    /// Show or change saved settings.
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Args, Debug)]
struct CaptureArgs {
    /// URL of the observed request.
    #[arg(long)]
    url: String,
    /// Cookie header value.
    #[arg(long, env = "TICKET_BRIDGE_COOKIE", hide_env_values = true)]
    cookie: String,
}

#[derive(Subcommand, Debug)]
enum SettingsCommand {
    Show,
    Set {
        #[arg(long)]
        endpoint: String,
        #[arg(long)]
        api_key: Option<String>,
    },
}

/// Stdout presenter that also signals each completed render.
struct NotifyingPresenter {
    inner: StdoutPresenter,
    rendered: Arc<Notify>,
}

impl OverlayPresenter for NotifyingPresenter {
    fn lifecycle(&self, event: PipelineEvent) {
        self.inner.lifecycle(event);
    }

    fn render(&self, view: OverlayView) {
        self.inner.render(view);
        self.rendered.notify_one();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.logging);

    let rendered = Arc::new(Notify::new());
    let runtime = start_runtime(&config, cli.pretty, Arc::clone(&rendered))?;

    let outcome = dispatch(cli.command, &runtime, &config, &rendered).await;
    runtime.shutdown().await;
    outcome
}

fn init_tracing(logging: &LoggingConfig) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(logging.env_filter())
        .with_writer(std::io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn start_runtime(
    config: &AppConfig,
    pretty: bool,
    rendered: Arc<Notify>,
) -> Result<ExtensionRuntime> {
    let cookie_jar: Arc<dyn CookieJar> = match &config.storage.cookie_jar_path {
        Some(path) => Arc::new(NetscapeCookieJar::new(path)),
        None => Arc::new(InMemoryCookieJar::new()),
    };
    let invoker = ReqwestApiInvoker::new(config.api.invoker_config())
        .context("failed to build HTTP client")?;

    let parts = RuntimeParts {
        local_storage: Arc::new(FileKeyValueStore::new(config.storage.local_area_path())),
        sync_storage: Arc::new(FileKeyValueStore::new(config.storage.sync_area_path())),
        cookie_jar,
        invoker: Arc::new(invoker),
        presenter: Arc::new(NotifyingPresenter {
            inner: StdoutPresenter::new(pretty),
            rendered,
        }),
    };
    Ok(ExtensionRuntime::start(config, parts)?)
}

async fn dispatch(
    command: Command,
    runtime: &ExtensionRuntime,
    config: &AppConfig,
    rendered: &Notify,
) -> Result<()> {
    match command {
        Command::Fetch { url } => {
            let Some(timer) = runtime.page_agent().page_loaded(&url).await else {
                bail!("{} is not a ticket page", url);
            };
            timer.await?;
        }
        Command::Watch => {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            let mut timers = Vec::new();
            let mut loaded = false;
            while let Some(line) = lines.next_line().await? {
                let address = line.trim();
                if address.is_empty() {
                    continue;
                }
                let timer = if loaded {
                    runtime.page_agent().address_changed(address).await
                } else {
                    loaded = true;
                    runtime.page_agent().page_loaded(address).await
                };
                timers.extend(timer);
            }
            for timer in timers {
                timer.await?;
            }
        }
        Command::Invoke { url } => {
            let ticket_id = runtime.control_panel().invoke(&url).await?;
            info!(ticket_id = %ticket_id, "Waiting for result");
            let wait = config.api.timeout() + Duration::from_secs(5);
            tokio::time::timeout(wait, rendered.notified())
                .await
                .context("timed out waiting for the ticket result")?;
        }
        Command::Status { url } => match runtime.control_panel().current_ticket(&url) {
            Some(ticket_id) => println!("Ticket ID: {}", ticket_id),
            None => println!("Not on a ticket page"),
        },
        Command::Capture(args) => {
            let url = Url::parse(&args.url).context("invalid request URL")?;
            if !runtime.observer().is_observed(&url) {
                bail!("{} is outside the observed origins", url);
            }
            let mut headers = HeaderMap::new();
            headers.insert(
                COOKIE,
                HeaderValue::from_str(&args.cookie).context("invalid cookie header")?,
            );
            runtime.observer().inspect(&url, headers);
        }
        Command::Credential => {
            let resolved = runtime.store().resolve().await?;
            println!(
                "tier={} strength={:?} length={}",
                resolved.tier(),
                resolved.strength,
                resolved.credential.len()
            );
        }
        Command::TestEndpoint => {
            let status = runtime.control_panel().test_connection().await;
            println!("{}", status);
            if !status.is_ok() {
                bail!("endpoint check failed");
            }
        }
        Command::Settings(SettingsCommand::Show) => {
            let settings = runtime.control_panel().load_settings().await?;
            println!("apiEndpoint: {}", settings.api_endpoint);
            println!(
                "apiKey: {}",
                if settings.api_key.is_some() { "(set)" } else { "(not set)" }
            );
        }
        Command::Settings(SettingsCommand::Set { endpoint, api_key }) => {
            Url::parse(&endpoint).context("invalid endpoint URL")?;
            let settings = Settings {
                api_endpoint: endpoint,
                api_key: api_key.map(Secret::new),
            };
            runtime.control_panel().save_settings(&settings).await?;
            println!("Settings saved successfully!");
        }
    }
    Ok(())
}
