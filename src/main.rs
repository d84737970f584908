use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use jd_capture::config::{self, Settings};
use jd_capture::fetch;
use jd_capture::{
    capture, prepare, AdmissionPolicy, CaptureRequest, Extractor, HtmlPage, LocalPage, Mode,
    TailorClient,
};

/// Capture a job description from a web page and send it to the tailoring backend
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Config file to use instead of the platform and CWD config files
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct PageSource {
    /// Fetch the page from this URL
    #[arg(long, conflicts_with = "html")]
    url: Option<String>,

    /// Read the page from a saved HTML file (stdin when neither is given)
    #[arg(long)]
    html: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract text in one mode and submit it
    Capture {
        /// Extraction mode
        #[arg(short, long, value_enum, default_value_t = Mode::Smart)]
        mode: Mode,

        /// Company name (defaults to config, then "Company")
        #[arg(long)]
        company: Option<String>,

        /// Role title (defaults to config, then "Role")
        #[arg(long)]
        role: Option<String>,

        #[command(flatten)]
        source: PageSource,

        /// File holding the text the user highlighted, for selected mode
        #[arg(long)]
        selection: Option<PathBuf>,

        /// Backend base URL, overrides config and JD_CAPTURE_BACKEND_URL
        #[arg(long)]
        backend: Option<String>,

        /// Print the admitted text instead of submitting it
        #[arg(long)]
        dry_run: bool,
    },

    /// List the dense-text candidates smart mode would rank
    Candidates {
        #[command(flatten)]
        source: PageSource,
    },

    /// Print the platform config file path
    ConfigPath,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Command::ConfigPath => {
            match config::config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("no platform config directory"),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Candidates { source } => {
            let settings = load_settings(cli.config.as_deref())?;
            let html = load_html(&source, &settings.user_agent).await?;
            print_candidates(&html, &settings.extractor()?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Capture {
            mode,
            company,
            role,
            source,
            selection,
            backend,
            dry_run,
        } => {
            let mut settings = load_settings(cli.config.as_deref())?;
            if let Some(url) = backend {
                settings.base_url = url;
            }

            let html = load_html(&source, &settings.user_agent).await?;
            let selection = match selection {
                Some(path) => Some(
                    std::fs::read_to_string(&path)
                        .with_context(|| format!("failed to read selection {}", path.display()))?,
                ),
                None => None,
            };

            let page = LocalPage::new(html)
                .with_selection(selection)
                .with_extractor(Arc::new(settings.extractor()?));
            let policy = AdmissionPolicy::default();

            if dry_run {
                let text = prepare(&page, &policy, mode).await?;
                println!("{}", text);
                return Ok(ExitCode::SUCCESS);
            }

            let client = TailorClient::with_timeout(&settings.base_url, settings.request_timeout)?;
            let request = CaptureRequest::new(mode)
                .with_company(company.or(settings.default_company).unwrap_or_default())
                .with_role(role.or(settings.default_role).unwrap_or_default());

            let sink = |message: &str| eprintln!("{}", message);
            match capture(&page, &client, &policy, &request, &sink).await {
                Ok(result) => {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                    Ok(ExitCode::SUCCESS)
                }
                // Already reported through the sink
                Err(_) => Ok(ExitCode::FAILURE),
            }
        }
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jd_capture=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// CLI flags > env vars > config files > defaults
fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let file = match path {
        Some(path) => config::load_from_path(path)?
            .with_context(|| format!("config file {} not found", path.display()))?,
        None => config::load_config()?,
    };
    Ok(file.resolve().apply_env())
}

async fn load_html(source: &PageSource, user_agent: &str) -> anyhow::Result<String> {
    if let Some(url) = &source.url {
        return Ok(fetch::fetch_page(url, user_agent).await?);
    }
    if let Some(path) = &source.html {
        return fetch::read_html_file(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    Ok(fetch::read_html_stdin()?)
}

fn print_candidates(html: &str, extractor: &Extractor) {
    let page = HtmlPage::parse(html);
    let candidates = extractor.collect_candidates(&page);

    if candidates.is_empty() {
        println!("no candidates; smart mode falls back to whole page text");
        return;
    }

    let entries = extractor.catalog().entries();
    for candidate in &candidates {
        let pattern = entries
            .get(candidate.catalog_position - 1)
            .map(|e| e.pattern())
            .unwrap_or("?");
        let preview: String = candidate
            .text
            .chars()
            .take(80)
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();
        println!(
            "#{:<2} {:<32} {:>7} chars  {}",
            candidate.catalog_position, pattern, candidate.text_len, preview
        );
    }
}
