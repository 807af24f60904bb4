//! REST Quest CLI
//!
//! Interactive terminal front-end for the REST Quest tutorial.

mod commands;

use std::io::Write as _;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use commands::{Command, HELP};
use restquest_core::{Config, FormKind, HttpTransport, Mode, QuestError, Session, Variant};
use restquest_view::{json::JsonRenderer, TextRenderer, ViewModel};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// REST Quest - learn REST by talking to a books API
///
/// Walks through the HTTP methods level by level. Each level unlocks once
/// its request has succeeded against the companion server.
#[derive(Parser, Debug)]
#[command(name = "restquest")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (default: restquest.json in current directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Base URL of the books API
    #[arg(short, long, value_name = "URL")]
    base_url: Option<String>,

    /// Tutorial variant: basics, classic or quest
    #[arg(long, value_parser = parse_variant)]
    variant: Option<Variant>,

    /// Preselect a difficulty mode: beginner or advanced (quest only)
    #[arg(short, long, value_parser = parse_mode)]
    mode: Option<Mode>,

    /// Print each screen as a JSON line instead of text
    #[arg(long)]
    json: bool,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,
}

fn parse_variant(s: &str) -> Result<Variant, String> {
    Variant::from_str_case_insensitive(s)
        .ok_or_else(|| format!("invalid variant '{s}': expected basics, classic or quest"))
}

fn parse_mode(s: &str) -> Result<Mode, String> {
    Mode::from_str_case_insensitive(s)
        .ok_or_else(|| format!("invalid mode '{s}': expected beginner or advanced"))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (warn)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(config = ?args.config, "Config file");

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Loads configuration, builds the session and runs the prompt loop.
async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;

    // Apply CLI argument overrides
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    if let Some(variant) = args.variant {
        config.variant = variant;
    }
    if let Some(mode) = args.mode {
        config.mode = Some(mode);
    }

    // Re-validate after overrides
    config.validate()?;
    tracing::info!(base_url = %config.base_url, variant = %config.variant, "Starting REST Quest");

    let transport = HttpTransport::new(config.base_url.as_str())?
        .with_progress_header(config.track_progress_header);
    let mut session = Session::new(config.variant, transport);
    if let Some(mode) = config.mode {
        if let Err(e) = session.select_mode(mode).await {
            if e.is_fatal() {
                return Err(e.into());
            }
            report(&e);
        }
    }

    let mut shell = Shell {
        session,
        json: args.json,
    };
    shell.print_screen();
    shell.repl().await
}

/// Loads configuration from a path or the current directory.
fn load_config(config_path: Option<&str>) -> anyhow::Result<Config> {
    let config = match config_path {
        Some(path) => Config::load_from_file(Path::new(path))?,
        None => Config::load()?,
    };
    Ok(config)
}

struct Shell {
    session: Session<HttpTransport>,
    json: bool,
}

impl Shell {
    async fn repl(&mut self) -> anyhow::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            self.prompt()?;
            let Some(line) = lines.next_line().await? else {
                break;
            };

            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    report(&e);
                    continue;
                }
            };
            if command == Command::Quit {
                break;
            }
            if let Err(e) = self.execute(command).await {
                if e.is_fatal() {
                    return Err(e.into());
                }
                report(&e);
            }
        }
        Ok(())
    }

    async fn execute(&mut self, command: Command) -> restquest_core::Result<()> {
        match command {
            Command::Help => {
                println!("{HELP}");
                return Ok(());
            }
            Command::Drafts => {
                self.print_drafts();
                return Ok(());
            }
            Command::Show | Command::Quit => {}
            Command::Mode(mode) => self.session.select_mode(mode).await?,
            Command::Start => {
                self.session.start().await?;
            }
            Command::Next => {
                self.session.advance().await;
            }
            Command::Prev => {
                self.session.retreat().await;
            }
            Command::Reset => self.session.reset(),
            Command::Refresh => {
                if !self.session.refresh_books().await {
                    eprintln!("Could not refresh the book table. Make sure the server is running.");
                }
            }
            Command::Submit { form, fields } => {
                self.session.fill_draft(form, fields)?;
                self.session.submit(form).await?;
            }
        }
        self.print_screen();
        Ok(())
    }

    fn print_screen(&self) {
        let session = &self.session;
        let view = ViewModel::build(
            session.tutorial(),
            session.progress(),
            session.drafts(),
            session.display(),
            session.books(),
        );
        if self.json {
            match JsonRenderer::new(&view).render() {
                Ok(json) => println!("{json}"),
                Err(e) => eprintln!("Error: {e}"),
            }
        } else {
            println!();
            print!("{}", TextRenderer::new(&view).render());
        }
    }

    fn print_drafts(&self) {
        for form in FormKind::WITH_DRAFTS {
            let draft = self.session.drafts().get(form);
            let values: Vec<String> = form
                .fields()
                .iter()
                .map(|spec| format!("{}={:?}", spec.name, draft.value(spec.name).unwrap_or_default()))
                .collect();
            println!("{:<24} {}", form.endpoint(), values.join(" "));
        }
    }

    fn prompt(&self) -> std::io::Result<()> {
        if !self.json {
            print!("> ");
            std::io::stdout().flush()?;
        }
        Ok(())
    }
}

fn report(error: &QuestError) {
    tracing::debug!(error = ?error, "Command failed");
    eprintln!("{error}");
}
