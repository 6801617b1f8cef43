//! faqbot: console driver for the FAQ assistant. Config-driven via CoreConfig.

mod console;

use clap::{Parser, Subcommand};
use console::{inspect_report, run_chat, welcome_banner, ConsoleTransferNotifier};
use faqbot_core::{CoreConfig, CsvRecordSource, KnowledgeIndex, ResponseRouter};
use faqbot_skills::build_capabilities;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Parser)]
#[command(name = "faqbot", version, about = "FAQ assistant: knowledge-base answers with human hand-off")]
struct Cli {
    /// Config file (overrides FAQBOT_CONFIG).
    #[arg(long, global = true)]
    config: Option<String>,

    /// FAQ CSV file (overrides `knowledge_path`).
    #[arg(long, global = true)]
    knowledge: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive chat session (default).
    Chat,
    /// Answer one question and print the response as JSON.
    Ask { question: String },
    /// Summarize the loaded knowledge base.
    Inspect,
    /// Pre-flight check: config, knowledge base and capability mode.
    Verify,
}

impl Cli {
    fn load_config(&self) -> Result<CoreConfig, BoxError> {
        let mut config = match &self.config {
            Some(path) => CoreConfig::load_from(path)?,
            None => CoreConfig::load()?,
        };
        if let Some(path) = &self.knowledge {
            config.knowledge_path = path.clone();
        }
        Ok(config)
    }
}

fn load_index(config: &CoreConfig) -> Result<Arc<KnowledgeIndex>, BoxError> {
    let source = CsvRecordSource::new(&config.knowledge_path);
    Ok(Arc::new(KnowledgeIndex::from_source(&source)?))
}

fn build_router(config: &CoreConfig, index: Arc<KnowledgeIndex>) -> ResponseRouter {
    build_capabilities(config).install(ResponseRouter::new(index).with_threshold(config.search_threshold))
}

async fn chat(config: &CoreConfig) -> Result<(), BoxError> {
    let index = load_index(config)?;
    let router = build_router(config, index).with_notifier(Arc::new(ConsoleTransferNotifier));
    if router.is_fallback_mode() {
        tracing::warn!(target: "faqbot::cli", "Running without LLM augmentation");
    }

    let exit_keyword = config
        .exit_keywords
        .first()
        .map(String::as_str)
        .unwrap_or("salir");
    println!("{}", welcome_banner(&config.app_name, exit_keyword));

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    run_chat(&router, config, stdin, &mut stdout).await?;
    Ok(())
}

async fn ask(config: &CoreConfig, question: &str) -> Result<(), BoxError> {
    let router = build_router(config, load_index(config)?);
    let response = router.answer(question).await;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn inspect(config: &CoreConfig) -> Result<(), BoxError> {
    let index = load_index(config)?;
    print!("{}", inspect_report(&index));
    Ok(())
}

fn verify(cli: &Cli) -> Result<(), String> {
    print!("Checking configuration... ");
    let config = cli
        .load_config()
        .map_err(|e| format!("Config load failed: {}", e))?;
    println!("OK ({})", config.app_name);

    print!("Checking knowledge base {}... ", config.knowledge_path);
    let index = load_index(&config).map_err(|e| format!("Knowledge base unavailable: {}", e))?;
    if index.is_empty() {
        return Err(format!("Knowledge base {} has no entries", config.knowledge_path));
    }
    println!("OK ({} entries, {} categories)", index.len(), index.categories().len());

    let caps = build_capabilities(&config);
    println!("Capability mode: {}", caps.mode_label());

    println!("\n✅ SUCCESS: Ready to answer questions.");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Optional; system environment otherwise.
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if matches!(cli.command, Some(Command::Verify)) {
        return match verify(&cli) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("\n❌ PRE-FLIGHT FAILED: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let result = match cli.load_config() {
        Ok(config) => match &cli.command {
            None | Some(Command::Chat) => chat(&config).await,
            Some(Command::Ask { question }) => ask(&config, question).await,
            Some(Command::Inspect) => inspect(&config),
            Some(Command::Verify) => Ok(()),
        },
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
