use anyhow::Context;
use clap::{Parser, Subcommand};
use itertools::Itertools;
use rand::{rngs::StdRng, RngCore, SeedableRng};
use std::{path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use typetest::{
    progress::compute_progress,
    server::{self, AppState},
    word_generator::{TextGenerator, TextRequest},
    Config, ConfigStore, Difficulty, FileConfigStore, Language, StatsDb,
};

/// typing test backend: practice text, result history and progress tracking
#[derive(Parser, Debug, Clone)]
#[clap(version, about)]
pub struct Cli {
    /// config file to use instead of the platform default
    #[clap(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// run the HTTP server
    Serve {
        /// address to bind to
        #[clap(long)]
        host: Option<String>,

        /// port to listen on
        #[clap(short = 'p', long)]
        port: Option<u16>,

        /// SQLite database file
        #[clap(long)]
        db: Option<PathBuf>,
    },

    /// print a practice text
    Text {
        /// language to pull words from (ru, en)
        #[clap(short = 'l', long, default_value = "en")]
        language: String,

        /// difficulty tier (easy, medium, hard, test)
        #[clap(short = 'd', long, default_value = "easy")]
        difficulty: String,

        /// number of words instead of the tier default
        #[clap(short = 'w', long)]
        words: Option<usize>,

        /// seed for reproducible output
        #[clap(short = 's', long)]
        seed: Option<u64>,

        /// word list to use instead of the configured one
        #[clap(long)]
        corpus: Option<PathBuf>,
    },

    /// print progress metrics for a user
    Progress {
        user_id: String,

        /// SQLite database file
        #[clap(long)]
        db: Option<PathBuf>,
    },
}

impl Cli {
    fn load_config(&self) -> Config {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path).load(),
            None => FileConfigStore::new().load(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "typetest=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = cli.load_config();

    match cli.command {
        Command::Serve { host, port, db } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if db.is_some() {
                config.database_path = db;
            }
            run_server(config)
        }
        Command::Text {
            language,
            difficulty,
            words,
            seed,
            corpus,
        } => {
            let request = TextRequest::from_keys(&language, &difficulty)?;
            if let Some(corpus) = corpus {
                config.corpora.insert(request.language, corpus);
            }
            let request = match words {
                Some(n) => request.with_word_count(n),
                None => request,
            };
            let mut rng: Box<dyn RngCore> = match seed {
                Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
                None => Box::new(StdRng::from_entropy()),
            };
            let text = TextGenerator::new(&config).generate_text(&request, rng.as_mut())?;
            println!("{text}");
            Ok(())
        }
        Command::Progress { user_id, db } => {
            if db.is_some() {
                config.database_path = db;
            }
            print_progress(&config, &user_id)
        }
    }
}

fn run_server(config: Config) -> anyhow::Result<()> {
    config.validate()?;
    tracing::info!(
        "Starting typetest server, languages: {}, difficulties: {}",
        Language::ALL.iter().join(", "),
        Difficulty::ALL.iter().join(", ")
    );

    let db_path = config.database_path();
    let state = AppState::open(config)
        .with_context(|| format!("failed to open database {}", db_path.display()))?;
    tracing::info!("Database ready at {}", db_path.display());

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::serve(Arc::new(state)))
}

fn print_progress(config: &Config, user_id: &str) -> anyhow::Result<()> {
    let db_path = config.database_path();
    let db = StatsDb::open(&db_path)
        .with_context(|| format!("failed to open database {}", db_path.display()))?;
    let history = db.results_for_user(user_id)?;
    if history.is_empty() {
        anyhow::bail!("no test results for user '{user_id}'");
    }

    let metrics = compute_progress(&history);
    println!("tests:    {}", history.len());
    println!(
        "cpm:      {}",
        history.iter().map(|r| format!("{:.0}", r.chars_per_minute)).join(" -> ")
    );
    println!("speed:    {:+.1}", metrics.speed_progress);
    println!("accuracy: {:+.1}", metrics.accuracy_progress);
    println!("time:     {:+.1}", metrics.time_progress);
    Ok(())
}
