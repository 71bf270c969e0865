use anyhow::{Context as _, Result};
use badger_stats::config::QuizConfig;
use badger_stats::data::HttpFetcher;
use badger_stats::enrich::{quiz_frames, refresh_frames};
use badger_stats::quiz::{ChartSink, CsvExport, PlotWindow, Session};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "badger-stats", about = "Battersea Badgers stats quiz")]
pub struct Cli {
    #[command(flatten)]
    pub options: GlobalOptions,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args)]
pub struct GlobalOptions {
    /// JSON config file; missing fields use the built-in defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding data.json and the enriched caches
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Don't open a chart window for the hazard question
    #[arg(long, global = true)]
    pub no_window: bool,

    /// Also write the hazard curves to this CSV file
    #[arg(long, global = true)]
    pub hazard_csv: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Answer questions interactively (the default)
    Quiz,
    /// Answer a single question and exit
    Ask {
        /// Question number, 1 to 10
        question: i64,
    },
    /// Download the data again and replace the caches
    Refresh,
    /// Print the effective configuration
    Config {
        /// Write it to this path instead of printing it
        #[arg(long)]
        write: Option<PathBuf>,
    },
}

impl GlobalOptions {
    fn load_config(&self) -> Result<QuizConfig> {
        let mut config = QuizConfig::load_or_default(self.config.as_deref())
            .context("Couldn't load config")?;
        if let Some(dir) = &self.cache_dir {
            config.source.cache_dir.clone_from(dir);
        }
        Ok(config)
    }

    fn chart_sinks(&self) -> Vec<Box<dyn ChartSink>> {
        let mut sinks: Vec<Box<dyn ChartSink>> = Vec::new();
        if let Some(path) = &self.hazard_csv {
            sinks.push(Box::new(CsvExport { path: path.clone() }));
        }
        if !self.no_window {
            sinks.push(Box::new(PlotWindow));
        }
        sinks
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let config = cli.options.load_config()?;
    match cli.command.unwrap_or(Commands::Quiz) {
        Commands::Quiz => handle_quiz(&cli.options, config, None),
        Commands::Ask { question } => handle_quiz(&cli.options, config, Some(question)),
        Commands::Refresh => handle_refresh(&config),
        Commands::Config { write } => handle_config(&config, write),
    }
}

fn handle_quiz(options: &GlobalOptions, config: QuizConfig, question: Option<i64>) -> Result<()> {
    let fetcher = HttpFetcher::new()?;
    let frames = quiz_frames(&config, &fetcher).context("Couldn't load dataframes")?;
    let mut session = Session::new(frames, config.report, options.chart_sinks());

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut out = std::io::stdout().lock();
    match question {
        Some(n) => session.ask(n, &mut input, &mut out)?,
        None => session.run(&mut input, &mut out)?,
    }
    Ok(())
}

fn handle_refresh(config: &QuizConfig) -> Result<()> {
    let fetcher = HttpFetcher::new()?;
    let frames = refresh_frames(config, &fetcher)
        .context("Refresh failed; the existing caches were left in place")?;
    for path in config.source.cache_paths() {
        println!("Updated {}", path.display());
    }
    println!(
        "Cached {} batting and {} bowling performances.",
        frames.batting.height(),
        frames.bowling.height()
    );
    Ok(())
}

fn handle_config(config: &QuizConfig, write: Option<PathBuf>) -> Result<()> {
    match write {
        Some(path) => {
            config.save(&path)?;
            println!("Wrote config to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(config)?),
    }
    Ok(())
}
