mod common;
mod logic;
mod storage;
mod watch;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use colorchain_game::{GameConfig, GameEngine, MemoryProfiles, ProfileStore, validate_player_name};
use std::fs::{self, File};
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use common::scenario::{get_scenario, list_scenarios, scenario_names};
use common::{reports, split_csv};
use logic::{GameplayStrategy, LogicTester, ScenarioResult, resolve_seed_inputs};
use storage::JsonFileProfiles;
use watch::{WatchOptions, run_watch};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TestMode {
    /// Headless scripted simulations (fast)
    Logic,
    /// Play one session at real speed in the terminal
    Watch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WatchStrategy {
    Perfect,
    Literal,
    Forgetful,
    Replayer,
}

impl From<WatchStrategy> for GameplayStrategy {
    fn from(value: WatchStrategy) -> Self {
        match value {
            WatchStrategy::Perfect => Self::Perfect,
            WatchStrategy::Literal => Self::Literal,
            WatchStrategy::Forgetful => Self::Forgetful,
            WatchStrategy::Replayer => Self::Replayer,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "colorchain-tester", version = "0.1.0")]
#[command(about = "Headless simulation and QA for Color Memory Chain")]
struct Args {
    /// Test mode: logic (scripted sweeps) or watch (real-time playthrough)
    #[arg(long, value_enum, default_value_t = TestMode::Logic)]
    mode: TestMode,

    /// Scenarios to run (comma-separated, or "all")
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated integers, 0x hex, ranges like 1..5, or "now")
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per scenario and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console", "csv"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Persist player profiles in this JSON file instead of memory
    #[arg(long)]
    profiles: Option<PathBuf>,

    /// Game configuration JSON (max level, twist threshold, timings)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Player name for watch mode; omitted plays as a guest
    #[arg(long)]
    player: Option<String>,

    /// Levels to play in watch mode
    #[arg(long, default_value_t = 5)]
    watch_levels: u32,

    /// Scripted player used in watch mode
    #[arg(long, value_enum, default_value_t = WatchStrategy::Perfect)]
    strategy: WatchStrategy,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    let config = load_config(&args)?;
    let passed = match args.profiles.clone() {
        Some(path) => run(&args, GameEngine::new(JsonFileProfiles::new(path)), config).await?,
        None => run(&args, GameEngine::new(MemoryProfiles::new()), config).await?,
    };

    if !passed {
        std::process::exit(1);
    }

    Ok(())
}

async fn run<S: ProfileStore + Clone>(
    args: &Args,
    engine: GameEngine<S>,
    config: GameConfig,
) -> Result<bool> {
    let engine = engine.with_config(config)?;
    match args.mode {
        TestMode::Logic => run_logic(args, engine),
        TestMode::Watch => {
            let seed = resolve_seed_inputs(&split_csv(&args.seeds))?
                .first()
                .copied()
                .unwrap_or(1337);
            let player = args
                .player
                .as_deref()
                .map(validate_player_name)
                .transpose()?;
            let options = WatchOptions {
                seed,
                levels: args.watch_levels,
                strategy: args.strategy.into(),
                player,
            };
            announce_banner();
            let mut out = stdout();
            run_watch(&engine, &options, &mut out).await?;
            Ok(true)
        }
    }
}

fn run_logic<S: ProfileStore + Clone>(args: &Args, engine: GameEngine<S>) -> Result<bool> {
    announce_banner();
    let start_time = Instant::now();
    let scenarios = expand_scenarios(&args.scenarios);
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;
    let tester = LogicTester::new(engine, args.verbose);

    println!("{}", "🧠 Running Simulations".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let mut results: Vec<ScenarioResult> = Vec::new();
    for scenario_name in &scenarios {
        if let Some(scenario) = get_scenario(scenario_name) {
            results.extend(tester.run_scenario(&scenario, &seeds, args.iterations));
        } else {
            eprintln!("⚠️  Unknown scenario: {}", scenario_name.yellow());
        }
    }

    write_reports(args, &results, start_time)?;
    Ok(results.iter().all(|r| r.passed))
}

fn load_config(args: &Args) -> Result<GameConfig> {
    let Some(path) = args.config.as_ref() else {
        return Ok(GameConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = GameConfig::from_json(&raw)
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:22} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🎨 Color Memory Chain Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = split_csv(scenarios_arg);
    if scenarios.iter().any(|s| s.eq_ignore_ascii_case("all")) {
        scenarios.retain(|s| !s.eq_ignore_ascii_case("all"));
        scenarios.extend(scenario_names());
    }
    scenarios
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => reports::generate_json_report(&mut output_target, results)?,
        "markdown" => reports::generate_markdown_report(&mut output_target, results)?,
        "csv" => reports::generate_csv_report(&mut output_target, results)?,
        "console" => {
            if results.is_empty() {
                writeln!(&mut output_target, "No scenarios executed.")?;
            } else {
                reports::generate_console_report(
                    &mut output_target,
                    results,
                    start_time.elapsed(),
                )?;
            }
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
        other => bail!("unsupported report format: {other}"),
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
