//! AI PM Sim - Entry Point
//!
//! Terminal client for the simulator. Sets up logging and the async
//! runtime for AI proxy calls, restores the save slot and runs an
//! interactive command loop over the game reducers.

use ai_pm_sim::content::Catalog;
use ai_pm_sim::core::error::Result;
use ai_pm_sim::game::{ActionReport, Game, UndoOutcome};
use ai_pm_sim::ledger::ReplayStep;
use ai_pm_sim::llm::{AiProxy, AiRequest, AiResult};
use ai_pm_sim::state::ContentMode;
use ai_pm_sim::storage::{FileStore, MemoryStore, SaveStore};
use ai_pm_sim::tasks::brief::{self, BriefInput};
use ai_pm_sim::ui::{probe, render_text};
use ai_pm_sim::{GameConfig, SimError};

use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ai-pm-sim", about = "AI product manager internship simulator")]
struct Cli {
    /// Directory holding scenes.json and cards.json (embedded content if absent)
    #[arg(long)]
    content: Option<PathBuf>,

    /// TOML file overriding game constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for the save slot
    #[arg(long, default_value = ".ai_pm_sim")]
    save_dir: PathBuf,

    /// Keep the save in memory only
    #[arg(long)]
    no_save: bool,

    /// Seed for chapter events and local fallbacks
    #[arg(long)]
    seed: Option<u64>,

    /// Skip the AI health check and play with local fallbacks
    #[arg(long)]
    offline: bool,

    /// Label the run as private content
    #[arg(long)]
    private: bool,
}

fn main() -> Result<()> {
    // Initialize tracing; RUST_LOG overrides the default filter
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ai_pm_sim=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::info!("AI PM Sim starting...");

    // Async runtime for AI proxy calls
    let rt = Runtime::new()?;

    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    let catalog = match &cli.content {
        Some(dir) => Catalog::load_dir(dir)?,
        None => Catalog::embedded()?,
    };

    let store: Box<dyn SaveStore> = if cli.no_save {
        Box::new(MemoryStore::new())
    } else {
        Box::new(FileStore::new(cli.save_dir.clone()))
    };

    // AI is optional; every AI action has a local fallback
    let proxy = if cli.offline {
        None
    } else {
        match AiProxy::from_env(&config.ai) {
            Ok(proxy) => Some(proxy),
            Err(e) => {
                tracing::warn!("AI proxy unavailable: {}", e);
                None
            }
        }
    };

    let mut game = Game::boot(catalog, config, store);
    if cli.private {
        game.set_content_mode(ContentMode::Private);
    }
    if let Some(proxy) = &proxy {
        let status = rt.block_on(proxy.health());
        if !status.available() {
            tracing::warn!("AI offline: {}", status.message);
        }
        game.set_ai_status(status);
    }
    println!("\n=== AI PM SIM ===");
    println!("Ship an AI pet-identification feature, one decision at a time.");
    print_help();

    // Main game loop
    loop {
        if game.flush() {
            println!("\n{}", render_text(&game));
            game.acknowledge_messages();
        }

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let (command, rest) = match input.split_once(' ') {
            Some((command, rest)) => (command, rest.trim()),
            None => (input, ""),
        };

        if command == "quit" || command == "q" {
            break;
        }

        if let Err(e) = run_command(&mut game, &rt, proxy.as_ref(), command, rest) {
            game.ui_mut().fail(e.to_string());
        }
    }

    game.save();
    println!("Progress saved. Bye.");
    Ok(())
}

fn print_help() {
    println!();
    println!("Commands:");
    println!("  c <id>            - Pick a scene option");
    println!("  e <id>            - Resolve the chapter event");
    println!("  task <s; p1; p2>  - Submit the task as a brief: summary; points...");
    println!("  skip              - Spend a skip charge on the task");
    println!("  back / u          - Undo the last step");
    println!("  go <scene>        - Jump to a scene");
    println!("  say <text>        - Talk in the scene roleplay");
    println!("  duel              - Start an interview duel");
    println!("  ask               - Next duel question");
    println!("  a <text>          - Answer the duel question");
    println!("  hint              - Spend a hint charge");
    println!("  finish            - End the duel");
    println!("  replay / next     - Replay mistakes / next replay scene");
    println!("  cards             - Toggle knowledge cards");
    println!("  summary           - Print the portfolio summary");
    println!("  probe             - Print the JSON state probe");
    println!("  restart           - Start over");
    println!("  help / quit");
    println!();
}

/// Await a proxy request outside any borrow of the game
fn call_ai(rt: &Runtime, proxy: Option<&AiProxy>, request: AiRequest) -> Option<AiResult> {
    let proxy = proxy?;
    rt.block_on(proxy.request(&request))
}

/// XP line plus the notices the single toast slot cannot hold
fn show_report(report: &ActionReport) {
    if let Some(grant) = &report.xp {
        println!("+{} xp", grant.amount);
    }
    for notice in report.notices().iter().skip(1) {
        println!(">> {}", notice);
    }
}

fn run_command(
    game: &mut Game,
    rt: &Runtime,
    proxy: Option<&AiProxy>,
    command: &str,
    rest: &str,
) -> Result<()> {
    match command {
        "help" | "h" => print_help(),
        "c" | "choose" => {
            let report = game.choose_option(rest)?;
            show_report(&report);
        }
        "e" | "event" => {
            let report = game.resolve_chapter_event(rest)?;
            show_report(&report);
        }
        "task" => {
            let scene = game
                .current_scene()
                .cloned()
                .ok_or_else(|| SimError::SceneNotFound(game.state().scene_id.clone()))?;
            let outcome = brief::submit(&scene, &BriefInput::parse(rest))?;
            let report = game.complete_task(outcome)?;
            show_report(&report);
        }
        "skip" => {
            let report = game.skip_task()?;
            show_report(&report);
        }
        "back" | "u" | "undo" => {
            if let UndoOutcome::Restored { scene_id } = game.go_back_one_step() {
                tracing::debug!("Undo restored {}", scene_id);
            }
        }
        "go" if rest.is_empty() => game.ui_mut().fail("Usage: go <scene>"),
        "go" => {
            game.go_to_scene(rest);
            game.save();
        }
        "say" => {
            if let Some(request) = game.begin_roleplay(rest)? {
                let result = call_ai(rt, proxy, request);
                game.apply_roleplay(rest, result)?;
            }
        }
        "duel" => {
            game.start_duel();
            if let Some(request) = game.begin_duel_question()? {
                let result = call_ai(rt, proxy, request);
                game.apply_duel_question(result);
            }
        }
        "ask" => {
            if let Some(request) = game.begin_duel_question()? {
                let result = call_ai(rt, proxy, request);
                game.apply_duel_question(result);
            }
        }
        "a" | "answer" => {
            if let Some(request) = game.begin_duel_answer(rest)? {
                let result = call_ai(rt, proxy, request);
                let report = game.apply_duel_answer(rest, result)?;
                show_report(&report);
            }
        }
        "hint" => {
            for hint in game.use_duel_hint()? {
                println!("  hint: {}", hint);
            }
        }
        "finish" => {
            let report = game.finish_duel()?;
            show_report(&report);
        }
        "replay" => {
            game.start_replay();
        }
        "next" => {
            let (step, report) = game.advance_replay();
            if step == ReplayStep::Finished {
                show_report(&report);
            }
        }
        "cards" => game.ui_mut().toggle_cards(),
        "summary" => println!("\n{}\n", game.portfolio_summary()),
        "probe" => println!("{}", probe(game)),
        "restart" => game.restart(),
        _ => game
            .ui_mut()
            .fail(format!("Unknown command \"{}\", try help", command)),
    }
    Ok(())
}
