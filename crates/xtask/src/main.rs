//! Story tooling: integrity checks, migration and scripted playthroughs.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storyloom_domain::Story;
use storyloom_engine::use_cases::{ChoiceOutcome, IntegrityReport};
use storyloom_engine::infrastructure::clock::SystemClock;
use storyloom_engine::{load_story, save_story, EngineConfig, FsStoryStore, PlaySession, StoryLibrary};

const USAGE: &str = "Usage: cargo xtask <command>

Commands:
  check-story <file>              Report dangling links, orphans and unknown references
  migrate-story <in> [out]        Upgrade a story to the current schema
  copy-story <file>               Save a timestamped, migrated copy next to a story
  play-story <file> [choice...]   Play a story choosing options by index";

fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storyloom_engine=info,xtask=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = EngineConfig::from_env();
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("check-story") => check_story(arg(&args, 1)?, &config),
        Some("migrate-story") => migrate_story(arg(&args, 1)?, args.get(2).map(Path::new)),
        Some("copy-story") => copy_story(arg(&args, 1)?),
        Some("play-story") => play_story(arg(&args, 1)?, &args[2..], config),
        Some(cmd) => anyhow::bail!("Unknown xtask command: {cmd}\n\n{USAGE}"),
        None => anyhow::bail!(USAGE),
    }
}

fn arg(args: &[String], index: usize) -> anyhow::Result<&Path> {
    args.get(index)
        .map(Path::new)
        .with_context(|| format!("missing argument\n\n{USAGE}"))
}

fn read_story(path: &Path) -> anyhow::Result<Story> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    load_story(&text).with_context(|| format!("loading {}", path.display()))
}

fn check_story(path: &Path, config: &EngineConfig) -> anyhow::Result<()> {
    let story = read_story(path)?;
    let report = IntegrityReport::build(&story, &config.start_dialogue_id);
    print!("{report}");
    if !report.is_clean() {
        anyhow::bail!("{} issue(s) in {}", report.issue_count(), path.display());
    }
    Ok(())
}

fn migrate_story(input: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let story = read_story(input)?;
    let text = save_story(&story).context("serializing story")?;
    match output {
        Some(output) => {
            std::fs::write(output, text)
                .with_context(|| format!("writing {}", output.display()))?;
            tracing::info!(from = %input.display(), to = %output.display(), "Story migrated");
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn copy_story(path: &Path) -> anyhow::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("{} has no usable file name", path.display()))?;

    let library = StoryLibrary::new(
        Arc::new(FsStoryStore::new(dir)),
        Arc::new(SystemClock::new()),
    );
    let story = library.load(name)?;
    let copy = library.save_copy(name, &story)?;
    println!("{}", dir.join(copy).display());
    Ok(())
}

fn play_story(path: &Path, choices: &[String], config: EngineConfig) -> anyhow::Result<()> {
    let mut session = PlaySession::new(read_story(path)?, config)?;
    print_position(&session);

    for choice in choices {
        let index: usize = choice
            .parse()
            .with_context(|| format!("choice {choice:?} is not an option index"))?;
        match session.choose_option(index) {
            ChoiceOutcome::Navigated { .. } => print_position(&session),
            ChoiceOutcome::MiniGamePending { pending, .. } => {
                println!("-- minigame {:?} pending; stopping", pending.mini_game_id);
                break;
            }
            ChoiceOutcome::Terminal { .. } => println!("-- option {index} leads nowhere"),
            other => anyhow::bail!("cannot choose option {index}: {other:?}"),
        }
    }

    let player = session.player();
    println!(
        "score {} | items {:?} | completed {}",
        player.score(),
        player.inventory(),
        player.completed_dialogues().len()
    );
    Ok(())
}

fn print_position(session: &PlaySession) {
    let Some(dialogue) = session.current_dialogue() else {
        println!("-- nowhere");
        return;
    };
    println!("[{}] {}", dialogue.id, dialogue.text);
    for visible in session.visible_options() {
        let marker = if visible.actionable { " " } else { "x" };
        println!("  {marker} {}: {}", visible.index, visible.option.text);
    }
}

fn load_dotenv_from_repo_root() {
    let repo_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
