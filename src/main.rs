use std::env;
use std::io::{self, BufRead, Write};

use anyhow::{anyhow, Context, Result};
use log::warn;

use visual_novel::{
    demo_novel, Gesture, Session, Step, Story, Strictness, VisualNovel, Vocabulary,
};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = CliOptions::parse()?;
    let novel = load_novel(&options)?;

    println!("Loaded story with {} scene(s)", novel.len());
    for scene in novel.scenes() {
        println!(" - {} ({} choices)", scene.id, scene.choices.len());
    }
    if options.summary_only {
        return Ok(());
    }

    let mut session = Session::new(novel);
    if !options.hints.is_empty() {
        let (vocabulary, skipped) = Vocabulary::open_all(&options.hints);
        for err in &skipped {
            eprintln!("Skipping hints: {err:#}");
        }
        println!(
            "Hints: {} word(s), {} kanji",
            vocabulary.words().len(),
            vocabulary.kanji().len()
        );
        session = session.with_annotator(vocabulary);
    }
    match &options.commands {
        Some(script) => run_scripted(&mut session, script)?,
        None => run_interactive(&mut session)?,
    }

    print_final_state(session.novel());
    Ok(())
}

fn load_novel(options: &CliOptions) -> Result<VisualNovel> {
    let Some(path) = &options.path else {
        return demo_novel();
    };
    let story = Story::open(path).with_context(|| format!("failed to open story {path}"))?;
    let strictness = if options.strict {
        Strictness::Strict
    } else {
        Strictness::Permissive
    };
    VisualNovel::from_scenes(story.scenes, strictness)
        .with_context(|| format!("story {path} failed validation"))
}

fn run_scripted(session: &mut Session, script: &str) -> Result<()> {
    print_view(session);
    for command in script.split(';').map(str::trim).filter(|c| !c.is_empty()) {
        let gesture: Gesture = command
            .parse()
            .with_context(|| format!("invalid scripted command {command:?}"))?;
        println!("> {command}");
        if apply(session, gesture) {
            break;
        }
    }
    Ok(())
}

fn run_interactive(session: &mut Session) -> Result<()> {
    println!("Commands: next, back, menu, choose N (or just N), quit");
    print_view(session);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush().context("failed to flush stdout")?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("failed to read from stdin")?;
        match line.parse::<Gesture>() {
            Ok(gesture) => {
                if apply(session, gesture) {
                    break;
                }
            }
            Err(err) => {
                warn!("rejected command {line:?}");
                eprintln!("{err}");
            }
        }
    }
    Ok(())
}

/// Applies a gesture and prints the outcome. Returns `true` when the player quit.
fn apply(session: &mut Session, gesture: Gesture) -> bool {
    match session.apply(gesture) {
        Step::Quit => return true,
        Step::Restarted => println!("(restarted)"),
        Step::Navigated(navigation) if !navigation.moved() => println!("({navigation})"),
        Step::Navigated(_) => {}
    }
    print_view(session);
    false
}

fn print_view(session: &Session) {
    print!("{}", session.view());
    for line in session.annotations() {
        println!("  * {line}");
    }
}

fn print_final_state(novel: &VisualNovel) {
    let id = novel
        .current_scene()
        .map(|scene| scene.id.as_str())
        .unwrap_or("(no scene)");
    println!("Final scene: {id} history={:?}", novel.history);
}

struct CliOptions {
    path: Option<String>,
    strict: bool,
    summary_only: bool,
    commands: Option<String>,
    hints: Vec<String>,
}

impl CliOptions {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);
        let mut options = Self {
            path: None,
            strict: false,
            summary_only: false,
            commands: None,
            hints: Vec::new(),
        };
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--strict" => options.strict = true,
                "--summary-only" => options.summary_only = true,
                "--commands" => {
                    let script = args
                        .next()
                        .ok_or_else(|| anyhow!("--commands expects a ';'-separated list"))?;
                    options.commands = Some(script);
                }
                "--hints" => {
                    let tracker = args
                        .next()
                        .ok_or_else(|| anyhow!("--hints expects a tracker JSON path"))?;
                    options.hints.push(tracker);
                }
                "-h" | "--help" => {
                    return Err(anyhow!(
                        "Usage: visual-novel [story.xml|story.json] [--strict] [--summary-only] [--commands \"next;choose 2;back\"] [--hints tracker.json]..."
                    ));
                }
                other if other.starts_with("--") => {
                    return Err(anyhow!(
                        "Unknown argument: {other}. Expected --strict, --summary-only, --commands or --hints"
                    ));
                }
                other => {
                    if options.path.replace(other.to_string()).is_some() {
                        return Err(anyhow!("only one story path may be given"));
                    }
                }
            }
        }
        Ok(options)
    }
}
