//! Headless modeler driver
//!
//! Replays an editor script (one command per line, `#` starts a comment)
//! against a fresh editor, then prints the resulting tree.
//!
//! ```text
//! mode modelling
//! add box
//! add cone
//! translate
//! axis y
//! +
//! save robot
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, Command};
use shape_modeler::config::{Config, EditorConfig};
use shape_modeler::editor::{Command as EditorCommand, Editor};
use shape_modeler::foundation::logging;

struct RunOptions {
    script: PathBuf,
    config: Option<PathBuf>,
    save: Option<PathBuf>,
    strict: bool,
}

fn main() -> Result<()> {
    let matches = Command::new("modeler")
        .about("Builds, edits, saves and loads primitive models from an editor command script")
        .arg(
            Arg::new("script")
                .value_name("SCRIPT")
                .help("Command script to replay, '-' for stdin")
                .required(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Editor config file (.toml or .ron)"),
        )
        .arg(
            Arg::new("save")
                .short('s')
                .long("save")
                .value_name("FILE")
                .help("Save the final model here after the script finishes"),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("Stop at the first command that fails")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log the model tree after every change")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    logging::init_with_default(if matches.get_flag("verbose") { "debug" } else { "info" });

    let options = RunOptions {
        script: matches
            .get_one::<String>("script")
            .map(PathBuf::from)
            .context("missing script argument")?,
        config: matches.get_one::<String>("config").map(PathBuf::from),
        save: matches.get_one::<String>("save").map(PathBuf::from),
        strict: matches.get_flag("strict"),
    };

    let editor = run(&options)?;
    match editor.document() {
        Some(graph) => {
            for line in graph.describe() {
                println!("{line}");
            }
        }
        None => println!("No model"),
    }
    Ok(())
}

fn run(options: &RunOptions) -> Result<Editor> {
    let config = match &options.config {
        Some(path) => EditorConfig::load_from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EditorConfig::default(),
    };
    let mut editor = Editor::new(config);

    let reader = open_script(&options.script)?;
    let mut failures = 0usize;
    for (index, line) in reader.lines().enumerate() {
        let line = line.context("failed to read script")?;
        let text = line.split('#').next().unwrap_or_default().trim();
        if text.is_empty() {
            continue;
        }

        let result = text
            .parse::<EditorCommand>()
            .map_err(anyhow::Error::from)
            .and_then(|command| editor.execute(command).map_err(anyhow::Error::from));

        match result {
            Ok(outcome) => log::info!("{outcome}"),
            Err(e) if options.strict => {
                return Err(e).with_context(|| format!("line {}: '{text}'", index + 1));
            }
            Err(e) => {
                failures += 1;
                log::warn!("line {}: '{text}': {e}", index + 1);
            }
        }
    }

    if failures > 0 {
        log::warn!("{failures} command(s) failed");
    }

    if let Some(path) = &options.save {
        let Some(graph) = editor.document() else {
            bail!("no model to save");
        };
        graph
            .save(path)
            .with_context(|| format!("failed to save {}", path.display()))?;
    }

    Ok(editor)
}

fn open_script(path: &Path) -> Result<Box<dyn BufRead>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(path).with_context(|| format!("failed to open script {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}
