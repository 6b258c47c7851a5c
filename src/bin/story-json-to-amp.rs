use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use story_amp::{compile, parse_story_json, parse_story_yaml, CompileOptions, Story};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "story-json-to-amp")]
#[command(about = "Compile a JSON story into an AMP story HTML document", long_about = None)]
struct Cli {
    /// Story file (.json, or .yaml/.yml)
    input: PathBuf,

    /// Write HTML to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// YAML file with compile options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Indent the output
    #[arg(long)]
    pretty: bool,

    /// Log compile progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let mut options = match &cli.config {
        Some(path) => {
            let yaml = fs::read_to_string(path)
                .with_context(|| format!("Unable to read config {}", path.display()))?;
            CompileOptions::from_yaml_str(&yaml)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => CompileOptions::default(),
    };
    if cli.pretty {
        options.pretty = true;
    }
    debug!(?options, "compile options");

    let story = load_story(&cli.input)?;
    let html = compile(&story, &options)
        .with_context(|| format!("Unable to compile {}", cli.input.display()))?;

    match &cli.output {
        Some(path) => {
            fs::write(path, &html)
                .with_context(|| format!("There was an error writing file {}", path.display()))?;
            info!(output = %path.display(), bytes = html.len(), "wrote story");
        }
        None => println!("{}", html),
    }
    Ok(())
}

fn load_story(path: &Path) -> Result<Story> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Unable to load story {}", path.display()))?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let story = if is_yaml {
        parse_story_yaml(&content)
    } else {
        parse_story_json(&content)
    };
    story.with_context(|| format!("Unable to parse story {}", path.display()))
}
