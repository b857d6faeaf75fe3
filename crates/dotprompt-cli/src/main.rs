use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use dotprompt::{Message, Part, Prompt, PromptStore, PromptStoreConfig, RenderOverrides};
use serde_json::{Map, Value};

mod logging;

use logging::init_logging;

#[derive(Parser)]
#[command(name = "dotprompt")]
#[command(about = "Render .prompt templates into chat messages")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, short, default_value = "false")]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a .prompt file
    Render {
        /// Path to the prompt file
        file: PathBuf,

        #[command(flatten)]
        render: RenderArgs,
    },
    /// Render a prompt from the prompt directory
    Lookup {
        /// Prompt name
        name: String,

        /// Prompt variant
        #[arg(long)]
        variant: Option<String>,

        /// Prompt directory (default: $DOTPROMPT_DIR, then ./prompts)
        #[arg(long)]
        dir: Option<PathBuf>,

        #[command(flatten)]
        render: RenderArgs,
    },
    /// List prompts in the prompt directory
    List {
        /// Prompt directory (default: $DOTPROMPT_DIR, then ./prompts)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[derive(Args)]
struct RenderArgs {
    /// Input variables as a JSON object
    #[arg(long, conflicts_with = "input_file")]
    input: Option<String>,

    /// Read input variables from a JSON file
    #[arg(long)]
    input_file: Option<PathBuf>,

    /// Model override
    #[arg(long)]
    model: Option<String>,

    /// Print the result as a single plain string
    #[arg(long, conflicts_with = "json")]
    text: bool,

    /// Print the full render result as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match cli.command {
        Commands::Render { file, render } => {
            let prompt = load_file(&file)?;
            print_render(&prompt, &render)
        }
        Commands::Lookup {
            name,
            variant,
            dir,
            render,
        } => {
            let store = PromptStore::new(store_config(dir));
            let prompt = store.lookup(&name, variant.as_deref()).await?;
            print_render(&prompt, &render)
        }
        Commands::List { dir } => {
            let store = PromptStore::new(store_config(dir));
            for key in store.list_prompts().await? {
                println!("{}", key);
            }
            Ok(())
        }
    }
}

fn store_config(dir: Option<PathBuf>) -> PromptStoreConfig {
    match dir {
        Some(dir) => PromptStoreConfig::new(dir),
        None => PromptStoreConfig::from_env(),
    }
}

fn load_file(path: &Path) -> anyhow::Result<Prompt> {
    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.split('.').next())
        .unwrap_or("prompt");
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(Prompt::parse(name, &source)?)
}

fn read_input(args: &RenderArgs) -> anyhow::Result<Value> {
    let raw = match (&args.input, &args.input_file) {
        (Some(raw), _) => raw.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => return Ok(Value::Object(Map::new())),
    };
    let value: Value = serde_json::from_str(&raw).context("input is not valid JSON")?;
    if !value.is_object() {
        bail!("input must be a JSON object");
    }
    Ok(value)
}

fn print_render(prompt: &Prompt, args: &RenderArgs) -> anyhow::Result<()> {
    let input = read_input(args)?;
    log::debug!("Rendering '{}' with input {}", prompt.name(), input);

    if args.text {
        println!("{}", prompt.render_text(&input)?);
        return Ok(());
    }

    let overrides = RenderOverrides {
        model: args.model.clone(),
        config: None,
    };
    let rendered = prompt.render(&input, &overrides)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rendered)?);
        return Ok(());
    }

    if let Some(model) = &rendered.model {
        println!("{}", format!("model: {}", model).dimmed());
    }
    for message in &rendered.messages {
        print_message(message);
    }
    Ok(())
}

fn print_message(message: &Message) {
    println!("{}", format!("[{}]", message.role).cyan().bold());
    for part in &message.content {
        match part {
            Part::Text { text } => println!("{}", text),
            Part::Media { content_type, url } if content_type.is_empty() => {
                println!("{}", format!("<media {}>", url).yellow())
            }
            Part::Media { content_type, url } => {
                println!("{}", format!("<media {} ({})>", url, content_type).yellow())
            }
        }
    }
}
