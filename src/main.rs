// ABOUTME: Main entry point for the deckgen program.
// ABOUTME: Provides CLI interface and executes commands from the library.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use std::fs;
use std::path::PathBuf;

use deckgen::images::{GeminiImageClient, ImageSource};
use deckgen::{Config, DeckRequest, WatchConfig};

#[derive(Parser)]
#[command(author, version, about = "Generate themed HTML slide decks from a description", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a deck from a description and optional reference files
    Create(CreateArgs),

    /// Regenerate a deck whenever its reference files change
    Watch(WatchArgs),

    /// List available themes
    ListThemes(ThemesArgs),

    /// Show details about a theme
    ThemeInfo(ThemeInfoArgs),
}

#[derive(Args)]
struct DeckArgs {
    /// What the presentation is about
    description: String,

    /// Reference files for additional context (paths, glob patterns or URLs)
    #[arg(short, long = "file")]
    files: Vec<String>,

    /// Force a specific theme (e.g. keynote-minimalist, technical-blueprint)
    #[arg(short, long)]
    theme: Option<String>,

    /// Output HTML file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory with additional theme YAML files
    #[arg(long)]
    themes_dir: Option<PathBuf>,

    /// Skip background image generation
    #[arg(long)]
    no_images: bool,
}

#[derive(Args)]
struct CreateArgs {
    #[command(flatten)]
    deck: DeckArgs,

    /// Also write the mapped slides as JSON to this path
    #[arg(long)]
    dump_plan: Option<PathBuf>,
}

#[derive(Args)]
struct WatchArgs {
    #[command(flatten)]
    deck: DeckArgs,

    /// Debounce time in milliseconds
    #[arg(long)]
    debounce_ms: Option<u64>,
}

#[derive(Args)]
struct ThemesArgs {
    /// Directory with additional theme YAML files
    #[arg(long)]
    themes_dir: Option<PathBuf>,
}

#[derive(Args)]
struct ThemeInfoArgs {
    /// Theme name (hyphens or underscores)
    name: String,

    /// Directory with additional theme YAML files
    #[arg(long)]
    themes_dir: Option<PathBuf>,
}

fn app_config(themes_dir: Option<PathBuf>, no_images: bool) -> Config {
    let mut config = Config::from_env();
    if themes_dir.is_some() {
        config.themes_dir = themes_dir;
    }
    if no_images {
        config.generate_images = false;
    }
    config
}

fn output_path(deck: &DeckArgs, config: &Config) -> PathBuf {
    deck.output
        .clone()
        .unwrap_or_else(|| deckgen::utils::output_path_for(&deck.description, &config.output_dir))
}

fn create(args: &CreateArgs) -> deckgen::Result<()> {
    let config = app_config(args.deck.themes_dir.clone(), args.deck.no_images);
    let themes = config.load_themes()?;

    println!("Creating deck: {}", args.deck.description);

    let references = deckgen::read_references(&deckgen::expand_inputs(&args.deck.files));
    for path in &references.unreadable {
        warn!("Reference {} contributed no text", path);
    }

    let request = DeckRequest::new(&args.deck.description)
        .with_references(references)
        .with_theme(args.deck.theme.as_deref());

    let image_client = GeminiImageClient::from_config(&config.get_image_config())?;
    let image_source = image_client.as_ref().map(|client| client as &dyn ImageSource);

    let deck = deckgen::generate_deck(&request, &themes, image_source);
    info!("{}", deck.report);
    for omitted in &deck.report.omitted {
        info!("Omitted slide with no content: {}", omitted);
    }

    let output = output_path(&args.deck, &config);
    deckgen::write_html_to_file(&deck.html, &output)?;

    if let Some(plan_path) = &args.dump_plan {
        let json = serde_json::to_string_pretty(&deck.slides)?;
        fs::write(plan_path, json)
            .with_context(|| format!("Failed to write plan to {:?}", plan_path))?;
    }

    let shown = deckgen::utils::get_absolute_path(&output).unwrap_or(output);
    println!("✓ Deck created: {}", shown.display());
    println!(
        "  Theme: {}  Slides: {}",
        deck.report.theme, deck.report.rendered_slides
    );
    Ok(())
}

fn watch(args: &WatchArgs) -> deckgen::Result<()> {
    let config = app_config(args.deck.themes_dir.clone(), args.deck.no_images);
    let watch_config = WatchConfig {
        description: args.deck.description.clone(),
        inputs: args.deck.files.clone(),
        html_output: output_path(&args.deck, &config),
        forced_theme: args.deck.theme.clone(),
        debounce_ms: args.debounce_ms.unwrap_or(config.debounce_ms),
    };
    deckgen::watch_references(watch_config, &config)
}

fn list_themes(args: &ThemesArgs) -> deckgen::Result<()> {
    let themes = app_config(args.themes_dir.clone(), true).load_themes()?;

    println!("\nAvailable Themes:\n");
    for theme in themes.summaries() {
        println!("  {}", theme.display_name);
        println!("    {}", theme.description);
        if !theme.best_for.is_empty() {
            println!("    Best for: {}", theme.best_for);
        }
        println!();
    }
    Ok(())
}

fn theme_info(args: &ThemeInfoArgs) -> deckgen::Result<()> {
    let themes = app_config(args.themes_dir.clone(), true).load_themes()?;
    let theme = themes
        .get(&args.name)
        .ok_or_else(|| deckgen::DeckError::ThemeNotFound(args.name.clone()))?;

    println!("\nTheme: {}", theme.display_name());
    println!(
        "Description: {}",
        if theme.description.is_empty() {
            "No description"
        } else {
            theme.description.as_str()
        }
    );
    println!("\nColors:");
    for (key, value) in theme.colors.entries() {
        println!("  {}: {}", key, value);
    }
    println!("\nTypography:");
    for (key, value) in theme.typography.entries() {
        println!("  {}: {}", key, value);
    }
    if let Some(depth) = &theme.triggers.technical_depth {
        println!("\nTechnical depth: {}", depth);
    }
    println!();
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Some(Commands::Create(args)) => create(args),
        Some(Commands::Watch(args)) => watch(args),
        Some(Commands::ListThemes(args)) => list_themes(args),
        Some(Commands::ThemeInfo(args)) => theme_info(args),
        None => {
            println!("No command specified. Use --help for usage information.");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        if matches!(e, deckgen::DeckError::ThemeNotFound(_)) {
            eprintln!("\nRun 'deckgen list-themes' to see available themes.");
        }
        std::process::exit(1);
    }
}
