use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use chess_explorer::chart::{self, ImageFormat};
use chess_explorer::dashboard::{Dashboard, DEFAULT_TOP_OPENINGS};
use chess_explorer::summary::{format_increment, Summary};
use chess_explorer::{derive, read_games_file, xlsx, DerivedTable};

#[derive(Parser)]
#[command(name = "chess-explorer")]
#[command(about = "Explore recorded chess games: derive features and render charts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deduplicate games, derive features and write the augmented table
    Derive {
        /// Input CSV file of games
        #[arg(short, long, env = "CHESS_GAMES_CSV")]
        input: PathBuf,

        /// Output file (CSV or XLSX)
        #[arg(short, long)]
        output: PathBuf,

        /// Number of parallel threads (default: number of CPU cores)
        #[arg(short, long)]
        threads: Option<usize>,
    },

    /// Render the three exploration charts for the chosen filters
    Render {
        /// Input CSV file of games
        #[arg(short, long, env = "CHESS_GAMES_CSV")]
        input: PathBuf,

        /// Directory the charts are written to
        #[arg(long, default_value = "charts")]
        out_dir: PathBuf,

        /// Include only rated games in the rating difference histogram
        #[arg(long)]
        rated_only: bool,

        /// Opening family for the winner chart (default: Select all)
        #[arg(long)]
        opening: Option<String>,

        /// Skill level for the winner chart (default: Select all)
        #[arg(long)]
        skill_level: Option<String>,

        /// Number of most played openings offered as choices
        #[arg(long, default_value_t = DEFAULT_TOP_OPENINGS)]
        top_openings: usize,

        /// Image format: svg or png
        #[arg(long, default_value = "svg")]
        format: String,
    },

    /// Print game counts per category
    Summary {
        /// Input CSV file of games
        #[arg(short, long, env = "CHESS_GAMES_CSV")]
        input: PathBuf,
    },

    /// List the choices offered by the opening and skill level selectors
    Options {
        /// Input CSV file of games
        #[arg(short, long, env = "CHESS_GAMES_CSV")]
        input: PathBuf,

        /// Number of most played openings offered as choices
        #[arg(long, default_value_t = DEFAULT_TOP_OPENINGS)]
        top_openings: usize,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Derive { input, output, threads } => {
            derive_table(&input, &output, threads)?;
        }
        Commands::Render {
            input,
            out_dir,
            rated_only,
            opening,
            skill_level,
            top_openings,
            format,
        } => {
            let format = ImageFormat::from_str(&format)
                .ok_or_else(|| anyhow::anyhow!("Unsupported image format: {}", format))?;
            render(
                &input,
                &out_dir,
                rated_only,
                opening.as_deref(),
                skill_level.as_deref(),
                top_openings,
                format,
            )?;
        }
        Commands::Summary { input } => {
            summary(&input)?;
        }
        Commands::Options { input, top_openings } => {
            options(&input, top_openings)?;
        }
    }

    Ok(())
}

/// Load, deduplicate and derive; any malformed increment code aborts
fn load(input: &Path) -> Result<DerivedTable> {
    let table = read_games_file(input)
        .with_context(|| format!("Failed to read games from {}", input.display()))?;
    println!(
        "Loaded {} games ({} duplicates dropped)",
        table.len(),
        table.duplicates_dropped
    );
    derive(table).context("Failed to derive game features")
}

fn derive_table(input: &Path, output: &Path, threads: Option<usize>) -> Result<()> {
    if let Some(n) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let table = load(input)?;

    let output_ext = output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match output_ext.as_str() {
        "csv" => {
            println!("Writing CSV file: {}", output.display());
            table.write_csv_file(output).context("Failed to write CSV file")?;
        }
        "xlsx" => {
            println!("Writing Excel file: {}", output.display());
            xlsx::write_derived_to_xlsx(&table, output).context("Failed to write Excel file")?;
        }
        _ => {
            anyhow::bail!("Unsupported output format: {}", output_ext);
        }
    }

    println!("Done!");
    Ok(())
}

fn render(
    input: &Path,
    out_dir: &Path,
    rated_only: bool,
    opening: Option<&str>,
    skill_level: Option<&str>,
    top_openings: usize,
    format: ImageFormat,
) -> Result<()> {
    let table = load(input)?;
    let dashboard = Dashboard::new(&table, top_openings);
    let filters = dashboard.filters(rated_only, opening, skill_level)?;

    let views = dashboard.render(&filters);
    let written = chart::render_views(&views, out_dir, format).context("Failed to render charts")?;

    let hist = &views.rating_differential.histogram;
    println!(
        "Rating differential: {} games, {} bins of width {:.2} over [{}, {}]{}",
        hist.total(),
        hist.counts.len(),
        hist.bin_width(),
        hist.start,
        hist.end,
        if rated_only { " (rated only)" } else { "" }
    );
    println!(
        "Winning color over {} games: {}",
        views.winner_frequency.games,
        views
            .winner_frequency
            .counts
            .iter()
            .map(|(w, n)| format!("{}={}", w, n))
            .collect::<Vec<_>>()
            .join(" ")
    );
    for path in written {
        println!("Wrote {}", path.display());
    }

    Ok(())
}

fn summary(input: &Path) -> Result<()> {
    let table = load(input)?;
    let summary = Summary::new(&table);

    println!();
    println!("Games: {} ({} rated)", summary.games, summary.rated);
    println!("Duplicates dropped: {}", summary.duplicates_dropped);
    println!();

    println!("Skill levels:");
    for (level, count) in &summary.skill_levels {
        println!("  {:<14} {:>7}", level, count);
    }
    println!();

    println!("Time controls:");
    for (tc, count) in &summary.time_controls {
        println!("  {:<14} {:>7}", tc, count);
    }
    println!();

    println!("Winners:");
    for (winner, count) in &summary.winners {
        println!("  {:<14} {:>7}", winner, count);
    }
    println!();

    println!("Most played increments:");
    for (code, count) in &summary.increments {
        println!("  {:<14} {:>7}", format_increment(code), count);
    }

    Ok(())
}

fn options(input: &Path, top_openings: usize) -> Result<()> {
    let table = load(input)?;
    let dashboard = Dashboard::new(&table, top_openings);

    for select in [dashboard.opening_options(), dashboard.skill_level_options()] {
        println!();
        println!("{} (default: {}):", select.label, select.default_option());
        for option in select.options() {
            println!("  {}", option);
        }
    }

    Ok(())
}
