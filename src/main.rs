use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tabchart::output::{self, Destination};
use tabchart::parser::{parse_predicate, Predicate};
use tabchart::recipes::{self, Recipe, BEAT_TIME, DEFAULT_BEAT_THRESHOLD};
use tabchart::RenderOptions;

#[derive(Parser, Debug)]
#[command(name = "tabchart")]
#[command(about = "Plot charts from CSV measurement files", long_about = None)]
struct Cli {
    /// Render options as JSON (e.g. '{"width": 8, "dpi": 150, "viewer": ["feh"]}')
    #[arg(long, global = true)]
    options: Option<String>,

    #[command(subcommand)]
    command: ChartCommand,
}

#[derive(Subcommand, Debug)]
enum ChartCommand {
    /// Delay against inter-beat time with a least-squares fit line
    Sweep {
        #[command(flatten)]
        io: IoArgs,

        /// Row filter applied before plotting (e.g. 'beat_time < 0.55')
        #[arg(long)]
        filter: Option<String>,

        /// Plot every row
        #[arg(long, conflicts_with = "filter")]
        no_filter: bool,
    },
    /// Delay per wave type with group means
    Waves {
        #[command(flatten)]
        io: IoArgs,
    },
    /// Every column over `t`, with `target_0` highlighted
    Series {
        #[command(flatten)]
        io: IoArgs,
    },
    /// Every column against `f` (or `t`)
    Freq {
        #[command(flatten)]
        io: IoArgs,
    },
}

#[derive(Args, Debug)]
struct IoArgs {
    /// Input CSV file
    input: Option<PathBuf>,

    /// Output image (.svg or .png); shows the chart in a viewer when omitted
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let options = match &cli.options {
        Some(json) => RenderOptions::from_json(json)?,
        None => RenderOptions::default(),
    };

    let (recipe, io) = match cli.command {
        ChartCommand::Sweep { io, filter, no_filter } => {
            let filter = if no_filter {
                None
            } else {
                Some(sweep_filter(filter.as_deref())?)
            };
            (Recipe::Sweep { filter }, io)
        }
        ChartCommand::Waves { io } => (Recipe::Waves, io),
        ChartCommand::Series { io } => (Recipe::Series, io),
        ChartCommand::Freq { io } => (Recipe::Freq, io),
    };

    let input = io
        .input
        .unwrap_or_else(|| PathBuf::from(recipe.default_input()));

    let table = recipes::load_table(&input)?;
    let chart = recipe.build(&table).context("Failed to build chart")?;

    let destination = Destination::from_output(io.output);
    output::render(&chart, &destination, &options).context("Failed to render chart")?;

    Ok(())
}

fn sweep_filter(text: Option<&str>) -> Result<Predicate> {
    match text {
        Some(text) => Ok(parse_predicate(text)?),
        None => Ok(Predicate::less_than(BEAT_TIME, DEFAULT_BEAT_THRESHOLD)),
    }
}
