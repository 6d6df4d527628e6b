use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use orderpacker_cli::output::{render_boxes, render_pack, OutputFormat, PackSummary};
use orderpacker_lib::{Packer, PackerConfig, DEFAULT_MAX_BOXES};
use orderpacker_service_shared::config::DEFAULT_MAX_ITEMS;

#[derive(Parser, Debug)]
#[command(author, version, about = "Greedy order packing over fixed box sizes")]
struct Cli {
    /// Box capacities to pack with, comma separated. Defaults to 250,500,1000,2000,5000.
    #[arg(long, global = true, value_delimiter = ',')]
    boxes: Option<Vec<u64>>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Choose boxes for an order of ITEMS.
    Pack {
        /// Number of items to ship.
        items: u64,

        /// Largest order accepted.
        #[arg(long, default_value_t = DEFAULT_MAX_ITEMS)]
        max_items: u64,

        /// Longest box list the packer may produce.
        #[arg(long, default_value_t = DEFAULT_MAX_BOXES)]
        max_boxes: u64,
    },
    /// Print the normalized box set.
    Boxes,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let packer = Packer::new(PackerConfig { boxes: cli.boxes }).context("invalid --boxes")?;
    tracing::debug!(boxes = ?packer.boxes().as_slice(), "packer created");

    match cli.command {
        Command::Pack {
            items,
            max_items,
            max_boxes,
        } => handle_pack(&packer, items, Limits { max_items, max_boxes }, cli.format),
        Command::Boxes => handle_boxes(&packer, cli.format),
    }
}

struct Limits {
    max_items: u64,
    max_boxes: u64,
}

fn handle_pack(packer: &Packer, items: u64, limits: Limits, format: OutputFormat) -> Result<()> {
    if items == 0 {
        bail!("items must be greater than zero");
    }
    if items > limits.max_items {
        bail!("items cannot exceed {} (see --max-items)", limits.max_items);
    }

    let boxes = packer
        .try_pack_order(items, limits.max_boxes)
        .context("order cannot be packed (see --max-boxes)")?;
    let summary = PackSummary::new(items, &boxes);
    let rendered = render_pack(&summary, format).context("failed to render packing result")?;
    print_rendered(&rendered);
    Ok(())
}

fn handle_boxes(packer: &Packer, format: OutputFormat) -> Result<()> {
    let rendered = render_boxes(packer.boxes(), format).context("failed to render box set")?;
    print_rendered(&rendered);
    Ok(())
}

fn print_rendered(rendered: &str) {
    if rendered.ends_with('\n') {
        print!("{rendered}");
    } else {
        println!("{rendered}");
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
