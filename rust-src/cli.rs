//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::commands;
use crate::data::{PayloadInputs, PayloadSource};
use crate::logging;
use crate::models::SeriesKind;
use crate::visualization::Theme;


/// nftd - render the NFT marketplace analytics dashboard
#[derive(Parser)]
#[command(name = "nftd")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Chart colour theme
    #[arg(long, value_enum, env = "NFTD_THEME", default_value_t = Theme::Light, global = true)]
    theme: Theme,

    #[command(subcommand)]
    command: Option<Commands>,
}


#[derive(Subcommand)]
enum Commands {
    /// Render both charts into an HTML dashboard page
    Render {
        #[command(flatten)]
        payloads: PayloadArgs,

        /// Output file path
        #[arg(short, long)]
        output: Option<String>,

        /// Open file after rendering
        #[arg(long)]
        open: bool,
    },

    /// Export a single chart as PNG or SVG
    Export {
        /// Which chart to export
        #[arg(long, value_enum)]
        chart: ChartChoice,

        #[command(flatten)]
        payloads: PayloadArgs,

        /// Export as SVG instead of PNG
        #[arg(long)]
        svg: bool,

        /// Output file path
        #[arg(short, long)]
        output: Option<String>,

        /// Open file after export
        #[arg(long)]
        open: bool,
    },

    /// Show both charts in an interactive terminal dashboard
    Show {
        #[command(flatten)]
        payloads: PayloadArgs,

        /// Re-render every 5 seconds
        #[arg(long)]
        live: bool,
    },

    /// Check that both payloads decode
    Validate {
        #[command(flatten)]
        payloads: PayloadArgs,
    },
}


#[derive(Debug, Clone, Copy, ValueEnum)]
enum ChartChoice {
    Mint,
    Sales,
}


impl From<ChartChoice> for SeriesKind {
    fn from(choice: ChartChoice) -> Self {
        match choice {
            ChartChoice::Mint => SeriesKind::Mint,
            ChartChoice::Sales => SeriesKind::Sales,
        }
    }
}


/// Where the mint and sales payloads come from.
#[derive(Args, Debug, Default)]
struct PayloadArgs {
    /// Mint payload file (`-` for stdin)
    #[arg(long, value_name = "PATH", conflicts_with = "mint_json")]
    mint: Option<String>,

    /// Mint payload as inline (escaped) JSON
    #[arg(long, value_name = "JSON")]
    mint_json: Option<String>,

    /// Sales payload file (`-` for stdin)
    #[arg(long, value_name = "PATH", conflicts_with = "sales_json")]
    sales: Option<String>,

    /// Sales payload as inline (escaped) JSON
    #[arg(long, value_name = "JSON")]
    sales_json: Option<String>,

    /// Admin page context holding mint_data and sales_data
    #[arg(long, value_name = "PATH")]
    context: Option<PathBuf>,
}


impl PayloadArgs {
    fn into_inputs(self) -> anyhow::Result<PayloadInputs> {
        if self.mint.as_deref() == Some("-") && self.sales.as_deref() == Some("-") {
            anyhow::bail!("Only one of --mint and --sales can read from stdin");
        }

        let source = |path: Option<String>, inline: Option<String>| {
            path.map(|p| PayloadSource::from_path_arg(&p))
                .or_else(|| inline.map(PayloadSource::Inline))
        };

        Ok(PayloadInputs {
            mint: source(self.mint, self.mint_json),
            sales: source(self.sales, self.sales_json),
            context: self.context,
        })
    }
}


/// Run the CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Some(Commands::Render { payloads, output, open }) => {
            commands::render::run(&payloads.into_inputs()?, cli.theme, output, open)?;
        }
        Some(Commands::Export { chart, payloads, svg, output, open }) => {
            commands::export::run(&payloads.into_inputs()?, chart.into(), cli.theme, svg, output, open)?;
        }
        Some(Commands::Show { payloads, live }) => {
            commands::show::run(&payloads.into_inputs()?, cli.theme, live)?;
        }
        Some(Commands::Validate { payloads }) => {
            commands::validate::run(&payloads.into_inputs()?)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
        }
    }

    Ok(())
}
