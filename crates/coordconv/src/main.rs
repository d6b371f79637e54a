use crate::prelude::*;
use clap::Parser;

mod coord;
mod error;
mod mcp;
mod prelude;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Parse, convert and format geographic coordinates (DD, DDM, DMS, MGRS, USNG, UTM, GARS)"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "COORDCONV_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Convert a coordinate from one notation to another
    Convert(crate::coord::convert::ConvertOptions),

    /// Show the named fields of a coordinate
    Fields(crate::coord::fields::FieldsOptions),

    /// Convert one coordinate per line read from stdin
    Batch(crate::coord::batch::BatchOptions),

    /// Model Context Protocol server
    MCP(crate::mcp::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Convert(options) => crate::coord::convert::run(options, app.global),
        SubCommands::Fields(options) => crate::coord::fields::run(options, app.global),
        SubCommands::Batch(options) => crate::coord::batch::run(options, app.global),
        SubCommands::MCP(sub_app) => crate::mcp::run(sub_app, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
