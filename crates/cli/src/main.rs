mod cmd;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::{SelectionArgs, cmd_info, cmd_install, cmd_resolve};
use crate::output::{OutputFormat, print_error};

/// boostup - install prebuilt Boost archives
#[derive(Parser)]
#[command(name = "boostup")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Resolve, download and extract the requested Boost version
  Install {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Output format for the emitted values
    #[arg(short = 'o', long = "format", value_enum, default_value_t)]
    format: OutputFormat,
  },

  /// Show which archive would be installed, without downloading it
  Resolve {
    #[command(flatten)]
    selection: SelectionArgs,

    #[arg(short = 'o', long = "format", value_enum, default_value_t)]
    format: OutputFormat,
  },

  /// Display platform and default directory information
  Info {
    #[arg(short = 'o', long = "format", value_enum, default_value_t)]
    format: OutputFormat,
  },
}

fn main() {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = match cli.command {
    Commands::Install { selection, format } => cmd_install(selection, format),
    Commands::Resolve { selection, format } => cmd_resolve(selection, format),
    Commands::Info { format } => cmd_info(format),
  };

  if let Err(e) = result {
    print_error(&format!("{:#}", e));
    std::process::exit(1);
  }
}
