//! mailsmith - HTML email template compiler

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mailsmith::{BuildTask, Error, TemplateOptions, content_files};

#[derive(Parser)]
#[command(name = "mailsmith")]
#[command(version, about = "HTML email template compiler", long_about = None)]
#[command(after_help = "EXAMPLES:
    mailsmith build --src templates -o dist     Build every page under templates/
    mailsmith build welcome.html -o dist        Build one page
    mailsmith list templates                    Show the pages that would be built")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Print each resolution step
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Merge pages into their layouts and write them to the output folder
    Build {
        /// Pages to build (partials starting with `_` are skipped)
        #[arg(value_name = "SOURCES")]
        sources: Vec<PathBuf>,

        /// Also build every page found below this folder
        #[arg(long, value_name = "DIR")]
        src: Option<PathBuf>,

        /// Output folder (overrides the config file)
        #[arg(short, long, value_name = "DIR", required_unless_present = "config")]
        output: Option<PathBuf>,

        /// JSON options file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// List the pages below a folder that would be built
    List {
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let result = match cli.command {
        Command::Build {
            sources,
            src,
            output,
            config,
        } => build(sources, src, output, config),
        Command::List { dir } => {
            for path in content_files(&dir) {
                println!("{}", path.display());
            }
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(quiet: bool, verbose: bool) {
    let default = match (quiet, verbose) {
        (true, _) => "mailsmith=warn",
        (_, true) => "mailsmith=debug",
        _ => "mailsmith=info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn build(
    sources: Vec<PathBuf>,
    src: Option<PathBuf>,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<(), Error> {
    // clap guarantees at least one of the two
    let mut options = match config {
        Some(path) => TemplateOptions::load(path)?,
        None => TemplateOptions::new(output.clone().unwrap_or_default()),
    };
    if let Some(output) = output {
        options.output_folder = output;
    }

    let discovered = src.iter().flat_map(content_files);
    let task = BuildTask::from_options(&options).with_sources(sources.into_iter().chain(discovered));
    task.execute()?;
    Ok(())
}
