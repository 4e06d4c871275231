use std::path::PathBuf;

use clap::{Parser, Subcommand};
use droidloc::directory_for;
use droidloc_cli::translate::{TranslateOptions, run_translate_command};
use droidloc_cli::validation::validate_language_code;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate the default strings.xml of an Android project.
    Translate {
        /// Directory inside the Android project (defaults to the current directory)
        #[arg(short, long)]
        project: Option<PathBuf>,

        /// JSON configuration file (defaults to config.json in the project root)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Source strings.xml, skipping project discovery
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Target language; repeat to translate into several (overrides the config)
        #[arg(short, long = "lang")]
        langs: Vec<String>,

        /// Write a JSON summary of the run to this file
        #[arg(long)]
        report_json: Option<PathBuf>,

        /// Show what would be translated without calling the backend
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the resource directory used for each language tag.
    Dir {
        /// Language tags such as fr, pt-BR or zh-Hant-TW
        #[arg(required = true)]
        tags: Vec<String>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_dir_command(tags: &[String]) -> Result<(), String> {
    for tag in tags {
        validate_language_code(tag)?;
        println!("{} -> {}", tag, directory_for(tag));
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    let args = Args::parse();

    let result = match args.commands {
        Commands::Translate {
            project,
            config,
            input,
            langs,
            report_json,
            dry_run,
        } => {
            run_translate_command(TranslateOptions {
                project,
                config,
                input,
                langs,
                report_json,
                dry_run,
            })
            .await
        }
        Commands::Dir { tags } => run_dir_command(&tags),
    };

    if let Err(e) = result {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}
