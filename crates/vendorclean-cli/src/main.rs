mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "vendorclean",
    version,
    about = "Clean vendor compliance invoice spreadsheets into one zip archive"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a batch of spreadsheets and write them into a zip archive
    Clean {
        /// Spreadsheet files (xlsx, xlsm, xlsb, xls, ods)
        #[arg(required = true)]
        input_files: Vec<PathBuf>,

        /// Predefined template: invoice (default) or bid
        #[arg(short, long, default_value = "invoice")]
        template: String,

        /// Custom JSON template file (overrides --template)
        #[arg(long, value_name = "FILE")]
        template_file: Option<PathBuf>,

        /// Sheet to read (default: first sheet)
        #[arg(long)]
        sheet: Option<String>,

        /// Directory the archive is written to
        #[arg(short = 'd', long, default_value = ".")]
        out_dir: PathBuf,

        /// IANA timezone for the archive timestamp
        #[arg(long, default_value = "America/New_York")]
        timezone: String,
    },
    /// Clean a single spreadsheet and print its records (nothing is written)
    Parse {
        /// Spreadsheet file
        input_file: PathBuf,

        /// Predefined template: invoice (default) or bid
        #[arg(short, long, default_value = "invoice")]
        template: String,

        /// Custom JSON template file (overrides --template)
        #[arg(long, value_name = "FILE")]
        template_file: Option<PathBuf>,

        /// Sheet to read (default: first sheet)
        #[arg(long)]
        sheet: Option<String>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Inspect and validate templates
    Templates {
        #[command(subcommand)]
        action: TemplatesAction,
    },
}

#[derive(Subcommand)]
enum TemplatesAction {
    /// List predefined templates
    List,
    /// Print a predefined template as JSON
    Show {
        /// Template name (e.g., "invoice")
        name: String,
    },
    /// Validate a custom template file
    Validate {
        /// Path to JSON template file
        file: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vendorclean=warn,vendorclean_core=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Clean {
            input_files,
            template,
            template_file,
            sheet,
            out_dir,
            timezone,
        } => commands::clean::run(commands::clean::CleanArgs {
            input_files,
            template,
            template_file,
            sheet,
            out_dir,
            timezone,
        })
        .map(|_| ()),
        Commands::Parse {
            input_file,
            template,
            template_file,
            sheet,
            output,
        } => commands::parse::run(input_file, &template, template_file, sheet, &output),
        Commands::Templates { action } => match action {
            TemplatesAction::List => commands::templates::list(),
            TemplatesAction::Show { name } => commands::templates::show(&name),
            TemplatesAction::Validate { file } => commands::templates::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
