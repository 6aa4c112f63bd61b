use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "riskcrew", version, about = "Multi-agent cyber risk scenario generator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze one asset document and print the executive report
    Analyze(AnalyzeArgs),
    /// Start the HTTP API server
    Serve(ServeArgs),
    /// List the pipeline roles and their tools
    Roles,
    /// Validate a configuration file
    Validate(ValidateArgs),
}

#[derive(Args, Clone)]
pub struct AnalyzeArgs {
    /// Name of the asset under analysis
    #[arg(short, long)]
    pub asset: String,

    /// Architecture document (.pdf, .docx or .txt)
    #[arg(short, long)]
    pub file: String,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,
}

#[derive(Args, Clone)]
pub struct ServeArgs {
    /// Listen port
    #[arg(long, default_value = "8000")]
    pub port: u16,

    /// Listen address
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Config file to validate
    pub config: String,
}
