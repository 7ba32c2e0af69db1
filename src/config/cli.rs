use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "saathi-uploader")]
#[command(about = "SAATHI file uploader: a scheme details form that forwards documents to the upload API")]
pub struct CliArgs {
    /// Path to a TOML settings file
    #[arg(short, long, env = "UPLOADER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to serve the form on, overrides the settings file
    #[arg(long)]
    pub bind: Option<SocketAddr>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}
