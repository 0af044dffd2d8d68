//! Command line definition

use std::path::PathBuf;

use clap::Parser;

pub mod credentials;
pub mod run;

/// BSO-Scan - recurring OpenVAS quick scans with e-mailed PDF reports
#[derive(Parser, Debug)]
#[command(name = "bso-scan")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Hours between two scans; without it a single scan is performed
    #[arg(short = 'i', long, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Base name of the scan target
    #[arg(long)]
    pub target_name: Option<String>,

    /// Hosts to scan (space or comma separated)
    #[arg(long, required = true, num_args = 1.., value_delimiter = ',')]
    pub hosts: Vec<String>,

    /// Scan configuration: 0 Full and fast, 1 Full and fast ultimate,
    /// 2 Full and very deep, 3 Full and very deep ultimate, 4 System Discovery
    #[arg(
        short = 'C',
        long,
        default_value_t = 0,
        value_parser = clap::value_parser!(u8).range(0..=4)
    )]
    pub scan_config: u8,

    /// Address that receives the report
    #[arg(short = 'R', long)]
    pub recipient: String,

    /// Address the report is sent from (also the SMTP login)
    #[arg(short = 'S', long)]
    pub sender: String,

    /// Stop each task right after starting it
    #[arg(long, hide = true)]
    pub stop_after_start: bool,

    /// Path of the gvmd socket
    #[arg(long, env = "BSO_SCAN_SOCKET", hide_env = true)]
    pub socket: Option<PathBuf>,

    /// Directory for downloaded reports
    #[arg(long, env = "BSO_SCAN_REPORT_DIR", hide_env = true)]
    pub report_dir: Option<PathBuf>,

    /// Override config file location
    #[arg(long, env = "BSO_SCAN_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, env = "BSO_SCAN_DEBUG", hide_env = true)]
    pub debug: bool,
}

impl Cli {
    /// Hosts with surrounding whitespace and empty entries removed
    pub fn host_list(&self) -> Vec<String> {
        self.hosts
            .iter()
            .map(|host| host.trim())
            .filter(|host| !host.is_empty())
            .map(str::to_string)
            .collect()
    }
}
