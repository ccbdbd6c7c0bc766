pub mod cli;
pub mod file_config;

pub use file_config::ExportConfig;

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "practice-tasks")]
#[command(about = "Small practice exercises: calculator, temperature, top-k, currency export, conveyor")]
pub struct CliConfig {
    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Read two integers and an operator from stdin, print the result
    Calc,

    /// Narrow the office temperature per employee request
    Temperature,

    /// Print the k-th largest rating
    TopK,

    /// Convert a ValCurs XML feed into sorted JSON
    Currency {
        #[arg(short = 'c', long, default_value = "config.yaml")]
        config: String,
    },

    /// Push stdin lines through a decorator, separator and multiplexer
    Conveyor {
        #[arg(long, default_value = "16")]
        buffer_size: usize,
    },

    /// List wireless interfaces and their hardware addresses
    Wifi {
        #[arg(long, default_value = "/sys/class/net")]
        sysfs_root: String,
    },
}
