use anyhow::{Result, bail};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

#[derive(Parser, Debug)]
#[command(name = "zipslice")]
#[command(version)]
#[command(about = "Fetch a single file out of a remote ZIP archive using HTTP Range requests", long_about = None)]
#[command(after_help = "Examples:\n  \
  zipslice https://example.com/archive.zip          list entries and pick one interactively\n  \
  zipslice -s 2 https://example.com/archive.zip     fetch the second entry\n  \
  zipslice -l local.zip                             list entries of a local archive")]
pub struct Cli {
    /// ZIP file URL or local path (prompted for when omitted)
    #[arg(value_name = "SOURCE")]
    pub source: Option<String>,

    /// List entries and exit
    #[arg(short = 'l', long = "list")]
    pub list: bool,

    /// Entry to fetch, 1-based as shown in the listing
    #[arg(short = 's', long = "select", value_name = "N")]
    pub select: Option<usize>,

    /// Write the fetched entry into this directory
    #[arg(short = 'd', long = "dir", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Never overwrite existing files
    #[arg(short = 'n')]
    pub never_overwrite: bool,

    /// HTTP timeout in seconds
    #[arg(long = "timeout", value_name = "SECS", default_value_t = 30)]
    pub timeout: u64,

    /// Quiet mode, no informational messages
    #[arg(short = 'q')]
    pub quiet: bool,

    /// Verbose logging (-vv => debug)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn is_http_url(source: &str) -> bool {
        source.starts_with("http://") || source.starts_with("https://")
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Log filter implied by `-v`, used when `RUST_LOG` is not set
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        }
    }
}

/// Write `message` to `output` and read one trimmed line from `input`.
///
/// `input` must be the same buffered reader for every prompt of a run, or
/// lines already buffered by an earlier reader are lost.
pub async fn prompt<I, O>(input: &mut I, output: &mut O, message: &str) -> Result<String>
where
    I: AsyncBufRead + Unpin,
    O: AsyncWrite + Unpin,
{
    output.write_all(message.as_bytes()).await?;
    output.flush().await?;

    let mut line = String::new();
    if input.read_line(&mut line).await? == 0 {
        bail!("No input on stdin");
    }

    Ok(line.trim().to_string())
}

/// Parse a 1-based selection typed at the prompt
pub fn parse_selection(input: &str) -> Option<usize> {
    input.trim().parse().ok()
}
