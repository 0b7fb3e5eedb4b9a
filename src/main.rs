//! Main entry point for the zipslice CLI application.
//!
//! Lists the entries of a remote (or local) ZIP archive, lets the user pick
//! one, and writes that entry's raw compressed bytes to a local file.

use anyhow::{Result, bail};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{BufReader, Stdin};

use zipslice::cli::{parse_selection, prompt};
use zipslice::{Cli, HttpRangeReader, LocalFileReader, RangeFetch, ZipError, ZipExtractor};

/// Application entry point.
///
/// Every range fetch is awaited before the next one is issued, so a single
/// thread is all the runtime needs.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    // reqwest builds its TLS config from the process default provider
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let mut stdin = BufReader::new(tokio::io::stdin());

    let source = match cli.source.clone() {
        Some(source) => source,
        None => {
            prompt(
                &mut stdin,
                &mut tokio::io::stdout(),
                "Please enter URL or local path of the ZIP archive: ",
            )
            .await?
        }
    };

    if Cli::is_http_url(&source) {
        let reader = Arc::new(HttpRangeReader::new(source, cli.timeout()).await?);

        let result = process_zip(reader.clone(), &cli, &mut stdin).await;

        if !cli.quiet {
            eprintln!(
                "Total bytes transferred: {}",
                format_size(reader.transferred_bytes())
            );
        }
        result
    } else {
        let reader = Arc::new(LocalFileReader::new(Path::new(&source))?);
        process_zip(reader, &cli, &mut stdin).await
    }
}

/// List the archive, pick an entry and write it out.
async fn process_zip<R: RangeFetch + 'static>(
    reader: Arc<R>,
    cli: &Cli,
    stdin: &mut BufReader<Stdin>,
) -> Result<()> {
    let extractor = ZipExtractor::new(reader);

    let eocd = extractor.locate().await?;
    if eocd.is_empty() {
        return Err(ZipError::EmptyArchive.into());
    }

    let files = extractor.read_directory(&eocd).await?;
    if files.is_empty() {
        return Err(ZipError::EmptyFileList.into());
    }

    for (idx, file) in files.iter().enumerate() {
        println!("{}: {} {}", idx + 1, file.name, file.uncompressed_size);
    }

    if cli.list {
        return Ok(());
    }

    let index = match cli.select {
        Some(index) => index,
        None => {
            let input = prompt(
                stdin,
                &mut tokio::io::stdout(),
                "Please enter number of file to download: ",
            )
            .await?;
            match parse_selection(&input) {
                Some(index) => index,
                None => bail!("Invalid input: {:?}", input),
            }
        }
    };

    let entry = files.select(index)?;
    if !cli.quiet {
        eprintln!("Starting download of file '{}'", entry.name);
    }

    let path = extractor
        .extract_to_dir(entry, &cli.output_dir, !cli.never_overwrite)
        .await?;

    if !cli.quiet {
        eprintln!(
            "Wrote {} ({} bytes, compression method {})",
            path.display(),
            entry.compressed_size,
            entry.compression_method.as_u16()
        );
    }

    Ok(())
}

/// Format a byte size into a human-readable string.
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
