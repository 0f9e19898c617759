//! `mailpress` - Render mail message parts from templates
//!
//! Reads a JSON manifest of templates and data, composes a message from it,
//! and prints what each part would carry.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod manifest;
mod settings;

use anyhow::{Context, Result};
use clap::Parser;
use mailpress_mime::{File, Message, Part};
use mailpress_template::Composer;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use manifest::Manifest;

/// Render mail message parts from templates.
#[derive(Debug, Parser)]
#[command(name = "mailpress", version, about)]
struct Cli {
    /// Manifest describing the message.
    manifest: PathBuf,

    /// Settings file (defaults to `<config dir>/mailpress/settings.json`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the rendered output cap, in bytes.
    #[arg(long)]
    max_output_bytes: Option<usize>,

    /// Print part contents after the summary.
    #[arg(long)]
    show_content: bool,

    /// Print contents transfer-encoded, as they would go on the wire.
    #[arg(long, requires = "show_content")]
    encoded: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailpress=info,mailpress_template=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let settings = settings::load(cli.config.as_deref())?;
    let mut config = settings.render;
    if let Some(limit) = cli.max_output_bytes {
        config = config.with_max_output_bytes(limit);
    }

    let manifest = Manifest::load(&cli.manifest)?;
    let base_dir = cli.manifest.parent().unwrap_or_else(|| Path::new("."));

    info!(manifest = %cli.manifest.display(), "Composing message");
    let message = manifest.compose(&Composer::new(config), base_dir)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    print_summary(&mut out, &message)?;
    if cli.show_content {
        print_contents(&mut out, &message, cli.encoded)?;
    }
    Ok(())
}

fn print_summary(out: &mut impl Write, message: &Message) -> Result<()> {
    if let Some(subject) = message.subject() {
        writeln!(out, "subject: {subject}")?;
    }
    if let Some(body) = message.body() {
        writeln!(out, "body: {}", describe_part(body)?)?;
    }
    for (index, part) in message.alternatives().iter().enumerate() {
        writeln!(out, "alternative[{index}]: {}", describe_part(part)?)?;
    }
    for file in message.attachments() {
        writeln!(out, "attachment: {}", describe_file(file)?)?;
    }
    for file in message.embeds() {
        writeln!(out, "embed: {}", describe_file(file)?)?;
    }
    Ok(())
}

fn describe_part(part: &Part) -> Result<String> {
    let len = part.content().context("failed to read part content")?.len();
    Ok(format!(
        "{} ({}, {len} bytes)",
        part.content_type(),
        part.encoding()
    ))
}

fn describe_file(file: &File) -> Result<String> {
    let len = file.content().context("failed to read file content")?.len();
    let mut line = format!(
        "{} {} ({}, {len} bytes)",
        file.name(),
        file.content_type(),
        file.encoding()
    );
    if let Some(cid) = file.content_id() {
        line.push_str(&format!(" cid:{cid}"));
    }
    Ok(line)
}

fn print_contents(out: &mut impl Write, message: &Message, encoded: bool) -> Result<()> {
    let parts = message.body().into_iter().chain(message.alternatives());
    for part in parts {
        writeln!(out, "\n--- {}", part.content_type())?;
        if encoded {
            part.write_encoded_to(out)?;
        } else {
            part.write_to(out)?;
        }
        writeln!(out)?;
    }
    for file in message.attachments().iter().chain(message.embeds()) {
        writeln!(out, "\n--- {} ({})", file.name(), file.disposition())?;
        if encoded {
            file.write_encoded_to(out)?;
        } else {
            file.write_to(out)?;
        }
        writeln!(out)?;
    }
    Ok(())
}
