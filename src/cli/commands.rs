use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use serde_json::Value;
use time::UtcOffset;

use crate::config::AppConfig;
use crate::datetime;
use crate::value::{self, PlainValue};

#[derive(Args, Debug, Clone)]
pub struct FormatTimeArgs {
    /// Timestamp to render (RFC 3339, RFC 2822 or YYYY-MM-DD)
    pub time: String,
    /// Render in UTC instead of the local time zone
    #[arg(long)]
    pub utc: bool,
}

#[derive(Args, Debug, Clone)]
pub struct HighlightArgs {
    /// Text to scan
    pub text: String,
    /// Literal, case-sensitive search term
    pub search: String,
}

#[derive(Args, Debug, Clone)]
pub struct PathArgs {
    /// Asset URL to convert
    pub url: String,
    /// Strip the API base URL instead of prepending it
    #[arg(long)]
    pub relative: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SetIdArgs {
    /// JSON file holding an array of records. Reads stdin when omitted.
    pub file: Option<PathBuf>,
}

pub fn format_time(args: &FormatTimeArgs) -> Result<String> {
    let rendered = if args.utc {
        datetime::format_time_in(&args.time, UtcOffset::UTC)
    } else {
        datetime::format_time(&args.time)
    };
    rendered.context("formatting timestamp")
}

pub fn highlight(config: &AppConfig, args: &HighlightArgs) -> String {
    config
        .highlighter(&args.search)
        .keywords(&args.text)
        .into_owned()
}

pub fn path(config: &AppConfig, args: &PathArgs) -> String {
    config
        .path_normalizer()
        .complete_image_path(&args.url, !args.relative)
}

pub fn set_id(args: &SetIdArgs) -> Result<String> {
    let raw = match &args.file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading records from {}", path.display()))?,
        None => match read_stdin()? {
            Some(raw) => raw,
            None => bail!("expected a JSON array on stdin or a file argument"),
        },
    };
    number_records(&raw)
}

pub fn nav(config: &AppConfig) -> Result<String> {
    serde_json::to_string_pretty(&config.nav_bar()).context("serializing navigation bar")
}

fn number_records(raw: &str) -> Result<String> {
    let parsed: Value = serde_json::from_str(raw).context("parsing records json")?;
    let PlainValue::Sequence(records) = PlainValue::from(parsed) else {
        bail!("records json must be an array");
    };
    let numbered = value::set_id(&records).context("assigning ids")?;
    let json = PlainValue::Sequence(numbered)
        .to_json()
        .context("converting records back to json")?;
    serde_json::to_string_pretty(&json).context("serializing numbered records")
}

fn read_stdin() -> Result<Option<String>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("reading stdin")?;
    Ok(Some(buf))
}
