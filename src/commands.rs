//! Command implementations.
//!
//! Every command renders either human-readable lines or one JSON document to
//! the given writer, and returns the process exit code.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use docsift_config::Config;
use docsift_index::compare::diff;
use docsift_index::models::{Category, Record, SearchIndex};
use docsift_index::search::{Query, search};
use docsift_index::validate::validate;
use exn::{OptionExt, ResultExt};
use serde::Serialize;
use tracing::instrument;

use crate::cli::{Cli, Command, ExportFormat, OutputFormat};
use crate::error::{ErrorKind, Result};

const STDIN: &str = "-";

/// Exit code for a check that found errors, or a diff that found differences.
const FINDINGS: u8 = 1;

#[instrument(skip_all)]
pub fn run(cli: &Cli, config: &Config, out: &mut dyn Write) -> Result<ExitCode> {
    let format = cli.format;
    match &cli.command {
        Command::Check { file } => check(&index(file.as_deref(), config)?, format, out),
        Command::Search { words, categories, page, limit } => {
            let (file, terms) = split_words(words, config)?;
            let mut query = Query::parse(&terms.join(" ")).with_limit(limit.unwrap_or(config.search.limit));
            let categories = match categories.is_empty() {
                true => &config.search.categories,
                false => categories,
            };
            for category in categories {
                query = query.with_category(*category);
            }
            if let Some(page) = page {
                query = query.with_page(page);
            }
            find(&load(&file)?, &query, config, format, out)
        },
        Command::Show { file, position } => show(&index(file.as_deref(), config)?, *position, config, format, out),
        Command::Pages { file } => pages(&index(file.as_deref(), config)?, format, out),
        Command::Stats { file } => stats(&index(file.as_deref(), config)?, format, out),
        Command::Export { file, encoding, output } => {
            export(&index(file.as_deref(), config)?, *encoding, output.as_deref(), out)
        },
        Command::Diff { old, new } => compare(&load(old)?, &load(new)?, format, out),
    }
}

/// Loads an index from a file, or from stdin when the file is `-`.
#[instrument(skip(file), fields(file = %file.display()))]
pub fn load(file: &Path) -> Result<SearchIndex> {
    let name = || ErrorKind::Load(file.display().to_string());
    let snapshot = match file.as_os_str() == STDIN {
        true => {
            let mut bytes = Vec::new();
            std::io::stdin().read_to_end(&mut bytes).or_raise(name)?;
            docsift_index::load(bytes).or_raise(name)?
        },
        false => docsift_index::load_path(file).or_raise(name)?,
    };
    tracing::info!(hash = %snapshot.hash, records = snapshot.index.len(), "loaded index");
    Ok(snapshot.index)
}

/// Loads the named index, falling back to the configured one.
fn index(file: Option<&Path>, config: &Config) -> Result<SearchIndex> {
    load(&resolve(file, config)?)
}

fn resolve(file: Option<&Path>, config: &Config) -> Result<PathBuf> {
    file.or(config.index.as_deref()).map(Path::to_path_buf).ok_or_raise(|| ErrorKind::NoIndex)
}

/// Splits `[FILE] TERMS...`. The first word names the index only when more
/// words follow and it is `-` or an existing file.
fn split_words<'a>(words: &'a [String], config: &Config) -> Result<(PathBuf, &'a [String])> {
    match words {
        [first, terms @ ..] if !terms.is_empty() && (first == STDIN || Path::new(first).is_file()) => {
            Ok((PathBuf::from(first), terms))
        },
        _ => Ok((resolve(None, config)?, words)),
    }
}

fn json(out: &mut dyn Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).or_raise(|| ErrorKind::Output)?;
    writeln!(out).or_raise(|| ErrorKind::Output)
}

fn text(out: &mut dyn Write, lines: &[String]) -> Result<()> {
    for line in lines {
        writeln!(out, "{line}").or_raise(|| ErrorKind::Output)?;
    }
    Ok(())
}

fn check(index: &SearchIndex, format: OutputFormat, out: &mut dyn Write) -> Result<ExitCode> {
    let report = validate(index);
    match format {
        OutputFormat::Json => json(out, &report)?,
        OutputFormat::Text => {
            let mut lines: Vec<String> = report.issues.iter().map(ToString::to_string).collect();
            lines.push(format!(
                "{} records: {} errors, {} warnings",
                report.records,
                report.errors().count(),
                report.warnings().count()
            ));
            text(out, &lines)?;
        },
    }
    Ok(match report.is_ok() {
        true => ExitCode::SUCCESS,
        false => ExitCode::from(FINDINGS),
    })
}

#[derive(Serialize)]
struct HitView<'a> {
    position: usize,
    score: u32,
    #[serde(flatten)]
    record: &'a Record,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    snippet: String,
}

fn find(
    index: &SearchIndex,
    query: &Query,
    config: &Config,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<ExitCode> {
    let hits: Vec<HitView<'_>> = search(index, query)
        .into_iter()
        .map(|hit| HitView {
            position: hit.position,
            score: hit.score,
            url: config.site.base_url.as_deref().map(|base| hit.record.location.url(base)),
            snippet: hit.snippet(config.search.snippet_width),
            record: hit.record,
        })
        .collect();
    match format {
        OutputFormat::Json => json(out, &hits)?,
        OutputFormat::Text => {
            let mut lines = Vec::new();
            for hit in &hits {
                lines.push(format!("{:>5} #{} {}", hit.score, hit.position, hit.record));
                if let Some(url) = &hit.url {
                    lines.push(format!("      {url}"));
                }
                if !hit.snippet.is_empty() {
                    lines.push(format!("      {}", hit.snippet));
                }
            }
            text(out, &lines)?;
        },
    }
    Ok(ExitCode::SUCCESS)
}

fn show(
    index: &SearchIndex,
    position: usize,
    config: &Config,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<ExitCode> {
    let record = index.get(position).ok_or_raise(|| ErrorKind::NoRecord { position, records: index.len() })?;
    match format {
        OutputFormat::Json => json(out, record)?,
        OutputFormat::Text => {
            let mut lines = vec![
                format!("position: {position}"),
                format!("location: {}", record.location),
                format!("page: {}", record.page),
                format!("title: {}", record.title),
                format!("category: {}", record.category),
            ];
            if let Some(base) = &config.site.base_url {
                lines.push(format!("url: {}", record.location.url(base)));
            }
            if !record.text.is_empty() {
                lines.push(String::new());
                lines.extend(record.text.lines().map(str::to_string));
            }
            text(out, &lines)?;
        },
    }
    Ok(ExitCode::SUCCESS)
}

#[derive(Serialize)]
struct PageView<'a> {
    name: &'a str,
    path: &'a str,
    records: usize,
}

fn pages(index: &SearchIndex, format: OutputFormat, out: &mut dyn Write) -> Result<ExitCode> {
    let pages: Vec<PageView<'_>> = index
        .pages()
        .into_iter()
        .map(|page| PageView {
            name: page.name,
            path: page.positions.first().and_then(|&p| index.get(p)).map_or("", |r| r.location.path()),
            records: page.positions.len(),
        })
        .collect();
    match format {
        OutputFormat::Json => json(out, &pages)?,
        OutputFormat::Text => {
            let lines: Vec<String> =
                pages.iter().map(|page| format!("{:>5}  {}  /{}", page.records, page.name, page.path)).collect();
            text(out, &lines)?;
        },
    }
    Ok(ExitCode::SUCCESS)
}

fn stats(index: &SearchIndex, format: OutputFormat, out: &mut dyn Write) -> Result<ExitCode> {
    let stats = index.stats();
    match format {
        OutputFormat::Json => json(out, &stats)?,
        OutputFormat::Text => {
            let mut lines = vec![
                format!("records: {}", stats.records),
                format!("docstrings: {}", stats.docstrings()),
                format!("empty text: {}", stats.empty_text),
                format!("distinct locations: {}", stats.distinct_locations),
                "categories:".to_string(),
            ];
            lines.extend(
                Category::ALL
                    .iter()
                    .filter(|category| stats.count(**category) > 0)
                    .map(|category| format!("  {category}: {}", stats.count(*category))),
            );
            lines.push("pages:".to_string());
            lines.extend(stats.pages.iter().map(|(name, count)| format!("  {name}: {count}")));
            text(out, &lines)?;
        },
    }
    Ok(ExitCode::SUCCESS)
}

fn export(
    index: &SearchIndex,
    encoding: ExportFormat,
    output: Option<&Path>,
    out: &mut dyn Write,
) -> Result<ExitCode> {
    let rendered = match encoding {
        ExportFormat::Js => index.to_js(),
        ExportFormat::Json => index.to_json(true).map(|json| json + "\n"),
    }
    .or_raise(|| ErrorKind::Output)?;
    match output {
        Some(path) => std::fs::write(path, rendered).or_raise(|| ErrorKind::Output)?,
        None => out.write_all(rendered.as_bytes()).or_raise(|| ErrorKind::Output)?,
    }
    Ok(ExitCode::SUCCESS)
}

#[derive(Serialize)]
struct Entry<'a> {
    position: usize,
    #[serde(flatten)]
    record: &'a Record,
}

fn entries<'a>(records: &[(usize, &'a Record)]) -> Vec<Entry<'a>> {
    records.iter().map(|&(position, record)| Entry { position, record }).collect()
}

#[derive(Serialize)]
struct Changed<'a> {
    old_position: usize,
    new_position: usize,
    #[serde(flatten)]
    record: &'a Record,
    old_text: &'a str,
}

#[derive(Serialize)]
struct DiffView<'a> {
    added: Vec<Entry<'a>>,
    removed: Vec<Entry<'a>>,
    changed: Vec<Changed<'a>>,
    unchanged: usize,
}

fn compare(old: &SearchIndex, new: &SearchIndex, format: OutputFormat, out: &mut dyn Write) -> Result<ExitCode> {
    let result = diff(old, new);
    match format {
        OutputFormat::Json => {
            let view = DiffView {
                added: entries(&result.added),
                removed: entries(&result.removed),
                changed: result
                    .changed
                    .iter()
                    .map(|change| Changed {
                        old_position: change.old_position,
                        new_position: change.new_position,
                        record: change.new,
                        old_text: &change.old.text,
                    })
                    .collect(),
                unchanged: result.unchanged,
            };
            json(out, &view)?;
        },
        OutputFormat::Text => {
            let mut lines = Vec::new();
            lines.extend(result.removed.iter().map(|(position, record)| format!("- #{position} {record}")));
            lines.extend(result.added.iter().map(|(position, record)| format!("+ #{position} {record}")));
            lines.extend(
                result
                    .changed
                    .iter()
                    .map(|change| format!("~ #{} -> #{} {}", change.old_position, change.new_position, change.new)),
            );
            lines.push(format!(
                "{} added, {} removed, {} changed, {} unchanged",
                result.added.len(),
                result.removed.len(),
                result.changed.len(),
                result.unchanged
            ));
            text(out, &lines)?;
        },
    }
    Ok(match result.is_empty() {
        true => ExitCode::SUCCESS,
        false => ExitCode::from(FINDINGS),
    })
}
