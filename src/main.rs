use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;

use lineweave::complete::{find_word, CompletionResolver, Proposal};
use lineweave::config::EditorConfig;
use lineweave::storage::default_history_path;
use lineweave::syntax::KeywordHighlighter;
use lineweave::{LineReader, ReadError};

const NAMES: &[&str] = &[
    "Alice", "Andrew", "Ann", "Anna", "Anthony", "Bob", "Brian", "Carol", "Mary", "Maryann",
];
const KEYWORDS: &[&str] = &["SELECT", "FROM", "WHERE", "ORDER", "GROUP", "BY", "LIMIT"];

/// Completes names and keywords. A word like `lo25` offers 25 generated
/// entries to exercise paging.
struct DemoResolver {
    many: Regex,
}

impl DemoResolver {
    fn new() -> Result<Self> {
        Ok(Self {
            many: Regex::new(r"^lo(\d+)$")?,
        })
    }

    fn matching(list: &[&str], prefix: &str) -> Vec<String> {
        let prefix = prefix.to_lowercase();
        list.iter()
            .filter(|w| w.to_lowercase().starts_with(&prefix))
            .map(|w| w.to_string())
            .collect()
    }
}

impl CompletionResolver for DemoResolver {
    fn resolve(&mut self, lines: &[String], line: usize, col: usize) -> (String, Proposal) {
        let (word, start, end) = find_word(lines, line, col);

        if let Some(count) = self
            .many
            .captures(&word)
            .and_then(|c| c.get(1)?.as_str().parse::<usize>().ok())
        {
            let items = (1..=count).map(|i| format!("lo{:04}", i)).collect();
            let proposal = Proposal::single_word(word.clone(), col, start, end).with_category("generated", items);
            return (format!("{} generated entries", count), proposal);
        }

        let names = Self::matching(NAMES, &word);
        let keywords = Self::matching(KEYWORDS, &word);
        match (names.len(), keywords.len()) {
            (0, 0) => (String::new(), Proposal::default()),
            (1, 0) => (String::new(), Proposal::single_word(names[0].clone(), col, start, end)),
            (0, 1) => (String::new(), Proposal::single_word(keywords[0].clone(), col, start, end)),
            (0, _) => (String::new(), Proposal::words("keywords", keywords, col, start, end, false)),
            (_, 0) => (String::new(), Proposal::words("names", names, col, start, end, false)),
            _ => {
                let proposal = Proposal::single_word(word.clone(), col, start, end)
                    .with_category("names", names)
                    .with_category("keywords", keywords);
                (String::new(), proposal)
            }
        }
    }
}

/// Input is complete once the last line ends with a semicolon and the
/// cursor is on it
fn ends_with_semicolon(lines: &[String], line: usize, _col: usize) -> bool {
    line + 1 == lines.len() && lines.last().is_some_and(|l| l.trim_end().ends_with(';'))
}

/// Log to a file; the terminal belongs to the editor
fn init_logging(log_dir: &Path) -> Option<WorkerGuard> {
    std::fs::create_dir_all(log_dir).ok()?;
    let file_appender = tracing_appender::rolling::never(log_dir, "lineweave.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .with_ansi(false)
        .try_init()
        .ok()?;
    Some(guard)
}

fn main() -> Result<()> {
    let log_dir = dirs::data_dir()
        .unwrap_or_else(|| Path::new(".").to_path_buf())
        .join("lineweave");
    let _log_guard = init_logging(&log_dir);

    let mut config = EditorConfig::load()?;
    if config.history_file.is_none() {
        config.history_file = default_history_path();
    }
    if config.next_prompt.is_empty() {
        config.next_prompt = "-> ".to_string();
    }

    let mut reader = LineReader::new(&config).context("setting up the line reader")?;
    let editor = reader.editor_mut();
    editor.set_input_check(ends_with_semicolon);
    editor.set_resolver(DemoResolver::new()?);
    editor.set_highlighter(KeywordHighlighter::sql());

    if let Err(e) = reader.load_history() {
        warn!(error = %e, "history not loaded");
        eprintln!("warning: {}", e);
    }

    println!("Statements end with ';'. Tab completes, Ctrl+R searches, Ctrl+D exits.");
    loop {
        match reader.read_line() {
            Ok(input) => {
                if input.trim().is_empty() {
                    continue;
                }
                println!("{}", input);
                reader.add_history(&input)?;
            }
            Err(ReadError::Interrupted) => println!("^C"),
            Err(ReadError::EndOfInput) => break,
            Err(e) => return Err(e.into()),
        }
    }

    reader.save_history()?;
    Ok(())
}
