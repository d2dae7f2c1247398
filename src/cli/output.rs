//! Output formatting for CLI commands.

use std::fmt::Write as _;
use std::io::Write;

use serde::Serialize;

use crate::cli::args::{OutputFormat, WolfArgs};
use crate::error::Result;
use crate::index::IndexStats;
use crate::ingest::IngestReport;

/// One search result as shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchEntry {
    pub title: String,
    pub snippet: String,
    pub path: String,
    pub score: f32,
}

/// Response of the search command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutput {
    pub query: String,
    pub results: Vec<SearchEntry>,
}

impl SearchOutput {
    pub fn empty<S: Into<String>>(query: S) -> Self {
        SearchOutput {
            query: query.into(),
            results: Vec::new(),
        }
    }
}

/// Response of the delete command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteOutput {
    pub path: String,
    pub deleted: bool,
    pub generation: u64,
}

/// Results that can be printed for a human reader.
pub trait HumanOutput: Serialize {
    fn render_human(&self, args: &WolfArgs) -> String;
}

impl HumanOutput for SearchOutput {
    fn render_human(&self, _args: &WolfArgs) -> String {
        let mut out = String::new();
        if self.results.is_empty() {
            out.push_str("No results.\n");
            return out;
        }

        for (i, entry) in self.results.iter().enumerate() {
            let _ = writeln!(out, "Result {}: (Score: {:.3})", i + 1, entry.score);
            let _ = writeln!(out, "title: {}", entry.title);
            let _ = writeln!(out, "path: {}", entry.path);
            let _ = writeln!(out, "{}", entry.snippet);
            out.push('\n');
        }
        out
    }
}

impl HumanOutput for IngestReport {
    fn render_human(&self, _args: &WolfArgs) -> String {
        let mut out = format!(
            "Indexed {} documents (generation {})\n",
            self.indexed, self.generation
        );
        if self.lossy > 0 {
            let _ = writeln!(out, "{} documents contained invalid UTF-8", self.lossy);
        }
        out
    }
}

impl HumanOutput for DeleteOutput {
    fn render_human(&self, _args: &WolfArgs) -> String {
        if self.deleted {
            format!("Deleted {} (generation {})\n", self.path, self.generation)
        } else {
            format!("No document with path {}\n", self.path)
        }
    }
}

impl HumanOutput for IndexStats {
    fn render_human(&self, args: &WolfArgs) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Generation: {}", self.generation);
        let _ = writeln!(out, "Committed at: {}", self.committed_at.to_rfc3339());
        let _ = writeln!(out, "Documents: {}", self.doc_count);
        let _ = writeln!(out, "Terms: {}", self.term_count);
        let _ = writeln!(out, "Postings: {}", self.posting_count);

        let detailed = matches!(&args.command, crate::cli::args::Command::Stats(s) if s.detailed);
        if detailed {
            out.push_str("Vocabulary:\n");
            for (field, size) in &self.vocabulary {
                let _ = writeln!(out, "  {field}: {size}");
            }
        }
        out
    }
}

/// Print a result to stdout in the requested format.
pub fn output_result<T: HumanOutput>(message: &str, result: &T, args: &WolfArgs) -> Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    write_result(&mut handle, message, result, args)
}

/// Write a result in the requested format.
pub fn write_result<W: Write, T: HumanOutput>(
    writer: &mut W,
    message: &str,
    result: &T,
    args: &WolfArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 1 {
                writeln!(writer, "{message}")?;
            }
            write!(writer, "{}", result.render_human(args))?;
        }
        OutputFormat::Json => {
            let json = if args.pretty {
                serde_json::to_string_pretty(result)?
            } else {
                serde_json::to_string(result)?
            };
            writeln!(writer, "{json}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(extra: &[&str]) -> WolfArgs {
        let mut argv = vec!["wolfsearch"];
        argv.extend_from_slice(extra);
        argv.push("stats");
        WolfArgs::try_parse_from(argv).unwrap()
    }

    fn sample() -> SearchOutput {
        SearchOutput {
            query: "wolves".to_string(),
            results: vec![SearchEntry {
                title: "Wolves".to_string(),
                snippet: "wolves run in packs".to_string(),
                path: "a.txt".to_string(),
                score: 0.5,
            }],
        }
    }

    #[test]
    fn test_json_output() {
        let mut buf = Vec::new();
        write_result(&mut buf, "Search results", &sample(), &args(&["-f", "json"])).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["query"], "wolves");
        assert_eq!(value["results"][0]["title"], "Wolves");
        assert_eq!(value["results"][0]["path"], "a.txt");
        assert_eq!(value["results"][0]["score"], 0.5);
    }

    #[test]
    fn test_human_output() {
        let mut buf = Vec::new();
        write_result(&mut buf, "Search results", &sample(), &args(&[])).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("Result 1: (Score: 0.500)"));
        assert!(text.contains("path: a.txt"));
        assert!(!text.contains("Search results"));
    }

    #[test]
    fn test_empty_search_output() {
        let mut buf = Vec::new();
        let empty = SearchOutput::empty("");
        write_result(&mut buf, "Search results", &empty, &args(&["-f", "json"])).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().trim(), r#"{"query":"","results":[]}"#);
    }
}
