//! Command implementations for the wolfsearch CLI.

use std::sync::Arc;

use log::debug;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::WolfConfig;
use crate::document::{SiteDocument, SiteField};
use crate::error::{Result, WolfError};
use crate::index::Index;
use crate::ingest::build_index;
use crate::query::QueryParser;
use crate::search::{SearchRequest, SnippetExtractor};
use crate::storage::StorageFactory;

/// Execute a CLI command.
pub fn execute_command(args: WolfArgs) -> Result<()> {
    let config = WolfConfig::load(args.config.as_deref())?;

    match &args.command {
        Command::Index(index_args) => index_documents(index_args, &config, &args),
        Command::Search(search_args) => search_index(search_args, &config, &args),
        Command::Delete(delete_args) => delete_document(delete_args, &config, &args),
        Command::Stats(_) => show_stats(&config, &args),
    }
}

/// Open the existing index named by the arguments.
fn open_index(config: &WolfConfig, args: &WolfArgs) -> Result<Index> {
    let storage = StorageFactory::create(config.index.storage_config(&args.index_dir))?;
    if !Index::exists(storage.as_ref()) {
        return Err(WolfError::not_found(format!(
            "no index in {}; run the index command first",
            args.index_dir.display()
        )));
    }
    Index::open(storage)
}

/// Build or update the index from a documents folder.
fn index_documents(index_args: &IndexArgs, config: &WolfConfig, args: &WolfArgs) -> Result<()> {
    let index = Index::open_or_create_with(
        config.index.storage_config(&args.index_dir),
        SiteField::schema()?,
    )?;

    let report = build_index(&index_args.docs_dir, &index)?;
    index.close()?;

    output_result("Indexing finished", &report, args)
}

/// Run a query and print titles, snippets and scores.
fn search_index(search_args: &SearchArgs, config: &WolfConfig, args: &WolfArgs) -> Result<()> {
    let raw_query = search_args.query.trim();
    if raw_query.is_empty() {
        return output_result("Search results", &SearchOutput::empty(""), args);
    }

    let index = open_index(config, args)?;
    let output = run_search(&index, raw_query, search_args, config)?;
    index.close()?;

    output_result("Search results", &output, args)
}

/// Parse `raw_query` over the configured fields and build the printable results.
pub fn run_search(
    index: &Index,
    raw_query: &str,
    search_args: &SearchArgs,
    config: &WolfConfig,
) -> Result<SearchOutput> {
    let parser = QueryParser::new(Arc::clone(index.schema()), &config.search.default_fields)?;
    let query = parser.parse(raw_query)?;
    debug!("Parsed query: {query}");

    let limit = search_args
        .limit
        .map_or(config.search.max_results, |limit| limit.min(config.search.max_results));

    let searcher = index.searcher()?;
    let results = searcher.search_request(SearchRequest::new(query.clone()).max_docs(limit))?;

    let mut extractor = SnippetExtractor::new(config.search.snippet_chars);
    if search_args.centered || config.search.centered_snippets {
        if let Some(analyzer) = index.schema().analyzer(SiteField::Content.as_str()) {
            extractor = extractor.centered(Arc::clone(analyzer));
        }
    }

    let mut entries = Vec::with_capacity(results.hits.len());
    for hit in &results.hits {
        let doc = SiteDocument::from_stored(&searcher.doc(hit.doc_id)?)?;
        let snippet = extractor.extract(&doc.content, Some(&query))?;
        let title = if doc.title.is_empty() {
            doc.path.clone()
        } else {
            doc.title
        };

        entries.push(SearchEntry {
            title,
            snippet,
            path: doc.path,
            score: hit.score,
        });
    }

    Ok(SearchOutput {
        query: raw_query.to_string(),
        results: entries,
    })
}

/// Remove one document by its unique path.
fn delete_document(delete_args: &DeleteArgs, config: &WolfConfig, args: &WolfArgs) -> Result<()> {
    let index = open_index(config, args)?;

    let mut writer = index.try_writer()?;
    writer.delete_document(&delete_args.path)?;
    let stats = writer.commit()?;
    drop(writer);
    index.close()?;

    output_result(
        "Delete finished",
        &DeleteOutput {
            path: delete_args.path.clone(),
            deleted: stats.removed > 0,
            generation: stats.generation,
        },
        args,
    )
}

/// Print statistics of the committed generation.
fn show_stats(config: &WolfConfig, args: &WolfArgs) -> Result<()> {
    let index = open_index(config, args)?;
    let stats = index.stats();
    index.close()?;

    output_result("Index statistics", &stats, args)
}
