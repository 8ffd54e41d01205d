//! History command handlers.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};
use comfy_table::{ContentArrangement, Table};
use inquiro_core::chat::{HistoryEntry, HistoryId};
use inquiro_core::config::Config;
use inquiro_core::logging;
use inquiro_core::transport::Transport;
use inquiro_tui::common::text::{single_line, truncate_with_ellipsis};

const TABLE_WIDTH: u16 = 100;
const QUERY_WIDTH: usize = 40;
const RESPONSE_WIDTH: usize = 60;

pub async fn list(page: u32, per_page: Option<u32>, config: &Config) -> Result<()> {
    logging::init_stderr_logging(config);

    let page_size = per_page.unwrap_or(config.history.page_size).max(1);
    let transport = super::transport(config)?;
    let page = transport
        .list_history(page.max(1), page_size)
        .await
        .map_err(|e| super::request_failed(e, "list history"))?;

    if page.items.is_empty() {
        println!("No history found.");
    } else {
        println!("{}", entries_table(&page.items));
    }
    println!("Page {}/{}", page.page_number, page.total_pages);
    Ok(())
}

pub async fn search(query: &str, config: &Config) -> Result<()> {
    logging::init_stderr_logging(config);

    let query = query.trim();
    if query.is_empty() {
        bail!("Search query is empty");
    }

    let transport = super::transport(config)?;
    let results = transport
        .search_history(query, 1, config.search.page_size)
        .await
        .map_err(|e| super::request_failed(e, "search history"))?;

    if results.is_empty() {
        println!("No results for \"{query}\".");
    } else {
        println!("{}", entries_table(&results));
        println!("{} result(s)", results.len());
    }
    Ok(())
}

pub async fn delete(id: &str, config: &Config) -> Result<()> {
    logging::init_stderr_logging(config);

    let id = HistoryId::new(id.trim());
    let transport = super::transport(config)?;
    transport
        .delete_history(&id)
        .await
        .map_err(|e| super::request_failed(e, &format!("delete history entry {id}")))?;
    println!("Deleted {id}");
    Ok(())
}

pub async fn clear(yes: bool, config: &Config) -> Result<()> {
    logging::init_stderr_logging(config);

    if !yes && !confirm("Delete all history? [y/N] ")? {
        println!("Aborted.");
        return Ok(());
    }

    let transport = super::transport(config)?;
    transport
        .clear_history()
        .await
        .map_err(|e| super::request_failed(e, "clear history"))?;
    println!("Cleared history");
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    let mut stdout = io::stdout();
    write!(stdout, "{prompt}").context("write prompt")?;
    stdout.flush().context("flush prompt")?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("read confirmation")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "YES" | "Yes"))
}

fn entries_table(entries: &[HistoryEntry]) -> Table {
    let mut table = Table::new();
    table.set_width(TABLE_WIDTH);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Date", "Query", "Response"]);

    for entry in entries {
        table.add_row(vec![
            entry.id.to_string(),
            entry.created_at.format("%Y-%m-%d %H:%M").to_string(),
            truncate_with_ellipsis(&single_line(&entry.query), QUERY_WIDTH),
            truncate_with_ellipsis(&single_line(&entry.response), RESPONSE_WIDTH),
        ]);
    }
    table
}
