//! arXiv literature search tool
//!
//! Queries the arXiv Atom API and renders the top results as a spoken-reply
//! friendly list.

use std::time::Duration;

use crate::Result;

use super::ToolResult;

/// Bounded ceiling for the outbound request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const ARXIV_API_URL: &str = "http://export.arxiv.org/api/query";

/// Ranked results returned per query
const MAX_RESULTS: usize = 5;

/// Summaries are truncated to this many characters
const SUMMARY_LIMIT: usize = 200;

/// One parsed Atom entry
#[derive(Debug)]
struct Paper {
    title: String,
    authors: String,
    summary: String,
    published: String,
}

/// Searches arXiv for papers matching a query.
pub struct ArxivSearchTool {
    client: reqwest::Client,
}

impl ArxivSearchTool {
    /// Create the tool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Search for `query`, returning up to five ranked results.
    ///
    /// Empty queries and zero-result searches are reported failures with an
    /// explanatory message; network and parse errors likewise.
    pub async fn search(&self, query: &str) -> ToolResult {
        let query = query.trim();
        if query.is_empty() {
            return ToolResult::failure("Please provide a search query for arXiv papers.");
        }

        match self.fetch(query).await {
            Ok(papers) if papers.is_empty() => {
                ToolResult::failure(format!("No papers found for query: '{query}'"))
            }
            Ok(papers) => ToolResult::success(render(query, &papers)),
            Err(e) => ToolResult::failure(format!("arXiv search error: {e}")),
        }
    }

    async fn fetch(&self, query: &str) -> Result<Vec<Paper>> {
        let url = format!(
            "{ARXIV_API_URL}?search_query=all:{}&start=0&max_results={MAX_RESULTS}\
             &sortBy=relevance&sortOrder=descending",
            urlencoding::encode(query)
        );

        tracing::debug!(query = %query, "querying arXiv");

        let body = self
            .client
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_feed(&body)
    }
}

impl Default for ArxivSearchTool {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an Atom feed into papers.
///
/// Elements are matched by local name so the Atom namespace prefix form
/// doesn't matter.
fn parse_feed(xml: &str) -> Result<Vec<Paper>> {
    let doc = roxmltree::Document::parse(xml)?;

    let mut papers = Vec::new();
    for entry in doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "entry")
    {
        let title = child_text(entry, "title");
        let summary = child_text(entry, "summary");
        let published = child_text(entry, "published");

        let authors: Vec<String> = entry
            .children()
            .filter(|n| n.is_element() && n.tag_name().name() == "author")
            .map(|author| child_text(author, "name"))
            .filter(|name| !name.is_empty())
            .collect();

        papers.push(Paper {
            title,
            authors: authors.join(", "),
            summary: truncate(&summary, SUMMARY_LIMIT),
            published: published.chars().take(10).collect(),
        });
    }

    Ok(papers)
}

/// Trimmed, whitespace-collapsed text of the first child element with the
/// given local name
fn child_text(node: roxmltree::Node<'_, '_>, name: &str) -> String {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
        .and_then(|n| n.text())
        .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default()
}

/// Truncate on a char boundary with a trailing ellipsis
fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        let mut cut: String = text.chars().take(limit).collect();
        cut.push_str("...");
        cut
    } else {
        text.to_string()
    }
}

/// Render the ranked result list
fn render(query: &str, papers: &[Paper]) -> String {
    let mut out = format!("Found {} papers for '{query}':\n\n", papers.len());
    for (i, paper) in papers.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, paper.title));
        out.push_str(&format!("   Authors: {}\n", paper.authors));
        out.push_str(&format!("   Published: {}\n", paper.published));
        out.push_str(&format!("   Summary: {}\n\n", paper.summary));
    }
    out.trim_end().to_string()
}
