use super::Context;
use crate::{
    constants::SEARCH_ROUTE,
    models::{read_lines, SearchHashes, SearchResponse},
    output::write_raw,
    validate,
};
use anyhow::Result;
use std::io::Write;

/// One `algorithm | hash:plaintext` line per match
pub fn render_matches(resp: &SearchResponse) -> Vec<String> {
    resp.matches()
        .iter()
        .map(|m| format!("{} | {}:{}", m.algorithm, m.hash, m.plaintext))
        .collect()
}

/// Look up every hash in `file`
///
/// A body that is not a search result (usually a server error) is printed
/// unchanged.
pub async fn run<W: Write>(ctx: &Context<'_>, out: &mut W, file: &str) -> Result<()> {
    let path = validate::file_name(file)?;
    let payload = SearchHashes {
        data: read_lines(&path)?,
    };
    let token = ctx.token().await?;
    let body = ctx
        .transport
        .post_json(SEARCH_ROUTE, &payload, Some(token.as_str()))
        .await?;

    match serde_json::from_slice::<SearchResponse>(&body) {
        Ok(resp) => {
            for line in render_matches(&resp) {
                writeln!(out, "{line}")?;
            }
        }
        Err(err) => {
            tracing::debug!(error = %err, "search response not understood");
            write_raw(out, &body)?;
        }
    }
    Ok(())
}
