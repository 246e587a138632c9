use super::Context;
use crate::{
    constants::LISTS_ROUTE,
    models::ListsResponse,
    output::{heading, success, write_raw},
    validate,
};
use anyhow::Result;
use std::io::Write;

pub fn render_entries(resp: &ListsResponse) -> Vec<String> {
    resp.entries()
        .iter()
        .map(|e| {
            format!(
                "Name: {} | Size: {:.0} | Created: {}",
                e.name, e.size, e.creation_time
            )
        })
        .collect()
}

/// Without a name print the index of private lists, otherwise the raw content
/// of that list
pub async fn run<W: Write>(ctx: &Context<'_>, out: &mut W, name: Option<&str>) -> Result<()> {
    let name = name.map(validate::list_name).transpose()?;
    let token = ctx.token().await?;

    let Some(name) = name else {
        let body = ctx.transport.get(LISTS_ROUTE, Some(token.as_str())).await?;
        match serde_json::from_slice::<ListsResponse>(&body) {
            Ok(resp) => {
                writeln!(out, "{}", heading("Private Files Listing:"))?;
                for line in render_entries(&resp) {
                    writeln!(out, "{}", success(&line))?;
                }
            }
            Err(err) => {
                tracing::debug!(error = %err, "lists response not understood");
                write_raw(out, &body)?;
            }
        }
        return Ok(());
    };

    let body = ctx
        .transport
        .get(&format!("{LISTS_ROUTE}/{name}"), Some(token.as_str()))
        .await?;
    write_raw(out, &body)?;
    Ok(())
}
