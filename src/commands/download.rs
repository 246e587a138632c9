use super::Context;
use crate::{constants::DOWNLOAD_ROUTE, output::write_raw, validate};
use anyhow::Result;
use std::io::Write;

/// Server-side files that can be fetched in slices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Wordlist,
    Rules,
    Masks,
}

impl Resource {
    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Wordlist => "wordlist",
            Resource::Rules => "rules",
            Resource::Masks => "masks",
        }
    }
}

/// `/download/{resource}/{num}?{query}`; the `?` is sent even for an empty query
pub fn download_path(resource: Resource, num: &str, query: &str) -> String {
    format!("{DOWNLOAD_ROUTE}/{}/{num}?{query}", resource.as_str())
}

pub async fn run<W: Write>(
    ctx: &Context<'_>,
    out: &mut W,
    resource: Resource,
    num: &str,
    query: Option<&str>,
) -> Result<()> {
    let num = validate::number(num)?;
    let query = validate::query_string(query)?;
    let token = ctx.token().await?;
    let body = ctx
        .transport
        .get(&download_path(resource, num, &query), Some(token.as_str()))
        .await?;
    write_raw(out, &body)?;
    Ok(())
}
