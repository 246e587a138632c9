use super::Context;
use crate::{constants::LISTS_ROUTE, output::write_raw, validate};
use anyhow::{Context as _, Result};
use std::fs;
use std::io::Write;

/// Upload `file` as a new private list called `name`; bytes are sent untouched
pub async fn run<W: Write>(ctx: &Context<'_>, out: &mut W, name: &str, file: &str) -> Result<()> {
    let name = validate::list_name(name)?;
    let path = validate::file_name(file)?;
    let token = ctx.token().await?;
    let content = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
    let body = ctx
        .transport
        .post(
            &format!("{LISTS_ROUTE}?name={name}"),
            content,
            Some(token.as_str()),
        )
        .await?;
    write_raw(out, &body)?;
    Ok(())
}
