use super::Context;
use crate::{constants::STATUS_ROUTE, output::write_raw};
use anyhow::Result;
use std::io::Write;

pub async fn run<W: Write>(ctx: &Context<'_>, out: &mut W) -> Result<()> {
    let token = ctx.token().await?;
    let body = ctx.transport.get(STATUS_ROUTE, Some(token.as_str())).await?;
    write_raw(out, &body)?;
    Ok(())
}
