use super::Context;
use crate::{constants::REGISTER_ROUTE, output::write_raw};
use anyhow::Result;
use std::io::Write;

/// Register the configured user; the only verb that skips `/login`
pub async fn run<W: Write>(ctx: &Context<'_>, out: &mut W) -> Result<()> {
    let body = ctx
        .transport
        .post_json(REGISTER_ROUTE, &ctx.config.credentials(), None)
        .await?;
    write_raw(out, &body)?;
    Ok(())
}
