use super::Context;
use crate::constants::HEALTH_ROUTE;
use anyhow::{Context as _, Result};
use serde_json::Value;
use std::io::Write;

/// Re-indent a `/health` body; anything that is not JSON is an error
pub fn pretty_health(body: &[u8]) -> Result<String> {
    let value: Value = serde_json::from_slice(body).with_context(|| {
        format!(
            "health response was not valid JSON: {}",
            String::from_utf8_lossy(body)
        )
    })?;
    Ok(serde_json::to_string_pretty(&value)?)
}

pub async fn run<W: Write>(ctx: &Context<'_>, out: &mut W) -> Result<()> {
    let token = ctx.token().await?;
    let body = ctx.transport.get(HEALTH_ROUTE, Some(token.as_str())).await?;
    writeln!(out, "{}", pretty_health(&body)?)?;
    Ok(())
}
