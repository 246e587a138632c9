use super::Context;
use crate::{
    constants::FOUND_ROUTE,
    models::{read_lines, UploadHashes},
    output::write_raw,
    validate,
};
use anyhow::Result;
use std::io::Write;
use std::path::Path;

/// Read `path` into an upload payload for algorithm `algo`
pub fn build_payload(algo: &str, path: &Path) -> Result<UploadHashes> {
    Ok(UploadHashes {
        algorithm: algo.to_string(),
        hash_plain: read_lines(path)?,
    })
}

/// Upload `HASH:PLAIN` lines for algorithm `algo`
pub async fn run<W: Write>(ctx: &Context<'_>, out: &mut W, algo: &str, file: &str) -> Result<()> {
    let algo = validate::number(algo)?;
    let path = validate::file_name(file)?;
    let payload = build_payload(algo, &path)?;
    let token = ctx.token().await?;
    tracing::debug!(algorithm = algo, count = payload.hash_plain.len(), "submitting hashes");
    let body = ctx
        .transport
        .post_json(FOUND_ROUTE, &payload, Some(token.as_str()))
        .await?;
    write_raw(out, &body)?;
    Ok(())
}
