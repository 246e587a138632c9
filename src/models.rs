//! Request and response bodies exchanged with the OHA server.

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Body of `/login` and `/register`
#[derive(Serialize, Clone, Copy)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Body of `/found`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UploadHashes {
    pub algorithm: String,
    #[serde(rename = "hash-plain")]
    pub hash_plain: Vec<String>,
}

/// Body of `/search`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SearchHashes {
    pub data: Vec<String>,
}

/// Body of `/manage`
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserPermissions {
    #[serde(rename = "userID")]
    pub user_id: i64,
    #[serde(rename = "canLogin")]
    pub can_login: bool,
    #[serde(rename = "canSearch")]
    pub can_search: bool,
    #[serde(rename = "canUpload")]
    pub can_upload: bool,
    #[serde(rename = "canManage")]
    pub can_manage: bool,
}

/// One match returned by `/search`
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FoundHash {
    #[serde(default)]
    pub algorithm: String,
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub plaintext: String,
}

/// The server sends the string `"[]"` instead of an array when nothing matched
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Found {
    Matches(Vec<FoundHash>),
    Sentinel(String),
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SearchResponse {
    pub found: Found,
}

impl SearchResponse {
    pub fn matches(&self) -> &[FoundHash] {
        match &self.found {
            Found::Matches(m) => m,
            Found::Sentinel(_) => &[],
        }
    }
}

/// Entry of the `/lists` index
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ListEntry {
    pub name: String,
    #[serde(default)]
    pub size: f64,
    #[serde(default)]
    pub creation_time: String,
}

/// Body of the `/lists` index
///
/// `files` must be present; `null` stands for an empty index. Any other body
/// (an `{"error": ...}` object, say) fails to parse.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ListsResponse {
    #[serde(deserialize_with = "nullable_entries")]
    pub files: Option<Vec<ListEntry>>,
}

fn nullable_entries<'de, D>(de: D) -> Result<Option<Vec<ListEntry>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::deserialize(de)
}

impl ListsResponse {
    pub fn entries(&self) -> &[ListEntry] {
        self.files.as_deref().unwrap_or_default()
    }
}

/// Split a hash file into entries, one per line
///
/// `\r\n` endings are accepted and a trailing newline adds no empty entry.
pub fn split_lines(content: &str) -> Vec<String> {
    content.lines().map(str::to_string).collect()
}

/// Read a hash file and split it into lines
///
/// Bytes that are not valid UTF-8 become U+FFFD instead of failing the read.
pub fn read_lines(path: &Path) -> anyhow::Result<Vec<String>> {
    let raw = fs::read(path).with_context(|| format!("reading hashes from {}", path.display()))?;
    Ok(split_lines(&String::from_utf8_lossy(&raw)))
}
