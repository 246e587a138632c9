//! Character-set checks for positional arguments.
//!
//! Every value that ends up in a URL or a file path goes through one of these
//! before a request is built.

use crate::error::ValidationError;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]+$").expect("valid number regex"))
}

fn file_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_.\-/]+$").expect("valid file name regex"))
}

fn query_string_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9!@#$%^&*()_+=.\-]*$").expect("valid query string regex")
    })
}

pub fn is_number(s: &str) -> bool {
    number_re().is_match(s)
}

pub fn is_valid_file_name(s: &str) -> bool {
    file_name_re().is_match(s)
}

pub fn is_valid_query_string(s: &str) -> bool {
    query_string_re().is_match(s)
}

/// Accept a string of ASCII digits, returned unchanged.
pub fn number(arg: &str) -> Result<&str, ValidationError> {
    if is_number(arg) {
        Ok(arg)
    } else {
        Err(ValidationError::Number(arg.to_string()))
    }
}

/// Accept a file path made of safe characters that exists on disk.
///
/// The character check runs first, so a bad name is rejected whether or not
/// the file is there.
pub fn file_name(arg: &str) -> Result<PathBuf, ValidationError> {
    if !is_valid_file_name(arg) {
        return Err(ValidationError::FileName(arg.to_string()));
    }
    let path = Path::new(arg);
    if !path.exists() {
        return Err(ValidationError::FileMissing(arg.to_string()));
    }
    Ok(path.to_path_buf())
}

/// Accept an optional query string; absent means empty.
pub fn query_string(arg: Option<&str>) -> Result<String, ValidationError> {
    let arg = arg.unwrap_or_default();
    if is_valid_query_string(arg) {
        Ok(arg.to_string())
    } else {
        Err(ValidationError::QueryString(arg.to_string()))
    }
}

/// List names share the query-string charset but cannot be empty.
pub fn list_name(arg: &str) -> Result<String, ValidationError> {
    if arg.is_empty() {
        return Err(ValidationError::EmptyListName);
    }
    query_string(Some(arg))
}
