//! Markdown front-matter codec.
//!
//! File shape: `---\n` + YAML mapping + `---\n\n` + body. Reading takes the
//! first `---` ... `---` block as YAML and everything after the closing
//! delimiter line, minus the one blank separator line, as the body.
//!
//! `date` is written as a single-quoted scalar. YAML 1.1 readers resolve a
//! bare `2024-03-09` to a timestamp, and existing notes store it as a string.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const DELIMITER: &str = "---";

/// Entry metadata block. Field order is the key order written to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FrontMatter {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Splits `text` into `(yaml, body)`.
///
/// Returns `None` when the first line is not a delimiter or the block is never
/// closed.
pub fn split(text: &str) -> Option<(&str, &str)> {
    let mut lines = text.split_inclusive('\n');
    let opening = lines.next()?;
    if opening.trim() != DELIMITER {
        return None;
    }

    let yaml_start = opening.len();
    let mut offset = yaml_start;
    for line in lines {
        if line.trim() == DELIMITER {
            let yaml = &text[yaml_start..offset];
            let rest = &text[offset + line.len()..];
            let body = rest
                .strip_prefix("\r\n")
                .or_else(|| rest.strip_prefix('\n'))
                .unwrap_or(rest);
            return Some((yaml, body));
        }
        offset += line.len();
    }
    None
}

/// Decodes the metadata block and body of a note file.
pub fn parse(text: &str) -> Result<(FrontMatter, &str), String> {
    let (yaml, body) = split(text).ok_or_else(|| "missing front-matter delimiters".to_string())?;
    if yaml.trim().is_empty() {
        return Ok((FrontMatter::default(), body));
    }
    let meta = serde_yaml::from_str::<FrontMatter>(yaml).map_err(|err| err.to_string())?;
    Ok((meta, body))
}

/// Keys following `date`, serialized by `serde_yaml`.
#[derive(Serialize)]
struct TrailingKeys<'a> {
    tags: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
}

/// Encodes a note file from its metadata and body.
pub fn render(meta: &FrontMatter, body: &str) -> Result<String, serde_yaml::Error> {
    let mut yaml = String::new();
    if let Some(date) = meta.date {
        yaml.push_str(&format!("date: '{}'\n", date.format("%Y-%m-%d")));
    }
    yaml.push_str(&serde_yaml::to_string(&TrailingKeys {
        tags: meta.tags.as_deref(),
        title: meta.title.as_deref(),
    })?);
    Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n\n{body}"))
}
