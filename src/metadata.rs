use std::{
    fmt,
    path::{Path, PathBuf},
};

use anyhow::bail;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::{info, warn};
use serde::Deserialize;
use serde_yaml::Value;

/// Tags beyond this count are dropped.
pub(crate) const MAX_TAGS: usize = 5;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

// YAML timestamps: the offset may follow a space and be written as `+HH`, `+HHMM` or `+HH:MM`.
const OFFSET_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f %#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M:%S%.f %#z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
];

/// Front matter as written in the file, before any validation.
#[derive(Deserialize, Debug, Default)]
pub(crate) struct FrontMatter {
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub author: Option<Value>,
    #[serde(default)]
    pub date: Option<Value>,
    #[serde(default)]
    pub tags: Option<Value>,
}

impl FrontMatter {
    pub fn parse(header: &str) -> anyhow::Result<Self> {
        if header.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value = serde_yaml::from_str(header)?;
        match value {
            Value::Null => Ok(Self::default()),
            Value::Mapping(_) => Ok(serde_yaml::from_value(value)?),
            _ => bail!("front matter must be a mapping of keys to values"),
        }
    }
}

/// Publication date of a post: the timestamp used for ordering and the text shown on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PostDate {
    at: NaiveDateTime,
    text: String,
}

impl PostDate {
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let at = NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|d| d.naive_utc()))
            .or_else(|| {
                OFFSET_DATETIME_FORMATS
                    .iter()
                    .find_map(|f| DateTime::parse_from_str(text, f).ok())
                    .map(|d| d.naive_utc())
            })
            .or_else(|| {
                DATETIME_FORMATS
                    .iter()
                    .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
            })?;

        Some(Self {
            at,
            text: text.to_string(),
        })
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.at
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for PostDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Metadata {
    pub title: String,
    pub author: String,
    pub date: PostDate,
    pub tags: Vec<String>,
    pub path: PathBuf,
    pub body: String,
    pub body_html: String,
}

impl Metadata {
    /// Checks the required fields and normalizes tags. `body_html` is left empty for the renderer.
    pub fn validate(path: &Path, front_matter: FrontMatter, body: String) -> anyhow::Result<Self> {
        let title = present(front_matter.title);
        let author = present(front_matter.author);
        let date = present(front_matter.date);
        let tags = present(front_matter.tags);

        let (title, author, date, tags) = match (title, author, date, tags) {
            (Some(title), Some(author), Some(date), Some(tags)) => (title, author, date, tags),
            (title, author, date, tags) => {
                let missing: Vec<_> = [
                    ("title", title.is_none()),
                    ("author", author.is_none()),
                    ("date", date.is_none()),
                    ("tags", tags.is_none()),
                ]
                .into_iter()
                .filter(|(_, missing)| *missing)
                .map(|(name, _)| name)
                .collect();
                bail!(
                    "Post {:?} is missing required metadata: {}",
                    path,
                    missing.join(", ")
                );
            }
        };

        let title = value_to_text(&title);
        let author = value_to_text(&author);
        let date_text = value_to_text(&date);
        let Some(date) = PostDate::parse(&date_text) else {
            bail!("Post {:?} has an invalid date: {:?}", path, date_text);
        };
        let tags = normalize_tags(&title, tags);

        info!(
            "Extracted metadata: Title={title:?}, Author={author:?}, Date={:?}, Tags={tags:?}",
            date.as_str()
        );

        Ok(Self {
            title,
            author,
            date,
            tags,
            path: path.to_path_buf(),
            body,
            body_html: String::new(),
        })
    }
}

/// Absent, null, false, zero and empty-string values all count as missing.
fn present(value: Option<Value>) -> Option<Value> {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => None,
        Some(Value::String(ref s)) if s.is_empty() => None,
        Some(Value::Number(ref n)) if n.as_f64() == Some(0.0) => None,
        v => v,
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

fn normalize_tags(title: &str, tags: Value) -> Vec<String> {
    let Value::Sequence(tags) = tags else {
        warn!("Post {title:?} has invalid tags format. Expected a list. Converting to an empty list.");
        return vec![];
    };
    if tags.len() > MAX_TAGS {
        warn!("Post {title:?} has more than {MAX_TAGS} tags. Only the first {MAX_TAGS} will be included.");
    }

    tags.iter().take(MAX_TAGS).map(value_to_text).collect()
}
