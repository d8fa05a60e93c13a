use serde::Serialize;

use crate::metadata::Metadata;

/// schema.org `BlogPosting` as embedded in the page. Field order is the serialized order.
#[derive(Serialize, Debug)]
pub(super) struct BlogPosting<'a> {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub headline: &'a str,
    pub author: &'a str,
    #[serde(rename = "datePublished")]
    pub date_published: &'a str,
    pub keywords: String,
}

impl<'a> From<&'a Metadata> for BlogPosting<'a> {
    fn from(meta: &'a Metadata) -> Self {
        Self {
            context: "https://schema.org",
            kind: "BlogPosting",
            headline: &meta.title,
            author: &meta.author,
            date_published: meta.date.as_str(),
            keywords: meta.tags.join(","),
        }
    }
}
