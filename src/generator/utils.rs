use std::{borrow::Borrow, cmp::Ordering};

use log::debug;
use maud::{html, Markup, PreEscaped};

use crate::metadata::Metadata;

use super::data::BlogPosting;

/// Newest first. Used with a stable sort, so equal dates keep their loading order.
pub(super) fn sort_article<T: Borrow<Metadata>>(a: &T, b: &T) -> Ordering {
    b.borrow()
        .date
        .timestamp()
        .cmp(&a.borrow().date.timestamp())
}

pub(super) fn render_jsonld(meta: &Metadata) -> anyhow::Result<Markup> {
    // `<\/` is the same JSON string but cannot close the surrounding <script>.
    let json = serde_json::to_string_pretty(&BlogPosting::from(meta))?.replace("</", "<\\/");
    debug!("Generated JSON-LD for {:?}:\n{json}", meta.title);

    Ok(html! {
        script type="application/ld+json" {
            "\n" (PreEscaped(json)) "\n"
        }
    })
}

/// One post block followed by its separator.
// title, author and tags are trusted front matter and are emitted without escaping.
pub(super) fn render_article(meta: &Metadata) -> anyhow::Result<Markup> {
    let jsonld = render_jsonld(meta)?;

    Ok(html! {
        article {
            header {
                h2 { (PreEscaped(&meta.title)) }
                p { "By " (PreEscaped(&meta.author)) " on " (meta.date.as_str()) }
                p { "Tags: " (PreEscaped(meta.tags.join(", "))) }
            }
            (jsonld)
            section {
                (PreEscaped(&meta.body_html))
            }
        }
        hr;
    })
}
