use std::{
    ffi::OsStr,
    fs::OpenOptions,
    io::{BufWriter, Write},
    path::Path,
    sync::OnceLock,
};

use anyhow::Context as _;
use log::info;
use maud::{html, PreEscaped, DOCTYPE};
use regex::{Regex, RegexBuilder};

use crate::{
    context::Context,
    metadata::{FrontMatter, Metadata},
    renderer::render_markdown,
};

use self::utils::{render_article, sort_article};

mod data;
mod utils;

fn front_matter_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        RegexBuilder::new(r"\A---[ \t]*\r?\n(.*?)^---[ \t]*(?:\r?\n|\z)(.*)")
            .multi_line(true)
            .dot_matches_new_line(true)
            .build()
            .unwrap()
    })
}

/// Splits a post into its front matter block and body. Without a leading `---` block the header is empty.
fn split_front_matter(content: &str) -> (&str, &str) {
    match front_matter_pattern().captures(content) {
        Some(caps) => {
            let header = caps.get(1).map_or("", |m| m.as_str());
            let body = caps.get(2).map_or("", |m| m.as_str());
            (header, body)
        }
        None => ("", content),
    }
}

fn preprocess_file(path: &Path) -> anyhow::Result<Metadata> {
    let content = std::fs::read_to_string(path)?;
    let (header, body) = split_front_matter(&content);
    let front_matter = FrontMatter::parse(header).context("Invalid front matter")?;

    let mut metadata = Metadata::validate(path, front_matter, body.to_string())?;
    metadata.body_html = render_markdown(&metadata.body);

    Ok(metadata)
}

/// Reads every `.md` file in `posts_dir`, in directory order. Any bad post aborts the whole load.
fn load_posts(posts_dir: &Path) -> anyhow::Result<Vec<Metadata>> {
    info!("Reading Markdown files from {posts_dir:?}...");
    let entries = std::fs::read_dir(posts_dir)
        .and_then(|dir| dir.collect::<Result<Vec<_>, _>>())
        .with_context(|| format!("while reading {posts_dir:?}"))?;
    info!("Found {} entries.", entries.len());

    let mut posts = vec![];
    for entry in entries {
        let path = entry.path();
        if !path.is_file() || path.extension() != Some(OsStr::new("md")) {
            continue;
        }

        info!("Processing file: {:?}", entry.file_name());
        let post =
            preprocess_file(&path).with_context(|| format!("while preprocessing {path:?}"))?;
        posts.push(post);
    }

    Ok(posts)
}

/// Assembles the page. `posts` must already be in display order.
fn render_page(ctx: &Context, posts: &[Metadata]) -> anyhow::Result<String> {
    let articles = posts
        .iter()
        .map(|post| {
            render_article(post).with_context(|| format!("while rendering {:?}", post.path))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let page = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (ctx.site_title) }
                link rel="stylesheet" href=(ctx.stylesheet);
            }
            body {
                header {
                    h1 { (ctx.site_title) }
                }
                main {
                    @for article in &articles {
                        (article)
                    }
                }
                footer {
                    p { (PreEscaped("&copy; ")) (ctx.year) " " (ctx.site_title) }
                }
            }
        }
    };

    Ok(page.into_string())
}

/// Replaces the file at `path`. Not atomic.
fn write_page(path: &Path, page: &str) -> anyhow::Result<()> {
    let fd = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("while opening {path:?}"))?;
    let mut writer = BufWriter::new(fd);
    writer
        .write_all(page.as_bytes())
        .and_then(|_| writer.flush())
        .with_context(|| format!("while writing {path:?}"))?;

    Ok(())
}

/// Runs the whole build and returns the number of posts written.
pub(crate) fn generate(ctx: &Context) -> anyhow::Result<usize> {
    let mut posts = load_posts(&ctx.posts_dir)?;

    // ordering by date (descending); `sort_by` is stable, so ties keep directory order.
    posts.sort_by(sort_article);
    info!("All {} post(s) have been processed and sorted.", posts.len());

    let page = render_page(ctx, &posts).context("while generating the page")?;
    write_page(&ctx.output_path, &page)?;
    info!("{:?} has been written to the filesystem.", ctx.output_path);

    Ok(posts.len())
}
