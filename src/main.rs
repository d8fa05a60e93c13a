use anyhow::{bail, Context as _};
use chrono::Datelike;
use clap::{command, Arg, ArgMatches};
use context::Context;
use env_logger::{Env, Target};
use std::path::PathBuf;

mod context;
mod generator;
mod metadata;
mod renderer;

fn required<'a, T: Clone + Send + Sync + 'static>(
    matches: &'a ArgMatches,
    id: &str,
) -> anyhow::Result<&'a T> {
    matches
        .get_one::<T>(id)
        .with_context(|| format!("{id} has no value"))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stdout)
        .init();

    let matches = command!()
        .args(&[
            Arg::new("posts_dir")
                .long("posts-dir")
                .help("Directory of Markdown posts")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value("_posts"),
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Path of the generated page. An existing file is overwritten.")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value("index.html"),
            Arg::new("title")
                .long("title")
                .help("Site title shown in the page header and footer")
                .default_value("My Static Blog"),
            Arg::new("stylesheet")
                .long("stylesheet")
                .help("Stylesheet referenced from the page head")
                .default_value("styles.css"),
            Arg::new("year")
                .long("year")
                .help("Year in the copyright footer [default: current year]")
                .value_parser(clap::value_parser!(i32)),
        ])
        .get_matches();

    let posts_dir: &PathBuf = required(&matches, "posts_dir")?;
    if !posts_dir.is_dir() {
        bail!("posts_dir ({posts_dir:?}) must be a directory.");
    }
    let output: &PathBuf = required(&matches, "output")?;
    if output.is_dir() {
        bail!("output ({output:?}) must be a file path, not a directory.");
    }
    let year = matches
        .get_one::<i32>("year")
        .copied()
        .unwrap_or_else(|| chrono::Local::now().year());

    let context = Context::new(
        posts_dir.to_owned(),
        output.to_owned(),
        required::<String>(&matches, "title")?.to_owned(),
        required::<String>(&matches, "stylesheet")?.to_owned(),
        year,
    );

    generator::generate(&context)?;

    Ok(())
}
