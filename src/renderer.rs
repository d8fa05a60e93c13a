use pulldown_cmark::{html, Options, Parser};

fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Converts a post body to an HTML fragment. Malformed markup is rendered best-effort.
pub(crate) fn render_markdown(body: &str) -> String {
    let parser = Parser::new_ext(body, markdown_options());

    let mut body_html = String::with_capacity(body.len() * 3 / 2);
    html::push_html(&mut body_html, parser);
    body_html
}
