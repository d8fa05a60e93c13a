use std::path::PathBuf;

/// Everything a build depends on besides the posts themselves.
#[derive(Debug, Clone)]
pub(crate) struct Context {
    pub posts_dir: PathBuf,
    pub output_path: PathBuf,

    pub site_title: String,
    pub stylesheet: String,
    /// Year shown in the footer.
    pub year: i32,
}

impl Context {
    pub fn new(
        posts_dir: PathBuf,
        output_path: PathBuf,
        site_title: String,
        stylesheet: String,
        year: i32,
    ) -> Self {
        Self {
            posts_dir,
            output_path,
            site_title,
            stylesheet,
            year,
        }
    }
}
