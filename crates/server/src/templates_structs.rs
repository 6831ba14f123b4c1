use askama::Template;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate<'a> {
    /// Where the form posts.
    pub endpoint: &'a str,
    /// Name the browser saves the response under.
    pub download_name: &'a str,
}
