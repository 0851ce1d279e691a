use serde::Deserialize;

/// Outcome of a form post, carried across the redirect back to the page.
#[derive(Debug, Default, Deserialize)]
pub struct FlashQuery {
    pub notice: Option<String>,
    pub error: Option<String>,
}
