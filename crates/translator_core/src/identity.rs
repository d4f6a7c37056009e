use std::fmt;

use url::Url;

/// Identity of the conversation currently on screen: page URL plus visible
/// chat title. Only compared for equality to detect navigation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatIdentity {
    url: String,
    title: Option<String>,
}

impl ChatIdentity {
    pub fn new(url: &str, title: Option<&str>) -> Self {
        Self {
            url: normalize_location(url),
            title: title
                .map(str::trim)
                .filter(|title| !title.is_empty())
                .map(ToOwned::to_owned),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

impl fmt::Display for ChatIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.title {
            Some(title) => write!(f, "{}_{}", self.url, title),
            None => write!(f, "{}", self.url),
        }
    }
}

/// Chat clients keep the conversation in the fragment, so it is preserved;
/// only scheme/host casing and default ports are canonicalized.
fn normalize_location(raw: &str) -> String {
    let trimmed = raw.trim();
    match Url::parse(trimmed) {
        Ok(url) => url.to_string(),
        Err(_) => trimmed.to_string(),
    }
}
