use serde::{Deserialize, Serialize};

/// Where poster images live. Posters are fetched by the client straight from
/// the image host, so swapping hosts only means changing this config.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImageConfig {
    #[serde(default = "default_base_url", alias = "baseurl")]
    pub base_url: String,
    #[serde(default = "default_card_size", alias = "cardsize")]
    pub card_size: String,
    #[serde(default = "default_list_size", alias = "listsize")]
    pub list_size: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            card_size: default_card_size(),
            list_size: default_list_size(),
        }
    }
}

fn default_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_card_size() -> String {
    "w500".to_string()
}

fn default_list_size() -> String {
    "w200".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosterSize {
    /// Result cards and the detail view.
    Card,
    /// Rows in the favorites list.
    List,
}

impl ImageConfig {
    pub fn size(&self, size: PosterSize) -> &str {
        match size {
            PosterSize::Card => &self.card_size,
            PosterSize::List => &self.list_size,
        }
    }

    pub fn poster_url(&self, poster_path: Option<&str>, size: PosterSize) -> Option<String> {
        let path = poster_path.filter(|p| !p.is_empty())?;
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            Some(format!("{}/{}{}", base, self.size(size), path))
        } else {
            Some(format!("{}/{}/{}", base, self.size(size), path))
        }
    }
}
