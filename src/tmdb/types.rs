use serde::{Deserialize, Deserializer, Serialize};

/// A movie as returned by the metadata API. Search results leave `runtime`
/// out; the detail endpoint fills it in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub release_date: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub overview: String,
    #[serde(rename = "runtime")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_minutes: Option<i64>,
}

/// The metadata API sends `null` for unknown dates and overviews.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl MovieSummary {
    /// Year part of the release date, if the date is a valid ISO date.
    pub fn release_year(&self) -> Option<i32> {
        use chrono::Datelike;
        chrono::NaiveDate::parse_from_str(&self.release_date, "%Y-%m-%d")
            .ok()
            .map(|d| d.year())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub results: Vec<MovieSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
