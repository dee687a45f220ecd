use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether a cinema record is a film or a TV show. Stored as a string
/// column; the wire form is lowercase ("movie" / "tv").
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[sea_orm(string_value = "movie")]
    Movie,
    #[sea_orm(string_value = "tv")]
    Tv,
}

impl MediaKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "movie" => Some(Self::Movie),
            "tv" => Some(Self::Tv),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }
}

/// Estimated game difficulty. RAWG has no difficulty field; this is always
/// derived from average playtime and may be absent.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Difficulty {
    #[sea_orm(string_value = "Easy")]
    Easy,
    #[sea_orm(string_value = "Medium")]
    Medium,
    #[sea_orm(string_value = "Hard")]
    Hard,
}

impl Difficulty {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Easy" => Some(Self::Easy),
            "Medium" => Some(Self::Medium),
            "Hard" => Some(Self::Hard),
            _ => None,
        }
    }

    /// Playtime heuristic: under 10 hours is Easy, 10-30 is Medium, over 30
    /// is Hard. Zero or missing playtime yields no estimate.
    #[must_use]
    pub fn from_playtime(playtime: Option<i32>) -> Option<Self> {
        match playtime {
            None | Some(0) => None,
            Some(hours) if hours < 10 => Some(Self::Easy),
            Some(hours) if hours <= 30 => Some(Self::Medium),
            Some(_) => Some(Self::Hard),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub year: i32,
    pub director: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<i32>,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub title: String,
    pub artist: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    /// Total duration in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub title: String,
    pub platform: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    /// Only available from search results; the works endpoint has no page
    /// counts, so detail lookups leave this unset.
    #[serde(rename = "totalPages", skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<i32>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub city: String,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    pub url: Option<String>,
}

/// Paginated response envelope shared by content endpoints and repositories.
#[derive(Debug, Serialize)]
pub struct PageResult<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

/// Extract a 4-digit year from a date string like "2019-07-02".
/// Returns 0 when the year cannot be parsed.
#[must_use]
pub fn parse_year(date: &str) -> i32 {
    date.get(..4).and_then(|y| y.parse().ok()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_heuristic_boundaries() {
        assert_eq!(Difficulty::from_playtime(Some(5)), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_playtime(Some(9)), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_playtime(Some(10)), Some(Difficulty::Medium));
        assert_eq!(Difficulty::from_playtime(Some(30)), Some(Difficulty::Medium));
        assert_eq!(Difficulty::from_playtime(Some(31)), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_playtime(Some(0)), None);
        assert_eq!(Difficulty::from_playtime(None), None);
    }

    #[test]
    fn difficulty_parse_rejects_unknown() {
        assert_eq!(Difficulty::parse("Medium"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::parse("medium"), None);
        assert_eq!(Difficulty::parse(""), None);
    }

    #[test]
    fn media_kind_round_trip() {
        assert_eq!(MediaKind::parse("tv"), Some(MediaKind::Tv));
        assert_eq!(MediaKind::parse("movie"), Some(MediaKind::Movie));
        assert_eq!(MediaKind::parse("person"), None);
        assert_eq!(MediaKind::Tv.as_str(), "tv");
    }

    #[test]
    fn year_parsing() {
        assert_eq!(parse_year("2019-07-02"), 2019);
        assert_eq!(parse_year("1999"), 1999);
        assert_eq!(parse_year(""), 0);
        assert_eq!(parse_year("n/a"), 0);
    }

    #[test]
    fn movie_serializes_wire_shape() {
        let movie = Movie {
            id: "27205".to_string(),
            title: "Inception".to_string(),
            year: 2010,
            director: "Christopher Nolan".to_string(),
            poster: None,
            season: None,
            episode: None,
            kind: MediaKind::Movie,
            url: Some("https://www.themoviedb.org/movie/27205".to_string()),
        };

        let json = serde_json::to_value(&movie).unwrap();
        assert_eq!(json["type"], "movie");
        assert_eq!(json["year"], 2010);
        assert!(json.get("poster").is_none());
        assert!(json.get("season").is_none());
    }
}
