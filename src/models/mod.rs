use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use movie::{MovieDetail, SearchResult};

mod movie;

pub const NO_RECOMMENDATION_MESSAGE: &str =
    "Unable to find a movie recommendation at this time. Please try again later.";

const UNKNOWN: &str = "Unknown";

/// Normalized recommendation record, independent of the upstream field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub year: String,
    pub genre: String,
    pub plot: String,
    pub director: String,
    pub actors: String,
    pub rating: String,
    pub poster: String,
    pub imdb_id: String,
    pub recommendation_reason: String,
}

impl From<MovieDetail> for Recommendation {
    fn from(movie: MovieDetail) -> Self {
        Self {
            title: movie.title.unwrap_or_else(|| UNKNOWN.to_string()),
            year: movie.year.unwrap_or_else(|| UNKNOWN.to_string()),
            genre: movie.genre.unwrap_or_else(|| UNKNOWN.to_string()),
            plot: movie
                .plot
                .unwrap_or_else(|| "No plot available".to_string()),
            director: movie.director.unwrap_or_else(|| UNKNOWN.to_string()),
            actors: movie.actors.unwrap_or_else(|| UNKNOWN.to_string()),
            rating: movie.rating.unwrap_or_else(|| "N/A".to_string()),
            poster: movie.poster.unwrap_or_default(),
            imdb_id: movie.imdb_id.unwrap_or_default(),
            recommendation_reason: "Random recommendation".to_string(),
        }
    }
}

/// Either a full recommendation or the single-key error shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RecommendationOutcome {
    Found(Recommendation),
    Unavailable { error: String },
}

impl RecommendationOutcome {
    pub fn unavailable() -> Self {
        RecommendationOutcome::Unavailable {
            error: NO_RECOMMENDATION_MESSAGE.to_string(),
        }
    }
}

/// Body of `GET /recommend`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RecommendResponse {
    Recommended {
        #[serde(flatten)]
        recommendation: Recommendation,
        saved_to_db: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        db_error: Option<String>,
    },
    Unavailable {
        error: String,
    },
}

/// Outcome of persisting one recommendation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SaveResult {
    pub fn saved(id: String) -> Self {
        Self {
            success: true,
            id: Some(id),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            id: None,
            error: Some(error.into()),
        }
    }
}

/// Body of `GET /recommendations`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<Map<String, Value>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ListResult {
    pub fn listed(recommendations: Vec<Map<String, Value>>) -> Self {
        Self {
            success: true,
            recommendations: Some(recommendations),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            recommendations: None,
            error: Some(error.into()),
        }
    }
}
