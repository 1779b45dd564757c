//! WeLoveMovies entities, as served in response bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub movie_id: u64,
    pub title: String,
    pub runtime_in_minutes: u32,
    pub rating: String,
    pub description: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theater {
    pub theater_id: u64,
    pub name: String,
    pub address_line_1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line_2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Critic {
    pub critic_id: u64,
    pub preferred_name: String,
    pub surname: String,
    pub organization_name: String,
    /// Not every join selects critic timestamps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub review_id: u64,
    pub content: String,
    pub score: u8,
    pub critic_id: u64,
    pub movie_id: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewWithCritic {
    #[serde(flatten)]
    pub review: Review,
    pub critic: Critic,
}

/// A movie as listed under a theater, with its `movies_theaters` flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowingMovie {
    #[serde(flatten)]
    pub movie: Movie,
    pub is_showing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TheaterWithMovies {
    #[serde(flatten)]
    pub theater: Theater,
    pub movies: Vec<ShowingMovie>,
}

/// Response body: `{ "data": … }`, with `error` only on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(message.into()),
        }
    }
}
