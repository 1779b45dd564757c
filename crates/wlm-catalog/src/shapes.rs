//! Fold shapes for the WeLoveMovies joins.
//!
//! Column names follow the `select` lists of the joins. Where two tables
//! share a column name the join aliases it, and the shape moves the alias
//! back to the plain name inside the nested record.

use crate::error::CatalogError;
use crate::model::{ReviewWithCritic, TheaterWithMovies};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use wlm_fold::{ConfigError, FieldMapper, Placement, Row, RowGrouper};

pub const THEATER_GROUP_KEY: &str = "theater_id";

/// `t.*` plus the movie and `movies_theaters` columns, one row per showing.
const THEATER_MOVIE_COLUMNS: &[(&str, &str)] = &[
    ("movie_id", "movies.[].movie_id"),
    ("title", "movies.[].title"),
    ("runtime_in_minutes", "movies.[].runtime_in_minutes"),
    ("rating", "movies.[].rating"),
    ("description", "movies.[].description"),
    ("image_url", "movies.[].image_url"),
    ("movie_created_at", "movies.[].created_at"),
    ("movie_updated_at", "movies.[].updated_at"),
    ("is_showing", "movies.[].is_showing"),
];

/// `r.*` plus critic columns, with the clashing ones aliased.
const REVIEW_CRITIC_COLUMNS: &[(&str, &str)] = &[
    ("critic:critic_id", "critic.critic_id"),
    ("preferred_name", "critic.preferred_name"),
    ("surname", "critic.surname"),
    ("organization_name", "critic.organization_name"),
    ("critic_created_at", "critic.created_at"),
    ("critic_updated_at", "critic.updated_at"),
];

/// `r.*` plus every critic column as `critic:<column>`.
const MOVIE_REVIEW_COLUMNS: &[(&str, &str)] = &[
    ("critic:critic_id", "critic.critic_id"),
    ("critic:preferred_name", "critic.preferred_name"),
    ("critic:surname", "critic.surname"),
    ("critic:organization_name", "critic.organization_name"),
    ("critic:created_at", "critic.created_at"),
    ("critic:updated_at", "critic.updated_at"),
];

/// Groups showings by theater, collecting movies under `movies`.
pub fn theaters_with_movies() -> Result<RowGrouper, ConfigError> {
    let placement: Placement = THEATER_MOVIE_COLUMNS.iter().copied().collect();
    RowGrouper::new(THEATER_GROUP_KEY, placement)
}

/// Nests the critic columns of a single-review join under `critic`.
pub fn review_with_critic() -> Result<FieldMapper, ConfigError> {
    FieldMapper::new(REVIEW_CRITIC_COLUMNS.iter().copied())
}

/// Nests the `critic:*` columns of a movie-reviews join under `critic`.
pub fn movie_reviews_mapper() -> Result<FieldMapper, ConfigError> {
    FieldMapper::new(MOVIE_REVIEW_COLUMNS.iter().copied())
}

/// Fold the theaters join into theaters with their movies.
pub fn list_theaters(rows: Vec<Row>) -> Result<Vec<TheaterWithMovies>, CatalogError> {
    let grouped = theaters_with_movies()?.fold(rows);
    debug!(theaters = grouped.len(), "folded theaters");
    decode_all("theater", grouped)
}

/// The review from a single-review join, if the join matched.
pub fn read_review(rows: Vec<Row>) -> Result<Option<ReviewWithCritic>, CatalogError> {
    let mapper = review_with_critic()?;
    rows.first()
        .map(|row| decode("review", 0, mapper.map_row(row).into_value()))
        .transpose()
}

/// The reviews of one movie, each with its critic.
///
/// The join selects no critic timestamps, so a critic without them takes
/// the review's.
pub fn movie_reviews(rows: Vec<Row>) -> Result<Vec<ReviewWithCritic>, CatalogError> {
    let mapper = movie_reviews_mapper()?;
    let mapped = rows
        .iter()
        .map(|row| mapper.map_row(row).into_value())
        .collect();
    let mut reviews: Vec<ReviewWithCritic> = decode_all("review", mapped)?;
    for entry in &mut reviews {
        entry.critic.created_at.get_or_insert(entry.review.created_at);
        entry.critic.updated_at.get_or_insert(entry.review.updated_at);
    }
    Ok(reviews)
}

fn decode_all<T: DeserializeOwned>(
    entity: &'static str,
    values: Vec<Value>,
) -> Result<Vec<T>, CatalogError> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| decode(entity, index, value))
        .collect()
}

fn decode<T: DeserializeOwned>(
    entity: &'static str,
    index: usize,
    value: Value,
) -> Result<T, CatalogError> {
    serde_json::from_value(value).map_err(|source| CatalogError::Decode {
        entity,
        index,
        source,
    })
}
