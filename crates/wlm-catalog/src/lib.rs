//! # wlm-catalog
//!
//! WeLoveMovies entities and the fold shapes used to build them from join
//! rows:
//! - theaters with the movies they show (`theaters ⋈ movies_theaters ⋈ movies`)
//! - a single review with its critic (`reviews ⋈ critics`)
//! - a movie's reviews with their critics
//!
//! SQL is out of scope; callers hand over the rows a join produced.

pub mod error;
pub mod model;
pub mod shapes;

pub use error::CatalogError;
pub use model::{
    Critic, Envelope, Movie, Review, ReviewWithCritic, ShowingMovie, Theater, TheaterWithMovies,
};
pub use shapes::{
    list_theaters, movie_reviews, movie_reviews_mapper, read_review, review_with_critic,
    theaters_with_movies,
};
