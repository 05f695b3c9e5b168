//! Data Transfer Objects (DTOs) for the remote catalog.
//!
//! These mirror the TMDb v3 response bodies and are private to the
//! infrastructure layer. Every optional field tolerates `null` or absence;
//! conversion into domain types happens here so the client only deals in
//! `Item` and `Page`.

mod tmdb;

pub use tmdb::{
    CastDto, CreditsDto, GenreDto, MovieDetailDto, MovieDto, MovieListDto, VideoDto, VideosDto,
    MAX_CAST,
};
