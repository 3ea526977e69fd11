//! Movie catalogue endpoints

use crate::server::state::AppState;
use crate::storage::{Movie, MovieFilters, Runtime};
use crate::utils::error::{ApiError, Result};
use crate::utils::validator::{Validator, permitted_value, unique};
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, web};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

const EXPECTED_VERSION_HEADER: &str = "X-Expected-Version";

/// Body of `POST /v1/movies`; every field is checked by validation
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateMovieRequest {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub runtime: Option<Runtime>,
    pub genres: Option<Vec<String>>,
}

/// Body of `PATCH /v1/movies/{id}`; absent fields keep their value
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateMovieRequest {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub runtime: Option<Runtime>,
    pub genres: Option<Vec<String>>,
}

/// Raw listing parameters; parsed by [`ListMoviesQuery::into_filters`]
#[derive(Debug, Default, Deserialize)]
pub struct ListMoviesQuery {
    pub title: Option<String>,
    pub genres: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub sort: Option<String>,
}

impl ListMoviesQuery {
    /// Parse and validate into store filters
    pub fn into_filters(self) -> Result<MovieFilters> {
        let mut v = Validator::new();
        let defaults = MovieFilters::default();

        let page = read_int(&mut v, "page", self.page.as_deref(), defaults.page);
        let page_size = read_int(&mut v, "page_size", self.page_size.as_deref(), defaults.page_size);

        v.check(page > 0, "page", "must be greater than zero");
        v.check(page <= 10_000_000, "page", "must be a maximum of 10 million");
        v.check(page_size > 0, "page_size", "must be greater than zero");
        v.check(page_size <= 100, "page_size", "must be a maximum of 100");

        let sort = self.sort.unwrap_or(defaults.sort);
        v.check(
            permitted_value(&sort.as_str(), MovieFilters::SORT_SAFELIST),
            "sort",
            "invalid sort value",
        );

        v.finish()?;

        let genres = self
            .genres
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|g| !g.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(MovieFilters {
            title: self.title.unwrap_or_default(),
            genres,
            page,
            page_size,
            sort,
        })
    }
}

fn read_int(v: &mut Validator, key: &str, raw: Option<&str>, default: u32) -> u32 {
    match raw {
        None | Some("") => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            v.add_error(key, "must be an integer value");
            default
        }),
    }
}

/// Record every problem with `movie` in `v`
pub fn validate_movie(v: &mut Validator, movie: &Movie) {
    v.check(!movie.title.is_empty(), "title", "must be provided");
    v.check(movie.title.len() <= 500, "title", "must not be more than 500 bytes long");

    v.check(movie.year != 0, "year", "must be provided");
    v.check(movie.year >= 1888, "year", "must be greater than 1888");
    v.check(movie.year <= Utc::now().year(), "year", "must not be in the future");

    v.check(movie.runtime.0 != 0, "runtime", "must be provided");
    v.check(movie.runtime.0 > 0, "runtime", "must be a positive integer");

    v.check(!movie.genres.is_empty(), "genres", "must contain at least 1 genre");
    v.check(movie.genres.len() <= 5, "genres", "must not contain more than 5 genres");
    v.check(unique(&movie.genres), "genres", "must not contain duplicate values");
}

fn read_id(id: i64) -> Result<i64> {
    if id < 1 {
        return Err(ApiError::NotFound);
    }
    Ok(id)
}

/// `POST /v1/movies`
pub async fn create_movie(
    state: web::Data<AppState>,
    body: web::Json<CreateMovieRequest>,
) -> Result<HttpResponse> {
    let input = body.into_inner();

    let mut v = Validator::new();
    if input.genres.is_none() {
        v.add_error("genres", "must be provided");
    }

    let movie = Movie {
        id: 0,
        created_at: Utc::now(),
        title: input.title.unwrap_or_default(),
        year: input.year.unwrap_or_default(),
        runtime: input.runtime.unwrap_or_default(),
        genres: input.genres.unwrap_or_default(),
        version: 1,
    };
    validate_movie(&mut v, &movie);
    v.finish()?;

    let storage = &state.storage;
    let movie = storage.bounded(storage.movies().insert(movie)).await?;
    info!(movie_id = movie.id, "Movie created");

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/v1/movies/{}", movie.id)))
        .json(json!({ "movie": movie })))
}

/// `GET /v1/movies/{id}`
pub async fn show_movie(state: web::Data<AppState>, path: web::Path<i64>) -> Result<HttpResponse> {
    let id = read_id(path.into_inner())?;

    let storage = &state.storage;
    let movie = storage.bounded(storage.movies().get(id)).await?;

    Ok(HttpResponse::Ok().json(json!({ "movie": movie })))
}

/// `PATCH /v1/movies/{id}`
pub async fn update_movie(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdateMovieRequest>,
) -> Result<HttpResponse> {
    let id = read_id(path.into_inner())?;

    let storage = &state.storage;
    let mut movie = storage.bounded(storage.movies().get(id)).await?;

    if let Some(expected) = req.headers().get(EXPECTED_VERSION_HEADER) {
        let expected = expected
            .to_str()
            .map_err(|_| ApiError::bad_request("invalid X-Expected-Version header"))?;
        if expected.trim() != movie.version.to_string() {
            return Err(ApiError::EditConflict);
        }
    }

    let input = body.into_inner();
    if let Some(title) = input.title {
        movie.title = title;
    }
    if let Some(year) = input.year {
        movie.year = year;
    }
    if let Some(runtime) = input.runtime {
        movie.runtime = runtime;
    }
    if let Some(genres) = input.genres {
        movie.genres = genres;
    }

    let mut v = Validator::new();
    validate_movie(&mut v, &movie);
    v.finish()?;

    let movie = storage.bounded(storage.movies().update(movie)).await?;
    info!(movie_id = movie.id, version = movie.version, "Movie updated");

    Ok(HttpResponse::Ok().json(json!({ "movie": movie })))
}

/// `DELETE /v1/movies/{id}`
pub async fn delete_movie(state: web::Data<AppState>, path: web::Path<i64>) -> Result<HttpResponse> {
    let id = read_id(path.into_inner())?;

    let storage = &state.storage;
    storage.bounded(storage.movies().delete(id)).await?;
    info!(movie_id = id, "Movie deleted");

    Ok(HttpResponse::Ok().json(json!({ "message": "movie successfully deleted" })))
}

/// `GET /v1/movies`
pub async fn list_movies(
    state: web::Data<AppState>,
    query: web::Query<ListMoviesQuery>,
) -> Result<HttpResponse> {
    let filters = query.into_inner().into_filters()?;

    let storage = &state.storage;
    let (movies, metadata) = storage.bounded(storage.movies().list(&filters)).await?;

    Ok(HttpResponse::Ok().json(json!({ "movies": movies, "metadata": metadata })))
}
