use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        poster_url, validate_age, AlternativeTitle, HeadlineRating, Language, MovieDetails,
        MovieGenre, MovieRecommendation, MovieRecommendations, OmdbDetails, StreamingOption,
        TmdbMovie, TmdbMovieDetails,
    },
    services::{
        providers::{MovieCatalog, MovieRatings},
        query_builder::{DiscoverQuery, ANIMATION_GENRE_ID},
        sessions::SessionStore,
    },
};

pub const SERVICE_UNAVAILABLE: &str = "Movie Recommender Service Temporarily Unavailable";
pub const END_OF_RESULTS_NOTICE: &str =
    "You've reached the end of available movies. Starting over from the beginning!";
/// Alternative titles from this country are not shown
const EXCLUDED_TITLE_COUNTRY: &str = "IN";
const MISSING_CERTIFICATION: &str = "N/A";

/// Movie recommendations from TMDB discovery, enriched with OMDB ratings
#[derive(Clone)]
pub struct MovieRecommender {
    catalog: Arc<dyn MovieCatalog>,
    ratings: Arc<dyn MovieRatings>,
}

impl MovieRecommender {
    pub fn new(catalog: Arc<dyn MovieCatalog>, ratings: Arc<dyn MovieRatings>) -> Self {
        Self { catalog, ratings }
    }

    /// Next page of unseen movies for the session's preferences
    pub async fn recommend(
        &self,
        sessions: &SessionStore,
        session_id: Uuid,
        genre: MovieGenre,
        age: u32,
        language: Language,
    ) -> AppResult<MovieRecommendations> {
        let age = validate_age(age)?;
        // Unknown sessions fail before any catalog traffic
        sessions.with_session(session_id, |_| ()).await?;

        if !self.catalog.check_availability().await {
            sessions
                .with_session(session_id, |session| session.service_unavailable = true)
                .await?;
            return Err(AppError::ServiceUnavailable(SERVICE_UNAVAILABLE.to_string()));
        }

        let (page, shown) = sessions
            .with_session(session_id, |session| {
                session.service_unavailable = false;
                let page = session.movies.page;
                session.movies.page += 1;
                (page, session.movies.shown.snapshot())
            })
            .await?;

        let query = DiscoverQuery::for_preferences(genre, age, language, page);
        let mut notices: Vec<String> = query.notice().map(String::from).into_iter().collect();

        let mut served_page = page;
        let mut discovered = self.catalog.discover(&query).await?;

        if page > discovered.total_pages {
            tracing::info!(
                session_id = %session_id,
                page,
                total_pages = discovered.total_pages,
                "Past the last discover page, starting over"
            );
            notices.push(END_OF_RESULTS_NOTICE.to_string());
            served_page = 1;
            discovered = self.catalog.discover(&query.with_page(1)).await?;
            sessions
                .with_session(session_id, |session| session.movies.page = 2)
                .await?;
        }

        let candidates: Vec<TmdbMovie> = discovered
            .results
            .into_iter()
            .filter(|movie| is_candidate(movie, &query, &shown))
            .collect();

        let movies = self.enrich_batch(candidates).await;

        sessions
            .with_session(session_id, |session| {
                session.movies.shown.extend(movies.iter().map(|m| m.tmdb_id))
            })
            .await?;

        if movies.is_empty() {
            return Err(AppError::NotFound(format!(
                "No new movies found for {} language and {} genre. Try different preferences.",
                language, genre
            )));
        }

        tracing::info!(
            session_id = %session_id,
            page = served_page,
            returned = movies.len(),
            genre = %genre,
            language = %language,
            "Movies recommended"
        );

        Ok(MovieRecommendations {
            page: served_page,
            movies,
            notices,
        })
    }

    /// Enriches movies in parallel, keeping discover order and dropping failures
    async fn enrich_batch(&self, movies: Vec<TmdbMovie>) -> Vec<MovieRecommendation> {
        let mut tasks = Vec::with_capacity(movies.len());

        for movie in movies {
            let catalog = Arc::clone(&self.catalog);
            let ratings = Arc::clone(&self.ratings);
            let tmdb_id = movie.id;
            let task = tokio::spawn(async move { enrich(catalog, ratings, movie).await });
            tasks.push((tmdb_id, task));
        }

        let mut results = Vec::new();
        let mut error_count = 0;

        for (tmdb_id, task) in tasks {
            match task.await {
                Ok(Ok(recommendation)) => results.push(recommendation),
                Ok(Err(e)) => {
                    tracing::warn!(tmdb_id, error = %e, "Dropping movie after enrichment failure");
                    error_count += 1;
                }
                Err(e) => {
                    tracing::error!(tmdb_id, error = %e, "Enrichment task panicked");
                    error_count += 1;
                }
            }
        }

        if error_count > 0 {
            tracing::warn!(
                success_count = results.len(),
                error_count,
                "Partial movie enrichment failure"
            );
        }

        results
    }

    /// Detail card: TMDB details, OMDB ratings, US certification and streaming offers
    pub async fn details(
        &self,
        sessions: &SessionStore,
        session_id: Uuid,
        tmdb_id: u64,
    ) -> AppResult<MovieDetails> {
        let service_unavailable = sessions
            .with_session(session_id, |session| session.service_unavailable)
            .await?;

        let details = self.catalog.movie_details(tmdb_id).await?;

        let (omdb, certification, providers) = tokio::join!(
            lookup_ratings(self.ratings.as_ref(), details.imdb_id.as_deref()),
            self.catalog.certification(tmdb_id),
            async {
                if service_unavailable {
                    return Ok(Vec::new());
                }
                self.catalog.watch_providers(tmdb_id).await
            }
        );

        let certification = certification.unwrap_or_else(|e| {
            tracing::warn!(tmdb_id, error = %e, "Certification lookup failed");
            None
        });
        let providers = providers.unwrap_or_else(|e| {
            tracing::warn!(tmdb_id, error = %e, "Watch provider lookup failed");
            Vec::new()
        });

        let year = omdb
            .as_ref()
            .and_then(|o| o.year.clone())
            .or_else(|| release_year(details.release_date.as_deref()));
        let runtime = omdb
            .as_ref()
            .and_then(|o| o.runtime.clone())
            .or_else(|| details.runtime.map(|minutes| format!("{} min", minutes)));

        Ok(MovieDetails {
            tmdb_id: details.id,
            imdb_id: details.imdb_id.clone(),
            rating: HeadlineRating::pick(omdb.as_ref(), details.vote_average, details.vote_count),
            genre_names: details.genres.iter().map(|g| g.name.clone()).collect(),
            poster_url: poster_url(details.poster_path.as_deref()),
            title: details.title,
            overview: details.overview,
            year,
            runtime,
            certification: certification.unwrap_or_else(|| MISSING_CERTIFICATION.to_string()),
            streaming_providers: providers.into_iter().map(StreamingOption::from).collect(),
            omdb,
        })
    }
}

/// Discover filter: unseen, in the requested language, not adult, animated for kids
fn is_candidate(movie: &TmdbMovie, query: &DiscoverQuery, shown: &HashSet<u64>) -> bool {
    if shown.contains(&movie.id) || movie.adult {
        return false;
    }
    if movie.original_language.as_deref() != Some(query.language.code()) {
        return false;
    }
    !query.animation_only || movie.genre_ids.contains(&ANIMATION_GENRE_ID)
}

/// OMDB problems degrade to "no ratings" rather than failing the movie
async fn lookup_ratings(ratings: &dyn MovieRatings, imdb_id: Option<&str>) -> Option<OmdbDetails> {
    let imdb_id = imdb_id.filter(|id| !id.is_empty())?;

    match ratings.lookup(imdb_id).await {
        Ok(details) => details,
        Err(e) => {
            tracing::warn!(imdb_id = %imdb_id, error = %e, "OMDB lookup failed");
            None
        }
    }
}

async fn enrich(
    catalog: Arc<dyn MovieCatalog>,
    ratings: Arc<dyn MovieRatings>,
    movie: TmdbMovie,
) -> AppResult<MovieRecommendation> {
    let details = catalog.movie_details(movie.id).await?;
    let alternative_titles = catalog.alternative_titles(movie.id).await?;
    let omdb = lookup_ratings(ratings.as_ref(), details.imdb_id.as_deref()).await;

    Ok(merge_recommendation(movie, details, alternative_titles, omdb))
}

fn release_year(release_date: Option<&str>) -> Option<String> {
    release_date
        .and_then(|date| date.get(..4))
        .filter(|year| year.chars().all(|c| c.is_ascii_digit()))
        .map(String::from)
}

/// Merges a discover entry with its TMDB details and OMDB ratings
pub fn merge_recommendation(
    movie: TmdbMovie,
    details: TmdbMovieDetails,
    alternative_titles: Vec<AlternativeTitle>,
    omdb: Option<OmdbDetails>,
) -> MovieRecommendation {
    let genre_names = if details.genres.is_empty() {
        movie
            .genre_ids
            .iter()
            .filter_map(|id| MovieGenre::from_tmdb_id(*id))
            .map(|genre| genre.label().to_string())
            .collect()
    } else {
        details.genres.into_iter().map(|g| g.name).collect()
    };

    let plot = omdb
        .as_ref()
        .and_then(|o| o.plot.clone())
        .or_else(|| movie.overview.clone());

    MovieRecommendation {
        tmdb_id: movie.id,
        imdb_id: details.imdb_id,
        original_title: movie
            .original_title
            .filter(|original| original != &movie.title),
        title: movie.title,
        original_language: movie.original_language,
        overview: movie.overview,
        plot,
        poster_url: poster_url(movie.poster_path.as_deref()),
        release_date: movie.release_date,
        genre_names,
        tmdb_vote_average: movie.vote_average,
        tmdb_vote_count: movie.vote_count,
        rating: HeadlineRating::pick(omdb.as_ref(), movie.vote_average, movie.vote_count),
        alternative_titles: alternative_titles
            .into_iter()
            .filter(|alt| alt.iso_3166_1 != EXCLUDED_TITLE_COUNTRY)
            .collect(),
        omdb,
    }
}
