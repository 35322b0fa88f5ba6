use crate::{
    models::{MovieDetail, RecommendationOutcome},
    services::omdb::MovieApi,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Search terms used to discover a random movie.
pub const SEARCH_KEYWORDS: [&str; 17] = [
    "action",
    "comedy",
    "drama",
    "thriller",
    "horror",
    "sci-fi",
    "romance",
    "adventure",
    "fantasy",
    "mystery",
    "crime",
    "war",
    "superhero",
    "animation",
    "documentary",
    "classic",
    "blockbuster",
];

/// Source of uniform random indices.
pub trait Chooser: Send {
    /// Returns an index in `0..len`. `len` is never zero.
    fn choose_index(&mut self, len: usize) -> usize;
}

impl<R: Rng + Send> Chooser for R {
    fn choose_index(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }
}

pub struct Recommender {
    api: Arc<dyn MovieApi>,
    chooser: Mutex<Box<dyn Chooser>>,
}

impl Recommender {
    pub fn new(api: Arc<dyn MovieApi>) -> Self {
        Self::with_chooser(api, Box::new(StdRng::from_os_rng()))
    }

    pub fn with_chooser(api: Arc<dyn MovieApi>, chooser: Box<dyn Chooser>) -> Self {
        Self {
            api,
            chooser: Mutex::new(chooser),
        }
    }

    fn choose_index(&self, len: usize) -> usize {
        let mut chooser = self
            .chooser
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        chooser.choose_index(len)
    }

    /// Finds one random movie.
    ///
    /// Keywords are drawn uniformly from those not yet tried in this call, so at
    /// most `SEARCH_KEYWORDS.len()` searches are issued before giving up.
    pub async fn random_pick(&self) -> Option<MovieDetail> {
        let mut remaining: Vec<&str> = SEARCH_KEYWORDS.to_vec();

        while !remaining.is_empty() {
            let keyword = remaining.swap_remove(self.choose_index(remaining.len()));
            info!("Searching for movies with term: {}", keyword);

            let movies = self.api.search(keyword, 1).await;
            debug!("Found {} movies on page 1 for '{}'", movies.len(), keyword);
            if movies.is_empty() {
                continue;
            }

            let movie = &movies[self.choose_index(movies.len())];
            info!("Getting detailed information for movie: {}", movie.title);
            if let Some(detail) = self.api.fetch_detail(&movie.imdb_id).await {
                return Some(detail);
            }
        }

        warn!("Exhausted all search keywords without finding a movie");
        None
    }

    pub async fn recommend(&self) -> RecommendationOutcome {
        match self.random_pick().await {
            Some(movie) => RecommendationOutcome::Found(movie.into()),
            None => RecommendationOutcome::unavailable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SearchResult, NO_RECOMMENDATION_MESSAGE};
    use async_trait::async_trait;
    use std::collections::HashMap;

    #[derive(Default)]
    struct ScriptedApi {
        results: HashMap<String, Vec<SearchResult>>,
        details: HashMap<String, MovieDetail>,
        searches: Mutex<Vec<String>>,
        lookups: Mutex<Vec<String>>,
    }

    impl ScriptedApi {
        fn with_results(mut self, keyword: &str, ids: &[&str]) -> Self {
            let hits = ids
                .iter()
                .map(|id| SearchResult {
                    title: format!("Movie {}", id),
                    year: "2001".to_string(),
                    imdb_id: id.to_string(),
                    media_type: Some("movie".to_string()),
                    poster: None,
                })
                .collect();
            self.results.insert(keyword.to_string(), hits);
            self
        }

        fn with_detail(mut self, id: &str, detail: MovieDetail) -> Self {
            self.details.insert(id.to_string(), detail);
            self
        }

        fn searches(&self) -> Vec<String> {
            self.searches.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MovieApi for ScriptedApi {
        async fn search(&self, keyword: &str, _page: u32) -> Vec<SearchResult> {
            self.searches.lock().unwrap().push(keyword.to_string());
            self.results.get(keyword).cloned().unwrap_or_default()
        }

        async fn fetch_detail(&self, imdb_id: &str) -> Option<MovieDetail> {
            self.lookups.lock().unwrap().push(imdb_id.to_string());
            self.details.get(imdb_id).cloned()
        }
    }

    /// Always picks the last candidate.
    struct LastChooser;

    impl Chooser for LastChooser {
        fn choose_index(&mut self, len: usize) -> usize {
            len - 1
        }
    }

    fn hot_fuzz() -> MovieDetail {
        MovieDetail {
            title: Some("Hot Fuzz".to_string()),
            year: Some("2007".to_string()),
            genre: Some("Action, Comedy".to_string()),
            plot: Some("A top London cop is transferred to a quiet village.".to_string()),
            director: Some("Edgar Wright".to_string()),
            actors: Some("Simon Pegg, Nick Frost".to_string()),
            rating: Some("7.8".to_string()),
            poster: Some("https://example.com/hot-fuzz.jpg".to_string()),
            imdb_id: Some("tt0425112".to_string()),
        }
    }

    #[tokio::test]
    async fn test_recommend_maps_selected_movie() {
        let api = Arc::new(
            ScriptedApi::default()
                .with_results("comedy", &["tt0080339", "tt0425112"])
                .with_detail("tt0425112", hot_fuzz()),
        );
        let recommender = Recommender::with_chooser(api.clone(), Box::new(LastChooser));

        let outcome = recommender.recommend().await;

        let RecommendationOutcome::Found(recommendation) = outcome else {
            panic!("expected a recommendation");
        };
        assert_eq!(recommendation.title, "Hot Fuzz");
        assert_eq!(recommendation.rating, "7.8");
        assert_eq!(recommendation.imdb_id, "tt0425112");
        assert_eq!(recommendation.recommendation_reason, "Random recommendation");
        assert_eq!(api.lookups.lock().unwrap().as_slice(), ["tt0425112"]);
    }

    #[tokio::test]
    async fn test_empty_keyword_falls_back_to_another() {
        let api = Arc::new(
            ScriptedApi::default()
                .with_results("comedy", &["tt0425112"])
                .with_detail("tt0425112", hot_fuzz()),
        );
        let recommender = Recommender::new(api.clone());

        let movie = recommender.random_pick().await;

        assert_eq!(movie, Some(hot_fuzz()));
        let searches = api.searches();
        assert_eq!(searches.last().map(String::as_str), Some("comedy"));
        let mut unique = searches.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), searches.len());
    }

    #[tokio::test]
    async fn test_exhausted_pool_returns_none() {
        let api = Arc::new(ScriptedApi::default());
        let recommender = Recommender::new(api.clone());

        assert!(recommender.random_pick().await.is_none());

        let mut searches = api.searches();
        searches.sort();
        let mut expected: Vec<String> = SEARCH_KEYWORDS.iter().map(|k| k.to_string()).collect();
        expected.sort();
        assert_eq!(searches, expected);
    }

    #[tokio::test]
    async fn test_failed_detail_moves_to_next_keyword() {
        let api = Arc::new(
            ScriptedApi::default()
                .with_results("drama", &["tt0000001"])
                .with_results("war", &["tt0000002"])
                .with_detail("tt0000002", hot_fuzz()),
        );
        let recommender = Recommender::new(api.clone());

        assert_eq!(recommender.random_pick().await, Some(hot_fuzz()));
        assert!(api.searches().contains(&"war".to_string()));
    }

    #[tokio::test]
    async fn test_recommend_without_movie_returns_error_shape() {
        let recommender = Recommender::new(Arc::new(ScriptedApi::default()));

        match recommender.recommend().await {
            RecommendationOutcome::Unavailable { error } => {
                assert_eq!(error, NO_RECOMMENDATION_MESSAGE)
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
