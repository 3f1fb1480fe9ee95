use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    catalog::CatalogClient,
    error::{AppError, AppResult},
    models::{LikedMovie, Recommendation, SortBy},
};

/// How many recommendations to return when the caller does not say
pub const DEFAULT_LIMIT: usize = 5;

/// At most this many genres are queried per request
const MAX_GENRE_FETCHES: usize = 3;

/// Discovery is restricted to titles with at least this many votes
const MIN_VOTE_COUNT: u32 = 200;

/// Generates personalized recommendations from the user's liked movies
///
/// Takes the union of genres across the liked set (in first-occurrence
/// order), queries genre discovery for up to the first three of them
/// concurrently, then scores each candidate by how many of its genres
/// appear in the full union. Candidates the user already liked are
/// excluded; ties in match score are broken by popularity.
///
/// Fails with `EmptyInput` before touching the catalog when `liked` is
/// empty, and with the underlying catalog error if any genre fetch fails.
pub async fn recommend(
    catalog: Arc<dyn CatalogClient>,
    liked: &[LikedMovie],
    limit: usize,
) -> AppResult<Vec<Recommendation>> {
    if liked.is_empty() {
        return Err(AppError::EmptyInput);
    }

    let liked_genres = genre_union(liked);
    let liked_ids: HashSet<u64> = liked.iter().map(|movie| movie.id).collect();

    tracing::debug!(
        liked_count = liked.len(),
        genre_count = liked_genres.len(),
        "Computing recommendations"
    );

    // Fan out one discovery request per selected genre. Awaiting the
    // handles in selection order keeps the flattened candidate order
    // deterministic; any single failure fails the whole call.
    let mut tasks = Vec::new();
    for &genre_id in liked_genres.iter().take(MAX_GENRE_FETCHES) {
        let catalog = catalog.clone();
        tasks.push(tokio::spawn(async move {
            catalog
                .discover_by_genre(genre_id, SortBy::PopularityDesc, MIN_VOTE_COUNT)
                .await
        }));
    }

    let mut candidates = Vec::new();
    for task in tasks {
        let movies = task
            .await
            .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;
        candidates.extend(movies);
    }

    let genre_set: HashSet<u32> = liked_genres.iter().copied().collect();

    let mut scored: Vec<Recommendation> = candidates
        .into_iter()
        .filter(|movie| !liked_ids.contains(&movie.id))
        .map(|movie| {
            // Score against the full union, not just the queried genres.
            let match_score = movie
                .genre_ids
                .iter()
                .filter(|genre_id| genre_set.contains(*genre_id))
                .count();
            Recommendation { movie, match_score }
        })
        .collect();

    // Stable, so equal (score, popularity) pairs keep their fetch order.
    scored.sort_by(|a, b| {
        b.match_score.cmp(&a.match_score).then_with(|| {
            b.movie
                .popularity
                .partial_cmp(&a.movie.popularity)
                .unwrap_or(Ordering::Equal)
        })
    });

    // Overlapping genre results can list the same movie more than once;
    // keep the best-ranked occurrence.
    let mut seen = HashSet::new();
    scored.retain(|rec| seen.insert(rec.movie.id));
    scored.truncate(limit);

    tracing::info!(count = scored.len(), "Recommendations computed");

    Ok(scored)
}

/// Union of genre ids across the liked set, in order of first occurrence
fn genre_union(liked: &[LikedMovie]) -> Vec<u32> {
    let mut seen = HashSet::new();
    let mut union = Vec::new();
    for movie in liked {
        for &genre_id in &movie.genres {
            if seen.insert(genre_id) {
                union.push(genre_id);
            }
        }
    }
    union
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MockCatalogClient;
    use crate::models::CandidateMovie;
    use mockall::predicate::eq;

    fn liked(id: u64, genres: &[u32]) -> LikedMovie {
        LikedMovie {
            id,
            title: format!("liked-{}", id),
            genres: genres.to_vec(),
            vote_average: 7.0,
            overview: String::new(),
            release_date: None,
            poster_path: None,
        }
    }

    fn candidate(id: u64, genre_ids: &[u32], popularity: f64) -> CandidateMovie {
        CandidateMovie {
            id,
            title: format!("candidate-{}", id),
            genre_ids: genre_ids.to_vec(),
            popularity,
            vote_average: 6.5,
            overview: String::new(),
            release_date: None,
            poster_path: None,
        }
    }

    fn expect_discover(
        catalog: &mut MockCatalogClient,
        genre_id: u32,
        results: Vec<CandidateMovie>,
    ) {
        catalog
            .expect_discover_by_genre()
            .with(eq(genre_id), eq(SortBy::PopularityDesc), eq(MIN_VOTE_COUNT))
            .times(1)
            .return_once(move |_, _, _| Ok(results));
    }

    #[test]
    fn test_genre_union_first_occurrence_order() {
        let movies = vec![liked(1, &[28, 12]), liked(2, &[28]), liked(3, &[16, 12])];
        assert_eq!(genre_union(&movies), vec![28, 12, 16]);
    }

    #[tokio::test]
    async fn test_empty_liked_set_fails_without_catalog_calls() {
        let catalog = MockCatalogClient::new();
        // No expectations set: any catalog call would panic the mock.

        let result = recommend(Arc::new(catalog), &[], DEFAULT_LIMIT).await;
        assert!(matches!(result, Err(AppError::EmptyInput)));
    }

    #[tokio::test]
    async fn test_queries_union_genres_and_excludes_liked_ids() {
        let mut catalog = MockCatalogClient::new();
        // Union {28, 12}: fewer than three genres, so exactly two fetches.
        expect_discover(
            &mut catalog,
            28,
            vec![candidate(1, &[28], 50.0), candidate(10, &[28, 12], 5.0)],
        );
        expect_discover(&mut catalog, 12, vec![candidate(2, &[12], 40.0)]);

        let liked_set = vec![liked(1, &[28, 12]), liked(2, &[28])];
        let recs = recommend(Arc::new(catalog), &liked_set, DEFAULT_LIMIT)
            .await
            .unwrap();

        // Candidates with liked ids 1 and 2 are gone even though discovery
        // returned them.
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].movie.id, 10);
        assert_eq!(recs[0].match_score, 2);
    }

    #[tokio::test]
    async fn test_match_score_dominates_popularity() {
        let mut catalog = MockCatalogClient::new();
        expect_discover(
            &mut catalog,
            28,
            vec![candidate(11, &[28], 9.0), candidate(10, &[28, 12], 5.0)],
        );
        expect_discover(&mut catalog, 12, vec![]);

        let liked_set = vec![liked(1, &[28, 12])];
        let recs = recommend(Arc::new(catalog), &liked_set, DEFAULT_LIMIT)
            .await
            .unwrap();

        let ids: Vec<u64> = recs.iter().map(|r| r.movie.id).collect();
        assert_eq!(ids, vec![10, 11]);
        assert_eq!(recs[0].match_score, 2);
        assert_eq!(recs[1].match_score, 1);
    }

    #[tokio::test]
    async fn test_equal_scores_break_ties_by_popularity() {
        let mut catalog = MockCatalogClient::new();
        expect_discover(
            &mut catalog,
            28,
            vec![candidate(20, &[28], 3.0), candidate(21, &[28], 8.0)],
        );

        let liked_set = vec![liked(1, &[28])];
        let recs = recommend(Arc::new(catalog), &liked_set, DEFAULT_LIMIT)
            .await
            .unwrap();

        let ids: Vec<u64> = recs.iter().map(|r| r.movie.id).collect();
        assert_eq!(ids, vec![21, 20]);
    }

    #[tokio::test]
    async fn test_equal_score_and_popularity_keeps_fetch_order() {
        let mut catalog = MockCatalogClient::new();
        expect_discover(
            &mut catalog,
            28,
            vec![candidate(30, &[28], 5.0), candidate(31, &[28], 5.0)],
        );

        let liked_set = vec![liked(1, &[28])];
        let recs = recommend(Arc::new(catalog), &liked_set, DEFAULT_LIMIT)
            .await
            .unwrap();

        let ids: Vec<u64> = recs.iter().map(|r| r.movie.id).collect();
        assert_eq!(ids, vec![30, 31]);
    }

    #[tokio::test]
    async fn test_output_is_ranked_monotonically_and_bounded_by_limit() {
        let mut catalog = MockCatalogClient::new();
        expect_discover(
            &mut catalog,
            28,
            vec![
                candidate(40, &[28], 1.0),
                candidate(41, &[28, 12], 2.0),
                candidate(42, &[28], 7.0),
            ],
        );
        expect_discover(
            &mut catalog,
            12,
            vec![candidate(43, &[12, 16], 9.0), candidate(44, &[12], 4.0)],
        );

        let liked_set = vec![liked(1, &[28, 12])];
        let recs = recommend(Arc::new(catalog), &liked_set, 3).await.unwrap();

        assert_eq!(recs.len(), 3);
        for pair in recs.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                a.match_score > b.match_score
                    || (a.match_score == b.match_score
                        && a.movie.popularity >= b.movie.popularity)
            );
        }
    }

    #[tokio::test]
    async fn test_at_most_three_genres_are_queried() {
        let mut catalog = MockCatalogClient::new();
        // Union is [28, 12, 16, 35]; only the first three get queried.
        expect_discover(&mut catalog, 28, vec![]);
        expect_discover(&mut catalog, 12, vec![]);
        expect_discover(&mut catalog, 16, vec![]);

        let liked_set = vec![liked(1, &[28, 12]), liked(2, &[16, 35])];
        let recs = recommend(Arc::new(catalog), &liked_set, DEFAULT_LIMIT)
            .await
            .unwrap();

        assert!(recs.is_empty());
    }

    #[tokio::test]
    async fn test_single_failed_genre_fetch_fails_the_call() {
        let mut catalog = MockCatalogClient::new();
        expect_discover(&mut catalog, 28, vec![candidate(50, &[28], 5.0)]);
        catalog
            .expect_discover_by_genre()
            .with(eq(12), eq(SortBy::PopularityDesc), eq(MIN_VOTE_COUNT))
            .times(1)
            .return_once(|_, _, _| Err(AppError::Upstream(503)));

        let liked_set = vec![liked(1, &[28, 12])];
        let result = recommend(Arc::new(catalog), &liked_set, DEFAULT_LIMIT).await;

        assert!(matches!(result, Err(AppError::Upstream(503))));
    }

    #[tokio::test]
    async fn test_duplicate_candidates_across_genres_appear_once() {
        let mut catalog = MockCatalogClient::new();
        // Movie 60 sits in both queried genres.
        expect_discover(&mut catalog, 28, vec![candidate(60, &[28, 12], 6.0)]);
        expect_discover(&mut catalog, 12, vec![candidate(60, &[28, 12], 6.0)]);

        let liked_set = vec![liked(1, &[28]), liked(2, &[12])];
        let recs = recommend(Arc::new(catalog), &liked_set, DEFAULT_LIMIT)
            .await
            .unwrap();

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].movie.id, 60);
    }

    #[tokio::test]
    async fn test_scores_use_full_union_beyond_queried_genres() {
        let mut catalog = MockCatalogClient::new();
        // Union is [28, 12, 16, 35]; genre 35 is never queried but still
        // counts toward the score.
        expect_discover(&mut catalog, 28, vec![candidate(70, &[28, 35], 1.0)]);
        expect_discover(&mut catalog, 12, vec![]);
        expect_discover(&mut catalog, 16, vec![]);

        let liked_set = vec![liked(1, &[28, 12]), liked(2, &[16, 35])];
        let recs = recommend(Arc::new(catalog), &liked_set, DEFAULT_LIMIT)
            .await
            .unwrap();

        assert_eq!(recs[0].match_score, 2);
    }
}
