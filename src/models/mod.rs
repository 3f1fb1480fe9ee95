use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A movie the user has explicitly liked
///
/// The liked set is owned by the client and persisted on its side as a JSON
/// array; the server receives it as an opaque sequence per request and never
/// stores it. Field names match that persisted layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LikedMovie {
    pub id: u64,
    pub title: String,
    /// Genre ids, set semantics (order and duplicates carry no meaning)
    pub genres: Vec<u32>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// A movie returned by a catalog list endpoint, not yet filtered or scored
///
/// Mirrors the TMDB list schema. Transient: produced per request and
/// discarded after rendering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateMovie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// A scored candidate returned by the recommendation engine
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    #[serde(flatten)]
    pub movie: CandidateMovie,
    /// Number of the candidate's genres shared with the liked-genre union
    pub match_score: usize,
}

/// A genre as listed by the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// A video attached to a movie's details (trailers, teasers, clips)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Video {
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct VideoList {
    #[serde(default)]
    pub results: Vec<Video>,
}

/// Full details for a single movie, including attached videos
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub videos: VideoList,
}

impl MovieDetails {
    /// Picks the video to offer as the trailer: the first YouTube-hosted
    /// Trailer or Teaser, in listing order.
    pub fn trailer(&self) -> Option<&Video> {
        self.videos
            .results
            .iter()
            .find(|v| v.site == "YouTube" && (v.kind == "Trailer" || v.kind == "Teaser"))
    }
}

/// Sort order for genre-discovery requests
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    PopularityDesc,
    VoteAverageDesc,
}

impl SortBy {
    /// The `sort_by` value the upstream API expects
    pub fn as_query_value(&self) -> &'static str {
        match self {
            SortBy::PopularityDesc => "popularity.desc",
            SortBy::VoteAverageDesc => "vote_average.desc",
        }
    }
}

impl Display for SortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_query_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(site: &str, kind: &str, key: &str) -> Video {
        Video {
            key: key.to_string(),
            name: format!("{} {}", kind, key),
            site: site.to_string(),
            kind: kind.to_string(),
        }
    }

    #[test]
    fn test_trailer_prefers_first_youtube_trailer_or_teaser() {
        let details = MovieDetails {
            id: 550,
            title: "Fight Club".to_string(),
            genres: vec![],
            popularity: 0.0,
            vote_average: 8.4,
            overview: String::new(),
            release_date: Some("1999-10-15".to_string()),
            poster_path: None,
            videos: VideoList {
                results: vec![
                    video("Vimeo", "Trailer", "v1"),
                    video("YouTube", "Clip", "c1"),
                    video("YouTube", "Teaser", "t1"),
                    video("YouTube", "Trailer", "t2"),
                ],
            },
        };

        assert_eq!(details.trailer().map(|v| v.key.as_str()), Some("t1"));
    }

    #[test]
    fn test_trailer_none_when_no_youtube_video() {
        let details = MovieDetails {
            id: 1,
            title: "Obscure".to_string(),
            genres: vec![],
            popularity: 0.0,
            vote_average: 0.0,
            overview: String::new(),
            release_date: None,
            poster_path: None,
            videos: VideoList::default(),
        };

        assert!(details.trailer().is_none());
    }

    #[test]
    fn test_sort_by_query_values() {
        assert_eq!(SortBy::PopularityDesc.as_query_value(), "popularity.desc");
        assert_eq!(
            SortBy::VoteAverageDesc.as_query_value(),
            "vote_average.desc"
        );
    }

    #[test]
    fn test_liked_movie_deserializes_persisted_layout() {
        // Shape written by the client when a movie is liked
        let json = r#"{
            "id": 27205,
            "title": "Inception",
            "genres": [28, 878, 12],
            "vote_average": 8.4,
            "overview": "A thief who steals corporate secrets...",
            "release_date": "2010-07-15",
            "poster_path": "/inception.jpg"
        }"#;

        let liked: LikedMovie = serde_json::from_str(json).unwrap();
        assert_eq!(liked.id, 27205);
        assert_eq!(liked.genres, vec![28, 878, 12]);
        assert_eq!(liked.poster_path.as_deref(), Some("/inception.jpg"));
    }

    #[test]
    fn test_candidate_movie_tolerates_missing_optional_fields() {
        let json = r#"{"id": 603, "title": "The Matrix"}"#;

        let candidate: CandidateMovie = serde_json::from_str(json).unwrap();
        assert!(candidate.genre_ids.is_empty());
        assert_eq!(candidate.popularity, 0.0);
        assert_eq!(candidate.release_date, None);
    }
}
