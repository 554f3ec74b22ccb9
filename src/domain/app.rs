//! App Store record model.
//!
//! [`AppStoreApp`] mirrors one entry of the iTunes Search API `results` array.
//! Records are immutable values: equality and hashing cover every field, so two
//! records sharing a `track_id` but differing elsewhere are distinct.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Identity of an App Store item.
pub type TrackId = i64;

/// One application returned by a search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppStoreApp {
    pub track_id: TrackId,
    pub track_name: String,
    #[serde(default)]
    pub bundle_id: Option<String>,
    #[serde(default)]
    pub primary_genre_name: Option<String>,
    #[serde(default)]
    pub average_user_rating: Option<f64>,
    #[serde(default)]
    pub user_rating_count: Option<i64>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub release_notes: Option<String>,
    #[serde(default, rename = "artworkUrl512")]
    pub artwork_url: Option<String>,
    #[serde(default)]
    pub track_view_url: Option<String>,
}

/// Bit pattern used to compare and hash ratings; `-0.0` folds into `0.0`.
fn rating_bits(rating: Option<f64>) -> Option<u64> {
    rating.map(|r| if r == 0.0 { 0.0_f64.to_bits() } else { r.to_bits() })
}

impl PartialEq for AppStoreApp {
    fn eq(&self, other: &Self) -> bool {
        self.track_id == other.track_id
            && self.track_name == other.track_name
            && self.bundle_id == other.bundle_id
            && self.primary_genre_name == other.primary_genre_name
            && rating_bits(self.average_user_rating) == rating_bits(other.average_user_rating)
            && self.user_rating_count == other.user_rating_count
            && self.version == other.version
            && self.release_notes == other.release_notes
            && self.artwork_url == other.artwork_url
            && self.track_view_url == other.track_view_url
    }
}

impl Eq for AppStoreApp {}

impl Hash for AppStoreApp {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.track_id.hash(state);
        self.track_name.hash(state);
        self.bundle_id.hash(state);
        self.primary_genre_name.hash(state);
        rating_bits(self.average_user_rating).hash(state);
        self.user_rating_count.hash(state);
        self.version.hash(state);
        self.release_notes.hash(state);
        self.artwork_url.hash(state);
        self.track_view_url.hash(state);
    }
}

impl AppStoreApp {
    /// Creates a record with only the required fields set.
    ///
    /// # Examples
    ///
    /// ```
    /// use storesearch::domain::AppStoreApp;
    ///
    /// let app = AppStoreApp::new(1, "Calc Pro");
    /// assert_eq!(app.track_name, "Calc Pro");
    /// assert!(app.bundle_id.is_none());
    /// ```
    #[must_use]
    pub fn new(track_id: TrackId, track_name: impl Into<String>) -> Self {
        Self {
            track_id,
            track_name: track_name.into(),
            bundle_id: None,
            primary_genre_name: None,
            average_user_rating: None,
            user_rating_count: None,
            version: None,
            release_notes: None,
            artwork_url: None,
            track_view_url: None,
        }
    }

    /// Parsed icon URL, `None` when absent or malformed.
    #[must_use]
    pub fn icon_url(&self) -> Option<url::Url> {
        self.artwork_url.as_deref().and_then(|s| url::Url::parse(s).ok())
    }

    /// Parsed store page URL, `None` when absent or malformed.
    #[must_use]
    pub fn store_url(&self) -> Option<url::Url> {
        self.track_view_url.as_deref().and_then(|s| url::Url::parse(s).ok())
    }

    /// Rating text for list rows, e.g. `"4.5 (1203)"`.
    ///
    /// Returns `None` when the record carries no rating.
    #[must_use]
    pub fn display_rating(&self) -> Option<String> {
        let rating = self.average_user_rating?;
        Some(match self.user_rating_count {
            Some(count) => format!("{rating:.1} ({count})"),
            None => format!("{rating:.1}"),
        })
    }
}

/// Top-level envelope of an iTunes Search API response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub result_count: usize,
    pub results: Vec<AppStoreApp>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::collections::HashSet;

    const SAMPLE: &str = r#"{
        "resultCount": 2,
        "results": [
            {
                "trackId": 1,
                "trackName": "Calc Pro",
                "bundleId": "com.example.calc",
                "primaryGenreName": "Utilities",
                "averageUserRating": 4.56,
                "userRatingCount": 1203,
                "version": "2.1",
                "artworkUrl512": "https://example.com/icon.png",
                "trackViewUrl": "https://apps.apple.com/app/id1",
                "kind": "software"
            },
            { "trackId": 2, "trackName": "Simple Calc" }
        ]
    }"#;

    #[test]
    fn decodes_itunes_payload_in_server_order() {
        let response: SearchResponse = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(response.result_count, 2);
        let ids: Vec<_> = response.results.iter().map(|a| a.track_id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(response.results[0].bundle_id.as_deref(), Some("com.example.calc"));
        assert!(response.results[1].primary_genre_name.is_none());
    }

    #[test]
    fn equality_covers_every_field() {
        let a = AppStoreApp::new(7, "Notes");
        let mut b = a.clone();
        b.version = Some("1.0".to_string());

        assert_ne!(a, b);
        let set: HashSet<_> = [a.clone(), b, a].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn ratings_compare_and_hash_consistently() {
        fn hash_of(app: &AppStoreApp) -> u64 {
            let mut hasher = DefaultHasher::new();
            app.hash(&mut hasher);
            hasher.finish()
        }

        let mut zero = AppStoreApp::new(3, "Zero");
        zero.average_user_rating = Some(0.0);
        let mut negative_zero = zero.clone();
        negative_zero.average_user_rating = Some(-0.0);
        assert_eq!(zero, negative_zero);
        assert_eq!(hash_of(&zero), hash_of(&negative_zero));

        let mut nan = AppStoreApp::new(4, "Unrated");
        nan.average_user_rating = Some(f64::NAN);
        assert_eq!(nan, nan.clone());
        assert_ne!(nan, AppStoreApp::new(4, "Unrated"));
    }

    #[test]
    fn formats_rating_and_urls() {
        let response: SearchResponse = serde_json::from_str(SAMPLE).unwrap();
        let app = &response.results[0];
        assert_eq!(app.display_rating().as_deref(), Some("4.6 (1203)"));
        assert_eq!(app.icon_url().unwrap().host_str(), Some("example.com"));
        assert!(response.results[1].display_rating().is_none());

        let mut broken = app.clone();
        broken.track_view_url = Some("not a url".to_string());
        assert!(broken.store_url().is_none());
    }
}
