//! Values returned by a catalog client.
//!
//! The gateway only looks at two things inside catalog payloads: the `type`
//! tag of a search result (to rank it) and the `name` of an album or song
//! (to build the envelope message). Everything else is kept as an opaque
//! JSON map and serialized back verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The kind of entity a search result points at.
///
/// Serialized as the upper-case tag used on the wire (`"SONG"`, `"ALBUM"`...).
/// Tags the gateway does not know about are preserved in [`ResultType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResultType {
    Song,
    Album,
    Playlist,
    Video,
    Artist,
    Other(String),
}

impl ResultType {
    /// Wire tag for this type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Song => "SONG",
            Self::Album => "ALBUM",
            Self::Playlist => "PLAYLIST",
            Self::Video => "VIDEO",
            Self::Artist => "ARTIST",
            Self::Other(tag) => tag,
        }
    }

    /// Sort key from the type-priority table. Lower ranks first.
    ///
    /// Unknown tags rank after every known type.
    pub fn priority(&self) -> u8 {
        match self {
            Self::Song => 1,
            Self::Album => 2,
            Self::Playlist => 3,
            Self::Video => 4,
            Self::Artist => 5,
            Self::Other(_) => u8::MAX,
        }
    }
}

impl From<String> for ResultType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "SONG" => Self::Song,
            "ALBUM" => Self::Album,
            "PLAYLIST" => Self::Playlist,
            "VIDEO" => Self::Video,
            "ARTIST" => Self::Artist,
            _ => Self::Other(tag),
        }
    }
}

impl From<&str> for ResultType {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_string())
    }
}

impl From<ResultType> for String {
    fn from(kind: ResultType) -> Self {
        match kind {
            ResultType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ResultType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a catalog search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "type")]
    pub kind: ResultType,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl SearchResult {
    pub fn new(kind: impl Into<ResultType>, fields: Map<String, Value>) -> Self {
        Self {
            kind: kind.into(),
            fields,
        }
    }
}

/// Full details of an album.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumDetails {
    /// Display name, echoed in the envelope message.
    pub name: String,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Full details of a song.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongDetails {
    /// Display name, echoed in the envelope message.
    pub name: String,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// A titled shelf of the home feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeSection {
    pub title: String,
    pub contents: Vec<Value>,
}

/// Convert a parser-built JSON object into a typed catalog value.
pub(crate) fn from_object<T>(value: Value) -> Option<T>
where
    T: for<'de> Deserialize<'de>,
{
    serde_json::from_value(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_type_round_trips_known_tags() {
        for tag in ["SONG", "ALBUM", "PLAYLIST", "VIDEO", "ARTIST"] {
            let kind = ResultType::from(tag);
            assert!(!matches!(kind, ResultType::Other(_)));
            assert_eq!(String::from(kind), tag);
        }
    }

    #[test]
    fn test_result_type_keeps_unknown_tag() {
        let kind = ResultType::from("PODCAST");
        assert_eq!(kind, ResultType::Other("PODCAST".to_string()));
        assert_eq!(kind.as_str(), "PODCAST");
        assert_eq!(kind.priority(), u8::MAX);
    }

    #[test]
    fn test_priority_table_order() {
        assert!(ResultType::Song.priority() < ResultType::Album.priority());
        assert!(ResultType::Album.priority() < ResultType::Playlist.priority());
        assert!(ResultType::Playlist.priority() < ResultType::Video.priority());
        assert!(ResultType::Video.priority() < ResultType::Artist.priority());
    }

    #[test]
    fn test_search_result_preserves_fields() {
        let raw = json!({
            "type": "SONG",
            "videoId": "fJ9rUzIMcZQ",
            "name": "Bohemian Rhapsody",
            "artist": { "name": "Queen", "artistId": null },
            "duration": 355
        });

        let result: SearchResult = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(result.kind, ResultType::Song);
        assert_eq!(serde_json::to_value(&result).unwrap(), raw);
    }

    #[test]
    fn test_album_details_requires_name() {
        let missing: Option<AlbumDetails> = from_object(json!({ "albumId": "x" }));
        assert!(missing.is_none());

        let album: AlbumDetails = from_object(json!({ "name": "A Night at the Opera" })).unwrap();
        assert_eq!(album.name, "A Night at the Opera");
    }
}
