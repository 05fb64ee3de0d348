//! Ordering of mixed-type search results.

use super::model::SearchResult;

/// Sort search results by the type-priority table.
///
/// Songs first, then albums, playlists, videos and artists. Unknown types go
/// last. The sort is stable, so rows of equal priority keep the order the
/// catalog returned them in.
pub fn sort_by_type_priority(results: &mut [SearchResult]) {
    results.sort_by_key(|result| result.kind.priority());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, Value, json};

    fn row(kind: &str, id: u32) -> SearchResult {
        let mut fields = Map::new();
        fields.insert("id".to_string(), json!(id));
        SearchResult::new(kind, fields)
    }

    fn ids(results: &[SearchResult]) -> Vec<u64> {
        results
            .iter()
            .filter_map(|r| r.fields.get("id").and_then(Value::as_u64))
            .collect()
    }

    #[test]
    fn test_sorts_by_priority_table() {
        let mut results = vec![
            row("ARTIST", 1),
            row("VIDEO", 2),
            row("PLAYLIST", 3),
            row("ALBUM", 4),
            row("SONG", 5),
        ];
        sort_by_type_priority(&mut results);
        assert_eq!(ids(&results), vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_video_song_artist_scenario() {
        let mut results = vec![row("VIDEO", 1), row("SONG", 2), row("ARTIST", 3)];
        sort_by_type_priority(&mut results);
        let kinds: Vec<_> = results.iter().map(|r| r.kind.as_str()).collect();
        assert_eq!(kinds, vec!["SONG", "VIDEO", "ARTIST"]);
    }

    #[test]
    fn test_sort_is_stable() {
        let mut results = vec![
            row("SONG", 1),
            row("ALBUM", 2),
            row("SONG", 3),
            row("ALBUM", 4),
            row("SONG", 5),
        ];
        sort_by_type_priority(&mut results);
        assert_eq!(ids(&results), vec![1, 3, 5, 2, 4]);
    }

    #[test]
    fn test_unknown_types_sort_last_in_input_order() {
        let mut results = vec![
            row("EPISODE", 1),
            row("ARTIST", 2),
            row("PODCAST", 3),
            row("SONG", 4),
        ];
        sort_by_type_priority(&mut results);
        assert_eq!(ids(&results), vec![4, 2, 1, 3]);
    }

    #[test]
    fn test_empty_input() {
        let mut results: Vec<SearchResult> = Vec::new();
        sort_by_type_priority(&mut results);
        assert!(results.is_empty());
    }
}
