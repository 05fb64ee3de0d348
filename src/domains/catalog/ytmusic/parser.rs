//! Turn InnerTube payloads into catalog values.
//!
//! Each parser reads the handful of fields the public catalog shape exposes
//! and ignores the rest of the renderer tree.

use serde_json::{Value, json};

use super::traverse::{traverse_array, traverse_first, traverse_list, traverse_string};
use crate::domains::catalog::model::{
    AlbumDetails, HomeSection, SearchResult, SongDetails, from_object,
};

const PAGE_TYPE_ALBUM: &str = "MUSIC_PAGE_TYPE_ALBUM";
const PAGE_TYPE_PLAYLIST: &str = "MUSIC_PAGE_TYPE_PLAYLIST";
const PAGE_TYPE_ARTIST: &str = "MUSIC_PAGE_TYPE_ARTIST";
const PAGE_TYPE_USER_CHANNEL: &str = "MUSIC_PAGE_TYPE_USER_CHANNEL";

// ============================================================================
// Runs
// ============================================================================

fn text(run: &Value) -> String {
    traverse_string(run, &["text"]).unwrap_or_default()
}

fn page_type(run: &Value) -> String {
    traverse_string(run, &["pageType"]).unwrap_or_default()
}

fn is_artist(run: &Value) -> bool {
    matches!(
        page_type(run).as_str(),
        PAGE_TYPE_ARTIST | PAGE_TYPE_USER_CHANNEL
    )
}

fn is_album(run: &Value) -> bool {
    page_type(run) == PAGE_TYPE_ALBUM
}

fn is_duration(run: &Value) -> bool {
    parse_duration(&text(run)).is_some()
}

/// Seconds of the first run that reads as a duration.
fn duration_in(runs: &[&Value]) -> Option<u64> {
    runs.iter()
        .copied()
        .find(|run| is_duration(run))
        .and_then(|run| parse_duration(&text(run)))
}

fn artist_of(run: Option<&Value>) -> Value {
    match run {
        Some(run) => json!({
            "name": text(run),
            "artistId": traverse_string(run, &["browseId"]),
        }),
        None => Value::Null,
    }
}

fn album_of(run: Option<&Value>) -> Value {
    match run {
        Some(run) => json!({
            "name": text(run),
            "albumId": traverse_string(run, &["browseId"]),
        }),
        None => Value::Null,
    }
}

/// Parse `"m:ss"` or `"h:mm:ss"` into seconds.
pub fn parse_duration(time: &str) -> Option<u64> {
    let parts: Vec<&str> = time.trim().split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return None;
    }

    parts.iter().try_fold(0u64, |total, part| {
        if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(total * 60 + part.parse::<u64>().ok()?)
    })
}

fn parse_year(text: &str) -> Option<u64> {
    let trimmed = text.trim();
    if trimmed.len() == 4 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        trimmed.parse().ok()
    } else {
        None
    }
}

// ============================================================================
// Search
// ============================================================================

/// Parse every result row of a search response.
///
/// Rows whose type column is not recognized are dropped.
pub fn parse_search(data: &Value) -> Vec<SearchResult> {
    traverse_list(
        data,
        &["tabs", "tabRenderer", "musicShelfRenderer", "contents"],
    )
    .into_iter()
    .filter_map(parse_search_item)
    .collect()
}

/// Parse one `musicResponsiveListItemRenderer` search row.
pub fn parse_search_item(item: &Value) -> Option<SearchResult> {
    let flex_columns = traverse_list(item, &["flexColumns"]);
    let type_label = flex_columns
        .get(1)
        .and_then(|column| traverse_string(column, &["runs", "text"]))?;

    let runs = traverse_list(item, &["flexColumns", "runs"]);
    let title = runs.first().map(|run| text(run)).unwrap_or_default();
    let artist = runs.iter().copied().find(|run| is_artist(run));
    let thumbnails = traverse_array(item, &["thumbnails"]);

    let value = match type_label.as_str() {
        "Song" => json!({
            "type": "SONG",
            "videoId": traverse_string(item, &["playlistItemData", "videoId"]),
            "name": title,
            "artist": artist_of(artist.or_else(|| runs.get(3).copied())),
            "album": album_of(runs.iter().copied().find(|run| is_album(run))),
            "duration": duration_in(&runs),
            "thumbnails": thumbnails,
        }),
        "Video" => json!({
            "type": "VIDEO",
            "videoId": traverse_string(item, &["playlistItemData", "videoId"]),
            "name": title,
            "artist": artist_of(artist.or_else(|| runs.get(3).copied())),
            "duration": duration_in(&runs),
            "thumbnails": thumbnails,
        }),
        "Artist" => json!({
            "type": "ARTIST",
            "artistId": traverse_string(item, &["browseId"]),
            "name": title,
            "thumbnails": thumbnails,
        }),
        "Album" | "EP" | "Single" => json!({
            "type": "ALBUM",
            "albumId": traverse_list(item, &["browseId"]).last().and_then(|v| v.as_str()),
            "playlistId": traverse_string(item, &["overlay", "playlistId"]),
            "name": title,
            "artist": artist_of(artist),
            "year": runs.last().and_then(|run| parse_year(&text(run))),
            "thumbnails": thumbnails,
        }),
        "Playlist" => json!({
            "type": "PLAYLIST",
            "playlistId": traverse_string(item, &["overlay", "playlistId"]),
            "name": title,
            "artist": artist_of(artist.or_else(|| runs.get(2).copied())),
            "thumbnails": thumbnails,
        }),
        _ => return None,
    };

    from_object(value)
}

// ============================================================================
// Home
// ============================================================================

/// Parse one shelf of the home feed.
pub fn parse_home_section(section: &Value) -> Option<HomeSection> {
    let shelf = renderer(section)?;
    let title = traverse_string(shelf, &["header", "title", "text"]).unwrap_or_default();
    let contents = shelf
        .get("contents")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(parse_mixed_content).collect())
        .unwrap_or_default();

    Some(HomeSection { title, contents })
}

/// Parse one tile of a home shelf into a search-like value.
pub fn parse_mixed_content(item: &Value) -> Option<Value> {
    if let Some(tile) = item.get("musicTwoRowItemRenderer") {
        return parse_two_row_item(tile);
    }
    if let Some(row) = item.get("musicResponsiveListItemRenderer") {
        return parse_list_item(row);
    }
    None
}

fn parse_two_row_item(tile: &Value) -> Option<Value> {
    let name = traverse_string(tile, &["title", "text"]).unwrap_or_default();
    let subtitle = traverse_list(tile, &["subtitle", "runs"]);
    let artist = subtitle.iter().copied().find(|run| is_artist(run));
    let thumbnails = traverse_array(tile, &["thumbnailRenderer", "thumbnails"]);
    let navigation = tile.get("navigationEndpoint")?;
    let browse_id = traverse_string(navigation, &["browseId"]);

    let value = match page_type(navigation).as_str() {
        PAGE_TYPE_ALBUM => json!({
            "type": "ALBUM",
            "albumId": browse_id,
            "playlistId": traverse_string(tile, &["thumbnailOverlay", "playlistId"]),
            "name": name,
            "artist": artist_of(artist),
            "year": subtitle.last().and_then(|run| parse_year(&text(run))),
            "thumbnails": thumbnails,
        }),
        PAGE_TYPE_PLAYLIST => json!({
            "type": "PLAYLIST",
            "playlistId": browse_id
                .map(|id| id.strip_prefix("VL").map(str::to_string).unwrap_or(id)),
            "name": name,
            "artist": artist_of(artist),
            "thumbnails": thumbnails,
        }),
        PAGE_TYPE_ARTIST | PAGE_TYPE_USER_CHANNEL => json!({
            "type": "ARTIST",
            "artistId": browse_id,
            "name": name,
            "thumbnails": thumbnails,
        }),
        _ => {
            let video_id = traverse_string(navigation, &["watchEndpoint", "videoId"])?;
            json!({
                "type": "VIDEO",
                "videoId": video_id,
                "name": name,
                "artist": artist_of(artist),
                "duration": Value::Null,
                "thumbnails": thumbnails,
            })
        }
    };

    Some(value)
}

fn parse_list_item(row: &Value) -> Option<Value> {
    let runs = traverse_list(row, &["flexColumns", "runs"]);
    let video_id = traverse_string(row, &["playlistItemData", "videoId"])?;
    let name = runs.first().map(|run| text(run)).unwrap_or_default();
    let artist = runs.iter().copied().find(|run| is_artist(run));
    let album = runs.iter().copied().find(|run| is_album(run));
    let thumbnails = traverse_array(row, &["thumbnails"]);

    // Rows that link an album are songs; anything else is a plain video.
    let value = if album.is_some() {
        json!({
            "type": "SONG",
            "videoId": video_id,
            "name": name,
            "artist": artist_of(artist),
            "album": album_of(album),
            "duration": Value::Null,
            "thumbnails": thumbnails,
        })
    } else {
        json!({
            "type": "VIDEO",
            "videoId": video_id,
            "name": name,
            "artist": artist_of(artist),
            "duration": Value::Null,
            "thumbnails": thumbnails,
        })
    };

    Some(value)
}

/// The single renderer object wrapped by a shelf entry.
fn renderer(value: &Value) -> Option<&Value> {
    value.as_object()?.values().next()
}

// ============================================================================
// Album
// ============================================================================

/// Parse an album browse page. Returns `None` when the page has no title.
pub fn parse_album(data: &Value, album_id: &str) -> Option<AlbumDetails> {
    let name = traverse_string(data, &["tabs", "title", "text"])
        .or_else(|| traverse_string(data, &["header", "title", "text"]))
        .filter(|name| !name.is_empty())?;

    let mut artist_runs = traverse_list(data, &["tabs", "straplineTextOne", "runs"]);
    if artist_runs.is_empty() {
        artist_runs = traverse_list(data, &["header", "subtitle", "runs"]);
    }
    let artist = artist_of(
        artist_runs
            .iter()
            .copied()
            .find(|run| is_artist(run))
            .or_else(|| artist_runs.first().copied()),
    );

    let mut subtitle = traverse_list(data, &["tabs", "subtitle", "text"]);
    if subtitle.is_empty() {
        subtitle = traverse_list(data, &["header", "subtitle", "text"]);
    }
    let year = subtitle
        .iter()
        .rev()
        .filter_map(|v| v.as_str())
        .find_map(parse_year);

    let mut thumbnails = traverse_array(data, &["background", "thumbnails"]);
    if thumbnails.as_array().is_some_and(Vec::is_empty) {
        thumbnails = traverse_array(data, &["header", "thumbnails"]);
    }

    let album = json!({ "name": name, "albumId": album_id });
    let songs: Vec<Value> = traverse_list(data, &["musicResponsiveListItemRenderer"])
        .into_iter()
        .map(|item| parse_album_song(item, &artist, &album, &thumbnails))
        .collect();

    from_object(json!({
        "type": "ALBUM",
        "albumId": album_id,
        "name": name,
        "playlistId": traverse_string(data, &["musicPlayButtonRenderer", "playlistId"]),
        "artist": artist,
        "year": year,
        "thumbnails": thumbnails,
        "songs": songs,
    }))
}

fn parse_album_song(item: &Value, artist: &Value, album: &Value, thumbnails: &Value) -> Value {
    let runs = traverse_list(item, &["flexColumns", "runs"]);
    let duration = traverse_string(item, &["fixedColumns", "runs", "text"])
        .as_deref()
        .and_then(parse_duration);

    json!({
        "type": "SONG",
        "videoId": traverse_string(item, &["playlistItemData", "videoId"]),
        "name": runs.first().map(|run| text(run)).unwrap_or_default(),
        "artist": artist,
        "album": album,
        "duration": duration,
        "thumbnails": thumbnails,
    })
}

// ============================================================================
// Song
// ============================================================================

/// Parse a `player` response. Returns `None` when the video is unknown.
pub fn parse_song(data: &Value) -> Option<SongDetails> {
    let details = data.get("videoDetails")?;
    let name = traverse_string(details, &["title"])?;
    let duration = traverse_first(details, &["lengthSeconds"]).and_then(|v| match v {
        Value::String(s) => s.parse::<u64>().ok(),
        other => other.as_u64(),
    });

    from_object(json!({
        "type": "SONG",
        "videoId": traverse_string(details, &["videoId"]),
        "name": name,
        "artist": {
            "name": traverse_string(details, &["author"]),
            "artistId": traverse_string(details, &["channelId"]),
        },
        "duration": duration,
        "thumbnails": traverse_array(details, &["thumbnails"]),
        "formats": traverse_array(data, &["streamingData", "formats"]),
        "adaptiveFormats": traverse_array(data, &["streamingData", "adaptiveFormats"]),
    }))
}

/// Whether `video_id` has the shape of a catalog video id.
pub fn is_valid_video_id(video_id: &str) -> bool {
    video_id.len() == 11
        && video_id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
