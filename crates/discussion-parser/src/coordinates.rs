//! Coordinate token extraction.
//!
//! Discussions encode the area of concern as whitespace-separated 8-digit
//! tokens, `LLLLOOOO`: latitude `LL.LL` degrees north followed by longitude
//! `OO.OO` degrees west. Example: `42127648` is 42.12N 76.48W.

use meso_common::{GeoPoint, MesoError, MesoResult, Polygon};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

/// Word-delimited runs of exactly eight ASCII digits.
static COORDINATE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[0-9]{8}\b").expect("coordinate token regex should compile"));

/// Minimum number of distinct vertices in a polygon.
const MIN_DISTINCT_TOKENS: usize = 3;

/// All coordinate tokens in `text`, in order of appearance.
pub fn find_tokens(text: &str) -> Vec<&str> {
    COORDINATE_TOKEN
        .find_iter(text)
        .map(|m| m.as_str())
        .collect()
}

/// Decode one 8-digit token into a point.
///
/// Latitude is `t[0..2].t[2..4]`; longitude is `-t[4..6].t[6..8]` (always
/// western hemisphere).
pub fn decode_token(token: &str) -> MesoResult<GeoPoint> {
    if token.len() != 8 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MesoError::MalformedDiscussion(format!(
            "'{}' is not an 8-digit coordinate token",
            token
        )));
    }

    // Parse through the decimal string so 40.12 is the same f64 as the literal.
    let lat: f64 = format!("{}.{}", &token[0..2], &token[2..4])
        .parse()
        .map_err(|_| MesoError::MalformedDiscussion(format!("bad latitude in '{}'", token)))?;
    let lon: f64 = format!("-{}.{}", &token[4..6], &token[6..8])
        .parse()
        .map_err(|_| MesoError::MalformedDiscussion(format!("bad longitude in '{}'", token)))?;

    GeoPoint::new(lat, lon).map_err(|e| {
        MesoError::MalformedDiscussion(format!("token '{}' out of range: {}", token, e))
    })
}

/// Extract the closed area-of-concern polygon from discussion text.
///
/// Fails with `MalformedDiscussion` when fewer than three distinct tokens
/// are present or a token decodes out of range. A ring whose last token does
/// not repeat the first is closed here and logged as a data-quality warning.
pub fn extract_polygon(text: &str) -> MesoResult<Polygon> {
    let tokens = find_tokens(text);

    let mut distinct: Vec<&str> = Vec::with_capacity(tokens.len());
    for token in &tokens {
        if !distinct.contains(token) {
            distinct.push(token);
        }
    }
    if distinct.len() < MIN_DISTINCT_TOKENS {
        return Err(MesoError::MalformedDiscussion(format!(
            "found {} distinct coordinate token(s) [{}], need at least {}",
            distinct.len(),
            tokens.join(" "),
            MIN_DISTINCT_TOKENS
        )));
    }

    let mut vertices = tokens
        .iter()
        .map(|t| decode_token(t))
        .collect::<MesoResult<Vec<_>>>()?;

    if close_ring(&mut vertices) {
        warn!(
            first = tokens[0],
            last = tokens[tokens.len() - 1],
            "Discussion polygon is not self-closing, appended first vertex"
        );
    }

    debug!(
        tokens = tokens.len(),
        vertices = vertices.len(),
        "Extracted discussion polygon"
    );

    Polygon::new(vertices)
}

/// Append the first vertex when the ring is open. Returns true if it did.
fn close_ring(vertices: &mut Vec<GeoPoint>) -> bool {
    match (vertices.first(), vertices.last()) {
        (Some(&first), Some(last)) if first != *last => {
            vertices.push(first);
            true
        }
        _ => false,
    }
}
