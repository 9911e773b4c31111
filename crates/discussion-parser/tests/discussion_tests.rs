//! Integration tests for discussion polygon and validity extraction.

use chrono::{Duration, NaiveDate};
use discussion_parser::{extract_polygon, parse_validity, Discussion, ValidityParser};
use meso_common::MesoError;
use test_utils::discussion::{
    NO_PRE_HTML, RAW_LAT_LON, SHORT_PRE_HTML, SPC_MD_HTML, SPC_MD_VERTICES, WPC_MPD_HTML,
};
use test_utils::assert_coords_approx_eq;

// ============================================================================
// extract_polygon tests
// ============================================================================

#[test]
fn test_three_tokens_close_to_four_vertices() {
    let polygon = extract_polygon("40125075 41005076 40755074").unwrap();
    let vertices = polygon.vertices();

    assert_eq!(vertices.len(), 4);
    assert_eq!(vertices[0], vertices[3]);
    assert_eq!(vertices[0].latitude, 40.12);
    assert_eq!(vertices[0].longitude, -50.75);
    assert_eq!(vertices[1].latitude, 41.00);
    assert_eq!(vertices[1].longitude, -50.76);
}

#[test]
fn test_two_tokens_rejected() {
    let err = extract_polygon("LAT...LON 40125075 41005076").unwrap_err();
    match err {
        MesoError::MalformedDiscussion(msg) => {
            assert!(msg.contains("40125075"), "message should name tokens: {}", msg)
        }
        other => panic!("expected MalformedDiscussion, got {:?}", other),
    }
}

#[test]
fn test_repeated_tokens_count_once() {
    // Three tokens but only two distinct points
    let result = extract_polygon("40125075 41005076 40125075");
    assert!(matches!(result, Err(MesoError::MalformedDiscussion(_))));
}

#[test]
fn test_no_tokens_rejected() {
    let result = extract_polygon("No coordinates in this discussion.");
    assert!(matches!(result, Err(MesoError::MalformedDiscussion(_))));
}

#[test]
fn test_out_of_range_latitude_rejected() {
    let result = extract_polygon("40125075 41005076 99995074");
    assert!(matches!(result, Err(MesoError::MalformedDiscussion(_))));
}

#[test]
fn test_self_closing_ring_not_duplicated() {
    let polygon = extract_polygon(RAW_LAT_LON).unwrap();
    assert_eq!(polygon.vertex_count(), SPC_MD_VERTICES.len());

    for (vertex, &(lat, lon)) in polygon.vertices().iter().zip(SPC_MD_VERTICES.iter()) {
        assert_coords_approx_eq!((vertex.latitude, vertex.longitude), (lat, lon), 1e-9);
    }
}

// ============================================================================
// parse_validity tests
// ============================================================================

#[test]
fn test_validity_three_hours_apart() {
    let issued = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
    let window = parse_validity("Valid 051530Z - 051830Z", issued).unwrap();

    assert_eq!(window.end - window.start, Duration::hours(3));
    assert_eq!(window.start, issued.and_hms_opt(11, 30, 0).unwrap());
    assert_eq!(window.end, issued.and_hms_opt(14, 30, 0).unwrap());
}

#[test]
fn test_validity_zero_matches() {
    let issued = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
    let result = parse_validity("Valid sometime this afternoon", issued);
    assert!(matches!(result, Err(MesoError::NoValidityFound(_))));
}

#[test]
fn test_validity_custom_offset() {
    let issued = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
    let window = ValidityParser::new(-5)
        .parse("Valid 051530Z - 051830Z", issued)
        .unwrap();
    assert_eq!(window.start, issued.and_hms_opt(10, 30, 0).unwrap());
}

// ============================================================================
// Discussion page tests
// ============================================================================

#[test]
fn test_spc_page_end_to_end() {
    let discussion = Discussion::from_html(SPC_MD_HTML);

    assert_eq!(
        discussion.issuance_date().unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
    );

    let polygon = discussion.polygon().unwrap();
    assert_eq!(polygon.vertex_count(), 6);

    let window = discussion.validity(&ValidityParser::default()).unwrap();
    // 052045Z - 060045Z, shifted by -4h
    assert_eq!(
        window.label(),
        "Valid from 04:45 PM January 05 to 08:45 PM January 05"
    );
}

#[test]
fn test_wpc_page_open_ring_closed() {
    let discussion = Discussion::from_html(WPC_MPD_HTML);
    let polygon = discussion.polygon().unwrap();

    assert_eq!(polygon.vertex_count(), 5);
    assert_eq!(polygon.vertices()[0], polygon.vertices()[4]);

    let window = discussion.validity(&ValidityParser::default()).unwrap();
    assert_eq!(window.duration(), Duration::hours(6));
}

#[test]
fn test_raw_text_has_no_issuance_date() {
    let discussion = Discussion::from_raw_text(RAW_LAT_LON);
    assert!(discussion.preformatted().is_none());
    assert!(matches!(
        discussion.issuance_date(),
        Err(MesoError::UnparsableIssuanceDate(_))
    ));
    assert!(discussion.polygon().is_ok());
}

#[test]
fn test_page_without_product_block_fails_validity() {
    let discussion = Discussion::from_html(NO_PRE_HTML);

    assert!(discussion.preformatted().is_none());
    assert!(discussion.text().contains("052045Z"));
    assert_eq!(discussion.polygon().unwrap().vertex_count(), 6);
    assert!(matches!(
        discussion.validity(&ValidityParser::default()),
        Err(MesoError::UnparsableIssuanceDate(_))
    ));
}

#[test]
fn test_short_product_block_fails_issuance() {
    let discussion = Discussion::from_html(SHORT_PRE_HTML);
    assert!(matches!(
        discussion.validity(&ValidityParser::default()),
        Err(MesoError::UnparsableIssuanceDate(_))
    ));
}
