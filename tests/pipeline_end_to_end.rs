use image::{Rgb, RgbImage};
use std::sync::Arc;
use symscan::image::io::encode_png;
use symscan::{Detector, ScanConfig, SymScanError, ThumbnailOracle};

const SYMBOL: u32 = 40;

/// Black/white checkerboard with 8 px cells and a red corner marker.
fn make_symbol() -> RgbImage {
    RgbImage::from_fn(SYMBOL, SYMBOL, |x, y| {
        if x < 8 && y < 8 {
            Rgb([220, 20, 20])
        } else if ((x / 8) + (y / 8)) % 2 == 0 {
            Rgb([0, 0, 0])
        } else {
            Rgb([255, 255, 255])
        }
    })
}

/// White blueprint with the symbol pasted at each location.
fn make_blueprint(width: u32, height: u32, at: &[(u32, u32)]) -> RgbImage {
    let symbol = make_symbol();
    let mut img = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
    for &(x0, y0) in at {
        image::imageops::replace(&mut img, &symbol, i64::from(x0), i64::from(y0));
    }
    img
}

fn detector() -> Detector {
    Detector::new(Arc::new(ThumbnailOracle::default()))
}

#[test]
fn identical_images_match() {
    let bytes = encode_png(&make_symbol()).unwrap();
    let outcome = detector().predict(&bytes, &bytes).unwrap();
    assert!((outcome.score - 1.0).abs() < 1e-5, "score {}", outcome.score);
    assert!(outcome.is_match);
}

#[test]
fn symbol_does_not_match_blank_page() {
    let symbol = encode_png(&make_symbol()).unwrap();
    let blank = encode_png(&RgbImage::from_pixel(40, 40, Rgb([255, 255, 255]))).unwrap();
    let outcome = detector().predict(&symbol, &blank).unwrap();
    assert!(outcome.score < 0.75, "score {}", outcome.score);
    assert!(!outcome.is_match);
}

#[test]
fn scan_finds_every_placed_symbol() {
    // Placements sit on the 20 px stride grid of a 40 px window.
    let placed = [(100u32, 60u32), (260, 180)];
    let blueprint = encode_png(&make_blueprint(400, 300, &placed)).unwrap();
    let reference = encode_png(&make_symbol()).unwrap();

    let report = detector().scan_blueprint(&reference, &blueprint).unwrap();

    assert_eq!(report.windows, 18 * 13);
    assert!(report.candidates >= placed.len());
    assert_eq!(report.matches.len(), placed.len(), "{:?}", report.matches);
    let mut found: Vec<(u32, u32)> = report.matches.iter().map(|m| (m.x, m.y)).collect();
    found.sort_unstable();
    assert_eq!(found, placed.to_vec());
    for m in &report.matches {
        assert_eq!((m.width, m.height), (SYMBOL, SYMBOL));
        assert!(m.score > 0.99);
    }
}

#[test]
fn matches_respect_configured_thresholds() {
    let placed = [(100u32, 60u32)];
    let blueprint = encode_png(&make_blueprint(300, 200, &placed)).unwrap();
    let reference = encode_png(&make_symbol()).unwrap();

    // Nothing can beat a perfect score.
    let strict = detector().with_scan_config(ScanConfig {
        score_threshold: 1.0,
        ..ScanConfig::default()
    });
    let report = strict.scan_blueprint(&reference, &blueprint).unwrap();
    assert!(report.matches.is_empty());
    assert_eq!(report.candidates, 0);
}

#[test]
fn reference_larger_than_blueprint_yields_no_matches() {
    let reference = encode_png(&make_blueprint(120, 120, &[])).unwrap();
    let blueprint = encode_png(&make_blueprint(100, 100, &[])).unwrap();
    let report = detector().scan_blueprint(&reference, &blueprint).unwrap();
    assert_eq!(report.windows, 0);
    assert!(report.matches.is_empty());
}

#[test]
fn empty_reference_is_a_validation_error() {
    let blueprint = encode_png(&make_blueprint(100, 100, &[])).unwrap();
    let det = detector();
    let err = det.scan_blueprint(&[], &blueprint).unwrap_err();
    assert!(matches!(err, SymScanError::Validation { .. }), "{err}");

    // The same context keeps serving.
    let reference = encode_png(&make_symbol()).unwrap();
    assert!(det.scan_blueprint(&reference, &blueprint).is_ok());
}

#[test]
fn undecodable_query_is_a_validation_error() {
    let reference = encode_png(&make_symbol()).unwrap();
    let err = detector().predict(&reference, b"definitely not a png").unwrap_err();
    assert!(matches!(err, SymScanError::Validation { .. }), "{err}");
}
