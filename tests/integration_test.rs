// Integration tests for pixmatch
use image::{Rgb, RgbImage};
use pixmatch::prelude::*;
use pixmatch::{load_catalog, FeatureKind, MatchStrategy};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn small_pipeline() -> FeaturePipeline {
    FeaturePipeline::new(PipelineConfig {
        canonical_size: 64,
        analysis_size: 32,
        brightness_size: 16,
        palette_size: 16,
        ..Default::default()
    })
    .unwrap()
}

fn solid_png(dir: &Path, name: &str, color: [u8; 3]) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_pixel(48, 48, Rgb(color)).save(&path).unwrap();
    path
}

fn stripes_png(dir: &Path, name: &str, period: u32, a: [u8; 3], b: [u8; 3]) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_fn(60, 40, |x, _| if (x / period) % 2 == 0 { Rgb(a) } else { Rgb(b) })
        .save(&path)
        .unwrap();
    path
}

fn gradient_buffer(width: u32, height: u32) -> PixelBuffer {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[(x * 7 % 256) as u8, (y * 5 % 256) as u8, ((x + y) * 3 % 256) as u8]);
        }
    }
    PixelBuffer::new(width, height, ColorMode::Rgb, data).unwrap()
}

#[test]
fn test_fingerprint_length() {
    let dir = TempDir::new().unwrap();
    let pipeline = small_pipeline();

    let from_file = pipeline.fingerprint_path(stripes_png(dir.path(), "s.png", 5, [10, 120, 30], [250, 250, 0])).unwrap();
    assert_eq!(from_file.dim(), FINGERPRINT_DIM);
    assert_eq!(FINGERPRINT_DIM, 1322);

    let buffer = gradient_buffer(37, 23);
    let from_raw = pipeline
        .fingerprint_raw(37, 23, ColorMode::Rgb, buffer.as_bytes().to_vec())
        .unwrap();
    assert_eq!(from_raw.dim(), FINGERPRINT_DIM);
}

#[test]
fn test_identical_solid_images() {
    let dir = TempDir::new().unwrap();
    let pipeline = small_pipeline();

    let a = pipeline.fingerprint_path(solid_png(dir.path(), "a.png", [200, 40, 40])).unwrap();
    let b = pipeline.fingerprint_path(solid_png(dir.path(), "b.png", [200, 40, 40])).unwrap();

    assert_eq!(a, b);
    assert_eq!(combined_similarity(a.as_slice(), b.as_slice()), 1.0);
}

#[test]
fn test_black_and_white() {
    let dir = TempDir::new().unwrap();
    let pipeline = small_pipeline();

    let black = pipeline.fingerprint_path(solid_png(dir.path(), "black.png", [0, 0, 0])).unwrap();
    let white = pipeline.fingerprint_path(solid_png(dir.path(), "white.png", [255, 255, 255])).unwrap();

    assert!(black.tone().mean_brightness() < 0.01);
    assert!(white.tone().mean_brightness() > 0.99);
    assert!(combined_similarity(black.as_slice(), white.as_slice()) < 1.0);
}

#[test]
fn test_similarity_symmetric_and_bounded() {
    let pipeline = small_pipeline();
    let a = pipeline.extract_fingerprint(&gradient_buffer(40, 40)).unwrap();
    let b = pipeline.extract_fingerprint(&PixelBuffer::solid_rgb(40, 40, [30, 160, 90]).unwrap()).unwrap();

    let ab = similarity_breakdown(a.as_slice(), b.as_slice());
    let ba = similarity_breakdown(b.as_slice(), a.as_slice());
    assert_eq!(ab, ba);
    assert!((0.0..=1.0).contains(&ab.combined));
    assert_eq!(combined_similarity(a.as_slice(), &a.as_slice()[..100]), 0.0);
}

#[test]
fn test_deterministic_and_parallel_extraction() {
    let pipeline = small_pipeline();
    let buffers: Vec<PixelBuffer> = (0..6).map(|i| gradient_buffer(30 + i, 30)).collect();

    let sequential: Vec<Fingerprint> = buffers.iter().map(|b| pipeline.extract_fingerprint(b).unwrap()).collect();
    let parallel: Vec<Fingerprint> = pipeline
        .extract_batch(&buffers)
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    assert_eq!(sequential, parallel);
}

#[test]
fn test_unusable_input_is_an_error() {
    let pipeline = small_pipeline();
    assert!(pipeline.fingerprint_image(b"definitely not an image").is_err());
    assert!(pipeline.fingerprint_raw(4, 4, ColorMode::Rgb, vec![0; 10]).is_err());
    assert!(pipeline.fingerprint_raw(0, 4, ColorMode::Rgb, vec![]).is_err());
}

#[test]
fn test_failing_extractors_keep_length() {
    let pipeline = FeaturePipeline::new(PipelineConfig {
        canonical_size: 32,
        analysis_size: 2,
        ..Default::default()
    })
    .unwrap();

    let report = pipeline.extract_features(&gradient_buffer(32, 32)).unwrap();
    let failed = report.failed();
    assert!(failed.contains(&FeatureKind::EdgeFeatures));
    assert!(failed.contains(&FeatureKind::TextureFeatures));
    assert!(!failed.contains(&FeatureKind::ColorHistogram));

    let fingerprint = pipeline.extract_fingerprint(&gradient_buffer(32, 32)).unwrap();
    assert_eq!(fingerprint.dim(), FINGERPRINT_DIM);
}

#[test]
fn test_rank_catalog_from_file() {
    let dir = TempDir::new().unwrap();
    let pipeline = small_pipeline();

    let query_path = stripes_png(dir.path(), "query.png", 6, [220, 30, 30], [20, 20, 20]);
    fs::copy(&query_path, dir.path().join("same.png")).unwrap();
    stripes_png(dir.path(), "close.png", 7, [210, 40, 30], [25, 20, 20]);
    solid_png(dir.path(), "blue.png", [20, 40, 220]);
    solid_png(dir.path(), "white.png", [255, 255, 255]);

    let catalog_path = dir.path().join("catalog.json");
    fs::write(
        &catalog_path,
        r#"[
            {"id": "same", "category": "shirts", "price": 95.0, "image": "same.png"},
            {"id": "close", "category": "shirts", "price": 45.0, "image": "close.png"},
            {"id": "blue", "category": "Hats", "price": 250.0, "image": "blue.png"},
            {"id": 4, "category": "hats", "price": 12.0, "image": "white.png"}
        ]"#,
    )
    .unwrap();

    let items = load_catalog(&catalog_path, &pipeline).unwrap();
    assert_eq!(items.len(), 4);

    let query = Query::new(pipeline.fingerprint_path(&query_path).unwrap()).with_category("shirts");
    let matcher = Matcher::default();
    let outcome = matcher.rank(&query, &items, 3);

    let top = outcome.top().unwrap();
    assert_eq!(top.id, ItemId::from("same"));
    assert_eq!(top.score, 1.0);
    assert_eq!(top.strategy, MatchStrategy::Global);
    assert!(top.category_match);

    assert!(outcome.matches.len() <= 3);
    for m in &outcome.matches {
        assert!(m.score >= matcher.config().min_score);
    }
    for w in outcome.matches.windows(2) {
        assert!(w[0].score >= w[1].score);
    }
    assert!(outcome.confidence > 0.0 && outcome.confidence <= 1.0);
    assert_eq!(outcome.stats.candidates_count, 4);
    assert_eq!(outcome.stats.query_category.as_deref(), Some("shirts"));
}

#[test]
fn test_dark_query_boosts_dark_category() {
    let dir = TempDir::new().unwrap();
    let pipeline = small_pipeline();

    let query = pipeline.fingerprint_path(solid_png(dir.path(), "night.png", [0, 0, 0])).unwrap();
    let charcoal = pipeline.fingerprint_path(solid_png(dir.path(), "charcoal.png", [40, 40, 40])).unwrap();
    let items = vec![
        CatalogItem::new("light", charcoal.clone(), "light", 80.0),
        CatalogItem::new("dark", charcoal, "dark", 80.0),
    ];

    let outcome = rank_candidates(&query, &items, 2, 0.5);
    assert_eq!(outcome.stats.query_category.as_deref(), Some("dark"));

    let top = outcome.top().unwrap();
    assert_eq!(top.id, ItemId::from("dark"));
    assert!(top.category_match);
    assert!(top.score > outcome.matches[1].score);
}

#[test]
fn test_rank_empty_catalog() {
    let outcome = rank_candidates(&Fingerprint::zeroed(), &[], 10, 0.1);
    assert!(outcome.is_empty());
    assert_eq!(outcome.confidence, 0.0);
}

#[test]
fn test_outcome_serializes() {
    let pipeline = small_pipeline();
    let fingerprint = pipeline.extract_fingerprint(&gradient_buffer(24, 24)).unwrap();
    let items = vec![CatalogItem::new(7u64, fingerprint.clone(), "misc", 99.0)];

    let outcome = rank_candidates(&fingerprint, &items, 5, 0.1);
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["matches"][0]["id"], 7);
    assert_eq!(json["matches"][0]["strategy"], "global");
    assert_eq!(json["stats"]["results_count"], 1);
}
