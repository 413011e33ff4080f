//! End-to-end generation with synthetic glyph faces.

use std::fs;
use std::sync::Arc;

use glyphset::config::{GeneratorConfig, LayoutMode, PlanKind};
use glyphset::label::{LabelEncoder, LabelRecord, class_id};
use glyphset::layout::{LayoutEngine, ScatteredLayout, SequentialLayout, Strategy, StyleSampler};
use glyphset::orchestrator::{Job, Orchestrator};
use glyphset::sample::{Sample, Split};
use glyphset::sink::{DirectorySink, MemorySink, SampleSink};
use glyphset::{DatasetError, DatasetResult};
use glyphset_render::text::{FontSource, GlyphRenderer, StaticCatalog, SyntheticFace};
use glyphset_render::{Canvas, CanvasSize, Color, OutputFormat, PixelBox};
use rand::SeedableRng;
use rand::rngs::StdRng;

const CANVAS: CanvasSize = CanvasSize::new(150, 50);

fn synthetic(name: &str) -> FontSource {
    FontSource::new(name, Arc::new(SyntheticFace::new()))
}

fn catalog(fonts: usize) -> StaticCatalog {
    (0..fonts).fold(StaticCatalog::new(), |c, i| {
        c.with_source(synthetic(&format!("font{i}")))
    })
}

fn engine(strategy: Strategy) -> LayoutEngine {
    let styles = StyleSampler {
        hollow_probability: 0.5,
        shadow_probability: 0.0,
    };
    LayoutEngine::new(GlyphRenderer::default(), styles, strategy)
}

#[test]
fn sequential_a1b_yields_three_labels() {
    let mut canvas = Canvas::new(CANVAS, Color::WHITE).unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    let text: Vec<char> = "A1b".chars().collect();

    let outcome = engine(Strategy::Sequential(SequentialLayout::default())).place(
        &mut canvas,
        &synthetic("seq"),
        &text,
        &mut rng,
    );
    let records = LabelEncoder::new(CANVAS).encode_all(&outcome.placements);

    let classes: Vec<u8> = records.iter().map(|r| r.class_id).collect();
    assert_eq!(classes, vec![0, 27, 1]);
    for (record, placement) in records.iter().zip(&outcome.placements) {
        assert!(placement.bbox.is_within(CANVAS));
        assert!(record.is_normalized());
        assert_eq!(placement.size, 36.0);
    }
}

#[test]
fn scattered_crowd_drops_but_never_overlaps() {
    let mut canvas = Canvas::new(CANVAS, Color::WHITE).unwrap();
    let mut rng = StdRng::seed_from_u64(2024);
    let pool: Vec<char> = "abcdefghijklmnopqrstuvwxyz0123456789".chars().collect();
    let text: Vec<char> = pool.iter().copied().cycle().take(200).collect();

    let layout = ScatteredLayout::default();
    let margin = layout.config().spacing_margin;
    let outcome = engine(Strategy::Scattered(layout)).place(
        &mut canvas,
        &synthetic("scatter"),
        &text,
        &mut rng,
    );
    let records = LabelEncoder::new(CANVAS).encode_all(&outcome.placements);

    assert!(outcome.dropped >= 1);
    assert!(records.len() < 200);
    let boxes: Vec<PixelBox> = outcome.placements.iter().map(|p| p.bbox).collect();
    for (i, a) in boxes.iter().enumerate() {
        for b in &boxes[i + 1..] {
            assert!(!a.overlaps(b, margin));
        }
    }
}

#[test]
fn out_of_alphabet_character_is_drawn_but_unlabeled() {
    let mut canvas = Canvas::new(CANVAS, Color::WHITE).unwrap();
    let mut rng = StdRng::seed_from_u64(3);

    let outcome = engine(Strategy::Sequential(SequentialLayout::default())).place(
        &mut canvas,
        &synthetic("seq"),
        &['#'],
        &mut rng,
    );
    assert_eq!(outcome.placements.len(), 1);
    let bbox = outcome.placements[0].bbox;
    assert!(canvas.dark_pixels_in(bbox, 128) > 0);
    assert!(LabelEncoder::new(CANVAS).encode(&outcome.placements[0]).is_none());
    assert_eq!(class_id('#'), None);
}

#[test]
fn labels_decode_and_reencode() {
    let sink = MemorySink::new();
    let mut config = GeneratorConfig::default();
    config.layout.mode = LayoutMode::Scattered;
    config.layout.characters_per_sample = 8;
    config.plan.samples_per_font = 4;
    Orchestrator::new(config).run(&catalog(2), &sink).unwrap();

    for stored in sink.take() {
        for line in stored.label_text().lines() {
            let record: LabelRecord = line.parse().unwrap();
            assert!(record.is_normalized());
            let bbox = record.to_pixel_box(CANVAS);
            assert!(bbox.is_within(CANVAS));
            let again = LabelRecord::from_pixel_box(record.class_id, &bbox, CANVAS);
            assert_eq!(again.to_string(), line);
        }
    }
}

#[test]
fn splits_are_monotonic_and_follow_the_boundary() {
    let sink = MemorySink::new();
    let mut config = GeneratorConfig::default();
    config.plan.samples_per_font = 5;
    let report = Orchestrator::new(config).run(&catalog(3), &sink).unwrap();

    assert_eq!(report.planned, 15);
    assert_eq!(report.written, 15);
    assert_eq!((report.train, report.val), (12, 3));

    let stored = sink.take();
    let indices: Vec<usize> = stored.iter().map(|s| s.sample.index).collect();
    assert_eq!(indices, (0..15).collect::<Vec<_>>());
    let splits: Vec<Split> = stored.iter().map(|s| s.sample.split).collect();
    assert!(splits.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn output_does_not_depend_on_scheduling() {
    let mut config = GeneratorConfig::default();
    config.seed = 99;
    config.plan.kind = PlanKind::Total;
    config.plan.samples = 12;
    let orchestrator = Orchestrator::new(config);
    let fonts = catalog(3);

    let first = MemorySink::new();
    let second = MemorySink::new();
    orchestrator.run(&fonts, &first).unwrap();
    orchestrator.run(&fonts, &second).unwrap();

    for (a, b) in first.take().iter().zip(second.take().iter()) {
        assert_eq!(a.label_text(), b.label_text());
        assert_eq!(a.sample.canvas.to_rgb_image(), b.sample.canvas.to_rgb_image());
    }
}

#[test]
fn directory_run_writes_the_dataset_tree() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = GeneratorConfig::default();
    config.image_format = OutputFormat::Png;
    config.plan.samples_per_font = 3;
    config.characters = "ab#".to_string();

    let sink = DirectorySink::create(dir.path(), config.image_format).unwrap();
    let report = Orchestrator::new(config).run(&catalog(2), &sink).unwrap();
    assert_eq!(report.written, 6);

    // floor(6 * 0.8) = 4 train samples, indices 0..4.
    for index in 0..6 {
        let split = if index < 4 { "train" } else { "val" };
        let image = dir.path().join(format!("images/{split}/{index}.png"));
        let labels = dir.path().join(format!("labels/{split}/{index}.txt"));
        assert!(image.is_file(), "{}", image.display());
        let text = fs::read_to_string(&labels).unwrap();
        assert!(text.is_empty() || text.ends_with('\n'));
        assert!(text.lines().count() <= 3);
    }
    assert_eq!(report.labels + report.unlabeled, 18 - report.dropped);
}

#[test]
fn unlabeled_only_sample_has_empty_label_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = GeneratorConfig::default();
    config.characters = "#".to_string();
    config.distortion.count = 0;

    let sink = DirectorySink::create(dir.path(), OutputFormat::Jpeg).unwrap();
    Orchestrator::new(config).run(&catalog(1), &sink).unwrap();

    let labels = fs::read(dir.path().join("labels/val/0.txt")).unwrap();
    assert!(labels.is_empty());
}

struct FailingSink {
    fail_index: usize,
    inner: MemorySink,
}

impl SampleSink for FailingSink {
    fn write(&self, sample: &Sample, records: &[LabelRecord]) -> DatasetResult<()> {
        if sample.index == self.fail_index {
            return Err(DatasetError::io(
                std::io::Error::other("disk full"),
                format!("{}.txt", sample.index),
            ));
        }
        self.inner.write(sample, records)
    }
}

#[test]
fn persist_failure_only_loses_that_sample() {
    let sink = FailingSink {
        fail_index: 2,
        inner: MemorySink::new(),
    };
    let mut config = GeneratorConfig::default();
    config.plan.samples_per_font = 5;
    let report = Orchestrator::new(config).run(&catalog(1), &sink).unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(report.written, 4);
    let stored = sink.inner.take();
    assert!(stored.iter().all(|s| s.sample.index != 2));
    // Indices after the failure keep their preassigned split.
    let last = stored.last().map(|s| (s.sample.index, s.sample.split));
    assert_eq!(last, Some((4, Split::Val)));
}

#[test]
fn empty_catalog_is_an_error() {
    let sink = MemorySink::new();
    let err = Orchestrator::new(GeneratorConfig::default())
        .run(&StaticCatalog::new(), &sink)
        .unwrap_err();
    assert!(matches!(err, DatasetError::NoFonts));

    let job = Job {
        index: 0,
        split: Split::Train,
        font: Some(3),
    };
    let err = Orchestrator::new(GeneratorConfig::default())
        .build_sample(&job, &[synthetic("only")])
        .unwrap_err();
    assert!(matches!(err, DatasetError::NoFonts));
}
