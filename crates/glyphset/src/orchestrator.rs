//! Drives generation over every font source.
//!
//! All jobs are planned up front: each gets its global index, its split and
//! (for per-font plans) its font before any work is dispatched. Jobs then run
//! in parallel on the rayon pool, each with a random stream seeded from the
//! run seed and its index, so the output does not depend on scheduling.

use glyphset_render::text::{FontCatalog, FontSource};
use glyphset_render::{Canvas, Color};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rayon::prelude::*;

use crate::config::{GeneratorConfig, PlanKind};
use crate::distortion::DistortionEngine;
use crate::error::{DatasetError, DatasetResult};
use crate::layout::LayoutEngine;
use crate::sample::{Sample, Split};
use crate::sink::SampleSink;
use crate::targets;

/// Seed of the random stream for the sample at `index`.
pub fn sample_seed(run_seed: u64, index: usize) -> u64 {
    // splitmix64 finalizer over the index-offset seed
    let mut z = run_seed.wrapping_add((index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// One planned sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Job {
    pub index: usize,
    pub split: Split,
    /// Font source position, or `None` to draw one from the sample's stream.
    pub font: Option<usize>,
}

/// Totals for a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub planned: usize,
    pub written: usize,
    /// Samples that could not be built or persisted.
    pub failed: usize,
    pub train: usize,
    pub val: usize,
    /// Label lines written.
    pub labels: usize,
    /// Requested characters that were never drawn.
    pub dropped: usize,
    /// Drawn characters outside the class alphabet.
    pub unlabeled: usize,
}

/// What one persisted sample contributes to the report.
#[derive(Debug, Clone, Copy)]
struct SampleStats {
    split: Split,
    labels: usize,
    dropped: usize,
    unlabeled: usize,
}

impl GenerationReport {
    fn record(&mut self, stats: SampleStats) {
        self.written += 1;
        match stats.split {
            Split::Train => self.train += 1,
            Split::Val => self.val += 1,
        }
        self.labels += stats.labels;
        self.dropped += stats.dropped;
        self.unlabeled += stats.unlabeled;
    }
}

/// Generates and persists a dataset.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    config: GeneratorConfig,
    layout: LayoutEngine,
    distortion: DistortionEngine,
    pool: Vec<char>,
}

impl Orchestrator {
    /// An orchestrator for an already validated configuration.
    pub fn new(config: GeneratorConfig) -> Self {
        let layout = LayoutEngine::from_config(&config);
        let distortion =
            DistortionEngine::new(config.distortion.count, config.distortion.line_width);
        let pool = config.character_pool();
        Self {
            config,
            layout,
            distortion,
            pool,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Assign index, split and font to every sample of the run.
    pub fn plan(&self, font_count: usize) -> Vec<Job> {
        let total = self.config.plan.total_samples(font_count);
        let boundary = Split::boundary(total, self.config.train_ratio);
        let job = |index: usize, font: Option<usize>| Job {
            index,
            split: Split::for_index(index, boundary),
            font,
        };
        match self.config.plan.kind {
            PlanKind::PerFont => (0..font_count)
                .flat_map(|font| std::iter::repeat_n(font, self.config.plan.samples_per_font))
                .enumerate()
                .map(|(index, font)| job(index, Some(font)))
                .collect(),
            PlanKind::Total => (0..total).map(|index| job(index, None)).collect(),
        }
    }

    /// Build the sample for `job` without persisting it.
    pub fn build_sample(&self, job: &Job, sources: &[FontSource]) -> DatasetResult<Sample> {
        let mut rng = StdRng::seed_from_u64(sample_seed(self.config.seed, job.index));
        let font = match job.font {
            Some(i) => sources.get(i),
            None => sources.choose(&mut rng),
        }
        .ok_or(DatasetError::NoFonts)?;

        let text: Vec<char> = (0..self.config.layout.characters_per_sample)
            .filter_map(|_| self.pool.choose(&mut rng).copied())
            .collect();

        let mut canvas = Canvas::new(self.config.canvas.size(), Color::WHITE)?;
        let outcome = self.layout.place(&mut canvas, font, &text, &mut rng);
        self.distortion.apply(&mut canvas, &mut rng);

        Ok(Sample {
            index: job.index,
            split: job.split,
            canvas,
            placements: outcome.placements,
            dropped: outcome.dropped,
        })
    }

    fn run_job<S: SampleSink + ?Sized>(
        &self,
        job: &Job,
        sources: &[FontSource],
        sink: &S,
    ) -> DatasetResult<SampleStats> {
        let sample = self.build_sample(job, sources)?;
        let records = sample.records();
        sink.write(&sample, &records)?;
        Ok(SampleStats {
            split: sample.split,
            labels: records.len(),
            dropped: sample.dropped,
            unlabeled: sample.unlabeled(),
        })
    }

    /// Generate every planned sample from `catalog` into `sink`.
    ///
    /// Fails only when the catalog has no sources. A sample that fails to
    /// build or persist is logged and counted; its index is not reused.
    pub fn run<C, S>(&self, catalog: &C, sink: &S) -> DatasetResult<GenerationReport>
    where
        C: FontCatalog + ?Sized,
        S: SampleSink + ?Sized,
    {
        let sources = catalog.sources();
        if sources.is_empty() {
            return Err(DatasetError::NoFonts);
        }
        let jobs = self.plan(sources.len());
        tracing::info!(
            target: targets::ORCHESTRATOR,
            fonts = sources.len(),
            samples = jobs.len(),
            boundary = Split::boundary(jobs.len(), self.config.train_ratio),
            "starting generation"
        );
        if self.config.plan.kind == PlanKind::PerFont {
            for font in &sources {
                tracing::debug!(target: targets::ORCHESTRATOR, font = %font.name(), "queued font");
            }
        }

        let results: Vec<(usize, DatasetResult<SampleStats>)> = jobs
            .par_iter()
            .map(|job| (job.index, self.run_job(job, &sources, sink)))
            .collect();

        let mut report = GenerationReport {
            planned: jobs.len(),
            ..GenerationReport::default()
        };
        for (index, result) in results {
            match result {
                Ok(stats) => report.record(stats),
                Err(e) => {
                    tracing::error!(target: targets::ORCHESTRATOR, index, "sample failed: {}", e);
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            target: targets::ORCHESTRATOR,
            written = report.written,
            failed = report.failed,
            train = report.train,
            val = report.val,
            labels = report.labels,
            dropped = report.dropped,
            "generation finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orchestrator(configure: impl FnOnce(&mut GeneratorConfig)) -> Orchestrator {
        let mut config = GeneratorConfig::default();
        configure(&mut config);
        Orchestrator::new(config)
    }

    #[test]
    fn per_font_plan_keeps_font_order() {
        let o = orchestrator(|c| c.plan.samples_per_font = 2);
        let jobs = o.plan(3);
        let fonts: Vec<_> = jobs.iter().map(|j| j.font).collect();
        assert_eq!(
            fonts,
            vec![Some(0), Some(0), Some(1), Some(1), Some(2), Some(2)]
        );
        assert!(jobs.iter().enumerate().all(|(i, j)| j.index == i));
        // floor(6 * 0.8) = 4
        assert_eq!(jobs[3].split, Split::Train);
        assert_eq!(jobs[4].split, Split::Val);
    }

    #[test]
    fn total_plan_ignores_font_count() {
        let o = orchestrator(|c| {
            c.plan.kind = PlanKind::Total;
            c.plan.samples = 10;
            c.train_ratio = 0.5;
        });
        let jobs = o.plan(3);
        assert_eq!(jobs.len(), 10);
        assert!(jobs.iter().all(|j| j.font.is_none()));
        assert_eq!(jobs.iter().filter(|j| j.split == Split::Train).count(), 5);
    }

    #[test]
    fn seeds_differ_per_index_and_run() {
        assert_ne!(sample_seed(0, 0), sample_seed(0, 1));
        assert_ne!(sample_seed(0, 5), sample_seed(1, 5));
        assert_eq!(sample_seed(7, 3), sample_seed(7, 3));
    }

    #[test]
    fn build_sample_requires_sources() {
        let o = orchestrator(|_| {});
        let job = Job {
            index: 0,
            split: Split::Train,
            font: None,
        };
        assert!(matches!(o.build_sample(&job, &[]), Err(DatasetError::NoFonts)));
    }
}
