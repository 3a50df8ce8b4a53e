//! Owner of the working set of images and their compression results.

use std::sync::Arc;

use thiserror::Error;

use super::cancel::CancellationToken;
use super::report::{BatchReport, ItemOutcome, ItemReport};
use super::worker::run_ordered;
use crate::config::CompressorConfig;
use crate::decode::{decode_source, ImageInput, SourceImage};
use crate::naming::output_file_name;
use crate::params::CompressionLevel;
use crate::pipeline::{compress, CompressError, CompressedImage};

/// Errors from coordinator operations (as opposed to per-item pipeline
/// failures, which are recorded on the item).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    /// The source file exceeds the configured ceiling.
    #[error("{name} is {size} bytes, larger than the {max} byte limit")]
    SourceTooLarge { name: String, size: usize, max: usize },

    /// No item at the given position.
    #[error("no item at index {index} (batch has {len} items)")]
    IndexOutOfRange { index: usize, len: usize },

    /// The run was cancelled before the item started.
    #[error("compression was cancelled")]
    Cancelled,

    /// The pipeline failed for the requested item.
    #[error(transparent)]
    Compress(#[from] CompressError),
}

/// One image in the working set.
///
/// Holds the original bytes for the item's whole life, the decoded source
/// once decoding has succeeded, and the latest compression result.
#[derive(Debug, Clone)]
pub struct BatchItem {
    input: Arc<ImageInput>,
    source: Option<Arc<SourceImage>>,
    compressed: Option<CompressedImage>,
    error: Option<CompressError>,
}

impl BatchItem {
    fn new(input: ImageInput) -> Self {
        Self {
            input: Arc::new(input),
            source: None,
            compressed: None,
            error: None,
        }
    }

    /// Original file name.
    pub fn name(&self) -> &str {
        &self.input.name
    }

    /// Original file size in bytes.
    pub fn original_size(&self) -> usize {
        self.input.byte_size()
    }

    /// The original, undecoded bytes.
    pub fn input(&self) -> &ImageInput {
        &self.input
    }

    /// The decoded source, once decoding has succeeded.
    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_deref()
    }

    /// The latest compression result.
    pub fn compressed(&self) -> Option<&CompressedImage> {
        self.compressed.as_ref()
    }

    /// The error from the latest run, if it failed.
    pub fn error(&self) -> Option<&CompressError> {
        self.error.as_ref()
    }

    /// Download name for the compressed copy.
    pub fn download_name(&self) -> String {
        output_file_name(self.name())
    }

    fn report(&self, index: usize, outcome: ItemOutcome) -> ItemReport {
        ItemReport {
            index,
            name: self.name().to_string(),
            original_size: self.original_size(),
            outcome,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Decode,
    Compress(CompressionLevel),
}

struct Job {
    index: usize,
    input: Arc<ImageInput>,
    source: Option<Arc<SourceImage>>,
}

enum JobResult {
    Decoded(Arc<SourceImage>),
    Compressed(Arc<SourceImage>, CompressedImage),
    /// Decoding succeeded but a later stage failed.
    StageFailed(Arc<SourceImage>, CompressError),
    DecodeFailed(CompressError),
    Cancelled,
}

/// Runs the pipeline over an ordered set of images.
///
/// Every mutating operation takes `&mut self`, so an item is never compressed
/// by two runs at once. Items are independent: one item's failure is recorded
/// on that item and never stops the others.
#[derive(Debug, Clone)]
pub struct BatchCoordinator {
    items: Vec<BatchItem>,
    level: CompressionLevel,
    config: CompressorConfig,
}

impl Default for BatchCoordinator {
    fn default() -> Self {
        Self::with_config(CompressorConfig::default())
    }
}

impl BatchCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CompressorConfig) -> Self {
        Self {
            items: Vec::new(),
            level: config.default_level,
            config,
        }
    }

    pub fn config(&self) -> &CompressorConfig {
        &self.config
    }

    pub fn level(&self) -> CompressionLevel {
        self.level
    }

    /// Set the level for subsequent runs. Out-of-range values are clamped.
    /// Existing results are kept until the next run replaces them.
    pub fn set_level(&mut self, level: impl Into<CompressionLevel>) {
        self.level = level.into();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[BatchItem] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&BatchItem> {
        self.items.get(index)
    }

    /// Append one input. Returns its index.
    ///
    /// # Errors
    ///
    /// `BatchError::SourceTooLarge` if the file exceeds
    /// [`CompressorConfig::max_source_bytes`]; the item is not added.
    pub fn add_item(&mut self, input: ImageInput) -> Result<usize, BatchError> {
        let max = self.config.max_source_bytes;
        if input.byte_size() > max {
            tracing::warn!(name = %input.name, size = input.byte_size(), max, "rejected oversized source");
            return Err(BatchError::SourceTooLarge {
                name: input.name,
                size: input.bytes.len(),
                max,
            });
        }

        self.items.push(BatchItem::new(input));
        Ok(self.items.len() - 1)
    }

    /// Append several inputs, validating each independently.
    pub fn add_items(
        &mut self,
        inputs: impl IntoIterator<Item = ImageInput>,
    ) -> Vec<Result<usize, BatchError>> {
        inputs.into_iter().map(|input| self.add_item(input)).collect()
    }

    /// Replace the working set with a fresh selection. The level is kept.
    pub fn replace_all(
        &mut self,
        inputs: impl IntoIterator<Item = ImageInput>,
    ) -> Vec<Result<usize, BatchError>> {
        self.items.clear();
        self.add_items(inputs)
    }

    /// Remove the item at `index`, shifting later items down by one.
    pub fn remove(&mut self, index: usize) -> Result<BatchItem, BatchError> {
        if index >= self.items.len() {
            return Err(BatchError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    /// Discard every item and restore the default level.
    pub fn reset(&mut self) {
        self.items.clear();
        self.level = self.config.default_level;
    }

    /// Decode every item that has not been decoded yet, for display.
    pub fn load_previews(&mut self) -> BatchReport {
        self.load_previews_with(&CancellationToken::new())
    }

    pub fn load_previews_with(&mut self, token: &CancellationToken) -> BatchReport {
        self.run(Stage::Decode, token, |_| {})
    }

    /// Compress every item at the current level, replacing earlier results.
    pub fn compress_all(&mut self) -> BatchReport {
        self.compress_all_with(&CancellationToken::new())
    }

    /// Like [`compress_all`](Self::compress_all), but stops starting new
    /// items once `token` is cancelled. Items already started finish.
    pub fn compress_all_with(&mut self, token: &CancellationToken) -> BatchReport {
        self.run(Stage::Compress(self.level), token, |_| {})
    }

    /// Like [`compress_all_with`](Self::compress_all_with), calling
    /// `on_finished` with each item's index as soon as that item is done.
    ///
    /// With the `parallel` feature the callback runs on worker threads, in
    /// completion order.
    pub fn compress_all_with_progress<F>(
        &mut self,
        token: &CancellationToken,
        on_finished: F,
    ) -> BatchReport
    where
        F: Fn(usize) + Sync,
    {
        self.run(Stage::Compress(self.level), token, on_finished)
    }

    /// Compress a single item at the current level.
    pub fn compress_item(&mut self, index: usize) -> Result<&CompressedImage, BatchError> {
        let len = self.items.len();
        let level = self.level;
        let item = self
            .items
            .get_mut(index)
            .ok_or(BatchError::IndexOutOfRange { index, len })?;

        let job = Job {
            index,
            input: Arc::clone(&item.input),
            source: item.source.clone(),
        };
        let result = run_job(job, Stage::Compress(level), &self.config, &CancellationToken::new());
        apply_result(item, index, result);

        if let Some(err) = &item.error {
            return Err(err.clone().into());
        }
        item.compressed.as_ref().ok_or(BatchError::Cancelled)
    }

    fn run<F>(&mut self, stage: Stage, token: &CancellationToken, on_finished: F) -> BatchReport
    where
        F: Fn(usize) + Sync,
    {
        let span = tracing::info_span!("batch_run", items = self.items.len(), ?stage);
        let _enter = span.enter();

        let jobs: Vec<Job> = self
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| Job {
                index,
                input: Arc::clone(&item.input),
                // Decoding is skipped for items that already have a source
                source: item.source.clone(),
            })
            .collect();

        let config = &self.config;
        let results = run_ordered(jobs, config.effective_concurrency(), |job| {
            let index = job.index;
            let result = run_job(job, stage, config, token);
            on_finished(index);
            result
        });

        let reports = self
            .items
            .iter_mut()
            .zip(results)
            .enumerate()
            .map(|(index, (item, result))| apply_result(item, index, result))
            .collect();

        let report = BatchReport {
            level: self.level,
            items: reports,
        };
        tracing::info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            cancelled = report.cancelled(),
            "batch run finished"
        );
        report
    }
}

fn run_job(job: Job, stage: Stage, config: &CompressorConfig, token: &CancellationToken) -> JobResult {
    if token.is_cancelled() {
        return JobResult::Cancelled;
    }

    let source = match job.source {
        Some(source) => source,
        None => match decode_source(&job.input, config.background) {
            Ok(source) => Arc::new(source),
            Err(e) => return JobResult::DecodeFailed(e.into()),
        },
    };

    match stage {
        Stage::Decode => JobResult::Decoded(source),
        Stage::Compress(level) => match compress(&source, level, config.filter) {
            Ok(compressed) => JobResult::Compressed(source, compressed),
            Err(e) => JobResult::StageFailed(source, e),
        },
    }
}

fn apply_result(item: &mut BatchItem, index: usize, result: JobResult) -> ItemReport {
    let outcome = match result {
        JobResult::Decoded(source) => {
            let outcome = ItemOutcome::Decoded {
                width: source.width(),
                height: source.height(),
            };
            item.source = Some(source);
            item.error = None;
            outcome
        }
        JobResult::Compressed(source, compressed) => {
            let outcome = ItemOutcome::Compressed {
                width: compressed.width(),
                height: compressed.height(),
                estimated_size: compressed.estimated_size(),
            };
            item.source = Some(source);
            item.compressed = Some(compressed);
            item.error = None;
            outcome
        }
        JobResult::StageFailed(source, err) => {
            item.source = Some(source);
            fail(item, index, err)
        }
        JobResult::DecodeFailed(err) => fail(item, index, err),
        JobResult::Cancelled => ItemOutcome::Cancelled,
    };

    item.report(index, outcome)
}

fn fail(item: &mut BatchItem, index: usize, err: CompressError) -> ItemOutcome {
    tracing::warn!(index, name = item.name(), stage = err.stage(), error = %err, "item failed");
    // A result from an earlier level would now be mislabeled
    item.compressed = None;
    item.error = Some(err.clone());
    ItemOutcome::Failed(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::DecodeError;
    use crate::encode::encode_jpeg;

    fn jpeg_input(name: &str, width: u32, height: u32) -> ImageInput {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[(x * 3) as u8, (y * 5) as u8, ((x + y) * 7) as u8]);
            }
        }
        ImageInput::new(name, encode_jpeg(&pixels, width, height, 92).unwrap())
    }

    fn corrupt_input(name: &str) -> ImageInput {
        ImageInput::new(name, b"definitely not an image".to_vec())
    }

    #[test]
    fn test_new_batch_defaults() {
        let batch = BatchCoordinator::new();
        assert!(batch.is_empty());
        assert_eq!(batch.level().value(), 60);
    }

    #[test]
    fn test_corrupt_item_does_not_affect_others() {
        let mut batch = BatchCoordinator::new();
        batch.add_items([
            jpeg_input("a.jpg", 40, 30),
            corrupt_input("b.png"),
            jpeg_input("c.jpg", 20, 20),
        ]);

        let report = batch.compress_all();

        assert_eq!(report.len(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert!(matches!(report.items[0].outcome, ItemOutcome::Compressed { .. }));
        assert!(matches!(
            report.items[1].outcome,
            ItemOutcome::Failed(CompressError::Decode(DecodeError::InvalidFormat))
        ));
        assert!(matches!(report.items[2].outcome, ItemOutcome::Compressed { .. }));

        // Failed item keeps its original bytes for display
        let failed = batch.item(1).unwrap();
        assert_eq!(failed.input().bytes, b"definitely not an image".to_vec());
        assert!(failed.compressed().is_none());
        assert!(failed.error().is_some());
    }

    #[test]
    fn test_results_follow_input_order() {
        let mut config = CompressorConfig::new();
        config.concurrency = 4;
        let mut batch = BatchCoordinator::with_config(config);
        let sizes = [(80, 10), (10, 80), (33, 33), (64, 16), (5, 5), (48, 40)];
        for (i, (w, h)) in sizes.iter().enumerate() {
            batch.add_item(jpeg_input(&format!("{i}.jpg"), *w, *h)).unwrap();
        }

        batch.set_level(100);
        let report = batch.compress_all();

        for (i, (w, h)) in sizes.iter().enumerate() {
            assert_eq!(report.items[i].index, i);
            assert_eq!(report.items[i].name, format!("{i}.jpg"));
            let expected = CompressionLevel::MAX.parameters().target_dimensions(*w, *h);
            let compressed = batch.item(i).unwrap().compressed().unwrap();
            assert_eq!((compressed.width(), compressed.height()), expected);
        }
    }

    #[test]
    fn test_remove_shifts_indices() {
        let mut batch = BatchCoordinator::new();
        batch.add_items([
            jpeg_input("zero.jpg", 4, 4),
            jpeg_input("one.jpg", 4, 4),
            jpeg_input("two.jpg", 4, 4),
            jpeg_input("three.jpg", 4, 4),
        ]);

        let removed = batch.remove(1).unwrap();
        assert_eq!(removed.name(), "one.jpg");
        let names: Vec<&str> = batch.items().iter().map(BatchItem::name).collect();
        assert_eq!(names, vec!["zero.jpg", "two.jpg", "three.jpg"]);
        assert_eq!(batch.item(1).unwrap().name(), "two.jpg");
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut batch = BatchCoordinator::new();
        batch.add_item(jpeg_input("a.jpg", 4, 4)).unwrap();
        assert_eq!(
            batch.remove(3).unwrap_err(),
            BatchError::IndexOutOfRange { index: 3, len: 1 }
        );
    }

    #[test]
    fn test_reset_restores_default_level() {
        let mut batch = BatchCoordinator::new();
        batch.add_item(jpeg_input("a.jpg", 4, 4)).unwrap();
        batch.set_level(15);
        batch.compress_all();

        batch.reset();
        assert!(batch.is_empty());
        assert_eq!(batch.level(), CompressionLevel::DEFAULT);
    }

    #[test]
    fn test_set_level_clamps() {
        let mut batch = BatchCoordinator::new();
        batch.set_level(-20);
        assert_eq!(batch.level(), CompressionLevel::MIN);
        batch.set_level(400);
        assert_eq!(batch.level(), CompressionLevel::MAX);
    }

    #[test]
    fn test_oversized_source_rejected() {
        let mut config = CompressorConfig::new();
        config.max_source_bytes = 16;
        let mut batch = BatchCoordinator::with_config(config);

        let err = batch.add_item(ImageInput::new("big.png", vec![0; 17])).unwrap_err();
        assert!(matches!(err, BatchError::SourceTooLarge { size: 17, max: 16, .. }));
        assert!(batch.is_empty());
        assert_eq!(batch.add_item(ImageInput::new("ok.png", vec![0; 16])), Ok(0));
    }

    #[test]
    fn test_recompress_replaces_results() {
        let mut batch = BatchCoordinator::new();
        batch.add_item(jpeg_input("a.jpg", 100, 50)).unwrap();

        batch.set_level(0);
        batch.compress_all();
        let first = batch.item(0).unwrap().compressed().unwrap().clone();

        batch.set_level(100);
        batch.compress_all();
        let second = batch.item(0).unwrap().compressed().unwrap();

        assert_eq!((first.width(), first.height()), (100, 50));
        assert_eq!((second.width(), second.height()), (20, 10));
        assert_eq!(second.level(), CompressionLevel::MAX);
        assert!(second.estimated_size() < first.estimated_size());
    }

    #[test]
    fn test_cancelled_run_starts_nothing() {
        let mut batch = BatchCoordinator::new();
        batch.add_items([jpeg_input("a.jpg", 8, 8), jpeg_input("b.jpg", 8, 8)]);

        let token = CancellationToken::new();
        token.cancel();
        let report = batch.compress_all_with(&token);

        assert_eq!(report.cancelled(), 2);
        assert!(batch.items().iter().all(|item| item.compressed().is_none()));
        assert!(batch.items().iter().all(|item| item.source().is_none()));
    }

    #[test]
    fn test_cancel_mid_run_finishes_started_items() {
        let mut config = CompressorConfig::new();
        config.concurrency = 1;
        let mut batch = BatchCoordinator::with_config(config);
        batch.add_items([
            jpeg_input("a.jpg", 50, 50),
            jpeg_input("b.jpg", 50, 50),
            jpeg_input("c.jpg", 50, 50),
        ]);

        batch.set_level(0);
        batch.compress_all();
        let before: Vec<CompressedImage> = batch
            .items()
            .iter()
            .map(|item| item.compressed().unwrap().clone())
            .collect();

        batch.set_level(100);
        let token = CancellationToken::new();
        let report = batch.compress_all_with_progress(&token, |index| {
            if index == 0 {
                token.cancel();
            }
        });

        assert_eq!(
            report.items[0].outcome,
            ItemOutcome::Compressed {
                width: 10,
                height: 10,
                estimated_size: batch.item(0).unwrap().compressed().unwrap().estimated_size(),
            }
        );
        assert_eq!(report.items[1].outcome, ItemOutcome::Cancelled);
        assert_eq!(report.items[2].outcome, ItemOutcome::Cancelled);
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.cancelled(), 2);

        assert_eq!(batch.item(0).unwrap().compressed().unwrap().level(), CompressionLevel::MAX);
        for index in 1..3 {
            let kept = batch.item(index).unwrap().compressed().unwrap();
            assert_eq!(kept, &before[index]);
            assert_eq!(kept.level(), CompressionLevel::MIN);
        }
    }

    #[test]
    fn test_progress_reports_every_item() {
        use std::sync::Mutex;

        let mut batch = BatchCoordinator::new();
        batch.add_items([
            jpeg_input("a.jpg", 8, 8),
            corrupt_input("b.jpg"),
            jpeg_input("c.jpg", 8, 8),
        ]);

        let seen = Mutex::new(Vec::new());
        batch.compress_all_with_progress(&CancellationToken::new(), |index| {
            seen.lock().unwrap().push(index);
        });

        let mut seen = seen.into_inner().unwrap();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[test]
    fn test_load_previews_decodes_once() {
        let mut batch = BatchCoordinator::new();
        batch.add_items([jpeg_input("a.jpg", 12, 6), corrupt_input("b.jpg")]);

        let report = batch.load_previews();
        assert_eq!(report.items[0].outcome, ItemOutcome::Decoded { width: 12, height: 6 });
        assert!(report.items[1].outcome.is_failure());

        let source = batch.item(0).unwrap().source().unwrap();
        assert_eq!((source.width(), source.height()), (12, 6));
        assert!(batch.item(1).unwrap().source().is_none());
    }

    #[test]
    fn test_compress_item_single_mode() {
        let mut batch = BatchCoordinator::new();
        batch.replace_all([jpeg_input("solo.png", 1000, 10)]);
        batch.set_level(60);

        let compressed = batch.compress_item(0).unwrap();
        assert_eq!((compressed.width(), compressed.height()), (520, 6));
        assert_eq!(batch.item(0).unwrap().download_name(), "solo-compressed.jpg");

        assert!(matches!(
            batch.compress_item(1),
            Err(BatchError::IndexOutOfRange { index: 1, len: 1 })
        ));
    }

    #[test]
    fn test_compress_item_reports_failure() {
        let mut batch = BatchCoordinator::new();
        batch.add_item(corrupt_input("bad.jpg")).unwrap();

        let err = batch.compress_item(0).unwrap_err();
        assert!(matches!(err, BatchError::Compress(CompressError::Decode(_))));
        assert!(batch.item(0).unwrap().error().is_some());
    }

    #[test]
    fn test_replace_all_keeps_level() {
        let mut batch = BatchCoordinator::new();
        batch.add_item(jpeg_input("old.jpg", 4, 4)).unwrap();
        batch.set_level(10);

        batch.replace_all([jpeg_input("new.jpg", 4, 4)]);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.item(0).unwrap().name(), "new.jpg");
        assert_eq!(batch.level().value(), 10);
    }
}
