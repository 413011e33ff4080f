//! Persisting samples.
//!
//! A dataset directory looks like
//!
//! ```text
//! <root>/images/train/<index>.<ext>
//! <root>/images/val/<index>.<ext>
//! <root>/labels/train/<index>.txt
//! <root>/labels/val/<index>.txt
//! ```
//!
//! [`DirectorySink`] encodes the image and builds the label text in memory
//! first, then writes each file through a temporary file that is renamed
//! into place. [`MemorySink`] keeps samples in memory.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use glyphset_render::OutputFormat;
use parking_lot::Mutex;

use crate::error::{DatasetError, DatasetResult};
use crate::label::LabelRecord;
use crate::sample::{Sample, Split, label_text};
use crate::targets;

/// Destination for finished samples.
///
/// Implementations are shared between worker threads.
pub trait SampleSink: Send + Sync {
    /// Persist one sample with its label records.
    fn write(&self, sample: &Sample, records: &[LabelRecord]) -> DatasetResult<()>;
}

/// Path scheme of a dataset directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayout {
    root: PathBuf,
}

impl DatasetLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn image_dir(&self, split: Split) -> PathBuf {
        self.root.join("images").join(split.as_str())
    }

    pub fn label_dir(&self, split: Split) -> PathBuf {
        self.root.join("labels").join(split.as_str())
    }

    pub fn image_path(&self, split: Split, index: usize, format: OutputFormat) -> PathBuf {
        self.image_dir(split)
            .join(format!("{index}.{}", format.extension()))
    }

    pub fn label_path(&self, split: Split, index: usize) -> PathBuf {
        self.label_dir(split).join(format!("{index}.txt"))
    }

    /// Create the image and label directories for both splits.
    pub fn prepare(&self) -> DatasetResult<()> {
        for split in Split::ALL {
            for dir in [self.image_dir(split), self.label_dir(split)] {
                fs::create_dir_all(&dir).map_err(|e| DatasetError::io(e, &dir))?;
            }
        }
        Ok(())
    }
}

/// A file written under a temporary name and renamed on commit.
///
/// Dropping it uncommitted removes the temporary file.
struct AtomicFile {
    target: PathBuf,
    temp: PathBuf,
    writer: Option<BufWriter<fs::File>>,
}

impl AtomicFile {
    fn create(target: &Path) -> DatasetResult<Self> {
        let parent = target.parent().unwrap_or(Path::new("."));
        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        let temp = parent.join(format!(".{name}.tmp.{}", std::process::id()));
        let file = fs::File::create(&temp).map_err(|e| DatasetError::io(e, target))?;
        Ok(Self {
            target: target.to_path_buf(),
            temp,
            writer: Some(BufWriter::new(file)),
        })
    }

    fn write(target: &Path, bytes: &[u8]) -> DatasetResult<()> {
        let mut file = Self::create(target)?;
        file.write_all(bytes)?;
        file.commit()
    }

    fn write_all(&mut self, bytes: &[u8]) -> DatasetResult<()> {
        match self.writer.as_mut() {
            Some(w) => w.write_all(bytes).map_err(|e| DatasetError::io(e, &self.target)),
            None => Ok(()),
        }
    }

    fn commit(mut self) -> DatasetResult<()> {
        let Some(mut writer) = self.writer.take() else {
            return Ok(());
        };
        let flushed = writer.flush();
        // Close the handle before renaming.
        drop(writer);
        if let Err(e) = flushed.and_then(|()| fs::rename(&self.temp, &self.target)) {
            let _ = fs::remove_file(&self.temp);
            return Err(DatasetError::io(e, &self.target));
        }
        Ok(())
    }
}

impl Drop for AtomicFile {
    fn drop(&mut self) {
        if self.writer.is_some() {
            self.writer = None;
            let _ = fs::remove_file(&self.temp);
        }
    }
}

/// Writes samples into a dataset directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    layout: DatasetLayout,
    format: OutputFormat,
}

impl DirectorySink {
    /// A sink over an existing layout; see [`DirectorySink::create`].
    pub fn new(layout: DatasetLayout, format: OutputFormat) -> Self {
        Self { layout, format }
    }

    /// Prepare the directories under `root` and return a sink for them.
    pub fn create(root: impl Into<PathBuf>, format: OutputFormat) -> DatasetResult<Self> {
        let layout = DatasetLayout::new(root);
        layout.prepare()?;
        tracing::info!(
            target: targets::SINK,
            root = %layout.root().display(),
            "dataset directories ready"
        );
        Ok(Self::new(layout, format))
    }

    pub fn layout(&self) -> &DatasetLayout {
        &self.layout
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

impl SampleSink for DirectorySink {
    fn write(&self, sample: &Sample, records: &[LabelRecord]) -> DatasetResult<()> {
        let image = sample.canvas.encode(self.format)?;
        let labels = label_text(records);

        let image_path = self.layout.image_path(sample.split, sample.index, self.format);
        let label_path = self.layout.label_path(sample.split, sample.index);
        AtomicFile::write(&image_path, &image)?;
        if let Err(e) = AtomicFile::write(&label_path, labels.as_bytes()) {
            // An image without its label file would read as a negative sample.
            let _ = fs::remove_file(&image_path);
            return Err(e);
        }
        tracing::trace!(
            target: targets::SINK,
            index = sample.index,
            split = %sample.split,
            labels = records.len(),
            "sample written"
        );
        Ok(())
    }
}

/// A sample kept by [`MemorySink`].
#[derive(Debug, Clone)]
pub struct StoredSample {
    pub sample: Sample,
    pub records: Vec<LabelRecord>,
}

impl StoredSample {
    /// The label file text this sample would have on disk.
    pub fn label_text(&self) -> String {
        label_text(&self.records)
    }
}

/// Collects samples in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    stored: Mutex<Vec<StoredSample>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.stored.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.stored.lock().is_empty()
    }

    /// Take everything stored so far, ordered by index.
    pub fn take(&self) -> Vec<StoredSample> {
        let mut stored = std::mem::take(&mut *self.stored.lock());
        stored.sort_by_key(|s| s.sample.index);
        stored
    }
}

impl SampleSink for MemorySink {
    fn write(&self, sample: &Sample, records: &[LabelRecord]) -> DatasetResult<()> {
        self.stored.lock().push(StoredSample {
            sample: sample.clone(),
            records: records.to_vec(),
        });
        Ok(())
    }
}
