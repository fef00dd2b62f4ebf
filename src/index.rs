use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    error::{PhotoreelError, PhotoreelResult},
    report::ErrorSink,
    timestamp::TimestampResolver,
};

/// Whole-second epoch key grouping photos by capture time.
pub type TimeBucket = i64;

/// File extensions eligible for indexing, matched case-insensitively.
pub const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// An indexed photograph: a capture timestamp plus the file it came from.
///
/// A photo with `timestamp_millis <= 0` has an unresolved timestamp and never
/// enters a [`PhotoIndex`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Photo {
    pub timestamp_millis: i64,
    pub source: PathBuf,
}

impl Photo {
    pub fn new(timestamp_millis: i64, source: impl Into<PathBuf>) -> Self {
        Self {
            timestamp_millis,
            source: source.into(),
        }
    }

    pub fn bucket(&self) -> TimeBucket {
        self.timestamp_millis.div_euclid(1_000)
    }
}

/// List candidate photo files in `dir`, filtered by [`PHOTO_EXTENSIONS`].
///
/// Results are sorted by file name so tie order within a bucket is stable
/// across runs.
pub fn list_photo_files(dir: &Path) -> PhotoreelResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to list photo directory '{}'", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in '{}'", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let eligible = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| PHOTO_EXTENSIONS.iter().any(|p| e.eq_ignore_ascii_case(p)));
        if eligible {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Time-bucketed photo index with destructive, at-most-once consumption.
///
/// Once constructed, buckets are only ever removed via [`PhotoIndex::take`];
/// a taken bucket can never be returned again. The index is a single-writer
/// owned map: hosts that render from multiple threads must serialize access
/// externally.
#[derive(Debug, Default)]
pub struct PhotoIndex {
    buckets: BTreeMap<TimeBucket, Vec<Photo>>,
}

impl PhotoIndex {
    /// An index with no photos.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index by scanning `dir` and resolving each file's capture time.
    ///
    /// `None` (or a blank path) means "no photos" and yields an empty index.
    /// A path that is not
    /// a directory is reported as [`PhotoreelError::DirectoryNotFound`] and
    /// also yields an empty index; construction itself never fails. Photos
    /// whose timestamp cannot be resolved are reported and excluded.
    pub fn from_directory(
        dir: Option<&Path>,
        resolver: &dyn TimestampResolver,
        errors: &mut dyn ErrorSink,
    ) -> Self {
        let Some(dir) = dir.filter(|d| !d.as_os_str().is_empty()) else {
            return Self::new();
        };
        if !dir.is_dir() {
            errors.report(PhotoreelError::DirectoryNotFound(dir.to_path_buf()));
            return Self::new();
        }

        let files = match list_photo_files(dir) {
            Ok(files) => files,
            Err(err) => {
                errors.report(err);
                return Self::new();
            }
        };

        let mut index = Self::new();
        for file in files {
            match resolver.resolve(&file) {
                Some(ms) if ms > 0 => index.insert(Photo::new(ms, file)),
                _ => errors.report(PhotoreelError::TimestampUnresolved(file)),
            }
        }
        tracing::debug!(
            buckets = index.buckets.len(),
            photos = index.len(),
            "indexed photo directory '{}'",
            dir.display()
        );
        index
    }

    /// Build an index from photos the host already holds. Photos with an
    /// unresolved timestamp (`<= 0`) are silently dropped.
    pub fn from_photos(photos: impl IntoIterator<Item = Photo>) -> Self {
        let mut index = Self::new();
        for photo in photos {
            if photo.timestamp_millis > 0 {
                index.insert(photo);
            }
        }
        index
    }

    fn insert(&mut self, photo: Photo) {
        self.buckets.entry(photo.bucket()).or_default().push(photo);
    }

    /// Total number of photos remaining in the index.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Remaining bucket keys in ascending order. Pure query.
    pub fn buckets(&self) -> Vec<TimeBucket> {
        self.buckets.keys().copied().collect()
    }

    /// All buckets with key `<= as_of`, ascending. Pure query, no mutation.
    pub fn due_buckets(&self, as_of: TimeBucket) -> Vec<TimeBucket> {
        self.buckets.range(..=as_of).map(|(k, _)| *k).collect()
    }

    /// Remove `bucket` and return its photos, transferring ownership to the
    /// caller. Taking an absent (or already taken) bucket is a no-op that
    /// returns an empty vec.
    pub fn take(&mut self, bucket: TimeBucket) -> Vec<Photo> {
        self.buckets.remove(&bucket).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(ms: i64) -> Photo {
        Photo::new(ms, format!("{ms}.jpg"))
    }

    #[test]
    fn bucket_is_floor_of_millis() {
        assert_eq!(photo(100_000).bucket(), 100);
        assert_eq!(photo(100_999).bucket(), 100);
        assert_eq!(photo(101_000).bucket(), 101);
        // pre-epoch timestamps still floor
        assert_eq!(Photo::new(-500, "old.jpg").bucket(), -1);
    }

    #[test]
    fn from_photos_drops_unresolved_timestamps() {
        let index = PhotoIndex::from_photos([photo(1_500), Photo::new(0, "a.jpg")]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.buckets(), vec![1]);
    }

    #[test]
    fn due_buckets_is_inclusive_and_sorted() {
        let index = PhotoIndex::from_photos([photo(3_000), photo(1_000), photo(5_000)]);
        assert_eq!(index.due_buckets(0), Vec::<TimeBucket>::new());
        assert_eq!(index.due_buckets(3), vec![1, 3]);
        assert_eq!(index.due_buckets(100), vec![1, 3, 5]);
    }

    #[test]
    fn take_removes_permanently() {
        let mut index = PhotoIndex::from_photos([photo(1_000), photo(1_200), photo(2_000)]);

        let taken = index.take(1);
        assert_eq!(taken.len(), 2);
        assert!(index.take(1).is_empty());
        assert_eq!(index.due_buckets(10), vec![2]);
    }

    #[test]
    fn take_absent_bucket_is_noop() {
        let mut index = PhotoIndex::new();
        assert!(index.take(42).is_empty());
        assert!(index.is_empty());
    }

    #[test]
    fn ties_within_a_bucket_preserve_insertion_order() {
        let a = Photo::new(1_100, "a.jpg");
        let b = Photo::new(1_900, "b.jpg");
        let mut index = PhotoIndex::from_photos([a.clone(), b.clone()]);
        assert_eq!(index.take(1), vec![a, b]);
    }
}
