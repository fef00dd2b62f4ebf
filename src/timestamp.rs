use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context as _;
use chrono::{DateTime, FixedOffset, Local};

/// Resolves a photo file to its capture time in epoch milliseconds.
///
/// `None` means "unresolvable": missing metadata, missing timestamp fields,
/// and read failures all map here and must never propagate as fatal.
pub trait TimestampResolver {
    fn resolve(&self, file: &Path) -> Option<i64>;
}

/// Reads the capture time from EXIF metadata.
///
/// The timestamp comes from `DateTimeOriginal`; the zone offset from
/// `OffsetTimeOriginal` when the camera recorded one, otherwise from
/// `fallback_offset`. The fallback is captured once (typically at process
/// start) and passed in explicitly rather than consulted globally.
#[derive(Clone, Copy, Debug)]
pub struct ExifResolver {
    fallback_offset: FixedOffset,
}

impl ExifResolver {
    pub fn new(fallback_offset: FixedOffset) -> Self {
        Self { fallback_offset }
    }

    /// Resolver falling back to the zone offset of the local system clock.
    pub fn with_system_offset() -> Self {
        Self::new(*Local::now().offset())
    }

    fn capture_time_millis(&self, file: &Path) -> anyhow::Result<i64> {
        let f = File::open(file).with_context(|| format!("open photo '{}'", file.display()))?;
        let mut reader = BufReader::new(f);
        let exif = exif::Reader::new()
            .read_from_container(&mut reader)
            .with_context(|| format!("read exif from '{}'", file.display()))?;

        let datetime = ascii_field(&exif, exif::Tag::DateTimeOriginal)
            .context("no DateTimeOriginal field")?;
        let offset = ascii_field(&exif, exif::Tag::OffsetTimeOriginal)
            .unwrap_or_else(|| self.fallback_offset.to_string());

        parse_exif_datetime(&datetime, &offset)
    }
}

impl TimestampResolver for ExifResolver {
    fn resolve(&self, file: &Path) -> Option<i64> {
        match self.capture_time_millis(file) {
            Ok(ms) if ms > 0 => Some(ms),
            Ok(_) => None,
            Err(err) => {
                tracing::debug!("no capture time for '{}': {err:#}", file.display());
                None
            }
        }
    }
}

/// Parse an EXIF `YYYY:MM:DD HH:MM:SS` local time plus a `±HH:MM` zone offset
/// into epoch milliseconds.
pub fn parse_exif_datetime(datetime: &str, offset: &str) -> anyhow::Result<i64> {
    let stamp = format!("{} {}", datetime.trim(), offset.trim());
    let parsed = DateTime::parse_from_str(&stamp, "%Y:%m:%d %H:%M:%S %z")
        .with_context(|| format!("parse exif datetime '{stamp}'"))?;
    Ok(parsed.timestamp_millis())
}

fn ascii_field(exif: &exif::Exif, tag: exif::Tag) -> Option<String> {
    let field = exif.get_field(tag, exif::In::PRIMARY)?;
    match field.value {
        exif::Value::Ascii(ref parts) if !parts.is_empty() => {
            let s = String::from_utf8_lossy(&parts[0]).trim().to_string();
            (!s.is_empty()).then_some(s)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_exif_datetime_applies_offset() {
        // 2019-03-27 12:00:00 +01:00 == 11:00:00 UTC
        let ms = parse_exif_datetime("2019:03:27 12:00:00", "+01:00").unwrap();
        assert_eq!(ms, 1_553_684_400_000);

        // same wall clock at UTC is one hour later in epoch terms
        let utc = parse_exif_datetime("2019:03:27 12:00:00", "+00:00").unwrap();
        assert_eq!(utc - ms, 3_600_000);
    }

    #[test]
    fn parse_exif_datetime_rejects_garbage() {
        assert!(parse_exif_datetime("not a date", "+00:00").is_err());
        assert!(parse_exif_datetime("2019:03:27 12:00:00", "somewhere").is_err());
    }

    #[test]
    fn resolve_is_none_for_files_without_exif() {
        let tmp = std::env::temp_dir().join(format!(
            "photoreel_no_exif_{}_{}.jpg",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::write(&tmp, b"definitely not a jpeg").unwrap();

        let resolver = ExifResolver::with_system_offset();
        assert_eq!(resolver.resolve(&tmp), None);

        std::fs::remove_file(&tmp).ok();
    }

    #[test]
    fn resolve_is_none_for_missing_files() {
        let resolver = ExifResolver::new(FixedOffset::east_opt(0).unwrap());
        assert_eq!(resolver.resolve(Path::new("/no/such/photo.jpg")), None);
    }
}
