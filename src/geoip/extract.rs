//! Archive extraction utilities.
//!
//! This module streams the `.mmdb` file out of the tar.gz archive distributed
//! by MaxMind. Entries are read strictly in order and never buffered whole;
//! every match goes through a temporary file next to the destination and is
//! renamed into place, so the destination is either the old file or a
//! complete new one.

use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use tar::Archive;
use tempfile::NamedTempFile;

use crate::error_handling::ExtractError;
use crate::geoip::types::ExtractOutcome;

/// Returns a predicate matching archive paths that end with `file_name`.
///
/// The match is a case-sensitive suffix match on the whole entry path, so
/// `GeoLite2-Country_20240101/GeoLite2-Country.mmdb` matches `GeoLite2-Country.mmdb`.
pub fn database_name_matcher(file_name: &str) -> impl Fn(&Path) -> bool {
    let suffix = file_name.to_string();
    move |path: &Path| path.to_string_lossy().ends_with(&suffix)
}

/// Extracts every regular-file entry accepted by `matches` to `destination`.
///
/// The scan always runs to the end of the archive. With several matches the
/// last one wins. With none, nothing is written and the outcome reports zero
/// matches; deciding whether that is a failure is left to the caller.
///
/// # Errors
///
/// - [`ExtractError::Open`] if the archive cannot be opened
/// - [`ExtractError::Decompress`] if it is not gzip-compressed
/// - [`ExtractError::Read`] if an entry header or path is malformed
/// - [`ExtractError::Write`] if a matched entry cannot be written
pub fn extract_database<P>(
    archive_path: &Path,
    destination: &Path,
    matches: P,
) -> Result<ExtractOutcome, ExtractError>
where
    P: Fn(&Path) -> bool,
{
    log::debug!("Extracting {}", archive_path.display());

    let file = File::open(archive_path).map_err(|source| ExtractError::Open {
        path: archive_path.to_path_buf(),
        source,
    })?;

    // Concatenated gzip members decode as one stream. The first header is
    // parsed eagerly; no header means this is not gzip
    let gz_decoder = MultiGzDecoder::new(BufReader::new(file));
    if gz_decoder.header().is_none() {
        return Err(ExtractError::Decompress {
            path: archive_path.to_path_buf(),
        });
    }

    let mut tar_archive = Archive::new(gz_decoder);
    let entries = tar_archive
        .entries()
        .map_err(|source| ExtractError::Read { source })?;

    let mut outcome = ExtractOutcome::default();

    for entry_result in entries {
        let mut entry = entry_result.map_err(|source| ExtractError::Read { source })?;

        if !entry.header().entry_type().is_file() {
            continue;
        }

        let is_match = {
            let path = entry
                .path()
                .map_err(|source| ExtractError::Read { source })?;
            matches(&path)
        };
        if !is_match {
            continue;
        }

        let mode = entry
            .header()
            .mode()
            .map_err(|source| ExtractError::Read { source })?;
        let expected_len = entry.size();

        write_atomically(&mut entry, destination, mode, expected_len)?;
        log::debug!("Copied database entry to {}", destination.display());

        outcome.matched += 1;
        outcome.installed = Some(destination.to_path_buf());
    }

    Ok(outcome)
}

/// Streams `reader` into a temp file beside `destination`, then renames it over `destination`.
///
/// A tar entry on a cut-off archive ends early without an error, so the copy
/// must yield exactly `expected_len` bytes before anything is renamed.
fn write_atomically<R: Read>(
    reader: &mut R,
    destination: &Path,
    mode: u32,
    expected_len: u64,
) -> Result<(), ExtractError> {
    let write_error = |source: io::Error| ExtractError::Write {
        path: destination.to_path_buf(),
        source,
    };

    let dir = parent_dir(destination);
    fs::create_dir_all(&dir).map_err(write_error)?;

    // Dropping the temp file on an early return removes it
    let mut staged = NamedTempFile::new_in(&dir).map_err(write_error)?;
    let copied = io::copy(reader, staged.as_file_mut()).map_err(write_error)?;
    if copied != expected_len {
        return Err(ExtractError::Read {
            source: io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "archive entry truncated: expected {} bytes, got {}",
                    expected_len, copied
                ),
            ),
        });
    }
    staged.as_file().sync_all().map_err(write_error)?;
    apply_mode(staged.as_file(), mode).map_err(write_error)?;

    staged
        .persist(destination)
        .map_err(|e| write_error(e.error))?;
    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(unix)]
fn apply_mode(file: &File, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(mode & 0o7777))
}

#[cfg(not(unix))]
fn apply_mode(_file: &File, _mode: u32) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tar::{Builder, EntryType, Header};
    use tempfile::TempDir;

    const DB: &str = "GeoLite2-Country.mmdb";

    fn regular(name: &str, content: &[u8], mode: u32) -> (Header, Vec<u8>) {
        let mut header = Header::new_gnu();
        header.set_path(name).unwrap();
        header.set_entry_type(EntryType::Regular);
        header.set_size(content.len() as u64);
        header.set_mode(mode);
        header.set_cksum();
        (header, content.to_vec())
    }

    fn special(name: &str, entry_type: EntryType) -> (Header, Vec<u8>) {
        let mut header = Header::new_gnu();
        header.set_path(name).unwrap();
        header.set_entry_type(entry_type);
        if entry_type == EntryType::Symlink {
            header.set_link_name("elsewhere.mmdb").unwrap();
        }
        header.set_size(0);
        header.set_mode(0o755);
        header.set_cksum();
        (header, Vec::new())
    }

    /// Writes a tar.gz built from `entries` into `dir` and returns its path.
    fn write_tar_gz(dir: &Path, entries: Vec<(Header, Vec<u8>)>) -> PathBuf {
        let mut tar_builder = Builder::new(Vec::new());
        for (header, content) in entries {
            tar_builder.append(&header, content.as_slice()).unwrap();
        }
        let tar_bytes = tar_builder.into_inner().unwrap();

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&tar_bytes).unwrap();
        let archive_path = dir.join("GeoLite2-Country.tar.gz");
        fs::write(&archive_path, encoder.finish().unwrap()).unwrap();
        archive_path
    }

    /// Like [`write_tar_gz`], but keeps only the first `keep` bytes of the tar stream.
    fn write_truncated_tar_gz(dir: &Path, entries: Vec<(Header, Vec<u8>)>, keep: usize) -> PathBuf {
        let mut tar_builder = Builder::new(Vec::new());
        for (header, content) in entries {
            tar_builder.append(&header, content.as_slice()).unwrap();
        }
        let mut tar_bytes = tar_builder.into_inner().unwrap();
        tar_bytes.truncate(keep);

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&tar_bytes).unwrap();
        let archive_path = dir.join("GeoLite2-Country.tar.gz");
        fs::write(&archive_path, encoder.finish().unwrap()).unwrap();
        archive_path
    }

    fn dir_listing(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_matcher_is_suffix_and_case_sensitive() {
        let matcher = database_name_matcher(DB);
        assert!(matcher(Path::new("GeoLite2-Country.mmdb")));
        assert!(matcher(Path::new(
            "GeoLite2-Country_20240101/GeoLite2-Country.mmdb"
        )));
        assert!(!matcher(Path::new("geolite2-country.mmdb")));
        assert!(!matcher(Path::new("GeoLite2-Country_20240101/LICENSE.txt")));
        assert!(!matcher(Path::new("GeoLite2-Country.mmdb.sig")));
    }

    #[test]
    fn test_extract_nested_entry() {
        let work = TempDir::new().unwrap();
        let archive = write_tar_gz(
            work.path(),
            vec![
                regular("GeoLite2-Country_20240101/COPYRIGHT.txt", b"copyright", 0o644),
                regular("GeoLite2-Country_20240101/GeoLite2-Country.mmdb", b"fake mmdb", 0o644),
                regular("GeoLite2-Country_20240101/LICENSE.txt", b"license", 0o644),
            ],
        );
        let data_dir = work.path().join("data");
        let destination = data_dir.join(DB);

        let outcome = extract_database(&archive, &destination, database_name_matcher(DB)).unwrap();

        assert_eq!(outcome.matched, 1);
        assert_eq!(outcome.installed.as_deref(), Some(destination.as_path()));
        assert_eq!(fs::read(&destination).unwrap(), b"fake mmdb");
        // Only the database lands in the data directory, no leftover temp files
        assert_eq!(dir_listing(&data_dir), vec![DB.to_string()]);
    }

    #[test]
    fn test_extract_skips_non_regular_entries() {
        let work = TempDir::new().unwrap();
        let archive = write_tar_gz(
            work.path(),
            vec![
                special("a/GeoLite2-Country.mmdb", EntryType::Directory),
                special("b/GeoLite2-Country.mmdb", EntryType::Symlink),
            ],
        );
        let data_dir = work.path().join("data");

        let outcome =
            extract_database(&archive, &data_dir.join(DB), database_name_matcher(DB)).unwrap();

        assert_eq!(outcome, ExtractOutcome::default());
        assert!(!data_dir.exists());
    }

    #[test]
    fn test_extract_no_match_leaves_directory_unchanged() {
        let work = TempDir::new().unwrap();
        let archive = write_tar_gz(
            work.path(),
            vec![regular("README.txt", b"readme content", 0o644)],
        );
        let data_dir = work.path().join("data");
        fs::create_dir(&data_dir).unwrap();
        fs::write(data_dir.join("keep.txt"), b"untouched").unwrap();

        let outcome =
            extract_database(&archive, &data_dir.join(DB), database_name_matcher(DB)).unwrap();

        assert_eq!(outcome.matched, 0);
        assert!(outcome.installed.is_none());
        assert_eq!(dir_listing(&data_dir), vec!["keep.txt".to_string()]);
    }

    #[test]
    fn test_extract_empty_archive() {
        let work = TempDir::new().unwrap();
        let archive = write_tar_gz(work.path(), Vec::new());
        let destination = work.path().join("data").join(DB);

        let outcome = extract_database(&archive, &destination, database_name_matcher(DB)).unwrap();

        assert_eq!(outcome.matched, 0);
        assert!(!destination.exists());
    }

    #[test]
    fn test_extract_last_match_wins() {
        let work = TempDir::new().unwrap();
        let archive = write_tar_gz(
            work.path(),
            vec![
                regular("dir1/GeoLite2-Country.mmdb", b"first mmdb", 0o644),
                regular("dir2/GeoLite2-Country.mmdb", b"second mmdb", 0o644),
            ],
        );
        let destination = work.path().join("data").join(DB);

        let outcome = extract_database(&archive, &destination, database_name_matcher(DB)).unwrap();

        assert_eq!(outcome.matched, 2);
        assert_eq!(fs::read(&destination).unwrap(), b"second mmdb");
    }

    #[test]
    fn test_extract_is_idempotent() {
        let work = TempDir::new().unwrap();
        let content: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        let archive = write_tar_gz(
            work.path(),
            vec![regular("GeoLite2-Country_20240101/GeoLite2-Country.mmdb", &content, 0o644)],
        );

        let first = work.path().join("first").join(DB);
        let second = work.path().join("second").join(DB);
        extract_database(&archive, &first, database_name_matcher(DB)).unwrap();
        extract_database(&archive, &second, database_name_matcher(DB)).unwrap();

        assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
        assert_eq!(fs::read(&first).unwrap(), content);
    }

    #[test]
    fn test_extract_replaces_existing_database() {
        let work = TempDir::new().unwrap();
        let archive = write_tar_gz(work.path(), vec![regular(DB, b"new", 0o644)]);
        let data_dir = work.path().join("data");
        fs::create_dir(&data_dir).unwrap();
        let destination = data_dir.join(DB);
        fs::write(&destination, b"an older and much longer database").unwrap();

        extract_database(&archive, &destination, database_name_matcher(DB)).unwrap();

        assert_eq!(fs::read(&destination).unwrap(), b"new");
    }

    #[cfg(unix)]
    #[test]
    fn test_extract_preserves_mode() {
        use std::os::unix::fs::PermissionsExt;

        let work = TempDir::new().unwrap();
        let archive = write_tar_gz(work.path(), vec![regular(DB, b"mmdb", 0o640)]);
        let destination = work.path().join("data").join(DB);

        extract_database(&archive, &destination, database_name_matcher(DB)).unwrap();

        let mode = fs::metadata(&destination).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[test]
    fn test_extract_custom_predicate() {
        let work = TempDir::new().unwrap();
        let archive = write_tar_gz(
            work.path(),
            vec![
                regular(DB, b"country", 0o644),
                regular("GeoLite2-City.mmdb", b"city", 0o644),
            ],
        );
        let destination = work.path().join("out.mmdb");

        let outcome = extract_database(&archive, &destination, |path: &Path| {
            path.to_string_lossy().contains("City")
        })
        .unwrap();

        assert_eq!(outcome.matched, 1);
        assert_eq!(fs::read(&destination).unwrap(), b"city");
    }

    #[test]
    fn test_extract_missing_archive() {
        let work = TempDir::new().unwrap();
        let result = extract_database(
            &work.path().join("missing.tar.gz"),
            &work.path().join(DB),
            database_name_matcher(DB),
        );
        assert!(matches!(result, Err(ExtractError::Open { .. })));
    }

    #[test]
    fn test_extract_invalid_gzip() {
        let work = TempDir::new().unwrap();
        let archive = work.path().join("GeoLite2-Country.tar.gz");
        fs::write(&archive, b"not a valid tar.gz file").unwrap();

        let result = extract_database(&archive, &work.path().join(DB), database_name_matcher(DB));
        assert!(matches!(result, Err(ExtractError::Decompress { .. })));
    }

    #[test]
    fn test_extract_corrupted_tar() {
        // Valid gzip around something that is not a tar stream
        let work = TempDir::new().unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"not a valid tar file").unwrap();
        let archive = work.path().join("GeoLite2-Country.tar.gz");
        fs::write(&archive, encoder.finish().unwrap()).unwrap();

        let result = extract_database(&archive, &work.path().join(DB), database_name_matcher(DB));
        assert!(matches!(result, Err(ExtractError::Read { .. })));
    }

    #[test]
    fn test_extract_truncated_entry_keeps_previous_database() {
        let work = TempDir::new().unwrap();
        let content: Vec<u8> = (0..300_000u32).map(|i| (i % 249) as u8).collect();
        let archive = write_truncated_tar_gz(
            work.path(),
            vec![regular("GeoLite2-Country_20240101/GeoLite2-Country.mmdb", &content, 0o644)],
            100_000,
        );
        let data_dir = work.path().join("data");
        fs::create_dir(&data_dir).unwrap();
        let destination = data_dir.join(DB);
        fs::write(&destination, b"old").unwrap();

        let result = extract_database(&archive, &destination, database_name_matcher(DB));

        match result {
            Err(ExtractError::Read { source }) => {
                assert_eq!(source.kind(), io::ErrorKind::UnexpectedEof)
            }
            other => panic!("expected truncated entry error, got {:?}", other),
        }
        assert_eq!(fs::read(&destination).unwrap(), b"old");
        assert_eq!(dir_listing(&data_dir), vec![DB.to_string()]);
    }

    #[test]
    fn test_extract_multi_member_gzip() {
        let work = TempDir::new().unwrap();
        let mut tar_builder = Builder::new(Vec::new());
        let (header, content) = regular(DB, b"split across members", 0o644);
        tar_builder.append(&header, content.as_slice()).unwrap();
        let tar_bytes = tar_builder.into_inner().unwrap();

        // Two gzip members back to back, split inside the entry
        let (head, tail) = tar_bytes.split_at(520);
        let mut gz_bytes = Vec::new();
        for part in [head, tail] {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(part).unwrap();
            gz_bytes.extend(encoder.finish().unwrap());
        }
        let archive = work.path().join("GeoLite2-Country.tar.gz");
        fs::write(&archive, gz_bytes).unwrap();
        let destination = work.path().join("data").join(DB);

        let outcome = extract_database(&archive, &destination, database_name_matcher(DB)).unwrap();

        assert_eq!(outcome.matched, 1);
        assert_eq!(fs::read(&destination).unwrap(), b"split across members");
    }
}
