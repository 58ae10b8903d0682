//! ZIP archive member access
//!
//! Members are streamed straight out of the archive; nothing is extracted to
//! disk or buffered whole.

use crate::error::{IngestError, Result};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::result::ZipError;
use zip::ZipArchive;

/// An opened ZIP archive
pub struct Archive {
    path: PathBuf,
    inner: ZipArchive<File>,
}

impl Archive {
    /// Open the archive at `path` and read its central directory
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| IngestError::Zip(ZipError::Io(e)))?;
        let inner = ZipArchive::new(file)?;

        debug!(path = %path.display(), members = inner.len(), "Opened ZIP archive");
        Ok(Self { path, inner })
    }

    /// Stream the decompressed bytes of the member named exactly `name`
    ///
    /// The reader borrows the archive, so it cannot outlive it.
    pub fn member(&mut self, name: &str) -> Result<impl Read + '_> {
        match self.inner.by_name(name) {
            Ok(member) => {
                debug!(member = name, size = member.size(), "Located archive member");
                Ok(member)
            },
            Err(ZipError::FileNotFound) => Err(IngestError::MemberNotFound {
                archive: self.path.display().to_string(),
                member: name.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn write_archive(members: &[(&str, &str)]) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut writer = ZipWriter::new(file.reopen().unwrap());
        for (name, contents) in members {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
        file
    }

    #[test]
    fn test_reads_named_member() {
        let file = write_archive(&[("readme.txt", "ignore me"), ("allCountries.txt", "IN\t560095")]);

        let mut archive = Archive::open(file.path()).unwrap();
        let mut contents = String::new();
        archive
            .member("allCountries.txt")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();

        assert_eq!(contents, "IN\t560095");
    }

    #[test]
    fn test_missing_member() {
        let file = write_archive(&[("US.txt", "US\t10001")]);

        let mut archive = Archive::open(file.path()).unwrap();
        let err = archive.member("allCountries.txt").err().unwrap();

        assert!(matches!(err, IngestError::MemberNotFound { ref member, .. } if member == "allCountries.txt"));
        assert_eq!(err.cause(), "member_not_found");
    }

    #[test]
    fn test_member_name_must_match_exactly() {
        let file = write_archive(&[("data/allCountries.txt", "nested")]);

        let mut archive = Archive::open(file.path()).unwrap();
        assert!(archive.member("allCountries.txt").is_err());
    }

    #[test]
    fn test_not_a_zip_archive() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"definitely not a zip").unwrap();

        let err = Archive::open(file.path()).err().unwrap();
        assert!(matches!(err, IngestError::Zip(_)));
        assert_eq!(err.cause(), "decode_error");
    }
}
