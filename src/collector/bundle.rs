//! Bundle collector.
//!
//! Resolves each listed path against the base directory and writes one
//! section per entry, in list order, into a single output document.

use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::collector::{CollectorError, Section, SectionBody};
use crate::config::{AppConfig, UnreadablePolicy};

/// Summary of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleReport {
    /// Destination the bundle was written to.
    pub output_file: PathBuf,
    /// Total sections written (equals the number of listed paths).
    pub sections: usize,
    /// Sections carrying file contents.
    pub found: usize,
    /// Sections marked `(NOT FOUND)`.
    pub missing: usize,
    /// Sections marked `(UNREADABLE)`.
    pub unreadable: usize,
    /// Bytes written to the output document.
    pub bytes: u64,
}

impl BundleReport {
    fn record(&mut self, section: &Section, bytes: usize) {
        self.sections += 1;
        self.bytes += bytes as u64;
        match section.body {
            SectionBody::Contents(_) => self.found += 1,
            SectionBody::NotFound => self.missing += 1,
            SectionBody::Unreadable => self.unreadable += 1,
        }
    }
}

/// Collects the configured files into one output document.
#[derive(Debug, Clone)]
pub struct Collector {
    config: AppConfig,
}

impl Collector {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Join the base directory and a listed path.
    ///
    /// An absolute `relative` replaces the base directory, as with [`Path::join`].
    pub fn resolve(&self, relative: &str) -> PathBuf {
        Path::new(&self.config.base_dir).join(relative)
    }

    /// Read one listed path into a section.
    ///
    /// # Errors
    /// Returns `CollectorError::Read` or `CollectorError::NotAFile` when the
    /// path exists but cannot be read and the policy is `abort`.
    pub fn section(&self, relative: &str) -> Result<Section, CollectorError> {
        let full_path = self.resolve(relative);

        match read_source(&full_path) {
            Ok(Some(contents)) => Ok(Section::contents(relative, contents)),
            Ok(None) => {
                tracing::warn!(path = %relative, "File not found");
                Ok(Section::not_found(relative))
            }
            Err(e) => match self.config.on_unreadable {
                UnreadablePolicy::Abort => Err(e),
                UnreadablePolicy::Mark => {
                    tracing::warn!(path = %relative, error = %e, "Marking unreadable file");
                    Ok(Section::unreadable(relative))
                }
            },
        }
    }

    /// Write every section to `out` in list order.
    ///
    /// The destination in the returned report is the configured output file;
    /// nothing is written there by this method.
    pub fn render<W: Write>(&self, out: &mut W) -> Result<BundleReport, CollectorError> {
        let output_path = PathBuf::from(&self.config.output_file);
        let mut report = BundleReport {
            output_file: output_path.clone(),
            ..BundleReport::default()
        };

        for relative in &self.config.files {
            let section = self.section(relative)?;
            let bytes = section
                .write_to(out)
                .map_err(|source| CollectorError::Output {
                    path: output_path.clone(),
                    source,
                })?;
            tracing::debug!(path = %relative, bytes, header = %section.header(), "Section written");
            report.record(&section, bytes);
        }

        Ok(report)
    }

    /// Build the bundle and replace the output file with it.
    ///
    /// Sections are staged in a temporary file next to the destination, which
    /// is renamed over the output only after every section has been written
    /// and synced. On error the temporary file is removed and an existing
    /// output file is left untouched.
    ///
    /// The replaced output keeps the permissions of the file it replaces; a
    /// new output gets the mode a plain create would give it.
    pub fn run(&self) -> Result<BundleReport, CollectorError> {
        let output_path = PathBuf::from(&self.config.output_file);
        let output_err = |source: std::io::Error| CollectorError::Output {
            path: output_path.clone(),
            source,
        };

        tracing::info!(
            base_dir = %self.config.base_dir,
            output = %output_path.display(),
            entries = self.config.files.len(),
            policy = %self.config.on_unreadable,
            "Collecting files"
        );

        let staging_dir = match output_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(staging_dir).map_err(output_err)?;

        let report = {
            let mut writer = BufWriter::new(staged.as_file_mut());
            let report = self.render(&mut writer)?;
            writer.flush().map_err(output_err)?;
            report
        };

        let permissions = destination_permissions(&output_path).map_err(output_err)?;
        staged
            .as_file()
            .set_permissions(permissions)
            .map_err(output_err)?;
        staged.as_file().sync_all().map_err(output_err)?;
        staged
            .persist(&output_path)
            .map_err(|e| output_err(e.error))?;

        tracing::info!(
            output = %output_path.display(),
            sections = report.sections,
            found = report.found,
            missing = report.missing,
            unreadable = report.unreadable,
            bytes = report.bytes,
            "Bundle written"
        );

        Ok(report)
    }
}

/// Permissions the staged bundle should carry once it replaces `path`.
///
/// An existing destination keeps its mode. Otherwise an empty file is created
/// in its place so the mode follows the process umask; it is replaced by the
/// rename right after.
fn destination_permissions(path: &Path) -> std::io::Result<fs::Permissions> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(metadata.permissions()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let placeholder = fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(path)?;
            Ok(placeholder.metadata()?.permissions())
        }
        Err(e) => Err(e),
    }
}

/// Whether a metadata error means nothing can exist at the path.
///
/// Besides plain `NotFound` this covers a parent component that is a regular
/// file, a symlink loop, and a name the filesystem cannot hold.
fn is_absent(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::NotFound
            | ErrorKind::NotADirectory
            | ErrorKind::FilesystemLoop
            | ErrorKind::InvalidFilename
    )
}

/// Read a source file as UTF-8 text.
///
/// Returns `Ok(None)` if nothing exists at `path` (including a dangling
/// symlink or a path nested under a regular file).
fn read_source(path: &Path) -> Result<Option<String>, CollectorError> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if is_absent(e.kind()) => return Ok(None),
        Err(source) => {
            return Err(CollectorError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if !metadata.is_file() {
        return Err(CollectorError::NotAFile(path.to_path_buf()));
    }

    fs::read_to_string(path)
        .map(Some)
        .map_err(|source| CollectorError::Read {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collector_for(base: &Path, files: &[&str], policy: UnreadablePolicy) -> Collector {
        Collector::new(AppConfig {
            base_dir: base.to_string_lossy().into_owned(),
            output_file: base.join("out.txt").to_string_lossy().into_owned(),
            files: files.iter().map(|f| f.to_string()).collect(),
            on_unreadable: policy,
        })
    }

    #[test]
    fn test_resolve_joins_base_dir() {
        let collector = Collector::new(AppConfig {
            base_dir: "proj".to_string(),
            ..AppConfig::default()
        });
        assert_eq!(collector.resolve("a/b.txt"), PathBuf::from("proj/a/b.txt"));
    }

    #[test]
    fn test_section_found_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "hello").unwrap();
        let collector = collector_for(dir.path(), &[], UnreadablePolicy::Abort);

        assert_eq!(
            collector.section("a.txt").unwrap(),
            Section::contents("a.txt", "hello")
        );
        assert_eq!(
            collector.section("missing.txt").unwrap(),
            Section::not_found("missing.txt")
        );
    }

    #[test]
    fn test_section_directory_aborts() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        let collector = collector_for(dir.path(), &[], UnreadablePolicy::Abort);

        let err = collector.section("src").unwrap_err();
        assert!(matches!(err, CollectorError::NotAFile(_)));
    }

    #[test]
    fn test_section_directory_marked() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        let collector = collector_for(dir.path(), &[], UnreadablePolicy::Mark);

        assert_eq!(collector.section("src").unwrap(), Section::unreadable("src"));
    }

    #[test]
    fn test_section_empty_path_resolves_to_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let collector = collector_for(dir.path(), &[], UnreadablePolicy::Mark);

        assert_eq!(collector.section("").unwrap(), Section::unreadable(""));
    }

    #[test]
    fn test_section_nested_under_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("server")).unwrap();
        fs::write(dir.path().join("server/.env"), "PORT=5000\n").unwrap();
        let collector = collector_for(dir.path(), &[], UnreadablePolicy::Abort);

        assert_eq!(
            collector.section("server/.env/nested.js").unwrap(),
            Section::not_found("server/.env/nested.js")
        );
    }

    #[test]
    fn test_is_absent_kinds() {
        assert!(is_absent(ErrorKind::NotFound));
        assert!(is_absent(ErrorKind::NotADirectory));
        assert!(is_absent(ErrorKind::FilesystemLoop));
        assert!(is_absent(ErrorKind::InvalidFilename));
        assert!(!is_absent(ErrorKind::PermissionDenied));
        assert!(!is_absent(ErrorKind::InvalidData));
    }

    #[test]
    fn test_section_invalid_utf8_aborts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bin.dat"), [0xff, 0xfe, 0x00]).unwrap();
        let collector = collector_for(dir.path(), &[], UnreadablePolicy::Abort);

        match collector.section("bin.dat").unwrap_err() {
            CollectorError::Read { source, .. } => {
                assert_eq!(source.kind(), ErrorKind::InvalidData)
            }
            other => panic!("expected Read error, got {other:?}"),
        }
    }

    #[test]
    fn test_render_report_counts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "hello").unwrap();
        fs::create_dir(dir.path().join("d")).unwrap();
        let collector = collector_for(
            dir.path(),
            &["a.txt", "missing.txt", "d", "a.txt"],
            UnreadablePolicy::Mark,
        );

        let mut buf = Vec::new();
        let report = collector.render(&mut buf).unwrap();

        assert_eq!(report.sections, 4);
        assert_eq!(report.found, 2);
        assert_eq!(report.missing, 1);
        assert_eq!(report.unreadable, 1);
        assert_eq!(report.bytes, buf.len() as u64);
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "===== a.txt =====\n\nhello\n\n\
             ===== missing.txt (NOT FOUND) =====\n\n\
             ===== d (UNREADABLE) =====\n\n\
             ===== a.txt =====\n\nhello\n\n"
        );
    }

    #[test]
    fn test_run_output_dir_missing() {
        let dir = tempfile::tempdir().unwrap();
        let collector = Collector::new(AppConfig {
            base_dir: dir.path().to_string_lossy().into_owned(),
            output_file: dir
                .path()
                .join("no-such-dir/out.txt")
                .to_string_lossy()
                .into_owned(),
            files: vec![],
            on_unreadable: UnreadablePolicy::Abort,
        });

        let err = collector.run().unwrap_err();
        assert!(matches!(err, CollectorError::Output { .. }));
    }
}
