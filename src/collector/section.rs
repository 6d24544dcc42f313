//! A single bundle section: header banner plus optional body.

use std::io::Write;

/// Banner delimiter on both sides of the header.
const BANNER: &str = "=====";

/// Body of a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionBody {
    /// File contents, written verbatim.
    Contents(String),
    /// The resolved path does not exist.
    NotFound,
    /// The path exists but could not be read (only with `UnreadablePolicy::Mark`).
    Unreadable,
}

/// One entry of the output document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Relative path exactly as listed.
    pub path: String,
    pub body: SectionBody,
}

impl Section {
    pub fn contents(path: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            body: SectionBody::Contents(contents.into()),
        }
    }

    pub fn not_found(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            body: SectionBody::NotFound,
        }
    }

    pub fn unreadable(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            body: SectionBody::Unreadable,
        }
    }

    /// Header line without the trailing newline.
    pub fn header(&self) -> String {
        match self.body {
            SectionBody::Contents(_) => format!("{BANNER} {} {BANNER}", self.path),
            SectionBody::NotFound => format!("{BANNER} {} (NOT FOUND) {BANNER}", self.path),
            SectionBody::Unreadable => format!("{BANNER} {} (UNREADABLE) {BANNER}", self.path),
        }
    }

    /// Write the section and return the number of bytes written.
    ///
    /// The header is always followed by a blank line; contents, when present,
    /// are followed by two newlines.
    pub fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<usize> {
        let header = self.header();
        out.write_all(header.as_bytes())?;
        out.write_all(b"\n\n")?;
        let mut written = header.len() + 2;

        if let SectionBody::Contents(contents) = &self.body {
            out.write_all(contents.as_bytes())?;
            out.write_all(b"\n\n")?;
            written += contents.len() + 2;
        }

        Ok(written)
    }
}
