//! Canonical path assembly
//!
//! ```text
//! /<modifier>/<modifier>/.../<source>[.<ext>|@<ext>]
//! ```
//!
//! Only structure is checked: segments must be non-empty and free of `/`.
//! What a modifier means is the proxy's concern.

use std::fmt;

use crate::encryption::SourceCipher;
use crate::error::{SignError, SignResult};
use crate::options::ProcessingOptions;
use crate::source::SourceReference;

/// An unsigned path; always starts with `/`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path(String);

impl Path {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Path {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Builds a [`Path`] from modifier segments, a source and an extension
#[derive(Debug, Clone)]
pub struct PathBuilder {
    segments: Vec<String>,
    source: SourceReference,
    extension: Option<String>,
}

impl PathBuilder {
    pub fn new(source: SourceReference) -> Self {
        Self {
            segments: Vec::new(),
            source,
            extension: None,
        }
    }

    /// Append the rendered segments of `options`, in order
    pub fn options(mut self, options: &ProcessingOptions) -> Self {
        self.segments.extend(options.segments());
        self
    }

    /// Append one pre-rendered modifier segment
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    /// Assemble the path; `cipher` is required for encrypted sources
    pub fn build(&self, cipher: Option<&SourceCipher>) -> SignResult<Path> {
        for segment in &self.segments {
            validate_segment(segment)?;
        }
        if let Some(ext) = &self.extension {
            validate_extension(ext)?;
        }

        let source = self.source.encode(cipher)?;

        let mut path = String::with_capacity(
            self.segments.iter().map(|s| s.len() + 1).sum::<usize>() + source.len() + 16,
        );
        for segment in &self.segments {
            path.push('/');
            path.push_str(segment);
        }
        path.push('/');
        path.push_str(&source);
        if let Some(ext) = &self.extension {
            path.push(self.source.extension_separator());
            path.push_str(ext);
        }

        Ok(Path(path))
    }
}

/// Join segments, source and extension into a [`Path`]
pub fn build_path<S: AsRef<str>>(
    segments: &[S],
    source: &SourceReference,
    extension: Option<&str>,
    cipher: Option<&SourceCipher>,
) -> SignResult<Path> {
    let mut builder = PathBuilder::new(source.clone());
    for segment in segments {
        builder = builder.segment(segment.as_ref());
    }
    if let Some(ext) = extension {
        builder = builder.extension(ext);
    }
    builder.build(cipher)
}

fn validate_segment(segment: &str) -> SignResult<()> {
    if segment.is_empty() {
        return Err(SignError::invalid_path("empty modifier segment"));
    }
    if segment.contains('/') {
        return Err(SignError::invalid_path(format!(
            "modifier segment contains '/': {}",
            segment
        )));
    }
    Ok(())
}

fn validate_extension(ext: &str) -> SignResult<()> {
    if ext.is_empty() {
        return Err(SignError::invalid_path("empty extension"));
    }
    if ext.contains(&['/', '.', '@'][..]) {
        return Err(SignError::invalid_path(format!("invalid extension: {}", ext)));
    }
    Ok(())
}
