//! Processing options rendered as path segments
//!
//! Options are an ordered list of modifier groups. Order is part of the
//! signed message, so `w:300/h:200` and `h:200/w:300` produce different
//! signatures even though a proxy treats them the same way.
//!
//! Values are not range-checked here; the proxy's option parser owns that.
//!
//! ```text
//! /rs:fit:300:300/g:no/el:1/q:80/...
//! ```

use std::fmt;

/// How the proxy should fit the image within target dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeType {
    /// Scale to fit within dimensions, preserving aspect ratio (default)
    #[default]
    Fit,
    /// Crop to fill target dimensions
    Fill,
    /// Like fill, but never upscales
    FillDown,
    /// Stretch to fill exactly (may distort)
    Force,
    /// Pick fit or fill based on orientation
    Auto,
}

impl ResizeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fit => "fit",
            Self::Fill => "fill",
            Self::FillDown => "fill-down",
            Self::Force => "force",
            Self::Auto => "auto",
        }
    }
}

/// Gravity/anchor point for cropping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gravity {
    #[default]
    Center,
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
    /// Content-aware smart crop
    Smart,
}

impl Gravity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Center => "ce",
            Self::North => "no",
            Self::South => "so",
            Self::East => "ea",
            Self::West => "we",
            Self::NorthEast => "noea",
            Self::NorthWest => "nowe",
            Self::SouthEast => "soea",
            Self::SouthWest => "sowe",
            Self::Smart => "sm",
        }
    }
}

/// Output image format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
    Avif,
    Gif,
}

impl OutputFormat {
    /// Extension as it appears in the path suffix
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::WebP => "webp",
            Self::Avif => "avif",
            Self::Gif => "gif",
        }
    }
}

/// One modifier group: `name:arg1:arg2`
///
/// An empty argument is an elided default (`rs:fit::300` leaves the
/// width to the proxy) and is rendered as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modifier {
    name: String,
    args: Vec<String>,
}

impl Modifier {
    pub fn new<I, S>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// A segment passed through untouched (legacy `/fill/300/300/` grammars)
    pub fn raw(segment: impl Into<String>) -> Self {
        Self {
            name: segment.into(),
            args: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for arg in &self.args {
            write!(f, ":{}", arg)?;
        }
        Ok(())
    }
}

/// Ordered processing options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingOptions {
    modifiers: Vec<Modifier>,
}

impl ProcessingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append any modifier group
    pub fn modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    /// Append a raw, pre-rendered segment
    pub fn raw(self, segment: impl Into<String>) -> Self {
        self.modifier(Modifier::raw(segment))
    }

    /// `rs:<type>:<width>:<height>`
    pub fn resize(self, resize_type: ResizeType, width: u32, height: u32) -> Self {
        self.modifier(Modifier::new(
            "rs",
            [
                resize_type.as_str().to_string(),
                width.to_string(),
                height.to_string(),
            ],
        ))
    }

    /// `w:<width>`
    pub fn width(self, width: u32) -> Self {
        self.modifier(Modifier::new("w", [width.to_string()]))
    }

    /// `h:<height>`
    pub fn height(self, height: u32) -> Self {
        self.modifier(Modifier::new("h", [height.to_string()]))
    }

    /// `g:<gravity>`
    pub fn gravity(self, gravity: Gravity) -> Self {
        self.modifier(Modifier::new("g", [gravity.as_str()]))
    }

    /// `el:1` or `el:0`
    pub fn enlarge(self, enlarge: bool) -> Self {
        self.modifier(Modifier::new("el", [if enlarge { "1" } else { "0" }]))
    }

    /// `dpr:<ratio>`
    pub fn dpr(self, dpr: f32) -> Self {
        self.modifier(Modifier::new("dpr", [dpr.to_string()]))
    }

    /// `q:<quality>`
    pub fn quality(self, quality: u8) -> Self {
        self.modifier(Modifier::new("q", [quality.to_string()]))
    }

    /// `f:<extension>`, the option form of an output format
    pub fn format(self, format: OutputFormat) -> Self {
        self.modifier(Modifier::new("f", [format.extension()]))
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    /// Rendered segments in order
    pub fn segments(&self) -> Vec<String> {
        self.modifiers.iter().map(ToString::to_string).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.modifiers.len()
    }
}
