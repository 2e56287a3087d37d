//! Serialization option flags and their registry.
//!
//! Options are a plain bitmask with named constants, mirroring libxml2's
//! `xmlSaveOption` values. Unknown bits are accepted and passed through
//! untouched so callers built against a newer flag set keep working.

use std::ops::BitOr;

/// A bitmask of serialization options.
///
/// Compose flags with `|`; the default is [`FORMAT`](Self::FORMAT) alone.
///
/// # Examples
///
/// ```
/// use xmlsave::SaveOptions;
///
/// let opts = SaveOptions::FORMAT | SaveOptions::NO_DECL;
/// assert!(opts.contains(SaveOptions::NO_DECL));
/// assert!(!opts.contains(SaveOptions::AS_HTML));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SaveOptions(u32);

impl SaveOptions {
    /// Format (pretty-print) the output.
    pub const FORMAT: Self = Self(1);
    /// Drop the XML declaration.
    pub const NO_DECL: Self = Self(1 << 1);
    /// Remove empty tags: serialize `<a></a>` instead of `<a/>`.
    pub const NO_EMPTY: Self = Self(1 << 2);
    /// Disable XHTML1 rules.
    pub const NO_XHTML: Self = Self(1 << 3);
    /// Force XHTML1 rules.
    pub const XHTML: Self = Self(1 << 4);
    /// Force XML output.
    pub const AS_XML: Self = Self(1 << 5);
    /// Force HTML output.
    pub const AS_HTML: Self = Self(1 << 6);
    /// Format with non-significant whitespace.
    pub const WSNONSIG: Self = Self(1 << 7);

    /// An empty option set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Builds an option set from raw bits. All bits are preserved,
    /// including ones this crate does not define.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns true if every bit of `other` is set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self::FORMAT
    }
}

impl BitOr for SaveOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// One entry in the save option registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptionInfo {
    /// The option's symbolic name.
    pub name: &'static str,
    /// The bit value, identical to the corresponding `SaveOptions` constant.
    pub value: u32,
    /// Human-readable description.
    pub description: &'static str,
}

/// The full option registry, in ascending bit order.
///
/// Pure introspection data for callers that present the option menu;
/// the values are the same constants accepted by the save entry points.
///
/// # Examples
///
/// ```
/// use xmlsave::{save_options, SaveOptions};
///
/// let format = &save_options()[0];
/// assert_eq!(format.name, "format");
/// assert_eq!(format.value, SaveOptions::FORMAT.bits());
/// ```
#[must_use]
pub fn save_options() -> &'static [SaveOptionInfo] {
    const OPTIONS: [SaveOptionInfo; 8] = [
        SaveOptionInfo {
            name: "format",
            value: SaveOptions::FORMAT.bits(),
            description: "Format output",
        },
        SaveOptionInfo {
            name: "no_declaration",
            value: SaveOptions::NO_DECL.bits(),
            description: "Drop the XML declaration",
        },
        SaveOptionInfo {
            name: "no_empty_tags",
            value: SaveOptions::NO_EMPTY.bits(),
            description: "Remove empty tags",
        },
        SaveOptionInfo {
            name: "no_xhtml",
            value: SaveOptions::NO_XHTML.bits(),
            description: "Disable XHTML1 rules",
        },
        SaveOptionInfo {
            name: "require_xhtml",
            value: SaveOptions::XHTML.bits(),
            description: "Force XHTML1 rules",
        },
        SaveOptionInfo {
            name: "as_xml",
            value: SaveOptions::AS_XML.bits(),
            description: "Force XML output",
        },
        SaveOptionInfo {
            name: "as_html",
            value: SaveOptions::AS_HTML.bits(),
            description: "Force HTML output",
        },
        SaveOptionInfo {
            name: "format_whitespace",
            value: SaveOptions::WSNONSIG.bits(),
            description: "Format with non-significant whitespace",
        },
    ];
    &OPTIONS
}
