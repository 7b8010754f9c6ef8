use std::fmt::{self, Display, Formatter};

use serde::Deserialize;
use thurl_core::{Error, Result};

use crate::constants::*;
use crate::filter::{encode_filters, FilterArgs, Filters};

/// Manual crop rectangle, written as `{left}x{top}:{right}x{bottom}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Crop {
    /// Left edge in pixels.
    pub left: i32,
    /// Top edge in pixels.
    pub top: i32,
    /// Right edge in pixels.
    pub right: i32,
    /// Bottom edge in pixels.
    pub bottom: i32,
}

impl Crop {
    /// Create a new crop rectangle.
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

impl Display for Crop {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}:{}x{}",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// Adjustments to apply to an image.
///
/// Every field is optional. Fields are written to the url in a fixed order
/// thumbor's parser depends on: `trim`, crop, fit, size, halign, valign,
/// `smart` and finally filters.
///
/// When deserialized, every key that is not one of the named fields is read
/// as a filter, in document order:
///
/// ```
/// use thurl_thumbor::{encode_adjustments, Adjustments};
///
/// let adjustments: Adjustments =
///     serde_json::from_str(r#"{"width": 200, "blur": [3, 2], "grayscale": ""}"#).unwrap();
/// assert_eq!(
///     encode_adjustments(Some(&adjustments)),
///     "200x/filters:blur(3,2):grayscale()/"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Adjustments {
    /// Remove surrounding space of the image.
    pub trim: bool,
    /// Manual crop applied before resizing.
    pub crop: Option<Crop>,
    /// Fit mode, for example `fit-in`.
    pub fit: Option<String>,
    /// Target width. `0` means "not set", negative values flip the image.
    ///
    /// Whole pixels only: a fractional json value such as `200.5` fails to
    /// deserialize instead of being written as `200.5x`.
    pub width: Option<i32>,
    /// Target height. `0` means "not set", negative values flip the image.
    ///
    /// Whole pixels only, like [`Adjustments::width`].
    pub height: Option<i32>,
    /// Horizontal alignment: `left`, `center` or `right`.
    pub halign: Option<String>,
    /// Vertical alignment: `top`, `middle` or `bottom`.
    pub valign: Option<String>,
    /// Enable smart cropping.
    pub smart: bool,
    /// Filters applied after resizing, in insertion order.
    #[serde(flatten)]
    pub filters: Filters,
}

impl Adjustments {
    /// Create empty adjustments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable trim.
    pub fn trim(mut self) -> Self {
        self.trim = true;
        self
    }

    /// Set the manual crop.
    pub fn crop(mut self, crop: Crop) -> Self {
        self.crop = Some(crop);
        self
    }

    /// Set the fit mode.
    pub fn fit(mut self, fit: &str) -> Self {
        self.fit = Some(fit.to_string());
        self
    }

    /// Set the target width.
    pub fn width(mut self, width: i32) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the target height.
    pub fn height(mut self, height: i32) -> Self {
        self.height = Some(height);
        self
    }

    /// Set both target width and height.
    pub fn size(self, width: i32, height: i32) -> Self {
        self.width(width).height(height)
    }

    /// Set the horizontal alignment.
    pub fn halign(mut self, halign: &str) -> Self {
        self.halign = Some(halign.to_string());
        self
    }

    /// Set the vertical alignment.
    pub fn valign(mut self, valign: &str) -> Self {
        self.valign = Some(valign.to_string());
        self
    }

    /// Enable smart cropping.
    pub fn smart(mut self) -> Self {
        self.smart = true;
        self
    }

    /// Append a filter.
    pub fn filter(mut self, name: impl Into<String>, args: impl Into<FilterArgs>) -> Self {
        self.filters.insert(name, args);
        self
    }

    /// Check if these adjustments produce an empty segment.
    pub fn is_empty(&self) -> bool {
        encode_adjustments(Some(self)).is_empty()
    }

    /// Check the values against what thumbor accepts.
    ///
    /// [`encode_adjustments`] never calls this: the default path writes
    /// whatever it's given. Use [`Builder::try_build`](crate::Builder::try_build)
    /// to reject bad input before a url is produced.
    pub fn validate(&self) -> Result<()> {
        if let Some(fit) = &self.fit {
            if !FIT_MODES.contains(&fit.as_str()) {
                return Err(Error::request_invalid(format!(
                    "fit must be one of {FIT_MODES:?}, got {fit:?}"
                )));
            }
        }
        if let Some(halign) = &self.halign {
            if !HALIGN_VALUES.contains(&halign.as_str()) {
                return Err(Error::request_invalid(format!(
                    "halign must be one of {HALIGN_VALUES:?}, got {halign:?}"
                )));
            }
        }
        if let Some(valign) = &self.valign {
            if !VALIGN_VALUES.contains(&valign.as_str()) {
                return Err(Error::request_invalid(format!(
                    "valign must be one of {VALIGN_VALUES:?}, got {valign:?}"
                )));
            }
        }
        if let Some(crop) = &self.crop {
            if crop.right < crop.left || crop.bottom < crop.top {
                return Err(Error::request_invalid(format!(
                    "crop {crop} has its right-bottom corner before its left-top corner"
                )));
            }
        }
        for filter in &self.filters {
            let valid = !filter.name.is_empty()
                && filter
                    .name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
            if !valid {
                return Err(Error::request_invalid(format!(
                    "invalid filter name {:?}",
                    filter.name
                )));
            }
        }

        Ok(())
    }
}

/// Encode adjustments into the canonical thumbor path segment.
///
/// The result is empty or ends with `/`, never starts with `/` and never
/// contains `//`. All whitespace is removed.
pub fn encode_adjustments(adjustments: Option<&Adjustments>) -> String {
    let Some(adj) = adjustments else {
        return String::new();
    };

    let components = [
        if adj.trim {
            "trim".to_string()
        } else {
            String::new()
        },
        adj.crop.map(|c| c.to_string()).unwrap_or_default(),
        adj.fit.clone().unwrap_or_default(),
        encode_size(adj.width, adj.height),
        adj.halign.clone().unwrap_or_default(),
        adj.valign.clone().unwrap_or_default(),
        if adj.smart {
            "smart".to_string()
        } else {
            String::new()
        },
    ];

    let mut raw = String::from("/");
    for component in &components {
        raw.push_str(component);
        raw.push('/');
    }
    // The filters segment carries its own leading slash.
    raw.push_str(&encode_filters(&adj.filters));
    raw.push('/');

    normalize_segment(&raw)
}

/// `{width}x{height}` with an absent or zero side left blank.
fn encode_size(width: Option<i32>, height: Option<i32>) -> String {
    let width = width.filter(|v| *v != 0);
    let height = height.filter(|v| *v != 0);
    if width.is_none() && height.is_none() {
        return String::new();
    }

    let side = |v: Option<i32>| v.map(|v| v.to_string()).unwrap_or_default();
    format!("{}x{}", side(width), side(height))
}

/// Drop whitespace, collapse runs of `/` and strip the leading `/`.
fn normalize_segment(raw: &str) -> String {
    let mut s = String::with_capacity(raw.len());
    for c in raw.chars().filter(|c| !c.is_whitespace()) {
        if c == '/' && s.ends_with('/') {
            continue;
        }
        s.push(c);
    }

    match s.strip_prefix('/') {
        Some(v) => v.to_string(),
        None => s,
    }
}
