//! Generation request decoding and validation.
//!
//! The HTTP layer decodes the JSON body into a [`RawGenerationRequest`], where
//! every field is optional and numbers are wide enough to hold any JSON
//! integer. [`RawGenerationRequest::validate`] then applies defaults and range
//! checks in a single pass, collecting every violation it finds.
//!
//! Field names are camelCase. The snake_case names used by earlier clients
//! (`url`, `box_size`, `border`, `fill_color`, `back_color`) are accepted as
//! aliases. Those clients also send sizes as `10.0` or `"10"`, so numeric
//! fields accept any integral number or numeric string.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::error::{FieldViolation, ValidationError};

/// Default size of one module in pixels.
pub const DEFAULT_MODULE_SIZE: u32 = 10;

/// Smallest accepted module size.
pub const MIN_MODULE_SIZE: u32 = 1;

/// Largest accepted module size.
pub const MAX_MODULE_SIZE: u32 = 50;

/// Default quiet zone, in modules.
pub const DEFAULT_BORDER_WIDTH: u32 = 4;

/// Smallest accepted quiet zone.
pub const MIN_BORDER_WIDTH: u32 = 0;

/// Largest accepted quiet zone.
pub const MAX_BORDER_WIDTH: u32 = 20;

/// Default color of dark modules.
pub const DEFAULT_FOREGROUND_COLOR: &str = "black";

/// Default color of light modules and the quiet zone.
pub const DEFAULT_BACKGROUND_COLOR: &str = "white";

// =============================================================================
// Raw Request
// =============================================================================

/// Generation request as decoded from JSON, before validation.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGenerationRequest {
    /// Text or URL to encode
    #[serde(default, alias = "url")]
    pub content: Option<String>,

    /// Pixels per module
    #[serde(default, alias = "box_size", deserialize_with = "deserialize_integral")]
    pub module_size: Option<i64>,

    /// Quiet zone width in modules
    #[serde(default, alias = "border", deserialize_with = "deserialize_integral")]
    pub border_width: Option<i64>,

    /// Color of dark modules
    #[serde(default, alias = "fill_color")]
    pub foreground_color: Option<String>,

    /// Color of light modules
    #[serde(default, alias = "back_color")]
    pub background_color: Option<String>,
}

impl RawGenerationRequest {
    /// Create a raw request carrying only content.
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Apply defaults and range checks.
    ///
    /// Never touches the store or the encoder. Colors are only checked for
    /// emptiness; whether a color is meaningful is decided at encode time.
    pub fn validate(self) -> Result<GenerationRequest, ValidationError> {
        let mut violations = Vec::new();

        let content = match self.content {
            None => {
                violations.push(FieldViolation::new("content", "field required"));
                String::new()
            }
            Some(c) if c.is_empty() => {
                violations.push(FieldViolation::new("content", "must not be empty"));
                c
            }
            Some(c) => c,
        };

        let module_size = check_range(
            "moduleSize",
            self.module_size,
            DEFAULT_MODULE_SIZE,
            MIN_MODULE_SIZE,
            MAX_MODULE_SIZE,
            &mut violations,
        );

        let border_width = check_range(
            "borderWidth",
            self.border_width,
            DEFAULT_BORDER_WIDTH,
            MIN_BORDER_WIDTH,
            MAX_BORDER_WIDTH,
            &mut violations,
        );

        let foreground_color = check_color(
            "foregroundColor",
            self.foreground_color,
            DEFAULT_FOREGROUND_COLOR,
            &mut violations,
        );

        let background_color = check_color(
            "backgroundColor",
            self.background_color,
            DEFAULT_BACKGROUND_COLOR,
            &mut violations,
        );

        if !violations.is_empty() {
            return Err(ValidationError::new(violations));
        }

        Ok(GenerationRequest {
            content,
            module_size,
            border_width,
            foreground_color,
            background_color,
        })
    }
}

/// A JSON number or string that should hold an integer.
#[derive(Deserialize)]
#[serde(untagged)]
enum Integral {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Accepts `10`, `10.0` and `"10"`; rejects fractions and non-numeric text.
///
/// Floats beyond the `i64` range saturate, which the range check then reports.
fn deserialize_integral<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<Integral>::deserialize(deserializer)? else {
        return Ok(None);
    };

    match value {
        Integral::Int(n) => Ok(Some(n)),
        Integral::Float(f) if f.fract() == 0.0 => Ok(Some(f as i64)),
        Integral::Float(f) => Err(D::Error::custom(format!("expected an integer, got {}", f))),
        Integral::Text(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected an integer, got {:?}", s))),
    }
}

fn check_range(
    field: &'static str,
    value: Option<i64>,
    default: u32,
    min: u32,
    max: u32,
    violations: &mut Vec<FieldViolation>,
) -> u32 {
    let Some(value) = value else {
        return default;
    };

    if value < i64::from(min) || value > i64::from(max) {
        violations.push(FieldViolation::new(
            field,
            format!("must be between {} and {} (got {})", min, max, value),
        ));
        return default;
    }

    // In range, so it fits
    value as u32
}

fn check_color(
    field: &'static str,
    value: Option<String>,
    default: &str,
    violations: &mut Vec<FieldViolation>,
) -> String {
    match value {
        None => default.to_string(),
        Some(color) if color.trim().is_empty() => {
            violations.push(FieldViolation::new(field, "must not be empty"));
            color
        }
        Some(color) => color,
    }
}

// =============================================================================
// Validated Request
// =============================================================================

/// A generation request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Text or URL to encode (non-empty)
    pub content: String,

    /// Pixels per module, in `MIN_MODULE_SIZE..=MAX_MODULE_SIZE`
    pub module_size: u32,

    /// Quiet zone in modules, in `MIN_BORDER_WIDTH..=MAX_BORDER_WIDTH`
    pub border_width: u32,

    /// Color of dark modules, unparsed
    pub foreground_color: String,

    /// Color of light modules, unparsed
    pub background_color: String,
}

impl GenerationRequest {
    /// Create a request with default visual parameters.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            module_size: DEFAULT_MODULE_SIZE,
            border_width: DEFAULT_BORDER_WIDTH,
            foreground_color: DEFAULT_FOREGROUND_COLOR.to_string(),
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
        }
    }

    /// Set the module size.
    pub fn with_module_size(mut self, module_size: u32) -> Self {
        self.module_size = module_size;
        self
    }

    /// Set the quiet zone width.
    pub fn with_border_width(mut self, border_width: u32) -> Self {
        self.border_width = border_width;
        self
    }

    /// Set both colors.
    pub fn with_colors(
        mut self,
        foreground: impl Into<String>,
        background: impl Into<String>,
    ) -> Self {
        self.foreground_color = foreground.into();
        self.background_color = background.into();
        self
    }

    /// Content safe to put in logs: the first five characters only.
    pub fn redacted_content(&self) -> String {
        let prefix: String = self.content.chars().take(5).collect();
        format!("{}**hidden**", prefix)
    }
}

// =============================================================================
// Tests
// =============================================================================
