use thiserror::Error;

/// Everything that can go wrong while turning an enclosure request into a cut sheet.
#[derive(Error, Debug)]
pub enum CutSheetError {
    /// An input or derived dimension is zero, negative or not finite.
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    #[error("Unsupported join style '{0}', expected: front_back_overlap or side_overlap")]
    UnsupportedJoinStyle(String),

    /// The panel does not fit an empty sheet in any permitted orientation.
    #[error(
        "panel '{panel}' ({width}x{height}) does not fit sheet {sheet_width}x{sheet_height} with kerf {kerf}"
    )]
    SizeExceedsSheet {
        panel: String,
        width: f64,
        height: f64,
        sheet_width: f64,
        sheet_height: f64,
        kerf: f64,
    },

    /// The packer produced a layout that breaks a geometric invariant.
    #[error("Layout invariant violated: {0}")]
    LayoutInvariant(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CutSheetError>;

/// Rejects non-finite or non-positive values.
pub(crate) fn ensure_positive(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(CutSheetError::InvalidDimension(format!(
            "{name} must be > 0, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_positive() {
        assert_eq!(ensure_positive("width", 2.5).unwrap(), 2.5);
        assert!(matches!(
            ensure_positive("width", 0.0),
            Err(CutSheetError::InvalidDimension(_))
        ));
        assert!(ensure_positive("width", -1.0).is_err());
        assert!(ensure_positive("width", f64::NAN).is_err());
        assert!(ensure_positive("width", f64::INFINITY).is_err());
    }

    #[test]
    fn test_size_exceeds_message() {
        let err = CutSheetError::SizeExceedsSheet {
            panel: "Front".to_string(),
            width: 100.0,
            height: 50.0,
            sheet_width: 96.0,
            sheet_height: 48.0,
            kerf: 0.125,
        };
        let msg = err.to_string();
        assert!(msg.contains("Front"));
        assert!(msg.contains("100x50"));
        assert!(msg.contains("96x48"));
    }
}
