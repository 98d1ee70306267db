//! Shared shading rules for branch support values.
//!
//! Both renderers bucket support the same way and derive the color at
//! render time, so the same input always draws the same.

/// Bucket thresholds, highest first.
pub const CONF_HIGH: f64 = 0.9;
pub const CONF_MEDIUM: f64 = 0.7;
pub const CONF_LOW: f64 = 0.5;

/// Fill for plain boxes and contracted triangles in the DOT output.
pub const NEUTRAL_FILL: &str = "grey";

/// Graphviz color for a support value. `None` below the lowest bucket.
pub fn dot_confidence_color(conf: f64) -> Option<&'static str> {
    if conf >= CONF_HIGH {
        Some("black")
    } else if conf >= CONF_MEDIUM {
        Some("gray40")
    } else if conf >= CONF_LOW {
        Some("gray70")
    } else {
        None
    }
}

/// TikZ color for a support value. `None` below the lowest bucket.
pub fn tikz_confidence_color(conf: f64) -> Option<&'static str> {
    if conf >= CONF_HIGH {
        Some("black")
    } else if conf >= CONF_MEDIUM {
        Some("black!50")
    } else if conf >= CONF_LOW {
        Some("black!10")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_buckets() {
        assert_eq!(dot_confidence_color(1.0), Some("black"));
        assert_eq!(dot_confidence_color(0.9), Some("black"));
        assert_eq!(dot_confidence_color(0.89), Some("gray40"));
        assert_eq!(dot_confidence_color(0.7), Some("gray40"));
        assert_eq!(dot_confidence_color(0.5), Some("gray70"));
        assert_eq!(dot_confidence_color(0.49), None);
        assert_eq!(dot_confidence_color(0.0), None);
    }

    #[test]
    fn test_tikz_buckets() {
        assert_eq!(tikz_confidence_color(0.95), Some("black"));
        assert_eq!(tikz_confidence_color(0.8), Some("black!50"));
        assert_eq!(tikz_confidence_color(0.6), Some("black!10"));
        assert_eq!(tikz_confidence_color(0.3), None);
    }
}
