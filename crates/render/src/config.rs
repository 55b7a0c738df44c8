use scene::{CanvasSizing, ControlConfig, DataConfig};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::paint::GlobeStyle;

/// Everything a viewer front end is configured with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub data: DataConfig,
    pub controls: ControlConfig,
    pub sizing: CanvasSizing,
    pub style: GlobeStyle,
}

impl ViewerConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.controls;
        let invalid = |field, reason: &str| {
            Err(ConfigError::InvalidValue {
                field,
                reason: reason.to_string(),
            })
        };

        if !c.drag_sensitivity.is_finite() {
            return invalid("controls.drag_sensitivity", "must be finite");
        }
        if !(0.0..=90.0).contains(&c.latitude_limit_deg) {
            return invalid("controls.latitude_limit_deg", "must be within [0, 90]");
        }
        if !(c.zoom_step.is_finite() && c.zoom_step >= 0.0) {
            return invalid("controls.zoom_step", "must be a non-negative number");
        }
        if !(c.min_scale.is_finite() && c.min_scale > 0.0) {
            return invalid("controls.min_scale", "must be positive");
        }
        if !(c.max_scale_factor.is_finite() && c.max_scale_factor > 0.0) {
            return invalid("controls.max_scale_factor", "must be positive");
        }
        if !(c.initial_scale_divisor.is_finite() && c.initial_scale_divisor > 0.0) {
            return invalid("controls.initial_scale_divisor", "must be positive");
        }
        let header = match self.sizing {
            CanvasSizing::SquareBelowHeader { header_px }
            | CanvasSizing::FullBelowHeader { header_px } => header_px,
        };
        if !(header.is_finite() && header >= 0.0) {
            return invalid("sizing.header_px", "must be a non-negative number");
        }
        if self.data.object.is_empty() {
            return invalid("data.object", "must name a topology object");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_object_is_default_config() {
        let cfg = ViewerConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, ViewerConfig::default());
        assert_eq!(cfg.data.object, "countries");
        assert_eq!(
            cfg.sizing,
            CanvasSizing::SquareBelowHeader { header_px: 56.0 }
        );
    }

    #[test]
    fn nested_overrides_keep_sibling_defaults() {
        let cfg = ViewerConfig::from_json_str(
            r##"{
                "data": {"object": "land"},
                "controls": {"hover_enabled": false},
                "style": {"hover_fill": "#ff0000"}
            }"##,
        )
        .unwrap();
        assert_eq!(cfg.data.object, "land");
        assert_eq!(cfg.data.url, scene::DEFAULT_WORLD_URL);
        assert!(!cfg.controls.hover_enabled);
        assert_eq!(cfg.controls.zoom_step, 60.0);
        assert_eq!(cfg.style.hover_fill, Color::rgb(255, 0, 0));
        assert_eq!(cfg.style.land.len(), 4);
    }

    #[test]
    fn rejects_bad_values() {
        let err = ViewerConfig::from_json_str(r#"{"controls": {"min_scale": 0}}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "controls.min_scale",
                ..
            }
        ));
        assert!(matches!(
            ViewerConfig::from_json_str(r#"{"style": {"hover_fill": "orange"}}"#),
            Err(ConfigError::Json(_))
        ));
    }
}
