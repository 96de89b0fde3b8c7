//! Navigation UI styling (header colors, text sizes, theme colors).
//!
//! The options are rebuilt from scratch on every set; a key that is not
//! present stays at the native default instead of keeping an earlier value.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::Argb;
use crate::error::BridgeResult;
use crate::options::{self, ConfigValueError, OptionMap};
use crate::overlay::color;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylingOptions {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub primary_day_mode_theme_color: Option<Argb>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub secondary_day_mode_theme_color: Option<Argb>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub primary_night_mode_theme_color: Option<Argb>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub secondary_night_mode_theme_color: Option<Argb>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub header_large_maneuver_icon_color: Option<Argb>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub header_small_maneuver_icon_color: Option<Argb>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub header_next_step_text_color: Option<Argb>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub header_distance_value_text_color: Option<Argb>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub header_distance_units_text_color: Option<Argb>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub header_instructions_text_color: Option<Argb>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub header_guidance_recommended_lane_color: Option<Argb>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub header_next_step_text_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub header_distance_value_text_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub header_distance_units_text_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub header_instructions_first_row_text_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub header_instructions_second_row_text_size: Option<f32>,
}

impl StylingOptions {
    pub fn from_options(map: &OptionMap) -> BridgeResult<Self> {
        Ok(Self {
            primary_day_mode_theme_color: color("primaryDayModeThemeColor", map)?,
            secondary_day_mode_theme_color: color("secondaryDayModeThemeColor", map)?,
            primary_night_mode_theme_color: color("primaryNightModeThemeColor", map)?,
            secondary_night_mode_theme_color: color("secondaryNightModeThemeColor", map)?,
            header_large_maneuver_icon_color: color("headerLargeManeuverIconColor", map)?,
            header_small_maneuver_icon_color: color("headerSmallManeuverIconColor", map)?,
            header_next_step_text_color: color("headerNextStepTextColor", map)?,
            header_distance_value_text_color: color("headerDistanceValueTextColor", map)?,
            header_distance_units_text_color: color("headerDistanceUnitsTextColor", map)?,
            header_instructions_text_color: color("headerInstructionsTextColor", map)?,
            header_guidance_recommended_lane_color: color("headerGuidanceRecommendedLaneColor", map)?,
            header_next_step_text_size: text_size("headerNextStepTextSize", map)?,
            header_distance_value_text_size: text_size("headerDistanceValueTextSize", map)?,
            header_distance_units_text_size: text_size("headerDistanceUnitsTextSize", map)?,
            header_instructions_first_row_text_size: text_size("headerInstructionsFirstRowTextSize", map)?,
            header_instructions_second_row_text_size: text_size("headerInstructionsSecondRowTextSize", map)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn text_size(key: &str, map: &OptionMap) -> BridgeResult<Option<f32>> {
    match options::get_string(key, map)? {
        None => Ok(None),
        Some(raw) => match raw.trim().parse::<f32>() {
            Ok(size) if size.is_finite() && size >= 0.0 => Ok(Some(size)),
            _ => Err(ConfigValueError::new(key, "a numeric text size", &Value::String(raw)).into()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;
    use serde_json::json;

    fn map(value: Value) -> OptionMap {
        match value {
            Value::Object(m) => m,
            _ => panic!("test fixture must be an object"),
        }
    }

    #[test]
    fn test_each_key_is_optional() {
        let styling = StylingOptions::from_options(&map(json!({
            "headerInstructionsTextColor": "#FFFFFF",
            "headerInstructionsSecondRowTextSize": "18"
        })))
        .unwrap();
        assert_eq!(styling.header_instructions_text_color, Some(Argb(0xFFFFFFFF)));
        assert_eq!(styling.header_instructions_second_row_text_size, Some(18.0));
        assert_eq!(styling.primary_day_mode_theme_color, None);
        assert_eq!(styling.header_next_step_text_size, None);
    }

    #[test]
    fn test_sizes_accept_numbers() {
        let styling = StylingOptions::from_options(&map(json!({ "headerNextStepTextSize": 22.5 }))).unwrap();
        assert_eq!(styling.header_next_step_text_size, Some(22.5));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = StylingOptions::from_options(&map(json!({ "primaryDayModeThemeColor": "blue" }))).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::InvalidColor {
                field: "primaryDayModeThemeColor",
                ..
            }
        ));

        let err = StylingOptions::from_options(&map(json!({ "headerDistanceUnitsTextSize": "big" }))).unwrap_err();
        assert!(matches!(err, BridgeError::Config(_)));
    }

    #[test]
    fn test_empty_map_is_empty() {
        assert!(StylingOptions::from_options(&OptionMap::new()).unwrap().is_empty());
    }
}
