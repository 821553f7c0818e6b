//! Layered control configuration. Settings are merged in ascending priority: built-in
//! defaults, then a named preset, then host element attributes, then explicit caller options.
//! An unset field never overrides a lower layer.

use serde::{Deserialize, Serialize};

use crate::control::range::Warp;
use crate::control::spec::ControlSpec;
use crate::error::CtlError;
use crate::util;

/// Number of fractional digits used when neither `max_precision` nor a fractional step pins
/// it down.
pub(crate) const DEFAULT_PRECISION: usize = 3;

/// Slider orientation. This only affects the engine through number formatting: vertical
/// sliders pad with the fixed-width space glyph since their text can't rely on regular spaces
/// keeping their width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Horizontal,
    Vertical,
}

/// Options understood by [`Ctl::new()`][crate::control::Ctl::new()]. The serialized field
/// names are camelCased, matching the option objects hosts usually ship as JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CtlConfig {
    pub min: Option<f32>,
    pub max: Option<f32>,
    pub step: Option<f32>,
    pub value: Option<f32>,
    /// Warp key: `lin`, `exp`, `quadIn`, or `quadOut`. Kept as a string until construction so
    /// an unknown name surfaces as a configuration error instead of a deserialization error.
    pub warp: Option<String>,
    pub direction: Option<Direction>,
    /// Text displayed as the control's name.
    pub label: Option<String>,
    /// Extra style class communicated to the presentation layer.
    pub theme: Option<String>,
    /// CSS size of the container, passed through to the presentation layer verbatim.
    pub width: Option<String>,
    pub height: Option<String>,
    /// Width of the number display. Zero means auto-size from the range and precision.
    pub num_characters: Option<usize>,
    /// Maximum number of digits after the decimal point. Defaults to the decimals implied by
    /// `step`, or to [`DEFAULT_PRECISION`] for continuous controls.
    pub max_precision: Option<usize>,
    /// Name of a [`ControlSpec`] preset supplying range defaults.
    pub spec: Option<String>,
}

impl CtlConfig {
    /// The built-in defaults, the lowest-priority layer of the merge chain.
    pub fn defaults() -> CtlConfig {
        CtlConfig {
            min: Some(0.0),
            max: Some(1.0),
            step: Some(0.0),
            value: Some(0.0),
            warp: Some(String::from("lin")),
            direction: Some(Direction::Horizontal),
            label: Some(String::new()),
            theme: Some(String::from("electro")),
            width: None,
            height: None,
            num_characters: Some(0),
            max_precision: None,
            spec: None,
        }
    }

    /// Merge `other` over `self`. Fields set in `other` win, unset fields keep the values
    /// from `self`.
    pub fn merge(self, other: CtlConfig) -> CtlConfig {
        CtlConfig {
            min: other.min.or(self.min),
            max: other.max.or(self.max),
            step: other.step.or(self.step),
            value: other.value.or(self.value),
            warp: other.warp.or(self.warp),
            direction: other.direction.or(self.direction),
            label: other.label.or(self.label),
            theme: other.theme.or(self.theme),
            width: other.width.or(self.width),
            height: other.height.or(self.height),
            num_characters: other.num_characters.or(self.num_characters),
            max_precision: other.max_precision.or(self.max_precision),
            spec: other.spec.or(self.spec),
        }
    }

    /// Build a configuration from host element attributes, i.e. string key/value pairs like
    /// `min="20"` or `spec="freq"`. Numeric fields with unparseable values and unrecognized
    /// keys are skipped, since host markup routinely carries attributes meant for others.
    pub fn from_attributes<'a, I>(attributes: I) -> CtlConfig
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        fn numeric<T: std::str::FromStr>(key: &str, value: &str) -> Option<T> {
            match value.trim().parse() {
                Ok(number) => Some(number),
                Err(_) => {
                    ctl_warn!("Ignoring non-numeric {key} attribute {value:?}");
                    None
                }
            }
        }

        let mut config = CtlConfig::default();
        for (name, value) in attributes {
            match name.to_ascii_lowercase().as_str() {
                "min" => config.min = numeric("min", value),
                "max" => config.max = numeric("max", value),
                "step" => config.step = numeric("step", value),
                "value" => config.value = numeric("value", value),
                "warp" => config.warp = Some(value.to_owned()),
                "direction" => {
                    config.direction = match value {
                        "horizontal" => Some(Direction::Horizontal),
                        "vertical" => Some(Direction::Vertical),
                        _ => {
                            ctl_warn!("Ignoring unknown direction attribute {value:?}");
                            None
                        }
                    }
                }
                "label" => config.label = Some(value.to_owned()),
                "theme" => config.theme = Some(value.to_owned()),
                "width" => config.width = Some(value.to_owned()),
                "height" => config.height = Some(value.to_owned()),
                "numcharacters" => config.num_characters = numeric("numCharacters", value),
                "maxprecision" => config.max_precision = numeric("maxPrecision", value),
                "spec" => config.spec = Some(value.to_owned()),
                _ => (),
            }
        }

        config
    }

    /// Deserialize a configuration from JSON, the shape hosts usually ship option objects in.
    pub fn from_json(json: &str) -> Result<CtlConfig, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<ControlSpec> for CtlConfig {
    fn from(spec: ControlSpec) -> CtlConfig {
        CtlConfig {
            min: Some(spec.min),
            max: Some(spec.max),
            step: Some(spec.step),
            value: Some(spec.value),
            warp: Some(spec.warp.key().to_owned()),
            ..CtlConfig::default()
        }
    }
}

/// A fully merged, validated, and derived configuration, ready to initialize a control.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Resolved {
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub value: f32,
    pub warp: Warp,
    pub direction: Direction,
    pub label: String,
    pub theme: String,
    pub width: Option<String>,
    pub height: Option<String>,
    pub num_characters: usize,
    pub max_precision: usize,
}

/// Merge the layers, validate the result, and derive the dependent settings. Attribute and
/// option layers are passed separately because the `spec` key may come from either, with the
/// explicit options winning.
pub(crate) fn resolve(attributes: CtlConfig, options: CtlConfig) -> Result<Resolved, CtlError> {
    let spec_name = options.spec.clone().or_else(|| attributes.spec.clone());
    let preset = match &spec_name {
        Some(name) => match ControlSpec::named(name) {
            Some(spec) => Some(spec),
            None => return Err(CtlError::UnknownSpec(name.clone())),
        },
        None => None,
    };

    let mut merged = CtlConfig::defaults();
    if let Some(preset) = preset {
        merged = merged.merge(preset.into());
    }
    let merged = merged.merge(attributes).merge(options);

    let warp_key = merged.warp.unwrap_or_else(|| String::from("lin"));
    let warp = match Warp::from_key(&warp_key) {
        Some(warp) => warp,
        None => return Err(CtlError::UnknownWarp(warp_key)),
    };

    let mut min = merged.min.unwrap_or(0.0);
    let mut max = merged.max.unwrap_or(1.0);
    if !min.is_finite() || !max.is_finite() {
        return Err(CtlError::NotANumber {
            what: "range bounds",
        });
    }
    if min > max {
        std::mem::swap(&mut min, &mut max);
    }
    if warp == Warp::Exponential && min <= 0.0 {
        return Err(CtlError::ExponentialMinimum { min });
    }

    let configured_step = merged.step.unwrap_or(0.0).clamp(0.0, max - min);
    let max_precision = merged.max_precision.unwrap_or_else(|| {
        if configured_step > 0.0 {
            util::decimals_from_step_size(configured_step)
        } else {
            DEFAULT_PRECISION
        }
    });

    // TODO: Reject configurations whose explicit numCharacters can't fit the integer part of
    //       the widest bound (e.g. numCharacters = 3 with max = 1000)
    let num_characters = match merged.num_characters.unwrap_or(0) {
        0 => auto_num_characters(min, max, max_precision),
        configured => configured,
    };

    // Quantization can't work with a zero step, substitute the smallest step the precision
    // can still display
    let step = if configured_step > 0.0 {
        configured_step
    } else {
        util::step_for_precision(max_precision)
    };

    Ok(Resolved {
        min,
        max,
        step,
        value: merged.value.unwrap_or(0.0),
        warp,
        direction: merged.direction.unwrap_or(Direction::Horizontal),
        label: merged.label.unwrap_or_default(),
        theme: merged.theme.unwrap_or_default(),
        width: merged.width,
        height: merged.height,
        num_characters,
        max_precision,
    })
}

/// Number display width derived from the range: the integer width of the wider bound, plus
/// room for the decimal point and fractional digits, plus a sign column for ranges that allow
/// negative values.
fn auto_num_characters(min: f32, max: f32, max_precision: usize) -> usize {
    let widest = min.abs().max(max.abs());
    let mut num_characters = format!("{widest:.0}").len().max(2);
    if max_precision > 0 {
        num_characters += 1 + max_precision;
    }
    if min < 0.0 {
        num_characters += 1;
    }

    num_characters
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_a_unipolar_control() {
        let resolved = resolve(CtlConfig::default(), CtlConfig::default()).unwrap();
        assert_eq!(resolved.min, 0.0);
        assert_eq!(resolved.max, 1.0);
        assert_eq!(resolved.value, 0.0);
        assert_eq!(resolved.warp, Warp::Linear);
        assert_eq!(resolved.direction, Direction::Horizontal);
        assert_eq!(resolved.theme, "electro");
        assert_eq!(resolved.max_precision, 3);
        // The zero default step becomes the smallest displayable one
        assert_eq!(resolved.step, 0.001);
        // Two integer columns, a decimal point, and three decimals
        assert_eq!(resolved.num_characters, 6);
    }

    #[test]
    fn presets_fill_in_the_range() {
        let options = CtlConfig {
            spec: Some(String::from("freq")),
            ..CtlConfig::default()
        };
        let resolved = resolve(CtlConfig::default(), options).unwrap();
        assert_eq!(resolved.min, 20.0);
        assert_eq!(resolved.max, 20_000.0);
        assert_eq!(resolved.warp, Warp::Exponential);
        assert_eq!(resolved.value, 440.0);
    }

    #[test]
    fn explicit_options_win_over_attributes_and_presets() {
        let attributes =
            CtlConfig::from_attributes([("spec", "freq"), ("value", "1000"), ("label", "Freq")]);
        let options = CtlConfig {
            value: Some(880.0),
            ..CtlConfig::default()
        };
        let resolved = resolve(attributes, options).unwrap();
        assert_eq!(resolved.min, 20.0);
        assert_eq!(resolved.value, 880.0);
        assert_eq!(resolved.label, "Freq");
    }

    #[test]
    fn attributes_win_over_presets() {
        let attributes = CtlConfig::from_attributes([("spec", "freq"), ("min", "100")]);
        let resolved = resolve(attributes, CtlConfig::default()).unwrap();
        assert_eq!(resolved.min, 100.0);
        assert_eq!(resolved.max, 20_000.0);
    }

    #[test]
    fn attribute_parsing_skips_junk() {
        let config = CtlConfig::from_attributes([
            ("min", "-10"),
            ("max", "10"),
            ("step", "0.5"),
            ("direction", "vertical"),
            ("numcharacters", "5"),
            ("value", "banana"),
            ("data-role", "slider"),
        ]);
        assert_eq!(config.min, Some(-10.0));
        assert_eq!(config.max, Some(10.0));
        assert_eq!(config.step, Some(0.5));
        assert_eq!(config.direction, Some(Direction::Vertical));
        assert_eq!(config.num_characters, Some(5));
        assert_eq!(config.value, None);
    }

    #[test]
    fn configurations_deserialize_from_json() {
        let config =
            CtlConfig::from_json(r#"{ "min": -10, "max": 10, "numCharacters": 5, "warp": "lin" }"#)
                .unwrap();
        assert_eq!(config.min, Some(-10.0));
        assert_eq!(config.num_characters, Some(5));
        assert_eq!(config.warp.as_deref(), Some("lin"));
    }

    #[test]
    fn inverted_bounds_are_swapped() {
        let options = CtlConfig {
            min: Some(10.0),
            max: Some(-10.0),
            ..CtlConfig::default()
        };
        let resolved = resolve(CtlConfig::default(), options).unwrap();
        assert_eq!(resolved.min, -10.0);
        assert_eq!(resolved.max, 10.0);
    }

    #[test]
    fn unknown_warps_are_rejected() {
        let options = CtlConfig {
            warp: Some(String::from("cubic")),
            ..CtlConfig::default()
        };
        assert_eq!(
            resolve(CtlConfig::default(), options),
            Err(CtlError::UnknownWarp(String::from("cubic")))
        );
    }

    #[test]
    fn unknown_specs_are_rejected() {
        let options = CtlConfig {
            spec: Some(String::from("nope")),
            ..CtlConfig::default()
        };
        assert_eq!(
            resolve(CtlConfig::default(), options),
            Err(CtlError::UnknownSpec(String::from("nope")))
        );
    }

    #[test]
    fn exponential_warps_need_a_positive_minimum() {
        let options = CtlConfig {
            min: Some(0.0),
            max: Some(100.0),
            warp: Some(String::from("exp")),
            ..CtlConfig::default()
        };
        assert_eq!(
            resolve(CtlConfig::default(), options),
            Err(CtlError::ExponentialMinimum { min: 0.0 })
        );
    }

    #[test]
    fn precision_follows_the_step() {
        let options = CtlConfig {
            min: Some(0.0),
            max: Some(10.0),
            step: Some(0.25),
            ..CtlConfig::default()
        };
        let resolved = resolve(CtlConfig::default(), options).unwrap();
        assert_eq!(resolved.max_precision, 2);
        assert_eq!(resolved.step, 0.25);
    }

    #[test]
    fn auto_width_reserves_sign_and_decimals() {
        // Two integer digits + point + one decimal + sign
        assert_eq!(auto_num_characters(-10.0, 10.0, 1), 5);
        // No decimals and no sign for a 0..=127 integer control
        assert_eq!(auto_num_characters(0.0, 127.0, 0), 3);
    }
}
