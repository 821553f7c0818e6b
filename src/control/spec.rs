//! Named range presets for common audio controls, modeled after SuperCollider's ControlSpec.

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use super::range::Warp;

/// A named bundle of `min`/`max`/`step`/`warp`/`value` defaults, selected through the `spec`
/// configuration key. A zero step means continuous, leaving the quantization granularity to be
/// derived from the precision settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlSpec {
    pub min: f32,
    pub max: f32,
    #[serde(default = "linear")]
    pub warp: Warp,
    #[serde(default)]
    pub step: f32,
    /// The initial value. The `initial` spelling is accepted when deserializing for
    /// compatibility with CVSlider-style preset tables.
    #[serde(default, alias = "initial")]
    pub value: f32,
}

fn linear() -> Warp {
    Warp::Linear
}

impl ControlSpec {
    const fn new(min: f32, max: f32, warp: Warp, step: f32, value: f32) -> ControlSpec {
        ControlSpec {
            min,
            max,
            warp,
            step,
            value,
        }
    }

    /// Look up a preset by its spec name.
    pub fn named(name: &str) -> Option<ControlSpec> {
        SPECS.get(name).copied()
    }
}

lazy_static! {
    static ref SPECS: HashMap<&'static str, ControlSpec> = HashMap::from([
        ("unipolar", ControlSpec::new(0.0, 1.0, Warp::Linear, 0.0, 0.0)),
        ("bipolar", ControlSpec::new(-1.0, 1.0, Warp::Linear, 0.0, 0.0)),
        ("bool", ControlSpec::new(0.0, 1.0, Warp::Linear, 1.0, 0.0)),
        ("rotate", ControlSpec::new(-180.0, 180.0, Warp::Linear, 1.0, 0.0)),
        ("freq", ControlSpec::new(20.0, 20_000.0, Warp::Exponential, 0.0, 440.0)),
        ("lofreq", ControlSpec::new(0.1, 100.0, Warp::Exponential, 0.0, 6.0)),
        ("midfreq", ControlSpec::new(25.0, 4200.0, Warp::Exponential, 0.0, 440.0)),
        ("widefreq", ControlSpec::new(0.1, 20_000.0, Warp::Exponential, 0.0, 440.0)),
        ("phase", ControlSpec::new(0.0, 360.0, Warp::Linear, 0.0, 0.0)),
        ("rq", ControlSpec::new(0.001, 2.0, Warp::Exponential, 0.0, 0.707)),
        ("midi", ControlSpec::new(0.0, 127.0, Warp::Linear, 1.0, 64.0)),
        ("midinote", ControlSpec::new(0.0, 127.0, Warp::Linear, 1.0, 60.0)),
        ("midivelocity", ControlSpec::new(1.0, 127.0, Warp::Linear, 0.0, 64.0)),
        ("amp", ControlSpec::new(0.0, 1.0, Warp::QuadIn, 0.0, 0.0)),
        ("boostcut", ControlSpec::new(-20.0, 20.0, Warp::Linear, 0.0, 0.0)),
        ("pan", ControlSpec::new(-1.0, 1.0, Warp::Linear, 0.0, 0.0)),
        ("detune", ControlSpec::new(-20.0, 20.0, Warp::Linear, 0.0, 0.0)),
        ("rate", ControlSpec::new(0.125, 8.0, Warp::Exponential, 0.0, 1.0)),
        ("beats", ControlSpec::new(0.0, 20.0, Warp::Linear, 0.0, 0.0)),
        ("delay", ControlSpec::new(0.0001, 1.0, Warp::Exponential, 0.0, 0.3)),
        ("integer", ControlSpec::new(-1024.0, 1024.0, Warp::Linear, 1.0, 0.0)),
        ("float", ControlSpec::new(-1024.0, 1024.0, Warp::Linear, 0.0, 0.0)),
    ]);
}
