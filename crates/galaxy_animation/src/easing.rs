//! Easing functions for tweens
//!
//! These are Robert Penner's easing equations in their classic algebraic
//! form. Timing of the jitter motion depends on the exact curves, so the
//! formulas are kept term for term rather than simplified.

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Overshoot constant for the back/swing family
const BACK_OVERSHOOT: f32 = 1.70158;

/// Overshoot scale applied by the in-out back variants
const BACK_IN_OUT_SCALE: f32 = 1.525;

/// Easing function type
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Easing {
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInQuint,
    EaseOutQuint,
    EaseInOutQuint,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    EaseInExpo,
    EaseOutExpo,
    EaseInOutExpo,
    EaseInCirc,
    EaseOutCirc,
    EaseInOutCirc,
    EaseInBack,
    EaseOutBack,
    EaseInOutBack,
    /// Damped oscillation around 1.0. Starts at 1.0 rather than 0.0.
    Elastic,
    #[default]
    EaseOutBounce,
    SwingFrom,
    SwingTo,
    SwingFromTo,
    EaseFrom,
    EaseTo,
    EaseFromTo,
}

impl Easing {
    /// Every registered easing, in registry order
    pub const ALL: [Easing; 33] = [
        Easing::Linear,
        Easing::EaseInQuad,
        Easing::EaseOutQuad,
        Easing::EaseInOutQuad,
        Easing::EaseInCubic,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
        Easing::EaseInQuart,
        Easing::EaseOutQuart,
        Easing::EaseInOutQuart,
        Easing::EaseInQuint,
        Easing::EaseOutQuint,
        Easing::EaseInOutQuint,
        Easing::EaseInSine,
        Easing::EaseOutSine,
        Easing::EaseInOutSine,
        Easing::EaseInExpo,
        Easing::EaseOutExpo,
        Easing::EaseInOutExpo,
        Easing::EaseInCirc,
        Easing::EaseOutCirc,
        Easing::EaseInOutCirc,
        Easing::EaseInBack,
        Easing::EaseOutBack,
        Easing::EaseInOutBack,
        Easing::Elastic,
        Easing::EaseOutBounce,
        Easing::SwingFrom,
        Easing::SwingTo,
        Easing::SwingFromTo,
        Easing::EaseFrom,
        Easing::EaseTo,
        Easing::EaseFromTo,
    ];

    /// Look up an easing by its registry name (e.g. `"easeInOutCirc"`)
    pub fn from_name(name: &str) -> Option<Easing> {
        let easing = match name {
            "linear" => Easing::Linear,
            "easeInQuad" => Easing::EaseInQuad,
            "easeOutQuad" => Easing::EaseOutQuad,
            "easeInOutQuad" => Easing::EaseInOutQuad,
            "easeInCubic" => Easing::EaseInCubic,
            "easeOutCubic" => Easing::EaseOutCubic,
            "easeInOutCubic" => Easing::EaseInOutCubic,
            "easeInQuart" => Easing::EaseInQuart,
            "easeOutQuart" => Easing::EaseOutQuart,
            "easeInOutQuart" => Easing::EaseInOutQuart,
            "easeInQuint" => Easing::EaseInQuint,
            "easeOutQuint" => Easing::EaseOutQuint,
            "easeInOutQuint" => Easing::EaseInOutQuint,
            "easeInSine" => Easing::EaseInSine,
            "easeOutSine" => Easing::EaseOutSine,
            "easeInOutSine" => Easing::EaseInOutSine,
            "easeInExpo" => Easing::EaseInExpo,
            "easeOutExpo" => Easing::EaseOutExpo,
            "easeInOutExpo" => Easing::EaseInOutExpo,
            "easeInCirc" => Easing::EaseInCirc,
            "easeOutCirc" => Easing::EaseOutCirc,
            "easeInOutCirc" => Easing::EaseInOutCirc,
            "easeInBack" => Easing::EaseInBack,
            "easeOutBack" => Easing::EaseOutBack,
            "easeInOutBack" => Easing::EaseInOutBack,
            "elastic" => Easing::Elastic,
            "easeOutBounce" => Easing::EaseOutBounce,
            "swingFrom" => Easing::SwingFrom,
            "swingTo" => Easing::SwingTo,
            "swingFromTo" => Easing::SwingFromTo,
            "easeFrom" => Easing::EaseFrom,
            "easeTo" => Easing::EaseTo,
            "easeFromTo" => Easing::EaseFromTo,
            _ => return None,
        };
        Some(easing)
    }

    /// Look up an easing by name, using `fallback` for unknown names
    pub fn resolve(name: &str, fallback: Easing) -> Easing {
        Self::from_name(name).unwrap_or(fallback)
    }

    /// Registry name of this easing
    pub fn name(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseInQuad => "easeInQuad",
            Easing::EaseOutQuad => "easeOutQuad",
            Easing::EaseInOutQuad => "easeInOutQuad",
            Easing::EaseInCubic => "easeInCubic",
            Easing::EaseOutCubic => "easeOutCubic",
            Easing::EaseInOutCubic => "easeInOutCubic",
            Easing::EaseInQuart => "easeInQuart",
            Easing::EaseOutQuart => "easeOutQuart",
            Easing::EaseInOutQuart => "easeInOutQuart",
            Easing::EaseInQuint => "easeInQuint",
            Easing::EaseOutQuint => "easeOutQuint",
            Easing::EaseInOutQuint => "easeInOutQuint",
            Easing::EaseInSine => "easeInSine",
            Easing::EaseOutSine => "easeOutSine",
            Easing::EaseInOutSine => "easeInOutSine",
            Easing::EaseInExpo => "easeInExpo",
            Easing::EaseOutExpo => "easeOutExpo",
            Easing::EaseInOutExpo => "easeInOutExpo",
            Easing::EaseInCirc => "easeInCirc",
            Easing::EaseOutCirc => "easeOutCirc",
            Easing::EaseInOutCirc => "easeInOutCirc",
            Easing::EaseInBack => "easeInBack",
            Easing::EaseOutBack => "easeOutBack",
            Easing::EaseInOutBack => "easeInOutBack",
            Easing::Elastic => "elastic",
            Easing::EaseOutBounce => "easeOutBounce",
            Easing::SwingFrom => "swingFrom",
            Easing::SwingTo => "swingTo",
            Easing::SwingFromTo => "swingFromTo",
            Easing::EaseFrom => "easeFrom",
            Easing::EaseTo => "easeTo",
            Easing::EaseFromTo => "easeFromTo",
        }
    }

    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseInQuad => t.powi(2),
            Easing::EaseOutQuad => -((t - 1.0).powi(2) - 1.0),
            Easing::EaseInOutQuad => {
                let t = t / 0.5;
                if t < 1.0 {
                    0.5 * t.powi(2)
                } else {
                    let t = t - 2.0;
                    -0.5 * (t * t - 2.0)
                }
            }
            Easing::EaseInCubic => t.powi(3),
            Easing::EaseOutCubic => (t - 1.0).powi(3) + 1.0,
            Easing::EaseInOutCubic => {
                let t = t / 0.5;
                if t < 1.0 {
                    0.5 * t.powi(3)
                } else {
                    0.5 * ((t - 2.0).powi(3) + 2.0)
                }
            }
            Easing::EaseInQuart | Easing::EaseFrom => t.powi(4),
            Easing::EaseOutQuart => -((t - 1.0).powi(4) - 1.0),
            Easing::EaseInOutQuart | Easing::EaseFromTo => {
                let t = t / 0.5;
                if t < 1.0 {
                    0.5 * t.powi(4)
                } else {
                    let t = t - 2.0;
                    -0.5 * (t * t.powi(3) - 2.0)
                }
            }
            Easing::EaseInQuint => t.powi(5),
            Easing::EaseOutQuint => (t - 1.0).powi(5) + 1.0,
            Easing::EaseInOutQuint => {
                let t = t / 0.5;
                if t < 1.0 {
                    0.5 * t.powi(5)
                } else {
                    0.5 * ((t - 2.0).powi(5) + 2.0)
                }
            }
            Easing::EaseInSine => -(t * (PI / 2.0)).cos() + 1.0,
            Easing::EaseOutSine => (t * (PI / 2.0)).sin(),
            Easing::EaseInOutSine => -0.5 * ((PI * t).cos() - 1.0),
            Easing::EaseInExpo => {
                if t == 0.0 {
                    0.0
                } else {
                    2f32.powf(10.0 * (t - 1.0))
                }
            }
            Easing::EaseOutExpo => {
                if t == 1.0 {
                    1.0
                } else {
                    -(2f32.powf(-10.0 * t)) + 1.0
                }
            }
            Easing::EaseInOutExpo => {
                if t == 0.0 {
                    return 0.0;
                }
                if t == 1.0 {
                    return 1.0;
                }
                let t = t / 0.5;
                if t < 1.0 {
                    0.5 * 2f32.powf(10.0 * (t - 1.0))
                } else {
                    0.5 * (-(2f32.powf(-10.0 * (t - 1.0))) + 2.0)
                }
            }
            Easing::EaseInCirc => -((1.0 - t * t).sqrt() - 1.0),
            Easing::EaseOutCirc => (1.0 - (t - 1.0).powi(2)).sqrt(),
            Easing::EaseInOutCirc => {
                let t = t / 0.5;
                if t < 1.0 {
                    -0.5 * ((1.0 - t * t).sqrt() - 1.0)
                } else {
                    let t = t - 2.0;
                    0.5 * ((1.0 - t * t).sqrt() + 1.0)
                }
            }
            Easing::EaseInBack | Easing::SwingFrom => {
                let s = BACK_OVERSHOOT;
                t * t * ((s + 1.0) * t - s)
            }
            Easing::EaseOutBack | Easing::SwingTo => {
                let s = BACK_OVERSHOOT;
                let t = t - 1.0;
                t * t * ((s + 1.0) * t + s) + 1.0
            }
            Easing::EaseInOutBack | Easing::SwingFromTo => {
                let s = BACK_OVERSHOOT * BACK_IN_OUT_SCALE;
                let t = t / 0.5;
                if t < 1.0 {
                    0.5 * (t * t * ((s + 1.0) * t - s))
                } else {
                    let t = t - 2.0;
                    0.5 * (t * t * ((s + 1.0) * t + s) + 2.0)
                }
            }
            Easing::Elastic => {
                -1.0 * 4f32.powf(-8.0 * t) * ((t * 6.0 - 1.0) * (2.0 * PI) / 2.0).sin() + 1.0
            }
            Easing::EaseOutBounce => bounce_out(t),
            Easing::EaseTo => t.powf(0.25),
        }
    }
}

fn bounce_out(t: f32) -> f32 {
    if t < 1.0 / 2.75 {
        7.5625 * t * t
    } else if t < 2.0 / 2.75 {
        let t = t - 1.5 / 2.75;
        7.5625 * t * t + 0.75
    } else if t < 2.5 / 2.75 {
        let t = t - 2.25 / 2.75;
        7.5625 * t * t + 0.9375
    } else {
        let t = t - 2.625 / 2.75;
        7.5625 * t * t + 0.984375
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unregistered easing name
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownEasing(pub String);

impl fmt::Display for UnknownEasing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown easing function: {}", self.0)
    }
}

impl std::error::Error for UnknownEasing {}

impl FromStr for Easing {
    type Err = UnknownEasing;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Easing::from_name(s).ok_or_else(|| UnknownEasing(s.to_string()))
    }
}
