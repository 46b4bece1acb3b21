use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Pixels per degree for Celsius bars.
pub const CELSIUS_COEFFICIENT: f64 = 14.6;

/// Pixels per degree for Fahrenheit bars.
pub const FAHRENHEIT_COEFFICIENT: f64 = 5.0;

/// Pixels per humidity percent. Independent of the temperature scale.
pub const HUMIDITY_COEFFICIENT: f64 = 5.0;

/// Temperature scale the widget displays values in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureScale {
    Celsius,
    #[default]
    Fahrenheit,
}

impl TemperatureScale {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureScale::Celsius => "celsius",
            TemperatureScale::Fahrenheit => "fahrenheit",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureScale::Celsius => "C",
            TemperatureScale::Fahrenheit => "F",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            TemperatureScale::Celsius => TemperatureScale::Fahrenheit,
            TemperatureScale::Fahrenheit => TemperatureScale::Celsius,
        }
    }

    pub const fn all() -> &'static [TemperatureScale] {
        &[TemperatureScale::Celsius, TemperatureScale::Fahrenheit]
    }

    /// Bar coefficient for this scale, in pixels per degree.
    pub fn coefficient(&self) -> DisplayCoefficient {
        match self {
            TemperatureScale::Celsius => DisplayCoefficient(CELSIUS_COEFFICIENT),
            TemperatureScale::Fahrenheit => DisplayCoefficient(FAHRENHEIT_COEFFICIENT),
        }
    }
}

impl fmt::Display for TemperatureScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemperatureScale {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "celsius" | "c" => Ok(TemperatureScale::Celsius),
            "fahrenheit" | "f" => Ok(TemperatureScale::Fahrenheit),
            _ => Err(anyhow::anyhow!(
                "Unknown temperature scale '{value}'. Supported scales: celsius, fahrenheit."
            )),
        }
    }
}

/// Pixels per degree used to size a bar.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct DisplayCoefficient(pub f64);

impl DisplayCoefficient {
    /// Bar extent in pixels for `value` degrees (or percent).
    pub fn extent(&self, value: i32) -> f64 {
        f64::from(value) * self.0
    }
}

/// A temperature expressed in the selected scale, together with the
/// coefficient its bar must be drawn with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Converted {
    pub value: i32,
    pub coefficient: DisplayCoefficient,
}

impl Converted {
    pub fn bar_extent(&self) -> f64 {
        self.coefficient.extent(self.value)
    }
}

/// Convert a Celsius temperature into `scale`.
///
/// Fahrenheit values are `floor(c * 1.8 + 32)`, computed in integers so
/// that exact multiples never land one degree low. Results beyond the
/// `i32` range saturate.
pub fn convert(scale: TemperatureScale, celsius: i32) -> Converted {
    let value = match scale {
        TemperatureScale::Celsius => celsius,
        TemperatureScale::Fahrenheit => fahrenheit(celsius),
    };

    Converted {
        value,
        coefficient: scale.coefficient(),
    }
}

fn fahrenheit(celsius: i32) -> i32 {
    let f = (i64::from(celsius) * 9).div_euclid(5) + 32;
    f.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
