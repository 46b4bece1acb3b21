//! Bar layout in surface pixels.
//!
//! Coordinates follow canvas conventions: origin top-left, `y` grows
//! downwards, bars stand on the bottom edge. Every temperature bar is sized
//! with the coefficient returned by its own conversion.

use crate::{
    clock::ClockLabels,
    display::{DisplayModel, Status},
    model::Metric,
    scale::{DisplayCoefficient, HUMIDITY_COEFFICIENT},
};

/// Shown wherever a value is not known yet.
pub const PLACEHOLDER: &str = "--";

pub const BAR_WIDTH: f64 = 150.0;
pub const BAR_PADDING_X: f64 = 20.0;
pub const TEXT_PADDING_X: f64 = 50.0;
pub const TEXT_PADDING_Y: f64 = 25.0;
pub const NAME_PADDING: f64 = 10.0;
pub const HUMIDITY_X: f64 = BAR_PADDING_X * 20.0;

const VALUE_MAX_WIDTH: f64 = 50.0;
const NAME_MAX_WIDTH: f64 = 120.0;
const HEADER_X: f64 = 5.0;
const HEADER_MAX_WIDTH: f64 = 220.0;

/// Fixed-size drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarKind {
    High,
    Current,
    Low,
    Humidity,
}

impl BarKind {
    pub fn name(&self) -> &'static str {
        match self {
            BarKind::High => "HIGH",
            BarKind::Current => "TEMPERATURE",
            BarKind::Low => "LOW",
            BarKind::Humidity => "HUMIDITY",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub max_width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub kind: BarKind,
    pub rect: Rect,
    pub coefficient: DisplayCoefficient,
    pub value: Label,
    pub name: Label,
}

/// Everything one repaint draws.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub surface: Surface,
    pub bars: Vec<Bar>,
    pub header: Vec<Label>,
    pub status: Option<Label>,
}

impl Scene {
    pub fn compose(model: &DisplayModel, clock: &ClockLabels, surface: Surface) -> Self {
        Self {
            surface,
            bars: bars(model, surface),
            header: header(model, clock),
            status: status_label(model, surface),
        }
    }

    pub fn bar(&self, kind: BarKind) -> Option<&Bar> {
        self.bars.iter().find(|b| b.kind == kind)
    }
}

/// Horizontal slot, bar width and label x positions for each bar.
struct Slot {
    x: f64,
    width: f64,
    value_x: f64,
    name_x: f64,
}

fn slot(kind: BarKind) -> Slot {
    match kind {
        BarKind::High => Slot {
            x: BAR_PADDING_X,
            width: BAR_WIDTH / 2.0,
            value_x: BAR_PADDING_X + TEXT_PADDING_X / 4.0,
            name_x: BAR_PADDING_X + TEXT_PADDING_X / 4.0,
        },
        BarKind::Current => Slot {
            x: BAR_WIDTH / 2.0 + BAR_PADDING_X,
            width: BAR_WIDTH,
            value_x: BAR_WIDTH / 2.0 + BAR_PADDING_X + TEXT_PADDING_X,
            name_x: BAR_WIDTH / 2.0 + TEXT_PADDING_X / 1.5,
        },
        BarKind::Low => Slot {
            x: BAR_WIDTH + BAR_PADDING_X + BAR_WIDTH / 2.0,
            width: BAR_WIDTH / 2.0,
            value_x: TEXT_PADDING_X * 2.2 + BAR_WIDTH,
            name_x: TEXT_PADDING_X * 2.2 + BAR_WIDTH,
        },
        BarKind::Humidity => Slot {
            x: HUMIDITY_X,
            width: BAR_WIDTH,
            value_x: HUMIDITY_X + TEXT_PADDING_X,
            name_x: BAR_PADDING_X * 18.3 + TEXT_PADDING_X,
        },
    }
}

/// Lay out the four bars. With no reading every bar is empty and every
/// value reads as the placeholder.
pub fn bars(model: &DisplayModel, surface: Surface) -> Vec<Bar> {
    let temperatures = [
        (BarKind::High, Metric::High),
        (BarKind::Current, Metric::Current),
        (BarKind::Low, Metric::Low),
    ];

    let mut out: Vec<Bar> = temperatures
        .into_iter()
        .map(|(kind, metric)| match model.temperature(metric) {
            Some(t) => bar(kind, surface, t.bar_extent(), t.coefficient, format!("{}°", t.value)),
            None => bar(kind, surface, 0.0, model.scale().coefficient(), PLACEHOLDER.into()),
        })
        .collect();

    let humidity = DisplayCoefficient(HUMIDITY_COEFFICIENT);
    out.push(match model.humidity() {
        Some(h) => bar(
            BarKind::Humidity,
            surface,
            humidity.extent(i32::from(h)),
            humidity,
            format!("{h}%"),
        ),
        None => bar(BarKind::Humidity, surface, 0.0, humidity, PLACEHOLDER.into()),
    });

    out
}

fn bar(
    kind: BarKind,
    surface: Surface,
    extent: f64,
    coefficient: DisplayCoefficient,
    value: String,
) -> Bar {
    let slot = slot(kind);
    let height = extent.clamp(0.0, surface.height);
    let top = surface.height - height;

    Bar {
        kind,
        rect: Rect {
            x: slot.x,
            y: top,
            width: slot.width,
            height,
        },
        coefficient,
        value: Label {
            text: value,
            x: slot.value_x,
            y: (top + TEXT_PADDING_Y).min(surface.height - NAME_PADDING - TEXT_PADDING_Y),
            max_width: VALUE_MAX_WIDTH,
        },
        name: Label {
            text: kind.name().to_string(),
            x: slot.name_x,
            y: surface.height - NAME_PADDING,
            max_width: NAME_MAX_WIDTH,
        },
    }
}

/// City name, date, both clocks and the zone, stacked top-left.
pub fn header(model: &DisplayModel, clock: &ClockLabels) -> Vec<Label> {
    let city = model
        .title()
        .map(str::to_uppercase)
        .unwrap_or_else(|| PLACEHOLDER.to_string());

    [
        (city, 25.0),
        (format!("Date: {}", clock.date), 45.0),
        (format!("City Time: {}", clock.city_time), 65.0),
        (format!("Local Time: {}", clock.local_time), 85.0),
        (clock.zone_label.clone(), 105.0),
    ]
    .into_iter()
    .map(|(text, y)| Label {
        text,
        x: HEADER_X,
        y,
        max_width: HEADER_MAX_WIDTH,
    })
    .collect()
}

/// Top-right indicator while loading or after a failed fetch.
fn status_label(model: &DisplayModel, surface: Surface) -> Option<Label> {
    let text = match model.status() {
        Status::Idle | Status::Ready => return None,
        Status::Loading => "Loading...".to_string(),
        Status::Failed(msg) => format!("! {msg}"),
    };

    Some(Label {
        text,
        x: surface.width / 2.0,
        y: 25.0,
        max_width: surface.width / 2.0 - HEADER_X,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::Daylight,
        error::WeatherError,
        model::{CityZone, Observation, Reading},
        scale::TemperatureScale,
    };

    fn clock() -> ClockLabels {
        ClockLabels {
            date: "1-2-2024".into(),
            local_time: "10:00:00".into(),
            city_time: "19:00:00".into(),
            zone_label: "UTC+09:00".into(),
            daylight: Daylight::Day,
        }
    }

    fn model_with(scale: TemperatureScale, reading: Reading) -> DisplayModel {
        let mut model = DisplayModel::new(scale);
        let ticket = model.begin_request("tokyo");
        model.apply(
            ticket,
            Ok(Observation {
                location_name: "Tokyo".into(),
                reading,
                zone: CityZone::from_offset_secs(32400),
            }),
        );
        model
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn absent_reading_renders_placeholders() {
        let model = DisplayModel::default();
        let scene = Scene::compose(&model, &clock(), Surface::default());

        assert_eq!(scene.bars.len(), 4);
        for bar in &scene.bars {
            assert_eq!(bar.value.text, PLACEHOLDER);
            assert!(approx(bar.rect.height, 0.0));
            assert!(!bar.value.text.contains("NaN"));
        }
        assert_eq!(scene.header[0].text, PLACEHOLDER);
        assert!(scene.status.is_none());
    }

    #[test]
    fn each_bar_uses_its_own_conversion() {
        let reading = Reading { current: 20, max: 25, min: 10, humidity_pct: 50 };
        let model = model_with(TemperatureScale::Celsius, reading);
        let scene = Scene::compose(&model, &clock(), Surface::default());

        let high = scene.bar(BarKind::High).unwrap();
        assert_eq!(high.value.text, "25°");
        assert!(approx(high.rect.height, 25.0 * 14.6));
        assert!(approx(high.rect.y, 600.0 - 25.0 * 14.6));

        let low = scene.bar(BarKind::Low).unwrap();
        assert!(approx(low.rect.height, 146.0));
        assert_eq!(low.coefficient, DisplayCoefficient(14.6));

        let humidity = scene.bar(BarKind::Humidity).unwrap();
        assert_eq!(humidity.value.text, "50%");
        assert!(approx(humidity.rect.height, 250.0));
    }

    #[test]
    fn fahrenheit_bars() {
        let reading = Reading { current: 20, max: 25, min: 10, humidity_pct: 50 };
        let model = model_with(TemperatureScale::Fahrenheit, reading);
        let bars = bars(&model, Surface::default());

        let current = &bars[1];
        assert_eq!(current.kind, BarKind::Current);
        assert_eq!(current.value.text, "68°");
        assert!(approx(current.rect.height, 340.0));
        assert_eq!(current.coefficient, DisplayCoefficient(5.0));
    }

    #[test]
    fn horizontal_slots() {
        let bars = bars(&DisplayModel::default(), Surface::default());
        let xs: Vec<(f64, f64)> = bars.iter().map(|b| (b.rect.x, b.rect.width)).collect();
        assert_eq!(xs, vec![(20.0, 75.0), (95.0, 150.0), (245.0, 75.0), (400.0, 150.0)]);

        let names: Vec<&str> = bars.iter().map(|b| b.name.text.as_str()).collect();
        assert_eq!(names, vec!["HIGH", "TEMPERATURE", "LOW", "HUMIDITY"]);
        assert!(bars.iter().all(|b| approx(b.name.y, 590.0)));
    }

    #[test]
    fn humidity_bounds_do_not_clip() {
        for (h, expected) in [(0u8, 0.0), (100u8, 500.0)] {
            let reading = Reading { current: 0, max: 0, min: 0, humidity_pct: h };
            let model = model_with(TemperatureScale::Celsius, reading);
            let bar = bars(&model, Surface::default()).pop().unwrap();

            assert!(approx(bar.rect.height, expected));
            assert!(bar.rect.y >= 0.0);
            assert!(bar.rect.y + bar.rect.height <= 600.0);
        }
    }

    #[test]
    fn negative_and_huge_temperatures_are_clamped() {
        let reading = Reading { current: -12, max: 60, min: -30, humidity_pct: 10 };
        let model = model_with(TemperatureScale::Celsius, reading);
        let scene = Scene::compose(&model, &clock(), Surface::default());

        let current = scene.bar(BarKind::Current).unwrap();
        assert!(approx(current.rect.height, 0.0));
        assert_eq!(current.value.text, "-12°");

        let high = scene.bar(BarKind::High).unwrap();
        assert!(approx(high.rect.height, 600.0));
        assert!(approx(high.rect.y, 0.0));

        for bar in &scene.bars {
            assert!(bar.value.y <= 600.0 - NAME_PADDING - TEXT_PADDING_Y);
        }
    }

    #[test]
    fn header_and_status() {
        let reading = Reading { current: 1, max: 2, min: 0, humidity_pct: 3 };
        let mut model = model_with(TemperatureScale::Celsius, reading);

        let scene = Scene::compose(&model, &clock(), Surface::default());
        let texts: Vec<&str> = scene.header.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["TOKYO", "Date: 1-2-2024", "City Time: 19:00:00", "Local Time: 10:00:00", "UTC+09:00"]
        );
        assert!(scene.status.is_none());

        let ticket = model.begin_request("nowhere");
        let loading = Scene::compose(&model, &clock(), Surface::default());
        assert_eq!(loading.status.as_ref().unwrap().text, "Loading...");

        model.apply(ticket, Err(WeatherError::NotFound("nowhere".into())));
        let failed = Scene::compose(&model, &clock(), Surface::default());
        assert!(failed.status.as_ref().unwrap().text.contains("City not found: nowhere"));
        assert_eq!(failed.bar(BarKind::Current).unwrap().value.text, "1°");
    }
}
