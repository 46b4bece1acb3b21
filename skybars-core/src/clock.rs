use chrono::{DateTime, Datelike, FixedOffset, Timelike, Utc};

use crate::{layout::PLACEHOLDER, model::CityZone};

/// Local hour from which the night background is used.
pub const NIGHT_FROM_HOUR: u32 = 19;
/// Last local hour that still counts as night.
pub const NIGHT_UNTIL_HOUR: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Daylight {
    Day,
    Night,
}

impl Daylight {
    pub fn at(hour: u32) -> Self {
        if hour >= NIGHT_FROM_HOUR || hour <= NIGHT_UNTIL_HOUR {
            Daylight::Night
        } else {
            Daylight::Day
        }
    }
}

/// Text shown in the header for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockLabels {
    pub date: String,
    pub local_time: String,
    pub city_time: String,
    pub zone_label: String,
    pub daylight: Daylight,
}

impl ClockLabels {
    /// Labels for `now`, seen from a viewer at `local` and the city's `zone`.
    pub fn at(now: DateTime<Utc>, local: FixedOffset, zone: Option<&CityZone>) -> Self {
        let here = now.with_timezone(&local);

        let city_time = zone
            .and_then(|z| FixedOffset::east_opt(z.offset_secs()))
            .map(|offset| hms(&now.with_timezone(&offset)))
            .unwrap_or_else(|| PLACEHOLDER.to_string());

        Self {
            date: format!("{}-{}-{}", here.month(), here.day(), here.year()),
            local_time: hms(&here),
            city_time,
            zone_label: zone
                .map(|z| z.label.clone())
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            daylight: Daylight::at(here.hour()),
        }
    }
}

fn hms(t: &DateTime<FixedOffset>) -> String {
    t.format("%H:%M:%S").to_string()
}
