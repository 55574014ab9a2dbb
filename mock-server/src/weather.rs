//! Deterministic stand-in for the upstream weather provider.
//!
//! Produces a payload in the provider's "current weather" shape, derived
//! from the location text so the same location always yields the same
//! numbers.

use serde_json::{json, Value};

const CONDITIONS: [(&str, &str); 4] = [
    ("Clear", "clear sky"),
    ("Clouds", "scattered clouds"),
    ("Rain", "light rain"),
    ("Snow", "light snow"),
];

fn seed(location: &str) -> u64 {
    location
        .to_lowercase()
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325, |h, b| (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3))
}

fn scaled(seed: u64, shift: u32, range: u64, scale: f64, offset: f64) -> f64 {
    ((seed >> shift) % range) as f64 / scale + offset
}

/// The `current` object for `location`.
pub fn current(location: &str) -> Value {
    let s = seed(location);
    let temp = scaled(s, 0, 400, 10.0, -5.0);
    let (main, description) = CONDITIONS[(s >> 40) as usize % CONDITIONS.len()];

    json!({
        "name": location,
        "coord": {
            "lat": scaled(s, 8, 18000, 100.0, -90.0),
            "lon": scaled(s, 24, 36000, 100.0, -180.0),
        },
        "main": {
            "temp": temp,
            "feels_like": temp - 1.5,
            "humidity": (s >> 16) % 101,
            "pressure": 980 + (s >> 32) % 60,
        },
        "weather": [{"main": main, "description": description}],
        "wind": {
            "speed": scaled(s, 12, 200, 10.0, 0.0),
            "deg": (s >> 20) % 360,
        },
        "sys": {"country": "ZZ"},
    })
}

/// The stored `weather_data` for `location`: current conditions, no forecast.
pub fn weather_data(location: &str) -> Value {
    json!({ "current": current(location), "forecast": null })
}

/// Coordinates reported in a `current` payload.
pub fn coordinates(current: &Value) -> (Option<f64>, Option<f64>) {
    (
        current.pointer("/coord/lat").and_then(Value::as_f64),
        current.pointer("/coord/lon").and_then(Value::as_f64),
    )
}
