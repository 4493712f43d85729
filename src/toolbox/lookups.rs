//! Lookup tools: weather and inspirational quotes
//!
//! Weather for known cities comes from a static table; anything else gets
//! uniformly randomized synthetic data tagged as simulated.

use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::toolbox::{invalid_args, Tool};

/// Static weather table: (city, temp °C, condition, humidity %)
const WEATHER_DATA: &[(&str, i64, &str, i64)] = &[
    ("New York", 22, "Sunny", 65),
    ("London", 15, "Cloudy", 78),
    ("Tokyo", 28, "Partly Cloudy", 70),
    ("Sydney", 25, "Rainy", 85),
    ("Paris", 18, "Overcast", 72),
];

/// Conditions used for simulated weather
const CONDITIONS: &[&str] = &["Sunny", "Cloudy", "Rainy", "Partly Cloudy", "Overcast"];

const QUOTES: &[&str] = &[
    "The only way to do great work is to love what you do. - Steve Jobs",
    "Innovation distinguishes between a leader and a follower. - Steve Jobs",
    "Life is what happens to you while you're busy making other plans. - John Lennon",
    "The future belongs to those who believe in the beauty of their dreams. - Eleanor Roosevelt",
    "It is during our darkest moments that we must focus to see the light. - Aristotle",
    "Success is not final, failure is not fatal: it is the courage to continue that counts. - Winston Churchill",
    "The only impossible journey is the one you never begin. - Tony Robbins",
];

/// Title-case a city name so lookups are case-insensitive
fn title_case(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Weather lookup with simulated fallback
pub struct WeatherTool;

impl Tool for WeatherTool {
    fn name(&self) -> &'static str {
        "get_weather"
    }

    fn description(&self) -> &'static str {
        "Get weather information for a specified city"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "city": {
                    "type": "string",
                    "description": "Name of the city (default: New York)"
                }
            }
        })
    }

    fn call(&self, args: Value) -> Value {
        #[derive(Deserialize)]
        struct Args {
            #[serde(default = "default_city")]
            city: String,
        }

        fn default_city() -> String {
            "New York".to_string()
        }

        let args: Args = match serde_json::from_value(args) {
            Ok(a) => a,
            Err(e) => return invalid_args(e),
        };

        let city = title_case(&args.city);
        let timestamp = Utc::now().to_rfc3339();

        if let Some((name, temp, condition, humidity)) =
            WEATHER_DATA.iter().find(|(name, ..)| *name == city)
        {
            return json!({
                "city": name,
                "temp": temp,
                "condition": condition,
                "humidity": humidity,
                "timestamp": timestamp,
            });
        }

        let mut rng = rand::thread_rng();
        json!({
            "city": city,
            "temp": rng.gen_range(10..=35),
            "condition": CONDITIONS.choose(&mut rng).copied().unwrap_or("Sunny"),
            "humidity": rng.gen_range(40..=90),
            "timestamp": timestamp,
            "note": "Simulated data for unknown city",
        })
    }
}

/// Random inspirational quote
pub struct QuoteTool;

impl Tool for QuoteTool {
    fn name(&self) -> &'static str {
        "get_random_quote"
    }

    fn description(&self) -> &'static str {
        "Get a random inspirational quote"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    fn call(&self, _args: Value) -> Value {
        let mut rng = rand::thread_rng();
        let quote = QUOTES.choose(&mut rng).copied().unwrap_or(QUOTES[0]);
        json!({
            "quote": quote,
            "timestamp": Utc::now().to_rfc3339(),
        })
    }
}
