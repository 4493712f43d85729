//! Utility tools: password generation and temperature conversion

use rand::Rng;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::toolbox::{error_value, invalid_args, round2, Tool};

/// Symbol characters added to the password alphabet on request
const PASSWORD_SYMBOLS: &str = "!@#$%^&*";

/// Random password generator
pub struct PasswordTool;

impl Tool for PasswordTool {
    fn name(&self) -> &'static str {
        "generate_password"
    }

    fn description(&self) -> &'static str {
        "Generate a random password"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "length": {
                    "type": "integer",
                    "description": "Length of the password (default: 12)"
                },
                "include_symbols": {
                    "type": "boolean",
                    "description": "Whether to include symbols (default: true)"
                }
            }
        })
    }

    fn call(&self, args: Value) -> Value {
        #[derive(Deserialize)]
        struct Args {
            #[serde(default = "default_length")]
            length: i64,
            #[serde(default = "default_symbols")]
            include_symbols: bool,
        }

        fn default_length() -> i64 {
            12
        }

        fn default_symbols() -> bool {
            true
        }

        let args: Args = match serde_json::from_value(args) {
            Ok(a) => a,
            Err(e) => return invalid_args(e),
        };

        if args.length < 4 {
            return error_value("Password length must be at least 4 characters");
        }

        let mut alphabet: Vec<char> = ('a'..='z').chain('A'..='Z').chain('0'..='9').collect();
        if args.include_symbols {
            alphabet.extend(PASSWORD_SYMBOLS.chars());
        }

        let mut rng = rand::thread_rng();
        let password: String = (0..args.length)
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
            .collect();

        let strength = if args.length >= 12 {
            "Strong"
        } else if args.length >= 8 {
            "Medium"
        } else {
            "Weak"
        };

        json!({
            "password": password,
            "length": args.length,
            "includes_symbols": args.include_symbols,
            "strength": strength,
        })
    }
}

/// Temperature converter between Celsius, Fahrenheit and Kelvin
pub struct TemperatureTool;

impl Tool for TemperatureTool {
    fn name(&self) -> &'static str {
        "convert_temperature"
    }

    fn description(&self) -> &'static str {
        "Convert temperature between Celsius, Fahrenheit, and Kelvin"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "temperature": {
                    "type": "number",
                    "description": "Temperature value"
                },
                "from_unit": {
                    "type": "string",
                    "description": "Source unit (C, F, or K)"
                },
                "to_unit": {
                    "type": "string",
                    "description": "Target unit (C, F, or K)"
                }
            },
            "required": ["temperature", "from_unit", "to_unit"]
        })
    }

    fn call(&self, args: Value) -> Value {
        #[derive(Deserialize)]
        struct Args {
            temperature: f64,
            from_unit: String,
            to_unit: String,
        }

        let args: Args = match serde_json::from_value(args) {
            Ok(a) => a,
            Err(e) => return invalid_args(e),
        };

        let from_unit = args.from_unit.to_uppercase();
        let to_unit = args.to_unit.to_uppercase();

        if !is_valid_unit(&from_unit) || !is_valid_unit(&to_unit) {
            return error_value("Units must be C (Celsius), F (Fahrenheit), or K (Kelvin)");
        }

        // Celsius as the common intermediate
        let celsius = match from_unit.as_str() {
            "F" => (args.temperature - 32.0) * 5.0 / 9.0,
            "K" => args.temperature - 273.15,
            _ => args.temperature,
        };

        let result = match to_unit.as_str() {
            "F" => celsius * 9.0 / 5.0 + 32.0,
            "K" => celsius + 273.15,
            _ => celsius,
        };

        json!({
            "original_temperature": args.temperature,
            "original_unit": from_unit,
            "converted_temperature": round2(result),
            "converted_unit": to_unit,
        })
    }
}

fn is_valid_unit(unit: &str) -> bool {
    matches!(unit, "C" | "F" | "K")
}
