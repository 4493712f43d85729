//! Calculator tools: BMI, compound interest, tip splitting

use serde::Deserialize;
use serde_json::{json, Value};

use crate::toolbox::{error_value, invalid_args, round2, Tool};

/// Body Mass Index calculator
pub struct BmiTool;

impl Tool for BmiTool {
    fn name(&self) -> &'static str {
        "calculate_bmi"
    }

    fn description(&self) -> &'static str {
        "Calculate Body Mass Index (BMI) from weight and height"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "weight": {
                    "type": "number",
                    "description": "Weight in kilograms"
                },
                "height": {
                    "type": "number",
                    "description": "Height in meters"
                }
            },
            "required": ["weight", "height"]
        })
    }

    fn call(&self, args: Value) -> Value {
        #[derive(Deserialize)]
        struct Args {
            weight: f64,
            height: f64,
        }

        let args: Args = match serde_json::from_value(args) {
            Ok(a) => a,
            Err(e) => return invalid_args(e),
        };

        if args.weight <= 0.0 || args.height <= 0.0 {
            return error_value("Weight and height must be positive values");
        }

        let bmi = args.weight / (args.height * args.height);

        let category = if bmi < 18.5 {
            "Underweight"
        } else if bmi < 25.0 {
            "Normal weight"
        } else if bmi < 30.0 {
            "Overweight"
        } else {
            "Obese"
        };

        json!({
            "bmi": round2(bmi),
            "category": category,
            "weight": args.weight,
            "height": args.height,
        })
    }
}

/// Compound interest calculator
pub struct CompoundInterestTool;

impl Tool for CompoundInterestTool {
    fn name(&self) -> &'static str {
        "calculate_compound_interest"
    }

    fn description(&self) -> &'static str {
        "Calculate compound interest for a principal over time"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "principal": {
                    "type": "number",
                    "description": "Initial amount"
                },
                "rate": {
                    "type": "number",
                    "description": "Annual interest rate as a percentage"
                },
                "time": {
                    "type": "number",
                    "description": "Time period in years"
                },
                "compound_frequency": {
                    "type": "integer",
                    "description": "Times interest is compounded per year (default: 1)"
                }
            },
            "required": ["principal", "rate", "time"]
        })
    }

    fn call(&self, args: Value) -> Value {
        #[derive(Deserialize)]
        struct Args {
            principal: f64,
            rate: f64,
            time: f64,
            #[serde(default = "default_frequency")]
            compound_frequency: i64,
        }

        fn default_frequency() -> i64 {
            1
        }

        let args: Args = match serde_json::from_value(args) {
            Ok(a) => a,
            Err(e) => return invalid_args(e),
        };

        if args.principal <= 0.0 || args.rate < 0.0 || args.time < 0.0 || args.compound_frequency <= 0
        {
            return error_value("Invalid input values");
        }

        let n = args.compound_frequency as f64;
        let rate_decimal = args.rate / 100.0;
        let amount = args.principal * (1.0 + rate_decimal / n).powf(n * args.time);
        let interest = amount - args.principal;

        json!({
            "principal": args.principal,
            "rate": args.rate,
            "time": args.time,
            "compound_frequency": args.compound_frequency,
            "final_amount": round2(amount),
            "interest_earned": round2(interest),
        })
    }
}

/// Tip calculator with bill splitting
pub struct TipTool;

impl Tool for TipTool {
    fn name(&self) -> &'static str {
        "calculate_tip"
    }

    fn description(&self) -> &'static str {
        "Calculate tip and split a bill among people"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "bill_amount": {
                    "type": "number",
                    "description": "Total bill amount"
                },
                "tip_percentage": {
                    "type": "number",
                    "description": "Tip percentage (default: 15)"
                },
                "num_people": {
                    "type": "integer",
                    "description": "Number of people splitting the bill (default: 1)"
                }
            },
            "required": ["bill_amount"]
        })
    }

    fn call(&self, args: Value) -> Value {
        #[derive(Deserialize)]
        struct Args {
            bill_amount: f64,
            #[serde(default = "default_tip")]
            tip_percentage: f64,
            #[serde(default = "default_people")]
            num_people: i64,
        }

        fn default_tip() -> f64 {
            15.0
        }

        fn default_people() -> i64 {
            1
        }

        let args: Args = match serde_json::from_value(args) {
            Ok(a) => a,
            Err(e) => return invalid_args(e),
        };

        if args.bill_amount <= 0.0 || args.tip_percentage < 0.0 || args.num_people <= 0 {
            return error_value("Invalid input values");
        }

        let tip_amount = args.bill_amount * (args.tip_percentage / 100.0);
        let total_amount = args.bill_amount + tip_amount;
        let per_person = total_amount / args.num_people as f64;

        json!({
            "bill_amount": args.bill_amount,
            "tip_percentage": args.tip_percentage,
            "tip_amount": round2(tip_amount),
            "total_amount": round2(total_amount),
            "num_people": args.num_people,
            "per_person": round2(per_person),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only_error(value: &Value) -> bool {
        let obj = value.as_object().unwrap();
        obj.len() == 1 && obj.contains_key("error")
    }

    #[test]
    fn test_bmi_normal_weight() {
        let result = BmiTool.call(json!({"weight": 70.0, "height": 1.75}));
        assert_eq!(result["bmi"], 22.86);
        assert_eq!(result["category"], "Normal weight");
        assert_eq!(result["weight"], 70.0);
        assert_eq!(result["height"], 1.75);
    }

    #[test]
    fn test_bmi_categories() {
        let under = BmiTool.call(json!({"weight": 50.0, "height": 1.65}));
        assert_eq!(under["category"], "Underweight");

        let over = BmiTool.call(json!({"weight": 85.0, "height": 1.75}));
        assert_eq!(over["category"], "Overweight");

        let obese = BmiTool.call(json!({"weight": 100.0, "height": 1.70}));
        assert_eq!(obese["category"], "Obese");
    }

    #[test]
    fn test_bmi_rejects_non_positive() {
        assert!(only_error(&BmiTool.call(json!({"weight": 0.0, "height": 1.75}))));
        assert!(only_error(&BmiTool.call(json!({"weight": 70.0, "height": -1.0}))));
    }

    #[test]
    fn test_bmi_rejects_malformed_args() {
        assert!(only_error(&BmiTool.call(json!({"weight": "heavy"}))));
    }

    #[test]
    fn test_compound_interest_annual() {
        let result = CompoundInterestTool.call(json!({
            "principal": 1000.0, "rate": 5.0, "time": 10.0
        }));
        assert_eq!(result["final_amount"], 1628.89);
        assert_eq!(result["interest_earned"], 628.89);
        assert_eq!(result["compound_frequency"], 1);
    }

    #[test]
    fn test_compound_interest_monotonic_in_rate_and_time() {
        let base = CompoundInterestTool
            .call(json!({"principal": 1000.0, "rate": 5.0, "time": 10.0}));
        let higher_rate = CompoundInterestTool
            .call(json!({"principal": 1000.0, "rate": 7.0, "time": 10.0}));
        let longer_time = CompoundInterestTool
            .call(json!({"principal": 1000.0, "rate": 5.0, "time": 15.0}));

        let amount = |v: &Value| v["final_amount"].as_f64().unwrap();
        assert!(amount(&higher_rate) >= amount(&base));
        assert!(amount(&longer_time) >= amount(&base));
    }

    #[test]
    fn test_compound_interest_identity() {
        let result = CompoundInterestTool.call(json!({
            "principal": 2500.0, "rate": 4.3, "time": 7.0, "compound_frequency": 12
        }));
        let amount = result["final_amount"].as_f64().unwrap();
        let interest = result["interest_earned"].as_f64().unwrap();
        assert!((interest - (amount - 2500.0)).abs() < 0.011);
    }

    #[test]
    fn test_compound_interest_rejects_invalid() {
        assert!(only_error(&CompoundInterestTool.call(json!({
            "principal": 0.0, "rate": 5.0, "time": 1.0
        }))));
        assert!(only_error(&CompoundInterestTool.call(json!({
            "principal": 100.0, "rate": -1.0, "time": 1.0
        }))));
        assert!(only_error(&CompoundInterestTool.call(json!({
            "principal": 100.0, "rate": 5.0, "time": 1.0, "compound_frequency": 0
        }))));
    }

    #[test]
    fn test_tip_split() {
        let result = TipTool.call(json!({
            "bill_amount": 100.0, "tip_percentage": 15.0, "num_people": 4
        }));
        assert_eq!(result["tip_amount"], 15.0);
        assert_eq!(result["total_amount"], 115.0);
        assert_eq!(result["per_person"], 28.75);
    }

    #[test]
    fn test_tip_per_person_times_people_is_total() {
        let result = TipTool.call(json!({
            "bill_amount": 87.3, "tip_percentage": 18.0, "num_people": 3
        }));
        let per_person = result["per_person"].as_f64().unwrap();
        let total = result["total_amount"].as_f64().unwrap();
        assert!((per_person * 3.0 - total).abs() < 0.02);
    }

    #[test]
    fn test_tip_defaults() {
        let result = TipTool.call(json!({"bill_amount": 50.0}));
        assert_eq!(result["tip_percentage"], 15.0);
        assert_eq!(result["num_people"], 1);
        assert_eq!(result["tip_amount"], 7.5);
    }

    #[test]
    fn test_tip_rejects_invalid() {
        assert!(only_error(&TipTool.call(json!({"bill_amount": -5.0}))));
        assert!(only_error(&TipTool.call(json!({
            "bill_amount": 10.0, "num_people": 0
        }))));
    }
}
