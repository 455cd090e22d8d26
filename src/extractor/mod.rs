pub mod gemini;
pub mod model;

use crate::error::ExtractionError;
use crate::results::RateRecord;
use model::LanguageModel;
use regex::Regex;
use serde_json::{Map, Number, Value};
use std::sync::LazyLock;

/// Matches a reply wrapped in a markdown code fence, with or without a
/// language tag and with or without the closing fence
static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^```[\w-]*[ \t]*\r?\n?(.*?)(?:```)?$").unwrap());

const PROMPT_HEADER: &str = "\
Extract the date, USD buy/sell exchange rates, and 16 Pe Gold buy/sell prices from the following raw text.
Return the result STRICTLY as a JSON object with no markdown formatting.
Remove any commas from numeric values so they are plain numbers. If missing, return null for that field.

Format:
{
  \"date\": \"...\",
  \"usd_buy\": 1234,
  \"usd_sell\": 1234,
  \"gold_buy\": 12345678,
  \"gold_sell\": 12345678
}

Raw Text:
";

/// Builds the instruction prompt for one message
pub fn build_prompt(text: &str) -> String {
    format!("{}{}\n", PROMPT_HEADER, text)
}

/// Removes a surrounding code fence, if any, and trims the result
pub fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    CODE_FENCE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map_or(trimmed, |m| m.as_str().trim())
}

/// Turns a model reply into a validated [`RateRecord`].
///
/// The reply must be a JSON object. Missing fields read as null, unknown
/// keys are dropped. Rates must be non-negative JSON numbers; a rate given
/// as a string (`"2,100"`) is rejected rather than coerced.
pub fn parse_reply(reply: &str) -> Result<RateRecord, ExtractionError> {
    let body = strip_code_fence(reply);
    let mut map = match serde_json::from_str::<Value>(body)? {
        Value::Object(map) => map,
        other => {
            return Err(ExtractionError::NotAnObject {
                found: json_type(&other),
            });
        }
    };

    let record = RateRecord {
        date: take_date(&mut map)?,
        usd_buy: take_rate(&mut map, "usd_buy")?,
        usd_sell: take_rate(&mut map, "usd_sell")?,
        gold_buy: take_rate(&mut map, "gold_buy")?,
        gold_sell: take_rate(&mut map, "gold_sell")?,
    };

    if !map.is_empty() {
        ::log::warn!(
            "Dropping unexpected keys from model reply: {:?}",
            map.keys().collect::<Vec<_>>()
        );
    }

    Ok(record)
}

fn take_date(map: &mut Map<String, Value>) -> Result<Option<String>, ExtractionError> {
    match map.remove("date") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(date)) => Ok(Some(date)),
        Some(other) => Err(ExtractionError::InvalidField {
            field: "date",
            reason: format!("expected a string or null, got {}", json_type(&other)),
        }),
    }
}

fn take_rate(
    map: &mut Map<String, Value>,
    field: &'static str,
) -> Result<Option<Number>, ExtractionError> {
    match map.remove(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => {
            if n.as_f64().is_some_and(|v| v < 0.0) {
                Err(ExtractionError::InvalidField {
                    field,
                    reason: format!("negative value {}", n),
                })
            } else {
                Ok(Some(n))
            }
        }
        Some(other) => Err(ExtractionError::InvalidField {
            field,
            reason: format!("expected a number or null, got {} {}", json_type(&other), other),
        }),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Extracts a [`RateRecord`] from message text with a language model
#[derive(Debug, Clone)]
pub struct RateExtractor<M> {
    model: M,
}

impl<M: LanguageModel> RateExtractor<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// One model call, then validation. Any failure is final.
    pub async fn extract(&self, text: &str) -> Result<RateRecord, ExtractionError> {
        ::log::info!("Sending {} characters to the model", text.chars().count());
        let reply = self.model.complete(&build_prompt(text)).await?;
        ::log::debug!("Model reply:\n{}", reply);

        let record = parse_reply(&reply)?;
        if record.is_empty() {
            ::log::warn!("Model could not determine any field");
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    const GOOD: &str = r#"{"date":"1.1.2025","usd_buy":2100,"usd_sell":2150,"gold_buy":4500000,"gold_sell":4550000}"#;

    /// Replies with a fixed string and remembers the prompt
    struct CannedModel {
        reply: Result<String, ()>,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedModel {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LanguageModel for CannedModel {
        async fn complete(&self, prompt: &str) -> Result<String, ExtractionError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone().map_err(|_| ExtractionError::EmptyResponse)
        }
    }

    #[test]
    fn test_prompt_contents() {
        let prompt = build_prompt("USD Buy 2100");
        for field in RateRecord::FIELDS {
            assert!(prompt.contains(field), "prompt should name {}", field);
        }
        assert!(prompt.contains("no markdown formatting"));
        assert!(prompt.contains("Remove any commas"));
        assert!(prompt.contains("return null"));
        assert!(prompt.ends_with("Raw Text:\nUSD Buy 2100\n"));
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence(&format!("```json\n{}\n```", GOOD)), GOOD);
        assert_eq!(strip_code_fence(&format!("```\n{}\n```", GOOD)), GOOD);
        assert_eq!(strip_code_fence(&format!("```json{}```", GOOD)), GOOD);
        assert_eq!(strip_code_fence(&format!("  ```JSON\r\n{}\r\n```  \n", GOOD)), GOOD);
        // Unterminated fence
        assert_eq!(strip_code_fence(&format!("```json\n{}", GOOD)), GOOD);
        // No fence at all
        assert_eq!(strip_code_fence(&format!("\n {} \n", GOOD)), GOOD);
    }

    #[test]
    fn test_parse_fenced_reply() {
        let record = parse_reply(&format!("```json\n{}\n```", GOOD)).unwrap();
        assert_eq!(record.date.as_deref(), Some("1.1.2025"));
        assert_eq!(record.usd_buy, Some(2100.into()));
        assert_eq!(record.gold_sell, Some(4550000.into()));
    }

    #[test]
    fn test_string_rate_is_rejected() {
        let reply = r#"{"date":"1/1/2025","usd_buy":"2,100","usd_sell":2150,"gold_buy":4500000,"gold_sell":4550000}"#;
        match parse_reply(reply) {
            Err(ExtractionError::InvalidField { field, reason }) => {
                assert_eq!(field, "usd_buy");
                assert!(reason.contains("string"));
            }
            other => panic!("expected InvalidField, got {:?}", other),
        }
    }

    #[test]
    fn test_non_json_and_non_object() {
        assert!(matches!(
            parse_reply("Sorry, I cannot find any rates."),
            Err(ExtractionError::InvalidJson(_))
        ));
        assert!(matches!(
            parse_reply("[2100, 2150]"),
            Err(ExtractionError::NotAnObject { found: "array" })
        ));
        assert!(matches!(
            parse_reply("null"),
            Err(ExtractionError::NotAnObject { found: "null" })
        ));
    }

    #[test]
    fn test_missing_fields_are_null_and_extras_dropped() {
        let record = parse_reply(r#"{"usd_buy": 2100, "currency": "MMK"}"#).unwrap();
        assert_eq!(
            record,
            RateRecord {
                usd_buy: Some(2100.into()),
                ..RateRecord::default()
            }
        );
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            parse_reply(r#"{"gold_buy": -5}"#),
            Err(ExtractionError::InvalidField { field: "gold_buy", .. })
        ));
        assert!(matches!(
            parse_reply(r#"{"date": 20250101}"#),
            Err(ExtractionError::InvalidField { field: "date", .. })
        ));
        assert!(matches!(
            parse_reply(r#"{"usd_sell": true}"#),
            Err(ExtractionError::InvalidField { field: "usd_sell", .. })
        ));
    }

    #[test]
    fn test_fractional_rates_kept() {
        let record = parse_reply(r#"{"usd_buy": 2100.5, "usd_sell": 0}"#).unwrap();
        assert_eq!(serde_json::to_value(&record.usd_buy).unwrap(), serde_json::json!(2100.5));
        assert_eq!(record.usd_sell, Some(0.into()));
    }

    #[tokio::test]
    async fn test_extract_calls_model_once() {
        let model = CannedModel::replying(GOOD);
        let extractor = RateExtractor::new(model);
        let record = extractor.extract("USD: Buy 2100 Sell 2150").await.unwrap();
        assert_eq!(record.usd_sell, Some(2150.into()));

        let prompts = extractor.model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("USD: Buy 2100 Sell 2150"));
    }

    #[tokio::test]
    async fn test_extract_propagates_model_failure() {
        let model = CannedModel {
            reply: Err(()),
            prompts: Mutex::new(Vec::new()),
        };
        let extractor = RateExtractor::new(model);
        assert!(matches!(
            extractor.extract("text").await,
            Err(ExtractionError::EmptyResponse)
        ));
    }
}
