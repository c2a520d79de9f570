//! Turns the free text a language model returns for a meal-plan request into a
//! typed 7-day plan.
//!
//! The text goes through a fixed sequence of repairs (code fences, missing
//! commas, bare keys, trailing commas, surrounding prose, unit suffixes) and
//! is then parsed and validated all-or-nothing. Any failure keeps the
//! original text as [`MealPlanResult::Raw`] so a later read can try again.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use super::model::{DayPlan, Meal, MealPlan, MealPlanResult, NutritionInfo, DAYS_PER_PLAN};

lazy_static! {
    static ref FENCE_RE: Regex = Regex::new(r"```json|```").unwrap();
    static ref SPLIT_BOUNDARY_RE: Regex = Regex::new(r#""\s*}\s*""#).unwrap();
    static ref BARE_KEY_RE: Regex = Regex::new(r"([{,]\s*)([A-Za-z0-9_]+)(\s*:)").unwrap();
    static ref TRAILING_COMMA_RE: Regex = Regex::new(r",(\s*[}\]])").unwrap();
    static ref UNIT_SUFFIX_RE: Regex = Regex::new(r"(?i)(\d+)(?:kcal|cal|g)\b").unwrap();
}

/// Text repairs, listed in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repair {
    StripFences,
    MissingComma,
    BareKeys,
    TrailingCommas,
    OuterObject,
    UnitSuffixes,
}

impl Repair {
    const PASSES: [Repair; 5] = [
        Repair::MissingComma,
        Repair::BareKeys,
        Repair::TrailingCommas,
        Repair::OuterObject,
        Repair::UnitSuffixes,
    ];

    fn apply(self, text: &str) -> String {
        match self {
            Repair::StripFences => FENCE_RE.replace_all(text, "").into_owned(),
            Repair::MissingComma => SPLIT_BOUNDARY_RE.replace_all(text, r#"", ""#).into_owned(),
            Repair::BareKeys => replace_outside_strings(text, &BARE_KEY_RE, r#"$1"$2"$3"#),
            Repair::TrailingCommas => replace_outside_strings(text, &TRAILING_COMMA_RE, "$1"),
            Repair::OuterObject => outer_object(text).to_string(),
            Repair::UnitSuffixes => UNIT_SUFFIX_RE.replace_all(text, "$1").into_owned(),
        }
    }
}

/// Why a text could not become a structured plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("repaired text is not valid JSON: {0}")]
    Parse(String),
    #[error("document has no `days` array")]
    MissingDays,
    #[error("expected exactly 7 days, found {0}")]
    DayCount(usize),
    #[error("day {position} is missing `{field}`")]
    MissingField { position: usize, field: &'static str },
}

#[derive(Debug)]
struct Repaired {
    text: String,
    applied: Vec<Repair>,
}

/// Normalize model output. Never fails: anything that does not validate is
/// returned as raw text, unmodified.
pub fn normalize(raw_text: &str) -> MealPlanResult {
    match normalize_with_report(raw_text) {
        Ok(plan) => MealPlanResult::Structured(plan),
        Err(reason) => {
            warn!(%reason, len = raw_text.len(), "meal plan kept as raw text");
            MealPlanResult::Raw {
                raw_text: raw_text.to_string(),
            }
        }
    }
}

/// Same pipeline as [`normalize`], with the rejection reason.
pub fn normalize_with_report(raw_text: &str) -> Result<MealPlan, Rejection> {
    let repaired = repair(raw_text);
    if !repaired.applied.is_empty() {
        debug!(applied = ?repaired.applied, "meal plan text repaired");
    }

    let document: Value =
        serde_json::from_str(&repaired.text).map_err(|e| Rejection::Parse(e.to_string()))?;

    let entries = days_of(&document)?;
    let days = entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| day_plan(idx + 1, entry))
        .collect::<Result<Vec<_>, _>>()?;

    let days: [DayPlan; DAYS_PER_PLAN] = days
        .try_into()
        .map_err(|rest: Vec<DayPlan>| Rejection::DayCount(rest.len()))?;
    Ok(MealPlan { days })
}

fn repair(raw_text: &str) -> Repaired {
    let mut applied = Vec::new();

    let unfenced = Repair::StripFences.apply(raw_text);
    if unfenced != raw_text {
        applied.push(Repair::StripFences);
    }
    let mut text = unfenced.trim().to_string();

    for pass in Repair::PASSES {
        let next = pass.apply(&text);
        if next != text {
            applied.push(pass);
            text = next;
        }
    }

    Repaired { text, applied }
}

/// First `{` through last `}`; text without such a span is left alone.
fn outer_object(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

/// Applies `re` only to the parts of `text` that are not inside a JSON
/// string literal, so item descriptions like `"Poha, peanuts: 1 cup"` keep
/// their punctuation. String tracking starts at the first `{`; prose before
/// it is copied as is, so a stray quote there cannot swallow the document.
fn replace_outside_strings(text: &str, re: &Regex, replacement: &str) -> String {
    let body_start = text.find('{').unwrap_or(0);
    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..body_start]);
    let mut segment_start = body_start;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text[body_start..]
        .char_indices()
        .map(|(offset, ch)| (body_start + offset, ch))
    {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
                out.push_str(&text[segment_start..=idx]);
                segment_start = idx + 1;
            }
        } else if ch == '"' {
            out.push_str(&re.replace_all(&text[segment_start..idx], replacement));
            in_string = true;
            segment_start = idx;
        }
    }

    let tail = &text[segment_start..];
    if in_string {
        out.push_str(tail);
    } else {
        out.push_str(&re.replace_all(tail, replacement));
    }
    out
}

fn days_of(document: &Value) -> Result<&Vec<Value>, Rejection> {
    let outer = match document.get("mealPlan") {
        Some(inner @ Value::Object(_)) => inner,
        _ => document,
    };
    let days = outer
        .get("days")
        .and_then(Value::as_array)
        .ok_or(Rejection::MissingDays)?;
    if days.len() != DAYS_PER_PLAN {
        return Err(Rejection::DayCount(days.len()));
    }
    Ok(days)
}

/// `null`, `""`, `0` and `false` count as not provided.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map_or(true, |v| v != 0.0),
        Value::Bool(b) => *b,
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn day_plan(position: usize, entry: &Value) -> Result<DayPlan, Rejection> {
    let present = |field: &'static str| match entry.get(field) {
        Some(value) if is_present(value) => Ok(value),
        _ => Err(Rejection::MissingField { position, field }),
    };

    let day = match present("day")? {
        Value::String(label) => label.clone(),
        other => other.to_string(),
    };
    // a slot that is there but not an object still counts, with empty content
    let slot = |field: &'static str| {
        present(field).map(|value| value.as_object().map(meal).unwrap_or_default())
    };

    Ok(DayPlan {
        day,
        breakfast: slot("breakfast")?,
        lunch: slot("lunch")?,
        dinner: slot("dinner")?,
        snacks: slot("snacks")?,
    })
}

fn meal(slot: &Map<String, Value>) -> Meal {
    let item = match slot.get("item") {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };
    let nutrition = slot.get("nutrition");
    let field = |name: &str| coerce_number(nutrition.and_then(|n| n.get(name)));

    Meal {
        item,
        nutrition: NutritionInfo {
            calories: field("calories"),
            protein: field("protein"),
            carbs: field("carbs"),
            fat: field("fat"),
        },
    }
}

/// Best-effort number: JSON numbers and numeric strings pass, everything
/// else (missing, null, words, NaN, infinities) becomes `0`.
pub fn coerce_number(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|n| n.is_finite() && *n != 0.0)
        .unwrap_or(0.0)
}
