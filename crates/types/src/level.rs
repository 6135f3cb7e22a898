use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Caller-declared self-assessment bucket, always within `[MIN, MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct AssessedLevel(u8);

impl AssessedLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;
    pub const DEFAULT: AssessedLevel = AssessedLevel(3);

    /// Builds a level if `value` is in range.
    pub fn new(value: i64) -> Option<Self> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Some(Self(value as u8))
        } else {
            None
        }
    }

    /// Resolves the `user.assessed_level` field of a request.
    ///
    /// Integers (including integral floats and integer strings) inside the
    /// range are kept; everything else, out-of-range values included,
    /// falls back to [`AssessedLevel::DEFAULT`].
    pub fn resolve(value: Option<&Value>) -> Self {
        value
            .and_then(integer_of)
            .and_then(Self::new)
            .unwrap_or(Self::DEFAULT)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Key under which this level is stored in the library index.
    pub fn as_key(self) -> String {
        self.0.to_string()
    }
}

impl Default for AssessedLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for AssessedLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn integer_of(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.is_finite())
                .map(|f| f as i64)
        }),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// How the level reported back to the caller is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum LevelPolicy {
    /// Report the resolved, clamped level.
    #[default]
    Coerce,
    /// Echo the caller's raw `assessed_level` value unchanged.
    Passthrough,
}

impl LevelPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            LevelPolicy::Coerce => "coerce",
            LevelPolicy::Passthrough => "passthrough",
        }
    }

    /// Level to put in the response for the given raw field.
    pub fn report(self, raw: Option<&Value>, resolved: AssessedLevel) -> ReportedLevel {
        match (self, raw) {
            (LevelPolicy::Coerce, _) | (LevelPolicy::Passthrough, None) => {
                ReportedLevel::Resolved(resolved)
            }
            (LevelPolicy::Passthrough, Some(value)) => ReportedLevel::Raw(value.clone()),
        }
    }
}

impl fmt::Display for LevelPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LevelPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "coerce" => Ok(LevelPolicy::Coerce),
            "passthrough" => Ok(LevelPolicy::Passthrough),
            other => Err(format!(
                "unknown level policy '{other}' (expected 'coerce' or 'passthrough')"
            )),
        }
    }
}

impl TryFrom<String> for LevelPolicy {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The `level` field of a classification as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportedLevel {
    Resolved(AssessedLevel),
    Raw(Value),
}
