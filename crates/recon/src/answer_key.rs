//! The answer key: who each single-player question is about, and the
//! expected value of every report line, keyed by label.
//!
//! The built-in key is `answer_key.toml` at the crate root. A replacement key
//! can be loaded from any TOML file with the same shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::checks::all_labels;
use crate::error::ReconError;
use crate::model::Value;

const BUILTIN_KEY: &str = include_str!("../answer_key.toml");

/// Named players referenced by the single-player questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Subjects {
    /// +5pp shooting hypothetical.
    pub q2: String,
    /// Share of team draw controls.
    pub q3: String,
    /// Share of team assists.
    pub q5: String,
    /// Goal/assist ratio.
    pub q7: String,
    /// Draw controls after two more games.
    pub q9: String,
    /// Goals per shot on goal.
    pub q10: String,
}

impl Subjects {
    fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("q2", self.q2.as_str()),
            ("q3", self.q3.as_str()),
            ("q5", self.q5.as_str()),
            ("q7", self.q7.as_str()),
            ("q9", self.q9.as_str()),
            ("q10", self.q10.as_str()),
        ]
        .into_iter()
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct AnswerKeyFile {
    subjects: Subjects,
    expected: BTreeMap<String, toml::Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnswerKey {
    pub subjects: Subjects,
    expected: BTreeMap<String, Value>,
}

impl AnswerKey {
    /// The answer key shipped with the crate.
    pub fn builtin() -> Result<Self, ReconError> {
        Self::from_toml(BUILTIN_KEY)
    }

    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let file: AnswerKeyFile =
            toml::from_str(input).map_err(|e| ReconError::AnswerKey(e.to_string()))?;

        let mut expected = BTreeMap::new();
        for (label, raw) in file.expected {
            let value = match raw {
                toml::Value::Integer(i) => Value::Int(i),
                toml::Value::Float(f) if f.is_finite() => Value::Float(f),
                toml::Value::String(s) => Value::Text(s),
                other => {
                    return Err(ReconError::AnswerKey(format!(
                        "'{label}': expected a number or string, found {}",
                        other.type_str()
                    )))
                }
            };
            expected.insert(label, value);
        }

        let key = Self {
            subjects: file.subjects,
            expected,
        };
        key.validate()?;
        Ok(key)
    }

    /// Every battery label must have an answer, and every answer must belong
    /// to a battery label.
    pub fn validate(&self) -> Result<(), ReconError> {
        for (question, name) in self.subjects.iter() {
            if name.trim().is_empty() {
                return Err(ReconError::AnswerKey(format!("subject '{question}' is empty")));
            }
        }

        let labels = all_labels();
        if let Some(missing) = labels.iter().find(|l| !self.expected.contains_key(**l)) {
            return Err(ReconError::AnswerKey(format!("no expected value for '{missing}'")));
        }
        if let Some(unknown) = self.expected.keys().find(|k| !labels.contains(&k.as_str())) {
            return Err(ReconError::AnswerKey(format!("unknown label '{unknown}'")));
        }
        Ok(())
    }

    /// Expected value for a report line. Unknown labels are `Undefined`.
    pub fn expected(&self, label: &str) -> Value {
        self.expected.get(label).cloned().unwrap_or(Value::Undefined)
    }

    /// Labels and expected values, sorted by label.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.expected.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Render the key back to TOML (same shape as the built-in file).
    pub fn to_toml(&self) -> Result<String, ReconError> {
        let expected = self
            .expected
            .iter()
            .filter_map(|(label, value)| {
                let raw = match value {
                    Value::Int(i) => toml::Value::Integer(*i),
                    Value::Float(f) => toml::Value::Float(*f),
                    Value::Text(s) => toml::Value::String(s.clone()),
                    Value::Undefined => return None,
                };
                Some((label.clone(), raw))
            })
            .collect();
        let file = AnswerKeyFile {
            subjects: self.subjects.clone(),
            expected,
        };
        toml::to_string(&file).map_err(|e| ReconError::AnswerKey(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_key_is_complete() {
        let key = AnswerKey::builtin().unwrap();
        assert_eq!(key.subjects.q2, "Emma Ward");
        assert_eq!(key.subjects.q10, "Natalie Smith");
        assert_eq!(key.expected("Q1 Player"), Value::Text("Natalie Smith".into()));
        assert_eq!(key.expected("Q2 ExtraGoals"), Value::Int(6));
        assert_eq!(key.expected("Q10 NS goals per SOG %"), Value::Float(60.0));
        assert_eq!(key.entries().count(), all_labels().len());
    }

    #[test]
    fn unknown_label_lookup_is_undefined() {
        let key = AnswerKey::builtin().unwrap();
        assert_eq!(key.expected("Q11 Nothing"), Value::Undefined);
    }

    #[test]
    fn round_trips_through_toml() {
        let key = AnswerKey::builtin().unwrap();
        let rendered = key.to_toml().unwrap();
        assert_eq!(AnswerKey::from_toml(&rendered).unwrap(), key);
    }

    #[test]
    fn reject_missing_label() {
        let without = BUILTIN_KEY
            .lines()
            .filter(|l| !l.starts_with("\"Q6 Extra Goals\""))
            .collect::<Vec<_>>()
            .join("\n");
        let err = AnswerKey::from_toml(&without).unwrap_err();
        assert!(err.to_string().contains("Q6 Extra Goals"));
    }

    #[test]
    fn reject_unknown_label() {
        let with_typo = BUILTIN_KEY.replace("[expected]", "[expected]\n\"Q6 Extra Gaols\" = 25");
        let err = AnswerKey::from_toml(&with_typo).unwrap_err();
        assert!(err.to_string().contains("Q6 Extra Gaols"));
    }

    #[test]
    fn reject_empty_subject() {
        let blank = BUILTIN_KEY.replace("q7 = \"Emma Tyrrell\"", "q7 = \"  \"");
        let err = AnswerKey::from_toml(&blank).unwrap_err();
        assert!(err.to_string().contains("'q7'"));
    }

    #[test]
    fn reject_non_scalar_answer() {
        let bad = BUILTIN_KEY.replace("\"Q6 Extra Goals\" = 25", "\"Q6 Extra Goals\" = [25]");
        let err = AnswerKey::from_toml(&bad).unwrap_err();
        assert!(err.to_string().contains("found array"));
    }
}
