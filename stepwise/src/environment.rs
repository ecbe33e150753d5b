//! The state record threaded through step actions.
//!
//! An [`Environment`] is a plain value: cloning it yields a fully independent
//! copy. Executors clone once per dispatched branch, which is the only
//! isolation mechanism between concurrently running branches.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ordered key-value state passed to and mutated by every action.
///
/// Values are held as JSON. Non-finite floats (`NaN`, `±inf`) have no JSON
/// form and are stored as `null`; keep them out of the environment or wrap
/// them in a type that serializes them explicitly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Environment {
    values: Map<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// Non-finite floats become `null`, so reading them back as `f64` fails.
    pub fn insert<T: Serialize>(&mut self, key: impl Into<String>, value: T) -> Result<()> {
        let key = key.into();
        let value = serde_json::to_value(value).with_context(|| format!("serialize {key}"))?;
        self.values.insert(key, value);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Deserialize the value under `key`; missing keys are an error.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let value = self
            .values
            .get(key)
            .ok_or_else(|| anyhow!("environment has no key '{key}'"))?;
        serde_json::from_value(value.clone()).with_context(|| format!("decode '{key}'"))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Parse an environment from a JSON object.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw).context("parse environment json")?;
        match value {
            Value::Object(values) => Ok(Self { values }),
            other => Err(anyhow!(
                "environment must be a JSON object, got {}",
                json_type(&other)
            )),
        }
    }

    /// Load an environment from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("load environment {}", path.display()))
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_is_independent() {
        let mut parent = Environment::new();
        parent.insert("list", vec![1, 2]).expect("insert");

        let mut child = parent.clone();
        child.insert("list", vec![1, 2, 3]).expect("insert");
        child.insert("extra", true).expect("insert");

        assert_eq!(parent.get_as::<Vec<i64>>("list").expect("list"), vec![1, 2]);
        assert!(!parent.contains("extra"));
    }

    #[test]
    fn get_as_reports_missing_key() {
        let env = Environment::new();
        let err = env.get_as::<i64>("result").expect_err("missing");
        assert!(err.to_string().contains("result"));
    }

    #[test]
    fn from_json_rejects_non_objects() {
        let err = Environment::from_json_str("[1, 2]").expect_err("array");
        assert!(err.to_string().contains("an array"));

        let env = Environment::from_json_str(r#"{"x": 27, "y": 42}"#).expect("object");
        assert_eq!(env.get_as::<i64>("x").expect("x"), 27);
        assert_eq!(env.keys().collect::<Vec<_>>(), vec!["x", "y"]);
    }

    #[test]
    fn load_reads_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("env.json");
        fs::write(&path, r#"{"name": "lists"}"#).expect("write");
        let env = Environment::load(&path).expect("load");
        assert_eq!(env.get_as::<String>("name").expect("name"), "lists");
    }

    #[test]
    fn non_finite_floats_are_stored_as_null() {
        let mut env = Environment::new();
        env.insert("ratio", f64::NAN).expect("insert");
        env.insert("limit", f64::INFINITY).expect("insert");

        assert_eq!(env.get("ratio"), Some(&Value::Null));
        assert_eq!(env.get_as::<Option<f64>>("limit").expect("option"), None);
        assert!(env.get_as::<f64>("ratio").is_err());
    }
}
