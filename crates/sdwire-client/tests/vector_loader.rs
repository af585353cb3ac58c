//! JSON test vector loader shared by the batch vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct BatchVector {
    pub description: String,
    pub batch: String,
    #[serde(default)]
    pub messages: Vec<ExpectMessage>,
    #[serde(default)]
    pub errors: Vec<ExpectLineError>,
}

#[derive(Debug, Deserialize)]
pub struct ExpectMessage {
    pub room: String,
    pub kind: String,
    pub tag: Option<String>,
    pub value: serde_json::Value,
    #[serde(default)]
    pub kwargs: Option<serde_json::Value>,
    /// Re-encoded line when it differs from the input line.
    #[serde(default)]
    pub canonical: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExpectLineError {
    pub room: String,
    pub kind: String,
    pub tag: String,
    pub codes: Vec<String>,
    #[serde(default)]
    pub contains: Option<String>,
}

pub fn load(name: &str) -> Vec<BatchVector> {
    let s = fs::read_to_string(format!("tests/vectors/{name}")).unwrap();
    serde_json::from_str(&s).unwrap()
}
