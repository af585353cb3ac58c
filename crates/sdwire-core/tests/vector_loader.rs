//! JSON test vector loader shared by the leaf vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LeafVector {
    pub description: String,
    pub codec: String,
    pub token: Option<String>,
    #[serde(default)]
    pub expect: Option<serde_json::Value>,
    /// Re-encoded form when it differs from `token`.
    #[serde(default)]
    pub canonical: Option<String>,
    /// The value encodes to "no token at all".
    #[serde(default)]
    pub encodes_to_nothing: bool,
    #[serde(default)]
    pub expect_error: Option<ExpectError>,
}

#[derive(Debug, Deserialize)]
pub struct ExpectError {
    pub count: usize,
    #[serde(default)]
    pub contains: Option<String>,
}

pub fn load(name: &str) -> Vec<LeafVector> {
    let s = fs::read_to_string(format!("tests/vectors/{name}")).unwrap();
    serde_json::from_str(&s).unwrap()
}
