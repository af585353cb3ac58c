//! Leaf codec vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use sdwire_core::protocol::{
    array, details, hp, json, nullable, number, optional, pokemon, text, username, Codec,
};

mod vector_loader;
use vector_loader::load;

fn codec(name: &str) -> Codec {
    match name {
        "text" => text(),
        "number" => number(),
        "json" => json::<serde_json::Value>(),
        "pokemon" => pokemon(),
        "hp" => hp(),
        "username" => username(),
        "details" => details(),
        "optional_number" => optional(number()),
        "nullable_number" => nullable(number()),
        "number_list" => array(number()),
        "username_list" => array(username()),
        other => panic!("unknown codec in vector: {other}"),
    }
}

#[test]
fn leaf_vectors() {
    for v in load("leaves.json") {
        let c = codec(&v.codec);
        let res = c.decode(v.token.as_deref());

        if let Some(err) = v.expect_error {
            let errs = res.expect_err(&v.description);
            assert_eq!(errs.len(), err.count, "vector={} errs={errs:?}", v.description);
            if let Some(needle) = err.contains {
                assert!(errs.iter().any(|e| e.contains(&needle)), "vector={} errs={errs:?}", v.description);
            }
            continue;
        }

        let value = res.unwrap_or_else(|e| panic!("vector={} errs={e:?}", v.description));
        // A JSON `null` expectation deserializes as `None`.
        let ex = v.expect.unwrap_or(serde_json::Value::Null);
        assert_eq!(value.to_json(), ex, "vector={}", v.description);

        let encoded = c.encode(&value).unwrap();
        let want = if v.encodes_to_nothing {
            None
        } else {
            v.canonical.or(v.token)
        };
        assert_eq!(encoded, want, "vector={}", v.description);
    }
}
