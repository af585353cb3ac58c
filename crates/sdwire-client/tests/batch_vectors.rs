#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod vector_loader;

use sdwire_client::Dispatcher;
use vector_loader::load;

#[test]
fn batch_vectors() {
    let dispatcher = Dispatcher::standard().unwrap();

    for v in load("batches.json") {
        let batch = dispatcher.decode_batch(&v.batch);
        assert_eq!(batch.messages.len(), v.messages.len(), "{}: message count", v.description);
        assert_eq!(batch.errors.len(), v.errors.len(), "{}: error count", v.description);

        for (got, want) in batch.messages.iter().zip(&v.messages) {
            assert_eq!(got.room, want.room, "{}: room of {:?}", v.description, got.raw);
            assert_eq!(got.kind.as_str(), want.kind, "{}: kind of {:?}", v.description, got.raw);
            assert_eq!(got.tag, want.tag, "{}: tag of {:?}", v.description, got.raw);
            assert_eq!(got.payload.to_json(), want.value, "{}: value of {:?}", v.description, got.raw);

            let kwargs = want.kwargs.clone().unwrap_or_else(|| serde_json::json!({}));
            assert_eq!(got.kwargs.to_json(), kwargs, "{}: kwargs of {:?}", v.description, got.raw);

            let line = dispatcher.reencode(got).unwrap();
            let expected = want.canonical.as_deref().unwrap_or(&got.raw);
            assert_eq!(line, expected, "{}: re-encode", v.description);
        }

        for (got, want) in batch.errors.iter().zip(&v.errors) {
            assert_eq!(got.room, want.room, "{}: room of {:?}", v.description, got.raw);
            assert_eq!(got.kind.as_str(), want.kind, "{}: kind of {:?}", v.description, got.raw);
            assert_eq!(got.tag, want.tag, "{}: tag of {:?}", v.description, got.raw);
            let codes: Vec<&str> = got.errors.iter().map(|e| e.code().as_str()).collect();
            assert_eq!(codes, want.codes, "{}: codes of {:?}", v.description, got.raw);
            if let Some(needle) = &want.contains {
                assert!(
                    got.messages().iter().any(|m| m.contains(needle.as_str())),
                    "{}: {:?} not in {:?}",
                    v.description,
                    needle,
                    got.messages()
                );
            }
        }
    }
}
