use ai_mitra::embeddings::Encoder;
use ai_mitra::embeddings::MockEncoder;
use ai_mitra::rag::Metadata;
use ai_mitra::rag::VectorStore;
use ai_mitra::AiMitraError;
use ai_mitra::Result;
use serde_json::json;
use tempfile::TempDir;

fn metadata(value: serde_json::Value) -> Metadata {
    match value {
        serde_json::Value::Object(map) => map,
        _ => Metadata::new(),
    }
}

fn seeded_store(encoder: &MockEncoder, texts: &[&str]) -> Result<VectorStore> {
    let mut store = VectorStore::new(encoder.dimension());
    for (i, text) in texts.iter().enumerate() {
        store.add(encoder.encode(text), metadata(json!({ "text": text, "n": i })))?;
    }
    Ok(store)
}

#[test]
fn test_added_vector_is_its_own_nearest_neighbour() -> Result<()> {
    let encoder = MockEncoder::default();
    let texts = ["wheat sowing", "tractor rental", "onion prices", "monsoon forecast"];
    let store = seeded_store(&encoder, &texts)?;

    for (i, text) in texts.iter().enumerate() {
        let hits = store.search(&encoder.encode(text), 1)?;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, i);
        assert!((hits[0].similarity - 1.0).abs() < 1e-5);
        assert_eq!(hits[0].metadata["text"], *text);
    }
    Ok(())
}

#[test]
fn test_ids_follow_insertion_order() -> Result<()> {
    let mut store = VectorStore::new(3);
    assert_eq!(store.add(vec![1.0, 0.0, 0.0], Metadata::new())?, 0);
    assert_eq!(store.add(vec![0.0, 1.0, 0.0], Metadata::new())?, 1);
    assert_eq!(store.add(vec![0.0, 0.0, 1.0], Metadata::new())?, 2);
    assert_eq!(store.len(), 3);
    Ok(())
}

#[test]
fn test_dimension_mismatch_leaves_store_untouched() -> Result<()> {
    let mut store = VectorStore::new(4);
    store.add(vec![0.1, 0.2, 0.3, 0.4], metadata(json!({"k": "v"})))?;
    let before = store.clone();

    for bad in [vec![], vec![1.0; 3], vec![1.0; 5]] {
        let len = bad.len();
        match store.add(bad, Metadata::new()) {
            Err(AiMitraError::DimensionMismatch { expected, actual }) => {
                assert_eq!(expected, 4);
                assert_eq!(actual, len);
            }
            other => panic!("expected dimension mismatch, got {other:?}"),
        }
    }

    assert_eq!(store, before);
    Ok(())
}

#[test]
fn test_search_orders_by_similarity_and_caps_k() -> Result<()> {
    let mut store = VectorStore::new(2);
    store.add(vec![0.0, 1.0], metadata(json!({"name": "north"})))?;
    store.add(vec![1.0, 0.0], metadata(json!({"name": "east"})))?;
    store.add(vec![1.0, 1.0], metadata(json!({"name": "north-east"})))?;

    let hits = store.search(&[1.0, 0.1], 10)?;
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].metadata["name"], "east");
    assert_eq!(hits[1].metadata["name"], "north-east");
    assert_eq!(hits[2].metadata["name"], "north");
    assert!(hits[0].similarity >= hits[1].similarity);
    assert!(hits[1].similarity >= hits[2].similarity);

    assert_eq!(store.search(&[1.0, 0.1], 2)?.len(), 2);
    assert!(VectorStore::new(2).search(&[1.0, 0.0], 5)?.is_empty());
    Ok(())
}

#[test]
fn test_search_rejects_query_of_wrong_length() -> Result<()> {
    let mut store = VectorStore::new(3);
    store.add(vec![1.0, 0.0, 0.0], metadata(json!({"name": "x"})))?;
    store.add(vec![0.0, 1.0, 5.0], metadata(json!({"name": "yz"})))?;

    for query in [vec![1.0_f32], vec![1.0, 0.0, 0.0, 0.0]] {
        let len = query.len();
        match store.search(&query, 2) {
            Err(AiMitraError::DimensionMismatch { expected, actual }) => {
                assert_eq!(expected, 3);
                assert_eq!(actual, len);
            }
            other => panic!("expected dimension mismatch, got {other:?}"),
        }
    }

    assert_eq!(store.search(&[1.0, 0.0, 0.0], 2)?[0].metadata["name"], "x");
    Ok(())
}

#[test]
fn test_save_then_load_reproduces_store() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("store.json");

    let encoder = MockEncoder::new(16);
    let store = seeded_store(&encoder, &["paddy", "cotton", "sugarcane"])?;
    store.save(&path)?;

    let mut fresh = VectorStore::new(16);
    fresh.load(&path)?;
    assert_eq!(fresh.dimension(), store.dimension());
    assert_eq!(fresh.vectors(), store.vectors());
    assert_eq!(fresh.metadata(), store.metadata());
    Ok(())
}

#[test]
fn test_load_replaces_existing_state() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("store.json");

    let mut saved = VectorStore::new(2);
    saved.add(vec![1.0, 2.0], metadata(json!({"from": "file"})))?;
    saved.save(&path)?;

    let mut target = VectorStore::new(3);
    target.add(vec![1.0, 1.0, 1.0], metadata(json!({"from": "memory"})))?;
    target.add(vec![2.0, 2.0, 2.0], Metadata::new())?;
    target.load(&path)?;

    assert_eq!(target.dimension(), 2);
    assert_eq!(target.len(), 1);
    assert_eq!(target.metadata()[0]["from"], "file");
    Ok(())
}

#[test]
fn test_persisted_format() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("store.json");

    let mut store = VectorStore::new(2);
    store.add(vec![0.5, 0.25], metadata(json!({"type": "meta"})))?;
    store.save(&path)?;

    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    assert_eq!(raw["dimension"], 2);
    assert_eq!(raw["vectors"], json!([[0.5, 0.25]]));
    assert_eq!(raw["metadata"], json!([{"type": "meta"}]));
    Ok(())
}
