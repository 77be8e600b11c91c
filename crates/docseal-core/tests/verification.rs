use docseal_canonical::{Canonicalizer, ContentIdentifier, HashingService, MetadataIdentifier};
use docseal_core::{
    async_trait, normalize, verification, Extraction, ExtractionError, Extractor,
    GenerationError, Generator, LookupOutcome, MemoryRegistry, MetadataRecord,
    NotarizationPipeline, PipelineConfig, RecordRef, Registry, RegistryError, Stamper,
    StamperConfig, Verifier,
};
use serde_json::{json, Value};
use std::sync::Arc;

struct Utf8Extractor;

#[async_trait]
impl Extractor for Utf8Extractor {
    async fn extract(&self, bytes: &[u8], _page_limit: u32) -> Result<Extraction, ExtractionError> {
        Ok(Extraction {
            text: String::from_utf8_lossy(bytes).trim().to_string(),
            pages_processed: 1,
        })
    }
}

struct PartiesGenerator;

#[async_trait]
impl Generator for PartiesGenerator {
    async fn generate(&self, _prompt: &str, _text: &str) -> Result<Value, GenerationError> {
        Ok(json!({"title": "Agreement", "parties": ["A", "B"], "tags": ["contract"]}))
    }
}

struct DownRegistry;

#[async_trait]
impl Registry for DownRegistry {
    async fn lookup_by_content_id(
        &self,
        _id: &ContentIdentifier,
    ) -> Result<Option<RecordRef>, RegistryError> {
        Err(RegistryError::Unavailable("rpc timeout".to_string()))
    }

    async fn lookup_by_metadata_id(
        &self,
        _id: &MetadataIdentifier,
    ) -> Result<Option<RecordRef>, RegistryError> {
        Err(RegistryError::Unavailable("rpc timeout".to_string()))
    }

    async fn register(
        &self,
        _content: &ContentIdentifier,
        _metadata: &MetadataIdentifier,
    ) -> Result<RecordRef, RegistryError> {
        Err(RegistryError::Unavailable("rpc timeout".to_string()))
    }
}

fn make_pipeline() -> NotarizationPipeline {
    let hashing = HashingService::default();
    NotarizationPipeline::new(
        Arc::new(Utf8Extractor),
        Stamper::new(
            StamperConfig::default(),
            hashing.clone(),
            Some(Arc::new(PartiesGenerator) as Arc<dyn Generator>),
        ),
        hashing,
        PipelineConfig::default(),
    )
}

fn make_verifier(registry: Arc<dyn Registry>) -> Verifier {
    Verifier::new(Some(registry), HashingService::default())
}

#[test]
fn lease_candidate_canonicalizes_to_fixed_string() {
    let record = normalize(&json!({"title": "Lease", "parties": ["A", "B"], "tags": []}));
    let canonical = Canonicalizer::new().canonicalize_serialize(&record).unwrap();
    assert_eq!(
        canonical.as_str(),
        concat!(
            r#"{"agent_version":"","date_iso":"","doc_type":"","extract_confidence":"","#,
            r#""model":"","model_hash":"","pages_processed":"","parties":["A","B"],"#,
            r#""pdf_text_sha256":"","prompt_hash":"","summary":"","tags":[],"title":"Lease"}"#
        )
    );
}

#[test]
fn key_order_and_extraneous_keys_do_not_change_identifier() {
    let forward: Value =
        serde_json::from_str(r#"{"title":"Lease","summary":"s","parties":["A"]}"#).unwrap();
    let reverse: Value = serde_json::from_str(
        r#"{"unrelated":{"x":1},"parties":["A"],"summary":"s","title":"Lease"}"#,
    )
    .unwrap();
    assert_eq!(
        verification::metadata_identifier(&forward).unwrap(),
        verification::metadata_identifier(&reverse).unwrap()
    );
}

#[test]
fn every_single_field_change_changes_identifier() {
    let base = json!({
        "title": "t", "summary": "s", "doc_type": "d", "date_iso": "2024-01-01",
        "parties": ["A", "B"], "tags": ["x"], "model": "m", "model_hash": "mh",
        "prompt_hash": "ph", "agent_version": "v1", "extract_confidence": "0.500",
        "pdf_text_sha256": "th", "pages_processed": "1"
    });
    let base_id = verification::metadata_identifier(&base).unwrap();

    for key in base.as_object().unwrap().keys() {
        let mut changed = base.clone();
        changed[key] = match &base[key] {
            Value::Array(_) => json!(["changed"]),
            _ => json!("changed"),
        };
        assert_ne!(
            verification::metadata_identifier(&changed).unwrap(),
            base_id,
            "changing {} must change the identifier",
            key
        );
    }
}

#[tokio::test]
async fn content_round_trip_after_registration() {
    let registry = Arc::new(MemoryRegistry::new());
    let notarization = make_pipeline().notarize(b"Bill of sale").await.unwrap();
    let record = registry
        .register(
            &notarization.content_identifier,
            &notarization.metadata_identifier,
        )
        .await
        .unwrap();

    let verifier = make_verifier(registry);
    let result = verifier.verify_content(b"Bill of sale").await;
    assert_eq!(result.content_identifier, notarization.content_identifier);
    assert_eq!(result.lookup, LookupOutcome::Found(record));

    let tampered = verifier.verify_content(b"Bill of sale.").await;
    assert_eq!(tampered.lookup, LookupOutcome::NotFound);
}

#[tokio::test]
async fn metadata_round_trip_and_reordered_parties() {
    let registry = Arc::new(MemoryRegistry::new());
    let notarization = make_pipeline().notarize(b"Agreement").await.unwrap();
    registry
        .register(
            &notarization.content_identifier,
            &notarization.metadata_identifier,
        )
        .await
        .unwrap();
    let verifier = make_verifier(registry);

    let mut submitted = serde_json::to_value(&notarization.metadata).unwrap();
    let verified = verifier.verify_metadata(&submitted).await.unwrap();
    assert!(verified.lookup.found());
    assert_eq!(verified.metadata_identifier, notarization.metadata_identifier);

    // Same record with its parties reordered must not match.
    let mut record: MetadataRecord = notarization.metadata.clone();
    assert_eq!(record.parties, vec!["A", "B"]);
    record.parties.reverse();
    submitted = serde_json::to_value(&record).unwrap();
    let reordered = verifier.verify_metadata(&submitted).await.unwrap();
    assert_ne!(reordered.metadata_identifier, notarization.metadata_identifier);
    assert_eq!(reordered.lookup, LookupOutcome::NotFound);
    assert!(reordered.lookup.performed());
}

#[tokio::test]
async fn partial_metadata_is_accepted_and_not_found() {
    let verifier = make_verifier(Arc::new(MemoryRegistry::new()));
    let result = verifier
        .verify_metadata(&json!({"title": 7, "parties": "A"}))
        .await
        .unwrap();
    assert_eq!(result.metadata.title, "7");
    assert!(result.metadata.parties.is_empty());
    assert_eq!(result.lookup, LookupOutcome::NotFound);
}

#[tokio::test]
async fn unavailable_registry_is_not_a_miss() {
    let verifier = make_verifier(Arc::new(DownRegistry));
    let result = verifier.verify_content(b"anything").await;
    assert!(!result.lookup.performed());
    assert!(!result.lookup.found());
    match &result.lookup {
        LookupOutcome::NotPerformed(reason) => assert!(reason.contains("rpc timeout")),
        other => panic!("expected NotPerformed, got {:?}", other),
    }
}

#[tokio::test]
async fn unavailable_registry_is_not_a_miss_for_metadata() {
    let verifier = make_verifier(Arc::new(DownRegistry));
    let result = verifier
        .verify_metadata(&json!({"title": "Lease", "parties": ["A", "B"]}))
        .await
        .unwrap();
    assert_eq!(result.metadata.title, "Lease");
    assert!(!result.lookup.performed());
    assert!(!result.lookup.found());
    match &result.lookup {
        LookupOutcome::NotPerformed(reason) => assert!(reason.contains("rpc timeout")),
        other => panic!("expected NotPerformed, got {:?}", other),
    }
    let view = serde_json::to_value(&result).unwrap();
    assert_eq!(view["found"], false);
    assert_eq!(view["lookup_performed"], false);
}

#[tokio::test]
async fn missing_registry_reports_not_configured() {
    let verifier = Verifier::new(None, HashingService::default());
    let result = verifier.verify_metadata(&json!({})).await.unwrap();
    assert_eq!(
        result.lookup,
        LookupOutcome::NotPerformed(verification::REGISTRY_NOT_CONFIGURED.to_string())
    );
}

#[tokio::test]
async fn lookup_serializes_to_found_shape() {
    let registry = Arc::new(MemoryRegistry::new());
    let id = HashingService::default().content_identifier(b"doc");
    let meta = HashingService::default().metadata_identifier(b"{}");
    registry.register(&id, &meta).await.unwrap();
    let verifier = make_verifier(registry);

    let found = serde_json::to_value(verifier.verify_content(b"doc").await).unwrap();
    assert_eq!(
        found,
        json!({
            "content_identifier": id.as_str(),
            "found": true,
            "record_id": "1",
            "lookup_performed": true
        })
    );

    let unconfigured = Verifier::new(None, HashingService::default());
    let missing = serde_json::to_value(unconfigured.verify_content(b"doc").await).unwrap();
    assert_eq!(missing["found"], false);
    assert_eq!(missing["lookup_performed"], false);
    assert_eq!(missing["reason"], verification::REGISTRY_NOT_CONFIGURED);
    assert!(missing.get("record_id").is_none());
}
