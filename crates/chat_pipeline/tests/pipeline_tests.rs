//! End-to-end pipeline tests: submit, poll, edit and delete against an
//! in-memory store and a scripted provider.

use std::sync::Arc;

use async_trait::async_trait;
use chat_core::{Role, FALLBACK_REPLY, SENTINEL};
use chat_llm::{LlmChunk, LlmError, LlmProvider, LlmStream};
use chat_pipeline::{ChatService, PipelineError};
use plant_catalog::{MemoryCatalog, PlantRecord};
use turn_store::{MemoryTurnStore, TurnStore};

/// Provider that streams a fixed answer, or fails on request.
struct ScriptedProvider {
    fragments: Vec<String>,
    fail: bool,
    omit_done: bool,
}

impl ScriptedProvider {
    fn answering(answer: &str) -> Self {
        Self {
            fragments: answer
                .split_inclusive(' ')
                .map(str::to_string)
                .collect(),
            fail: false,
            omit_done: false,
        }
    }

    /// Streams the answer but drops the connection before the
    /// end-of-stream marker.
    fn truncating(answer: &str) -> Self {
        Self {
            omit_done: true,
            ..Self::answering(answer)
        }
    }

    fn failing() -> Self {
        Self {
            fragments: vec![],
            fail: true,
            omit_done: false,
        }
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn complete_stream(&self, _prompt: &str) -> chat_llm::Result<LlmStream> {
        if self.fail {
            return Err(LlmError::Api("HTTP 500: upstream broke".to_string()));
        }
        let mut items: Vec<chat_llm::Result<LlmChunk>> = self
            .fragments
            .iter()
            .map(|f| Ok(LlmChunk::Token(f.clone())))
            .collect();
        if !self.omit_done {
            items.push(Ok(LlmChunk::Done));
        }
        Ok(Box::pin(futures::stream::iter(items)))
    }
}

fn catalog() -> MemoryCatalog {
    MemoryCatalog::new()
        .with_plant(PlantRecord {
            id: "p1".into(),
            name: Some("Yarrow".into()),
            tags: vec!["medicinal".into()],
            ..Default::default()
        })
        .with_plant(PlantRecord {
            id: "p2".into(),
            name: Some("Nettle".into()),
            ..Default::default()
        })
}

fn service_with(provider: ScriptedProvider) -> (ChatService, Arc<MemoryTurnStore>) {
    let store = Arc::new(MemoryTurnStore::new());
    let service = ChatService::new(store.clone(), Arc::new(catalog()), Arc::new(provider));
    (service, store)
}

#[tokio::test]
async fn test_submit_on_empty_thread_produces_user_and_assistant_turn() {
    let answer = "Dry the leaves and steep them as a tea.";
    let (service, _store) = service_with(ScriptedProvider::answering(answer));

    let reply_id = service
        .submit("p1", None, "How do I prepare this?", "u1")
        .await
        .unwrap();

    let turns = service.thread("p1", None).await.unwrap();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].role, Role::User);
    assert_eq!(turns[0].id, "u1");
    assert_eq!(turns[1].role, Role::Assistant);
    assert_eq!(turns[1].id, reply_id);
    assert_eq!(turns[1].parent_id.as_deref(), Some("u1"));
    assert_eq!(turns[1].content, answer);
    assert!(turns[1].content.split_whitespace().count() <= 120);
}

#[tokio::test]
async fn test_two_submits_alternate_user_assistant_in_order() {
    let (service, _store) = service_with(ScriptedProvider::answering("Yes, you can."));

    service.submit("p1", None, "first?", "u1").await.unwrap();
    service.submit("p1", None, "second?", "u2").await.unwrap();

    let turns = service.thread("p1", None).await.unwrap();
    assert_eq!(turns.len(), 4);
    let roles: Vec<_> = turns.iter().map(|t| t.role).collect();
    assert_eq!(
        roles,
        vec![Role::User, Role::Assistant, Role::User, Role::Assistant]
    );
    assert!(turns
        .windows(2)
        .all(|w| w[0].created_at < w[1].created_at));
}

#[tokio::test]
async fn test_edit_first_user_turn_prunes_and_regenerates() {
    let (service, _store) = service_with(ScriptedProvider::answering("Sure."));

    service.submit("p1", None, "first?", "u1").await.unwrap();
    service.submit("p1", None, "second?", "u2").await.unwrap();

    let reply_id = service
        .edit("p1", "u1", "first, reworded?")
        .await
        .unwrap()
        .expect("user edit regenerates");

    let turns = service.thread("p1", None).await.unwrap();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].id, "u1");
    assert_eq!(turns[0].content, "first, reworded?");
    assert!(turns[0].edited);
    assert!(turns[0].edited_at.is_some());
    assert_eq!(turns[1].id, reply_id);
    assert_eq!(turns[1].parent_id.as_deref(), Some("u1"));
}

#[tokio::test]
async fn test_edit_keeps_id_and_created_at() {
    let (service, _store) = service_with(ScriptedProvider::answering("Sure."));

    service.submit("p1", None, "first?", "u1").await.unwrap();
    let before = service.thread("p1", None).await.unwrap();

    service.edit("p1", "u1", "reworded?").await.unwrap();

    let after = service.thread("p1", None).await.unwrap();
    assert_eq!(after[0].id, before[0].id);
    assert_eq!(after[0].created_at, before[0].created_at);
}

#[tokio::test]
async fn test_edit_assistant_turn_does_not_regenerate() {
    let (service, _store) = service_with(ScriptedProvider::answering("Sure."));

    let reply_id = service.submit("p1", None, "first?", "u1").await.unwrap();

    let result = service
        .edit("p1", &reply_id, "corrected answer")
        .await
        .unwrap();
    assert!(result.is_none());

    let turns = service.thread("p1", None).await.unwrap();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[1].content, "corrected answer");
    assert!(!turns[1].edited);
}

#[tokio::test]
async fn test_delete_assistant_turn_keeps_earlier_user_turn() {
    let (service, _store) = service_with(ScriptedProvider::answering("Sure."));

    let reply_id = service.submit("p1", None, "first?", "u1").await.unwrap();
    service.delete("p1", &reply_id).await.unwrap();

    let turns = service.thread("p1", None).await.unwrap();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].id, "u1");
}

#[tokio::test]
async fn test_delete_user_turn_removes_everything_after_it() {
    let (service, _store) = service_with(ScriptedProvider::answering("Sure."));

    service.submit("p1", None, "first?", "u1").await.unwrap();
    service.submit("p1", None, "second?", "u2").await.unwrap();

    service.delete("p1", "u1").await.unwrap();
    assert!(service.thread("p1", None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_edit_and_delete_unknown_turn_fail_without_mutation() {
    let (service, _store) = service_with(ScriptedProvider::answering("Sure."));
    service.submit("p1", None, "first?", "u1").await.unwrap();

    let edit_err = service.edit("p1", "ghost", "x").await.unwrap_err();
    assert!(matches!(edit_err, PipelineError::TurnNotFound(_)));

    let delete_err = service.delete("p1", "ghost").await.unwrap_err();
    assert!(matches!(delete_err, PipelineError::TurnNotFound(_)));

    assert_eq!(service.thread("p1", None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_provider_failure_leaves_fallback_not_sentinel() {
    let (service, _store) = service_with(ScriptedProvider::failing());

    let reply_id = service.submit("p1", None, "first?", "u1").await.unwrap();

    let turns = service.thread("p1", None).await.unwrap();
    let reply = turns.iter().find(|t| t.id == reply_id).unwrap();
    assert_eq!(reply.content, FALLBACK_REPLY);
    assert!(turns.iter().all(|t| t.content != SENTINEL));
}

#[tokio::test]
async fn test_truncated_stream_leaves_fallback_not_partial_answer() {
    let (service, _store) = service_with(ScriptedProvider::truncating("Dry the leaves."));

    let reply_id = service.submit("p1", None, "first?", "u1").await.unwrap();

    let turns = service.thread("p1", None).await.unwrap();
    let reply = turns.iter().find(|t| t.id == reply_id).unwrap();
    assert_eq!(reply.content, FALLBACK_REPLY);
}

#[tokio::test]
async fn test_duplicate_client_id_is_rejected() {
    let (service, _store) = service_with(ScriptedProvider::answering("Sure."));

    service.submit("p1", None, "first?", "u1").await.unwrap();
    let err = service.submit("p1", None, "again?", "u1").await.unwrap_err();
    assert!(matches!(err, PipelineError::Store(_)));
}

#[tokio::test]
async fn test_sighting_threads_are_separate() {
    let (service, store) = service_with(ScriptedProvider::answering("Sure."));

    service.submit("p1", None, "plant-wide?", "u1").await.unwrap();
    service
        .submit("p1", Some("s1"), "about this sighting?", "u2")
        .await
        .unwrap();

    // Narrowed poll sees only the sighting thread
    let sighting_turns = service.thread("p1", Some("s1")).await.unwrap();
    assert_eq!(sighting_turns.len(), 2);
    assert!(sighting_turns.iter().all(|t| t
        .thread
        .sighting_id
        .as_deref()
        == Some("s1")));

    // Deleting the sighting-thread user turn leaves the plant thread alone
    service.delete("p1", "u2").await.unwrap();
    let remaining = store.list_by_thread("p1", None).await.unwrap();
    assert_eq!(remaining.len(), 2);
    assert!(remaining.iter().all(|t| t.thread.sighting_id.is_none()));
}

#[tokio::test]
async fn test_unknown_plant_propagates_catalog_error() {
    let (service, store) = service_with(ScriptedProvider::answering("Sure."));

    let err = service.submit("nope", None, "hi", "u1").await.unwrap_err();
    assert!(matches!(err, PipelineError::Catalog(_)));

    // The user turn was appended before context assembly failed; no
    // assistant placeholder exists.
    let turns = store.list_by_thread("nope", None).await.unwrap();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].role, Role::User);
}
