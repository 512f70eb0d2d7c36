use actix_web::{
    web::{self, Data, Json, Path, Query},
    HttpResponse, Result,
};
use chat_core::Turn;
use chat_pipeline::{ChatService, PipelineError};
use log::{error, info};
use plant_catalog::CatalogError;
use serde::{Deserialize, Serialize};
use turn_store::StoreError;

/// Request: submit a new user message
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub text: String,
    /// Client-generated id of the new user turn.
    pub client_id: String,
    pub sighting_id: Option<String>,
}

/// Request: edit an existing turn
#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub text: String,
}

/// Query: narrow a thread listing to one sighting
#[derive(Debug, Deserialize)]
pub struct ThreadQuery {
    pub sighting_id: Option<String>,
}

/// Response: id of the assistant turn to poll
#[derive(Debug, Serialize)]
pub struct ReplyResponse {
    pub assistant_turn_id: Option<String>,
}

/// DTO for a turn
#[derive(Debug, Serialize)]
pub struct TurnDTO {
    pub id: String,
    pub role: String,
    pub content: String,
    pub created_at: String,
    pub parent_id: Option<String>,
    pub edited: bool,
}

impl From<Turn> for TurnDTO {
    fn from(turn: Turn) -> Self {
        Self {
            id: turn.id,
            role: match turn.role {
                chat_core::Role::User => "user".to_string(),
                chat_core::Role::Assistant => "assistant".to_string(),
            },
            content: turn.content,
            created_at: turn.created_at.to_rfc3339(),
            parent_id: turn.parent_id,
            edited: turn.edited,
        }
    }
}

/// Response: error message
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(err: &PipelineError) -> HttpResponse {
    let body = ErrorResponse {
        error: err.to_string(),
    };
    match err {
        PipelineError::TurnNotFound(_) => HttpResponse::NotFound().json(body),
        PipelineError::Catalog(CatalogError::PlantNotFound(_)) => {
            HttpResponse::NotFound().json(body)
        }
        PipelineError::Store(StoreError::DuplicateId(_)) => HttpResponse::Conflict().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

/// POST /v1/chat/{plant_id}/messages
/// Submit a user message and start a generation cycle.
pub async fn submit(
    path: Path<String>,
    request: Json<SubmitRequest>,
    service: Data<ChatService>,
) -> Result<HttpResponse> {
    let plant_id = path.into_inner();
    info!("submit message for plant {plant_id}");

    match service
        .submit(
            &plant_id,
            request.sighting_id.as_deref(),
            &request.text,
            &request.client_id,
        )
        .await
    {
        Ok(assistant_turn_id) => Ok(HttpResponse::Ok().json(ReplyResponse {
            assistant_turn_id: Some(assistant_turn_id),
        })),
        Err(e) => {
            error!("submit failed for plant {plant_id}: {e}");
            Ok(error_response(&e))
        }
    }
}

/// PUT /v1/chat/{plant_id}/messages/{turn_id}
/// Edit a turn; later turns are invalidated, user edits regenerate.
pub async fn edit(
    path: Path<(String, String)>,
    request: Json<EditRequest>,
    service: Data<ChatService>,
) -> Result<HttpResponse> {
    let (plant_id, turn_id) = path.into_inner();
    info!("edit turn {turn_id} for plant {plant_id}");

    match service.edit(&plant_id, &turn_id, &request.text).await {
        Ok(assistant_turn_id) => {
            Ok(HttpResponse::Ok().json(ReplyResponse { assistant_turn_id }))
        }
        Err(e) => {
            error!("edit failed for turn {turn_id}: {e}");
            Ok(error_response(&e))
        }
    }
}

/// DELETE /v1/chat/{plant_id}/messages/{turn_id}
/// Delete a turn and everything after it.
pub async fn delete(
    path: Path<(String, String)>,
    service: Data<ChatService>,
) -> Result<HttpResponse> {
    let (plant_id, turn_id) = path.into_inner();
    info!("delete turn {turn_id} for plant {plant_id}");

    match service.delete(&plant_id, &turn_id).await {
        Ok(()) => Ok(HttpResponse::NoContent().finish()),
        Err(e) => {
            error!("delete failed for turn {turn_id}: {e}");
            Ok(error_response(&e))
        }
    }
}

/// GET /v1/chat/{plant_id}/messages
/// The poll surface: the whole thread in creation order.
pub async fn list(
    path: Path<String>,
    query: Query<ThreadQuery>,
    service: Data<ChatService>,
) -> Result<HttpResponse> {
    let plant_id = path.into_inner();

    match service
        .thread(&plant_id, query.sighting_id.as_deref())
        .await
    {
        Ok(turns) => {
            let dtos: Vec<TurnDTO> = turns.into_iter().map(TurnDTO::from).collect();
            Ok(HttpResponse::Ok().json(dtos))
        }
        Err(e) => {
            error!("thread listing failed for plant {plant_id}: {e}");
            Ok(error_response(&e))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/chat")
            .route("/{plant_id}/messages", web::post().to(submit))
            .route("/{plant_id}/messages", web::get().to(list))
            .route("/{plant_id}/messages/{turn_id}", web::put().to(edit))
            .route("/{plant_id}/messages/{turn_id}", web::delete().to(delete)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use async_trait::async_trait;
    use chat_llm::{LlmChunk, LlmProvider, LlmStream};
    use plant_catalog::{MemoryCatalog, PlantRecord};
    use std::sync::Arc;
    use turn_store::MemoryTurnStore;

    struct CannedProvider;

    #[async_trait]
    impl LlmProvider for CannedProvider {
        async fn complete_stream(&self, _prompt: &str) -> chat_llm::Result<LlmStream> {
            Ok(Box::pin(futures::stream::iter(vec![
                Ok(LlmChunk::Token("An answer.".to_string())),
                Ok(LlmChunk::Done),
            ])))
        }
    }

    fn test_service() -> Data<ChatService> {
        let catalog = MemoryCatalog::new().with_plant(PlantRecord {
            id: "p1".into(),
            name: Some("Yarrow".into()),
            ..Default::default()
        });
        Data::new(ChatService::new(
            Arc::new(MemoryTurnStore::new()),
            Arc::new(catalog),
            Arc::new(CannedProvider),
        ))
    }

    #[actix_web::test]
    async fn test_submit_then_poll_round_trip() {
        let app = test::init_service(
            App::new()
                .app_data(test_service())
                .service(web::scope("/v1").configure(config)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/v1/chat/p1/messages")
            .set_json(serde_json::json!({ "text": "hello?", "client_id": "u1" }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["assistant_turn_id"].is_string());

        let req = test::TestRequest::get()
            .uri("/v1/chat/p1/messages")
            .to_request();
        let turns: Vec<serde_json::Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0]["role"], "user");
        assert_eq!(turns[1]["role"], "assistant");
        assert_eq!(turns[1]["content"], "An answer.");
    }

    #[actix_web::test]
    async fn test_edit_unknown_turn_is_404() {
        let app = test::init_service(
            App::new()
                .app_data(test_service())
                .service(web::scope("/v1").configure(config)),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/v1/chat/p1/messages/ghost")
            .set_json(serde_json::json!({ "text": "reworded" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }

    #[actix_web::test]
    async fn test_delete_removes_turn_and_later_ones() {
        let service = test_service();
        let app = test::init_service(
            App::new()
                .app_data(service.clone())
                .service(web::scope("/v1").configure(config)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/v1/chat/p1/messages")
            .set_json(serde_json::json!({ "text": "hello?", "client_id": "u1" }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let reply_id = body["assistant_turn_id"].as_str().unwrap().to_string();

        let req = test::TestRequest::delete()
            .uri(&format!("/v1/chat/p1/messages/{reply_id}"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 204);

        let turns = service.thread("p1", None).await.unwrap();
        assert_eq!(turns.len(), 1);
    }
}
