use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::models::UserPayload;
use crate::services::user_service;
use crate::store::UserStore;
use crate::utils::error::AppError;

/// Monta as rotas CRUD de usuários sob /api/users.
///
/// Cada resource ganha uma rota catch-all para responder 405 em métodos
/// não suportados em vez de cair no 404 global.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_error_config()).service(
        web::scope("/api/users")
            .service(
                web::resource("")
                    .route(web::get().to(get_users))
                    .route(web::post().to(create_user))
                    .route(web::route().to(method_not_allowed)),
            )
            .service(
                web::resource("/{user_id}")
                    .route(web::get().to(get_user))
                    .route(web::put().to(update_user))
                    .route(web::delete().to(delete_user))
                    .route(web::route().to(method_not_allowed)),
            ),
    );
}

/// Body ausente ou não-JSON vira 400 com envelope padrão em vez do erro
/// default do actix
fn json_error_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = match &err {
            actix_web::error::JsonPayloadError::ContentType => "Request must be JSON",
            _ => "Request body is required",
        };
        let response = HttpResponse::BadRequest().json(json!({
            "success": false,
            "error": message
        }));
        actix_web::error::InternalError::from_response(err, response).into()
    })
}

fn error_response(err: AppError) -> HttpResponse {
    match err {
        AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
            "success": false,
            "error": msg
        })),
        AppError::Validation(details) => {
            log::warn!("⚠️ Validation failed: {:?}", details);
            HttpResponse::BadRequest().json(json!({
                "success": false,
                "error": "Validation failed",
                "details": details
            }))
        }
        AppError::Internal(msg) => {
            // Detalhe interno só no log, nunca na resposta
            log::error!("❌ Internal error: {}", msg);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "error": "Internal server error"
            }))
        }
    }
}

/// GET /api/users - Lista todos os usuários
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "List of users with count"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_users(store: web::Data<UserStore>) -> impl Responder {
    log::info!("📋 GET /api/users - Listing users");

    match user_service::list_users(&store) {
        Ok(users) => HttpResponse::Ok().json(json!({
            "success": true,
            "data": users,
            "count": users.len()
        })),
        Err(e) => error_response(e),
    }
}

/// GET /api/users/{user_id} - Busca usuário específico
#[utoipa::path(
    get,
    path = "/api/users/{user_id}",
    tag = "Users",
    params(("user_id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = crate::models::User),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(store: web::Data<UserStore>, path: web::Path<String>) -> impl Responder {
    let user_id = path.into_inner();
    log::info!("🔍 GET /api/users/{} - Fetching user", user_id);

    match user_service::get_user(&store, &user_id) {
        Ok(user) => HttpResponse::Ok().json(json!({
            "success": true,
            "data": user
        })),
        Err(e) => error_response(e),
    }
}

/// POST /api/users - Cria novo usuário
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = crate::models::UserPayload,
    responses(
        (status = 201, description = "User created", body = crate::models::User),
        (status = 400, description = "Malformed body or validation errors")
    )
)]
pub async fn create_user(
    store: web::Data<UserStore>,
    payload: web::Json<UserPayload>,
) -> impl Responder {
    log::info!("📝 POST /api/users - Creating user");

    let payload = payload.into_inner();
    if payload.is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "success": false,
            "error": "Request body is required"
        }));
    }

    match user_service::create_user(&store, &payload) {
        Ok(user) => HttpResponse::Created().json(json!({
            "success": true,
            "data": user,
            "message": "User created successfully"
        })),
        Err(e) => error_response(e),
    }
}

/// PUT /api/users/{user_id} - Atualiza usuário (campos esparsos)
#[utoipa::path(
    put,
    path = "/api/users/{user_id}",
    tag = "Users",
    params(("user_id" = String, Path, description = "User ID")),
    request_body = crate::models::UserPayload,
    responses(
        (status = 200, description = "User updated", body = crate::models::User),
        (status = 400, description = "Malformed body or validation errors"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    store: web::Data<UserStore>,
    path: web::Path<String>,
    payload: web::Json<UserPayload>,
) -> impl Responder {
    let user_id = path.into_inner();
    log::info!("🔧 PUT /api/users/{} - Updating user", user_id);

    let payload = payload.into_inner();
    if payload.is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "success": false,
            "error": "Request body is required"
        }));
    }

    match user_service::update_user(&store, &user_id, &payload) {
        Ok(user) => HttpResponse::Ok().json(json!({
            "success": true,
            "data": user,
            "message": "User updated successfully"
        })),
        Err(e) => error_response(e),
    }
}

/// DELETE /api/users/{user_id} - Remove usuário
#[utoipa::path(
    delete,
    path = "/api/users/{user_id}",
    tag = "Users",
    params(("user_id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = crate::models::User),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(store: web::Data<UserStore>, path: web::Path<String>) -> impl Responder {
    let user_id = path.into_inner();
    log::info!("🗑️  DELETE /api/users/{} - Removing user", user_id);

    match user_service::delete_user(&store, &user_id) {
        Ok(user) => HttpResponse::Ok().json(json!({
            "success": true,
            "data": user,
            "message": "User deleted successfully"
        })),
        Err(e) => error_response(e),
    }
}

/// Fallback global para rotas desconhecidas
pub async fn endpoint_not_found() -> impl Responder {
    HttpResponse::NotFound().json(json!({
        "success": false,
        "error": "Endpoint not found"
    }))
}

/// Fallback por resource para métodos não suportados
pub async fn method_not_allowed() -> impl Responder {
    HttpResponse::MethodNotAllowed().json(json!({
        "success": false,
        "error": "Method not allowed"
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::Value;

    // init_service retorna um tipo opaco, então os helpers são macros
    macro_rules! spawn_app {
        () => {{
            let store = web::Data::new(UserStore::new());
            test::init_service(
                App::new()
                    .app_data(store)
                    .configure(configure)
                    .default_service(web::route().to(endpoint_not_found)),
            )
            .await
        }};
    }

    macro_rules! post_user {
        ($app:expr, $body:expr) => {{
            let req = test::TestRequest::post()
                .uri("/api/users")
                .set_json(&$body)
                .to_request();
            test::call_service(&$app, req).await
        }};
    }

    #[actix_rt::test]
    async fn test_create_normalizes_and_lists() {
        let app = spawn_app!();

        let resp = post_user!(app, serde_json::json!({
            "name": "Jo",
            "email": "Jo@Example.com",
            "age": 30
        }));
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["email"], "jo@example.com");
        assert_eq!(body["message"], "User created successfully");

        let req = test::TestRequest::get().uri("/api/users").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["data"][0]["email"], "jo@example.com");
    }

    #[actix_rt::test]
    async fn test_duplicate_email_returns_details() {
        let app = spawn_app!();

        let resp = post_user!(app, serde_json::json!({
            "name": "Jo",
            "email": "jo@example.com",
            "age": 30
        }));
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = post_user!(app, serde_json::json!({
            "name": "Al",
            "email": "jo@example.com",
            "age": 22
        }));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["details"][0], "Email is already taken");
    }

    #[actix_rt::test]
    async fn test_validation_errors_are_itemized() {
        let app = spawn_app!();

        let resp = post_user!(app, serde_json::json!({
            "name": "J",
            "email": "not-an-email",
            "age": "abc"
        }));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        let details = body["details"].as_array().expect("details array");
        assert_eq!(details.len(), 3);
        assert_eq!(details[0], "Name must be at least 2 characters long");
        assert_eq!(details[1], "Email format is invalid");
        assert_eq!(details[2], "Age must be a positive integer between 1 and 150");
    }

    #[actix_rt::test]
    async fn test_get_unknown_user_is_404() {
        let app = spawn_app!();

        let req = test::TestRequest::get()
            .uri("/api/users/does-not-exist")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "User not found");
    }

    #[actix_rt::test]
    async fn test_sparse_update_changes_only_age() {
        let app = spawn_app!();

        let resp = post_user!(app, serde_json::json!({
            "name": "Jo",
            "email": "jo@example.com",
            "age": 30
        }));
        let body: Value = test::read_body_json(resp).await;
        let id = body["data"]["id"].as_str().expect("id").to_string();

        let req = test::TestRequest::put()
            .uri(&format!("/api/users/{}", id))
            .set_json(serde_json::json!({ "age": 31 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["name"], "Jo");
        assert_eq!(body["data"]["email"], "jo@example.com");
        assert_eq!(body["data"]["age"], 31);
    }

    #[actix_rt::test]
    async fn test_delete_twice_is_404() {
        let app = spawn_app!();

        let resp = post_user!(app, serde_json::json!({
            "name": "Jo",
            "email": "jo@example.com",
            "age": 30
        }));
        let body: Value = test::read_body_json(resp).await;
        let id = body["data"]["id"].as_str().expect("id").to_string();

        let req = test::TestRequest::delete()
            .uri(&format!("/api/users/{}", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "User deleted successfully");

        let req = test::TestRequest::delete()
            .uri(&format!("/api/users/{}", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_rt::test]
    async fn test_empty_body_object_is_rejected() {
        let app = spawn_app!();

        let resp = post_user!(app, serde_json::json!({}));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Request body is required");
    }

    #[actix_rt::test]
    async fn test_non_json_content_type_is_rejected() {
        let app = spawn_app!();

        let req = test::TestRequest::post()
            .uri("/api/users")
            .insert_header(("content-type", "text/plain"))
            .set_payload("name=Jo")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Request must be JSON");
    }

    #[actix_rt::test]
    async fn test_unknown_endpoint_is_404() {
        let app = spawn_app!();

        let req = test::TestRequest::get().uri("/api/unknown").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Endpoint not found");
    }

    #[actix_rt::test]
    async fn test_unsupported_method_is_405() {
        let app = spawn_app!();

        let req = test::TestRequest::patch().uri("/api/users").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Method not allowed");
    }
}
