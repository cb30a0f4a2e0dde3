//! User CRUD routes.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use storefront_core::UserId;
use storefront_http::json_error;
use storefront_users::{NewUser, User, UserStore};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_user).get(list_users))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

fn parse_id(raw: &str) -> Result<UserId, axum::response::Response> {
    raw.parse()
        .map_err(|_| json_error(StatusCode::BAD_REQUEST, "Invalid user id"))
}

async fn create_user(
    Extension(store): Extension<Arc<dyn UserStore>>,
    Json(body): Json<NewUser>,
) -> axum::response::Response {
    if let Err(e) = body.validate() {
        tracing::warn!("user validation failed: {e}");
        return json_error(StatusCode::BAD_REQUEST, e.to_string());
    }

    match store.insert(User::new(body)).await {
        Ok(user) => {
            tracing::info!("user created successfully: {}", user.id);
            (StatusCode::CREATED, Json(user)).into_response()
        }
        Err(e) => {
            tracing::error!("error creating user: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Error creating user")
        }
    }
}

async fn list_users(
    Extension(store): Extension<Arc<dyn UserStore>>,
) -> axum::response::Response {
    match store.find_all().await {
        Ok(users) => Json(users).into_response(),
        Err(e) => {
            tracing::error!("error retrieving users: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving users")
        }
    }
}

async fn get_user(
    Extension(store): Extension<Arc<dyn UserStore>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match store.find_by_id(id).await {
        Ok(Some(user)) => Json(user).into_response(),
        Ok(None) => json_error(StatusCode::NOT_FOUND, "User not found"),
        Err(e) => {
            tracing::error!("error retrieving user: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving user")
        }
    }
}

async fn update_user(
    Extension(store): Extension<Arc<dyn UserStore>>,
    Path(id): Path<String>,
    Json(body): Json<NewUser>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    if let Err(e) = body.validate() {
        tracing::warn!("user validation failed: {e}");
        return json_error(StatusCode::BAD_REQUEST, e.to_string());
    }

    let mut user = match store.find_by_id(id).await {
        Ok(Some(user)) => user,
        Ok(None) => return json_error(StatusCode::NOT_FOUND, "User not found"),
        Err(e) => {
            tracing::error!("error updating user: {e}");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Error updating user");
        }
    };

    user.update_from(body);
    match store.save(user).await {
        Ok(user) => {
            tracing::info!("user updated successfully: {}", user.id);
            Json(user).into_response()
        }
        Err(e) => {
            tracing::error!("error updating user: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Error updating user")
        }
    }
}

async fn delete_user(
    Extension(store): Extension<Arc<dyn UserStore>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match store.delete(id).await {
        Ok(true) => {
            tracing::info!("user deleted successfully: {id}");
            Json(json!({"message": "User deleted successfully"})).into_response()
        }
        Ok(false) => json_error(StatusCode::NOT_FOUND, "User not found"),
        Err(e) => {
            tracing::error!("error deleting user: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Error deleting user")
        }
    }
}
