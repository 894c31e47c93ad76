// ==================== USER CRUD SERVICE ====================
// Orquestra validate-then-mutate sob um único write lock por requisição,
// mantendo unicidade de email e checagem de existência atômicas frente a
// mutações concorrentes.

use crate::models::{User, UserPayload};
use crate::services::validation::{self, ValidationMode};
use crate::store::UserStore;
use crate::utils::error::AppError;

pub fn list_users(store: &UserStore) -> Result<Vec<User>, AppError> {
    let users = store.read()?;
    Ok(users.list().to_vec())
}

pub fn get_user(store: &UserStore, user_id: &str) -> Result<User, AppError> {
    let users = store.read()?;
    users
        .get(user_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

pub fn create_user(store: &UserStore, payload: &UserPayload) -> Result<User, AppError> {
    let mut users = store.write()?;

    let errors = validation::validate_payload(&users, payload, ValidationMode::Create, None);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    // Validação garante que os três campos estão presentes e bem formados
    let name = payload.name.as_deref().unwrap_or_default().trim().to_string();
    let email = validation::normalize_email(payload.email.as_deref().unwrap_or_default());
    let age = payload
        .age
        .as_ref()
        .and_then(validation::parse_age)
        .unwrap_or_default();

    let user = users.insert(name, email, age);
    log::info!("✅ Created user: {}", user.id);
    Ok(user)
}

pub fn update_user(
    store: &UserStore,
    user_id: &str,
    payload: &UserPayload,
) -> Result<User, AppError> {
    let mut users = store.write()?;

    // Existência primeiro: 404 vence 400 para id desconhecido
    if users.get(user_id).is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    let errors =
        validation::validate_payload(&users, payload, ValidationMode::Update, Some(user_id));
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let name = payload.name.as_deref().map(|n| n.trim().to_string());
    let email = payload.email.as_deref().map(validation::normalize_email);
    let age = payload.age.as_ref().and_then(validation::parse_age);

    let updated = users
        .update(user_id, name, email, age)
        .cloned()
        .ok_or_else(|| AppError::Internal(format!("User {} vanished during update", user_id)))?;
    log::info!("✅ Updated user: {}", user_id);
    Ok(updated)
}

pub fn delete_user(store: &UserStore, user_id: &str) -> Result<User, AppError> {
    let mut users = store.write()?;
    let deleted = users
        .remove(user_id)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    log::info!("✅ Deleted user: {}", user_id);
    Ok(deleted)
}
