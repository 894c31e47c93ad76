// ==================== USER FIELD VALIDATION ====================
// Regras de formato e unicidade aplicadas antes de qualquer mutação.
// Funções puras: leem a coleção (já travada pelo chamador) e nunca mutam.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::models::UserPayload;
use crate::store::Users;

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("email regex compiles");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    Create,
    Update,
}

/// Normaliza email para comparação e armazenamento (trim + lowercase)
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Interpreta o valor JSON cru de `age` como inteiro.
///
/// Aceita número inteiro ou string numérica ("30"); float e qualquer
/// outro tipo são rejeitados.
pub fn parse_age(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Valida os campos candidatos contra as regras de negócio e a coleção atual.
///
/// Em `Create` todos os campos são obrigatórios; em `Update` apenas os campos
/// presentes são validados (update esparso), mas um campo presente vazio ainda
/// é erro. `current_id` isenta o próprio registro da checagem de unicidade.
///
/// Retorna TODAS as violações na ordem name → email → age; vetor vazio
/// significa candidato aceito.
pub fn validate_payload(
    users: &Users,
    payload: &UserPayload,
    mode: ValidationMode,
    current_id: Option<&str>,
) -> Vec<String> {
    let mut errors = Vec::new();
    let is_update = mode == ValidationMode::Update;

    // Name
    if !is_update || payload.name.is_some() {
        match payload.name.as_deref().map(str::trim) {
            None | Some("") => errors.push("Name is required and cannot be empty".to_string()),
            Some(name) if name.chars().count() < 2 => {
                errors.push("Name must be at least 2 characters long".to_string())
            }
            Some(_) => {}
        }
    }

    // Email
    if !is_update || payload.email.is_some() {
        let normalized = payload.email.as_deref().map(normalize_email);
        match normalized.as_deref() {
            None | Some("") => errors.push("Email is required".to_string()),
            Some(email) if !EMAIL_REGEX.is_match(email) => {
                errors.push("Email format is invalid".to_string())
            }
            Some(email) => {
                // Unicidade por varredura linear, excluindo o próprio registro no update
                let taken = users
                    .list()
                    .iter()
                    .any(|u| u.email == email && current_id != Some(u.id.as_str()));
                if taken {
                    if is_update {
                        errors.push("Email is already taken by another user".to_string());
                    } else {
                        errors.push("Email is already taken".to_string());
                    }
                }
            }
        }
    }

    // Age
    if !is_update || payload.age.is_some() {
        match &payload.age {
            None => errors.push("Age is required".to_string()),
            // age = 0 cai aqui como valor fora do intervalo, não como "ausente"
            Some(value) => match parse_age(value) {
                Some(age) if (1..=150).contains(&age) => {}
                _ => errors
                    .push("Age must be a positive integer between 1 and 150".to_string()),
            },
        }
    }

    errors
}
