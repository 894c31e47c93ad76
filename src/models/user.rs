use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Registro de usuário armazenado em memória
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct User {
    /// UUID v4 gerado na criação, imutável
    pub id: String,
    pub name: String,
    /// Sempre armazenado trimmed + lowercase
    pub email: String,
    pub age: i64,
}

/// Corpo de requisição para POST/PUT - todos os campos opcionais.
///
/// `age` chega como JSON cru para que um valor não-numérico vire um erro
/// de validação itemizado em vez de uma falha de desserialização genérica.
#[derive(Debug, Deserialize, Serialize, Default, ToSchema)]
pub struct UserPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub age: Option<serde_json::Value>,
}

impl UserPayload {
    /// True quando nenhum campo candidato foi enviado (body `{}`)
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.age.is_none()
    }
}
