// ==================== IN-MEMORY USER STORE ====================
// Coleção autoritativa de usuários, mantida em memória (sem persistência).
// A ordem de inserção é preservada para listagem reproduzível.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use crate::models::User;
use crate::utils::error::AppError;

/// Coleção de registros em ordem de inserção.
///
/// Operações primitivas apenas - validação acontece antes, sob o mesmo
/// write lock (ver `services::user_service`).
#[derive(Debug, Default)]
pub struct Users {
    records: Vec<User>,
}

impl Users {
    pub fn list(&self) -> &[User] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&User> {
        self.records.iter().find(|u| u.id == id)
    }

    /// Insere um registro já validado, gerando o id (UUID v4 textual)
    pub fn insert(&mut self, name: String, email: String, age: i64) -> User {
        let user = User {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            age,
        };
        self.records.push(user.clone());
        user
    }

    /// Substituição esparsa de campos: `None` mantém o valor atual.
    /// Retorna `None` se o id não existe.
    pub fn update(
        &mut self,
        id: &str,
        name: Option<String>,
        email: Option<String>,
        age: Option<i64>,
    ) -> Option<&User> {
        let user = self.records.iter_mut().find(|u| u.id == id)?;
        if let Some(name) = name {
            user.name = name;
        }
        if let Some(email) = email {
            user.email = email;
        }
        if let Some(age) = age {
            user.age = age;
        }
        Some(user)
    }

    /// Remove o registro e retorna o valor anterior
    pub fn remove(&mut self, id: &str) -> Option<User> {
        let pos = self.records.iter().position(|u| u.id == id)?;
        Some(self.records.remove(pos))
    }
}

/// Store compartilhado entre handlers via `web::Data<UserStore>`.
///
/// O RwLock serializa toda sequência validate+mutate: o service segura o
/// write guard durante a checagem de unicidade/existência E a mutação,
/// então dois creates concorrentes com o mesmo email não passam ambos.
#[derive(Debug, Default)]
pub struct UserStore {
    inner: RwLock<Users>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self) -> Result<RwLockReadGuard<'_, Users>, AppError> {
        self.inner
            .read()
            .map_err(|e| AppError::Internal(format!("User store lock poisoned: {}", e)))
    }

    pub fn write(&self) -> Result<RwLockWriteGuard<'_, Users>, AppError> {
        self.inner
            .write()
            .map_err(|e| AppError::Internal(format!("User store lock poisoned: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_assigns_uuid_and_preserves_order() {
        let mut users = Users::default();
        let id_a = users.insert("Alice".into(), "alice@example.com".into(), 30).id.clone();
        let id_b = users.insert("Bob".into(), "bob@example.com".into(), 25).id.clone();

        assert_ne!(id_a, id_b);
        assert_eq!(uuid::Uuid::parse_str(&id_a).is_ok(), true);

        let listed: Vec<&str> = users.list().iter().map(|u| u.email.as_str()).collect();
        assert_eq!(listed, vec!["alice@example.com", "bob@example.com"]);
    }

    #[test]
    fn test_get_unknown_id_is_none() {
        let users = Users::default();
        assert!(users.get("missing").is_none());
    }

    #[test]
    fn test_sparse_update_keeps_other_fields() {
        let mut users = Users::default();
        let id = users.insert("Alice".into(), "alice@example.com".into(), 30).id.clone();

        let updated = users.update(&id, None, None, Some(31));
        assert!(updated.is_some());

        let user = users.get(&id).expect("user should exist");
        assert_eq!(user.name, "Alice");
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.age, 31);
        assert_eq!(user.id, id); // id nunca muda
    }

    #[test]
    fn test_update_unknown_id_is_none() {
        let mut users = Users::default();
        assert!(users.update("missing", Some("X".into()), None, None).is_none());
    }

    #[test]
    fn test_remove_returns_prior_value_and_second_remove_fails() {
        let mut users = Users::default();
        let id = users.insert("Alice".into(), "alice@example.com".into(), 30).id.clone();

        let removed = users.remove(&id).expect("first remove should succeed");
        assert_eq!(removed.email, "alice@example.com");
        assert!(users.get(&id).is_none());
        assert!(users.remove(&id).is_none());
        assert!(users.list().is_empty());
    }
}
