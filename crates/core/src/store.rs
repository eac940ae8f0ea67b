//! Read-only access to the operational record store.
//!
//! [`RecordStore`] is the seam between the pipeline and wherever users,
//! fields and reservations live. The PostgreSQL implementation sits in
//! `field2go-db`; [`InMemoryStore`] backs tests and fixtures.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::records::{Field, Reservation, User};
use crate::types::RecordId;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All users, in collection order.
    async fn users(&self) -> Result<Vec<User>, CoreError>;

    /// All fields, in collection order.
    async fn fields(&self) -> Result<Vec<Field>, CoreError>;

    /// All reservations, in collection order.
    async fn reservations(&self) -> Result<Vec<Reservation>, CoreError>;

    /// Exact lookup of a field by identifier.
    async fn find_field(&self, id: &RecordId) -> Result<Option<Field>, CoreError>;

    /// The reservation `user_id` holds on `field_id`, if any.
    ///
    /// When the pair was booked more than once, the last reservation in
    /// collection order is returned, the same one the dataset builder keeps
    /// for the pair. The earlier web backend read the first match instead;
    /// the change is deliberate so training and prediction see one row.
    async fn find_reservation(
        &self,
        user_id: &RecordId,
        field_id: &RecordId,
    ) -> Result<Option<Reservation>, CoreError>;
}

/// A record store held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    pub users: Vec<User>,
    pub fields: Vec<Field>,
    pub reservations: Vec<Reservation>,
}

impl InMemoryStore {
    pub fn new(users: Vec<User>, fields: Vec<Field>, reservations: Vec<Reservation>) -> Self {
        Self {
            users,
            fields,
            reservations,
        }
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn users(&self) -> Result<Vec<User>, CoreError> {
        Ok(self.users.clone())
    }

    async fn fields(&self) -> Result<Vec<Field>, CoreError> {
        Ok(self.fields.clone())
    }

    async fn reservations(&self) -> Result<Vec<Reservation>, CoreError> {
        Ok(self.reservations.clone())
    }

    async fn find_field(&self, id: &RecordId) -> Result<Option<Field>, CoreError> {
        Ok(self.fields.iter().find(|f| &f.id == id).cloned())
    }

    async fn find_reservation(
        &self,
        user_id: &RecordId,
        field_id: &RecordId,
    ) -> Result<Option<Reservation>, CoreError> {
        Ok(self
            .reservations
            .iter()
            .rev()
            .find(|r| &r.user_id == user_id && &r.field_id == field_id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> InMemoryStore {
        InMemoryStore::new(
            vec![User::new("u1")],
            vec![Field::new("f1", "tennis", "downtown", 50.0)],
            vec![
                Reservation::new("u1", "f1", Some(1.0), None),
                Reservation::new("u1", "f1", Some(2.0), None),
            ],
        )
    }

    #[tokio::test]
    async fn find_field_by_id() {
        let store = store();
        let found = store.find_field(&"f1".into()).await.unwrap();
        assert_eq!(found.map(|f| f.sport_type), Some("tennis".to_string()));
        assert!(store.find_field(&"nope".into()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_reservation_prefers_last_in_collection_order() {
        let store = store();
        let found = store
            .find_reservation(&"u1".into(), &"f1".into())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.duration, Some(2.0));
    }

    #[tokio::test]
    async fn find_reservation_missing_pair() {
        let store = store();
        let found = store
            .find_reservation(&"u2".into(), &"f1".into())
            .await
            .unwrap();
        assert!(found.is_none());
    }
}
