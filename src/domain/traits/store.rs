use crate::application::errors::StorageError;

/// A kind of row owned by a single user. `Fields` is what a caller supplies on
/// creation; the store assigns `id` and `user_id`.
pub trait Resource: Send + Sync + Sized {
    type Fields: Send;

    fn id(&self) -> i64;
    fn user_id(&self) -> i64;
}

/// Store trait - per-user CRUD over one resource table.
///
/// Every operation is scoped by `user_id`; rows of other users are neither
/// visible nor mutable through it.
pub trait ResourceStore<R: Resource>: Send + Sync {
    /// Append a row and return its id.
    fn create(&self, user_id: i64, fields: R::Fields) -> Result<i64, StorageError>;

    /// All rows of `user_id` in insertion order.
    fn list(&self, user_id: i64) -> Result<Vec<R>, StorageError>;

    /// Remove the row matching both keys. Returns `false` when nothing matched.
    fn delete(&self, id: i64, user_id: i64) -> Result<bool, StorageError>;
}
