use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::models::{Donation, NewUser, Order, ReceiverDonation, ShopDonation, Task, User};

/// Errors surfaced by any `Store` implementation
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Username already taken: {0}")]
    DuplicateUsername(String),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Persistence for accounts and the owned domain rows.
///
/// Every write is a single-row insert. Listings come back in insertion order.
/// Implementations must enforce username uniqueness themselves; callers never
/// check-then-insert.
#[async_trait]
pub trait Store: Send + Sync {
    async fn health_check(&self) -> Result<(), StoreError>;

    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn insert_task(&self, task: Task) -> Result<Task, StoreError>;
    /// Tasks whose `user` is `owner`.
    async fn list_tasks(&self, owner: Uuid) -> Result<Vec<Task>, StoreError>;

    async fn insert_donation(&self, donation: Donation) -> Result<Donation, StoreError>;
    /// Donations whose `donor` is `donor`.
    async fn list_donations(&self, donor: Uuid) -> Result<Vec<Donation>, StoreError>;

    async fn insert_shop_donation(&self, donation: ShopDonation) -> Result<ShopDonation, StoreError>;
    /// Every shop donation, whoever recorded it.
    async fn list_shop_donations(&self) -> Result<Vec<ShopDonation>, StoreError>;

    async fn insert_receiver_donation(&self, donation: ReceiverDonation) -> Result<ReceiverDonation, StoreError>;
    /// Every receiver donation, whoever recorded it.
    async fn list_receiver_donations(&self) -> Result<Vec<ReceiverDonation>, StoreError>;

    async fn insert_order(&self, order: Order) -> Result<Order, StoreError>;
    /// The order `id`, only if it belongs to `owner`.
    async fn find_order(&self, owner: Uuid, id: Uuid) -> Result<Option<Order>, StoreError>;
}
