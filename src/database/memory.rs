use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{Donation, NewUser, Order, ReceiverDonation, ShopDonation, Task, User};
use super::store::{Store, StoreError};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    tasks: Vec<Task>,
    donations: Vec<Donation>,
    shop_donations: Vec<ShopDonation>,
    receiver_donations: Vec<ReceiverDonation>,
    orders: Vec<Order>,
}

/// Process-local store for development and tests. Data is lost on exit.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.tables.read().await.users.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        // Uniqueness check and insert share one write lock
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.username == new_user.username) {
            return Err(StoreError::DuplicateUsername(new_user.username));
        }
        let user = User::new(new_user);
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn insert_task(&self, task: Task) -> Result<Task, StoreError> {
        self.tables.write().await.tasks.push(task.clone());
        Ok(task)
    }

    async fn list_tasks(&self, owner: Uuid) -> Result<Vec<Task>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.tasks.iter().filter(|t| t.user == owner).cloned().collect())
    }

    async fn insert_donation(&self, donation: Donation) -> Result<Donation, StoreError> {
        self.tables.write().await.donations.push(donation.clone());
        Ok(donation)
    }

    async fn list_donations(&self, donor: Uuid) -> Result<Vec<Donation>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.donations.iter().filter(|d| d.donor == donor).cloned().collect())
    }

    async fn insert_shop_donation(&self, donation: ShopDonation) -> Result<ShopDonation, StoreError> {
        self.tables.write().await.shop_donations.push(donation.clone());
        Ok(donation)
    }

    async fn list_shop_donations(&self) -> Result<Vec<ShopDonation>, StoreError> {
        Ok(self.tables.read().await.shop_donations.clone())
    }

    async fn insert_receiver_donation(&self, donation: ReceiverDonation) -> Result<ReceiverDonation, StoreError> {
        self.tables.write().await.receiver_donations.push(donation.clone());
        Ok(donation)
    }

    async fn list_receiver_donations(&self) -> Result<Vec<ReceiverDonation>, StoreError> {
        Ok(self.tables.read().await.receiver_donations.clone())
    }

    async fn insert_order(&self, order: Order) -> Result<Order, StoreError> {
        self.tables.write().await.orders.push(order.clone());
        Ok(order)
    }

    async fn find_order(&self, owner: Uuid, id: Uuid) -> Result<Option<Order>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.orders.iter().find(|o| o.id == id && o.user == owner).cloned())
    }
}
