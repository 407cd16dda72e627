use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;
use uuid::Uuid;

use super::models::{Donation, NewUser, Order, ReceiverDonation, ShopDonation, Task, User};
use super::store::{Store, StoreError};
use crate::config::DatabaseConfig;

/// SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// Postgres-backed store over a shared connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool for `url` and optionally bring the schema up to date
    pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!("Connected to database at {}", redact_url(url));

        if config.run_migrations {
            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("Database migrations applied");
        }

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}

/// Strip credentials from a connection string before it reaches the logs
pub fn redact_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut url) => {
            if url.password().is_some() {
                let _ = url.set_password(Some("****"));
            }
            url.into()
        }
        Err(_) => "<unparseable database url>".to_string(),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION))
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let user = User::new(new_user);

        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, password_hash, created_at)
             VALUES ($1, $2, $3, $4)
             RETURNING id, username, password_hash, created_at",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateUsername(user.username.clone())
            } else {
                StoreError::Sqlx(e)
            }
        })
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at
             FROM users
             WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn insert_task(&self, task: Task) -> Result<Task, StoreError> {
        let task = sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (id, user_id, data, created_at)
             VALUES ($1, $2, $3, $4)
             RETURNING id, user_id, data, created_at",
        )
        .bind(task.id)
        .bind(task.user)
        .bind(&task.data)
        .bind(task.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    async fn list_tasks(&self, owner: Uuid) -> Result<Vec<Task>, StoreError> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT id, user_id, data, created_at
             FROM tasks
             WHERE user_id = $1
             ORDER BY seq",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn insert_donation(&self, donation: Donation) -> Result<Donation, StoreError> {
        let donation = sqlx::query_as::<_, Donation>(
            "INSERT INTO donations (id, donor_id, amount, donated_at)
             VALUES ($1, $2, $3, $4)
             RETURNING id, donor_id, amount, donated_at",
        )
        .bind(donation.id)
        .bind(donation.donor)
        .bind(donation.amount)
        .bind(donation.donated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(donation)
    }

    async fn list_donations(&self, donor: Uuid) -> Result<Vec<Donation>, StoreError> {
        let donations = sqlx::query_as::<_, Donation>(
            "SELECT id, donor_id, amount, donated_at
             FROM donations
             WHERE donor_id = $1
             ORDER BY seq",
        )
        .bind(donor)
        .fetch_all(&self.pool)
        .await?;

        Ok(donations)
    }

    async fn insert_shop_donation(&self, donation: ShopDonation) -> Result<ShopDonation, StoreError> {
        let donation = sqlx::query_as::<_, ShopDonation>(
            "INSERT INTO shop_donations (id, shop_id, amount, item, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, shop_id, amount, item, created_at",
        )
        .bind(donation.id)
        .bind(donation.shop)
        .bind(donation.amount)
        .bind(&donation.item)
        .bind(donation.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(donation)
    }

    async fn list_shop_donations(&self) -> Result<Vec<ShopDonation>, StoreError> {
        let donations = sqlx::query_as::<_, ShopDonation>(
            "SELECT id, shop_id, amount, item, created_at
             FROM shop_donations
             ORDER BY seq",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(donations)
    }

    async fn insert_receiver_donation(&self, donation: ReceiverDonation) -> Result<ReceiverDonation, StoreError> {
        let donation = sqlx::query_as::<_, ReceiverDonation>(
            "INSERT INTO receiver_donations (id, receiver_id, amount, item, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, receiver_id, amount, item, created_at",
        )
        .bind(donation.id)
        .bind(donation.receiver)
        .bind(donation.amount)
        .bind(&donation.item)
        .bind(donation.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(donation)
    }

    async fn list_receiver_donations(&self) -> Result<Vec<ReceiverDonation>, StoreError> {
        let donations = sqlx::query_as::<_, ReceiverDonation>(
            "SELECT id, receiver_id, amount, item, created_at
             FROM receiver_donations
             ORDER BY seq",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(donations)
    }

    async fn insert_order(&self, order: Order) -> Result<Order, StoreError> {
        let order = sqlx::query_as::<_, Order>(
            "INSERT INTO orders (id, user_id, item, quantity, status, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id, user_id, item, quantity, status, created_at",
        )
        .bind(order.id)
        .bind(order.user)
        .bind(&order.item)
        .bind(order.quantity)
        .bind(order.status)
        .bind(order.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(order)
    }

    async fn find_order(&self, owner: Uuid, id: Uuid) -> Result<Option<Order>, StoreError> {
        let order = sqlx::query_as::<_, Order>(
            "SELECT id, user_id, item, quantity, status, created_at
             FROM orders
             WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }
}
