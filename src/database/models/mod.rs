pub mod donation;
pub mod order;
pub mod receiver_donation;
pub mod shop_donation;
pub mod task;
pub mod user;

pub use donation::{Donation, NewDonation};
pub use order::{NewOrder, Order, OrderStatus};
pub use receiver_donation::{NewReceiverDonation, ReceiverDonation};
pub use shop_donation::{NewShopDonation, ShopDonation};
pub use task::{NewTask, Task};
pub use user::{NewUser, User};

/// Longest free-text column (`VARCHAR(255)`).
pub const MAX_TEXT_CHARS: usize = 255;
