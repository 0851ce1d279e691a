pub mod allowed_user;
pub mod association;
pub mod card;
pub mod monthly;
pub mod player;
pub mod slug;
pub mod transaction;
pub mod user;

pub use allowed_user::AllowedUser;
pub use association::{Association, AssociationProfile};
pub use card::{Card, CardListing};
pub use monthly::{Monthly, MonthlyListing};
pub use player::{Player, PlayerListing};
pub use slug::Slug;
pub use transaction::Transaction;
pub use user::User;
