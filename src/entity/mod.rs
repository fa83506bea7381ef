pub mod audit_logs;
pub mod cart_items;
pub mod carts;
pub mod categories;
pub mod chat_participants;
pub mod chats;
pub mod contact_infos;
pub mod courier_reviews;
pub mod couriers;
pub mod messages;
pub mod orders;
pub mod product_combos;
pub mod products;
pub mod store_reviews;
pub mod stores;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use cart_items::Entity as CartItems;
pub use carts::Entity as Carts;
pub use categories::Entity as Categories;
pub use chat_participants::Entity as ChatParticipants;
pub use chats::Entity as Chats;
pub use contact_infos::Entity as ContactInfos;
pub use courier_reviews::Entity as CourierReviews;
pub use couriers::Entity as Couriers;
pub use messages::Entity as Messages;
pub use orders::Entity as Orders;
pub use product_combos::Entity as ProductCombos;
pub use products::Entity as Products;
pub use store_reviews::Entity as StoreReviews;
pub use stores::Entity as Stores;
pub use users::Entity as Users;
