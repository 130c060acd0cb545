pub mod auction;
pub mod auction_store;
pub mod bidding;
pub mod database;
pub mod error;
pub mod handlers;
pub mod message_broker;
pub mod query;
pub mod scheduler;
