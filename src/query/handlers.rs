// region:    --- Imports
use crate::auction::model::{Auction, Bid};
use crate::auction_store::AuctionStore;
use crate::error::AuctionError;
use tracing::info;

// endregion: --- Imports

// region:    --- Query Handlers

/// 경매 조회
pub async fn get_auction(
    store: &impl AuctionStore,
    auction_id: i64,
) -> Result<Auction, AuctionError> {
    info!("{:<12} --> 경매 조회 id: {}", "Query", auction_id);
    store
        .get_auction(auction_id)
        .await?
        .ok_or(AuctionError::AuctionNotFound)
}

/// 모든 경매 조회
pub async fn get_all_auctions(store: &impl AuctionStore) -> Result<Vec<Auction>, AuctionError> {
    info!("{:<12} --> 모든 경매 조회", "Query");
    Ok(store.list_auctions().await?)
}

/// 입찰 이력 조회
pub async fn get_bid_history(
    store: &impl AuctionStore,
    auction_id: i64,
) -> Result<Vec<Bid>, AuctionError> {
    info!("{:<12} --> 입찰 이력 조회 id: {}", "Query", auction_id);
    Ok(store.list_bids(auction_id).await?)
}

/// 최고 입찰가 조회
pub async fn get_highest_bid(
    store: &impl AuctionStore,
    auction_id: i64,
) -> Result<Option<i64>, AuctionError> {
    info!("{:<12} --> 최고 입찰가 조회 id: {}", "Query", auction_id);
    Ok(store.highest_bid(auction_id).await?)
}

// endregion: --- Query Handlers
