// region:    --- Imports
use crate::auction::model::{Auction, AuctionStatus, Bid, NewAuction, NewBid};
use crate::auction_store::{AuctionStore, StoreError};
use crate::database::DatabaseManager;
use crate::query::queries;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use std::sync::Arc;

// endregion: --- Imports

// region:    --- Postgres Auction Store
/// Postgres 경매 저장소
/// 조건부 쓰기는 UPDATE ... WHERE current_bid = $expected AND status = 'ACTIVE'
/// 형태로 표현되어 행 잠금 없이 잃어버린 갱신을 차단한다.
pub struct PgAuctionStore {
    db: Arc<DatabaseManager>,
}

/// Postgres 경매 저장소 생성
impl PgAuctionStore {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuctionStore for PgAuctionStore {
    async fn get_auction(&self, auction_id: i64) -> Result<Option<Auction>, StoreError> {
        let auction = sqlx::query_as::<_, Auction>(queries::GET_AUCTION)
            .bind(auction_id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(auction)
    }

    async fn insert_auction(&self, auction: NewAuction) -> Result<Auction, StoreError> {
        let inserted = sqlx::query_as::<_, Auction>(
            "INSERT INTO auctions
             (listing_id, seller_id, starting_price, reserve_price, current_bid, currency, bid_count, status, end_time, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $3, $5, 0, 'ACTIVE', $6, $7, $7)
             RETURNING *",
        )
        .bind(auction.listing_id)
        .bind(auction.seller_id)
        .bind(auction.starting_price)
        .bind(auction.reserve_price)
        .bind(&auction.currency)
        .bind(auction.end_time)
        .bind(Utc::now())
        .fetch_one(self.db.pool())
        .await?;
        Ok(inserted)
    }

    async fn conditional_commit_bid(
        &self,
        auction_id: i64,
        expected_current_bid: i64,
        bid: NewBid,
    ) -> Result<Option<Bid>, StoreError> {
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    // 현재가와 상태가 스냅샷 그대로일 때만 경매 행을 갱신한다
                    let updated = sqlx::query(
                        "UPDATE auctions
                         SET current_bid = $1, bid_count = bid_count + 1, updated_at = $2
                         WHERE id = $3 AND current_bid = $4 AND status = 'ACTIVE'
                         RETURNING id",
                    )
                    .bind(bid.amount)
                    .bind(bid.placed_at)
                    .bind(auction_id)
                    .bind(expected_current_bid)
                    .fetch_optional(&mut **tx)
                    .await?;

                    // 조건 불일치: 다른 입찰이 먼저 반영되었고 아무것도 변경되지 않았다
                    if updated.is_none() {
                        return Ok(None);
                    }

                    // 경매 행 갱신과 같은 트랜잭션에서 입찰 행을 삽입한다
                    let inserted = sqlx::query_as::<_, Bid>(
                        "INSERT INTO bids (auction_id, bidder_id, amount, currency, placed_at, is_winning)
                         VALUES ($1, $2, $3, $4, $5, FALSE)
                         RETURNING *",
                    )
                    .bind(bid.auction_id)
                    .bind(bid.bidder_id)
                    .bind(bid.amount)
                    .bind(&bid.currency)
                    .bind(bid.placed_at)
                    .fetch_one(&mut **tx)
                    .await?;

                    Ok(Some(inserted))
                })
            })
            .await
    }

    async fn list_bids(&self, auction_id: i64) -> Result<Vec<Bid>, StoreError> {
        let bids = sqlx::query_as::<_, Bid>(queries::GET_BID_HISTORY)
            .bind(auction_id)
            .fetch_all(self.db.pool())
            .await?;
        Ok(bids)
    }

    async fn highest_bid(&self, auction_id: i64) -> Result<Option<i64>, StoreError> {
        let row = sqlx::query(queries::GET_HIGHEST_BID)
            .bind(auction_id)
            .fetch_one(self.db.pool())
            .await?;
        Ok(row.get("highest_bid"))
    }

    async fn mark_bid_winning(&self, bid_id: i64) -> Result<(), StoreError> {
        sqlx::query("UPDATE bids SET is_winning = TRUE WHERE id = $1")
            .bind(bid_id)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    async fn set_auction_status(
        &self,
        auction_id: i64,
        expected_current_bid: i64,
        status: AuctionStatus,
        winning_bidder_id: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        // 스냅샷 이후 입찰이 커밋되었으면(current_bid 불일치) 아무 행도 갱신되지 않는다
        let updated = sqlx::query(
            "UPDATE auctions
             SET status = $1, winning_bidder_id = $2, updated_at = $3
             WHERE id = $4 AND current_bid = $5 AND status = 'ACTIVE'
             RETURNING id",
        )
        .bind(status)
        .bind(winning_bidder_id)
        .bind(now)
        .bind(auction_id)
        .bind(expected_current_bid)
        .fetch_optional(self.db.pool())
        .await?;
        Ok(updated.is_some())
    }

    async fn list_expired_active_auctions(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Auction>, StoreError> {
        let auctions = sqlx::query_as::<_, Auction>(queries::GET_EXPIRED_ACTIVE_AUCTIONS)
            .bind(now)
            .fetch_all(self.db.pool())
            .await?;
        Ok(auctions)
    }

    async fn list_auctions(&self) -> Result<Vec<Auction>, StoreError> {
        let auctions = sqlx::query_as::<_, Auction>(queries::GET_ALL_AUCTIONS)
            .fetch_all(self.db.pool())
            .await?;
        Ok(auctions)
    }
}
// endregion: --- Postgres Auction Store
