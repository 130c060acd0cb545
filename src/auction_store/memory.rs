// region:    --- Imports
use crate::auction::model::{Auction, AuctionStatus, Bid, NewAuction, NewBid};
use crate::auction_store::{AuctionStore, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

// endregion: --- Imports

// region:    --- In-Memory Auction Store
/// 인메모리 경매 저장소
/// 테스트와 브로커/DB 없는 로컬 실행용 구현체.
/// 단일 뮤텍스가 조건부 커밋에 Postgres 트랜잭션과 같은 원자성을 제공한다.
#[derive(Default)]
pub struct InMemoryAuctionStore {
    inner: Mutex<Inner>,
    unavailable: AtomicBool,
}

#[derive(Default)]
struct Inner {
    auctions: HashMap<i64, Auction>,
    bids: Vec<Bid>,
    next_auction_id: i64,
    next_bid_id: i64,
}

impl InMemoryAuctionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 저장소 실패 주입. true면 모든 연산이 Unavailable을 반환한다.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "인메모리 저장소 실패 주입".to_string(),
            ));
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // 잠금을 쥔 채 패닉하는 경로가 없으므로 독성 잠금은 복구해서 계속 쓴다
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl AuctionStore for InMemoryAuctionStore {
    async fn get_auction(&self, auction_id: i64) -> Result<Option<Auction>, StoreError> {
        self.check_available()?;
        Ok(self.lock().auctions.get(&auction_id).cloned())
    }

    async fn insert_auction(&self, auction: NewAuction) -> Result<Auction, StoreError> {
        self.check_available()?;
        let mut inner = self.lock();
        inner.next_auction_id += 1;
        let now = Utc::now();
        let row = Auction {
            id: inner.next_auction_id,
            listing_id: auction.listing_id,
            seller_id: auction.seller_id,
            starting_price: auction.starting_price,
            reserve_price: auction.reserve_price,
            current_bid: auction.starting_price,
            currency: auction.currency,
            bid_count: 0,
            status: AuctionStatus::Active,
            end_time: auction.end_time,
            winning_bidder_id: None,
            created_at: now,
            updated_at: now,
        };
        inner.auctions.insert(row.id, row.clone());
        Ok(row)
    }

    async fn conditional_commit_bid(
        &self,
        auction_id: i64,
        expected_current_bid: i64,
        bid: NewBid,
    ) -> Result<Option<Bid>, StoreError> {
        self.check_available()?;
        let mut inner = self.lock();
        let bid_id = inner.next_bid_id + 1;

        let auction = match inner.auctions.get_mut(&auction_id) {
            Some(auction) => auction,
            None => return Ok(None),
        };
        // 저장된 현재가와 상태가 기대값 그대로일 때만 커밋한다
        if auction.status != AuctionStatus::Active || auction.current_bid != expected_current_bid {
            return Ok(None);
        }
        auction.current_bid = bid.amount;
        auction.bid_count += 1;
        auction.updated_at = bid.placed_at;

        inner.next_bid_id = bid_id;
        let row = Bid {
            id: bid_id,
            auction_id: bid.auction_id,
            bidder_id: bid.bidder_id,
            amount: bid.amount,
            currency: bid.currency,
            placed_at: bid.placed_at,
            is_winning: false,
        };
        inner.bids.push(row.clone());
        Ok(Some(row))
    }

    async fn list_bids(&self, auction_id: i64) -> Result<Vec<Bid>, StoreError> {
        self.check_available()?;
        let inner = self.lock();
        let mut bids: Vec<Bid> = inner
            .bids
            .iter()
            .filter(|bid| bid.auction_id == auction_id)
            .cloned()
            .collect();
        // Postgres 구현과 같은 최신순 정렬
        bids.sort_by(|a, b| b.placed_at.cmp(&a.placed_at).then(b.id.cmp(&a.id)));
        Ok(bids)
    }

    async fn highest_bid(&self, auction_id: i64) -> Result<Option<i64>, StoreError> {
        self.check_available()?;
        let inner = self.lock();
        Ok(inner
            .bids
            .iter()
            .filter(|bid| bid.auction_id == auction_id)
            .map(|bid| bid.amount)
            .max())
    }

    async fn mark_bid_winning(&self, bid_id: i64) -> Result<(), StoreError> {
        self.check_available()?;
        let mut inner = self.lock();
        if let Some(bid) = inner.bids.iter_mut().find(|bid| bid.id == bid_id) {
            bid.is_winning = true;
        }
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
        self.check_available()?;
        let mut inner = self.lock();
        match inner.auctions.get_mut(&auction_id) {
            // 스냅샷 이후 입찰이 커밋되었으면(current_bid 불일치) 전이를 거부한다
            Some(auction)
                if auction.status == AuctionStatus::Active
                    && auction.current_bid == expected_current_bid =>
            {
                auction.status = status;
                auction.winning_bidder_id = winning_bidder_id;
                auction.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_expired_active_auctions(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Auction>, StoreError> {
        self.check_available()?;
        let inner = self.lock();
        Ok(inner
            .auctions
            .values()
            .filter(|auction| auction.status == AuctionStatus::Active && auction.end_time <= now)
            .cloned()
            .collect())
    }

    async fn list_auctions(&self) -> Result<Vec<Auction>, StoreError> {
        self.check_available()?;
        let inner = self.lock();
        let mut auctions: Vec<Auction> = inner.auctions.values().cloned().collect();
        // Postgres 구현과 같은 최신 생성순 정렬
        auctions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(auctions)
    }
}
// endregion: --- In-Memory Auction Store
