// region:    --- Imports
use crate::auction::model::{Auction, AuctionStatus, Bid, NewAuction, NewBid};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryAuctionStore;
pub use postgres::PgAuctionStore;
// endregion: --- Imports

// region:    --- Store Error
/// 저장소 오류
/// 업무 규칙과 무관한 백엔드 실패이며 엔진에서 STORE_UNAVAILABLE로 변환된다.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("데이터베이스 오류: {0}")]
    Database(#[from] sqlx::Error),

    #[error("저장소를 사용할 수 없습니다: {0}")]
    Unavailable(String),
}
// endregion: --- Store Error

// region:    --- Auction Store Trait
/// 경매 저장소 트레이트
/// 엔진은 이 인터페이스에만 의존하므로 백엔드(Postgres, 인메모리)를 교체할 수 있다.
/// 동시성 제어는 conditional_commit_bid / set_auction_status의 조건부 쓰기로만 표현된다.
#[async_trait]
pub trait AuctionStore {
    /// 경매 단건 조회
    async fn get_auction(&self, auction_id: i64) -> Result<Option<Auction>, StoreError>;

    /// 경매 등록
    async fn insert_auction(&self, auction: NewAuction) -> Result<Auction, StoreError>;

    /// 조건부 입찰 커밋
    /// 저장된 current_bid가 expected_current_bid와 같고 상태가 ACTIVE일 때만
    /// current_bid/bid_count 갱신과 입찰 행 삽입을 원자적으로 수행한다.
    /// 조건 불일치(다른 입찰이 먼저 반영됨)면 None을 반환한다.
    async fn conditional_commit_bid(
        &self,
        auction_id: i64,
        expected_current_bid: i64,
        bid: NewBid,
    ) -> Result<Option<Bid>, StoreError>;

    /// 입찰 이력 조회(최신순)
    async fn list_bids(&self, auction_id: i64) -> Result<Vec<Bid>, StoreError>;

    /// 최고 입찰가 조회
    async fn highest_bid(&self, auction_id: i64) -> Result<Option<i64>, StoreError>;

    /// 낙찰 입찰 플래그 설정
    async fn mark_bid_winning(&self, bid_id: i64) -> Result<(), StoreError>;

    /// 경매 상태 전이
    /// ACTIVE이고 current_bid가 expected_current_bid와 같은 행에만 적용되는
    /// 조건부 갱신이며 전이 성공 여부를 반환한다. 호출자의 스냅샷 이후에
    /// 커밋된 입찰이 있으면 전이는 거부된다.
    async fn set_auction_status(
        &self,
        auction_id: i64,
        expected_current_bid: i64,
        status: AuctionStatus,
        winning_bidder_id: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError>;

    /// 만료된 ACTIVE 경매 목록 조회
    async fn list_expired_active_auctions(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Auction>, StoreError>;

    /// 전체 경매 목록 조회(최신 생성순)
    async fn list_auctions(&self) -> Result<Vec<Auction>, StoreError>;
}
// endregion: --- Auction Store Trait
