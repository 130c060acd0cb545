use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 경매 상태
// DRAFT 상태는 모델상 존재하지만 현재 생성 시 항상 ACTIVE로 시작한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum AuctionStatus {
    // 작성 중
    Draft,
    // 입찰 가능
    Active,
    // 종료(낙찰 또는 유찰)
    Ended,
    // 취소(입찰 없이 철회 또는 입찰 없이 만료)
    Cancelled,
    // 정산 완료
    Completed,
}

// 경매 모델
// current_bid는 시작 가격으로 초기화되며 감소하지 않는다.
// winning_bidder_id는 입찰이 있는 상태로 종료되고 최저 낙찰가를 충족한 경우에만 설정된다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Auction {
    pub id: i64,
    pub listing_id: i64,
    pub seller_id: i64,
    pub starting_price: i64,
    pub reserve_price: Option<i64>,
    pub current_bid: i64,
    pub currency: String,
    pub bid_count: i64,
    pub status: AuctionStatus,
    pub end_time: DateTime<Utc>,
    pub winning_bidder_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// 입찰 모델
// 생성 이후 is_winning 플래그 외에는 변경되지 않는다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: i64,
    pub auction_id: i64,
    pub bidder_id: i64,
    pub amount: i64,
    pub currency: String,
    pub placed_at: DateTime<Utc>,
    pub is_winning: bool,
}

// 경매 생성 정보
#[derive(Debug, Clone)]
pub struct NewAuction {
    pub listing_id: i64,
    pub seller_id: i64,
    pub starting_price: i64,
    pub reserve_price: Option<i64>,
    pub currency: String,
    pub end_time: DateTime<Utc>,
}

// 입찰 생성 정보
// currency는 호출자가 아닌 엔진이 경매로부터 복사해 채운다.
#[derive(Debug, Clone)]
pub struct NewBid {
    pub auction_id: i64,
    pub bidder_id: i64,
    pub amount: i64,
    pub currency: String,
    pub placed_at: DateTime<Utc>,
}
