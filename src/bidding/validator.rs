/// 입찰 허용 여부 검증
/// 순수 함수로만 구성되며 I/O와 부수 효과가 없다.
// region:    --- Imports
use crate::auction::model::{Auction, AuctionStatus};
use crate::error::AuctionError;
use chrono::{DateTime, Utc};

// endregion: --- Imports

// 최소 입찰 증가율(%). 정책값이며 현재 가격에 대한 비율이다.
pub const MIN_INCREMENT_PERCENT: i64 = 5;

// 최소 입찰 증가액 하한. 금액은 최소 화폐 단위이므로 100 = 1 통화 단위.
pub const MIN_INCREMENT_FLOOR: i64 = 100;

/// 최소 입찰 증가액 계산
/// 현재 가격의 5%와 하한 중 큰 값을 사용한다.
/// i64 상한 근처에서는 포화 연산으로 계산해 패닉이나 래핑이 없다.
pub fn minimum_increment(current_bid: i64) -> i64 {
    (current_bid.saturating_mul(MIN_INCREMENT_PERCENT) / 100).max(MIN_INCREMENT_FLOOR)
}

/// 현재 수락 가능한 최소 입찰 금액
pub fn minimum_acceptable_bid(current_bid: i64) -> i64 {
    current_bid.saturating_add(minimum_increment(current_bid))
}

/// 입찰 검증
/// 검사 순서는 고정이며 첫 실패에서 중단한다:
/// 1. 상태가 ACTIVE인지
/// 2. 마감 시간 이전인지
/// 3. 판매자 본인 입찰이 아닌지
/// 4. 최소 입찰 금액(현재가 + 최소 증가액) 이상인지
pub fn validate_bid(
    auction: &Auction,
    bidder_id: i64,
    amount: i64,
    now: DateTime<Utc>,
) -> Result<(), AuctionError> {
    if auction.status != AuctionStatus::Active {
        return Err(AuctionError::AuctionNotActive);
    }
    if now >= auction.end_time {
        return Err(AuctionError::AuctionExpired);
    }
    if bidder_id == auction.seller_id {
        return Err(AuctionError::SelfBidNotAllowed);
    }
    let min_bid_amount = minimum_acceptable_bid(auction.current_bid);
    // 포화된 최소 금액은 현재가와 같아질 수 있으므로 엄격 증가를 함께 강제한다
    if amount < min_bid_amount || amount <= auction.current_bid {
        return Err(AuctionError::BidTooLow { min_bid_amount });
    }
    Ok(())
}
