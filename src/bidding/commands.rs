/// 입찰 커맨드 처리
/// 같은 경매에 대한 동시 입찰은 저장소의 조건부 쓰기(현재가 비교)로 직렬화되고,
/// 서로 다른 경매의 입찰은 공유 상태 없이 병렬로 처리된다.
// region:    --- Imports
use crate::auction::events::{AuctionEvent, EventPublisher};
use crate::auction::model::{Bid, NewBid};
use crate::auction_store::AuctionStore;
use crate::bidding::validator;
use crate::error::AuctionError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
// endregion: --- Imports

// region:    --- Commands
/// 입찰 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub auction_id: i64,
    pub bidder_id: i64,
    pub amount: i64,
}

// 조건부 쓰기 경합 시 최대 재시도 횟수. 경매 수명주기 전이도 같은 한도를 쓴다.
pub(crate) const MAX_RETRIES: i32 = 100;

/// 입찰 처리
/// 1. 현재 경매 스냅샷 조회
/// 2. 입찰 검증(상태, 마감 시간, 본인 입찰, 최소 입찰 금액)
/// 3. 스냅샷의 current_bid를 조건으로 입찰 행 삽입과 현재가 갱신을 원자적으로 커밋
/// 4. 조건 불일치(다른 입찰이 먼저 반영됨)면 새 스냅샷으로 재검증부터 재시도
///
/// 검증 실패는 동일 입력에 대해 영구 실패이므로 재시도하지 않고 즉시 반환한다.
/// 재시도 한도를 넘기면 MAX_RETRIES_EXCEEDED로 종료한다.
pub async fn place_bid(
    store: &impl AuctionStore,
    publisher: &impl EventPublisher,
    cmd: PlaceBidCommand,
    now: DateTime<Utc>,
) -> Result<Bid, AuctionError> {
    info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "Command", cmd);
    let mut retries = 0;

    while retries < MAX_RETRIES {
        // 현재 경매 스냅샷 조회
        let auction = store
            .get_auction(cmd.auction_id)
            .await?
            .ok_or(AuctionError::AuctionNotFound)?;

        // 입찰 검증
        validator::validate_bid(&auction, cmd.bidder_id, cmd.amount, now)?;

        let bid = NewBid {
            auction_id: auction.id,
            bidder_id: cmd.bidder_id,
            amount: cmd.amount,
            currency: auction.currency.clone(),
            placed_at: now,
        };

        // 조건부 커밋: 저장된 current_bid가 스냅샷과 같을 때만 반영된다
        match store
            .conditional_commit_bid(auction.id, auction.current_bid, bid)
            .await?
        {
            Some(bid) => {
                info!(
                    "{:<12} --> 입찰 성공: auction_id={}, bid_id={}, amount={}",
                    "Command", bid.auction_id, bid.id, bid.amount
                );

                // 커밋 이후 이벤트 발행. 발행 실패가 입찰을 무효화하지는 않는다.
                let event = AuctionEvent::BidAccepted {
                    auction_id: bid.auction_id,
                    bid_id: bid.id,
                    bidder_id: bid.bidder_id,
                    amount: bid.amount,
                    currency: bid.currency.clone(),
                    bid_count: auction.bid_count + 1,
                    timestamp: now,
                };
                if let Err(e) = publisher.publish(&event).await {
                    warn!("{:<12} --> 입찰 이벤트 발행 실패: {}", "Command", e);
                }

                return Ok(bid);
            }
            None => {
                warn!(
                    "{:<12} --> 낙관적 업데이트로 인한 가격 경합: 재시도",
                    "Command"
                );
                retries += 1;
                continue;
            }
        }
    }

    Err(AuctionError::Contention)
}
// endregion: --- Commands
