use crate::auction::model::AuctionStatus;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 경매 이벤트가 발행되는 토픽
pub const AUCTION_EVENTS_TOPIC: &str = "auction-events";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub enum AuctionEvent {
    // 입찰 수락 이벤트
    BidAccepted {
        auction_id: i64,
        bid_id: i64,
        bidder_id: i64,
        amount: i64,
        currency: String,
        bid_count: i64,
        timestamp: DateTime<Utc>,
    },
    // 경매 종료 이벤트(낙찰, 유찰, 취소 공통)
    AuctionClosed {
        auction_id: i64,
        status: AuctionStatus,
        winning_bidder_id: Option<i64>,
        final_price: i64,
        timestamp: DateTime<Utc>,
    },
}

impl AuctionEvent {
    /// 이벤트가 속한 경매 id. 메시지 키로 사용한다.
    pub fn auction_id(&self) -> i64 {
        match self {
            AuctionEvent::BidAccepted { auction_id, .. } => *auction_id,
            AuctionEvent::AuctionClosed { auction_id, .. } => *auction_id,
        }
    }
}

/// 이벤트 발행 트레이트
/// 커밋이 끝난 뒤에 호출되며, 발행 실패는 로깅 대상일 뿐
/// 이미 커밋된 입찰/종료 결과를 무효화하지 않는다.
#[async_trait]
pub trait EventPublisher {
    async fn publish(&self, event: &AuctionEvent) -> Result<(), String>;
}

/// 발행을 생략하는 구현체(브로커 없는 환경용)
pub struct NoopEventPublisher;

#[async_trait]
impl EventPublisher for NoopEventPublisher {
    async fn publish(&self, _event: &AuctionEvent) -> Result<(), String> {
        Ok(())
    }
}
