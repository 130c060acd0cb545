use crate::auction_store::StoreError;
use axum::http::StatusCode;
use serde_json::json;

/// 경매/입찰 처리 오류
/// 모든 오류는 호출자가 구분 가능한 복구 가능 조건이며 프로세스를 중단시키지 않는다.
/// STORE_UNAVAILABLE만 호출자 측 재시도(백오프) 대상이고 나머지는 동일 입력에 대해 영구 실패다.
#[derive(Debug, thiserror::Error)]
pub enum AuctionError {
    #[error("경매를 찾을 수 없습니다.")]
    AuctionNotFound,

    #[error("잘못된 경매 상태입니다.")]
    AuctionNotActive,

    #[error("경매가 이미 종료되었습니다.")]
    AuctionExpired,

    #[error("판매자는 본인 경매에 입찰할 수 없습니다.")]
    SelfBidNotAllowed,

    /// min_bid_amount는 현재 수락 가능한 최소 입찰 금액
    #[error("입찰 금액이 최소 입찰 금액보다 낮습니다.")]
    BidTooLow { min_bid_amount: i64 },

    #[error("최대 재시도 횟수 초과")]
    Contention,

    #[error("이미 입찰이 존재하는 경매는 취소할 수 없습니다.")]
    HasBids,

    #[error("경매 종료 시간은 미래여야 합니다.")]
    InvalidEndTime,

    #[error("잘못된 가격 설정입니다.")]
    InvalidPrice,

    #[error("저장소 요청 처리에 실패했습니다: {0}")]
    StoreUnavailable(#[from] StoreError),
}

impl AuctionError {
    /// 응답 본문의 code 필드로 쓰이는 고정 오류 코드
    pub fn code(&self) -> &'static str {
        match self {
            AuctionError::AuctionNotFound => "AUCTION_NOT_FOUND",
            AuctionError::AuctionNotActive => "INVALID_STATUS",
            AuctionError::AuctionExpired => "ALREADY_ENDED",
            AuctionError::SelfBidNotAllowed => "SELF_BID",
            AuctionError::BidTooLow { .. } => "LOW_BID",
            AuctionError::Contention => "MAX_RETRIES_EXCEEDED",
            AuctionError::HasBids => "HAS_BIDS",
            AuctionError::InvalidEndTime => "INVALID_END_TIME",
            AuctionError::InvalidPrice => "INVALID_PRICE",
            AuctionError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
        }
    }

    /// HTTP 상태 코드 매핑
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuctionError::AuctionNotFound => StatusCode::NOT_FOUND,
            AuctionError::Contention => StatusCode::CONFLICT,
            AuctionError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// HTTP 응답 본문 생성
    pub fn to_body(&self) -> serde_json::Value {
        let mut body = json!({
            "error": self.to_string(),
            "code": self.code(),
        });
        if let AuctionError::BidTooLow { min_bid_amount } = self {
            body["min_bid_amount"] = json!(min_bid_amount);
        }
        body
    }
}
