/// 경매 수명주기 커맨드 처리
/// 1. 경매 생성
/// 2. 경매 종료(낙찰자 결정, 최저 낙찰가 적용)
/// 3. 경매 취소
/// 4. 만료 경매 일괄 마감
// region:    --- Imports
use crate::auction::events::{AuctionEvent, EventPublisher};
use crate::auction::model::{Auction, AuctionStatus, Bid, NewAuction};
use crate::auction_store::AuctionStore;
use crate::bidding::commands::MAX_RETRIES;
use crate::error::AuctionError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
// endregion: --- Imports

// region:    --- Commands
/// 경매 생성 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateAuctionCommand {
    pub listing_id: i64,
    pub seller_id: i64,
    pub starting_price: i64,
    pub reserve_price: Option<i64>,
    pub currency: Option<String>,
    pub end_time: DateTime<Utc>,
}

// 기본 통화
const DEFAULT_CURRENCY: &str = "USD";

/// 경매 생성
/// 리스팅 유형이 "auction"인 판매글이 등록될 때 호출된다.
/// 생성 즉시 ACTIVE 상태로 시작하고 current_bid는 시작 가격으로 초기화된다.
pub async fn create_auction(
    store: &impl AuctionStore,
    cmd: CreateAuctionCommand,
    now: DateTime<Utc>,
) -> Result<Auction, AuctionError> {
    info!("{:<12} --> 경매 생성 요청 처리 시작: {:?}", "Command", cmd);

    if cmd.end_time <= now {
        return Err(AuctionError::InvalidEndTime);
    }
    if cmd.starting_price <= 0 {
        return Err(AuctionError::InvalidPrice);
    }
    if let Some(reserve) = cmd.reserve_price {
        // 최저 낙찰가는 시작 가격 이상이어야 의미가 있다
        if reserve < cmd.starting_price {
            return Err(AuctionError::InvalidPrice);
        }
    }

    let auction = store
        .insert_auction(NewAuction {
            listing_id: cmd.listing_id,
            seller_id: cmd.seller_id,
            starting_price: cmd.starting_price,
            reserve_price: cmd.reserve_price,
            currency: cmd.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            end_time: cmd.end_time,
        })
        .await?;

    info!("{:<12} --> 경매 생성 성공: id={}", "Command", auction.id);
    Ok(auction)
}

/// 경매 종료
/// 1. 전체 입찰에서 낙찰 후보(최고 금액, 동률 시 선착순)를 찾는다.
/// 2. 최저 낙찰가가 설정되어 있고 미달이면 유찰: ENDED, 낙찰자 없음.
/// 3. 입찰이 없으면 CANCELLED로 종료한다.
/// 4. 이미 종료된 경매는 저장된 상태를 그대로 반환한다(멱등).
///
/// 상태 전이는 낙찰자 선정 스냅샷의 current_bid를 조건으로 하는 조건부 쓰기라서
/// 선정과 전이 사이에 입찰이 커밋되면 전이가 거부되고 새 스냅샷으로 재시도한다.
pub async fn close_auction(
    store: &impl AuctionStore,
    publisher: &impl EventPublisher,
    auction_id: i64,
    now: DateTime<Utc>,
) -> Result<Auction, AuctionError> {
    info!("{:<12} --> 경매 종료 처리 시작: id={}", "Command", auction_id);
    let mut retries = 0;

    while retries < MAX_RETRIES {
        let auction = store
            .get_auction(auction_id)
            .await?
            .ok_or(AuctionError::AuctionNotFound)?;

        // 이미 종료된 경매는 재변경 없이 반환한다
        if auction.status != AuctionStatus::Active {
            info!(
                "{:<12} --> 이미 종료된 경매: id={}, status={:?}",
                "Command", auction_id, auction.status
            );
            restore_winning_flag(store, &auction).await?;
            return Ok(auction);
        }

        let bids = store.list_bids(auction_id).await?;
        let winner = select_winner(&bids);

        // 종료 상태와 낙찰자 결정
        let (status, winning_bidder_id, winning_bid_id) = match winner {
            // 입찰 없음 -> 취소 처리
            None => (AuctionStatus::Cancelled, None, None),
            Some(bid) => match auction.reserve_price {
                // 최저 낙찰가 미달 -> 유찰
                Some(reserve) if bid.amount < reserve => (AuctionStatus::Ended, None, None),
                _ => (AuctionStatus::Ended, Some(bid.bidder_id), Some(bid.id)),
            },
        };

        // 전이는 ACTIVE이고 current_bid가 스냅샷 그대로인 행에만 반영되므로
        // 동시 종료 중 하나만 상태를 바꾸고, 선정 이후 커밋된 입찰은 탈락하지 않는다
        let transitioned = store
            .set_auction_status(auction_id, auction.current_bid, status, winning_bidder_id, now)
            .await?;
        if !transitioned {
            // 새 입찰 또는 다른 전이가 먼저 반영됨 -> 새 스냅샷으로 재시도
            warn!("{:<12} --> 종료 전이 경합: 재시도", "Command");
            retries += 1;
            continue;
        }

        if let Some(bid_id) = winning_bid_id {
            store.mark_bid_winning(bid_id).await?;
        }

        let closed = store
            .get_auction(auction_id)
            .await?
            .ok_or(AuctionError::AuctionNotFound)?;

        info!(
            "{:<12} --> 경매 종료 성공: id={}, status={:?}, winning_bidder_id={:?}",
            "Command", auction_id, closed.status, closed.winning_bidder_id
        );

        // 커밋 이후 이벤트 발행. 발행 실패가 종료 결과를 무효화하지는 않는다.
        let event = AuctionEvent::AuctionClosed {
            auction_id,
            status: closed.status,
            winning_bidder_id: closed.winning_bidder_id,
            final_price: closed.current_bid,
            timestamp: now,
        };
        if let Err(e) = publisher.publish(&event).await {
            warn!("{:<12} --> 경매 종료 이벤트 발행 실패: {}", "Command", e);
        }

        return Ok(closed);
    }

    Err(AuctionError::Contention)
}

/// 종료된 경매의 낙찰 플래그 복구
/// 상태 전이 커밋 이후 플래그 설정이 실패하면 경매 행에는 낙찰자가 기록되어
/// 있지만 어떤 입찰에도 플래그가 없는 상태가 남는다. 멱등 재종료 경로에서
/// 그 상태를 감지해 같은 선정 규칙으로 플래그를 다시 설정한다.
async fn restore_winning_flag(
    store: &impl AuctionStore,
    auction: &Auction,
) -> Result<(), AuctionError> {
    if auction.winning_bidder_id.is_none() {
        return Ok(());
    }
    let bids = store.list_bids(auction.id).await?;
    if bids.iter().any(|bid| bid.is_winning) {
        return Ok(());
    }
    if let Some(bid) = select_winner(&bids) {
        store.mark_bid_winning(bid.id).await?;
        info!(
            "{:<12} --> 낙찰 플래그 복구: auction_id={}, bid_id={}",
            "Command", auction.id, bid.id
        );
    }
    Ok(())
}

/// 경매 취소
/// 입찰이 하나라도 수락된 경매는 취소할 수 없다.
/// 전이는 입찰 없는 스냅샷의 current_bid를 조건으로 하므로 검사와 전이 사이에
/// 입찰이 커밋되면 전이가 거부되고, 재검증에서 HAS_BIDS로 거절된다.
pub async fn cancel_auction(
    store: &impl AuctionStore,
    publisher: &impl EventPublisher,
    auction_id: i64,
    now: DateTime<Utc>,
) -> Result<Auction, AuctionError> {
    info!("{:<12} --> 경매 취소 처리 시작: id={}", "Command", auction_id);
    let mut retries = 0;

    while retries < MAX_RETRIES {
        let auction = store
            .get_auction(auction_id)
            .await?
            .ok_or(AuctionError::AuctionNotFound)?;

        if auction.status != AuctionStatus::Active {
            return Err(AuctionError::AuctionNotActive);
        }
        if auction.bid_count > 0 {
            return Err(AuctionError::HasBids);
        }

        let transitioned = store
            .set_auction_status(
                auction_id,
                auction.current_bid,
                AuctionStatus::Cancelled,
                None,
                now,
            )
            .await?;
        if !transitioned {
            // 취소 직전에 입찰 또는 다른 전이가 먼저 반영됨 -> 재검증
            warn!("{:<12} --> 취소 전이 경합: 재검증", "Command");
            retries += 1;
            continue;
        }

        let cancelled = store
            .get_auction(auction_id)
            .await?
            .ok_or(AuctionError::AuctionNotFound)?;

        info!("{:<12} --> 경매 취소 성공: id={}", "Command", auction_id);

        let event = AuctionEvent::AuctionClosed {
            auction_id,
            status: cancelled.status,
            winning_bidder_id: None,
            final_price: cancelled.current_bid,
            timestamp: now,
        };
        if let Err(e) = publisher.publish(&event).await {
            warn!("{:<12} --> 경매 취소 이벤트 발행 실패: {}", "Command", e);
        }

        return Ok(cancelled);
    }

    Err(AuctionError::Contention)
}
// endregion: --- Commands

// region:    --- Sweep
/// 만료 경매 일괄 마감 결과
#[derive(Debug, Default, Serialize)]
pub struct SweepReport {
    pub closed: Vec<i64>,
    pub failed: Vec<SweepFailure>,
}

/// 개별 경매 마감 실패 내역
#[derive(Debug, Serialize)]
pub struct SweepFailure {
    pub auction_id: i64,
    pub code: &'static str,
    pub error: String,
}

/// 만료 경매 일괄 마감
/// 마감 시간이 지난 ACTIVE 경매를 각각 독립적으로 종료한다.
/// 개별 경매의 실패는 결과에 기록하고 나머지 경매 처리를 계속한다.
pub async fn sweep_expired(
    store: &impl AuctionStore,
    publisher: &impl EventPublisher,
    now: DateTime<Utc>,
) -> Result<SweepReport, AuctionError> {
    let expired = store.list_expired_active_auctions(now).await?;
    let mut report = SweepReport::default();

    for auction in expired {
        match close_auction(store, publisher, auction.id, now).await {
            Ok(_) => report.closed.push(auction.id),
            Err(e) => {
                warn!(
                    "{:<12} --> 만료 경매 마감 실패: id={}, 오류={:?}",
                    "Command", auction.id, e
                );
                report.failed.push(SweepFailure {
                    auction_id: auction.id,
                    code: e.code(),
                    error: e.to_string(),
                });
            }
        }
    }

    if !report.closed.is_empty() || !report.failed.is_empty() {
        info!(
            "{:<12} --> 만료 경매 마감 완료: 성공 {}건, 실패 {}건",
            "Command",
            report.closed.len(),
            report.failed.len()
        );
    }

    Ok(report)
}

/// 낙찰 후보 선정
/// 최고 금액 입찰을 선택하고, 같은 금액이면 먼저 접수된 입찰이 우선한다.
/// 입찰 시점에 엄격 증가가 강제되므로 동률은 정상 경로에서는 발생하지 않는다.
fn select_winner(bids: &[Bid]) -> Option<&Bid> {
    bids.iter().fold(None, |winner: Option<&Bid>, bid| match winner {
        None => Some(bid),
        Some(best) => {
            if bid.amount > best.amount
                || (bid.amount == best.amount && bid.placed_at < best.placed_at)
            {
                Some(bid)
            } else {
                Some(best)
            }
        }
    })
}
// endregion: --- Sweep
