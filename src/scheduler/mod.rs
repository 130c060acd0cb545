/// 경매 마감 스케줄러
/// 마감 시각이 지난 ACTIVE 경매를 주기적으로 정리한다.
/// 명시적 closeAuction 호출과 같은 경로를 타므로 둘이 겹쳐도 한 쪽만 적용된다.
// region:    --- Imports
use crate::auction::commands;
use crate::auction::events::EventPublisher;
use crate::auction_store::AuctionStore;
use chrono::Utc;
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{debug, error};

// endregion: --- Imports

// region:    --- Auction Scheduler
/// 경매 마감 스케줄러
pub struct AuctionScheduler<S, P> {
    store: Arc<S>,
    publisher: Arc<P>,
}

/// 경매 마감 스케줄러 생성
impl<S, P> AuctionScheduler<S, P>
where
    S: AuctionStore + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>, publisher: Arc<P>) -> Self {
        Self { store, publisher }
    }

    /// 경매 마감 스케줄러 시작
    pub async fn start(&self) {
        let store = Arc::clone(&self.store);
        let publisher = Arc::clone(&self.publisher);
        tokio::spawn(async move {
            let mut interval = interval(Duration::from_secs(1)); // 1초마다 실행
            loop {
                interval.tick().await;
                match commands::sweep_expired(store.as_ref(), publisher.as_ref(), Utc::now())
                    .await
                {
                    Ok(report) => {
                        if !report.closed.is_empty() {
                            debug!(
                                "{:<12} --> 만료 경매 {}건이 마감되었습니다.",
                                "Scheduler",
                                report.closed.len()
                            );
                        }
                    }
                    Err(e) => {
                        error!(
                            "{:<12} --> 만료 경매 정리 중 오류 발생: {:?}",
                            "Scheduler", e
                        );
                    }
                }
            }
        });
    }
}
// endregion: --- Auction Scheduler
