// region:    --- Imports
use auction_engine::auction::events::AUCTION_EVENTS_TOPIC;
use auction_engine::auction_store::PgAuctionStore;
use auction_engine::database::DatabaseManager;
use auction_engine::handlers;
use auction_engine::message_broker::{KafkaEventPublisher, KafkaManager};
use auction_engine::scheduler::AuctionScheduler;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // DatabaseManager 생성
    let db_manager = Arc::new(DatabaseManager::new().await);

    // 데이터베이스 초기화
    if let Err(e) = db_manager.initialize_database().await {
        error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
        return Err(e.into());
    }
    info!("{:<12} --> 데이터베이스 초기화 성공", "Main");

    // Kafka 매니저 생성 및 이벤트 토픽 준비
    let kafka_manager = Arc::new(KafkaManager::new());
    if let Err(e) = kafka_manager.create_topic(AUCTION_EVENTS_TOPIC, 5, 1).await {
        // 이벤트 발행은 보조 경로라 브로커 없이도 서버는 띄운다
        warn!("{:<12} --> Kafka 토픽 생성 실패: {:?}", "Main", e);
    }

    // 저장소와 이벤트 발행자 구성
    let store = Arc::new(PgAuctionStore::new(Arc::clone(&db_manager)));
    let publisher = Arc::new(KafkaEventPublisher::new(kafka_manager.get_producer()));

    // 만료 경매 정리 스케줄러 시작
    let scheduler = AuctionScheduler::new(Arc::clone(&store), Arc::clone(&publisher));
    scheduler.start().await;

    // 라우터 설정
    let routes_all = handlers::app(store, publisher);

    // 리스너 생성(기본값은 3000번 포트)
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&bind_addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
