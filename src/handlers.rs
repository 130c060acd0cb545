// region:    --- Imports
use crate::auction::commands::{self, CreateAuctionCommand};
use crate::auction::events::EventPublisher;
use crate::auction_store::AuctionStore;
use crate::bidding::commands::{place_bid, PlaceBidCommand};
use crate::query;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

// endregion: --- Imports

// region:    --- Router
/// 라우터 설정
/// 저장소와 이벤트 발행자가 제네릭이라 Postgres/Kafka 조합과
/// 인메모리 테스트 조합을 같은 라우터로 띄울 수 있다.
pub fn app<S, P>(store: Arc<S>, publisher: Arc<P>) -> Router
where
    S: AuctionStore + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    // 테스트 페이지를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/auctions",
            post(handle_create_auction::<S, P>).get(handle_get_auctions::<S, P>),
        )
        .route("/bid", post(handle_bid::<S, P>))
        .route("/auction/:id", get(handle_get_auction::<S, P>))
        .route("/auction/:id/close", post(handle_close_auction::<S, P>))
        .route("/auction/:id/cancel", post(handle_cancel_auction::<S, P>))
        .route("/auction/:id/bids", get(handle_get_bid_history::<S, P>))
        .route(
            "/auction/:id/highest-bid",
            get(handle_get_highest_bid::<S, P>),
        )
        .route("/sweep", post(handle_sweep::<S, P>))
        .layer(cors)
        .layer(DefaultBodyLimit::max(1024 * 1024 * 20)) // 동시성을 위한 바디 사이즈 10배 증가(20MB)
        .with_state((store, publisher))
}

// endregion: --- Router

// region:    --- Command Handlers

/// 경매 생성 요청 처리
pub async fn handle_create_auction<S, P>(
    State((store, _)): State<(Arc<S>, Arc<P>)>,
    Json(cmd): Json<CreateAuctionCommand>,
) -> impl IntoResponse
where
    S: AuctionStore + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    info!("{:<12} --> 경매 생성 요청 처리 시작: {:?}", "Handler", cmd);

    match commands::create_auction(store.as_ref(), cmd, Utc::now()).await {
        Ok(auction) => (axum::http::StatusCode::CREATED, Json(auction)).into_response(),
        Err(e) => (e.status_code(), Json(e.to_body())).into_response(),
    }
}

/// 입찰 요청 처리
pub async fn handle_bid<S, P>(
    State((store, publisher)): State<(Arc<S>, Arc<P>)>,
    Json(cmd): Json<PlaceBidCommand>,
) -> impl IntoResponse
where
    S: AuctionStore + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "Handler", cmd);

    match place_bid(store.as_ref(), publisher.as_ref(), cmd, Utc::now()).await {
        Ok(bid) => (
            axum::http::StatusCode::OK,
            Json(serde_json::json!({
                "message": "입찰이 성공적으로 처리되었습니다.",
                "bid_id": bid.id,
                "auction_id": bid.auction_id,
                "amount": bid.amount,
                "currency": bid.currency
            })),
        )
            .into_response(),
        Err(e) => (e.status_code(), Json(e.to_body())).into_response(),
    }
}

/// 경매 마감 요청 처리
pub async fn handle_close_auction<S, P>(
    State((store, publisher)): State<(Arc<S>, Arc<P>)>,
    Path(auction_id): Path<i64>,
) -> impl IntoResponse
where
    S: AuctionStore + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    info!("{:<12} --> 경매 마감 요청 처리 시작: {}", "Handler", auction_id);

    match commands::close_auction(store.as_ref(), publisher.as_ref(), auction_id, Utc::now()).await
    {
        Ok(auction) => (axum::http::StatusCode::OK, Json(auction)).into_response(),
        Err(e) => (e.status_code(), Json(e.to_body())).into_response(),
    }
}

/// 경매 취소 요청 처리
pub async fn handle_cancel_auction<S, P>(
    State((store, publisher)): State<(Arc<S>, Arc<P>)>,
    Path(auction_id): Path<i64>,
) -> impl IntoResponse
where
    S: AuctionStore + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    info!("{:<12} --> 경매 취소 요청 처리 시작: {}", "Handler", auction_id);

    match commands::cancel_auction(store.as_ref(), publisher.as_ref(), auction_id, Utc::now()).await
    {
        Ok(auction) => (axum::http::StatusCode::OK, Json(auction)).into_response(),
        Err(e) => (e.status_code(), Json(e.to_body())).into_response(),
    }
}

/// 만료 경매 일괄 마감 요청 처리
pub async fn handle_sweep<S, P>(
    State((store, publisher)): State<(Arc<S>, Arc<P>)>,
) -> impl IntoResponse
where
    S: AuctionStore + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    info!("{:<12} --> 만료 경매 일괄 마감 요청 처리 시작", "Handler");

    match commands::sweep_expired(store.as_ref(), publisher.as_ref(), Utc::now()).await {
        Ok(report) => (axum::http::StatusCode::OK, Json(report)).into_response(),
        Err(e) => (e.status_code(), Json(e.to_body())).into_response(),
    }
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 경매 조회
pub async fn handle_get_auction<S, P>(
    State((store, _)): State<(Arc<S>, Arc<P>)>,
    Path(auction_id): Path<i64>,
) -> impl IntoResponse
where
    S: AuctionStore + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    info!("{:<12} --> 경매 조회 id: {}", "HandlerQuery", auction_id);
    match query::handlers::get_auction(store.as_ref(), auction_id).await {
        Ok(auction) => Json(auction).into_response(),
        Err(e) => (e.status_code(), Json(e.to_body())).into_response(),
    }
}

/// 모든 경매 조회
pub async fn handle_get_auctions<S, P>(
    State((store, _)): State<(Arc<S>, Arc<P>)>,
) -> impl IntoResponse
where
    S: AuctionStore + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    info!("{:<12} --> 모든 경매 조회", "HandlerQuery");
    match query::handlers::get_all_auctions(store.as_ref()).await {
        Ok(auctions) => Json(auctions).into_response(),
        Err(e) => (e.status_code(), Json(e.to_body())).into_response(),
    }
}

/// 입찰 이력 조회
pub async fn handle_get_bid_history<S, P>(
    State((store, _)): State<(Arc<S>, Arc<P>)>,
    Path(auction_id): Path<i64>,
) -> impl IntoResponse
where
    S: AuctionStore + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    info!(
        "{:<12} --> 입찰 이력 조회 id: {}",
        "HandlerQuery", auction_id
    );
    match query::handlers::get_bid_history(store.as_ref(), auction_id).await {
        Ok(history) => Json(history).into_response(),
        Err(e) => (e.status_code(), Json(e.to_body())).into_response(),
    }
}

/// 최고 입찰가 조회
pub async fn handle_get_highest_bid<S, P>(
    State((store, _)): State<(Arc<S>, Arc<P>)>,
    Path(auction_id): Path<i64>,
) -> impl IntoResponse
where
    S: AuctionStore + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    info!(
        "{:<12} --> 최고 입찰가 조회 id: {}",
        "HandlerQuery", auction_id
    );
    match query::handlers::get_highest_bid(store.as_ref(), auction_id).await {
        Ok(highest) => Json(highest).into_response(),
        Err(e) => (e.status_code(), Json(e.to_body())).into_response(),
    }
}

// endregion: --- Query Handlers
