/// 경매 조회
pub const GET_AUCTION: &str =
    "SELECT id, listing_id, seller_id, starting_price, reserve_price, current_bid, currency, bid_count, status, end_time, winning_bidder_id, created_at, updated_at FROM auctions WHERE id = $1";

/// 모든 경매 조회
pub const GET_ALL_AUCTIONS: &str =
    "SELECT id, listing_id, seller_id, starting_price, reserve_price, current_bid, currency, bid_count, status, end_time, winning_bidder_id, created_at, updated_at FROM auctions ORDER BY created_at DESC, id DESC";

/// 마감 시각이 지난 진행 중 경매 조회
pub const GET_EXPIRED_ACTIVE_AUCTIONS: &str =
    "SELECT id, listing_id, seller_id, starting_price, reserve_price, current_bid, currency, bid_count, status, end_time, winning_bidder_id, created_at, updated_at FROM auctions WHERE status = 'ACTIVE' AND end_time <= $1";

/// 최고 입찰가 조회
pub const GET_HIGHEST_BID: &str =
    "SELECT MAX(amount) as highest_bid FROM bids WHERE auction_id = $1";

/// 입찰 이력 조회
pub const GET_BID_HISTORY: &str = r#"
    SELECT id, auction_id, bidder_id, amount, currency, placed_at, is_winning
    FROM bids
    WHERE auction_id = $1
    ORDER BY placed_at DESC, id DESC
"#;
