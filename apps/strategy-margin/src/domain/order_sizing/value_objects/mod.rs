//! Order Sizing Value Objects

mod lot_search;

pub use lot_search::LotSearchResult;
