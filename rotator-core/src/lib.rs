//! Rotator Core — the screening engine behind the momentum rotator.
//!
//! This crate contains everything below orchestration:
//! - Domain types (bars, market tickers, products, candidates, advisories)
//! - Indicator engine (SMA, RSI, ATR-percent) with NaN as the missing value
//! - Ordered eligibility filter with structured skip reasons
//! - Composite scoring and top-N selection
//! - Advisory price levels for ranked candidates
//! - Persisted top-list state: load, diff, save
//! - Blocking market-data clients behind source traits

pub mod data;
pub mod domain;
pub mod indicators;
pub mod screen;
pub mod state;

#[cfg(test)]
mod send_sync_checks {
    //! Core types cross thread boundaries in callers; lock that in.

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn domain_types_are_send_sync() {
        assert_send::<crate::domain::Bar>();
        assert_sync::<crate::domain::Bar>();
        assert_send::<crate::domain::MarketTicker>();
        assert_sync::<crate::domain::MarketTicker>();
        assert_send::<crate::domain::Candidate>();
        assert_sync::<crate::domain::Candidate>();
        assert_send::<crate::domain::SkipReason>();
        assert_sync::<crate::domain::SkipReason>();
    }

    #[test]
    fn screen_types_are_send_sync() {
        assert_send::<crate::screen::Thresholds>();
        assert_sync::<crate::screen::Thresholds>();
    }

    #[test]
    fn errors_are_send_sync() {
        assert_send::<crate::data::MarketDataError>();
        assert_sync::<crate::data::MarketDataError>();
    }

    #[test]
    fn clients_are_send_sync() {
        assert_send::<crate::data::CoinGeckoClient>();
        assert_sync::<crate::data::CoinGeckoClient>();
        assert_send::<crate::data::CoinbaseClient>();
        assert_sync::<crate::data::CoinbaseClient>();
    }
}
