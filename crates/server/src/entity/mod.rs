//! Game entities.
//!
//! Players are driven by client input; coins are passive collectibles.

mod coin;
mod player;

pub use coin::{Coin, CoinId, TierTable};
pub use player::{Player, PlayerName};
