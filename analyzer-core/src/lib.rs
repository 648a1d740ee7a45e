mod card;
mod contract;
mod deal;
mod hand;

pub use card::{Card, Rank, Suit};
pub use contract::{Contract, ContractError, Strain};
pub use deal::{Deal, Position};
pub use hand::Hand;
