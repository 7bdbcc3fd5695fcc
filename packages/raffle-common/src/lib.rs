pub mod types;
pub mod vrf;
pub mod words;

pub use types::RaffleState;
pub use vrf::{
    ConsumerExecuteMsg, CoordinatorExecuteMsg, RANDOM_WORDS_REQUESTED_EVENT, REQUEST_ID_ATTRIBUTE,
};
pub use words::{derive_random_word, expand_random_words};
