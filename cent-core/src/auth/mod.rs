// Authentication token support

pub use self::token::{ConnectionClaims, SubscriptionClaims, TokenSigner};

mod token;
