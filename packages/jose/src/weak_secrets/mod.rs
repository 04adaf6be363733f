//! Weak HMAC secret search against a captured token

mod session;
mod wordlist;

pub use self::session::{SearchCompletion, SearchSession, SearchState, SearchStatus, WeakSecretSearch};
pub use self::wordlist::{SearchConfig, Wordlist};
