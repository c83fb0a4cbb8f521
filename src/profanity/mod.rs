// Profanity screening — term list store + whole-word matcher.
//
// The vocabulary is loaded once before the server accepts connections and
// never mutated afterwards, so it is shared read-only across requests
// without locking.

pub mod matcher;
pub mod store;
