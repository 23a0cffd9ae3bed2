pub mod input;
pub mod snapshot;
pub mod terminal;
pub mod viewport;
