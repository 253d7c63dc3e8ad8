//! Text helpers shared by the history store and its listings

pub mod compact;
pub mod format;
