pub mod chat;
pub mod games;
