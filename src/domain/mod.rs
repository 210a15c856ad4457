pub mod event;
pub mod money;
pub mod ports;
pub mod retry;
