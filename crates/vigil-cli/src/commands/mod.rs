pub mod env;
pub mod listen;
pub mod services;
pub mod stt;
