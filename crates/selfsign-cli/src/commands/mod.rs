pub mod generate;
pub mod identity;
pub mod misc;
pub mod passphrase;
pub mod sign;
