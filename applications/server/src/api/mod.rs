/// API route modules
pub mod audio;
pub mod auth;
pub mod favorites;
pub mod health;
pub mod playback;
