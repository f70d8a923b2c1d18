//! Single-round-trip upstream services
//!
//! Each client wraps one remote API behind the shared [`HttpTransport`]:
//!
//! - [`youtube::YoutubeClient`] -- video id parsing, title, duration, thumbnail, search
//! - [`dictionary::DictionaryClient`] -- Urban Dictionary definitions
//! - [`insult::InsultClient`] -- scraped insult generator
//! - [`hastebin::HastebinClient`] -- paste posting
//! - [`osu::OsuClient`] -- osu! player stats
//!
//! [`HttpTransport`]: crate::transport::HttpTransport

pub mod dictionary;
pub mod hastebin;
pub mod insult;
pub mod osu;
pub mod youtube;

pub use dictionary::DictionaryClient;
pub use hastebin::HastebinClient;
pub use insult::InsultClient;
pub use osu::OsuClient;
pub use youtube::{VideoDuration, VideoInfo, YoutubeClient};
