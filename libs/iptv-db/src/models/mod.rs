pub mod account;
pub mod catalog;

pub use account::{Reseller, User, UserStatus};
pub use catalog::{Channel, Episode, NewChannel, NewEpisode, NewSeries, NewVod, Series, Vod};
