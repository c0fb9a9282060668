mod follow;
mod palette;
mod people;
mod sampler;
mod search;
mod session;
mod tags;

pub use palette::DisplayColor;
pub use people::{Person, PersonId, SizeScale};
pub use sampler::SnapshotSampler;
pub use search::{people_matching, tags_matching};
pub use session::{NetworkState, Session, SessionConfig};
pub use tags::tag_key;
