mod clip;
mod player;

pub use clip::AudioClip;
pub use player::AudioPlayer;
