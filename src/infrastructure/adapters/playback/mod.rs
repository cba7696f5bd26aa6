//! Playback Adapter - 节点播放实现

mod asterisk_player;

pub use asterisk_player::AsteriskPlayer;
