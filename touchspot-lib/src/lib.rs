pub mod color;
pub mod config;
pub mod contact;
pub mod event;
pub mod frame;
pub mod log;
pub mod render;
pub mod scene;
pub mod sound;
pub mod visual;

pub use color::{session_rng, ColorAllocator, Palette, Rgb};
pub use config::TouchspotConfig;
pub use contact::{Contact, ContactError, ContactId, ContactRegistry, SourceKind};
pub use event::InputEvent;
pub use frame::{Clock, EventSource, FrameScheduler};
pub use render::{MarkerAssets, Point, Renderer, Size, TextRenderer, Texture};
pub use scene::SceneController;
pub use sound::{ChannelPool, Mixer, SoundCue};
