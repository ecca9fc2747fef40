mod builder;
mod export;
mod scaler;
mod webmanifest;

pub mod catalogue;
pub mod optimize;

pub use builder::{Artifact, Favicon};
pub use export::{encode_png, write_atomic, DEFAULT_LEVEL, ICO_LEVEL};
pub use scaler::Scaler;
pub use webmanifest::{ManifestIcon, WebManifest};
