mod uuid;
pub use uuid::*;

mod handle;
pub use handle::*;

mod node;
pub use node::*;

mod reader;
pub use reader::*;

mod asset;
pub use asset::*;

mod vfs;
pub use vfs::*;

mod registry;
pub use registry::*;

mod loaders;

pub mod assets;
pub use assets::*;
