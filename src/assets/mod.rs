mod animation;
mod audio;
mod generic;
mod material;
mod mesh;
mod shader;
mod sprite;
mod texture;

pub use animation::*;
pub use audio::*;
pub use generic::*;
pub use material::*;
pub use mesh::*;
pub use shader::*;
pub use sprite::*;
pub use texture::*;
