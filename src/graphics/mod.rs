pub mod font;
pub mod palette;
pub mod sprite;
pub mod tileset;
