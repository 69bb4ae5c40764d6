pub mod anime;
pub mod movie;
pub mod music;
pub mod preferences;

pub use anime::*;
pub use movie::*;
pub use music::*;
pub use preferences::*;
