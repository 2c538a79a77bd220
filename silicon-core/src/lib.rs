pub mod architecture;
pub mod error;
pub mod header;
pub mod probe;
pub mod reader;

pub use architecture::*;
pub use error::*;
pub use probe::*;
pub use reader::*;
