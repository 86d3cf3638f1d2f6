pub mod command;
pub mod intent;
pub mod records;
pub mod routing;

pub use command::*;
pub use intent::*;
pub use records::*;
pub use routing::*;
