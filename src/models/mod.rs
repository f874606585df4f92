pub mod delta;
pub mod diagnostics;
pub mod error;
pub mod execute;
pub mod health;
pub mod messages;
pub mod room;

pub use delta::*;
pub use diagnostics::*;
pub use error::*;
pub use execute::*;
pub use health::*;
pub use messages::*;
pub use room::*;
