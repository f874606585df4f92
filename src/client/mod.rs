pub mod editor;
pub mod replica;

pub use editor::{EditorSurface, PlainTextBuffer};
pub use replica::ClientReplica;
