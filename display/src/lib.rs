pub use text::{DebugDisplay, TextDisplay};

mod text;
