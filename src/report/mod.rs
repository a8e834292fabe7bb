pub mod record;
pub mod render;
pub mod session;
pub mod sink;
pub mod structured;
pub mod terminal;
