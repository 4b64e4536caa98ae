mod blocking;
mod tile;

pub use blocking::BlockingQueue;
pub use blocking::Fifo;
pub use blocking::MessageQueue;
pub use tile::CursorPosition;
pub use tile::TileDesc;
pub use tile::TilePolicy;
pub use tile::TileQueue;
