mod common;
pub use self::common::{NoQuery, Query};

mod cursor;
pub use self::cursor::{CursorQuery, MAX_LIMIT};
