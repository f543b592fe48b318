mod interface;
mod mutex;
mod nanoid;
mod snowflake;
mod status;
mod ulid;

pub use interface::*;
pub(crate) use mutex::*;
pub use nanoid::*;
pub use snowflake::*;
pub use status::*;
pub use ulid::*;
