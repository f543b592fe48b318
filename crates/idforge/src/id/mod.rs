mod snowflake;
mod ulid;

pub use snowflake::*;
pub use ulid::*;
