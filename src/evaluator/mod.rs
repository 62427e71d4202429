//! Path evaluation: reads, writes and existence checks
//!
//! One navigation call runs `Start → (resolve → read/write → convert)* → done`
//! over the segments of a parsed path. There are no retries; the first failure
//! is returned with its location.

pub mod context;
pub mod factories;
pub mod navigator;

pub use context::NavigationContext;
pub use factories::{ContainerFactories, Factory};
pub use navigator::{Navigator, NavigatorBuilder};
