pub(crate) mod core;
pub(crate) mod error;
pub(crate) mod latch;
pub(crate) mod math;
