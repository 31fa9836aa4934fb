pub(crate) mod device;
pub(crate) mod journey;
pub(crate) mod scroll_lock;
