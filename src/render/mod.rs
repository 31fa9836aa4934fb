pub(crate) mod geometry;
pub(crate) mod renderer;
pub(crate) mod surface;
pub(crate) mod viewport;
