pub(crate) mod preload;
