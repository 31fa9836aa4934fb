pub(crate) mod journey;
