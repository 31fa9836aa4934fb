pub(crate) mod export;
pub(crate) mod ffmpeg;
pub(crate) mod png;
pub(crate) mod sink;
