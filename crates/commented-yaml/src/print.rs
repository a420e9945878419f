pub(crate) mod flow;
pub(crate) mod misc;
pub(crate) mod scalar;
