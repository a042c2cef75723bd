pub(crate) mod composite;
pub(crate) mod pixmap;
pub(crate) mod surface;
