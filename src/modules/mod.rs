pub mod asset;
pub mod drm;
pub mod job;
pub mod locator;
pub mod transform;
