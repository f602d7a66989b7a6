pub mod logging;
pub mod mirror;
pub mod pathway;
pub mod progression;
