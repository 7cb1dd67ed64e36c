pub mod geom;
pub mod google;
