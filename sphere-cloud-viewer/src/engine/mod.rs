pub mod camera;
pub mod controls;
pub mod point_cloud;
pub mod shaders;
