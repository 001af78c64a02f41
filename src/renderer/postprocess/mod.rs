//! Screen-space passes that follow the impostor passes: occlusion
//! accumulation, the occlusion composite, antialiasing, depth of field and
//! display.

pub mod accumulate;
pub mod ao;
pub mod chain;
pub mod display;
pub mod dof;
pub mod fxaa;
