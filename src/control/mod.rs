pub mod input_gate;
pub mod lander;
pub mod landing;
pub mod propulsion;
