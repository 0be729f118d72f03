pub mod booking;
pub mod color;
