pub mod controller;
pub mod input;
pub mod queue;
pub mod result;
pub mod round;
pub mod view;
