pub mod point;
pub mod ring;
pub mod vector;
