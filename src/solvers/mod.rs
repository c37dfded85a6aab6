pub mod boundary;
pub mod glace2d;
