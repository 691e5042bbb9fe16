//! CPU implementations of the operation traits

mod calibration;
mod reduce;
