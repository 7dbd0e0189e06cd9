//! Problem definitions solved with the non-linear least-squares backends.

pub mod cornea_center;
