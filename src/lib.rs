pub mod bitops;
pub mod error;
pub mod numerics;
pub mod statistics;
