//! Build matrix expansion
//!
//! Flattens the Qt release, platform, compiler and compiler-version axes into
//! one [`Configuration`] per combination. Expansion is pure: it reads the axis
//! tables and either returns the whole matrix or fails before producing any of it.

pub mod builder;
pub mod lookup;
pub mod types;

pub use builder::{MatrixBuilder, build};
pub use types::{
    BaseImage, Compiler, Configuration, Matrix, MatrixError, Platform, PlatformKind, QtRelease,
    Schema,
};
