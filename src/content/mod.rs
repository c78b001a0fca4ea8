//! Content module: how secret values are stored versus shown.
//!
//! This module provides:
//! - The closed `ContentType` enum with its labels and extensions (`kind`)
//! - The certificate payload sub-format (`certificate`)
//! - Raw <-> display transforms, clipboard and export rules (`codec`)

pub mod certificate;
pub mod codec;
pub mod kind;

pub use certificate::CertificateValueObject;
pub use codec::DisplayValue;
pub use kind::ContentType;
