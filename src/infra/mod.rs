//! Infrastructure shared by the protocol components: payload codecs and
//! numeric conversions.
pub mod codec;
