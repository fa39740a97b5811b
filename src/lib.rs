//! # Image Conditioner
//!
//! Batch-transforms raster images through a selectable, named *conditioning
//! profile*: resize, recolor, auto-crop, watermark, rotate. Results go to a
//! target directory, and a file that already exists there is never
//! overwritten.
//!
//! # Architecture
//!
//! ```text
//! ProfileRegistry ──resolve(id)──▶ Profile ──┐
//!                                            ▼
//! source ─decode─▶ PixelBuffer ─▶ Conditioner ─profile─▶ PixelBuffer ─encode─▶ target
//!                                   │   ▲
//!                     extra_data ───┘   └── naming (target path, format)
//! ```
//!
//! Decoding and encoding sit behind the [`imaging::ImageBackend`] trait. The
//! transforms themselves work on an in-memory [`imaging::PixelBuffer`] and
//! never touch the filesystem, so they are tested without any image files.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`profiles`] | Profile declarations, the registry, and the built-in profile table |
//! | [`extra_data`] | Parsers for profile parameter strings (`"800x600"`, `"10,20,10,20"`) |
//! | [`imaging`] | Pixel buffer, transforms (resize, remap + crop, auto-crop) and the `image` crate codec |
//! | [`condition`] | The orchestrator: target resolution, dispatch, no-overwrite guarantee |
//! | [`naming`] | Target path and output format resolution |
//! | [`scan`] | Source directory enumeration |
//! | [`config`] | `conditioner.toml` loading, merging and validation |
//! | [`types`] | [`types::ConditioningResult`] and the JSON batch report |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Capabilities Instead of Signatures
//!
//! A profile states how it is called ([`profiles::Capability`]) when it is
//! declared: plain, with an explicit output format, or with an extra data
//! string. The orchestrator matches on that tag, and inconsistent
//! declarations are rejected when the registry is built.
//!
//! ## Interpolation Travels With the Call
//!
//! Each profile carries its resampling quality and the orchestrator passes it
//! to the profile function. Nothing in the transform layer holds state
//! between calls.
//!
//! ## Skip, Never Overwrite
//!
//! The target path is checked before decoding and again after a profile
//! changes the output extension. Both checks turn a collision into
//! [`types::Operation::SkippedExisting`], which is a result, not an error.

pub mod condition;
pub mod config;
pub mod extra_data;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod profiles;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
