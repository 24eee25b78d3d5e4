// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain Rust types that describe Fashion-MNIST in its own terms:
// what a class is, what a grayscale image is, and what a sample
// source looks like.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O or network calls
//   - Only plain Rust structs, enums, and traits
//
// Everything here can be unit tested without a backend.

// The ten Fashion-MNIST clothing classes
pub mod labels;

// A row-major grayscale image with a terminal preview
pub mod image;

// Core abstractions (traits) that other layers implement
pub mod traits;
