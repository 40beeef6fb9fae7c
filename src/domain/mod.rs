// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust structs and traits that define the core concepts
// of the system.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O or network calls
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// One labelled grayscale image
pub mod sample;

// Per-epoch metrics, training history, evaluation result
pub mod history;

// Emotion score maps and the dominant emotion
pub mod emotion;

// Core abstractions (traits) that other layers implement
pub mod traits;
