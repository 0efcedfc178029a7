// BefunGen code generation back end
//
// Lays out Befunge-93 programs on a two-dimensional grid: fragments of command
// cells are composed, compressed and mirrored until each method forms one
// contiguous block that a linker can resolve and a serializer can print.

#[macro_use]
extern crate lazy_static;

pub mod codegen;
