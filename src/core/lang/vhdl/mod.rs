//! Extraction of a VHDL entity interface and generation of its testbench.
//!
//! Source code is handled one line at a time: [line] classifies lines by
//! their leading keyword, [interface] parses the declarations inside generic
//! and port lists, [symbols::entity] drives both over a file, and [testbench]
//! writes the harness from the result.

pub mod error;
pub mod format;
pub mod interface;
pub mod line;
pub mod symbols;
pub mod testbench;
