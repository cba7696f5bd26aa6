//! Assembler Adapter - 音频拼接实现

mod raw_assembler;
mod sox_assembler;

pub use raw_assembler::RawConcatAssembler;
pub use sox_assembler::SoxAssembler;
