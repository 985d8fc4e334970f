//! Output configuration for the renderer.

/// Controls which optional sections a disassembly listing contains.
///
/// The mandatory parts (header, declaration, members, instructions and every attribute) are
/// always printed; these switches only add detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct DisassemblyConfig {
    /// Print low-level detail: stack map frames, raw bytes of opaque attributes, member flag
    /// hex and code sizes
    pub verbose: bool,

    /// Print the constant pool table after the class header
    pub constant_pool: bool,

    /// Print the MD5 digest of the input as the first line
    pub hash: bool,

    /// Print stack map frames even when `verbose` is off
    pub frames: bool,
}

impl DisassemblyConfig {
    /// Mandatory sections only.
    #[must_use]
    pub fn minimal() -> Self {
        Self::default()
    }

    /// Low-level detail without the constant pool table.
    #[must_use]
    pub fn verbose() -> Self {
        Self {
            verbose: true,
            frames: true,
            ..Self::default()
        }
    }

    /// Everything, including the constant pool table and the input digest.
    #[must_use]
    pub fn full() -> Self {
        Self {
            verbose: true,
            constant_pool: true,
            hash: true,
            frames: true,
        }
    }

    /// Returns `true` if stack map frames should be printed.
    #[must_use]
    pub fn show_frames(&self) -> bool {
        self.verbose || self.frames
    }
}
