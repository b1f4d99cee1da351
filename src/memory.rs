//! # Memory Bus Abstraction
//!
//! The `MemoryBus` trait decouples the dispatcher and the instruction
//! handlers from a concrete memory layout. `FlatMemory` provides the plain
//! 64 KiB RAM the emulator shell runs programs in, and knows how to load and
//! save object images.
//!
//! ## Design Principles
//!
//! The trait follows 6502 hardware behavior:
//! - No bus errors - reads/writes always succeed
//! - Writes to ROM/unmapped regions may be ignored by an implementation

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Size of an object image: the whole 16-bit address space.
pub const IMAGE_SIZE: usize = 0x1_0000;

/// Memory bus trait for CPU to read/write bytes.
///
/// - `read(&self)`: Immutable reference allows shared reads
/// - `write(&mut self)`: Mutable reference makes side effects explicit
///
/// The trait is object safe; handlers see the bus as `&mut dyn MemoryBus`
/// so one registry can drive CPUs over different memory types.
///
/// # Examples
///
/// ```
/// use emu6502::MemoryBus;
///
/// struct RomRamMemory {
///     ram: [u8; 0x8000],
///     rom: [u8; 0x8000],
/// }
///
/// impl MemoryBus for RomRamMemory {
///     fn read(&self, addr: u16) -> u8 {
///         if addr < 0x8000 {
///             self.ram[addr as usize]
///         } else {
///             self.rom[(addr - 0x8000) as usize]
///         }
///     }
///
///     fn write(&mut self, addr: u16, value: u8) {
///         if addr < 0x8000 {
///             self.ram[addr as usize] = value;
///         }
///     }
/// }
/// ```
pub trait MemoryBus {
    /// Reads a byte from the specified 16-bit address.
    ///
    /// Must never panic. Unmapped addresses may return any value.
    fn read(&self, addr: u16) -> u8;

    /// Writes a byte to the specified 16-bit address.
    ///
    /// Must never panic. Read-only or unmapped addresses may drop the write.
    fn write(&mut self, addr: u16, value: u8);
}

/// Errors raised while moving object images between disk and memory.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The file could not be read or written.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The image is not exactly one address space long.
    #[error("object image must be {IMAGE_SIZE} bytes, got {actual}")]
    WrongSize { actual: usize },
}

/// Simple 64KB flat memory implementation.
///
/// All addresses (0x0000-0xFFFF) are writable RAM initialized to 0x00.
///
/// # Examples
///
/// ```
/// use emu6502::{FlatMemory, MemoryBus};
///
/// let mut memory = FlatMemory::new();
/// memory.write(0x4000, 0xEA);
/// assert_eq!(memory.read(0x4000), 0xEA);
/// assert_eq!(memory.read(0x4001), 0x00);
/// ```
#[derive(Clone)]
pub struct FlatMemory {
    /// 64KB contiguous memory array
    data: Box<[u8; IMAGE_SIZE]>,
}

impl FlatMemory {
    /// Creates a new FlatMemory instance with all bytes initialized to zero.
    pub fn new() -> Self {
        Self {
            data: Box::new([0; IMAGE_SIZE]),
        }
    }

    /// Builds memory from a complete object image.
    pub fn from_image(bytes: &[u8]) -> Result<Self, ImageError> {
        let mut memory = Self::new();
        memory.replace_image(bytes)?;
        Ok(memory)
    }

    /// Replaces the whole address space with `bytes`.
    pub fn replace_image(&mut self, bytes: &[u8]) -> Result<(), ImageError> {
        if bytes.len() != IMAGE_SIZE {
            return Err(ImageError::WrongSize {
                actual: bytes.len(),
            });
        }
        self.data.copy_from_slice(bytes);
        Ok(())
    }

    /// Loads an object image from disk, replacing all memory contents.
    pub fn load_image(&mut self, path: impl AsRef<Path>) -> Result<(), ImageError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| ImageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.replace_image(&bytes)
    }

    /// Writes the full address space to disk as an object image.
    pub fn save_image(&self, path: impl AsRef<Path>) -> Result<(), ImageError> {
        let path = path.as_ref();
        fs::write(path, self.as_slice()).map_err(|source| ImageError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Copies `bytes` into memory starting at `start`, wrapping at 0xFFFF.
    pub fn load(&mut self, start: u16, bytes: &[u8]) {
        for (offset, &byte) in bytes.iter().enumerate() {
            self.write(start.wrapping_add(offset as u16), byte);
        }
    }

    /// Clears every byte to zero.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// The whole address space as a slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..]
    }
}

impl Default for FlatMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBus for FlatMemory {
    fn read(&self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.data[addr as usize] = value;
    }
}
