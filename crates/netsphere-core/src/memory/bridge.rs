//! Typed reads and writes through a two-level pointer chain.
//!
//! `base + base_offset` holds a pointer into the game's heap; the field sits at
//! a fixed offset from that pointer. Each call performs its reads afresh and
//! never retries: the game mutates the same memory concurrently, so a value is
//! only a snapshot and a write is fire-and-forget.

use std::fmt;
use std::marker::PhantomData;

use serde::Serialize;
use strum::{Display, IntoStaticStr};

use crate::error::{Error, Result};
use crate::memory::layout::BaseRegion;
use crate::process::{ReadMemory, WriteMemory};

/// A plain value with a fixed little-endian width in target memory.
pub trait FieldValue: Copy + fmt::Debug {
    const WIDTH: usize;

    /// Decode from exactly `WIDTH` bytes.
    fn from_le_slice(bytes: &[u8]) -> Self;

    fn to_le_vec(self) -> Vec<u8>;
}

macro_rules! impl_field_value {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                fn from_le_slice(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(&bytes[..Self::WIDTH]);
                    <$ty>::from_le_bytes(raw)
                }

                fn to_le_vec(self) -> Vec<u8> {
                    self.to_le_bytes().to_vec()
                }
            }
        )*
    };
}

impl_field_value!(u8, u32, i32, f32);

/// What a live field means to the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, IntoStaticStr, Display)]
pub enum FieldKind {
    #[strum(serialize = "Fullscreen")]
    Fullscreen,
    #[strum(serialize = "Graphics Quality")]
    GraphicsQuality,
    #[strum(serialize = "Aspect Ratio")]
    AspectRatio,
}

/// Compile-time description of one live field.
///
/// The value type is part of the descriptor, so reading a 1-byte flag as a
/// float cannot be written down.
#[derive(Debug, Clone, Copy)]
pub struct Field<T> {
    pub name: &'static str,
    pub kind: FieldKind,
    pub base: BaseRegion,
    pub sub_offset: u64,
    _value: PhantomData<T>,
}

/// Untyped view of a [`Field`], for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: FieldKind,
    pub base_offset: u64,
    pub sub_offset: u64,
    pub width: usize,
}

impl<T> Field<T> {
    pub const fn new(
        name: &'static str,
        kind: FieldKind,
        base: BaseRegion,
        sub_offset: u64,
    ) -> Self {
        Self {
            name,
            kind,
            base,
            sub_offset,
            _value: PhantomData,
        }
    }
}

impl<T: FieldValue> Field<T> {
    pub fn width(&self) -> usize {
        T::WIDTH
    }

    pub fn descriptor(&self) -> FieldDescriptor {
        FieldDescriptor {
            name: self.name,
            kind: self.kind,
            base_offset: self.base.offset(),
            sub_offset: self.sub_offset,
            width: T::WIDTH,
        }
    }

    pub fn read<M: ReadMemory + ?Sized>(&self, mem: &M) -> Result<T> {
        read_field(mem, self.base.offset(), self.sub_offset)
    }

    pub fn write<M: ReadMemory + WriteMemory + ?Sized>(&self, mem: &M, value: T) -> Result<()> {
        write_field(mem, self.base.offset(), self.sub_offset, value)
    }
}

/// Follow the pointer stored at `base + base_offset`.
pub fn resolve_pointer<M: ReadMemory + ?Sized>(mem: &M, base_offset: u64) -> Result<u64> {
    let slot = mem.base_address().wrapping_add(base_offset);
    let pointer = mem.read_u64(slot)?;
    if pointer == 0 {
        return Err(Error::NullPointer { address: slot });
    }
    Ok(pointer)
}

/// Read a `T` at `*(base + base_offset) + sub_offset`.
pub fn read_field<T, M>(mem: &M, base_offset: u64, sub_offset: u64) -> Result<T>
where
    T: FieldValue,
    M: ReadMemory + ?Sized,
{
    let pointer = resolve_pointer(mem, base_offset)?;
    let bytes = mem.read_bytes(pointer.wrapping_add(sub_offset), T::WIDTH)?;
    Ok(T::from_le_slice(&bytes))
}

/// Write a `T` at `*(base + base_offset) + sub_offset`.
pub fn write_field<T, M>(mem: &M, base_offset: u64, sub_offset: u64, value: T) -> Result<()>
where
    T: FieldValue,
    M: ReadMemory + WriteMemory + ?Sized,
{
    let pointer = resolve_pointer(mem, base_offset)?;
    mem.write_bytes(pointer.wrapping_add(sub_offset), &value.to_le_vec())
}
