pub const BLOCK_BYTES: usize = 16;

/// 16 fingerprint bytes on a 16-byte boundary, the unit the SSSE3 kernel
/// loads with aligned reads. A `&[AlignedBlock]` is therefore a byte
/// fingerprint whose storage is guaranteed to be aligned.
#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlignedBlock {
    pub data: [u8; BLOCK_BYTES],
}

const _: () = assert!(size_of::<AlignedBlock>() == BLOCK_BYTES);

impl AlignedBlock {
    pub fn new(data: [u8; BLOCK_BYTES]) -> Self {
        AlignedBlock { data }
    }

    /// Copies `data` into aligned blocks, zero-filling the last one. Zero
    /// padding leaves every popcount unchanged.
    pub fn allocate_padded(data: &[u8]) -> Vec<AlignedBlock> {
        let mut returned = Vec::with_capacity(data.len().div_ceil(BLOCK_BYTES));

        let (chunked, remainder) = data.as_chunks::<BLOCK_BYTES>();
        for &chunk in chunked.iter() {
            returned.push(Self::new(chunk));
        }

        if !remainder.is_empty() {
            let mut remainder_data = [0u8; BLOCK_BYTES];
            remainder_data[..remainder.len()].copy_from_slice(remainder);
            returned.push(Self::new(remainder_data));
        }
        returned
    }

    /// Views a run of blocks as a plain byte fingerprint.
    pub fn as_bytes(blocks: &[AlignedBlock]) -> &[u8] {
        // SAFETY: AlignedBlock is repr(C) around a [u8; 16] and has size 16
        // (checked above), so the blocks are a contiguous, initialized run of
        // blocks.len() * 16 bytes living as long as `blocks`.
        unsafe { std::slice::from_raw_parts(blocks.as_ptr().cast::<u8>(), size_of_val(blocks)) }
    }
}
