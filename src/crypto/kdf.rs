//! Key strengthening for KeePass 1.x.
//!
//! The composite key is split into two 16-byte lanes.  Each lane is
//! encrypted `rounds` times in ECB mode with a block cipher keyed by the
//! header's transform seed, then `SHA-256(left || right)` is the
//! transformed key.  The lanes are independent, so they can be stretched
//! on two threads with identical results.
//!
//! `rounds` comes from the file, so it is checked against a ceiling
//! before any work is done.

use aes::cipher::consts::U16;
use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockEncrypt, BlockSizeUser, KeyInit};
use aes::Aes256;
use sha2::{Digest, Sha256};
use twofish::Twofish;
use zeroize::{Zeroize, Zeroizing};

use super::keys::{CompositeKey, KEY_LEN};
use crate::errors::{Kdb1Error, Result};
use crate::format::header::Cipher;

/// Length of one lane (one cipher block).
const LANE_LEN: usize = 16;

/// Default ceiling on transform rounds.
///
/// KeePass 1.x defaults to 6 000 rounds; fifty million takes a few
/// seconds with AES-NI.
pub const DEFAULT_MAX_TRANSFORM_ROUNDS: u32 = 50_000_000;

/// Configurable key transform parameters.
#[derive(Debug, Clone, Copy)]
pub struct TransformParams {
    /// Files declaring more rounds are rejected with `ExcessiveRounds`.
    pub max_rounds: u32,
    /// Stretch the two lanes on separate threads.
    pub parallel: bool,
    /// Block cipher used for stretching.  KeePass 1.x always uses AES-256.
    pub cipher: Cipher,
}

impl Default for TransformParams {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_TRANSFORM_ROUNDS,
            parallel: true,
            cipher: Cipher::Aes256,
        }
    }
}

/// Stretch `composite` with the default parameters.
pub fn transform_key(
    composite: &CompositeKey,
    transform_seed: &[u8; 32],
    rounds: u32,
) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    transform_key_with_params(composite, transform_seed, rounds, &TransformParams::default())
}

/// Stretch `composite` with explicit parameters.
///
/// The same composite key, seed, rounds and cipher always produce the
/// same output, whether or not the lanes run in parallel.
pub fn transform_key_with_params(
    composite: &CompositeKey,
    transform_seed: &[u8; 32],
    rounds: u32,
    params: &TransformParams,
) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    if rounds > params.max_rounds {
        return Err(Kdb1Error::ExcessiveRounds {
            rounds,
            max: params.max_rounds,
        });
    }

    let mut lanes = match params.cipher {
        Cipher::Aes256 => {
            stretch_lanes::<Aes256>(composite.as_bytes(), transform_seed, rounds, params.parallel)?
        }
        Cipher::Twofish => {
            stretch_lanes::<Twofish>(composite.as_bytes(), transform_seed, rounds, params.parallel)?
        }
    };

    let transformed: [u8; KEY_LEN] = Sha256::digest(lanes).into();
    lanes.zeroize();

    tracing::debug!(rounds, cipher = %params.cipher, "key transform complete");
    Ok(Zeroizing::new(transformed))
}

/// Stretch both lanes of `key` and return them concatenated.
fn stretch_lanes<C>(
    key: &[u8; KEY_LEN],
    seed: &[u8; 32],
    rounds: u32,
    parallel: bool,
) -> Result<[u8; KEY_LEN]>
where
    C: BlockEncrypt + BlockSizeUser<BlockSize = U16> + KeyInit,
{
    let (left_in, right_in) = key.split_at(LANE_LEN);

    let (left, right) = if parallel {
        std::thread::scope(|s| {
            let worker = s.spawn(|| stretch_lane::<C>(seed, left_in, rounds));
            let right = stretch_lane::<C>(seed, right_in, rounds);
            let left = worker.join().map_err(|_| {
                Kdb1Error::KeyDerivationFailed("key transform worker panicked".into())
            });
            (left, right)
        })
    } else {
        (
            Ok(stretch_lane::<C>(seed, left_in, rounds)),
            stretch_lane::<C>(seed, right_in, rounds),
        )
    };

    let mut left = left??;
    let mut right = right?;

    let mut out = [0u8; KEY_LEN];
    out[..LANE_LEN].copy_from_slice(&left);
    out[LANE_LEN..].copy_from_slice(&right);
    left.zeroize();
    right.zeroize();
    Ok(out)
}

/// Encrypt one 16-byte lane `rounds` times in place.
fn stretch_lane<C>(seed: &[u8; 32], lane: &[u8], rounds: u32) -> Result<[u8; LANE_LEN]>
where
    C: BlockEncrypt + BlockSizeUser<BlockSize = U16> + KeyInit,
{
    let cipher = C::new_from_slice(seed)
        .map_err(|e| Kdb1Error::KeyDerivationFailed(format!("invalid transform seed: {e}")))?;

    let mut block = GenericArray::<u8, U16>::clone_from_slice(lane);
    for _ in 0..rounds {
        cipher.encrypt_block(&mut block);
    }

    let mut out = [0u8; LANE_LEN];
    out.copy_from_slice(&block);
    block.as_mut_slice().zeroize();
    Ok(out)
}
