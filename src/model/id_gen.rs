// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tourgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

use super::ids::{OverlayId, TempNodeId};

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Produces client-side temporary ids for entities that do not exist server-side yet.
///
/// Ids look like `<prefix>_<millis36>_<salt36>_<counter>`. The salt is the low 36 bits of a v4
/// uuid drawn once per generator, so two generators created in the same millisecond still
/// diverge. The counter keeps ids from one generator distinct. Not suitable as a secret.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    prefix: String,
    salt: u64,
    counter: u64,
}

impl IdGenerator {
    /// Empty prefixes fall back to `tg`; whitespace in the prefix becomes `-`.
    pub fn new(prefix: impl Into<String>) -> Self {
        let mut prefix: String = prefix
            .into()
            .chars()
            .map(|c| if c.is_whitespace() { '-' } else { c })
            .collect();
        if prefix.is_empty() {
            prefix.push_str("tg");
        }

        Self {
            prefix,
            salt: random_salt(),
            counter: 0,
        }
    }

    pub fn generate(&mut self) -> String {
        self.counter = self.counter.wrapping_add(1);

        let mut out = String::with_capacity(self.prefix.len() + 32);
        out.push_str(&self.prefix);
        out.push('_');
        push_base36(&mut out, unix_millis());
        out.push('_');
        push_base36(&mut out, self.salt);
        out.push('_');
        let mut buf = itoa::Buffer::new();
        out.push_str(buf.format(self.counter));
        out
    }

    pub fn next_overlay_id(&mut self) -> OverlayId {
        OverlayId::from_generated(self.generate())
    }

    pub fn next_temp_node_id(&mut self) -> TempNodeId {
        TempNodeId::from_generated(self.generate())
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new("tg")
    }
}

/// Below `36^7`, so the salt never takes more than seven base-36 digits.
const SALT_MASK: u128 = (1 << 36) - 1;

fn random_salt() -> u64 {
    (Uuid::new_v4().as_u128() & SALT_MASK) as u64
}

pub(crate) fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

fn push_base36(out: &mut String, mut value: u64) {
    let mut digits = [0u8; 13];
    let mut len = 0;
    loop {
        digits[len] = BASE36[(value % 36) as usize];
        len += 1;
        value /= 36;
        if value == 0 {
            break;
        }
    }
    for &d in digits[..len].iter().rev() {
        out.push(d as char);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{push_base36, random_salt, IdGenerator, SALT_MASK};

    #[test]
    fn generated_ids_are_unique_within_a_session() {
        let mut gen = IdGenerator::new("m");
        let ids: HashSet<String> = (0..10_000).map(|_| gen.generate()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn two_generators_do_not_collide() {
        let mut a = IdGenerator::new("m");
        let mut b = IdGenerator::new("m");
        let ids_a: HashSet<String> = (0..100).map(|_| a.generate()).collect();
        assert!((0..100).map(|_| b.generate()).all(|id| !ids_a.contains(&id)));
    }

    #[test]
    fn salts_stay_in_range_and_differ_between_generators() {
        let salts: HashSet<u64> = (0..64).map(|_| random_salt()).collect();
        assert!(salts.iter().all(|&salt| u128::from(salt) <= SALT_MASK));
        assert!(salts.len() > 1);
    }

    #[test]
    fn ids_carry_the_prefix() {
        let mut gen = IdGenerator::new("poly");
        assert!(gen.generate().starts_with("poly_"));
        assert!(gen.next_overlay_id().as_str().starts_with("poly_"));
    }

    #[test]
    fn base36_formats_zero_and_large_values() {
        let mut out = String::new();
        push_base36(&mut out, 0);
        assert_eq!(out, "0");
        out.clear();
        push_base36(&mut out, 36 * 36 + 35);
        assert_eq!(out, "10z");
        out.clear();
        push_base36(&mut out, u64::MAX);
        assert_eq!(out, "3w5e11264sgsf");
    }
}
