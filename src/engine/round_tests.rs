
#[cfg(test)]
mod round_tests {
    use crate::crypto::crc32::crc32_32;
    use crate::crypto::tables::RF_IV;
    use crate::engine::round::{RoundCore, absorb};
    use crate::engine::state::HashState;

    #[test]
    fn test_state_from_iv_little_endian() {
        let state = HashState::from_iv();
        assert_eq!(state.to_bytes(), RF_IV);
        assert_eq!(
            state.q(0),
            u64::from_le_bytes([RF_IV[0], RF_IV[1], RF_IV[2], RF_IV[3], RF_IV[4], RF_IV[5], RF_IV[6], RF_IV[7]])
        );
    }

    #[test]
    fn test_q_views_alias_d_words() {
        let mut state = HashState::from_iv();
        state.set_q(2, 0x1122334455667788);
        assert_eq!(state.d[4], 0x55667788);
        assert_eq!(state.d[5], 0x11223344);
        assert_eq!(state.q(2), 0x1122334455667788);
    }

    #[test]
    fn test_rot32x256() {
        let mut state = HashState::from_iv();
        state.d = [0, 1, 2, 3, 4, 5, 6, 7];
        state.rot32x256();
        assert_eq!(state.d, [7, 0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_scramble_chains_crc() {
        let mut core = RoundCore::new(0x20180213);
        let snapshot = core.hash.d;

        let mut crc = core.crc;
        let mut expect = [0u32; 4];
        for i in 0..4 {
            crc = crc32_32(crc, snapshot[i]);
            expect[i] = crc;
        }

        let out = core.scramble();
        assert_eq!(out, crc);
        assert_eq!(core.crc, crc);
        assert_eq!(&core.hash.d[..4], &expect);
        // The high half is left alone.
        assert_eq!(&core.hash.d[4..], &snapshot[4..]);
    }

    #[test]
    fn test_divbox_zero_paths() {
        let mut core = RoundCore::new(0);
        core.hash.set_q(0, 0);
        core.hash.set_q(1, 0);
        core.divbox();
        assert_eq!(core.hash.q(0), 0);
        assert_eq!(core.hash.q(1), 0);
    }

    #[test]
    fn test_divbox_known_value() {
        // v0 = 1: p = !1, q = bswap(1); p > q so p/q = 0xff with remainder
        // 0x00fffffffffffffe. v1 = 0 takes the zero path, then the halves
        // cross-mix.
        let mut core = RoundCore::new(0);
        core.hash.set_q(0, 1);
        core.hash.set_q(1, 0);
        core.divbox();
        assert_eq!(core.hash.q(0), 1u64.wrapping_sub(0xFF));
        assert_eq!(core.hash.q(1), 0u64.wrapping_sub(0x00FF_FFFF_FFFF_FFFE));
    }

    #[test]
    fn test_rotbox_depends_on_shift_arguments() {
        let mut a = RoundCore::new(7);
        let mut b = a.clone();
        a.rotbox(1, 2);
        b.rotbox(2, 1);
        assert_ne!(a.hash.d, b.hash.d);
    }

    #[test]
    fn test_absorb_boundary_invariance() {
        let msg: Vec<u8> = (0u8..=99).collect();

        let mut whole = RoundCore::new(0x20180213);
        absorb(&mut whole, &msg, |core| core.one_round(false, |old| old));

        let mut pieces = RoundCore::new(0x20180213);
        for chunk in msg.chunks(7) {
            absorb(&mut pieces, chunk, |core| core.one_round(false, |old| old));
        }

        assert_eq!(whole.hash.d, pieces.hash.d);
        assert_eq!(whole.crc, pieces.crc);
        assert_eq!(whole.len, pieces.len);
    }

    #[test]
    fn test_one_round_consumes_pending_word() {
        let mut core = RoundCore::new(0x20180213);
        core.word = 0x11223344;
        core.len = 4;
        core.one_round(false, |old| old.wrapping_mul(0x9E3779B97F4A7C15));
        assert_eq!(core.word, 0);
    }

    #[test]
    fn test_fp_mix_changes_round_output() {
        // The perturbation value can legitimately be zero for a crc whose
        // sine is tiny, so probe several seeds and require a divergence.
        let diverged = (0u32..8).any(|seed| {
            let mut plain = RoundCore::new(0x20180213 + seed);
            let mut mixed = plain.clone();
            plain.one_round(false, |old| old);
            mixed.one_round(true, |old| old);
            plain.hash.d != mixed.hash.d
        });
        assert!(diverged);
    }
}
