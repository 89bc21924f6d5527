
#[cfg(test)]
mod work_tests {
    use crate::miner::work::*;

    fn sample_work() -> Work {
        let mut data = [0u32; 20];
        for (i, word) in data.iter_mut().enumerate() {
            *word = 0x01020304u32.wrapping_mul(i as u32 + 1);
        }
        Work {
            data,
            target: [0, 0, 0, 0, 0, 0, 0, 0x0001FFFF],
        }
    }

    #[test]
    fn test_header_prefix_is_big_endian() {
        let work = sample_work();
        let prefix = work.header_prefix();
        assert_eq!(prefix.len(), 76);
        assert_eq!(&prefix[..4], &work.data[0].to_be_bytes());
        assert_eq!(&prefix[72..76], &work.data[18].to_be_bytes());
    }

    #[test]
    fn test_hash_words_little_endian() {
        let mut hash = [0u8; 32];
        hash[28..32].copy_from_slice(&[0x44, 0x33, 0x22, 0x11]);
        let words = hash_words(&hash);
        assert_eq!(words[7], 0x11223344);
        assert_eq!(words[0], 0);
    }

    #[test]
    fn test_fulltest_compares_from_top_word() {
        let target = [0u32, 0, 0, 0, 0, 0, 0, 0x1000];

        let mut hash = [0u32; 8];
        hash[7] = 0x0FFF;
        hash[0] = u32::MAX;
        assert!(fulltest(&hash, &target));

        hash[7] = 0x1001;
        hash[0] = 0;
        assert!(!fulltest(&hash, &target));

        // Equal everywhere counts as met.
        assert!(fulltest(&target, &target));

        // Tie on the top word falls through to the lower words.
        let mut hash = target;
        hash[0] = 1;
        assert!(!fulltest(&hash, &target));
    }

    #[test]
    fn test_work_serde_round_trip() {
        let work = sample_work();
        let json = serde_json::to_string(&work).unwrap();
        let back: Work = serde_json::from_str(&json).unwrap();
        assert_eq!(back.data, work.data);
        assert_eq!(back.target, work.target);
    }
}
